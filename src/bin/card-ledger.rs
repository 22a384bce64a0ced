use std::fs::File;

use anyhow::{Context, Result};
use card_ledger::bin_utils::{RowError, Service};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "card_ledger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let filename = std::env::args()
        .nth(1)
        .context("Expected a file name as the first argument")?;
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        error_printer: Box::new(|line, err| match err {
            RowError::Parse(err) => eprintln!("Skipping line {line}: {err}"),
            RowError::Process(err) => eprintln!("Batch stopped at line {line}: {err}"),
        }),
    };
    service.run()?;
    Ok(())
}
