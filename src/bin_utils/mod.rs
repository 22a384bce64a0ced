//! Drives a CSV file through the engine as one batch and prints the summary.

use std::io::{Read, Write};

use crate::{
    ledger::Ledger,
    processor::{
        Dispatcher, ProcessError,
        batch::{BatchError, process_transactions, summarize_transactions},
    },
};
use anyhow::Result;
use csv_parser::CsvOperationParser;
use thiserror::Error;
use tracing::info;

pub mod csv_parser;

#[derive(Debug, Error)]
pub enum RowError {
    #[error("malformed row: {0}")]
    Parse(#[from] csv::Error),
    #[error(transparent)]
    Process(#[from] ProcessError),
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(u64, RowError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    /// Malformed rows are reported and skipped. The first hard failure is
    /// reported and ends the batch; the summary is printed either way.
    pub fn run(mut self) -> Result<Ledger> {
        let error_printer = &mut self.error_printer;
        // line of every operation handed to the batch, by position
        let mut lines = Vec::new();
        let operations = CsvOperationParser::new(self.input).filter_map(|(line, row)| match row {
            Ok(operation) => {
                lines.push(line);
                Some(operation)
            }
            Err(err) => {
                error_printer(line, err.into());
                None
            }
        });

        let mut ledger = Ledger::new();
        let result = process_transactions(
            operations,
            &Dispatcher::default(),
            &mut ledger,
            &mut *self.output,
        );
        if let Err(BatchError { position, source }) = result {
            let line = lines[position];
            info!(line, "batch stopped");
            error_printer(line, source.into());
        }

        summarize_transactions(&ledger, &mut *self.output)?;
        self.output.flush()?;
        Ok(ledger)
    }
}
