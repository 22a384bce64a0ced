use std::{collections::HashMap, io::Write};

use thiserror::Error;
use tracing::debug;

use crate::{
    command::{CommandError, Operation, OperationKind},
    ledger::Ledger,
};

pub mod batch;
pub mod handlers;

/// Hard failures. Any of these aborts the rest of a batch.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("must have {field} for {holder:?}")]
    MissingField {
        field: &'static str,
        holder: String,
    },
    #[error("account not exist for {holder}")]
    AccountNotFound { holder: String },
    #[error("must have a non-zero balance to confirm {holder}")]
    InvalidConfirmState { holder: String },
    #[error("expect {expected}, but got {actual}")]
    BalanceMismatch {
        holder: String,
        expected: i64,
        actual: i64,
    },
    #[error("balance of {holder} would overflow")]
    AmountOverflow { holder: String },
    #[error(transparent)]
    CommandErr(#[from] CommandError),
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
    #[error("holder collation unavailable: {0}")]
    Collation(String),
}

/// Owns the validation and mutation logic of exactly one [`OperationKind`].
pub trait Handler {
    fn kind(&self) -> OperationKind;

    fn handle(
        &self,
        operation: &Operation,
        ledger: &mut Ledger,
        output: &mut dyn Write,
    ) -> Result<(), ProcessError>;
}

/// Routes an operation to the handler registered for its kind.
pub struct Dispatcher {
    handlers: HashMap<OperationKind, Box<dyn Handler>>,
}

impl Dispatcher {
    /// Builds a dispatcher from an ordered handler list. When several handlers
    /// share a kind, the earliest one claims it and the rest are never tried.
    pub fn from_handlers(handlers: impl IntoIterator<Item = Box<dyn Handler>>) -> Self {
        let mut by_kind = HashMap::new();
        for handler in handlers {
            by_kind.entry(handler.kind()).or_insert(handler);
        }
        Self { handlers: by_kind }
    }

    /// Returns `false` when no handler claims the operation; that is not an error.
    pub fn dispatch(
        &self,
        operation: &Operation,
        ledger: &mut Ledger,
        output: &mut dyn Write,
    ) -> Result<bool, ProcessError> {
        let Some(handler) = self.handlers.get(&operation.kind) else {
            debug!(kind = ?operation.kind, holder = %operation.holder, "no handler, skipping");
            return Ok(false);
        };
        handler.handle(operation, ledger, output)?;
        Ok(true)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::from_handlers(handlers::standard())
    }
}
