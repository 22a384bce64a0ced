/// Account record and the soft rejection markers it can carry.
pub mod account;

/// Accounts keyed by holder, owned by whoever runs a batch.
pub mod ledger;

/// Operations as they arrive from the input layer.
pub mod command;

/// Handlers for each operation kind, the dispatcher routing to them, and the
/// batch runner on top.
///
/// Money movements that break a rule (charge over limit, credit from zero)
/// only flag the account. Everything else that goes wrong is a
/// [`processor::ProcessError`] and stops the batch.
pub mod processor;

/// CSV input and a batch service, used by the binary and integration tests.
pub mod bin_utils;
