use std::{borrow::Borrow, io::Write};

use icu_collator::{Collator, CollatorOptions, Strength};
use thiserror::Error;
use tracing::error;

use crate::{account::Account, command::Operation, ledger::Ledger};

use super::{Dispatcher, ProcessError, handlers::write_report};

/// A hard failure, with the index of the operation that raised it.
#[derive(Debug, Error)]
#[error("batch stopped at operation {position}: {source}")]
pub struct BatchError {
    pub position: usize,
    #[source]
    pub source: ProcessError,
}

/// Feeds `operations` through `dispatcher` in order. The first hard failure
/// stops the batch and is returned; operations after it are not processed.
pub fn process_transactions<O>(
    operations: impl IntoIterator<Item = O>,
    dispatcher: &Dispatcher,
    ledger: &mut Ledger,
    output: &mut dyn Write,
) -> Result<(), BatchError>
where
    O: Borrow<Operation>,
{
    for (position, operation) in operations.into_iter().enumerate() {
        let operation = operation.borrow();
        if let Err(source) = dispatcher.dispatch(operation, ledger, output) {
            error!(
                position,
                kind = ?operation.kind,
                holder = %operation.holder,
                err = %source,
                "batch aborted"
            );
            return Err(BatchError { position, source });
        }
    }
    Ok(())
}

/// Reports every account, ordered by holder name.
pub fn summarize_transactions(ledger: &Ledger, output: &mut dyn Write) -> Result<(), ProcessError> {
    let collator = holder_collator()?;
    let mut accounts: Vec<&Account> = ledger.entries().map(|(_, acc)| acc).collect();
    accounts.sort_by(|a, b| collator.compare(a.holder(), b.holder()));
    for account in accounts {
        write_report(account, output)?;
    }
    Ok(())
}

/// Root-locale collation at tertiary strength: accents and case only break
/// ties, lowercase first.
fn holder_collator() -> Result<Collator, ProcessError> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    Collator::try_new(&Default::default(), options)
        .map_err(|err| ProcessError::Collation(err.to_string()))
}

#[cfg(test)]
mod tests {
    use std::str::from_utf8;

    use super::*;

    fn run(operations: &[Operation]) -> (Ledger, Result<(), BatchError>) {
        let mut ledger = Ledger::new();
        let result = process_transactions(
            operations,
            &Dispatcher::default(),
            &mut ledger,
            &mut Vec::<u8>::new(),
        );
        (ledger, result)
    }

    #[test]
    fn tinker_confirms() {
        let (ledger, result) = run(&[
            Operation::open("tinker", "1000", "12345678912345"),
            Operation::charge("tinker", "500"),
            Operation::credit("tinker", "200"),
            Operation::confirm("tinker", "300"),
        ]);
        result.unwrap();
        assert_eq!(ledger.get("tinker").unwrap().balance(), 300);
    }

    #[test]
    fn credit_from_zero_fails_confirm() {
        let (ledger, result) = run(&[
            Operation::open("peter", "1000", "12345678912345"),
            Operation::credit("peter", "200"),
            Operation::confirm("peter", "0"),
        ]);
        assert!(matches!(
            result,
            Err(BatchError {
                position: 2,
                source: ProcessError::InvalidConfirmState { .. }
            })
        ));
        assert!(ledger.get("peter").unwrap().rejection().is_some());
    }

    #[test]
    fn negative_balance_confirms() {
        let (_, result) = run(&[
            Operation::open("tiger", "2000", "12345678912346"),
            Operation::charge("tiger", "5"),
            Operation::credit("tiger", "200"),
            Operation::confirm("tiger", "-195"),
        ]);
        result.unwrap();
    }

    #[test]
    fn interleaved_holders() {
        let (ledger, result) = run(&[
            Operation::open("tinker", "1000", "12345678912345"),
            Operation::open("lily", "1000", "12345678912346"),
            Operation::charge("tinker", "500"),
            Operation::credit("tinker", "200"),
            Operation::confirm("tinker", "300"),
            Operation::charge("lily", "5"),
            Operation::credit("lily", "200"),
            Operation::confirm("lily", "-195"),
        ]);
        result.unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn hard_failure_stops_batch() {
        let (ledger, result) = run(&[
            Operation::open("tinker", "1000", "1"),
            Operation::charge("ghost", "5"),
            Operation::open("lily", "1000", "2"),
        ]);
        assert!(matches!(
            result,
            Err(BatchError {
                position: 1,
                source: ProcessError::AccountNotFound { .. }
            })
        ));
        assert!(ledger.has("tinker"));
        assert!(!ledger.has("lily"));
    }

    #[test]
    fn summary_is_sorted_by_holder() {
        let mut ledger = Ledger::new();
        process_transactions(
            &[
                Operation::open("tinker", "1000", "1"),
                Operation::open("lily", "1000", "2"),
                Operation::open("peter", "10", "3"),
                Operation::charge("tinker", "500"),
                Operation::charge("peter", "11"),
            ],
            &Dispatcher::default(),
            &mut ledger,
            &mut Vec::<u8>::new(),
        )
        .unwrap();

        let mut output = Vec::<u8>::new();
        summarize_transactions(&ledger, &mut output).unwrap();
        assert_eq!(
            from_utf8(&output).unwrap(),
            "lily 0 \npeter 0 Error\ntinker 500 \n"
        );
    }

    #[test]
    fn summary_of_empty_ledger() {
        let mut output = Vec::<u8>::new();
        summarize_transactions(&Ledger::new(), &mut output).unwrap();
        assert!(output.is_empty());
    }

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        let collator = holder_collator().unwrap();
        names.sort_by(|a, b| collator.compare(a, b));
        names
    }

    #[test]
    fn holder_order_ignores_case_first() {
        assert_eq!(
            sorted(vec!["bob", "Alice", "alice", "Carol"]),
            ["alice", "Alice", "bob", "Carol"]
        );
    }

    #[test]
    fn accented_holders_sort_with_their_base_letter() {
        assert_eq!(
            sorted(vec!["zoe", "frank", "émile", "Ölaf", "adam"]),
            ["adam", "émile", "frank", "Ölaf", "zoe"]
        );
    }

    #[test]
    fn summary_orders_accented_holders() {
        let mut ledger = Ledger::new();
        for holder in ["zoe", "émile", "adam"] {
            ledger.put(Account::open(holder, "1", 10));
        }
        let mut output = Vec::<u8>::new();
        summarize_transactions(&ledger, &mut output).unwrap();
        assert_eq!(from_utf8(&output).unwrap(), "adam 0 \némile 0 \nzoe 0 \n");
    }

    #[test]
    fn operations_may_be_owned() {
        let mut ledger = Ledger::new();
        let operations = vec![
            Operation::open("lily", "10", "1"),
            Operation::charge("lily", "4"),
        ];
        process_transactions(
            operations,
            &Dispatcher::default(),
            &mut ledger,
            &mut Vec::<u8>::new(),
        )
        .unwrap();
        assert_eq!(ledger.get("lily").unwrap().balance(), 4);
    }
}
