use std::io::Write;

use tracing::{debug, warn};

use crate::{
    account::{Account, Rejection},
    command::{Operation, OperationKind},
    ledger::Ledger,
};

use super::{Handler, ProcessError};

/// The default handler list, in dispatch order.
pub fn standard() -> Vec<Box<dyn Handler>> {
    vec![
        Box::new(OpenHandler),
        Box::new(ChargeHandler),
        Box::new(CreditHandler),
        Box::new(ConfirmHandler),
        Box::new(ReportHandler),
    ]
}

fn lookup<'l>(ledger: &'l Ledger, holder: &str) -> Result<&'l Account, ProcessError> {
    ledger.get(holder).ok_or_else(|| ProcessError::AccountNotFound {
        holder: holder.to_owned(),
    })
}

/// Opens an account whose limit is the operation amount. Opening an existing
/// holder again is ignored.
pub struct OpenHandler;

impl Handler for OpenHandler {
    fn kind(&self) -> OperationKind {
        OperationKind::Open
    }

    fn handle(
        &self,
        operation: &Operation,
        ledger: &mut Ledger,
        _output: &mut dyn Write,
    ) -> Result<(), ProcessError> {
        let holder = &operation.holder;
        let Some(card_number) = &operation.card_number else {
            return Err(ProcessError::MissingField {
                field: "card_number",
                holder: holder.clone(),
            });
        };
        if holder.trim().is_empty() {
            return Err(ProcessError::MissingField {
                field: "card_holder",
                holder: holder.clone(),
            });
        }
        if ledger.has(holder) {
            debug!(%holder, "account duplicated, ignoring");
            return Ok(());
        }
        let limit = operation.parse_amount()?;
        ledger.put(Account::open(holder.as_str(), card_number.as_str(), limit));
        Ok(())
    }
}

pub struct ChargeHandler;

impl Handler for ChargeHandler {
    fn kind(&self) -> OperationKind {
        OperationKind::Charge
    }

    fn handle(
        &self,
        operation: &Operation,
        ledger: &mut Ledger,
        _output: &mut dyn Write,
    ) -> Result<(), ProcessError> {
        let account = lookup(ledger, &operation.holder)?;
        let amount = operation.parse_amount()?;
        let candidate = account.balance().checked_add(amount).ok_or_else(|| {
            ProcessError::AmountOverflow {
                holder: operation.holder.clone(),
            }
        })?;
        let updated = if candidate > account.limit() {
            warn!(holder = %operation.holder, amount, limit = account.limit(), "charge rejected");
            account.flagged(Rejection::CreditLimitExceeded)
        } else {
            account.with_balance(candidate)
        };
        ledger.put(updated);
        Ok(())
    }
}

/// Refuses to credit an account sitting at zero. Otherwise the balance may go
/// negative.
pub struct CreditHandler;

impl Handler for CreditHandler {
    fn kind(&self) -> OperationKind {
        OperationKind::Credit
    }

    fn handle(
        &self,
        operation: &Operation,
        ledger: &mut Ledger,
        _output: &mut dyn Write,
    ) -> Result<(), ProcessError> {
        let account = lookup(ledger, &operation.holder)?;
        let amount = operation.parse_amount()?;
        let updated = if account.balance() == 0 {
            warn!(holder = %operation.holder, amount, "credit rejected");
            account.flagged(Rejection::ZeroBalanceCredit)
        } else {
            let balance = account.balance().checked_sub(amount).ok_or_else(|| {
                ProcessError::AmountOverflow {
                    holder: operation.holder.clone(),
                }
            })?;
            account.with_balance(balance)
        };
        ledger.put(updated);
        Ok(())
    }
}

/// Asserts the balance equals the operation amount. A zero balance never
/// confirms, whatever was expected.
pub struct ConfirmHandler;

impl Handler for ConfirmHandler {
    fn kind(&self) -> OperationKind {
        OperationKind::Confirm
    }

    fn handle(
        &self,
        operation: &Operation,
        ledger: &mut Ledger,
        _output: &mut dyn Write,
    ) -> Result<(), ProcessError> {
        let account = lookup(ledger, &operation.holder)?;
        let expected = operation.parse_amount()?;
        let actual = account.balance();
        if actual == 0 {
            return Err(ProcessError::InvalidConfirmState {
                holder: operation.holder.clone(),
            });
        }
        if actual != expected {
            return Err(ProcessError::BalanceMismatch {
                holder: operation.holder.clone(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// Writes `<holder> <balance> <flag>` where the flag is `Error` for a rejected
/// account and empty otherwise.
pub struct ReportHandler;

impl Handler for ReportHandler {
    fn kind(&self) -> OperationKind {
        OperationKind::Report
    }

    fn handle(
        &self,
        operation: &Operation,
        ledger: &mut Ledger,
        output: &mut dyn Write,
    ) -> Result<(), ProcessError> {
        write_report(lookup(ledger, &operation.holder)?, output)
    }
}

pub(super) fn write_report(account: &Account, output: &mut dyn Write) -> Result<(), ProcessError> {
    let flag = if account.rejection().is_some() {
        "Error"
    } else {
        ""
    };
    writeln!(output, "{} {} {flag}", account.holder(), account.balance())?;
    Ok(())
}
