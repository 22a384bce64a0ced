use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash)]
pub enum OperationKind {
    #[serde(alias = "Add")]
    Open,
    Charge,
    Credit,
    Confirm,
    Report,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("`{value}` is not an integer amount")]
    InvalidAmount { value: String },
}

/// A single ledger operation, as produced by the input layer.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Operation {
    #[serde(rename = "action")]
    pub kind: OperationKind,
    #[serde(rename = "card_holder")]
    pub holder: String,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
}

impl Operation {
    pub fn new(kind: OperationKind, holder: impl Into<String>) -> Self {
        Self {
            kind,
            holder: holder.into(),
            amount: None,
            card_number: None,
        }
    }

    pub fn open(holder: impl Into<String>, limit: &str, card_number: &str) -> Self {
        Self::new(OperationKind::Open, holder)
            .with_amount(limit)
            .with_card_number(card_number)
    }

    pub fn charge(holder: impl Into<String>, amount: &str) -> Self {
        Self::new(OperationKind::Charge, holder).with_amount(amount)
    }

    pub fn credit(holder: impl Into<String>, amount: &str) -> Self {
        Self::new(OperationKind::Credit, holder).with_amount(amount)
    }

    pub fn confirm(holder: impl Into<String>, expected: &str) -> Self {
        Self::new(OperationKind::Confirm, holder).with_amount(expected)
    }

    pub fn report(holder: impl Into<String>) -> Self {
        Self::new(OperationKind::Report, holder)
    }

    pub fn with_amount(mut self, amount: &str) -> Self {
        self.amount = Some(amount.to_owned());
        self
    }

    pub fn with_card_number(mut self, card_number: &str) -> Self {
        self.card_number = Some(card_number.to_owned());
        self
    }

    /// Amount as an integer; a missing amount counts as zero.
    pub fn parse_amount(&self) -> Result<i64, CommandError> {
        self.amount.as_deref().map_or(Ok(0), parse_integer_prefix)
    }
}

/// Reads the leading integer of `value`: optional whitespace and sign, then
/// digits up to the first non-digit. `"12.5"` reads as 12.
pub fn parse_integer_prefix(value: &str) -> Result<i64, CommandError> {
    let invalid = || CommandError::InvalidAmount {
        value: value.to_owned(),
    };
    let trimmed = value.trim_start();
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    let sign_len = trimmed.len() - unsigned.len();
    if sign_len > 1 {
        return Err(invalid());
    }
    let digits_len = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits_len == 0 {
        return Err(invalid());
    }
    trimmed[..sign_len + digits_len]
        .parse()
        .map_err(|_| invalid())
}
