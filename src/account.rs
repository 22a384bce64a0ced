use thiserror::Error;

pub type Holder = String;

/// Soft rejection attached to an account when a money movement was refused.
/// Processing continues; the marker is only observable through a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("run out of credit limit")]
    CreditLimitExceeded,
    #[error("must have a non-zero balance")]
    ZeroBalanceCredit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    Healthy { balance: i64 },
    Flagged { balance: i64, reason: Rejection },
}

impl AccountState {
    pub fn balance(&self) -> i64 {
        match *self {
            AccountState::Healthy { balance } | AccountState::Flagged { balance, .. } => balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    holder: Holder,
    card_number: String,
    limit: i64,
    state: AccountState,
}

impl Account {
    pub fn open(holder: impl Into<Holder>, card_number: impl Into<String>, limit: i64) -> Self {
        Self {
            holder: holder.into(),
            card_number: card_number.into(),
            limit,
            state: AccountState::Healthy { balance: 0 },
        }
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn state(&self) -> AccountState {
        self.state
    }

    pub fn balance(&self) -> i64 {
        self.state.balance()
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self.state {
            AccountState::Healthy { .. } => None,
            AccountState::Flagged { reason, .. } => Some(reason),
        }
    }

    /// Snapshot with a new balance. Any previous rejection is dropped.
    pub fn with_balance(&self, balance: i64) -> Self {
        Self {
            state: AccountState::Healthy { balance },
            ..self.clone()
        }
    }

    /// Snapshot with the balance untouched and `reason` attached.
    pub fn flagged(&self, reason: Rejection) -> Self {
        Self {
            state: AccountState::Flagged {
                balance: self.balance(),
                reason,
            },
            ..self.clone()
        }
    }
}
