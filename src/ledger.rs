use std::collections::HashMap;

use crate::account::{Account, Holder};

/// Accounts keyed by holder. One instance per batch; a fresh ledger is the
/// only reset besides [`Ledger::clear`].
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: HashMap<Holder, Account>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, holder: &str) -> Option<&Account> {
        self.accounts.get(holder)
    }

    pub fn put(&mut self, account: Account) {
        self.accounts.insert(account.holder().to_owned(), account);
    }

    pub fn has(&self, holder: &str) -> bool {
        self.accounts.contains_key(holder)
    }

    pub fn clear(&mut self) {
        self.accounts.clear();
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Unordered, like the underlying map.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Account)> {
        self.accounts
            .iter()
            .map(|(holder, acc)| (holder.as_str(), acc))
    }
}
