use minichain_types::{Address, StateEntry};
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

/// Accounts keyed by address. Ordered so iteration never depends on hashing.
pub type Accounts = BTreeMap<Address, Account>;

/// Balance and nonce of one address.
///
/// Fields are read-only outside this crate; only the [`crate::Ledger`] mutates them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Account {
    address: Address,
    balance: u64,
    /// Number of transfers this account has successfully sent, and therefore the
    /// nonce its next transfer must carry.
    nonce: u64,
}

impl Account {
    pub(crate) fn new(address: Address, balance: u64) -> Self {
        Self {
            address,
            balance,
            nonce: 0,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// This account's input to the state encoding.
    pub fn entry(&self) -> StateEntry<'_> {
        StateEntry {
            address: &self.address,
            balance: self.balance,
            nonce: self.nonce,
        }
    }

    pub(crate) fn set_balance(&mut self, balance: u64) {
        self.balance = balance;
    }

    /// Caller must have checked `amount <= balance`.
    pub(crate) fn debit(&mut self, amount: u64) {
        self.balance -= amount;
    }

    pub(crate) fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    pub(crate) fn increment_nonce(&mut self) {
        self.nonce += 1;
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account({}, balance={}, nonce={})",
            self.address, self.balance, self.nonce
        )
    }
}
