//! Deterministic fixtures for tests (enabled with the `mocks` feature).

use crate::{Clock, Ledger};
use minichain_types::{MockSigner, Transaction, DEFAULT_CHAIN_ID};

/// Timestamp stamped on receipts by ledgers built with [`ledger_with`].
pub const FIXED_TIME_MS: u64 = 1_700_000_000_000;

/// Clock that always reports the same instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Default for FixedClock {
    fn default() -> Self {
        Self(FIXED_TIME_MS)
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Transfer on [`DEFAULT_CHAIN_ID`] carrying a valid mock signature.
pub fn signed_transfer(from: &str, to: &str, amount: u64, nonce: u64) -> Transaction {
    Transaction::new(from, to, amount, nonce, DEFAULT_CHAIN_ID).signed_with(&MockSigner)
}

/// Ledger on [`DEFAULT_CHAIN_ID`] with a fixed clock, seeded with `accounts` in order.
pub fn ledger_with(accounts: &[(&str, u64)]) -> Ledger<MockSigner, FixedClock> {
    let mut ledger = Ledger::with_parts(DEFAULT_CHAIN_ID, MockSigner, FixedClock::default());
    for &(address, balance) in accounts {
        ledger.create_account(address, balance);
    }
    ledger
}
