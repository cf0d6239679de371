//! Local driver for a minichain [`Ledger`].
//!
//! [`Simulator`] shares one ledger between threads behind a single mutex, so every
//! submission (validate, apply, record) runs as one atomic step. [`Scenario`] loads
//! genesis accounts and transfers from YAML and replays them through a simulator,
//! producing a serializable [`Report`].

use minichain_execution::{Account, Clock, Ledger, SystemClock};
use minichain_types::{MockSigner, Receipt, SignatureScheme, Transaction};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

mod scenario;
pub use scenario::{GenesisAccount, Scenario, Transfer};

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("ledger lock poisoned")]
    Poisoned,
}

/// Snapshot of a ledger after a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub chain_id: String,
    pub receipts: Vec<Receipt>,
    pub accounts: Vec<Account>,
    pub state_root: String,
    pub total_supply: u128,
}

/// Cloneable handle to one shared ledger.
pub struct Simulator<S = MockSigner, C = SystemClock> {
    ledger: Arc<Mutex<Ledger<S, C>>>,
}

impl<S, C> Clone for Simulator<S, C> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl Simulator {
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self::from_ledger(Ledger::new(chain_id))
    }
}

impl<S: SignatureScheme, C: Clock> Simulator<S, C> {
    pub fn from_ledger(ledger: Ledger<S, C>) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Ledger<S, C>>, SimulatorError> {
        self.ledger.lock().map_err(|_| SimulatorError::Poisoned)
    }

    pub fn chain_id(&self) -> Result<String, SimulatorError> {
        Ok(self.lock()?.chain_id().to_string())
    }

    /// Creates or overwrites an account, returning a copy of its new state.
    pub fn create_account(
        &self,
        address: &str,
        balance: u64,
    ) -> Result<Account, SimulatorError> {
        let mut ledger = self.lock()?;
        Ok(ledger.create_account(address, balance).clone())
    }

    pub fn account(&self, address: &str) -> Result<Option<Account>, SimulatorError> {
        Ok(self.lock()?.get_account(address).cloned())
    }

    /// Signs `tx` with the ledger's signature scheme.
    pub fn sign(&self, tx: Transaction) -> Result<Transaction, SimulatorError> {
        let ledger = self.lock()?;
        Ok(tx.signed_with(ledger.scheme()))
    }

    /// Validates, applies and records `tx` while holding the lock for the whole step.
    pub fn submit(&self, tx: &Transaction) -> Result<Receipt, SimulatorError> {
        Ok(self.lock()?.submit_transaction(tx))
    }

    pub fn state_root(&self) -> Result<String, SimulatorError> {
        Ok(self.lock()?.state_root())
    }

    pub fn receipts(&self) -> Result<Vec<Receipt>, SimulatorError> {
        Ok(self.lock()?.history().to_vec())
    }

    /// Runs `f` with exclusive access to the ledger.
    pub fn with_ledger<T>(
        &self,
        f: impl FnOnce(&mut Ledger<S, C>) -> T,
    ) -> Result<T, SimulatorError> {
        let mut ledger = self.lock()?;
        Ok(f(&mut ledger))
    }

    /// Consistent snapshot of receipts, accounts and root taken under one lock.
    pub fn report(&self) -> Result<Report, SimulatorError> {
        let ledger = self.lock()?;
        Ok(Report {
            chain_id: ledger.chain_id().to_string(),
            receipts: ledger.history().to_vec(),
            accounts: ledger.accounts().values().cloned().collect(),
            state_root: ledger.state_root(),
            total_supply: ledger.total_supply(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minichain_execution::mocks::{ledger_with, signed_transfer, FixedClock};
    use minichain_types::{ValidationError, DEFAULT_CHAIN_ID};
    use std::thread;

    const SENDERS: [&str; 4] = ["alice", "bob", "carol", "dave"];
    const TRANSFERS_PER_SENDER: u64 = 25;

    fn simulator() -> Simulator<MockSigner, FixedClock> {
        Simulator::from_ledger(ledger_with(&[
            ("alice", 1_000),
            ("bob", 1_000),
            ("carol", 1_000),
            ("dave", 1_000),
        ]))
    }

    #[test]
    fn test_concurrent_submissions_preserve_invariants() {
        let simulator = simulator();
        let supply = simulator.report().unwrap().total_supply;

        let handles: Vec<_> = SENDERS
            .iter()
            .enumerate()
            .map(|(i, &from)| {
                let simulator = simulator.clone();
                let to = SENDERS[(i + 1) % SENDERS.len()];
                thread::spawn(move || {
                    for _ in 0..TRANSFERS_PER_SENDER {
                        let receipt = simulator
                            .with_ledger(|ledger| {
                                let nonce = ledger
                                    .get_account(from)
                                    .map(|account| account.nonce())
                                    .unwrap_or(0);
                                ledger.submit_transaction(&signed_transfer(from, to, 1, nonce))
                            })
                            .unwrap();
                        assert!(receipt.is_success(), "{receipt}");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let report = simulator.report().unwrap();
        assert_eq!(report.total_supply, supply);
        assert_eq!(
            report.receipts.len() as u64,
            TRANSFERS_PER_SENDER * SENDERS.len() as u64
        );
        for account in &report.accounts {
            assert_eq!(account.nonce(), TRANSFERS_PER_SENDER);
            // Each account sends and receives the same number of unit transfers.
            assert_eq!(account.balance(), 1_000);
        }
    }

    #[test]
    fn test_concurrent_duplicate_accepted_once() {
        let simulator = simulator();
        let tx = signed_transfer("alice", "bob", 10, 0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let simulator = simulator.clone();
                let tx = tx.clone();
                thread::spawn(move || simulator.submit(&tx).unwrap())
            })
            .collect();
        let receipts: Vec<Receipt> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(receipts.iter().filter(|r| r.is_success()).count(), 1);
        for receipt in receipts.iter().filter(|r| !r.is_success()) {
            assert_eq!(
                receipt.failure_reason(),
                Some(ValidationError::ReplayedTransaction)
            );
        }
        assert_eq!(simulator.account("alice").unwrap().unwrap().balance(), 990);
        assert_eq!(simulator.account("bob").unwrap().unwrap().balance(), 1_010);
    }

    #[test]
    fn test_sign_uses_ledger_scheme() {
        let simulator = Simulator::new(DEFAULT_CHAIN_ID);
        simulator.create_account("alice", 50).unwrap();

        let tx = simulator
            .sign(Transaction::new("alice", "bob", 5, 0, DEFAULT_CHAIN_ID))
            .unwrap();
        assert_eq!(tx.signature(), "SIG(alice|bob|5|0|mini-chain-v1)");

        let receipt = simulator.submit(&tx).unwrap();
        assert!(receipt.is_success());
        assert_eq!(simulator.receipts().unwrap(), vec![receipt]);
        assert_eq!(simulator.chain_id().unwrap(), DEFAULT_CHAIN_ID);
    }

    #[test]
    fn test_report_matches_ledger() {
        let simulator = simulator();
        simulator.submit(&signed_transfer("alice", "erin", 7, 0)).unwrap();

        let report = simulator.report().unwrap();
        assert_eq!(report.state_root, simulator.state_root().unwrap());
        assert_eq!(report.accounts.len(), 5);
        assert_eq!(report.accounts[4].address().as_str(), "erin");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["chainId"], DEFAULT_CHAIN_ID);
        assert_eq!(json["totalSupply"], 4_000);
        assert_eq!(json["receipts"][0]["status"], "Success");
    }

    #[test]
    fn test_poisoned_lock_reported() {
        let simulator = simulator();
        let poisoner = simulator.clone();
        let _ = thread::spawn(move || {
            poisoner
                .with_ledger(|_| panic!("poison the ledger lock"))
                .ok();
        })
        .join();

        assert!(matches!(
            simulator.state_root(),
            Err(SimulatorError::Poisoned)
        ));
    }
}
