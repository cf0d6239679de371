//! The ledger: account state, replay protection and the receipt log.
//!
//! Every submission runs validate -> apply -> record. Validation checks every
//! precondition before anything is touched, so apply is a short sequence of
//! arithmetic updates with no failure path and no rollback.
//!
//! A ledger is a plain owned value with no interior locking. Callers sharing one
//! across threads must serialize whole submissions (see `minichain-simulator`).

use crate::{Account, Accounts, Clock, SystemClock, Validator};
use minichain_types::{
    digest, encode_state, Address, MockSigner, Receipt, SignatureScheme, Transaction, TxId,
    DEFAULT_CHAIN_ID,
};
use std::collections::BTreeSet;
use tracing::{debug, trace};

pub struct Ledger<S = MockSigner, C = SystemClock> {
    validator: Validator<S>,
    clock: C,

    accounts: Accounts,
    seen_ids: BTreeSet<TxId>,
    history: Vec<Receipt>,
}

impl Ledger {
    /// Ledger for `chain_id` using the mock signature scheme and wall-clock receipts.
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self::with_parts(chain_id, MockSigner, SystemClock)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_CHAIN_ID)
    }
}

impl<S: SignatureScheme, C: Clock> Ledger<S, C> {
    pub fn with_parts(chain_id: impl Into<String>, scheme: S, clock: C) -> Self {
        Self {
            validator: Validator::new(chain_id, scheme),
            clock,
            accounts: Accounts::new(),
            seen_ids: BTreeSet::new(),
            history: Vec::new(),
        }
    }

    pub fn chain_id(&self) -> &str {
        self.validator.chain_id()
    }

    /// The scheme signatures are verified against.
    pub fn scheme(&self) -> &S {
        self.validator.scheme()
    }

    /// Create `address` with `balance`, or overwrite the balance of an existing
    /// account. An existing account keeps its nonce.
    pub fn create_account(&mut self, address: impl Into<Address>, balance: u64) -> &Account {
        let address = address.into();
        let existed = self.accounts.contains_key(&address);
        debug!(%address, balance, existed, "create account");
        let account = self
            .accounts
            .entry(address)
            .or_insert_with_key(|address| Account::new(address.clone(), 0));
        account.set_balance(balance);
        account
    }

    pub fn get_account(&self, address: impl AsRef<str>) -> Option<&Account> {
        self.accounts.get(&Address::new(address))
    }

    /// Validate `tx` against current state, apply it if valid, and record a receipt.
    ///
    /// Rejections are returned as failed receipts, never as errors, and leave
    /// accounts and the seen-id set untouched.
    pub fn submit_transaction(&mut self, tx: &Transaction) -> Receipt {
        let applied_at_ms = self.clock.now_ms();
        let receipt = match self.validator.validate(tx, &self.accounts, &self.seen_ids) {
            Err(reason) => {
                debug!(
                    tx = %tx.id(),
                    from = %tx.from(),
                    to = %tx.to(),
                    reason = reason.code(),
                    "rejected transaction"
                );
                Receipt::failure(tx.id(), reason, applied_at_ms)
            }
            Ok(()) => {
                self.apply(tx);
                self.seen_ids.insert(tx.id().to_string());
                debug!(
                    tx = %tx.id(),
                    from = %tx.from(),
                    to = %tx.to(),
                    amount = tx.amount(),
                    nonce = tx.nonce(),
                    "applied transaction"
                );
                Receipt::success(tx.id(), applied_at_ms)
            }
        };
        self.history.push(receipt.clone());
        receipt
    }

    fn apply(&mut self, tx: &Transaction) {
        let Some(sender) = self.accounts.get_mut(tx.from()) else {
            unreachable!("sender existence is validated before apply");
        };
        sender.debit(tx.amount());
        sender.increment_nonce();

        let receiver = self.accounts.entry(tx.to().clone()).or_insert_with_key(|address| {
            trace!(%address, "creating receiver account");
            Account::new(address.clone(), 0)
        });
        receiver.credit(tx.amount());
    }

    /// Digest of the canonical state encoding. Recomputed on every call.
    pub fn state_root(&self) -> String {
        digest(&encode_state(self.accounts.values().map(Account::entry)))
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    /// Ids of every successfully applied transaction.
    pub fn seen_ids(&self) -> &BTreeSet<TxId> {
        &self.seen_ids
    }

    /// Receipts in submission order, accepted and rejected alike.
    pub fn history(&self) -> &[Receipt] {
        &self.history
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> u128 {
        self.accounts
            .values()
            .map(|account| u128::from(account.balance()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{ledger_with, signed_transfer, FixedClock, FIXED_TIME_MS};
    use minichain_types::{TxStatus, ValidationError, DIGEST_HEX_LEN};

    #[test]
    fn test_create_account_is_an_upsert() {
        let mut ledger = ledger_with(&[("alice", 100)]);
        ledger.submit_transaction(&signed_transfer("alice", "bob", 10, 0));

        let alice = ledger.create_account("ALICE", 500);
        assert_eq!(alice.balance(), 500);
        assert_eq!(alice.nonce(), 1, "upsert keeps the nonce");
        assert_eq!(ledger.accounts().len(), 2);

        let carol = ledger.create_account("carol", 0);
        assert_eq!((carol.balance(), carol.nonce()), (0, 0));
    }

    #[test]
    fn test_get_account_normalizes() {
        let ledger = ledger_with(&[("Alice", 100)]);
        assert_eq!(ledger.get_account("ALICE").map(Account::balance), Some(100));
        assert_eq!(ledger.get_account("alice").map(Account::balance), Some(100));
        assert!(ledger.get_account("bob").is_none());
    }

    #[test]
    fn test_rejection_records_receipt_without_touching_state() {
        let mut ledger = ledger_with(&[("alice", 5)]);
        let root = ledger.state_root();
        let accounts = ledger.accounts().clone();

        let receipt = ledger.submit_transaction(&signed_transfer("alice", "bob", 10, 0));
        assert_eq!(receipt.status(), TxStatus::Failed);
        assert_eq!(receipt.failure_reason(), Some(ValidationError::InsufficientBalance));
        assert_eq!(receipt.applied_at_ms(), FIXED_TIME_MS);

        assert_eq!(ledger.history(), [receipt]);
        assert!(ledger.seen_ids().is_empty());
        assert_eq!(ledger.accounts(), &accounts);
        assert_eq!(ledger.state_root(), root);
        assert!(ledger.get_account("bob").is_none());
    }

    #[test]
    fn test_success_updates_state_and_seen_ids() {
        let mut ledger = ledger_with(&[("alice", 100), ("bob", 3)]);
        let tx = signed_transfer("alice", "bob", 10, 0);
        let receipt = ledger.submit_transaction(&tx);

        assert!(receipt.is_success());
        assert_eq!(receipt.tx_id(), tx.id());
        assert_eq!(receipt.block_height(), None);
        assert!(ledger.seen_ids().contains(tx.id()));

        let alice = ledger.get_account("alice").unwrap();
        assert_eq!((alice.balance(), alice.nonce()), (90, 1));
        let bob = ledger.get_account("bob").unwrap();
        assert_eq!((bob.balance(), bob.nonce()), (13, 0));
    }

    #[test]
    fn test_state_root_tracks_state() {
        let mut ledger = ledger_with(&[]);
        let empty_root = ledger.state_root();
        assert_eq!(empty_root, digest(r#"{"balances":{},"nonces":{}}"#));
        assert_eq!(empty_root.len(), DIGEST_HEX_LEN);

        // Zero-balance, zero-nonce accounts do not change the root.
        ledger.create_account("ghost", 0);
        assert_eq!(ledger.state_root(), empty_root);

        ledger.create_account("alice", 100);
        ledger.submit_transaction(&signed_transfer("alice", "bob", 10, 0));
        assert_eq!(
            ledger.state_root(),
            digest(r#"{"balances":{"alice":90,"bob":10},"nonces":{"alice":1}}"#)
        );
        // Stable across calls.
        assert_eq!(ledger.state_root(), ledger.state_root());
    }

    #[test]
    fn test_receiver_balance_saturates() {
        let mut ledger = ledger_with(&[("alice", 10), ("bob", u64::MAX - 1)]);
        let receipt = ledger.submit_transaction(&signed_transfer("alice", "bob", 5, 0));
        assert!(receipt.is_success());
        assert_eq!(ledger.get_account("bob").unwrap().balance(), u64::MAX);
        assert_eq!(ledger.get_account("alice").unwrap().balance(), 5);
    }

    #[test]
    fn test_default_ledger() {
        let ledger = Ledger::default();
        assert_eq!(ledger.chain_id(), DEFAULT_CHAIN_ID);
        assert!(ledger.accounts().is_empty());
        assert!(ledger.history().is_empty());
        assert_eq!(ledger.total_supply(), 0);
    }

    #[test]
    fn test_custom_chain_id() {
        let mut ledger = Ledger::with_parts("test-chain", MockSigner, FixedClock(1));
        ledger.create_account("alice", 10);
        let wrong = signed_transfer("alice", "bob", 1, 0);
        assert_eq!(
            ledger.submit_transaction(&wrong).failure_reason(),
            Some(ValidationError::InvalidChainId)
        );
        let right = Transaction::new("alice", "bob", 1, 0, "test-chain").signed_with(ledger.scheme());
        let receipt = ledger.submit_transaction(&right);
        assert!(receipt.is_success());
        assert_eq!(receipt.applied_at_ms(), 1);
    }
}
