//! Minichain execution layer.
//!
//! This crate contains the transaction [`Validator`] and the [`Ledger`] that applies
//! validated transfers to account state.
//!
//! ## Determinism requirements
//! - Ids and state roots never depend on wall-clock time; the [`Clock`] only stamps
//!   receipts.
//! - Account state is kept in ordered maps so no output depends on hash iteration order.
//! - Two ledgers that accept the same ordered transactions from the same balances
//!   report the same state root, whatever order their accounts were created in.
//!
//! ## Example
//! ```rust
//! use minichain_execution::Ledger;
//! use minichain_types::{MockSigner, Transaction, TxStatus, DEFAULT_CHAIN_ID};
//!
//! let mut ledger = Ledger::new(DEFAULT_CHAIN_ID);
//! ledger.create_account("alice", 100);
//!
//! let tx = Transaction::new("alice", "bob", 10, 0, DEFAULT_CHAIN_ID).signed_with(&MockSigner);
//! let receipt = ledger.submit_transaction(&tx);
//! assert_eq!(receipt.status(), TxStatus::Success);
//! assert_eq!(ledger.get_account("bob").map(|a| a.balance()), Some(10));
//! assert_eq!(ledger.state_root().len(), 64);
//! ```

mod clock;
mod ledger;
mod state;
mod validator;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;


pub use clock::{Clock, SystemClock};
pub use ledger::Ledger;
pub use state::{Account, Accounts};
pub use validator::Validator;
