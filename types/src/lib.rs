//! Common types used throughout minichain.
//!
//! Everything that feeds a transaction id or a state root lives here: addresses,
//! transactions, the canonical encoder and the digest function. The signing
//! capability is defined here too so the execution layer only ever depends on the
//! [`SignatureScheme`] trait.

mod address;
pub use address::Address;
pub mod canonical;
pub use canonical::{encode_state, encode_transaction_payload, StateEntry};
mod digest;
pub use digest::{digest, DIGEST_HEX_LEN};
pub mod execution;
pub use execution::{
    Receipt, Transaction, TxId, TxStatus, ValidationError, DEFAULT_CHAIN_ID,
};
pub mod signature;
pub use signature::{MockSigner, SignatureScheme};
