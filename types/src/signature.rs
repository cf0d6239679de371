//! Transaction signing capability.
//!
//! [`SignatureScheme`] is the only signing surface the validator sees: it asks
//! `verify` and treats the answer as an opaque boolean. [`MockSigner`] is a
//! deterministic placeholder, not cryptography. Anyone who can read a transaction
//! can forge its signature. Swap in a key-based scheme behind the same trait.

use crate::Transaction;

pub trait SignatureScheme {
    /// Signature token for `tx`. Must depend only on the payload fields
    /// (from, to, amount, nonce, chain id), never on the id or current signature.
    fn sign(&self, tx: &Transaction) -> String;

    /// Byte-exact comparison of the attached signature with [`Self::sign`].
    fn verify(&self, tx: &Transaction) -> bool {
        tx.signature() == self.sign(tx)
    }
}

/// Placeholder scheme: `SIG(<from>|<to>|<amount>|<nonce>|<chainId>)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MockSigner;

impl SignatureScheme for MockSigner {
    fn sign(&self, tx: &Transaction) -> String {
        format!(
            "SIG({}|{}|{}|{}|{})",
            tx.from(),
            tx.to(),
            tx.amount(),
            tx.nonce(),
            tx.chain_id()
        )
    }
}
