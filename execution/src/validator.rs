//! Transaction validation.
//!
//! [`Validator::validate`] is a pure function of the transaction, an account
//! snapshot and the set of already-applied ids. It stops at the first failing
//! check. The order is part of the contract:
//!
//! 1. chain id matches ([`ValidationError::InvalidChainId`])
//! 2. signature verifies ([`ValidationError::InvalidSignature`])
//! 3. id not applied before ([`ValidationError::ReplayedTransaction`])
//! 4. amount > 0 ([`ValidationError::InvalidAmount`])
//! 5. from != to ([`ValidationError::SelfTransfer`])
//! 6. sender exists ([`ValidationError::SenderNotFound`])
//! 7. nonce equals sender nonce ([`ValidationError::InvalidNonce`])
//! 8. sender balance >= amount ([`ValidationError::InsufficientBalance`])

use crate::Accounts;
use minichain_types::{MockSigner, SignatureScheme, Transaction, TxId, ValidationError};
use std::collections::BTreeSet;

pub struct Validator<S = MockSigner> {
    chain_id: String,
    scheme: S,
}

impl<S: SignatureScheme> Validator<S> {
    pub fn new(chain_id: impl Into<String>, scheme: S) -> Self {
        Self {
            chain_id: chain_id.into(),
            scheme,
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    pub fn validate(
        &self,
        tx: &Transaction,
        accounts: &Accounts,
        seen_ids: &BTreeSet<TxId>,
    ) -> Result<(), ValidationError> {
        if tx.chain_id() != self.chain_id {
            return Err(ValidationError::InvalidChainId);
        }
        if !self.scheme.verify(tx) {
            return Err(ValidationError::InvalidSignature);
        }
        if seen_ids.contains(tx.id()) {
            return Err(ValidationError::ReplayedTransaction);
        }
        if tx.amount() == 0 {
            return Err(ValidationError::InvalidAmount);
        }
        if tx.from() == tx.to() {
            return Err(ValidationError::SelfTransfer);
        }
        let sender = accounts
            .get(tx.from())
            .ok_or(ValidationError::SenderNotFound)?;
        if tx.nonce() != sender.nonce() {
            return Err(ValidationError::InvalidNonce);
        }
        if sender.balance() < tx.amount() {
            return Err(ValidationError::InsufficientBalance);
        }
        Ok(())
    }
}
