use crate::{canonical, digest, Address, SignatureScheme};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Chain id used when none is configured.
pub const DEFAULT_CHAIN_ID: &str = "mini-chain-v1";

/// Hex digest identifying a transaction payload.
pub type TxId = String;

fn short(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// A transfer of `amount` from `from` to `to`.
///
/// The id is computed once at construction from the canonical payload encoding and
/// does not cover the signature: re-signing a transaction never changes its id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    from: Address,
    to: Address,
    amount: u64,
    nonce: u64,
    chain_id: String,
    signature: String,

    id: TxId,
}

impl Transaction {
    fn compute_id(amount: u64, chain_id: &str, from: &Address, nonce: u64, to: &Address) -> TxId {
        digest(&canonical::encode_payload(amount, chain_id, from, nonce, to))
    }

    pub fn new(
        from: impl Into<Address>,
        to: impl Into<Address>,
        amount: u64,
        nonce: u64,
        chain_id: impl Into<String>,
    ) -> Self {
        let from = from.into();
        let to = to.into();
        let chain_id = chain_id.into();
        let id = Self::compute_id(amount, &chain_id, &from, nonce, &to);
        Self {
            from,
            to,
            amount,
            nonce,
            chain_id,
            signature: String::new(),
            id,
        }
    }

    pub fn from(&self) -> &Address {
        &self.from
    }

    pub fn to(&self) -> &Address {
        &self.to
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// The sender nonce this transaction claims.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Transaction kind. Transfers are the only kind.
    pub fn kind(&self) -> &'static str {
        "transfer"
    }

    pub fn set_signature(&mut self, signature: impl Into<String>) {
        self.signature = signature.into();
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.set_signature(signature);
        self
    }

    /// Attach the signature `scheme` produces for this payload.
    pub fn signed_with<S: SignatureScheme>(mut self, scheme: &S) -> Self {
        let signature = scheme.sign(&self);
        self.set_signature(signature);
        self
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tx({}->{}, amount={}, nonce={}, id={}...)",
            self.from,
            self.to,
            self.amount,
            self.nonce,
            short(&self.id)
        )
    }
}

/// Reasons a transaction is rejected, in the order they are checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Error, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationError {
    #[error("chain id does not match the ledger")]
    InvalidChainId,
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("transaction was already applied")]
    ReplayedTransaction,
    #[error("amount must be greater than zero")]
    InvalidAmount,
    #[error("sender and receiver are the same account")]
    SelfTransfer,
    #[error("sender account does not exist")]
    SenderNotFound,
    #[error("nonce does not match the sender's current nonce")]
    InvalidNonce,
    #[error("sender balance is lower than the amount")]
    InsufficientBalance,
}

impl ValidationError {
    /// Every kind, in check order.
    pub const ALL: [ValidationError; 8] = [
        ValidationError::InvalidChainId,
        ValidationError::InvalidSignature,
        ValidationError::ReplayedTransaction,
        ValidationError::InvalidAmount,
        ValidationError::SelfTransfer,
        ValidationError::SenderNotFound,
        ValidationError::InvalidNonce,
        ValidationError::InsufficientBalance,
    ];

    /// Stable machine-readable code (matches the serialized form).
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidChainId => "INVALID_CHAIN_ID",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::ReplayedTransaction => "REPLAYED_TRANSACTION",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::SelfTransfer => "SELF_TRANSFER",
            Self::SenderNotFound => "SENDER_NOT_FOUND",
            Self::InvalidNonce => "INVALID_NONCE",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TxStatus {
    Success,
    Failed,
}

/// Outcome of one submission. Every submission produces exactly one receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    tx_id: TxId,
    status: TxStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_reason: Option<ValidationError>,
    applied_at_ms: u64,
    /// Reserved for a block-commit stage; never set by the ledger.
    #[serde(skip_serializing_if = "Option::is_none")]
    block_height: Option<u64>,
}

impl Receipt {
    pub fn success(tx_id: impl Into<TxId>, applied_at_ms: u64) -> Self {
        Self {
            tx_id: tx_id.into(),
            status: TxStatus::Success,
            failure_reason: None,
            applied_at_ms,
            block_height: None,
        }
    }

    pub fn failure(tx_id: impl Into<TxId>, reason: ValidationError, applied_at_ms: u64) -> Self {
        Self {
            tx_id: tx_id.into(),
            status: TxStatus::Failed,
            failure_reason: Some(reason),
            applied_at_ms,
            block_height: None,
        }
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn status(&self) -> TxStatus {
        self.status
    }

    /// Present iff the status is [`TxStatus::Failed`].
    pub fn failure_reason(&self) -> Option<ValidationError> {
        self.failure_reason
    }

    pub fn applied_at_ms(&self) -> u64 {
        self.applied_at_ms
    }

    pub fn block_height(&self) -> Option<u64> {
        self.block_height
    }

    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Success
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failure_reason {
            None => write!(f, "Receipt({}..., SUCCESS)", short(&self.tx_id)),
            Some(reason) => write!(
                f,
                "Receipt({}..., FAILED: {})",
                short(&self.tx_id),
                reason.code()
            ),
        }
    }
}
