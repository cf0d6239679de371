//! Canonical text encodings for everything that feeds a digest.
//!
//! Both encodings are compact JSON with keys in alphabetical order at every
//! level, integers in plain decimal and no null values:
//!
//! ```text
//! payload: {"amount":10,"chainId":"mini-chain-v1","from":"alice","nonce":0,"to":"bob"}
//! state:   {"balances":{"alice":90,"bob":10},"nonces":{"alice":1}}
//! ```
//!
//! Transaction ids and state roots are `digest(encode(x))`, so any change to these
//! functions changes every id and root.

use crate::{Address, Transaction};
use std::fmt::Write;

/// One account's contribution to [`encode_state`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateEntry<'a> {
    pub address: &'a Address,
    pub balance: u64,
    pub nonce: u64,
}

/// Encode the identifier-bearing fields of a transaction.
pub fn encode_transaction_payload(tx: &Transaction) -> String {
    encode_payload(tx.amount(), tx.chain_id(), tx.from(), tx.nonce(), tx.to())
}

pub(crate) fn encode_payload(
    amount: u64,
    chain_id: &str,
    from: &Address,
    nonce: u64,
    to: &Address,
) -> String {
    let mut out =
        String::with_capacity(64 + chain_id.len() + from.as_str().len() + to.as_str().len());
    let _ = write!(out, r#"{{"amount":{amount},"chainId":"#);
    push_string(&mut out, chain_id);
    out.push_str(r#","from":"#);
    push_string(&mut out, from.as_str());
    let _ = write!(out, r#","nonce":{nonce},"to":"#);
    push_string(&mut out, to.as_str());
    out.push('}');
    out
}

/// Encode account balances and nonces.
///
/// Entries are sorted by address before encoding, so the output does not depend on
/// the order the caller iterates its accounts in. Zero balances are omitted from
/// `balances` and zero nonces from `nonces`.
pub fn encode_state<'a>(entries: impl IntoIterator<Item = StateEntry<'a>>) -> String {
    let mut entries: Vec<StateEntry<'a>> = entries.into_iter().collect();
    entries.sort_by(|a, b| a.address.cmp(b.address));

    let mut out = String::from(r#"{"balances":{"#);
    push_section(&mut out, &entries, |entry| entry.balance);
    out.push_str(r#"},"nonces":{"#);
    push_section(&mut out, &entries, |entry| entry.nonce);
    out.push_str("}}");
    out
}

fn push_section(
    out: &mut String,
    entries: &[StateEntry<'_>],
    field: impl Fn(&StateEntry<'_>) -> u64,
) {
    let mut first = true;
    for entry in entries {
        let value = field(entry);
        if value == 0 {
            continue;
        }
        if !first {
            out.push(',');
        }
        first = false;
        push_string(out, entry.address.as_str());
        let _ = write!(out, ":{value}");
    }
}

fn push_string(out: &mut String, value: &str) {
    // JSON string literal; plain identifiers come out as "value".
    let _ = write!(out, "{}", serde_json::Value::from(value));
}
