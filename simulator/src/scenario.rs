use crate::{Report, Simulator};
use anyhow::{Context, Result};
use minichain_execution::Clock;
use minichain_types::{Address, SignatureScheme, Transaction, DEFAULT_CHAIN_ID};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

fn default_chain_id() -> String {
    DEFAULT_CHAIN_ID.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Genesis accounts plus an ordered list of transfers to replay.
///
/// ```yaml
/// chain_id: mini-chain-v1
/// log_level: debug
/// accounts:
///   - { address: alice, balance: 100 }
/// transfers:
///   - { from: alice, to: bob, amount: 10, nonce: 0 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub accounts: Vec<GenesisAccount>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisAccount {
    pub address: Address,
    #[serde(default)]
    pub balance: u64,
}

/// One transfer attempt.
///
/// `chain_id` defaults to the scenario's chain. Without an explicit `signature`
/// the transfer is signed with the simulator's scheme.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub amount: u64,
    pub nonce: u64,
    #[serde(default)]
    pub chain_id: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

impl Scenario {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("failed to parse scenario")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_yaml_str(&yaml).with_context(|| format!("invalid scenario {}", path.display()))
    }

    /// Seeds the genesis accounts, submits every transfer in order and reports the
    /// final state. Rejected transfers are recorded in the report, not returned as errors.
    pub fn run<S: SignatureScheme, C: Clock>(&self, simulator: &Simulator<S, C>) -> Result<Report> {
        for account in &self.accounts {
            simulator
                .create_account(account.address.as_str(), account.balance)
                .context("failed to create genesis account")?;
        }

        for (index, transfer) in self.transfers.iter().enumerate() {
            let chain_id = transfer.chain_id.as_deref().unwrap_or(&self.chain_id);
            let tx = Transaction::new(
                &transfer.from,
                &transfer.to,
                transfer.amount,
                transfer.nonce,
                chain_id,
            );
            let tx = match &transfer.signature {
                Some(signature) => tx.with_signature(signature.as_str()),
                None => simulator.sign(tx).context("failed to sign transfer")?,
            };
            let receipt = simulator.submit(&tx).context("failed to submit transfer")?;
            info!(index, tx = %tx, receipt = %receipt, "submitted transfer");
        }

        simulator.report().context("failed to build report")
    }
}
