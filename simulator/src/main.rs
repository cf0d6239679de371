use anyhow::{Context, Result};
use clap::Parser;
use minichain_simulator::{Scenario, Simulator};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML scenario.
    #[arg(short, long)]
    config: PathBuf,

    /// Overrides the scenario's log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

fn resolve_level(args: &Args, scenario: &Scenario) -> Result<Level> {
    let level = args.log_level.as_deref().unwrap_or(&scenario.log_level);
    Level::from_str(level).with_context(|| format!("invalid log level: {level}"))
}

fn main() -> Result<()> {
    // Parse args
    let args = Args::parse();
    let scenario = Scenario::load(&args.config)?;

    // Create logger (stdout carries the report)
    let level = resolve_level(&args, &scenario)?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    info!(
        config = %args.config.display(),
        chain_id = %scenario.chain_id,
        accounts = scenario.accounts.len(),
        transfers = scenario.transfers.len(),
        "loaded scenario"
    );

    // Run
    let simulator = Simulator::new(scenario.chain_id.clone());
    let report = scenario.run(&simulator)?;
    let accepted = report.receipts.iter().filter(|r| r.is_success()).count();
    info!(
        accepted,
        rejected = report.receipts.len() - accepted,
        state_root = %report.state_root,
        "scenario complete"
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}
