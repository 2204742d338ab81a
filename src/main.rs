//! Deferred Acceptance - Binary Entry Point
//!
//! Runs a market description (JSON) to its stable matching and prints the
//! proposal transcript, the final pairing and the state root. Without
//! `--market` a built-in 3x3 demo market is used.
//!
//! Logging honours `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use deferred_acceptance::engine::{blocking_pairs, DriveMode, MatchingEngine};
use deferred_acceptance::MarketDescription;

const DEMO_MARKET: &str = r#"{
    "proposers": [
        { "name": "m1", "prefers": ["w1", "w2", "w3"] },
        { "name": "m2", "prefers": ["w3", "w2", "w1"] },
        { "name": "m3", "prefers": ["w3", "w1", "w2"] }
    ],
    "responders": [
        { "name": "w1", "prefers": ["m2", "m3", "m1"] },
        { "name": "w2", "prefers": ["m2", "m3", "m1"] },
        { "name": "w3", "prefers": ["m2", "m1", "m3"] }
    ]
}"#;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Rounds,
    SingleStep,
}

impl From<Mode> for DriveMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Rounds => DriveMode::Rounds,
            Mode::SingleStep => DriveMode::SingleStep,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "deferred-acceptance", about = "Stable matching by deferred acceptance")]
struct Args {
    /// JSON market description; runs the built-in demo when omitted
    #[arg(long)]
    market: Option<PathBuf>,

    /// How proposals are driven
    #[arg(long, value_enum, default_value_t = Mode::Rounds)]
    mode: Mode,

    /// Skip the per-proposal transcript
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let text = match &args.market {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => DEMO_MARKET.to_owned(),
    };
    let description = MarketDescription::from_json(&text).context("parsing market description")?;
    let mut market = description.build()?;

    let engine = MatchingEngine::new(args.mode.into());
    let result = engine.run(&mut market)?;

    if !args.quiet {
        println!("=== Transcript ===");
        for outcome in &result.outcomes {
            for line in market.describe(outcome)? {
                println!("  {line}");
            }
        }
        println!();
    }

    let (proposals, lines) = market.snapshot_text()?;
    println!("=== Matching after {proposals} proposals ===");
    for line in lines {
        println!("  {line}");
    }
    println!();

    let receipt = &result.receipt;
    println!("  Rounds:        {}", receipt.rounds);
    println!("  Matched pairs: {}/{}", receipt.matched_pairs, receipt.proposer_count);
    if let Some(mean) = receipt.mean_proposer_choice() {
        println!("  Mean choice:   {}", mean.round_dp(4));
    }
    println!("  State root:    {}", receipt.state_root_hex());
    println!("  Stable:        {}", blocking_pairs(&market)?.is_empty());

    Ok(())
}
