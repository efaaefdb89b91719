//! Capture-state validation CLI for blkcapt test runs
//!
//! Reads the four stage captures collected during an integration-test
//! run, parses them against the run's start timestamp, and compares the
//! observed snapshot timelines with a reference schedule. Exits 1 when
//! validation fails so CI can fail the test cycle.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use blkcapteng_core::{Expectations, StateVerifier};

#[derive(Parser, Debug)]
#[command(name = "blkcapteng")]
#[command(about = "Validate captured snapshot state against the test schedule")]
#[command(version)]
struct Args {
    /// Capture taken at the first checkpoint (~63s)
    #[arg(long)]
    first: PathBuf,

    /// Capture taken at the second checkpoint (~123s)
    #[arg(long)]
    second: PathBuf,

    /// Capture taken at the third checkpoint (~183s)
    #[arg(long)]
    third: PathBuf,

    /// Capture taken after service shutdown (~187s)
    #[arg(long = "final")]
    final_capture: PathBuf,

    /// Test run start time, seconds since epoch
    #[arg(short, long)]
    base_timestamp: i64,

    /// Expectations TOML overriding the baseline schedule
    #[arg(long)]
    expect: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();

    let expectations = match &args.expect {
        Some(path) => Expectations::load(path)?,
        None => Expectations::default(),
    };

    let first = fs::read_to_string(&args.first)?;
    let second = fs::read_to_string(&args.second)?;
    let third = fs::read_to_string(&args.third)?;
    let final_capture = fs::read_to_string(&args.final_capture)?;

    let verifier = StateVerifier::new(expectations);
    let result = verifier.verify(&first, &second, &third, &final_capture, args.base_timestamp)?;

    if result.passed() {
        info!("all {} stages passed validation", result.stages_checked);
        Ok(())
    } else {
        error!(
            "validation failed after {}/{} stages",
            result.stages_passed, result.stages_checked
        );
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
