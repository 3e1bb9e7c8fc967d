//! # Run Subcommand
//!
//! Replays a scenario file and writes the observation journal to stdout,
//! one JSON object per line. Rejected steps are reported on stderr after
//! the journal.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::scenario::{replay, Scenario};

/// Arguments for the `potdraw run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the scenario YAML file.
    #[arg(value_name = "SCENARIO_YAML")]
    pub scenario: PathBuf,

    /// Abort on the first rejected step.
    #[arg(long)]
    pub strict: bool,
}

/// Execute the run subcommand.
///
/// Returns exit code: 0 when every step was accepted, 1 when some were
/// rejected, 2 (via `Err`) on operational errors or a strict abort.
pub fn run_scenario(args: &RunArgs, config_path: Option<&Path>) -> Result<u8> {
    let content = std::fs::read_to_string(&args.scenario)
        .with_context(|| format!("failed to read scenario: {}", args.scenario.display()))?;
    let scenario = Scenario::from_yaml_str(&content)
        .with_context(|| format!("in scenario {}", args.scenario.display()))?;
    let fallback = config_path.map(crate::load_config).transpose()?;

    let replay = replay(&scenario, fallback, args.strict)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for observation in replay.registry.observations() {
        serde_json::to_writer(&mut out, observation).context("failed to encode observation")?;
        writeln!(out).context("failed to write journal")?;
    }
    out.flush().context("failed to write journal")?;

    if replay.failures.is_empty() {
        return Ok(0);
    }
    for failure in &replay.failures {
        eprintln!("rejected: {failure}");
    }
    eprintln!(
        "{} of {} step(s) rejected",
        replay.failures.len(),
        scenario.steps.len()
    );
    Ok(1)
}
