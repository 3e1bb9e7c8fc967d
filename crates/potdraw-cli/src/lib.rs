//! # potdraw-cli — Pool Simulator Command-Line Interface
//!
//! Drives a [`PoolRegistry`](potdraw_registry::PoolRegistry) against the
//! in-memory ledger, a manual clock and a fixed seed, so a full round can
//! be replayed and audited offline.
//!
//! ## Subcommands
//!
//! - `run` — Replay a scenario file and print the observation journal.
//! - `draw` — Reproduce a winner selection from its public inputs.
//! - `check-config` — Validate a pool configuration file.
//!
//! ```bash
//! potdraw run scenarios/two_players.yaml
//! potdraw draw --timestamp 1700000030 --seed 11..11 alice bob
//! potdraw check-config pool.yaml
//! ```
//!
//! Argument parsing lives in the subcommand modules; replay logic lives in
//! [`scenario`] so it can be exercised without a process boundary.

pub mod check_config;
pub mod draw;
pub mod run;
pub mod scenario;

use std::path::Path;

use anyhow::{Context, Result};

use potdraw_core::PoolConfig;

/// Read and validate a YAML pool configuration.
pub fn load_config(path: &Path) -> Result<PoolConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    PoolConfig::from_yaml_str(&content)
        .with_context(|| format!("invalid config file: {}", path.display()))
}
