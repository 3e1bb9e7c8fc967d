//! # Check-Config Subcommand
//!
//! Validates a pool configuration file and prints the effective values.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use potdraw_core::PoolConfig;

/// Arguments for the `potdraw check-config` subcommand.
#[derive(Args, Debug)]
pub struct CheckConfigArgs {
    /// Path to the config YAML file. Defaults to the global `--config`.
    #[arg(value_name = "CONFIG_YAML")]
    pub file: Option<PathBuf>,
}

/// Execute the check-config subcommand.
///
/// Returns exit code: 0 if valid, 1 if the file parses as YAML but fails
/// validation, 2 (via `Err`) if it cannot be read.
pub fn run_check_config(args: &CheckConfigArgs, config_path: Option<&Path>) -> Result<u8> {
    let path = match args.file.as_deref().or(config_path) {
        Some(path) => path,
        None => bail!("no config file given; pass a path or --config"),
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    match PoolConfig::from_yaml_str(&content) {
        Ok(config) => {
            println!("OK: {}", path.display());
            println!("  fee_percent:         {}", config.fee_percent);
            println!("  timer_duration_secs: {}", config.timer_duration_secs);
            println!("  max_deposit:         {}", config.max_deposit);
            println!("  fee_recipient:       {}", config.fee_recipient);
            println!("  reclaim_after_secs:  {}", config.reclaim_after_secs);
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: {}: {e}", path.display());
            Ok(1)
        }
    }
}
