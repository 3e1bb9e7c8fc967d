//! # potdraw CLI entry point
//!
//! Parses command-line arguments, initializes tracing, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use potdraw_cli::check_config::{run_check_config, CheckConfigArgs};
use potdraw_cli::draw::{run_draw, DrawArgs};
use potdraw_cli::run::{run_scenario, RunArgs};

/// potdraw — multi-pool escrow and drawing simulator
///
/// Replays pool scenarios against an in-memory ledger, reproduces winner
/// selections, and checks pool configuration files.
#[derive(Parser, Debug)]
#[command(name = "potdraw", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a pool configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a scenario and print the observation journal as JSON lines.
    Run(RunArgs),

    /// Reproduce a winner selection from timestamp, seed and participants.
    Draw(DrawArgs),

    /// Validate a pool configuration file.
    CheckConfig(CheckConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr; stdout carries the journal.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "potdraw starting");

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Run(args) => run_scenario(&args, config),
        Commands::Draw(args) => run_draw(&args),
        Commands::CheckConfig(args) => run_check_config(&args, config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
