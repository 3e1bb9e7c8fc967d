//! # Draw Subcommand
//!
//! Reproduces a winner selection from its public inputs: the settlement
//! timestamp, the seed, and the ordered participant list. Anyone holding
//! those three values can confirm which index a settlement picked.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use potdraw_core::{AccountId, Seed, Timestamp};
use potdraw_settlement::{select_winner, DrawInputs};

/// Arguments for the `potdraw draw` subcommand.
#[derive(Args, Debug)]
pub struct DrawArgs {
    /// Settlement time, seconds since the Unix epoch.
    #[arg(long)]
    pub timestamp: i64,

    /// Draw seed as 64 hex characters, optionally `0x`-prefixed.
    #[arg(long)]
    pub seed: String,

    /// Print the result as a JSON object.
    #[arg(long)]
    pub json: bool,

    /// Participants in join order. Repeat an account once per entry.
    #[arg(value_name = "PARTICIPANT", required = true)]
    pub participants: Vec<String>,
}

/// A reproduced selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawReport {
    /// Winning position in the participant list.
    pub index: usize,
    /// Account at that position.
    pub winner: AccountId,
    /// Digest the index was reduced from, `sha256:<hex>`.
    pub digest: String,
}

/// Recompute the selection described by `args`.
pub fn draw(args: &DrawArgs) -> Result<DrawReport> {
    let timestamp = Timestamp::from_epoch_secs(args.timestamp).context("invalid --timestamp")?;
    let seed = Seed::from_hex(&args.seed).context("invalid --seed")?;
    let participants = args
        .participants
        .iter()
        .map(|p| AccountId::new(p.as_str()).with_context(|| format!("invalid participant {p:?}")))
        .collect::<Result<Vec<_>>>()?;

    let selection = select_winner(&DrawInputs { timestamp, seed }, &participants)?;
    Ok(DrawReport {
        index: selection.index,
        winner: participants[selection.index].clone(),
        digest: selection.digest.to_string(),
    })
}

/// Execute the draw subcommand.
pub fn run_draw(args: &DrawArgs) -> Result<u8> {
    let report = draw(args)?;
    if args.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!(
            "winner: {} (index {} of {})",
            report.winner,
            report.index,
            args.participants.len()
        );
        println!("digest: {}", report.digest);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(participants: &[&str]) -> DrawArgs {
        DrawArgs {
            timestamp: 1_700_000_030,
            seed: "11".repeat(32),
            json: false,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_draw_matches_selection() {
        let report = draw(&args(&["alice", "bob", "carol"])).unwrap();
        let participants: Vec<_> = ["alice", "bob", "carol"]
            .iter()
            .map(|p| AccountId::new(*p).unwrap())
            .collect();
        let expected = select_winner(
            &DrawInputs {
                timestamp: Timestamp::from_epoch_secs(1_700_000_030).unwrap(),
                seed: Seed([0x11; 32]),
            },
            &participants,
        )
        .unwrap();
        assert_eq!(report.index, expected.index);
        assert_eq!(report.winner, participants[expected.index]);
        assert_eq!(report.digest, expected.digest.to_string());
    }

    #[test]
    fn test_draw_single_participant() {
        let report = draw(&args(&["alice"])).unwrap();
        assert_eq!(report.index, 0);
    }

    #[test]
    fn test_draw_rejects_bad_seed() {
        let mut bad = args(&["alice", "bob"]);
        bad.seed = "xyz".to_string();
        assert!(draw(&bad).is_err());
    }

    #[test]
    fn test_draw_rejects_bad_participant() {
        assert!(draw(&args(&["alice", ""])).is_err());
    }
}
