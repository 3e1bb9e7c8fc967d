//! # Settlement Engine
//!
//! Maps a pool snapshot plus configuration to an [`Outcome`]. No side
//! effects: the same snapshot, config and draw inputs always produce the
//! same outcome, which is what the unit tests below rely on.

use potdraw_core::{PoolConfig, Timestamp};

use crate::error::SettlementError;
use crate::fee::split_fee;
use crate::outcome::Outcome;
use crate::pool::Pool;
use crate::selection::{select_winner, DrawInputs};

/// Whether a timer that started at `start_time` and runs for
/// `duration_secs` has elapsed at `now`.
///
/// A deadline beyond the representable range is never reached.
pub fn is_eligible(start_time: Timestamp, duration_secs: u64, now: Timestamp) -> bool {
    start_time
        .checked_add_secs(duration_secs)
        .is_some_and(|deadline| now >= deadline)
}

/// Stateless settlement logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementEngine;

impl SettlementEngine {
    /// Create an engine.
    pub fn new() -> Self {
        Self
    }

    /// Compute the outcome of settling `pool`.
    ///
    /// - One participant: `Refund` of the full total, no fee.
    /// - Two or more: `Award` to the drawn participant, fee at the
    ///   configured percentage.
    ///
    /// # Errors
    ///
    /// `EmptyPool` for a pool with no participants.
    pub fn settle(
        &self,
        pool: &Pool,
        config: &PoolConfig,
        inputs: &DrawInputs,
    ) -> Result<Outcome, SettlementError> {
        let total = pool.total_deposited();
        match pool.participants() {
            [] => Err(SettlementError::EmptyPool),
            [sole] => Ok(Outcome::Refund {
                to: sole.clone(),
                amount: total,
            }),
            participants => {
                let selection = select_winner(inputs, participants)?;
                let winner = participants
                    .get(selection.index)
                    .cloned()
                    .ok_or(SettlementError::EmptyPool)?;
                let split = split_fee(total, config.fee_percent);
                tracing::debug!(
                    participants = participants.len(),
                    index = selection.index,
                    digest = %selection.digest,
                    seed = %inputs.seed.to_hex(),
                    timestamp = inputs.timestamp.epoch_secs(),
                    "winner drawn"
                );
                Ok(Outcome::Award {
                    winner,
                    prize: split.prize,
                    fee: split.fee,
                })
            }
        }
    }
}
