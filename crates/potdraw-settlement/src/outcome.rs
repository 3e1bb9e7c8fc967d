//! # Settlement Outcome
//!
//! The result of settlement logic before any asset moves. The registry
//! turns an `Outcome` into ledger transfers and observations; if those
//! transfers fail, the `Outcome` travels back to the caller for
//! reconciliation.

use serde::{Deserialize, Serialize};

use potdraw_core::{AccountId, Amount};

/// What a settled round pays out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Sole participant: the full deposit goes back, fee-free.
    Refund {
        /// The participant being refunded.
        to: AccountId,
        /// Full pool total.
        amount: Amount,
    },
    /// Contested round: one participant takes the pool minus the fee.
    Award {
        /// The selected participant.
        winner: AccountId,
        /// Amount paid to the winner.
        prize: Amount,
        /// Amount paid to the fee recipient.
        fee: Amount,
    },
}

impl Outcome {
    /// Sum of every payment this outcome makes.
    pub fn total(&self) -> Amount {
        match self {
            Self::Refund { amount, .. } => *amount,
            Self::Award { prize, fee, .. } => prize.saturating_add(*fee),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Refund { to, amount } => write!(f, "refund {amount} to {to}"),
            Self::Award { winner, prize, fee } => {
                write!(f, "award {prize} to {winner} (fee {fee})")
            }
        }
    }
}
