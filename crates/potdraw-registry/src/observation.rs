//! # Observations
//!
//! Append-only audit records of successful asset-moving calls. A join
//! records `Joined`; a refund records `Refunded`; an award records `Won`
//! followed by `FeeTaken`, one record per movement. Failed calls record
//! nothing.

use serde::{Deserialize, Serialize};

use potdraw_core::{AccountId, Amount, PoolType, Timestamp};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationKind {
    /// A deposit was accepted.
    Joined,
    /// A sole participant got their deposit back.
    Refunded,
    /// A winner was paid.
    Won,
    /// The fee recipient was paid.
    FeeTaken,
}

impl std::fmt::Display for ObservationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Joined => "Joined",
            Self::Refunded => "Refunded",
            Self::Won => "Won",
            Self::FeeTaken => "FeeTaken",
        };
        f.write_str(s)
    }
}

/// One immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Position in the registry's journal, starting at zero.
    pub sequence: u64,
    /// What happened.
    pub kind: ObservationKind,
    /// Pool the record belongs to.
    pub pool_type: PoolType,
    /// Depositor, refund target, winner, or fee recipient.
    pub actor: AccountId,
    /// Amount moved.
    pub amount: Amount,
    /// When it was recorded.
    pub at: Timestamp,
}
