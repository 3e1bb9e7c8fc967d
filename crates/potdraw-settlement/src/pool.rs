//! # Pool Round State
//!
//! One round of escrow for a pool slot. A slot is reused indefinitely: once
//! settled it returns to the empty state and the next deposit opens a new
//! round under the same identifier.
//!
//! ## Phases
//!
//! ```text
//!   Empty ──admit()──▶ Accepting ──admit() (2nd participant)──▶ Armed
//!     ▲                    │                                      │
//!     └──── settled ───────┴──────────────── settled ─────────────┘
//! ```
//!
//! ## Invariants
//!
//! - `Empty` has no participants and no timer.
//! - An armed pool has at least two participants and a start time; both
//!   live in [`ArmedTimer`], so "armed without a start time" cannot be
//!   represented.
//! - `total_deposited` is the sum of every admitted amount in the round.
//! - The timer arms once per round; later admissions never move it.

use serde::{Deserialize, Serialize};

use potdraw_core::{AccountId, Amount, Timestamp};

use crate::error::SettlementError;

/// Participant count at which a round's timer arms.
pub const MIN_PARTICIPANTS_TO_ARM: usize = 2;

/// Lifecycle phase of a pool round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolPhase {
    /// No participants, no timer.
    Empty,
    /// At least one participant, timer not yet started.
    Accepting,
    /// Timer started; settlement becomes possible once it elapses.
    Armed,
}

impl std::fmt::Display for PoolPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Empty => "EMPTY",
            Self::Accepting => "ACCEPTING",
            Self::Armed => "ARMED",
        };
        f.write_str(s)
    }
}

/// Timer state captured when a round arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmedTimer {
    /// When the arming admission happened.
    pub start_time: Timestamp,
    /// Configured duration at that moment; later config updates do not
    /// change it.
    pub duration_secs: u64,
}

impl ArmedTimer {
    /// Earliest settlement time, or `None` if it is beyond the
    /// representable range (never eligible).
    pub fn deadline(&self) -> Option<Timestamp> {
        self.start_time.checked_add_secs(self.duration_secs)
    }
}

/// One round's escrow state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    participants: Vec<AccountId>,
    total_deposited: Amount,
    opened_at: Option<Timestamp>,
    timer: Option<ArmedTimer>,
}

impl Pool {
    /// An empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Participants in admission order, duplicates included.
    pub fn participants(&self) -> &[AccountId] {
        &self.participants
    }

    /// Sum of admitted deposits this round.
    pub fn total_deposited(&self) -> Amount {
        self.total_deposited
    }

    /// Time of the first admission this round.
    pub fn opened_at(&self) -> Option<Timestamp> {
        self.opened_at
    }

    /// The armed timer, if the round has armed.
    pub fn timer(&self) -> Option<&ArmedTimer> {
        self.timer.as_ref()
    }

    /// Start time of the armed timer.
    pub fn start_time(&self) -> Option<Timestamp> {
        self.timer.map(|t| t.start_time)
    }

    /// Whether the timer has started.
    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Whether the pool holds no participants.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> PoolPhase {
        match (self.participants.is_empty(), self.timer.is_some()) {
            (true, _) => PoolPhase::Empty,
            (false, false) => PoolPhase::Accepting,
            (false, true) => PoolPhase::Armed,
        }
    }

    /// The running total after admitting `amount`, or `None` on overflow.
    pub fn prospective_total(&self, amount: Amount) -> Option<Amount> {
        self.total_deposited.checked_add(amount)
    }

    /// Admit one deposit. Returns `true` if this admission armed the timer.
    ///
    /// The pool is unchanged if the running total would overflow.
    pub fn admit(
        &mut self,
        participant: AccountId,
        amount: Amount,
        now: Timestamp,
        timer_duration_secs: u64,
    ) -> Result<bool, SettlementError> {
        let total = self
            .prospective_total(amount)
            .ok_or(SettlementError::DepositOverflow {
                total: self.total_deposited,
                amount,
            })?;

        if self.participants.is_empty() {
            self.opened_at = Some(now);
        }
        self.participants.push(participant);
        self.total_deposited = total;

        let arms = self.timer.is_none() && self.participants.len() == MIN_PARTICIPANTS_TO_ARM;
        if arms {
            self.timer = Some(ArmedTimer {
                start_time: now,
                duration_secs: timer_duration_secs,
            });
        }
        Ok(arms)
    }
}
