//! # potdraw-settlement — Pool Rounds and Settlement Logic
//!
//! Everything in this crate is pure: no clocks, no ledgers, no I/O. The
//! registry feeds it snapshots and explicit inputs and acts on the result.
//!
//! - **Pool** (`pool.rs`): one round's escrow state for a pool slot and the
//!   admission/arming transitions. `Empty → Accepting → Armed → Empty`.
//!
//! - **Fee** (`fee.rs`): floor-percentage fee split with no rounding loss.
//!
//! - **Selection** (`selection.rs`): SHA-256 over the canonical encoding of
//!   `{timestamp, seed, participants}`, reduced modulo the participant count.
//!
//! - **Engine** (`engine.rs`): timer eligibility and `settle()`, mapping a
//!   pool snapshot plus configuration to an [`Outcome`].
//!
//! ## Randomness
//!
//! The selection is only as unpredictable as its seed and timestamp. Anyone
//! who can observe or steer those before the settling call can predict or
//! bias the draw. The seed is supplied from outside precisely so that a
//! stronger source (commit-reveal, a verifiable randomness service) can be
//! substituted without changing the algorithm.

pub mod engine;
pub mod error;
pub mod fee;
pub mod outcome;
pub mod pool;
pub mod selection;

pub use engine::{is_eligible, SettlementEngine};
pub use error::SettlementError;
pub use fee::{split_fee, FeeSplit};
pub use outcome::Outcome;
pub use pool::{ArmedTimer, Pool, PoolPhase, MIN_PARTICIPANTS_TO_ARM};
pub use selection::{draw_digest, select_winner, DrawInputs, Selection};
