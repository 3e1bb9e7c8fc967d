//! # potdraw-core — Foundational Types
//!
//! This crate is the leaf of the potdraw workspace. It defines the value
//! types every other crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `PoolType` and `AccountId` are
//!    distinct types. An account cannot be passed where a pool is expected,
//!    and `AccountId` is validated at construction and on deserialization.
//!
//! 2. **`CanonicalBytes` newtype.** Every digest in the system is computed
//!    over bytes produced by `CanonicalBytes::new()` (RFC 8785 / JCS). The
//!    draw digest is reproducible by any third party holding the inputs.
//!
//! 3. **UTC-only, second-precision timestamps.** Timer arithmetic happens on
//!    whole seconds, matching the granularity of the time source.
//!
//! 4. **Configuration is a value.** `PoolConfig` is validated once and
//!    then passed around explicitly. There is no ambient global state.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `potdraw-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod config;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use config::{
    check_fee_percent, check_timer_duration, PoolConfig, DEFAULT_RECLAIM_AFTER_SECS,
    MAX_FEE_PERCENT, MIN_TIMER_DURATION_SECS,
};
pub use digest::{sha256_digest, ContentDigest, Seed};
pub use error::{CanonicalizationError, CoreError};
pub use identity::{AccountId, PoolType};
pub use temporal::Timestamp;

/// Quantity of the pooled fungible asset, in its smallest unit.
pub type Amount = u64;
