//! # Execution Environment
//!
//! The registry never manufactures time, randomness or authority. Each is
//! a trait supplied by the host:
//!
//! - [`Clock`] — non-decreasing current time, read once per call.
//! - [`EntropySource`] — a fresh 32-byte seed per draw.
//! - [`AdminGate`] — whether a caller may change configuration.
//!
//! The manual implementations exist for simulation and tests. They use
//! interior mutability so a test can keep an `Arc` handle and advance time
//! or swap the seed while the registry holds its own handle.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::RngCore;

use potdraw_core::{AccountId, Seed, Timestamp};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current time. Never earlier than a previous call's result.
    fn now(&self) -> Timestamp;
}

/// Source of per-draw seeds.
pub trait EntropySource: Send + Sync {
    /// A seed for the next draw.
    fn seed(&self) -> Seed;
}

/// Authorization check for administrative calls.
pub trait AdminGate: Send + Sync {
    /// Whether `caller` may change configuration.
    fn is_admin(&self, caller: &AccountId) -> bool;
}

/// Wall-clock UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to, and only forward.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    /// Start at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move forward by `secs`. Saturates at the representable maximum.
    pub fn advance(&self, secs: u64) -> Timestamp {
        let mut now = self.now.lock();
        if let Some(next) = now.checked_add_secs(secs) {
            *now = next;
        }
        *now
    }

    /// Jump to `to` if it is not earlier than the current time.
    pub fn set(&self, to: Timestamp) -> Timestamp {
        let mut now = self.now.lock();
        if to > *now {
            *now = to;
        }
        *now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

/// Seeds from the operating system's CSPRNG.
///
/// A local CSPRNG is only as good as the trust in whoever runs the
/// settling call; it does not make the draw verifiable to participants.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn seed(&self) -> Seed {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Seed(bytes)
    }
}

/// A seed chosen by the host, replaceable between draws.
#[derive(Debug)]
pub struct ManualEntropy {
    seed: Mutex<Seed>,
}

impl ManualEntropy {
    /// Start with `seed`.
    pub fn new(seed: Seed) -> Self {
        Self {
            seed: Mutex::new(seed),
        }
    }

    /// Replace the seed used for subsequent draws.
    pub fn set(&self, seed: Seed) {
        *self.seed.lock() = seed;
    }
}

impl EntropySource for ManualEntropy {
    fn seed(&self) -> Seed {
        *self.seed.lock()
    }
}

/// A single owner account holds administrative rights.
#[derive(Debug, Clone)]
pub struct OwnerGate {
    owner: AccountId,
}

impl OwnerGate {
    /// Grant rights to `owner`.
    pub fn new(owner: AccountId) -> Self {
        Self { owner }
    }

    /// The owner account.
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }
}

impl AdminGate for OwnerGate {
    fn is_admin(&self, caller: &AccountId) -> bool {
        *caller == self.owner
    }
}

/// The collaborators a registry reads from on every call.
#[derive(Clone)]
pub struct Environment {
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Randomness source for draws.
    pub entropy: Arc<dyn EntropySource>,
    /// Administrative authorization.
    pub gate: Arc<dyn AdminGate>,
}

impl Environment {
    /// Bundle the three collaborators.
    pub fn new(
        clock: Arc<dyn Clock>,
        entropy: Arc<dyn EntropySource>,
        gate: Arc<dyn AdminGate>,
    ) -> Self {
        Self {
            clock,
            entropy,
            gate,
        }
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").finish_non_exhaustive()
    }
}
