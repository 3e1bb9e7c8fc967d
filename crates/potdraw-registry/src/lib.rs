//! # potdraw-registry — Pool Registry and Collaborator Seams
//!
//! The stateful half of potdraw. [`PoolRegistry`] owns pool slots and last
//! winners, validates every call, and turns settlement outcomes from
//! `potdraw-settlement` into asset movements.
//!
//! - **Registry** (`registry.rs`): `join`, `finalize`, `reclaim`, the
//!   administrative updates, and read accessors.
//! - **Ledger** (`ledger.rs`): the [`AssetLedger`] trait and an in-memory
//!   implementation.
//! - **Environment** (`environment.rs`): [`Clock`], [`EntropySource`] and
//!   [`AdminGate`], with system and manual implementations.
//! - **Observation** (`observation.rs`): the audit journal records.
//! - **Error** (`error.rs`): [`PoolError`] and [`TransferError`].
//!
//! ## Re-entrancy
//!
//! Settlement clears the slot (and records the winner) before calling the
//! ledger. The registry is driven through `&mut self`, so a ledger cannot
//! call back into the registry mid-settlement; the ordering still holds for
//! hosts that wrap the registry in a lock and expose it to the ledger.

pub mod environment;
pub mod error;
pub mod ledger;
pub mod observation;
pub mod registry;

pub use environment::{
    AdminGate, Clock, EntropySource, Environment, ManualClock, ManualEntropy, OsEntropy,
    OwnerGate, SystemClock,
};
pub use error::{PoolError, SettlementLeg, TransferError};
pub use ledger::{AssetLedger, InMemoryLedger};
pub use observation::{Observation, ObservationKind};
pub use registry::{JoinReceipt, PoolRegistry};
