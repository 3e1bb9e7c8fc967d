//! # Registry Errors
//!
//! Every error is reported synchronously to the caller of the failing
//! operation and nothing is retried here. All variants except
//! `SettlementTransferFailed` guarantee that registry state is exactly as it
//! was before the call.

use thiserror::Error;

use potdraw_core::{AccountId, Amount, CoreError, PoolType, Timestamp};
use potdraw_settlement::{Outcome, SettlementError};

/// Failure reported by an [`AssetLedger`](crate::ledger::AssetLedger).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The source account does not hold enough.
    #[error("insufficient balance on {account}: need {needed}, have {available}")]
    InsufficientBalance {
        /// Debited account.
        account: AccountId,
        /// Requested amount.
        needed: Amount,
        /// Current balance.
        available: Amount,
    },

    /// The spender is not approved for enough.
    #[error("insufficient allowance from {owner} to {spender}: need {needed}, have {available}")]
    InsufficientAllowance {
        /// Account whose funds are moved.
        owner: AccountId,
        /// Account moving them.
        spender: AccountId,
        /// Requested amount.
        needed: Amount,
        /// Approved amount.
        available: Amount,
    },

    /// The receiving account refused the transfer.
    #[error("recipient {account} rejected the transfer")]
    RecipientRejected {
        /// Refusing account.
        account: AccountId,
    },

    /// Crediting would overflow the recipient's balance.
    #[error("balance overflow on {account}")]
    BalanceOverflow {
        /// Credited account.
        account: AccountId,
    },
}

/// The asset movement that failed during a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementLeg {
    /// Refund to the sole participant.
    Refund,
    /// Prize to the winner.
    Prize,
    /// Fee to the fee recipient.
    Fee,
}

impl std::fmt::Display for SettlementLeg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Refund => "refund",
            Self::Prize => "prize",
            Self::Fee => "fee",
        };
        f.write_str(s)
    }
}

/// Errors returned by [`PoolRegistry`](crate::registry::PoolRegistry).
#[derive(Error, Debug)]
pub enum PoolError {
    /// Deposit is zero, above the cap, would overflow the pool total, or
    /// comes from the custody account itself.
    #[error("invalid amount {amount} for {pool_type}: {reason}")]
    InvalidAmount {
        /// Target pool.
        pool_type: PoolType,
        /// Rejected amount.
        amount: Amount,
        /// Why it was rejected.
        reason: String,
    },

    /// The ledger rejected a deposit. Nothing changed.
    #[error("deposit into {pool_type} failed: {source}")]
    TransferFailed {
        /// Target pool.
        pool_type: PoolType,
        /// Ledger failure.
        #[source]
        source: TransferError,
    },

    /// The pool has never armed (or holds nothing, for reclaim).
    #[error("{pool_type} has not started")]
    NotStarted {
        /// Target pool.
        pool_type: PoolType,
    },

    /// The pool's timer has not elapsed yet.
    #[error("{pool_type} timer not elapsed (now {now}, eligible at {})", display_deadline(.eligible_at))]
    TimerNotElapsed {
        /// Target pool.
        pool_type: PoolType,
        /// Time of the call.
        now: Timestamp,
        /// Earliest eligible time, if representable.
        eligible_at: Option<Timestamp>,
    },

    /// Reclaim was attempted on a pool that has armed; use finalize.
    #[error("{pool_type} is armed; settle it with finalize")]
    AlreadyArmed {
        /// Target pool.
        pool_type: PoolType,
    },

    /// Caller is not permitted to change configuration.
    #[error("{caller} is not authorized for administrative calls")]
    Unauthorized {
        /// Rejected caller.
        caller: AccountId,
    },

    /// Proposed configuration is out of bounds.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[source] CoreError),

    /// The pool was cleared but paying out failed. The round is no longer
    /// queryable; `outcome` and `leg` carry what is needed to reconcile.
    #[error("settlement of {pool_type} failed on {leg} leg after clearing ({outcome}): {source}")]
    SettlementTransferFailed {
        /// Settled pool.
        pool_type: PoolType,
        /// What the round should have paid.
        outcome: Outcome,
        /// The movement that failed. Earlier legs completed.
        leg: SettlementLeg,
        /// Ledger failure.
        #[source]
        source: TransferError,
    },

    /// Settlement logic failed before any state changed.
    #[error("settlement error: {0}")]
    Settlement(#[from] SettlementError),
}

fn display_deadline(eligible_at: &Option<Timestamp>) -> String {
    match eligible_at {
        Some(t) => t.to_string(),
        None => "never".to_string(),
    }
}
