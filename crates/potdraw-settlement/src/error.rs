use thiserror::Error;

use potdraw_core::CanonicalizationError;

/// Errors raised by pure settlement logic.
#[derive(Error, Debug)]
pub enum SettlementError {
    /// Settlement or selection was asked to operate on a pool with no
    /// participants.
    #[error("pool has no participants")]
    EmptyPool,

    /// Accepting the deposit would overflow the pool's running total.
    #[error("deposit of {amount} would overflow pool total {total}")]
    DepositOverflow {
        /// Current running total.
        total: u64,
        /// Rejected deposit.
        amount: u64,
    },

    /// The draw preimage could not be canonicalized.
    #[error("draw preimage: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}
