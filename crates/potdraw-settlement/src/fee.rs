//! Fee split for awarded pools.
//!
//! `fee = floor(total * fee_percent / 100)`, `prize = total - fee`.
//! The product is computed in `u128` so no total can overflow, and the
//! prize is the exact remainder, so `fee + prize == total` always holds.

use serde::{Deserialize, Serialize};

use potdraw_core::Amount;

/// Division of a pool total between winner and fee recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    /// Fee portion.
    pub fee: Amount,
    /// Winner portion.
    pub prize: Amount,
}

/// Split `total` at `fee_percent` percent. Percentages above 100 are
/// treated as 100.
#[inline]
pub fn split_fee(total: Amount, fee_percent: u8) -> FeeSplit {
    let pct = u128::from(fee_percent.min(100));
    let fee = u128::from(total) * pct / 100;
    // fee <= total, so the conversion cannot fail.
    let fee = Amount::try_from(fee).unwrap_or(total);
    FeeSplit {
        fee,
        prize: total - fee,
    }
}
