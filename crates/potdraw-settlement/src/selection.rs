//! # Winner Selection
//!
//! ```text
//! preimage = JCS({"participants": [..], "seed": hex(seed), "timestamp": epoch_secs})
//! digest   = SHA-256(preimage)
//! index    = uint256_be(digest) mod participants.len()
//! ```
//!
//! The participant list is part of the preimage, so the draw is bound to
//! who joined and in what order, not only to the block-level inputs.
//!
//! Reduction is a plain modulo. For `n` participants the lowest
//! `2^256 mod n` indices get one extra preimage out of `2^256`; this bias is
//! accepted. Given the same inputs the index is always the same, which is
//! what lets a third party recompute and audit a draw.

use serde::{Deserialize, Serialize};

use potdraw_core::{sha256_digest, AccountId, CanonicalBytes, ContentDigest, Seed, Timestamp};

use crate::error::SettlementError;

/// Inputs that are unknown to participants when they join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawInputs {
    /// Time of the settling call.
    pub timestamp: Timestamp,
    /// Per-call seed from the entropy source.
    pub seed: Seed,
}

/// A reproducible draw result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Index into the participant list.
    pub index: usize,
    /// Digest the index was reduced from.
    pub digest: ContentDigest,
}

#[derive(Serialize)]
struct DrawPreimage<'a> {
    participants: &'a [AccountId],
    seed: String,
    timestamp: i64,
}

/// SHA-256 of the canonical draw preimage.
pub fn draw_digest(
    inputs: &DrawInputs,
    participants: &[AccountId],
) -> Result<ContentDigest, SettlementError> {
    let preimage = DrawPreimage {
        participants,
        seed: inputs.seed.to_hex(),
        timestamp: inputs.timestamp.epoch_secs(),
    };
    let canonical = CanonicalBytes::new(&preimage)?;
    Ok(sha256_digest(&canonical))
}

/// Select a winning index from `participants`.
pub fn select_winner(
    inputs: &DrawInputs,
    participants: &[AccountId],
) -> Result<Selection, SettlementError> {
    if participants.is_empty() {
        return Err(SettlementError::EmptyPool);
    }
    let digest = draw_digest(inputs, participants)?;
    let modulus = u64::try_from(participants.len()).map_err(|_| SettlementError::EmptyPool)?;
    let index = digest
        .reduce_mod(modulus)
        .and_then(|i| usize::try_from(i).ok())
        .ok_or(SettlementError::EmptyPool)?;
    Ok(Selection { index, digest })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Same inputs, same index; index always in range.
        #[test]
        fn selection_deterministic_and_in_range(
            names in prop::collection::vec("[a-z]{1,8}", 1..20),
            secs in 0i64..4_000_000_000,
            seed in any::<[u8; 32]>(),
        ) {
            let people: Vec<AccountId> =
                names.iter().map(|n| AccountId::new(n.as_str()).unwrap()).collect();
            let inputs = DrawInputs {
                timestamp: Timestamp::from_epoch_secs(secs).unwrap(),
                seed: Seed(seed),
            };
            let a = select_winner(&inputs, &people).unwrap();
            let b = select_winner(&inputs, &people).unwrap();
            prop_assert_eq!(a, b);
            prop_assert!(a.index < people.len());
        }
    }
}
