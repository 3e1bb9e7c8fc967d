//! # Content Digest and Draw Seed
//!
//! `ContentDigest` is a 256-bit SHA-256 output computed from
//! `CanonicalBytes`. `Seed` is the 32-byte value supplied by the entropy
//! source for each draw.
//!
//! ## Security Invariant
//!
//! `sha256_digest()` accepts only `&CanonicalBytes`, so every digest in
//! the system is computed over the canonical encoding of its inputs.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::CoreError;

/// A 256-bit SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The raw 32-byte digest value, big-endian.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Wrap raw digest bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        to_hex(&self.bytes)
    }

    /// Interpret the digest as a 256-bit big-endian unsigned integer and
    /// return it modulo `modulus`. Returns `None` for a zero modulus.
    ///
    /// The reduction is exact over all 256 bits. It carries the usual
    /// modulo bias of `2^256 mod modulus` extra preimages for the lowest
    /// residues, which is negligible for any realistic participant count.
    pub fn reduce_mod(&self, modulus: u64) -> Option<u64> {
        if modulus == 0 {
            return None;
        }
        let m = u128::from(modulus);
        let rem = self
            .bytes
            .iter()
            .fold(0u128, |acc, byte| ((acc << 8) | u128::from(*byte)) % m);
        u64::try_from(rem).ok()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute a SHA-256 digest from canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(bytes)
}

/// A 32-byte per-draw seed from the entropy source.
///
/// Serializes as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Seed(pub [u8; 32]);

impl Seed {
    /// Decode a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 64 {
            return Err(CoreError::InvalidHex(format!(
                "seed must be 64 hex characters, got {}",
                s.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| CoreError::InvalidHex(s.to_string()))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| CoreError::InvalidHex(format!("bad byte {pair:?}")))?;
        }
        Ok(Self(bytes))
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }
}

impl TryFrom<String> for Seed {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Seed> for String {
    fn from(seed: Seed) -> Self {
        seed.to_hex()
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
