//! # Identity Newtypes
//!
//! `PoolType` names a pool slot that is reused for many sequential rounds.
//! `AccountId` names a ledger account: a participant, the custody account,
//! the fee recipient or the administrator.
//!
//! Account identifiers take part in the draw digest, so their textual form
//! must be stable. Construction rejects empty strings, whitespace and
//! control characters, and anything longer than [`AccountId::MAX_LEN`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Opaque identifier of a pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolType(pub u64);

impl std::fmt::Display for PoolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pool:{}", self.0)
    }
}

/// Identifier of a ledger account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Maximum accepted length in bytes.
    pub const MAX_LEN: usize = 128;

    /// Validate and wrap an account identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        if value.is_empty() {
            return Err(CoreError::InvalidAccount {
                value,
                reason: "must not be empty",
            });
        }
        if value.len() > Self::MAX_LEN {
            return Err(CoreError::InvalidAccount {
                value,
                reason: "longer than 128 bytes",
            });
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(CoreError::InvalidAccount {
                value,
                reason: "contains whitespace or control characters",
            });
        }
        Ok(Self(value))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl std::str::FromStr for AccountId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
