//! # Error Types
//!
//! Validation errors for the foundational types. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Pool lifecycle errors live in `potdraw-registry`; this module only
//! covers failures that can happen while constructing core values.

use thiserror::Error;

/// Top-level error type for `potdraw-core`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// An account identifier failed validation.
    #[error("invalid account id {value:?}: {reason}")]
    InvalidAccount {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A timestamp could not be constructed or parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A configuration value is outside its permitted range.
    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Expected range and actual value.
        reason: String,
    },

    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A configuration document could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
