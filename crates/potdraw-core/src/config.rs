//! # Pool Configuration
//!
//! Process-wide parameters shared by every pool in a registry. The value is
//! validated on construction and on every administrative update, so holders
//! of a `PoolConfig` may assume the bounds below.
//!
//! | field                 | bound                               |
//! |-----------------------|-------------------------------------|
//! | `fee_percent`         | `0..=10`                            |
//! | `timer_duration_secs` | `>= 10`                             |
//! | `max_deposit`         | `> 0`                               |
//! | `reclaim_after_secs`  | `>= timer_duration_secs`            |

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::identity::AccountId;
use crate::Amount;

/// Upper bound (inclusive) on the service fee, in percent.
pub const MAX_FEE_PERCENT: u8 = 10;

/// Lower bound (inclusive) on the settlement timer.
pub const MIN_TIMER_DURATION_SECS: u64 = 10;

/// Default wait before a lone participant may reclaim a deposit.
pub const DEFAULT_RECLAIM_AFTER_SECS: u64 = 86_400;

/// Validated registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolConfig {
    /// Service fee taken from an awarded pool, in whole percent.
    pub fee_percent: u8,
    /// Seconds between arming and settlement eligibility.
    pub timer_duration_secs: u64,
    /// Cap on the amount of a single join.
    pub max_deposit: Amount,
    /// Account credited with the fee portion of an award.
    pub fee_recipient: AccountId,
    /// Seconds after the first deposit before a never-armed pool may be
    /// reclaimed by its sole participant.
    #[serde(default = "default_reclaim_after_secs")]
    pub reclaim_after_secs: u64,
}

fn default_reclaim_after_secs() -> u64 {
    DEFAULT_RECLAIM_AFTER_SECS
}

impl PoolConfig {
    /// Build and validate a configuration. `reclaim_after_secs` starts at
    /// the larger of the default and the timer duration.
    pub fn new(
        fee_percent: u8,
        timer_duration_secs: u64,
        max_deposit: Amount,
        fee_recipient: AccountId,
    ) -> Result<Self, CoreError> {
        let config = Self {
            fee_percent,
            timer_duration_secs,
            max_deposit,
            fee_recipient,
            reclaim_after_secs: DEFAULT_RECLAIM_AFTER_SECS.max(timer_duration_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the reclaim timeout, re-validating.
    pub fn with_reclaim_after(mut self, secs: u64) -> Result<Self, CoreError> {
        self.reclaim_after_secs = secs;
        self.validate()?;
        Ok(self)
    }

    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(s: &str) -> Result<Self, CoreError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every bound.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_fee_percent(self.fee_percent)?;
        check_timer_duration(self.timer_duration_secs)?;
        if self.max_deposit == 0 {
            return Err(CoreError::InvalidConfig {
                field: "max_deposit",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.reclaim_after_secs < self.timer_duration_secs {
            return Err(CoreError::InvalidConfig {
                field: "reclaim_after_secs",
                reason: format!(
                    "must be >= timer_duration_secs ({}), got {}",
                    self.timer_duration_secs, self.reclaim_after_secs
                ),
            });
        }
        Ok(())
    }
}

/// Bounds check for a fee update.
pub fn check_fee_percent(fee_percent: u8) -> Result<(), CoreError> {
    if fee_percent > MAX_FEE_PERCENT {
        return Err(CoreError::InvalidConfig {
            field: "fee_percent",
            reason: format!("must be <= {MAX_FEE_PERCENT}, got {fee_percent}"),
        });
    }
    Ok(())
}

/// Bounds check for a timer update.
pub fn check_timer_duration(secs: u64) -> Result<(), CoreError> {
    if secs < MIN_TIMER_DURATION_SECS {
        return Err(CoreError::InvalidConfig {
            field: "timer_duration_secs",
            reason: format!("must be >= {MIN_TIMER_DURATION_SECS}, got {secs}"),
        });
    }
    Ok(())
}
