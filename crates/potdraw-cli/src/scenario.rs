//! # Scenario Replay
//!
//! A scenario is a YAML document describing one registry's life: its
//! configuration, owner, custody account, funded accounts, and an ordered
//! list of steps. Replay runs the steps against [`InMemoryLedger`], a
//! [`ManualClock`] and a [`ManualEntropy`], so the same file always
//! produces the same journal.
//!
//! ```yaml
//! owner: owner
//! start: "2024-01-01T00:00:00Z"
//! seed: "1111111111111111111111111111111111111111111111111111111111111111"
//! config:
//!   fee_percent: 10
//!   timer_duration_secs: 30
//!   max_deposit: 1000
//!   fee_recipient: treasury
//! accounts:
//!   alice: 100
//!   bob: 200
//! steps:
//!   - join: { pool: 1, amount: 100, from: alice }
//!   - join: { pool: 1, amount: 200, from: bob }
//!   - advance: 30
//!   - finalize: { pool: 1, caller: keeper }
//! ```
//!
//! Funded accounts approve the custody account for their full balance.
//! When `seed` is omitted one is drawn from the OS and logged, so the run
//! can be repeated.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use potdraw_core::{AccountId, Amount, PoolConfig, PoolType, Seed, Timestamp};
use potdraw_registry::{
    AssetLedger, EntropySource, Environment, InMemoryLedger, ManualClock, ManualEntropy,
    OsEntropy, OwnerGate, PoolRegistry,
};

/// Default start time when a scenario does not give one.
pub const DEFAULT_START: &str = "2024-01-01T00:00:00Z";

/// Custody account name when a scenario does not give one.
pub const DEFAULT_CUSTODY: &str = "custody";

fn default_start() -> String {
    DEFAULT_START.to_string()
}

/// A replayable scenario document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Pool configuration. Falls back to the `--config` file when absent.
    #[serde(default)]
    pub config: Option<PoolConfig>,
    /// Account allowed to make administrative calls.
    pub owner: AccountId,
    /// Account holding pooled deposits.
    #[serde(default)]
    pub custody: Option<AccountId>,
    /// Initial clock value, RFC 3339 UTC.
    #[serde(default = "default_start")]
    pub start: String,
    /// Initial draw seed.
    #[serde(default)]
    pub seed: Option<Seed>,
    /// Opening balances, each fully approved to the custody account.
    #[serde(default)]
    pub accounts: BTreeMap<AccountId, Amount>,
    /// Steps, applied in order.
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Parse a scenario from YAML.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).context("failed to parse scenario YAML")
    }
}

/// One scenario step.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    /// Deposit into a pool.
    Join {
        pool: PoolType,
        amount: Amount,
        from: AccountId,
    },
    /// Move the clock forward by this many seconds.
    Advance(u64),
    /// Settle an armed pool.
    Finalize { pool: PoolType, caller: AccountId },
    /// Refund a lone participant after the reclaim timeout.
    Reclaim { pool: PoolType, caller: AccountId },
    /// Change the fee percentage.
    UpdateFee { caller: AccountId, fee_percent: u8 },
    /// Change the timer duration.
    UpdateTimer { caller: AccountId, secs: u64 },
    /// Change the fee recipient.
    UpdateFeeRecipient {
        caller: AccountId,
        recipient: AccountId,
    },
    /// Replace the seed used by later draws.
    Reseed(Seed),
    /// Credit an account and approve custody for the amount.
    Fund { account: AccountId, amount: Amount },
    /// Make an account refuse incoming transfers.
    Block(AccountId),
    /// Undo `block`.
    Unblock(AccountId),
}

impl Step {
    /// Short name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Advance(_) => "advance",
            Self::Finalize { .. } => "finalize",
            Self::Reclaim { .. } => "reclaim",
            Self::UpdateFee { .. } => "update_fee",
            Self::UpdateTimer { .. } => "update_timer",
            Self::UpdateFeeRecipient { .. } => "update_fee_recipient",
            Self::Reseed(_) => "reseed",
            Self::Fund { .. } => "fund",
            Self::Block(_) => "block",
            Self::Unblock(_) => "unblock",
        }
    }
}

/// A step that was rejected, by the registry or by the ledger.
#[derive(Debug)]
pub struct StepFailure {
    /// Zero-based position in `steps`.
    pub index: usize,
    /// Step name.
    pub step: &'static str,
    /// Why it failed. Registry rejections downcast to
    /// [`PoolError`](potdraw_registry::PoolError).
    pub error: anyhow::Error,
}

impl std::fmt::Display for StepFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step {} ({}): {:#}", self.index, self.step, self.error)
    }
}

/// The registry after replay, with every rejected step.
#[derive(Debug)]
pub struct Replay {
    /// Final registry state, including the observation journal.
    pub registry: PoolRegistry<InMemoryLedger>,
    /// Rejected steps, in order.
    pub failures: Vec<StepFailure>,
}

/// Replay `scenario`.
///
/// `fallback_config` is used when the scenario carries no `config`. With
/// `strict`, the first rejected step aborts the replay; otherwise it is
/// logged, recorded in [`Replay::failures`], and replay continues.
pub fn replay(
    scenario: &Scenario,
    fallback_config: Option<PoolConfig>,
    strict: bool,
) -> Result<Replay> {
    let config = scenario
        .config
        .clone()
        .or(fallback_config)
        .context("scenario has no config section and no --config file was given")?;
    let start = Timestamp::parse(&scenario.start)
        .with_context(|| format!("invalid scenario start time: {}", scenario.start))?;
    let custody = match &scenario.custody {
        Some(custody) => custody.clone(),
        None => AccountId::new(DEFAULT_CUSTODY)?,
    };
    let seed = match scenario.seed {
        Some(seed) => seed,
        None => {
            let seed = OsEntropy.seed();
            tracing::info!(seed = %seed.to_hex(), "no seed given, drew one from the OS");
            seed
        }
    };

    let clock = Arc::new(ManualClock::new(start));
    let entropy = Arc::new(ManualEntropy::new(seed));
    let env = Environment::new(
        clock.clone(),
        entropy.clone(),
        Arc::new(OwnerGate::new(scenario.owner.clone())),
    );
    let mut registry = PoolRegistry::new(config, custody, InMemoryLedger::new(), env)
        .context("invalid pool configuration")?;

    for (account, amount) in &scenario.accounts {
        fund(&mut registry, account, *amount)?;
    }

    let mut failures = Vec::new();
    for (index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!(index, step = step.name(), "applying step");
        if let Err(error) = apply(&mut registry, &clock, &entropy, step) {
            let failure = StepFailure {
                index,
                step: step.name(),
                error,
            };
            if strict {
                return Err(anyhow!("{failure}"));
            }
            tracing::warn!(%failure, "step rejected");
            failures.push(failure);
        }
    }

    Ok(Replay { registry, failures })
}

fn apply(
    registry: &mut PoolRegistry<InMemoryLedger>,
    clock: &ManualClock,
    entropy: &ManualEntropy,
    step: &Step,
) -> Result<()> {
    match step {
        Step::Join { pool, amount, from } => {
            registry.join(*pool, *amount, from)?;
        }
        Step::Advance(secs) => {
            clock.advance(*secs);
        }
        Step::Finalize { pool, caller } => {
            registry.finalize(*pool, caller)?;
        }
        Step::Reclaim { pool, caller } => {
            registry.reclaim(*pool, caller)?;
        }
        Step::UpdateFee { caller, fee_percent } => registry.update_fee(caller, *fee_percent)?,
        Step::UpdateTimer { caller, secs } => registry.update_timer_duration(caller, *secs)?,
        Step::UpdateFeeRecipient { caller, recipient } => {
            registry.update_fee_recipient(caller, recipient.clone())?
        }
        Step::Reseed(seed) => entropy.set(*seed),
        Step::Fund { account, amount } => fund(registry, account, *amount)?,
        Step::Block(account) => registry.ledger_mut().block_recipient(account),
        Step::Unblock(account) => registry.ledger_mut().unblock_recipient(account),
    }
    Ok(())
}

fn fund(
    registry: &mut PoolRegistry<InMemoryLedger>,
    account: &AccountId,
    amount: Amount,
) -> Result<()> {
    let custody = registry.custody().clone();
    let ledger = registry.ledger_mut();
    ledger
        .mint(account, amount)
        .with_context(|| format!("failed to fund {account}"))?;
    let allowance = ledger.allowance(account, &custody);
    ledger.approve(account, &custody, allowance.saturating_add(amount));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use potdraw_registry::{ObservationKind, PoolError, TransferError};
    use potdraw_settlement::Outcome;

    const TWO_PLAYERS: &str = r#"
owner: owner
seed: "1111111111111111111111111111111111111111111111111111111111111111"
config:
  fee_percent: 10
  timer_duration_secs: 30
  max_deposit: 1000
  fee_recipient: treasury
accounts:
  alice: 100
  bob: 200
steps:
  - join: { pool: 1, amount: 100, from: alice }
  - join: { pool: 1, amount: 200, from: bob }
  - finalize: { pool: 1, caller: keeper }
  - advance: 30
  - finalize: { pool: 1, caller: keeper }
"#;

    fn account(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    fn pool_error(failure: &StepFailure) -> &PoolError {
        failure.error.downcast_ref::<PoolError>().unwrap()
    }

    #[test]
    fn test_parse_steps() {
        let scenario = Scenario::from_yaml_str(TWO_PLAYERS).unwrap();
        assert_eq!(scenario.steps.len(), 5);
        assert_eq!(scenario.steps[3].name(), "advance");
        assert!(matches!(scenario.steps[3], Step::Advance(30)));
        assert_eq!(scenario.accounts.get(&account("alice")), Some(&100));
        assert!(scenario.custody.is_none());
    }

    #[test]
    fn test_unknown_step_rejected() {
        let doc = "owner: owner\nsteps:\n  - teleport: 5\n";
        assert!(Scenario::from_yaml_str(doc).is_err());
    }

    #[test]
    fn test_replay_two_players() {
        let scenario = Scenario::from_yaml_str(TWO_PLAYERS).unwrap();
        let replay = replay(&scenario, None, false).unwrap();

        // The early finalize is rejected and recorded.
        assert_eq!(replay.failures.len(), 1);
        assert_eq!(replay.failures[0].index, 2);
        assert!(matches!(
            pool_error(&replay.failures[0]),
            PoolError::TimerNotElapsed { .. }
        ));

        let registry = &replay.registry;
        let kinds: Vec<_> = registry.observations().iter().map(|o| o.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ObservationKind::Joined,
                ObservationKind::Joined,
                ObservationKind::Won,
                ObservationKind::FeeTaken,
            ]
        );
        let winner = registry.last_winner(PoolType(1)).unwrap();
        assert_eq!(registry.ledger().balance_of(winner), 270);
        assert_eq!(registry.ledger().balance_of(&account("treasury")), 30);
        assert_eq!(registry.custody(), &account("custody"));
    }

    #[test]
    fn test_replay_strict_aborts() {
        let scenario = Scenario::from_yaml_str(TWO_PLAYERS).unwrap();
        let err = replay(&scenario, None, true).unwrap_err();
        assert!(err.to_string().contains("step 2 (finalize)"));
    }

    #[test]
    fn test_replay_is_deterministic() {
        let scenario = Scenario::from_yaml_str(TWO_PLAYERS).unwrap();
        let a = replay(&scenario, None, false).unwrap();
        let b = replay(&scenario, None, false).unwrap();
        assert_eq!(a.registry.observations(), b.registry.observations());
    }

    #[test]
    fn test_replay_uses_fallback_config() {
        let doc = r#"
owner: owner
accounts: { alice: 50 }
steps:
  - join: { pool: 2, amount: 50, from: alice }
  - advance: 86400
  - reclaim: { pool: 2, caller: alice }
"#;
        let scenario = Scenario::from_yaml_str(doc).unwrap();
        assert!(replay(&scenario, None, false).is_err());

        let config = PoolConfig::new(5, 60, 500, account("treasury")).unwrap();
        let replay = replay(&scenario, Some(config), true).unwrap();
        assert!(replay.failures.is_empty());
        let last = replay.registry.observations().last().unwrap();
        assert_eq!(last.kind, ObservationKind::Refunded);
        assert_eq!(replay.registry.ledger().balance_of(&account("alice")), 50);
    }

    #[test]
    fn test_replay_blocked_fee_recipient() {
        let doc = r#"
owner: owner
seed: "0x2222222222222222222222222222222222222222222222222222222222222222"
config: { fee_percent: 10, timer_duration_secs: 10, max_deposit: 100, fee_recipient: treasury }
accounts: { alice: 100, bob: 100 }
steps:
  - block: treasury
  - join: { pool: 1, amount: 100, from: alice }
  - join: { pool: 1, amount: 100, from: bob }
  - advance: 10
  - finalize: { pool: 1, caller: alice }
"#;
        let scenario = Scenario::from_yaml_str(doc).unwrap();
        let replay = replay(&scenario, None, false).unwrap();
        assert_eq!(replay.failures.len(), 1);
        match pool_error(&replay.failures[0]) {
            PoolError::SettlementTransferFailed { outcome, .. } => {
                assert!(matches!(outcome, Outcome::Award { prize: 180, fee: 20, .. }));
            }
            other => panic!("unexpected failure {other:?}"),
        }
        assert!(replay.registry.pool(PoolType(1)).is_none());
    }

    #[test]
    fn test_replay_admin_steps() {
        let doc = r#"
owner: owner
config: { fee_percent: 10, timer_duration_secs: 30, max_deposit: 100, fee_recipient: treasury }
steps:
  - update_fee: { caller: mallory, fee_percent: 1 }
  - update_fee: { caller: owner, fee_percent: 2 }
  - update_timer: { caller: owner, secs: 45 }
  - update_fee_recipient: { caller: owner, recipient: vault }
  - fund: { account: carol, amount: 7 }
"#;
        let scenario = Scenario::from_yaml_str(doc).unwrap();
        let replay = replay(&scenario, None, false).unwrap();
        assert_eq!(replay.failures.len(), 1);
        assert!(matches!(
            pool_error(&replay.failures[0]),
            PoolError::Unauthorized { .. }
        ));
        let config = replay.registry.config();
        assert_eq!(config.fee_percent, 2);
        assert_eq!(config.timer_duration_secs, 45);
        assert_eq!(config.fee_recipient, account("vault"));
        let ledger = replay.registry.ledger();
        assert_eq!(ledger.balance_of(&account("carol")), 7);
        assert_eq!(ledger.allowance(&account("carol"), &account("custody")), 7);
    }

    #[test]
    fn test_replay_records_failed_fund_and_continues() {
        let doc = r#"
owner: owner
config: { fee_percent: 0, timer_duration_secs: 10, max_deposit: 100, fee_recipient: treasury }
accounts: { alice: 10 }
steps:
  - fund: { account: alice, amount: 18446744073709551615 }
  - join: { pool: 1, amount: 10, from: alice }
"#;
        let scenario = Scenario::from_yaml_str(doc).unwrap();
        let replay = replay(&scenario, None, false).unwrap();
        assert_eq!(replay.failures.len(), 1);
        assert_eq!(replay.failures[0].step, "fund");
        assert!(matches!(
            replay.failures[0].error.downcast_ref::<TransferError>(),
            Some(TransferError::BalanceOverflow { .. })
        ));
        // The join after the failed fund still ran.
        assert_eq!(replay.registry.participants(PoolType(1)), &[account("alice")]);

        let err = super::replay(&scenario, None, true).unwrap_err();
        assert!(err.to_string().contains("step 0 (fund)"));
    }
}
