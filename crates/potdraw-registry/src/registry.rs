//! # Pool Registry
//!
//! Owns every pool slot, the last winner of each slot, the configuration,
//! and the observation journal. All state changes go through `&mut self`,
//! so operations on a registry are serialized and each one is a single
//! atomic transition.
//!
//! ## Call ordering
//!
//! ```text
//! join      validate ─▶ transfer_from ─▶ admit (maybe arm) ─▶ record Joined
//! finalize  validate ─▶ settle ─▶ clear + LastWinner ─▶ transfers ─▶ record
//! reclaim   validate ─▶ settle ─▶ clear ─▶ transfer ─▶ record Refunded
//! ```
//!
//! A join mutates nothing until the ledger has accepted the deposit. A
//! settlement clears the slot before any outgoing transfer so the same
//! round can never be paid twice; if a transfer then fails the caller gets
//! `SettlementTransferFailed` with the outcome and the failed leg.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use potdraw_core::{
    check_fee_percent, check_timer_duration, AccountId, Amount, PoolConfig, PoolType, Timestamp,
};
use potdraw_settlement::{
    is_eligible, DrawInputs, Outcome, Pool, PoolPhase, SettlementEngine,
};

use crate::environment::Environment;
use crate::error::{PoolError, SettlementLeg};
use crate::ledger::AssetLedger;
use crate::observation::{Observation, ObservationKind};

/// Result of an accepted join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinReceipt {
    /// Target pool.
    pub pool_type: PoolType,
    /// Participant count after this join.
    pub participants: usize,
    /// Pool total after this join.
    pub total_deposited: Amount,
    /// Whether this join armed the timer.
    pub armed: bool,
}

/// Shared empty slice for unknown pools.
const NO_PARTICIPANTS: &[AccountId] = &[];

/// Pool slots, winners and configuration, settled through an asset ledger.
#[derive(Debug)]
pub struct PoolRegistry<L: AssetLedger> {
    config: PoolConfig,
    custody: AccountId,
    ledger: L,
    env: Environment,
    engine: SettlementEngine,
    pools: BTreeMap<PoolType, Pool>,
    last_winners: BTreeMap<PoolType, AccountId>,
    journal: Vec<Observation>,
}

impl<L: AssetLedger> PoolRegistry<L> {
    /// Create a registry holding deposits in `custody` on `ledger`.
    pub fn new(
        config: PoolConfig,
        custody: AccountId,
        ledger: L,
        env: Environment,
    ) -> Result<Self, PoolError> {
        config.validate().map_err(PoolError::InvalidConfig)?;
        tracing::info!(
            custody = %custody,
            fee_percent = config.fee_percent,
            timer_duration_secs = config.timer_duration_secs,
            max_deposit = config.max_deposit,
            "pool registry created"
        );
        Ok(Self {
            config,
            custody,
            ledger,
            env,
            engine: SettlementEngine::new(),
            pools: BTreeMap::new(),
            last_winners: BTreeMap::new(),
            journal: Vec::new(),
        })
    }

    // ── Entry points ─────────────────────────────────────────────────

    /// Deposit `amount` from `caller` into `pool_type`.
    ///
    /// The second participant of a round arms its timer.
    pub fn join(
        &mut self,
        pool_type: PoolType,
        amount: Amount,
        caller: &AccountId,
    ) -> Result<JoinReceipt, PoolError> {
        if let Err(err) = self.check_deposit(pool_type, amount, caller) {
            tracing::warn!(%pool_type, %caller, amount, error = %err, "join rejected");
            return Err(err);
        }

        if let Err(source) = self
            .ledger
            .transfer_from(&self.custody, caller, &self.custody, amount)
        {
            tracing::warn!(%pool_type, %caller, amount, error = %source, "deposit transfer failed");
            return Err(PoolError::TransferFailed { pool_type, source });
        }

        let now = self.env.clock.now();
        let duration = self.config.timer_duration_secs;
        let pool = self.pools.entry(pool_type).or_default();
        let armed = pool.admit(caller.clone(), amount, now, duration)?;
        let receipt = JoinReceipt {
            pool_type,
            participants: pool.participants().len(),
            total_deposited: pool.total_deposited(),
            armed,
        };

        if armed {
            tracing::info!(%pool_type, start_time = %now, duration_secs = duration, "pool armed");
        }
        self.record(ObservationKind::Joined, pool_type, caller.clone(), amount, now);
        Ok(receipt)
    }

    /// Settle an armed pool whose timer has elapsed. Any caller may do so.
    pub fn finalize(
        &mut self,
        pool_type: PoolType,
        caller: &AccountId,
    ) -> Result<Outcome, PoolError> {
        let now = self.env.clock.now();
        let pool = match self.pools.get(&pool_type) {
            Some(pool) => pool,
            None => return Err(self.rejected(PoolError::NotStarted { pool_type }, caller)),
        };
        let timer = match pool.timer() {
            Some(timer) => *timer,
            None => return Err(self.rejected(PoolError::NotStarted { pool_type }, caller)),
        };
        if !is_eligible(timer.start_time, timer.duration_secs, now) {
            let err = PoolError::TimerNotElapsed {
                pool_type,
                now,
                eligible_at: timer.deadline(),
            };
            return Err(self.rejected(err, caller));
        }

        let inputs = DrawInputs {
            timestamp: now,
            seed: self.env.entropy.seed(),
        };
        let outcome = self.engine.settle(pool, &self.config, &inputs)?;

        let round = self.pools.remove(&pool_type).unwrap_or_default();
        if let Outcome::Award { winner, .. } = &outcome {
            self.last_winners.insert(pool_type, winner.clone());
        }
        tracing::info!(
            %pool_type,
            %caller,
            participants = round.participants().len(),
            total = round.total_deposited(),
            %outcome,
            "pool settled"
        );

        self.pay_out(pool_type, &outcome, now)?;
        Ok(outcome)
    }

    /// Refund the sole participant of a pool that never armed, once
    /// `reclaim_after_secs` have passed since its first deposit.
    pub fn reclaim(
        &mut self,
        pool_type: PoolType,
        caller: &AccountId,
    ) -> Result<Outcome, PoolError> {
        let now = self.env.clock.now();
        let pool = match self.pools.get(&pool_type) {
            Some(pool) if !pool.is_empty() => pool,
            _ => return Err(self.rejected(PoolError::NotStarted { pool_type }, caller)),
        };
        if pool.is_armed() {
            return Err(self.rejected(PoolError::AlreadyArmed { pool_type }, caller));
        }
        let opened_at = match pool.opened_at() {
            Some(t) => t,
            None => return Err(self.rejected(PoolError::NotStarted { pool_type }, caller)),
        };
        let wait = self.config.reclaim_after_secs;
        if !is_eligible(opened_at, wait, now) {
            let err = PoolError::TimerNotElapsed {
                pool_type,
                now,
                eligible_at: opened_at.checked_add_secs(wait),
            };
            return Err(self.rejected(err, caller));
        }

        let inputs = DrawInputs {
            timestamp: now,
            seed: self.env.entropy.seed(),
        };
        let outcome = self.engine.settle(pool, &self.config, &inputs)?;
        self.pools.remove(&pool_type);
        tracing::info!(%pool_type, %caller, %outcome, "lone deposit reclaimed");

        self.pay_out(pool_type, &outcome, now)?;
        Ok(outcome)
    }

    // ── Administration ───────────────────────────────────────────────

    /// Change the fee percentage. Applies to every settlement from now on.
    pub fn update_fee(&mut self, caller: &AccountId, fee_percent: u8) -> Result<(), PoolError> {
        self.authorize(caller)?;
        check_fee_percent(fee_percent).map_err(PoolError::InvalidConfig)?;
        tracing::info!(%caller, old = self.config.fee_percent, new = fee_percent, "fee updated");
        self.config.fee_percent = fee_percent;
        Ok(())
    }

    /// Change the timer duration. Pools that already armed keep the
    /// duration they armed with.
    pub fn update_timer_duration(
        &mut self,
        caller: &AccountId,
        secs: u64,
    ) -> Result<(), PoolError> {
        self.authorize(caller)?;
        check_timer_duration(secs).map_err(PoolError::InvalidConfig)?;
        tracing::info!(
            %caller,
            old = self.config.timer_duration_secs,
            new = secs,
            "timer duration updated"
        );
        self.config.timer_duration_secs = secs;
        if self.config.reclaim_after_secs < secs {
            tracing::info!(reclaim_after_secs = secs, "reclaim timeout raised to timer duration");
            self.config.reclaim_after_secs = secs;
        }
        Ok(())
    }

    /// Change the account that receives fees.
    pub fn update_fee_recipient(
        &mut self,
        caller: &AccountId,
        recipient: AccountId,
    ) -> Result<(), PoolError> {
        self.authorize(caller)?;
        tracing::info!(
            %caller,
            old = %self.config.fee_recipient,
            new = %recipient,
            "fee recipient updated"
        );
        self.config.fee_recipient = recipient;
        Ok(())
    }

    /// Change the lone-participant reclaim timeout.
    pub fn update_reclaim_after(&mut self, caller: &AccountId, secs: u64) -> Result<(), PoolError> {
        self.authorize(caller)?;
        let updated = self
            .config
            .clone()
            .with_reclaim_after(secs)
            .map_err(PoolError::InvalidConfig)?;
        tracing::info!(
            %caller,
            old = self.config.reclaim_after_secs,
            new = secs,
            "reclaim timeout updated"
        );
        self.config = updated;
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Participants of the current round; empty for unknown pools.
    pub fn participants(&self, pool_type: PoolType) -> &[AccountId] {
        self.pools
            .get(&pool_type)
            .map_or(NO_PARTICIPANTS, |p| p.participants())
    }

    /// Winner of the most recent award for this pool.
    pub fn last_winner(&self, pool_type: PoolType) -> Option<&AccountId> {
        self.last_winners.get(&pool_type)
    }

    /// The current round, if the pool holds any deposit.
    pub fn pool(&self, pool_type: PoolType) -> Option<&Pool> {
        self.pools.get(&pool_type)
    }

    /// Lifecycle phase of a pool; `Empty` for unknown pools.
    pub fn phase(&self, pool_type: PoolType) -> PoolPhase {
        self.pools.get(&pool_type).map_or(PoolPhase::Empty, Pool::phase)
    }

    /// Identifiers of pools holding deposits.
    pub fn active_pools(&self) -> impl Iterator<Item = PoolType> + '_ {
        self.pools.keys().copied()
    }

    /// Current configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Account holding pooled deposits.
    pub fn custody(&self) -> &AccountId {
        &self.custody
    }

    /// Every observation recorded so far, oldest first.
    pub fn observations(&self) -> &[Observation] {
        &self.journal
    }

    /// The asset ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable access to the asset ledger, for funding and approvals.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    // ── Internals ────────────────────────────────────────────────────

    fn check_deposit(
        &self,
        pool_type: PoolType,
        amount: Amount,
        caller: &AccountId,
    ) -> Result<(), PoolError> {
        // A self-transfer into custody moves nothing but would still be
        // counted toward the pool total.
        let reason = if *caller == self.custody {
            Some("custody account cannot deposit".to_string())
        } else if amount == 0 {
            Some("must be greater than zero".to_string())
        } else if amount > self.config.max_deposit {
            Some(format!("exceeds max deposit {}", self.config.max_deposit))
        } else if self
            .pools
            .get(&pool_type)
            .is_some_and(|p| p.prospective_total(amount).is_none())
        {
            Some("pool total would overflow".to_string())
        } else {
            None
        };
        match reason {
            Some(reason) => Err(PoolError::InvalidAmount {
                pool_type,
                amount,
                reason,
            }),
            None => Ok(()),
        }
    }

    fn authorize(&self, caller: &AccountId) -> Result<(), PoolError> {
        if self.env.gate.is_admin(caller) {
            Ok(())
        } else {
            tracing::warn!(%caller, "unauthorized administrative call");
            Err(PoolError::Unauthorized {
                caller: caller.clone(),
            })
        }
    }

    fn rejected(&self, err: PoolError, caller: &AccountId) -> PoolError {
        tracing::warn!(%caller, error = %err, "settlement rejected");
        err
    }

    /// Move the outcome's funds out of custody, then record observations.
    /// Observations are recorded only once every leg has succeeded.
    fn pay_out(
        &mut self,
        pool_type: PoolType,
        outcome: &Outcome,
        now: Timestamp,
    ) -> Result<(), PoolError> {
        match outcome {
            Outcome::Refund { to, amount } => {
                self.send(pool_type, outcome, SettlementLeg::Refund, to, *amount)?;
                self.record(ObservationKind::Refunded, pool_type, to.clone(), *amount, now);
            }
            Outcome::Award { winner, prize, fee } => {
                let recipient = self.config.fee_recipient.clone();
                self.send(pool_type, outcome, SettlementLeg::Prize, winner, *prize)?;
                self.send(pool_type, outcome, SettlementLeg::Fee, &recipient, *fee)?;
                self.record(ObservationKind::Won, pool_type, winner.clone(), *prize, now);
                self.record(ObservationKind::FeeTaken, pool_type, recipient, *fee, now);
            }
        }
        Ok(())
    }

    fn send(
        &mut self,
        pool_type: PoolType,
        outcome: &Outcome,
        leg: SettlementLeg,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), PoolError> {
        if amount == 0 {
            return Ok(());
        }
        match self.ledger.transfer(&self.custody, to, amount) {
            Ok(()) => Ok(()),
            Err(source) => {
                tracing::warn!(
                    %pool_type,
                    %leg,
                    %to,
                    amount,
                    %outcome,
                    error = %source,
                    "settlement transfer failed after pool was cleared"
                );
                Err(PoolError::SettlementTransferFailed {
                    pool_type,
                    outcome: outcome.clone(),
                    leg,
                    source,
                })
            }
        }
    }

    fn record(
        &mut self,
        kind: ObservationKind,
        pool_type: PoolType,
        actor: AccountId,
        amount: Amount,
        at: Timestamp,
    ) {
        let sequence = self.journal.len() as u64;
        tracing::info!(sequence, %kind, %pool_type, %actor, amount, "observation");
        self.journal.push(Observation {
            sequence,
            kind,
            pool_type,
            actor,
            amount,
            at,
        });
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
