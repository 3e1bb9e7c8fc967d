//! # Pool Lifecycle
//!
//! End-to-end rounds through the public API of `potdraw-registry`, with
//! winners cross-checked against `potdraw-settlement` directly.

use std::sync::Arc;

use potdraw_core::{AccountId, PoolConfig, PoolType, Seed, Timestamp};
use potdraw_registry::{
    AssetLedger, Environment, InMemoryLedger, ManualClock, ManualEntropy, ObservationKind,
    OwnerGate, PoolError, PoolRegistry,
};
use potdraw_settlement::{select_winner, DrawInputs, Outcome, PoolPhase};

const START: i64 = 1_704_067_200;

fn account(name: &str) -> AccountId {
    AccountId::new(name).unwrap()
}

struct Harness {
    registry: PoolRegistry<InMemoryLedger>,
    clock: Arc<ManualClock>,
}

fn harness(fee_percent: u8, timer: u64, seed: [u8; 32], funded: &[(&str, u64)]) -> Harness {
    let clock = Arc::new(ManualClock::new(Timestamp::from_epoch_secs(START).unwrap()));
    let env = Environment::new(
        clock.clone(),
        Arc::new(ManualEntropy::new(Seed(seed))),
        Arc::new(OwnerGate::new(account("owner"))),
    );
    let config = PoolConfig::new(fee_percent, timer, 1_000_000, account("treasury")).unwrap();
    let custody = account("custody");
    let mut registry =
        PoolRegistry::new(config, custody.clone(), InMemoryLedger::new(), env).unwrap();
    for (name, amount) in funded {
        let who = account(name);
        registry.ledger_mut().mint(&who, *amount).unwrap();
        registry.ledger_mut().approve(&who, &custody, *amount);
    }
    Harness { registry, clock }
}

// =========================================================================
// Awards
// =========================================================================

#[test]
fn two_depositors_fee_and_prize() {
    let mut h = harness(10, 30, [0x11; 32], &[("alice", 100), ("bob", 200)]);
    h.registry.join(PoolType(1), 100, &account("alice")).unwrap();
    h.registry.join(PoolType(1), 200, &account("bob")).unwrap();
    let participants = h.registry.participants(PoolType(1)).to_vec();
    let now = h.clock.advance(30);

    let outcome = h.registry.finalize(PoolType(1), &account("anyone")).unwrap();
    let inputs = DrawInputs {
        timestamp: now,
        seed: Seed([0x11; 32]),
    };
    let expected = select_winner(&inputs, &participants).unwrap();
    let winner = participants[expected.index].clone();
    assert_eq!(outcome, Outcome::Award {
        winner: winner.clone(),
        prize: 270,
        fee: 30,
    });
    assert_eq!(h.registry.last_winner(PoolType(1)), Some(&winner));
    assert_eq!(h.registry.ledger().balance_of(&winner), 270);
    assert_eq!(h.registry.ledger().balance_of(&account("treasury")), 30);
    assert_eq!(h.registry.ledger().total_supply(), 300);
    assert!(matches!(
        h.registry.finalize(PoolType(1), &account("anyone")),
        Err(PoolError::NotStarted { .. })
    ));
}

#[test]
fn each_join_is_one_entry() {
    // Each join is one entry regardless of amount; a repeated depositor
    // holds several positions.
    let mut h = harness(0, 10, [0x42; 32], &[("alice", 30), ("bob", 1_000)]);
    h.registry.join(PoolType(5), 10, &account("alice")).unwrap();
    h.registry.join(PoolType(5), 10, &account("alice")).unwrap();
    h.registry.join(PoolType(5), 1_000, &account("bob")).unwrap();
    assert_eq!(
        h.registry.participants(PoolType(5)),
        &[account("alice"), account("alice"), account("bob")]
    );
    h.clock.advance(10);
    let outcome = h.registry.finalize(PoolType(5), &account("bob")).unwrap();
    assert_eq!(outcome.total(), 1_020);
}

#[test]
fn observation_journal_orders_and_sequences() {
    let mut h = harness(10, 30, [0x07; 32], &[("alice", 100), ("bob", 100)]);
    h.registry.join(PoolType(1), 50, &account("alice")).unwrap();
    h.registry.join(PoolType(1), 50, &account("bob")).unwrap();
    h.clock.advance(30);
    h.registry.finalize(PoolType(1), &account("alice")).unwrap();

    let journal = h.registry.observations();
    let sequences: Vec<u64> = journal.iter().map(|o| o.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2, 3]);
    assert_eq!(journal[2].kind, ObservationKind::Won);
    assert_eq!(journal[3].kind, ObservationKind::FeeTaken);
    assert_eq!(journal[2].amount + journal[3].amount, 100);
    assert_eq!(journal[3].at.epoch_secs(), START + 30);

    let json = serde_json::to_value(&journal[0]).unwrap();
    assert_eq!(json["kind"], "Joined");
    assert_eq!(json["pool_type"], 1);
    assert_eq!(json["actor"], "alice");
}

// =========================================================================
// Refunds and rejections
// =========================================================================

#[test]
fn lone_participant_is_never_finalized_but_can_reclaim() {
    let mut h = harness(10, 30, [0x00; 32], &[("alice", 50)]);
    h.registry.join(PoolType(2), 50, &account("alice")).unwrap();
    for _ in 0..5 {
        h.clock.advance(10_000);
        assert!(matches!(
            h.registry.finalize(PoolType(2), &account("alice")),
            Err(PoolError::NotStarted { .. })
        ));
    }
    assert_eq!(h.registry.phase(PoolType(2)), PoolPhase::Accepting);

    h.clock.advance(86_400);
    let outcome = h.registry.reclaim(PoolType(2), &account("bob")).unwrap();
    assert_eq!(outcome, Outcome::Refund {
        to: account("alice"),
        amount: 50,
    });
    assert_eq!(h.registry.ledger().balance_of(&account("alice")), 50);
    assert_eq!(h.registry.ledger().balance_of(&account("treasury")), 0);
}

#[test]
fn rejected_calls_leave_no_trace() {
    let mut h = harness(10, 30, [0x00; 32], &[("alice", 100), ("bob", 100)]);
    h.registry.join(PoolType(1), 100, &account("alice")).unwrap();
    let snapshot = h.registry.pool(PoolType(1)).cloned();
    let journal_len = h.registry.observations().len();

    assert!(h.registry.join(PoolType(1), 0, &account("bob")).is_err());
    assert!(h.registry.join(PoolType(1), 1_000_001, &account("bob")).is_err());
    assert!(h.registry.join(PoolType(1), 101, &account("bob")).is_err());
    assert!(h.registry.finalize(PoolType(1), &account("bob")).is_err());
    assert!(h.registry.update_fee(&account("bob"), 1).is_err());

    assert_eq!(h.registry.pool(PoolType(1)).cloned(), snapshot);
    assert_eq!(h.registry.observations().len(), journal_len);
    assert_eq!(h.registry.ledger().balance_of(&account("bob")), 100);
}

#[test]
fn configuration_changes_apply_to_later_rounds() {
    let mut h = harness(10, 30, [0x33; 32], &[("alice", 1_000), ("bob", 1_000)]);
    let owner = account("owner");

    h.registry.join(PoolType(1), 100, &account("alice")).unwrap();
    h.registry.join(PoolType(1), 100, &account("bob")).unwrap();
    // Armed with 30s; a longer timer does not delay this round.
    h.registry.update_timer_duration(&owner, 300).unwrap();
    // The fee is read at settlement time.
    h.registry.update_fee(&owner, 0).unwrap();
    h.clock.advance(30);
    let outcome = h.registry.finalize(PoolType(1), &account("alice")).unwrap();
    assert!(matches!(outcome, Outcome::Award { prize: 200, fee: 0, .. }));

    h.registry.join(PoolType(1), 100, &account("alice")).unwrap();
    h.registry.join(PoolType(1), 100, &account("bob")).unwrap();
    h.clock.advance(299);
    assert!(matches!(
        h.registry.finalize(PoolType(1), &account("alice")),
        Err(PoolError::TimerNotElapsed { .. })
    ));
    h.clock.advance(1);
    assert!(h.registry.finalize(PoolType(1), &account("alice")).is_ok());
}
