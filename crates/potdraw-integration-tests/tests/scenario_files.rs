//! # Bundled Scenarios
//!
//! Replays the scenario files shipped with `potdraw-cli` and checks the
//! journals they produce.

use std::path::PathBuf;

use potdraw_cli::scenario::{replay, Scenario};
use potdraw_core::{AccountId, PoolType};
use potdraw_registry::{AssetLedger, ObservationKind, PoolError};

fn load(name: &str) -> Scenario {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../potdraw-cli/scenarios")
        .join(name);
    let content = std::fs::read_to_string(&path).unwrap();
    Scenario::from_yaml_str(&content).unwrap()
}

fn account(name: &str) -> AccountId {
    AccountId::new(name).unwrap()
}

#[test]
fn two_players_scenario() {
    let replay = replay(&load("two_players.yaml"), None, false).unwrap();
    assert_eq!(replay.failures.len(), 1);
    assert!(matches!(
        replay.failures[0].error.downcast_ref::<PoolError>(),
        Some(PoolError::TimerNotElapsed { .. })
    ));

    let kinds: Vec<_> = replay.registry.observations().iter().map(|o| o.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ObservationKind::Joined,
            ObservationKind::Joined,
            ObservationKind::Won,
            ObservationKind::FeeTaken
        ]
    );
    let winner = replay.registry.last_winner(PoolType(1)).unwrap();
    assert_eq!(replay.registry.ledger().balance_of(winner), 270);
    assert_eq!(replay.registry.ledger().balance_of(&account("treasury")), 30);
}

#[test]
fn lone_reclaim_scenario() {
    let replay = replay(&load("lone_reclaim.yaml"), None, false).unwrap();
    assert_eq!(replay.failures.len(), 1);
    assert!(matches!(
        replay.failures[0].error.downcast_ref::<PoolError>(),
        Some(PoolError::NotStarted { .. })
    ));
    let last = replay.registry.observations().last().unwrap();
    assert_eq!(last.kind, ObservationKind::Refunded);
    assert_eq!(replay.registry.ledger().balance_of(&account("carol")), 50);
    assert!(replay.registry.last_winner(PoolType(2)).is_none());
}

#[test]
fn bundled_scenarios_replay_identically() {
    for name in ["two_players.yaml", "lone_reclaim.yaml"] {
        let scenario = load(name);
        let a = replay(&scenario, None, false).unwrap();
        let b = replay(&scenario, None, false).unwrap();
        assert_eq!(a.registry.observations(), b.registry.observations(), "{name}");
    }
}
