//! Registry integration tests: determinism, isolation between sessions,
//! and the error surface of the public API

use std::sync::Arc;

use tale_combat::combat::combatant::CombatantType;
use tale_combat::core::config::CombatConfig;
use tale_combat::core::error::CombatError;
use tale_combat::core::types::{CombatId, CombatantId};
use tale_combat::environment::tags::EnvironmentTag;
use tale_combat::resolution::result::RoundResult;
use tale_combat::session::bestiary::{Archetype, ThreatTier};
use tale_combat::session::registry::{CombatRegistry, CombatSetup, PlayerAction};
use tale_combat::session::snapshot::CombatantSnapshot;
use tale_combat::session::state::CombatStatus;

const HERO_ID: u128 = 1;
const ENEMY_ID: u128 = 2;

fn hero() -> CombatantSnapshot {
    Archetype::BanditBrute
        .spawn(ThreatTier::Standard)
        .with_id(CombatantId::from_u128(HERO_ID))
}

fn enemy() -> CombatantSnapshot {
    Archetype::ShadowStalker
        .spawn(ThreatTier::Standard)
        .with_id(CombatantId::from_u128(ENEMY_ID))
}

/// Fight with a fixed rotation of player moves until decided or `rounds` run out
fn fight(registry: &CombatRegistry, id: CombatId, rounds: usize) -> Vec<RoundResult> {
    let rotation = ["strike", "heavy_blow", "taunt", "catch_breath"];
    let mut results = Vec::new();
    for round in 0..rounds {
        let name = rotation[round % rotation.len()];
        let result = match registry.submit_action(id, PlayerAction::new(name)) {
            Ok(result) => result,
            Err(CombatError::InsufficientResources { .. }) => registry
                .submit_action(id, PlayerAction::new("Struggle"))
                .unwrap(),
            Err(e) => panic!("unexpected error: {}", e),
        };
        let done = result.outcome.is_terminal();
        results.push(result);
        if done {
            break;
        }
    }
    results
}

#[test]
fn test_same_seed_same_fight() {
    let run = || {
        let registry = CombatRegistry::new(CombatConfig::default()).unwrap();
        let setup = CombatSetup::duel(hero(), enemy())
            .with_tags(&[EnvironmentTag::Darkness])
            .with_seed(42);
        let id = registry.start_combat_with(setup).unwrap();
        fight(&registry, id, 12)
    };
    let first = run();
    let second = run();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_different_seeds_diverge() {
    let registry = CombatRegistry::new(CombatConfig::default()).unwrap();
    let rolls: Vec<Vec<i32>> = (0..8u64)
        .map(|seed| {
            let id = registry
                .start_combat_with(CombatSetup::duel(hero(), enemy()).with_seed(seed))
                .unwrap();
            fight(&registry, id, 3)
                .iter()
                .map(|r| r.actor_roll.d20)
                .collect()
        })
        .collect();
    assert!(rolls.iter().any(|r| r != &rolls[0]));
}

#[test]
fn test_sessions_are_isolated() {
    let registry = Arc::new(CombatRegistry::new(CombatConfig::default()).unwrap());

    let ids: Vec<CombatId> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8u64)
            .map(|seed| {
                let registry = Arc::clone(&registry);
                scope.spawn(move || {
                    let setup = CombatSetup::duel(
                        Archetype::StoneWarden.spawn(ThreatTier::Standard),
                        Archetype::GoblinSkirmisher.spawn(ThreatTier::Minion),
                    )
                    .with_seed(seed);
                    let id = registry.start_combat_with(setup).unwrap();
                    fight(&registry, id, 20);
                    id
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(registry.len(), 8);
    for id in &ids {
        let state = registry.get_state(*id).unwrap();
        assert_eq!(state.id, *id);
        assert_eq!(state.combatants.len(), 2);
    }
    for id in ids {
        registry.end_combat(id).unwrap();
    }
    assert!(registry.is_empty());
}

#[test]
fn test_api_errors() {
    let registry = CombatRegistry::new(CombatConfig::default().with_seed(3)).unwrap();
    let missing = CombatId::new();

    assert!(matches!(registry.get_state(missing), Err(CombatError::CombatNotFound(_))));
    assert!(matches!(registry.end_combat(missing), Err(CombatError::CombatNotFound(_))));

    let id = registry.start_combat(hero(), enemy(), &[]).unwrap();
    let stranger = CombatantId::from_u128(99);
    let err = registry
        .submit_action(id, PlayerAction::new("strike").at(stranger))
        .unwrap_err();
    assert!(matches!(err, CombatError::InvalidTarget { .. }));

    let err = registry.submit_action(id, PlayerAction::new("moonbeam")).unwrap_err();
    assert!(matches!(err, CombatError::UnknownMove { .. }));

    let err = registry
        .submit_action(id, PlayerAction::new("strike").with_interaction("Splash Blind"))
        .unwrap_err();
    assert!(matches!(err, CombatError::InteractionUnavailable(_)));

    // None of the rejected calls advanced the fight
    let state = registry.get_state(id).unwrap();
    assert_eq!(state.round, 1);
    assert_eq!(state.log.len(), 1);

    registry.end_combat(id).unwrap();
    assert!(matches!(
        registry.submit_action(id, PlayerAction::new("strike")),
        Err(CombatError::CombatNotFound(_))
    ));
}

#[test]
fn test_enemy_minds_follow_the_player() {
    let registry = CombatRegistry::new(CombatConfig::default().with_seed(11)).unwrap();
    let id = registry.start_combat(hero(), enemy(), &[]).unwrap();
    let state = registry.get_state(id).unwrap();
    assert_eq!(state.minds.len(), 1);
    assert_eq!(state.minds[0].personality.name, "tactician");

    let results = fight(&registry, id, 3);
    let state = registry.get_state(id).unwrap();
    assert_eq!(state.minds[0].memory.len(), results.len());
    assert_eq!(state.player_last_move, results.last().map(|r| r.actor_move_type));
}

#[test]
fn test_objects_can_be_struck() {
    let registry = CombatRegistry::new(CombatConfig::default().with_seed(5)).unwrap();
    let door = CombatantSnapshot::new("Barred Door", CombatantType::Object)
        .with_pools(12, 0, 0, 0)
        .with_id(CombatantId::from_u128(7));
    let setup = CombatSetup {
        objects: vec![door],
        ..CombatSetup::duel(hero(), enemy())
    };
    let id = registry.start_combat_with(setup).unwrap();

    let result = registry
        .submit_action(id, PlayerAction::new("strike").at(CombatantId::from_u128(7)))
        .unwrap();
    assert_eq!(result.target_move, "Stand Fast");

    // Smashing the door is not winning the fight
    let state = registry.get_state(id).unwrap();
    if state.player().is_some_and(|p| !p.is_defeated()) {
        assert_eq!(state.status, CombatStatus::Active);
    }
}
