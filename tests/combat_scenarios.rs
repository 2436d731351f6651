//! End-to-end combat scenarios
//!
//! Each test drives the engine or the registry with scripted dice so the
//! numbers can be checked exactly.

use tale_combat::ai::memory::MoveMemory;
use tale_combat::ai::personality::AiPersonality;
use tale_combat::ai::strategy::{AIStrategy, AdaptiveStrategy, DecisionContext, DecisionKind};
use tale_combat::combat::combatant::{Combatant, CombatantType};
use tale_combat::combat::domain::{Domain, DomainRatings};
use tale_combat::combat::move_type::MoveType;
use tale_combat::combat::moves::{standard_library, CombatMove};
use tale_combat::core::config::CombatConfig;
use tale_combat::core::error::CombatError;
use tale_combat::core::types::{CombatId, CombatantId};
use tale_combat::environment::state::Environment;
use tale_combat::environment::tags::EnvironmentTag;
use tale_combat::resolution::dice::ScriptedRolls;
use tale_combat::resolution::engine::CombatSystem;
use tale_combat::session::registry::{CombatRegistry, CombatSetup, PlayerAction};
use tale_combat::session::snapshot::CombatantSnapshot;
use tale_combat::session::state::{CombatSession, CombatStatus};
use tale_combat::status::system::TickEvent;

fn mv(id: &str) -> CombatMove {
    standard_library().get(id).unwrap().clone()
}

fn hero() -> Combatant {
    Combatant::new(
        "Hero",
        CombatantType::Player,
        DomainRatings::new().with(Domain::Body, 3).with(Domain::Craft, 2),
    )
    .with_moves(vec![mv("strike"), mv("feint")])
}

fn goblin(health: i32) -> Combatant {
    Combatant::new("Goblin", CombatantType::Enemy, DomainRatings::new().with(Domain::Body, 1))
        .with_pools(health, 10, 10, 10)
        .with_moves(vec![mv("strike"), mv("heavy_blow")])
}

fn session(player: Combatant, enemy: Combatant) -> (CombatSession, CombatantId, CombatantId) {
    let (p, e) = (player.id, enemy.id);
    (CombatSession::new(CombatId::new(), vec![player, enemy], Environment::default(), 0), p, e)
}

fn hero_snapshot() -> CombatantSnapshot {
    CombatantSnapshot::new("Hero", CombatantType::Player)
        .with_domain(Domain::Body, 3)
        .with_domain(Domain::Craft, 2)
        .with_moves(&["strike", "feint"])
}

fn goblin_snapshot(health: i32) -> CombatantSnapshot {
    CombatantSnapshot::new("Goblin", CombatantType::Enemy)
        .with_domain(Domain::Body, 1)
        .with_pools(health, 10, 10, 10)
        .with_moves(&["strike"])
}

#[test]
fn test_clean_win_by_ten() {
    let config = CombatConfig {
        critical_margin: 11,
        ..CombatConfig::default()
    };
    let system = CombatSystem::new(config).unwrap();
    let (mut s, hero, gob) = session(hero(), goblin(50));

    // Hero 15 + 3 = 18, Goblin 7 + 1 = 8
    let mut dice = ScriptedRolls::new([15, 7]);
    let result = system
        .resolve(&mut s, hero, &mv("strike"), gob, &mv("strike"), &mut dice)
        .unwrap();

    assert!(result.success);
    assert_eq!(result.margin, 10);
    assert!(!result.critical);
    // 10 * 3 + 2 * Body(3)
    assert_eq!(result.damage_to_target, 36);
    assert_eq!(s.combatant(gob).unwrap().health.current, 14);
    assert_eq!(s.momentum_of(hero), 1);
    assert_eq!(s.momentum_of(gob), 0);
    assert_eq!(s.combatant(hero).unwrap().stamina.current, 8);
    assert_eq!(result.outcome, CombatStatus::Active);
}

#[test]
fn test_wounded_enemy_turns_desperate() {
    let strategy = AdaptiveStrategy::new(CombatConfig::default());
    let personality = AiPersonality {
        risk_taking: 0.8,
        ..AiPersonality::default()
    };
    let player = hero();
    let mut enemy = goblin(40);
    enemy.take_damage(34);
    assert!((enemy.health_fraction() - 0.15).abs() < 1e-6);

    let memory = MoveMemory::new(10);
    let context = DecisionContext {
        enemy: &enemy,
        player: &player,
        player_last_move: None,
        memory: &memory,
        personality: &personality,
    };
    let decision = strategy.choose_move(&context, &mut ScriptedRolls::default());
    assert_eq!(decision.kind, DecisionKind::Desperate);
    assert_eq!(decision.combat_move.move_type, MoveType::Force);
    assert_eq!(decision.combat_move.name, "Heavy Blow");
    assert!(decision.combat_move.desperate);

    // The perturbation is rolled right after the target's die
    let system = CombatSystem::default();
    let (mut s, player_id, enemy_id) = session(player, enemy);
    let mut dice = ScriptedRolls::new([10, 10, 5]);
    let result = system
        .resolve(&mut s, player_id, &mv("strike"), enemy_id, &decision.combat_move, &mut dice)
        .unwrap();
    assert_eq!(result.target_roll.desperate, 5);
    assert_eq!(result.target_roll.total, 10 + 1 + 5);
}

#[test]
fn test_calm_enemy_stays_composed() {
    let strategy = AdaptiveStrategy::new(CombatConfig::default());
    let personality = AiPersonality {
        risk_taking: 0.8,
        ..AiPersonality::default()
    };
    let player = hero();
    let mut enemy = goblin(40);
    // 0.2 is above 0.3 - 0.15 * 0.8
    enemy.take_damage(32);

    let memory = MoveMemory::new(10);
    let context = DecisionContext {
        enemy: &enemy,
        player: &player,
        player_last_move: None,
        memory: &memory,
        personality: &personality,
    };
    let decision = strategy.choose_move(&context, &mut ScriptedRolls::default());
    assert_ne!(decision.kind, DecisionKind::Desperate);
}

#[test]
fn test_status_runs_its_course() {
    let system = CombatSystem::default();
    let (mut s, hero, gob) = session(hero(), goblin(60));

    // Hero 10 + 3 = 13, Goblin 8 + 1 = 9: margin 4, Moderate tier
    let mut dice = ScriptedRolls::new([10, 8]).with_chances([0.0]);
    let result = system
        .resolve(&mut s, hero, &mv("strike"), gob, &mv("strike"), &mut dice)
        .unwrap();
    assert_eq!(result.status_applied, vec!["Goblin: Moderate Wounded".to_string()]);
    assert_eq!(s.combatant(gob).unwrap().effective_domain(Domain::Body), 0);

    for round in 1..=4 {
        let report = system.tick_statuses(&mut s);
        let expired = report
            .entries
            .iter()
            .any(|e| matches!(&e.event, TickEvent::Expired { .. }));
        assert_eq!(expired, round == 4, "round {}", round);
    }

    let goblin = s.combatant(gob).unwrap();
    assert!(goblin.statuses.is_empty());
    assert!(goblin.modifiers.is_empty());
    assert_eq!(goblin.effective_domain(Domain::Body), 1);
}

#[test]
fn test_environment_bonus_is_spent_once() {
    let registry = CombatRegistry::new(CombatConfig::default()).unwrap();
    let setup = CombatSetup::duel(hero_snapshot(), goblin_snapshot(80)).with_tags(&[EnvironmentTag::Water]);
    let dice = ScriptedRolls::new([10, 10, 10, 10]);
    let id = registry.start_combat_with_dice(setup, Box::new(dice), 0).unwrap();

    let first = registry
        .submit_action(id, PlayerAction::new("strike").with_interaction("Splash Blind"))
        .unwrap();
    // Water costs Body moves 1, the splash banks 2
    assert_eq!(first.actor_roll.environment, 1);
    assert_eq!(first.target_roll.environment, -1);
    assert_eq!(first.interaction.as_ref().map(|i| i.name.as_str()), Some("Splash Blind"));

    let second = registry.submit_action(id, PlayerAction::new("strike")).unwrap();
    assert_eq!(second.actor_roll.environment, -1);
    assert!(second.interaction.is_none());
}

#[test]
fn test_shadow_cover_lasts_two_rounds() {
    let registry = CombatRegistry::new(CombatConfig::default()).unwrap();
    let hero = hero_snapshot().with_domain(Domain::Awareness, 3);
    let setup = CombatSetup::duel(hero, goblin_snapshot(80)).with_tags(&[EnvironmentTag::Darkness]);
    let dice = ScriptedRolls::new([10, 10, 10, 10]);
    let id = registry.start_combat_with_dice(setup, Box::new(dice), 0).unwrap();

    // Hero 10 + 3 + 3 cover = 16, Goblin 10 + 1 = 11
    let first = registry
        .submit_action(id, PlayerAction::new("strike").with_interaction("Vanish into Shadow"))
        .unwrap();
    assert_eq!(first.actor_roll.environment, 3);
    assert_eq!(first.actor_roll.total, 16);
    assert!(first.success);

    // Cover still holds; momentum adds 1
    let second = registry.submit_action(id, PlayerAction::new("strike")).unwrap();
    assert_eq!(second.actor_roll.environment, 3);
    assert_eq!(second.actor_roll.total, 17);

    let state = registry.get_state(id).unwrap();
    let player = state.player_id().unwrap();
    assert_eq!(state.environment.defense_for(player), 0);
}

#[test]
fn test_unavailable_interaction_changes_nothing() {
    let registry = CombatRegistry::new(CombatConfig::default()).unwrap();
    let setup = CombatSetup::duel(hero_snapshot(), goblin_snapshot(30));
    let id = registry.start_combat_with_dice(setup, Box::new(ScriptedRolls::default()), 0).unwrap();

    let err = registry
        .submit_action(id, PlayerAction::new("strike").with_interaction("Kick the Embers"))
        .unwrap_err();
    assert!(matches!(err, CombatError::InteractionUnavailable(_)));

    let state = registry.get_state(id).unwrap();
    assert_eq!(state.round, 1);
    assert_eq!(state.player().unwrap().stamina.current, 10);
}

#[test]
fn test_embers_burn_every_enemy() {
    let registry = CombatRegistry::new(CombatConfig::default()).unwrap();
    let setup = CombatSetup {
        enemies: vec![goblin_snapshot(30), goblin_snapshot(30)],
        ..CombatSetup::duel(hero_snapshot(), goblin_snapshot(30)).with_tags(&[EnvironmentTag::Fire])
    };
    // Hero 1 + 3 = 4, Goblin 20 + 1 = 21: the exchange is lost
    let dice = ScriptedRolls::new([1, 20]);
    let id = registry.start_combat_with_dice(setup, Box::new(dice), 0).unwrap();

    let result = registry
        .submit_action(id, PlayerAction::new("strike").with_interaction("Kick the Embers"))
        .unwrap();
    assert!(!result.success);
    assert_eq!(result.damage_to_actor, 17);
    assert_eq!(result.status_applied.len(), 2);

    let state = registry.get_state(id).unwrap();
    for goblin in state.enemies() {
        // 3 from the embers, 2 from Minor Burning at round end
        assert_eq!(goblin.health.current, 25);
        assert_eq!(goblin.statuses.len(), 1);
    }
}

#[test]
fn test_last_enemy_down_is_victory() {
    let registry = CombatRegistry::new(CombatConfig::default()).unwrap();
    let setup = CombatSetup::duel(hero_snapshot(), goblin_snapshot(10));
    // Hero 15 + 3 = 18, Goblin 5 + 1 = 6: margin 12
    let dice = ScriptedRolls::new([15, 5]);
    let id = registry.start_combat_with_dice(setup, Box::new(dice), 0).unwrap();

    let result = registry.submit_action(id, PlayerAction::new("strike")).unwrap();
    assert!(result.target_defeated);
    assert_eq!(result.outcome, CombatStatus::Victory);

    let err = registry.submit_action(id, PlayerAction::new("strike")).unwrap_err();
    assert!(matches!(err, CombatError::CombatAlreadyResolved(_)));

    let final_state = registry.end_combat(id).unwrap();
    assert_eq!(final_state.status, CombatStatus::Victory);
    assert_eq!(final_state.rounds, 1);
    assert_eq!(final_state.survivors, vec!["Hero".to_string()]);
}

#[test]
fn test_struggle_when_spent() {
    let registry = CombatRegistry::new(CombatConfig::default()).unwrap();
    let setup = CombatSetup::duel(hero_snapshot().with_pools(30, 0, 0, 0), goblin_snapshot(30));
    let id = registry.start_combat_with_dice(setup, Box::new(ScriptedRolls::new([12, 3])), 0).unwrap();

    let err = registry.submit_action(id, PlayerAction::new("strike")).unwrap_err();
    assert!(matches!(err, CombatError::InsufficientResources { .. }));

    let result = registry.submit_action(id, PlayerAction::new("Struggle")).unwrap();
    assert_eq!(result.actor_move, "Struggle");
    assert!(result.success);
}
