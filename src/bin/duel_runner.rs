//! Headless Duel Runner
//!
//! Runs AI vs AI duels across a range of seeds and prints JSON results,
//! for balance passes over archetypes, personalities and config values.

use std::path::PathBuf;

use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use tale_combat::ai::memory::MoveMemory;
use tale_combat::ai::personality::{load_or_default, AiPersonality};
use tale_combat::ai::strategy::{AIStrategy, AdaptiveStrategy, DecisionContext};
use tale_combat::combat::combatant::CombatantType;
use tale_combat::core::config::CombatConfig;
use tale_combat::core::error::Result;
use tale_combat::environment::tags::{parse_tags, EnvironmentTag};
use tale_combat::resolution::dice::SeededDice;
use tale_combat::session::bestiary::{Archetype, ThreatTier};
use tale_combat::session::registry::{CombatRegistry, CombatSetup, PlayerAction};
use tale_combat::session::state::CombatStatus;

/// Headless Duel Runner - AI vs AI duels for balancing
#[derive(Parser, Debug)]
#[command(name = "duel_runner")]
#[command(about = "Run AI vs AI duels and output results as JSON")]
struct Args {
    /// Archetype fighting on the player side
    #[arg(long, default_value = "bandit brute")]
    hero: String,

    /// Archetype fighting on the enemy side
    #[arg(long, default_value = "goblin skirmisher")]
    enemy: String,

    /// Threat tier of the enemy: minion, standard, elite, boss
    #[arg(long, default_value = "standard")]
    tier: String,

    /// Personality driving the player side (loaded from data/ai_personalities/)
    #[arg(long, default_value = "default")]
    personality: String,

    /// Environment tags, comma separated (e.g. "water,darkness")
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Number of duels to run
    #[arg(long, default_value_t = 100)]
    count: u64,

    /// First seed; duel n uses seed + n
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Rounds before a duel is called a draw
    #[arg(long, default_value_t = 50)]
    max_rounds: u32,

    /// Combat config file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

#[derive(Debug, Serialize)]
struct DuelResult {
    seed: u64,
    outcome: CombatStatus,
    rounds: u32,
    hero_health: i32,
    enemy_health: i32,
}

#[derive(Debug, Serialize)]
struct Summary {
    hero: String,
    enemy: String,
    personality: String,
    duels: usize,
    victories: usize,
    defeats: usize,
    draws: usize,
    average_rounds: f32,
    results: Vec<DuelResult>,
}

fn parse_tier(s: &str) -> ThreatTier {
    match s.to_lowercase().as_str() {
        "minion" => ThreatTier::Minion,
        "elite" => ThreatTier::Elite,
        "boss" => ThreatTier::Boss,
        _ => ThreatTier::Standard,
    }
}

/// Player-side dice are kept apart from the session's own stream
const HERO_DICE_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

fn run_duel(
    registry: &CombatRegistry,
    setup: CombatSetup,
    seed: u64,
    strategy: &AdaptiveStrategy,
    personality: &AiPersonality,
    max_rounds: u32,
) -> Result<DuelResult> {
    let mut memory = MoveMemory::new(registry.config().memory_size);
    let mut dice = SeededDice::new(seed ^ HERO_DICE_SALT);
    let mut last_enemy_move = None;

    let id = registry.start_combat_with(setup.with_seed(seed))?;
    for _ in 0..max_rounds {
        let state = registry.get_state(id)?;
        let (Some(hero), Some(enemy_id)) = (state.player(), state.first_standing_enemy()) else {
            break;
        };
        let Some(enemy) = state.combatant(enemy_id) else {
            break;
        };

        // The hero's AI sees the duel from its own side
        let context = DecisionContext {
            enemy: hero,
            player: enemy,
            player_last_move: last_enemy_move,
            memory: &memory,
            personality,
        };
        let decision = strategy.choose_move(&context, &mut dice);

        let action = PlayerAction::new(decision.combat_move.name.clone())
            .at(enemy_id)
            .with_flags_of(&decision.combat_move);
        let result = registry.submit_action(id, action)?;
        memory.record(result.target_move_type);
        last_enemy_move = Some(result.target_move_type);
        if result.outcome.is_terminal() {
            break;
        }
    }

    let final_state = registry.end_combat(id)?;
    let health_of = |enemy_side: bool| {
        final_state
            .session
            .combatants
            .iter()
            .find(|c| (c.kind == CombatantType::Enemy) == enemy_side)
            .map(|c| c.health.current)
            .unwrap_or(0)
    };
    Ok(DuelResult {
        seed,
        outcome: final_state.status,
        rounds: final_state.rounds,
        hero_health: health_of(false),
        enemy_health: health_of(true),
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tale_combat=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CombatConfig::load(path)?,
        None => CombatConfig::default(),
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(2);
    }

    let hero_archetype: Archetype = args.hero.parse().unwrap_or_else(|e| {
        eprintln!("Warning: {}, using Bandit Brute", e);
        Archetype::BanditBrute
    });
    let enemy_archetype: Archetype = args.enemy.parse().unwrap_or_else(|e| {
        eprintln!("Warning: {}, using Goblin Skirmisher", e);
        Archetype::GoblinSkirmisher
    });
    let tags: Vec<EnvironmentTag> = parse_tags(args.tags.as_slice())?;

    let personality = load_or_default(&args.personality);
    let strategy = AdaptiveStrategy::new(config.clone());
    let registry = CombatRegistry::new(config)?;
    let setup = CombatSetup::duel(
        hero_archetype.spawn(ThreatTier::Standard),
        enemy_archetype.spawn(parse_tier(&args.tier)),
    )
    .with_tags(&tags);

    let results: Vec<DuelResult> = (args.seed..args.seed + args.count)
        .into_par_iter()
        .filter_map(|seed| match run_duel(&registry, setup.clone(), seed, &strategy, &personality, args.max_rounds) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::error!(seed, error = %e, "duel failed");
                None
            }
        })
        .collect();

    let count = |status: CombatStatus| results.iter().filter(|r| r.outcome == status).count();
    let summary = Summary {
        hero: hero_archetype.to_string(),
        enemy: enemy_archetype.to_string(),
        personality: args.personality.clone(),
        duels: results.len(),
        victories: count(CombatStatus::Victory),
        defeats: count(CombatStatus::Defeat),
        draws: count(CombatStatus::Neutral),
        average_rounds: if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.rounds as f32).sum::<f32>() / results.len() as f32
        },
        results,
    };

    match args.format.as_str() {
        "text" => {
            println!("Duel Results");
            println!("============");
            println!("{} vs {} ({})", summary.hero, summary.enemy, summary.personality);
            println!("Duels: {}", summary.duels);
            println!("Victories: {}", summary.victories);
            println!("Defeats: {}", summary.defeats);
            println!("Draws: {}", summary.draws);
            println!("Average rounds: {:.1}", summary.average_rounds);
        }
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
