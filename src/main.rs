//! Tale Combat - Entry Point
//!
//! A small terminal front end over the combat registry: one hero against
//! one monster, driven by typed commands.
//!
//! Usage: tale-combat [archetype] [tier] [tag...]

use std::io::{self, Write};
use std::path::Path;

use tale_combat::combat::combatant::CombatantType;
use tale_combat::combat::domain::Domain;
use tale_combat::core::config::CombatConfig;
use tale_combat::core::error::Result;
use tale_combat::core::types::CombatId;
use tale_combat::environment::tags::EnvironmentTag;
use tale_combat::session::bestiary::{Archetype, ThreatTier};
use tale_combat::session::registry::{CombatRegistry, PlayerAction};
use tale_combat::session::snapshot::CombatantSnapshot;

const CONFIG_PATH: &str = "data/combat.toml";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tale_combat=info")),
        )
        .init();

    let config = match CombatConfig::load(Path::new(CONFIG_PATH)) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = CONFIG_PATH, error = %e, "using default combat config");
            CombatConfig::default()
        }
    };
    let registry = CombatRegistry::new(config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let archetype = args
        .first()
        .and_then(|a| a.parse::<Archetype>().ok())
        .unwrap_or(Archetype::GoblinSkirmisher);
    let tier = match args.get(1).map(|s| s.to_lowercase()).as_deref() {
        Some("minion") => ThreatTier::Minion,
        Some("elite") => ThreatTier::Elite,
        Some("boss") => ThreatTier::Boss,
        _ => ThreatTier::Standard,
    };
    let tags: Vec<EnvironmentTag> = args.iter().skip(2).filter_map(|t| t.parse().ok()).collect();

    let id = registry.start_combat(hero(), archetype.spawn(tier), &tags)?;

    println!("\n=== TALE COMBAT ===");
    println!("You face a {}.", archetype.spawn(tier).name);
    println!();
    println!("Commands:");
    println!("  moves / m                        - List your moves");
    println!("  use <move> [with <interaction>]  - Act this round");
    println!("  status / s                       - Show every combatant");
    println!("  env / e                          - Show the surroundings");
    println!("  log                              - Show the last few log lines");
    println!("  quit / q                         - Walk away");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "quit" | "q" => break,
            "moves" | "m" => show_moves(&registry, id)?,
            "status" | "s" => show_status(&registry, id)?,
            "env" | "e" => show_environment(&registry, id)?,
            "log" => show_log(&registry, id)?,
            _ => {
                let Some(rest) = input.strip_prefix("use ").or_else(|| input.strip_prefix("u ")) else {
                    println!("Unknown command. Available: moves, use <move>, status, env, log, quit");
                    continue;
                };
                let action = match rest.split_once(" with ") {
                    Some((name, interaction)) => PlayerAction::new(name.trim()).with_interaction(interaction.trim()),
                    None => PlayerAction::new(rest.trim()),
                };
                match take_turn(&registry, id, action) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => println!("{}", e),
                }
            }
        }
    }

    let final_state = registry.end_combat(id)?;
    println!(
        "\nCombat over: {:?} after {} round(s). Still standing: {}.",
        final_state.status,
        final_state.rounds,
        final_state.survivors.join(", ")
    );
    Ok(())
}

fn hero() -> CombatantSnapshot {
    CombatantSnapshot::new("Hero", CombatantType::Player)
        .with_domain(Domain::Body, 3)
        .with_domain(Domain::Craft, 2)
        .with_domain(Domain::Awareness, 2)
        .with_domain(Domain::Mind, 2)
        .with_domain(Domain::Spirit, 1)
        .with_domain(Domain::Authority, 1)
        .with_pools(36, 12, 10, 8)
        .with_moves(&[
            "strike",
            "heavy_blow",
            "feint",
            "read_the_flow",
            "rally",
            "taunt",
            "catch_breath",
            "disengage",
        ])
}

/// Resolve one round and print it; true once the combat is decided
fn take_turn(registry: &CombatRegistry, id: CombatId, action: PlayerAction) -> Result<bool> {
    let result = registry.submit_action(id, action)?;
    let state = registry.get_state(id)?;
    let name_of = |cid| {
        state
            .combatant(cid)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "someone".to_string())
    };

    println!();
    if let Some(interaction) = &result.interaction {
        println!("  {}", interaction.hook);
    }
    println!("  {}", result.summary(&name_of(result.actor), &name_of(result.target)));
    for hook in &result.narrative_hooks {
        println!("  {}", hook);
    }
    for entry in &result.tick.entries {
        println!("  {}: {:?}", name_of(entry.combatant), entry.event);
    }
    println!();

    if result.outcome.is_terminal() {
        println!("*** {:?} ***", result.outcome);
        return Ok(true);
    }
    Ok(false)
}

fn show_moves(registry: &CombatRegistry, id: CombatId) -> Result<()> {
    let state = registry.get_state(id)?;
    let Some(player) = state.player() else {
        return Ok(());
    };
    println!();
    for m in &player.moves {
        let marker = if player.can_afford(&m.cost) { " " } else { "x" };
        println!(
            " {} {:<16} {:<8} stamina {} focus {} spirit {}",
            marker, m.name, m.move_type, m.cost.stamina, m.cost.focus, m.cost.spirit
        );
    }
    println!("   {:<16} always available", "Struggle");
    println!();
    Ok(())
}

fn show_status(registry: &CombatRegistry, id: CombatId) -> Result<()> {
    let state = registry.get_state(id)?;
    println!();
    println!("=== Round {} ===", state.round);
    for c in &state.combatants {
        let mark = if c.is_defeated() { " (down)" } else { "" };
        println!(
            "{}{} - Health {}/{}, Stamina {}/{}, Focus {}/{}, Spirit {}/{}, Momentum {}",
            c.name,
            mark,
            c.health.current,
            c.health.max,
            c.stamina.current,
            c.stamina.max,
            c.focus.current,
            c.focus.max,
            c.spirit.current,
            c.spirit.max,
            state.momentum_of(c.id)
        );
        for status in &c.statuses {
            let left = if status.is_permanent() {
                "lasting".to_string()
            } else {
                format!("{} round(s)", status.remaining)
            };
            let sign = if status.kind.is_beneficial() { "+" } else { "-" };
            println!("    {} {} ({})", sign, status.label(), left);
        }
        for consequence in &c.consequences {
            println!("    scar: {:?}", consequence);
        }
    }
    println!();
    Ok(())
}

fn show_environment(registry: &CombatRegistry, id: CombatId) -> Result<()> {
    let state = registry.get_state(id)?;
    let tags: Vec<String> = state.environment.tags().map(|t| t.to_string()).collect();
    println!();
    if tags.is_empty() {
        println!("Open ground.");
    } else {
        println!("Surroundings: {}", tags.join(", "));
    }
    if let Some(player) = state.player() {
        let cover = state.environment.defense_for(player.id);
        if cover > 0 {
            println!("Cover: +{} while it lasts", cover);
        }
        for interaction in state.environment.available_interactions() {
            let usable = interaction.requirement.met_by(player);
            println!(
                "  {} {} - {} (needs {} {})",
                if usable { " " } else { "x" },
                interaction.name,
                interaction.description,
                interaction.requirement.domain,
                interaction.requirement.minimum
            );
        }
    }
    println!();
    Ok(())
}

fn show_log(registry: &CombatRegistry, id: CombatId) -> Result<()> {
    let state = registry.get_state(id)?;
    println!();
    let skip = state.log.len().saturating_sub(10);
    for entry in state.log.iter().skip(skip) {
        println!("  [{}] {:?}: {}", entry.round, entry.kind, entry.description);
    }
    println!();
    Ok(())
}
