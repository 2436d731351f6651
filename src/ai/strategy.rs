//! Enemy move selection
//!
//! Architecture: Trait + Data hybrid
//! - AIStrategy trait defines the interface for swappable implementations
//! - AiPersonality holds TOML-loaded tendencies
//! - DecisionContext is the enemy's view of the exchange

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::ai::memory::MoveMemory;
use crate::ai::personality::AiPersonality;
use crate::combat::combatant::Combatant;
use crate::combat::domain::Domain;
use crate::combat::move_type::MoveType;
use crate::combat::moves::CombatMove;
use crate::core::config::CombatConfig;
use crate::core::error::CombatError;
use crate::resolution::dice::RollSource;

/// Everything an enemy knows when picking its move
pub struct DecisionContext<'a> {
    pub enemy: &'a Combatant,
    pub player: &'a Combatant,
    pub player_last_move: Option<MoveType>,
    pub memory: &'a MoveMemory,
    pub personality: &'a AiPersonality,
}

/// Which branch produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionKind {
    Desperate,
    Counter,
    Exploit,
    Standard,
    /// Nothing affordable: zero-cost placeholder
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub combat_move: CombatMove,
    pub kind: DecisionKind,
    pub predicted: Option<MoveType>,
}

impl Decision {
    fn new(combat_move: CombatMove, kind: DecisionKind) -> Self {
        Self {
            combat_move,
            kind,
            predicted: None,
        }
    }

    fn fallback() -> Self {
        Self::new(CombatMove::struggle(), DecisionKind::Fallback)
    }
}

/// Trait for enemy AI implementations
pub trait AIStrategy: Send + Sync {
    /// Pick the enemy's next move. Never fails: with nothing affordable
    /// the enemy struggles.
    fn choose_move(&self, context: &DecisionContext<'_>, dice: &mut dyn RollSource) -> Decision;
}

/// Rough expected damage of a move for this combatant
fn potency(combatant: &Combatant, combat_move: &CombatMove) -> OrderedFloat<f32> {
    let weighted: i32 = combat_move
        .domains
        .iter()
        .map(|d| {
            let weight = match d {
                Domain::Body => 2,
                Domain::Mind | Domain::Craft => 1,
                _ => 0,
            };
            weight * combatant.effective_domain(*d)
        })
        .sum();
    let average = combatant.domain_average(&combat_move.domains);
    OrderedFloat(weighted as f32 + average as f32 + combat_move.cost.stamina as f32 * 0.5)
}

fn strongest<'m>(combatant: &Combatant, moves: impl Iterator<Item = &'m CombatMove>) -> Option<&'m CombatMove> {
    moves.max_by_key(|m| potency(combatant, m))
}

/// Personality-weighted, pattern-reading enemy
#[derive(Debug, Clone, Default)]
pub struct AdaptiveStrategy {
    config: CombatConfig,
}

impl AdaptiveStrategy {
    pub fn new(config: CombatConfig) -> Self {
        Self { config }
    }

    /// Health fraction under which this personality turns desperate
    pub fn desperate_threshold(&self, personality: &AiPersonality) -> f32 {
        self.config.desperate_health_base - self.config.desperate_risk_reduction * personality.risk_taking
    }

    fn desperate(&self, ctx: &DecisionContext<'_>, affordable: &[&CombatMove]) -> Option<Decision> {
        if ctx.enemy.health_fraction() >= self.desperate_threshold(ctx.personality) {
            return None;
        }
        let chosen = strongest(
            ctx.enemy,
            affordable.iter().copied().filter(|m| m.move_type == MoveType::Force),
        )
        .map(|m| m.fresh())
        .unwrap_or_else(CombatMove::struggle);
        Some(Decision::new(chosen.desperate(), DecisionKind::Desperate))
    }

    fn counter(
        &self,
        ctx: &DecisionContext<'_>,
        affordable: &[&CombatMove],
        dice: &mut dyn RollSource,
    ) -> Option<Decision> {
        let predicted = ctx.memory.predict_next().or(ctx.player_last_move)?;
        let counter_type = predicted.countered_by()?;
        let chosen = strongest(
            ctx.enemy,
            affordable.iter().copied().filter(|m| m.move_type == counter_type),
        )?;

        let mut p = self.config.counter_base + self.config.counter_per_adaptability * ctx.personality.adaptability;
        if ctx.player_last_move.is_some_and(|t| ctx.memory.was_beaten_by(t)) {
            p += self.config.counter_history_bonus;
        }
        if !dice.check(p) {
            return None;
        }

        let mut combat_move = chosen.fresh();
        if ctx.personality.calculation > self.config.counter_calculated_threshold {
            combat_move = combat_move.calculated();
        }
        Some(Decision {
            combat_move,
            kind: DecisionKind::Counter,
            predicted: Some(predicted),
        })
    }

    fn exploit(
        &self,
        ctx: &DecisionContext<'_>,
        affordable: &[&CombatMove],
        dice: &mut dyn RollSource,
    ) -> Option<Decision> {
        // Domains the instance actually weakens; the kind table only fills gaps
        let status_domains: Vec<Domain> = ctx
            .player
            .statuses
            .iter()
            .filter(|s| s.kind.is_exploitable())
            .flat_map(|s| {
                if s.affected_domains.is_empty() {
                    s.kind.exploited_domain().into_iter().collect()
                } else {
                    s.affected_domains.clone()
                }
            })
            .collect();
        let mut targets = status_domains.clone();
        targets.extend(ctx.player.weak_domains.iter().copied());
        if targets.is_empty() {
            return None;
        }

        let chosen = strongest(
            ctx.enemy,
            affordable
                .iter()
                .copied()
                .filter(|m| m.move_type != MoveType::Escape && targets.iter().any(|d| m.uses_domain(*d))),
        )?;

        let mut p = self.config.exploit_base + self.config.exploit_per_aggression * ctx.personality.aggression;
        if !status_domains.is_empty() {
            p += self.config.exploit_status_bonus;
        }
        if !dice.check(p) {
            return None;
        }
        Some(Decision::new(chosen.fresh(), DecisionKind::Exploit))
    }

    fn weight(&self, personality: &AiPersonality, move_type: MoveType) -> f32 {
        match move_type {
            MoveType::Force => 0.5 + personality.aggression,
            MoveType::Trick => 1.5 - personality.aggression,
            MoveType::Focus => 0.5 + personality.calculation * 0.5,
            MoveType::Buff | MoveType::Debuff => 0.3 + personality.calculation * 0.3,
            MoveType::Utility => 0.2,
            MoveType::Escape => 0.0,
        }
    }

    fn standard(
        &self,
        ctx: &DecisionContext<'_>,
        affordable: &[&CombatMove],
        dice: &mut dyn RollSource,
    ) -> Decision {
        let weighted: Vec<(&CombatMove, f32)> = affordable
            .iter()
            .map(|m| (*m, self.weight(ctx.personality, m.move_type)))
            .filter(|(_, w)| *w > 0.0)
            .collect();

        let preferred: Vec<(&CombatMove, f32)> = weighted
            .iter()
            .copied()
            .filter(|(m, _)| ctx.personality.prefers(m.move_type, &m.domains))
            .collect();
        let pool = if preferred.is_empty() { weighted } else { preferred };

        let total: f32 = pool.iter().map(|(_, w)| w).sum();
        if pool.is_empty() || total <= 0.0 {
            return Decision::fallback();
        }

        let mut roll = dice.chance() * total;
        let mut chosen = pool[pool.len() - 1].0;
        for (m, w) in &pool {
            if roll < *w {
                chosen = *m;
                break;
            }
            roll -= *w;
        }

        let mut combat_move = chosen.fresh();
        if dice.check(ctx.personality.calculation) {
            combat_move = combat_move.calculated();
        }
        if dice.check(ctx.personality.risk_taking * self.config.standard_desperate_scale) {
            combat_move = combat_move.desperate();
        }
        Decision::new(combat_move, DecisionKind::Standard)
    }
}

impl AIStrategy for AdaptiveStrategy {
    fn choose_move(&self, ctx: &DecisionContext<'_>, dice: &mut dyn RollSource) -> Decision {
        let affordable = ctx.enemy.affordable_moves();
        if affordable.is_empty() {
            let err = CombatError::NoUsableMoves(ctx.enemy.name.clone());
            tracing::debug!(error = %err, "substituting fallback move");
            return Decision::fallback();
        }

        let decision = self
            .desperate(ctx, &affordable)
            .or_else(|| self.counter(ctx, &affordable, dice))
            .or_else(|| self.exploit(ctx, &affordable, dice))
            .unwrap_or_else(|| self.standard(ctx, &affordable, dice));

        tracing::debug!(
            enemy = %ctx.enemy.name,
            personality = %ctx.personality.name,
            kind = ?decision.kind,
            chosen = %decision.combat_move.name,
            "enemy decision"
        );
        decision
    }
}

/// Adaptive AI switched off: first affordable non-escape move
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStrategy;

impl AIStrategy for NullStrategy {
    fn choose_move(&self, ctx: &DecisionContext<'_>, _dice: &mut dyn RollSource) -> Decision {
        ctx.enemy
            .affordable_moves()
            .into_iter()
            .find(|m| m.move_type != MoveType::Escape)
            .map(|m| Decision::new(m.fresh(), DecisionKind::Standard))
            .unwrap_or_else(Decision::fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::CombatantType;
    use crate::combat::constants::FALLBACK_MOVE_NAME;
    use crate::combat::domain::DomainRatings;
    use crate::combat::moves::standard_library;
    use crate::combat::stats::Pool;
    use crate::resolution::dice::{ScriptedRolls, SeededDice};

    fn moves(ids: &[&str]) -> Vec<CombatMove> {
        ids.iter()
            .map(|id| standard_library().get(id).unwrap().clone())
            .collect()
    }

    fn enemy() -> Combatant {
        Combatant::new(
            "Brute",
            CombatantType::Enemy,
            DomainRatings::new().with(Domain::Body, 3).with(Domain::Craft, 2),
        )
        .with_moves(moves(&["strike", "heavy_blow", "feint", "read_the_flow", "catch_breath"]))
    }

    fn player() -> Combatant {
        Combatant::new("Hero", CombatantType::Player, DomainRatings::new().with(Domain::Body, 2))
    }

    #[test]
    fn test_desperate_at_low_health_is_certain() {
        let strategy = AdaptiveStrategy::default();
        let mut e = enemy();
        e.health.current = (e.health.max as f32 * 0.15) as i32;
        let p = player();
        let memory = MoveMemory::default();
        let personality = AiPersonality {
            risk_taking: 0.8,
            ..AiPersonality::default()
        };
        let ctx = DecisionContext {
            enemy: &e,
            player: &p,
            player_last_move: Some(MoveType::Trick),
            memory: &memory,
            personality: &personality,
        };
        for seed in 0..50 {
            let decision = strategy.choose_move(&ctx, &mut SeededDice::new(seed));
            assert_eq!(decision.kind, DecisionKind::Desperate);
            assert_eq!(decision.combat_move.move_type, MoveType::Force);
            assert!(decision.combat_move.desperate);
            assert_eq!(decision.combat_move.name, "Heavy Blow");
        }
    }

    #[test]
    fn test_counter_predicted_move() {
        let strategy = AdaptiveStrategy::default();
        let e = enemy();
        let p = player();
        let mut memory = MoveMemory::default();
        memory.record(MoveType::Trick);
        let personality = AiPersonality {
            adaptability: 1.0,
            calculation: 0.9,
            ..AiPersonality::default()
        };
        let ctx = DecisionContext {
            enemy: &e,
            player: &p,
            player_last_move: Some(MoveType::Trick),
            memory: &memory,
            personality: &personality,
        };
        // Counter chance is 0.6; a 0.1 roll passes
        let mut dice = ScriptedRolls::default().with_chances([0.1]);
        let decision = strategy.choose_move(&ctx, &mut dice);
        assert_eq!(decision.kind, DecisionKind::Counter);
        assert_eq!(decision.combat_move.move_type, MoveType::Force);
        assert_eq!(decision.predicted, Some(MoveType::Trick));
        assert!(decision.combat_move.calculated);
    }

    #[test]
    fn test_exploit_wounded_player() {
        let strategy = AdaptiveStrategy::default();
        let e = enemy();
        let mut p = player();
        let status = crate::status::standard_table()
            .instantiate("Wounded", crate::status::Severity::Minor, crate::status::StatusInstanceId(1))
            .unwrap();
        p.statuses.push(status);
        let memory = MoveMemory::default();
        let personality = AiPersonality::default();
        let ctx = DecisionContext {
            enemy: &e,
            player: &p,
            player_last_move: None,
            memory: &memory,
            personality: &personality,
        };
        let mut dice = ScriptedRolls::default().with_chances([0.0]);
        let decision = strategy.choose_move(&ctx, &mut dice);
        assert_eq!(decision.kind, DecisionKind::Exploit);
        assert!(decision.combat_move.uses_domain(Domain::Body));
    }

    #[test]
    fn test_exploit_follows_affected_domains() {
        let strategy = AdaptiveStrategy::default();
        let e = enemy().with_moves(moves(&["strike", "feint"]));
        let mut p = player();
        // Moderate Confused weakens Mind and Awareness; only Feint draws on either
        let status = crate::status::standard_table()
            .instantiate("Confused", crate::status::Severity::Moderate, crate::status::StatusInstanceId(1))
            .unwrap();
        assert!(status.affected_domains.contains(&Domain::Awareness));
        p.statuses.push(status);
        let memory = MoveMemory::default();
        let personality = AiPersonality::default();
        let ctx = DecisionContext {
            enemy: &e,
            player: &p,
            player_last_move: None,
            memory: &memory,
            personality: &personality,
        };
        let mut dice = ScriptedRolls::default().with_chances([0.0]);
        let decision = strategy.choose_move(&ctx, &mut dice);
        assert_eq!(decision.kind, DecisionKind::Exploit);
        assert_eq!(decision.combat_move.name, "Feint");
    }

    #[test]
    fn test_empty_affected_domains_fall_back_to_kind() {
        let strategy = AdaptiveStrategy::default();
        let e = enemy().with_moves(moves(&["strike", "feint"]));
        let mut p = player();
        let mut status = crate::status::standard_table()
            .instantiate("Wounded", crate::status::Severity::Minor, crate::status::StatusInstanceId(1))
            .unwrap();
        status.affected_domains.clear();
        p.statuses.push(status);
        let memory = MoveMemory::default();
        let personality = AiPersonality::default();
        let ctx = DecisionContext {
            enemy: &e,
            player: &p,
            player_last_move: None,
            memory: &memory,
            personality: &personality,
        };
        let mut dice = ScriptedRolls::default().with_chances([0.0]);
        let decision = strategy.choose_move(&ctx, &mut dice);
        assert_eq!(decision.kind, DecisionKind::Exploit);
        assert_eq!(decision.combat_move.name, "Strike");
    }

    #[test]
    fn test_preferences_filter_standard_pool() {
        let strategy = AdaptiveStrategy::default();
        let e = enemy();
        let p = player();
        let memory = MoveMemory::default();
        let personality = AiPersonality {
            preferred_move_types: vec![MoveType::Focus],
            ..AiPersonality::default()
        };
        let ctx = DecisionContext {
            enemy: &e,
            player: &p,
            player_last_move: None,
            memory: &memory,
            personality: &personality,
        };
        for seed in 0..20 {
            let decision = strategy.choose_move(&ctx, &mut SeededDice::new(seed));
            assert_eq!(decision.kind, DecisionKind::Standard);
            assert_eq!(decision.combat_move.name, "Read the Flow");
        }
    }

    #[test]
    fn test_nothing_affordable_falls_back() {
        let strategy = AdaptiveStrategy::default();
        let mut e = enemy().with_moves(moves(&["heavy_blow", "read_the_flow"]));
        e.drain(Pool::Stamina, 100);
        e.drain(Pool::Focus, 100);
        let p = player();
        let memory = MoveMemory::default();
        let personality = AiPersonality::default();
        let ctx = DecisionContext {
            enemy: &e,
            player: &p,
            player_last_move: None,
            memory: &memory,
            personality: &personality,
        };
        let decision = strategy.choose_move(&ctx, &mut SeededDice::new(1));
        assert_eq!(decision.kind, DecisionKind::Fallback);
        assert_eq!(decision.combat_move.name, FALLBACK_MOVE_NAME);
        assert!(decision.combat_move.cost.is_free());
    }

    #[test]
    fn test_null_strategy_first_usable() {
        let e = enemy();
        let p = player();
        let memory = MoveMemory::default();
        let personality = AiPersonality::default();
        let ctx = DecisionContext {
            enemy: &e,
            player: &p,
            player_last_move: None,
            memory: &memory,
            personality: &personality,
        };
        let decision = NullStrategy.choose_move(&ctx, &mut SeededDice::new(0));
        assert_eq!(decision.combat_move.name, "Strike");
    }
}
