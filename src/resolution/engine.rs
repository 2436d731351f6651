//! Opposed-move resolution
//!
//! One call resolves one exchange between an actor and a target:
//! 1. Both moves must be affordable, else nothing changes
//! 2. Both sides pay their costs (spent even if the move fails)
//! 3. Each side rolls: die + domain average + advantage + momentum
//!    + desperate perturbation + environment + status
//!    + temporary defense (each side's own, whichever side it stands on)
//! 4. Higher total wins, ties go to the defender
//! 5. Momentum shifts, then damage, then best-effort statuses
//!
//! Dice are consumed in a fixed order: actor die, actor perturbation (if
//! desperate), target die, target perturbation (if desperate), then one
//! status chance when a non-critical win can inflict a status.

use crate::combat::combatant::Combatant;
use crate::combat::domain::Domain;
use crate::combat::move_type::{advantage, Advantage, MoveType};
use crate::combat::moves::CombatMove;
use crate::combat::stats::{Pool, Stat};
use crate::core::config::CombatConfig;
use crate::core::error::{CombatError, Result};
use crate::core::types::CombatantId;
use crate::resolution::dice::RollSource;
use crate::resolution::result::{Restored, RollBreakdown, RoundResult};
use crate::session::state::{CombatSession, CombatStatus, LogKind};
use crate::status::consequence::Consequence;
use crate::status::severity::{Severity, StatusSource};
use crate::status::system::{ApplicationResult, NullStatusProvider, StatusProvider, TickReport, TieredStatusSystem};
use crate::status::table::StatusTable;

/// Who a status lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recipient {
    Actor,
    Target,
}

/// The combat resolution engine
pub struct CombatSystem {
    config: CombatConfig,
    statuses: Box<dyn StatusProvider>,
}

impl Default for CombatSystem {
    fn default() -> Self {
        Self::build(CombatConfig::default())
    }
}

impl CombatSystem {
    /// Engine with the status provider the config asks for
    ///
    /// Fails with `InvalidConfig` when the config does not validate.
    pub fn new(config: CombatConfig) -> Result<Self> {
        config.validate().map_err(CombatError::InvalidConfig)?;
        Ok(Self::build(config))
    }

    pub fn with_status_provider(config: CombatConfig, statuses: Box<dyn StatusProvider>) -> Result<Self> {
        config.validate().map_err(CombatError::InvalidConfig)?;
        Ok(Self { config, statuses })
    }

    fn build(config: CombatConfig) -> Self {
        let statuses: Box<dyn StatusProvider> = if config.enhanced_statuses {
            Box::new(TieredStatusSystem::default())
        } else {
            Box::new(NullStatusProvider)
        };
        Self { config, statuses }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn status_provider(&self) -> &dyn StatusProvider {
        self.statuses.as_ref()
    }

    /// Advance every status in the session by one round
    pub fn tick_statuses(&self, session: &mut CombatSession) -> TickReport {
        let report = self.statuses.tick(&mut session.combatants);
        for entry in &report.entries {
            let name = session
                .combatant(entry.combatant)
                .map(|c| c.name.clone())
                .unwrap_or_default();
            session.push_log(LogKind::Status, format!("{}: {:?}", name, entry.event));
        }
        report
    }

    /// Resolve one exchange
    pub fn resolve(
        &self,
        session: &mut CombatSession,
        actor: CombatantId,
        actor_move: &CombatMove,
        target: CombatantId,
        target_move: &CombatMove,
        dice: &mut dyn RollSource,
    ) -> Result<RoundResult> {
        let cfg = &self.config;
        let combat = session.id;

        if !session.is_active() {
            return Err(CombatError::CombatAlreadyResolved(combat));
        }
        let ai = session
            .index_of(actor)
            .ok_or(CombatError::InvalidTarget { combat, target: actor })?;
        let ti = session
            .index_of(target)
            .filter(|i| *i != ai)
            .ok_or(CombatError::InvalidTarget { combat, target })?;

        {
            let a = &session.combatants[ai];
            let t = &session.combatants[ti];
            if a.is_defeated() || t.is_defeated() {
                return Err(CombatError::CombatAlreadyResolved(combat));
            }
            for (c, m) in [(a, actor_move), (t, target_move)] {
                if !c.can_afford(&m.cost) {
                    return Err(CombatError::InsufficientResources {
                        combatant: c.name.clone(),
                        move_name: m.name.clone(),
                    });
                }
            }
        }

        let round = session.round;
        let actor_momentum = session.momentum_of(actor) as i32;
        let target_momentum = session.momentum_of(target) as i32;

        // One-shot bonuses are spent by this exchange whatever happens
        let actor_bank = session.environment.take_banked(actor);
        let target_bank = session.environment.take_banked(target);

        let adv = advantage(actor_move.move_type, target_move.move_type);
        let (actor_adv, target_adv) = match adv {
            Advantage::Actor => (cfg.advantage_bonus, 0),
            Advantage::Target => (0, cfg.advantage_bonus),
            Advantage::Neither => (0, 0),
        };

        let mut hooks = Vec::new();
        let (actor_env, actor_env_hooks) = {
            let a = &session.combatants[ai];
            session.environment.modifier_for(actor_move, a)
        };
        let (target_env, target_env_hooks) = {
            let t = &session.combatants[ti];
            session.environment.modifier_for(target_move, t)
        };
        let actor_defense = session.environment.defense_for(actor);
        let target_defense = session.environment.defense_for(target);
        hooks.extend(actor_env_hooks);
        hooks.extend(target_env_hooks);

        let actor_roll = {
            let a = &session.combatants[ai];
            self.roll_side(
                a,
                actor_move,
                actor_adv,
                actor_momentum,
                actor_env + actor_bank.roll + actor_defense,
                a.status_roll_modifier() + a.stat_modifier(Stat::Attack),
                dice,
            )
        };
        let target_roll = {
            let t = &session.combatants[ti];
            self.roll_side(
                t,
                target_move,
                target_adv,
                target_momentum,
                target_env + target_bank.roll + target_defense,
                t.status_roll_modifier() + t.stat_modifier(Stat::Defense),
                dice,
            )
        };

        let success = if cfg.ties_favor_defender {
            actor_roll.total > target_roll.total
        } else {
            actor_roll.total >= target_roll.total
        };
        let margin = (actor_roll.total - target_roll.total).abs();
        let critical = margin >= cfg.critical_margin;
        let (winner, loser) = if success { (actor, target) } else { (target, actor) };

        let (winner_momentum, loser_momentum) = session.shift_momentum(winner, loser, cfg.momentum_cap);
        let (actor_momentum_after, target_momentum_after) = if success {
            (winner_momentum, loser_momentum)
        } else {
            (loser_momentum, winner_momentum)
        };

        // Paid even when the move fails
        let (a, t) = session
            .pair_mut(ai, ti)
            .ok_or(CombatError::InvalidTarget { combat, target })?;
        a.pay(&actor_move.cost);
        t.pay(&target_move.cost);

        let mut result = RoundResult {
            round,
            actor,
            target,
            actor_move: actor_move.name.clone(),
            actor_move_type: actor_move.move_type,
            target_move: target_move.name.clone(),
            target_move_type: target_move.move_type,
            advantage: adv,
            actor_roll,
            target_roll,
            winner,
            success,
            margin,
            critical,
            tier: None,
            damage_to_target: 0,
            damage_to_actor: 0,
            restored: None,
            status_applied: Vec::new(),
            status_failures: Vec::new(),
            consequence: None,
            narrative_hooks: Vec::new(),
            actor_momentum: actor_momentum_after,
            target_momentum: target_momentum_after,
            actor_defeated: false,
            target_defeated: false,
            fled: false,
            interaction: None,
            tick: TickReport::new(),
            outcome: CombatStatus::Active,
        };

        // Status work queued until damage is in
        let mut pending: Vec<(String, Recipient)> = Vec::new();

        if success {
            if let Some(hook) = &actor_move.narrative_hook {
                hooks.insert(0, format!("{} {}", a.name, hook));
            }
            match actor_move.move_type {
                MoveType::Force | MoveType::Trick | MoveType::Focus => {
                    let mut damage = margin * cfg.damage_per_margin + self.domain_bonus(a, actor_move) + actor_bank.damage;
                    if critical {
                        damage = (damage as f32 * cfg.critical_multiplier) as i32;
                        hooks.push(format!("{} lands a devastating blow", a.name));
                    }
                    result.damage_to_target = t.take_damage(damage);

                    let status = actor_move
                        .status
                        .clone()
                        .unwrap_or_else(|| StatusTable::default_for(StatusSource::for_move(actor_move)).to_string());
                    let chance = (margin as f32 * cfg.status_chance_per_margin).min(1.0);
                    if critical || dice.check(chance) {
                        pending.push((status, Recipient::Target));
                    }

                    let threshold = cfg.consequence_health_fraction * t.effective_max(Pool::Health) as f32;
                    if critical && result.damage_to_target as f32 >= threshold {
                        let severity = self.statuses.select_tier(margin, t, cfg.tier_thresholds);
                        let consequence = Consequence::from_hit(StatusSource::for_move(actor_move), severity, round);
                        hooks.push(format!("{} suffers {}", t.name, consequence.name));
                        t.consequences.push(consequence.clone());
                        result.consequence = Some(consequence);
                    }
                }
                MoveType::Buff => {
                    if let Some(status) = &actor_move.status {
                        pending.push((status.clone(), Recipient::Actor));
                    }
                }
                MoveType::Debuff => {
                    if let Some(status) = &actor_move.status {
                        pending.push((status.clone(), Recipient::Target));
                    }
                }
                MoveType::Utility => {
                    result.restored = restore_pool(a, actor_move);
                }
                MoveType::Escape => {
                    result.fled = true;
                    hooks.push(format!("{} breaks away from the fight", a.name));
                }
            }
        } else {
            if let Some(hook) = &target_move.narrative_hook {
                hooks.insert(0, format!("{} {}", t.name, hook));
            }
            match target_move.move_type {
                MoveType::Force | MoveType::Trick => {
                    // Counters carry no domain bonus
                    result.damage_to_actor = a.take_damage(margin);
                }
                MoveType::Buff => {
                    if let Some(status) = &target_move.status {
                        pending.push((status.clone(), Recipient::Target));
                    }
                }
                MoveType::Debuff => {
                    if let Some(status) = &target_move.status {
                        pending.push((status.clone(), Recipient::Actor));
                    }
                }
                MoveType::Utility => {
                    result.restored = restore_pool(t, target_move);
                }
                MoveType::Focus | MoveType::Escape => {}
            }
        }

        // Best effort: failures are logged and recorded, never raised
        for (status, recipient) in pending {
            let recipient = match recipient {
                Recipient::Actor => &mut *a,
                Recipient::Target => &mut *t,
            };
            let severity = self.statuses.select_tier(margin, recipient, cfg.tier_thresholds);
            result.tier = Some(result.tier.map_or(severity, |s: Severity| s.max(severity)));
            match self.statuses.apply(&status, severity, recipient) {
                Ok(ApplicationResult::Applied { label, .. }) => {
                    result.status_applied.push(format!("{}: {}", recipient.name, label));
                }
                Ok(ApplicationResult::Resisted { name }) => {
                    hooks.push(format!("{} shrugs off {}", recipient.name, name));
                }
                Ok(ApplicationResult::TargetDefeated) | Ok(ApplicationResult::Disabled) => {}
                Err(e) => {
                    tracing::warn!(combatant = %recipient.name, status = %status, error = %e, "status application failed");
                    result.status_failures.push(format!("{}: {}", status, e));
                }
            }
        }

        result.actor_defeated = a.is_defeated();
        result.target_defeated = t.is_defeated();

        let actor_name = a.name.clone();
        let target_name = t.name.clone();
        result.narrative_hooks = hooks;

        tracing::debug!(
            round,
            actor = %actor_name,
            target = %target_name,
            actor_total = result.actor_roll.total,
            target_total = result.target_roll.total,
            margin,
            critical,
            "exchange resolved"
        );

        session.push_log(LogKind::Exchange, result.summary(&actor_name, &target_name));
        if result.target_defeated {
            session.push_log(LogKind::Defeat, format!("{} is defeated", target_name));
        }
        if result.actor_defeated {
            session.push_log(LogKind::Defeat, format!("{} is defeated", actor_name));
        }

        if result.fled {
            session.status = CombatStatus::Fled;
        }
        result.outcome = session.refresh_status();
        Ok(result)
    }

    fn roll_side(
        &self,
        combatant: &Combatant,
        combat_move: &CombatMove,
        advantage: i32,
        momentum: i32,
        environment: i32,
        status: i32,
        dice: &mut dyn RollSource,
    ) -> RollBreakdown {
        let cfg = &self.config;
        let d20 = dice.roll_die(cfg.die_faces);
        let calculated = if combat_move.calculated {
            (cfg.die_faces - d20) / cfg.calculated_divisor
        } else {
            0
        };
        let desperate = if combat_move.desperate {
            dice.roll_range(cfg.desperate_min, cfg.desperate_max)
        } else {
            0
        };
        let mut roll = RollBreakdown {
            d20,
            calculated,
            domain_average: combatant.domain_average(&combat_move.domains),
            advantage,
            momentum,
            desperate,
            environment,
            status,
            total: 0,
        };
        roll.total = roll.sum();
        roll
    }

    /// Weighted damage bonus from the domains the move draws on
    fn domain_bonus(&self, combatant: &Combatant, combat_move: &CombatMove) -> i32 {
        let cfg = &self.config;
        combat_move
            .domains
            .iter()
            .map(|d| {
                let weight = match d {
                    Domain::Body => cfg.body_damage_weight,
                    Domain::Mind => cfg.mind_damage_weight,
                    Domain::Craft => cfg.craft_damage_weight,
                    _ => 0,
                };
                weight * combatant.effective_domain(*d)
            })
            .sum()
    }
}

fn restore_pool(combatant: &mut Combatant, combat_move: &CombatMove) -> Option<Restored> {
    let refill = combat_move.restore?;
    let amount = combatant.restore(refill.pool, refill.amount);
    Some(Restored {
        combatant: combatant.id,
        pool: refill.pool,
        amount,
    })
}
