//! Per-session environment state
//!
//! Active tags plus whatever interactions have left behind: banked one-shot
//! roll bonuses, pending bonus damage and temporary defense.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::combat::combatant::Combatant;
use crate::combat::moves::CombatMove;
use crate::core::error::{CombatError, Result};
use crate::core::types::CombatantId;
use crate::environment::rules::{environment_rules, Interaction, InteractionEffect};
use crate::environment::tags::EnvironmentTag;

/// A one-shot bonus waiting for its owner's next action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankedBonus {
    pub combatant: CombatantId,
    pub roll: i32,
    pub damage: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryDefense {
    pub combatant: CombatantId,
    pub amount: i32,
    pub remaining: u32,
}

/// Area damage the session must deal to the user's opponents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaStrike {
    pub damage: i32,
    pub status: Option<String>,
}

/// What using an interaction did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionOutcome {
    pub name: String,
    pub tag: EnvironmentTag,
    pub hook: String,
    pub area: Option<AreaStrike>,
}

/// Environment of one combat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    tags: BTreeSet<EnvironmentTag>,
    banked: Vec<BankedBonus>,
    defenses: Vec<TemporaryDefense>,
}

impl Environment {
    pub fn new(tags: impl IntoIterator<Item = EnvironmentTag>) -> Self {
        Self {
            tags: tags.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Replace the active tags. Banked bonuses and defenses survive.
    pub fn set_tags(&mut self, tags: impl IntoIterator<Item = EnvironmentTag>) {
        self.tags = tags.into_iter().collect();
    }

    pub fn tags(&self) -> impl Iterator<Item = EnvironmentTag> + '_ {
        self.tags.iter().copied()
    }

    pub fn has_tag(&self, tag: EnvironmentTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Interactions unlocked by the active tags
    pub fn available_interactions(&self) -> Vec<&'static Interaction> {
        self.tags
            .iter()
            .flat_map(|tag| environment_rules().interactions_for(*tag))
            .collect()
    }

    /// Interactions this actor also meets the domain requirement for
    pub fn usable_interactions(&self, actor: &Combatant) -> Vec<&'static Interaction> {
        self.available_interactions()
            .into_iter()
            .filter(|i| i.requirement.met_by(actor))
            .collect()
    }

    /// Passive roll delta for a move, plus the narrative hooks that fired
    pub fn modifier_for(&self, combat_move: &CombatMove, actor: &Combatant) -> (i32, Vec<String>) {
        let mut delta = 0;
        let mut hooks = Vec::new();
        for tag in &self.tags {
            for rule in environment_rules().passive_for(*tag) {
                if !rule.matches(combat_move) {
                    continue;
                }
                let d = rule.delta_for(actor);
                if d != 0 {
                    delta += d;
                    hooks.push(format!("{}: {}", tag, rule.hook));
                }
            }
        }
        (delta, hooks)
    }

    /// Use a named interaction for `actor`
    ///
    /// Fails with `InteractionUnavailable` when the tag is inactive, the name
    /// is unknown or the actor misses the domain requirement. Nothing changes
    /// on failure.
    pub fn use_interaction(&mut self, name: &str, actor: &Combatant) -> Result<InteractionOutcome> {
        let interaction = environment_rules()
            .find_interaction(name)
            .filter(|i| self.has_tag(i.tag))
            .ok_or_else(|| CombatError::InteractionUnavailable(name.to_string()))?;

        if !interaction.requirement.met_by(actor) {
            return Err(CombatError::InteractionUnavailable(format!(
                "{} needs {} {}",
                interaction.name, interaction.requirement.domain, interaction.requirement.minimum
            )));
        }

        let mut area = None;
        match &interaction.effect {
            InteractionEffect::NextRollBonus(bonus) => self.bank(actor.id, *bonus, 0),
            InteractionEffect::BonusDamage(damage) => self.bank(actor.id, 0, *damage),
            InteractionEffect::DefenseBonus { amount, rounds } => {
                self.defenses.push(TemporaryDefense {
                    combatant: actor.id,
                    amount: *amount,
                    remaining: *rounds,
                });
            }
            InteractionEffect::AreaEffect { damage, status } => {
                area = Some(AreaStrike {
                    damage: *damage,
                    status: status.clone(),
                });
            }
        }

        tracing::debug!(combatant = %actor.name, interaction = %interaction.name, "environment interaction");

        Ok(InteractionOutcome {
            name: interaction.name.clone(),
            tag: interaction.tag,
            hook: format!("{} {}", actor.name, interaction.description),
            area,
        })
    }

    fn bank(&mut self, combatant: CombatantId, roll: i32, damage: i32) {
        match self.banked.iter_mut().find(|b| b.combatant == combatant) {
            Some(entry) => {
                entry.roll += roll;
                entry.damage += damage;
            }
            None => self.banked.push(BankedBonus { combatant, roll, damage }),
        }
    }

    /// Consume this combatant's banked bonus (zeroes when none)
    pub fn take_banked(&mut self, combatant: CombatantId) -> BankedBonus {
        match self.banked.iter().position(|b| b.combatant == combatant) {
            Some(index) => self.banked.swap_remove(index),
            None => BankedBonus {
                combatant,
                roll: 0,
                damage: 0,
            },
        }
    }

    /// Temporary defense currently protecting this combatant
    pub fn defense_for(&self, combatant: CombatantId) -> i32 {
        self.defenses
            .iter()
            .filter(|d| d.combatant == combatant)
            .map(|d| d.amount)
            .sum()
    }

    /// Advance temporary defenses by one round
    pub fn tick(&mut self) {
        for defense in self.defenses.iter_mut() {
            defense.remaining = defense.remaining.saturating_sub(1);
        }
        self.defenses.retain(|d| d.remaining > 0);
    }
}
