//! Enhanced statuses: one applied instance of a tiered status

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::constants::PERMANENT;
use crate::combat::domain::Domain;
use crate::combat::stats::{ModifierLedger, Pool, Stat};
use crate::combat::status_kind::BaseStatus;
use crate::status::severity::{Severity, StatusSource};

/// Identity of one applied status instance
///
/// Reapplying the same status creates a new instance, so removal never
/// touches another instance's modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatusInstanceId(pub u64);

/// Special-effect tags carried by a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialEffect {
    /// Health lost at every round boundary
    DamageOverTime(i32),
    /// Health regained at every round boundary
    Regeneration(i32),
    /// A non-health pool lost at every round boundary
    ResourceDrain { pool: Pool, amount: i32 },
    /// Subtracted from every roll while active
    RollPenalty(i32),
    /// Added to every roll while active
    RollBonus(i32),
}

impl SpecialEffect {
    /// Does this effect fire at round boundaries?
    pub fn is_recurring(&self) -> bool {
        matches!(
            self,
            SpecialEffect::DamageOverTime(_)
                | SpecialEffect::Regeneration(_)
                | SpecialEffect::ResourceDrain { .. }
        )
    }
}

/// A tiered, timed modifier bundle on a combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedStatus {
    pub instance: StatusInstanceId,
    pub name: String,
    pub kind: BaseStatus,
    pub severity: Severity,
    pub source: StatusSource,
    /// Rounds left (-1 = permanent)
    pub remaining: i32,
    pub affected_domains: Vec<Domain>,
    pub stat_modifiers: BTreeMap<Stat, i32>,
    pub domain_modifiers: BTreeMap<Domain, i32>,
    pub special_effects: Vec<SpecialEffect>,
}

impl EnhancedStatus {
    pub fn is_permanent(&self) -> bool {
        self.remaining == PERMANENT
    }

    /// Add this instance's modifiers to a ledger
    pub fn apply_to(&self, ledger: &mut ModifierLedger) {
        for (domain, delta) in &self.domain_modifiers {
            ledger.add_domain(*domain, *delta);
        }
        for (stat, delta) in &self.stat_modifiers {
            ledger.add_stat(*stat, *delta);
        }
    }

    /// Subtract exactly what `apply_to` added
    pub fn reverse_from(&self, ledger: &mut ModifierLedger) {
        for (domain, delta) in &self.domain_modifiers {
            ledger.add_domain(*domain, -*delta);
        }
        for (stat, delta) in &self.stat_modifiers {
            ledger.add_stat(*stat, -*delta);
        }
    }

    /// Net roll adjustment from RollBonus/RollPenalty tags
    pub fn roll_modifier(&self) -> i32 {
        self.special_effects
            .iter()
            .map(|e| match e {
                SpecialEffect::RollBonus(n) => *n,
                SpecialEffect::RollPenalty(n) => -*n,
                _ => 0,
            })
            .sum()
    }

    /// Effects that fire when the round ends
    pub fn recurring_effects(&self) -> impl Iterator<Item = &SpecialEffect> {
        self.special_effects.iter().filter(|e| e.is_recurring())
    }

    /// Short label like "Moderate Wounded"
    pub fn label(&self) -> String {
        format!("{} {}", self.severity, self.name)
    }
}
