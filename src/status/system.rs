//! Status system: applying statuses and advancing them each round
//!
//! `StatusProvider` is the seam the resolution engine talks to. The tiered
//! implementation is table-driven; the null implementation lets a session
//! run with statuses switched off without branching anywhere else.

use serde::{Deserialize, Serialize};

use crate::combat::combatant::Combatant;
use crate::combat::stats::Pool;
use crate::core::error::{CombatError, Result};
use crate::core::types::CombatantId;
use crate::status::enhanced::{SpecialEffect, StatusInstanceId};
use crate::status::severity::Severity;
use crate::status::table::{standard_table, StatusTable};

/// Outcome of one application attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationResult {
    Applied {
        instance: StatusInstanceId,
        label: String,
        duration: i32,
    },
    /// Target resists this status kind
    Resisted { name: String },
    /// Defeated combatants take no further effects
    TargetDefeated,
    /// Statuses are switched off for this session
    Disabled,
}

impl ApplicationResult {
    pub fn applied_label(&self) -> Option<&str> {
        match self {
            ApplicationResult::Applied { label, .. } => Some(label),
            _ => None,
        }
    }
}

/// Something that happened at a round boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickEvent {
    Damaged { status: String, amount: i32 },
    Healed { status: String, amount: i32 },
    Drained { status: String, pool: Pool, amount: i32 },
    Expired { status: String },
    Defeated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEntry {
    pub combatant: CombatantId,
    pub event: TickEvent,
}

/// Everything one `tick` did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub entries: Vec<TickEntry>,
}

impl TickReport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, combatant: CombatantId, event: TickEvent) {
        self.entries.push(TickEntry { combatant, event });
    }

    /// Combatants defeated by recurring effects this tick
    pub fn defeated(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.entries
            .iter()
            .filter(|e| e.event == TickEvent::Defeated)
            .map(|e| e.combatant)
    }

    pub fn expired_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.event, TickEvent::Expired { .. }))
            .count()
    }
}

/// Applies and advances statuses
pub trait StatusProvider: Send + Sync {
    /// Tier for a roll margin against this target
    fn select_tier(&self, margin: i32, target: &Combatant, thresholds: [i32; 3]) -> Severity;

    /// Apply a named status at a severity
    fn apply(&self, name: &str, severity: Severity, target: &mut Combatant) -> Result<ApplicationResult>;

    /// Advance every status on every combatant by one round
    fn tick(&self, combatants: &mut [Combatant]) -> TickReport;
}

/// Table-driven tiered statuses
#[derive(Debug, Clone)]
pub struct TieredStatusSystem {
    table: StatusTable,
}

impl Default for TieredStatusSystem {
    fn default() -> Self {
        Self::new(standard_table().clone())
    }
}

impl TieredStatusSystem {
    pub fn new(table: StatusTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &StatusTable {
        &self.table
    }

    /// Remove one instance, reversing exactly its modifiers
    pub fn remove(&self, target: &mut Combatant, instance: StatusInstanceId) -> bool {
        let Some(index) = target.statuses.iter().position(|s| s.instance == instance) else {
            return false;
        };
        let status = target.statuses.remove(index);
        status.reverse_from(&mut target.modifiers);
        target.clamp_pools();
        true
    }

    fn tick_one(&self, combatant: &mut Combatant, report: &mut TickReport) {
        let id = combatant.id;
        let was_defeated = combatant.defeated;

        // Recurring effects first, using the status as it stood this round
        let recurring: Vec<(String, SpecialEffect)> = combatant
            .statuses
            .iter()
            .flat_map(|s| s.recurring_effects().map(move |e| (s.name.clone(), *e)))
            .collect();

        for (status, effect) in recurring {
            match effect {
                SpecialEffect::DamageOverTime(amount) => {
                    let taken = combatant.take_damage(amount);
                    if taken > 0 {
                        report.push(id, TickEvent::Damaged { status, amount: taken });
                    }
                }
                SpecialEffect::Regeneration(amount) => {
                    let healed = combatant.restore(Pool::Health, amount);
                    if healed > 0 {
                        report.push(id, TickEvent::Healed { status, amount: healed });
                    }
                }
                SpecialEffect::ResourceDrain { pool, amount } => {
                    let drained = combatant.drain(pool, amount);
                    if drained > 0 {
                        report.push(id, TickEvent::Drained { status, pool, amount: drained });
                    }
                }
                SpecialEffect::RollBonus(_) | SpecialEffect::RollPenalty(_) => {}
            }
        }

        if !was_defeated && combatant.defeated {
            report.push(id, TickEvent::Defeated);
        }

        // Then durations
        for status in combatant.statuses.iter_mut() {
            if !status.is_permanent() {
                status.remaining -= 1;
            }
        }

        let expired: Vec<StatusInstanceId> = combatant
            .statuses
            .iter()
            .filter(|s| !s.is_permanent() && s.remaining <= 0)
            .map(|s| s.instance)
            .collect();

        for instance in expired {
            let label = combatant
                .statuses
                .iter()
                .find(|s| s.instance == instance)
                .map(|s| s.label())
                .unwrap_or_default();
            if self.remove(combatant, instance) {
                tracing::debug!(combatant = %combatant.name, status = %label, "status expired");
                report.push(id, TickEvent::Expired { status: label });
            }
        }
    }
}

impl StatusProvider for TieredStatusSystem {
    fn select_tier(&self, margin: i32, target: &Combatant, thresholds: [i32; 3]) -> Severity {
        let base = Severity::from_margin(margin, thresholds);
        // Old wounds make new ones worse
        let scarred = target
            .consequences
            .iter()
            .any(|c| c.severity >= Severity::Severe);
        if scarred {
            base.escalate()
        } else {
            base
        }
    }

    fn apply(&self, name: &str, severity: Severity, target: &mut Combatant) -> Result<ApplicationResult> {
        if target.defeated {
            return Ok(ApplicationResult::TargetDefeated);
        }

        let template = self
            .table
            .get(name)
            .ok_or_else(|| CombatError::UnknownStatus(name.to_string()))?;

        if target.resists(template.kind) {
            return Ok(ApplicationResult::Resisted {
                name: template.name.clone(),
            });
        }

        let instance = StatusInstanceId(target.status_serial + 1);
        let status = self.table.instantiate(name, severity, instance)?;
        target.status_serial = instance.0;

        status.apply_to(&mut target.modifiers);
        target.clamp_pools();

        let result = ApplicationResult::Applied {
            instance,
            label: status.label(),
            duration: status.remaining,
        };
        tracing::debug!(combatant = %target.name, status = %status.label(), "status applied");
        target.statuses.push(status);
        Ok(result)
    }

    fn tick(&self, combatants: &mut [Combatant]) -> TickReport {
        let mut report = TickReport::new();
        for combatant in combatants.iter_mut() {
            self.tick_one(combatant, &mut report);
        }
        report
    }
}

/// Statuses switched off: nothing is applied, nothing ticks
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatusProvider;

impl StatusProvider for NullStatusProvider {
    fn select_tier(&self, margin: i32, _target: &Combatant, thresholds: [i32; 3]) -> Severity {
        Severity::from_margin(margin, thresholds)
    }

    fn apply(&self, _name: &str, _severity: Severity, _target: &mut Combatant) -> Result<ApplicationResult> {
        Ok(ApplicationResult::Disabled)
    }

    fn tick(&self, _combatants: &mut [Combatant]) -> TickReport {
        TickReport::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::CombatantType;
    use crate::combat::domain::{Domain, DomainRatings};
    use crate::combat::stats::Stat;
    use crate::combat::status_kind::BaseStatus;
    use crate::status::consequence::Consequence;
    use crate::status::severity::StatusSource;

    fn target() -> Combatant {
        Combatant::new(
            "Target",
            CombatantType::Enemy,
            DomainRatings::new().with(Domain::Body, 3).with(Domain::Mind, 2),
        )
        .with_pools(30, 10, 10, 10)
    }

    #[test]
    fn test_moderate_wounded_expires_after_four_ticks() {
        let system = TieredStatusSystem::default();
        let mut combatants = vec![target()];

        let result = system
            .apply("Wounded", Severity::Moderate, &mut combatants[0])
            .unwrap();
        assert_eq!(result.applied_label(), Some("Moderate Wounded"));
        assert_eq!(combatants[0].effective_domain(Domain::Body), 2);

        for _ in 0..3 {
            system.tick(&mut combatants);
            assert_eq!(combatants[0].effective_domain(Domain::Body), 2);
        }
        let report = system.tick(&mut combatants);
        assert_eq!(report.expired_count(), 1);
        assert_eq!(combatants[0].effective_domain(Domain::Body), 3);
        assert!(combatants[0].statuses.is_empty());
        assert!(combatants[0].modifiers.is_empty());
    }

    #[test]
    fn test_stacked_instances_removed_independently() {
        let system = TieredStatusSystem::default();
        let mut c = target();
        system.apply("Wounded", Severity::Minor, &mut c).unwrap(); // 2 rounds
        system.apply("Wounded", Severity::Moderate, &mut c).unwrap(); // 4 rounds
        assert_eq!(c.modifiers.domain(Domain::Body), -2);

        let mut combatants = vec![c];
        system.tick(&mut combatants);
        system.tick(&mut combatants);
        assert_eq!(combatants[0].modifiers.domain(Domain::Body), -1);
        assert_eq!(combatants[0].statuses.len(), 1);
    }

    #[test]
    fn test_damage_over_time_and_defeat() {
        let system = TieredStatusSystem::default();
        let mut c = target();
        c.health.current = 3;
        system.apply("Burning", Severity::Critical, &mut c).unwrap();

        let mut combatants = vec![c];
        let report = system.tick(&mut combatants);
        assert_eq!(combatants[0].health.current, 0);
        assert!(combatants[0].is_defeated());
        assert_eq!(report.defeated().count(), 1);
    }

    #[test]
    fn test_resisted_status() {
        let system = TieredStatusSystem::default();
        let mut c = target();
        c.resistances.push(BaseStatus::Poisoned);
        let result = system.apply("Poisoned", Severity::Severe, &mut c).unwrap();
        assert!(matches!(result, ApplicationResult::Resisted { .. }));
        assert!(c.statuses.is_empty());
    }

    #[test]
    fn test_unknown_status_is_error() {
        let system = TieredStatusSystem::default();
        let mut c = target();
        assert!(system.apply("Petrified", Severity::Minor, &mut c).is_err());
    }

    #[test]
    fn test_consequence_escalates_tier() {
        let system = TieredStatusSystem::default();
        let mut c = target();
        assert_eq!(system.select_tier(4, &c, [3, 5, 8]), Severity::Moderate);
        c.consequences
            .push(Consequence::from_hit(StatusSource::Physical, Severity::Severe, 1));
        assert_eq!(system.select_tier(4, &c, [3, 5, 8]), Severity::Severe);
    }

    #[test]
    fn test_max_pool_shrink_clamps_and_restores_max() {
        let system = TieredStatusSystem::default();
        let mut c = target();
        let applied = system.apply("Exhausted", Severity::Critical, &mut c).unwrap();
        assert_eq!(c.effective_max(Pool::Stamina), 5);
        assert_eq!(c.stamina.current, 5);

        if let ApplicationResult::Applied { instance, .. } = applied {
            assert!(system.remove(&mut c, instance));
        }
        assert_eq!(c.effective_max(Pool::Stamina), 10);
        assert_eq!(c.modifiers.stat(Stat::MaxStamina), 0);
    }

    #[test]
    fn test_null_provider_does_nothing() {
        let mut c = target();
        let result = NullStatusProvider.apply("Wounded", Severity::Critical, &mut c).unwrap();
        assert_eq!(result, ApplicationResult::Disabled);
        assert!(c.statuses.is_empty());
    }
}
