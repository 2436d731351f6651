//! Status table: canonical modifier sets per status and severity
//!
//! Pure data. Adding a status means adding a template here (or in a
//! TOML table loaded at startup); nothing in the resolution engine changes.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::combat::domain::Domain;
use crate::combat::stats::{Pool, Stat};
use crate::combat::status_kind::BaseStatus;
use crate::core::error::{CombatError, Result};
use crate::status::enhanced::{EnhancedStatus, SpecialEffect, StatusInstanceId};
use crate::status::severity::{Severity, StatusSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainDelta {
    pub domain: Domain,
    pub delta: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDelta {
    pub stat: Stat,
    pub delta: i32,
}

/// Modifier set for one severity of a status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierProfile {
    pub severity: Severity,
    /// Rounds (-1 = permanent)
    pub duration: i32,
    #[serde(default)]
    pub domains: Vec<DomainDelta>,
    #[serde(default)]
    pub stats: Vec<StatDelta>,
    #[serde(default)]
    pub effects: Vec<SpecialEffect>,
}

/// A status and its per-severity profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTemplate {
    pub name: String,
    pub kind: BaseStatus,
    pub source: StatusSource,
    pub tiers: Vec<TierProfile>,
}

impl StatusTemplate {
    /// Profile for a severity: exact match, else the closest lower tier,
    /// else the mildest tier defined
    pub fn profile(&self, severity: Severity) -> Option<&TierProfile> {
        self.tiers
            .iter()
            .filter(|t| t.severity <= severity)
            .max_by_key(|t| t.severity)
            .or_else(|| self.tiers.iter().min_by_key(|t| t.severity))
    }
}

#[derive(Debug, Deserialize)]
struct StatusFile {
    statuses: Vec<StatusTemplate>,
}

/// All known status templates, keyed by lowercase name
#[derive(Debug, Clone, Default)]
pub struct StatusTable {
    templates: AHashMap<String, StatusTemplate>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template: StatusTemplate) {
        self.templates.insert(template.name.to_lowercase(), template);
    }

    pub fn get(&self, name: &str) -> Option<&StatusTemplate> {
        self.templates.get(&name.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Add (or replace) templates from a TOML document with `[[statuses]]` entries
    pub fn extend_from_toml_str(&mut self, contents: &str) -> Result<usize> {
        let file: StatusFile = toml::from_str(contents)?;
        let count = file.statuses.len();
        for template in file.statuses {
            if template.tiers.is_empty() {
                return Err(CombatError::UnknownStatus(format!(
                    "{} defines no severity tiers",
                    template.name
                )));
            }
            self.insert(template);
        }
        Ok(count)
    }

    /// Status a hit from this source inflicts when the move names none
    pub fn default_for(source: StatusSource) -> &'static str {
        match source {
            StatusSource::Physical => "Wounded",
            StatusSource::Mental => "Confused",
            StatusSource::Spiritual => "Cursed",
            StatusSource::Environmental => "Exhausted",
            StatusSource::Magical => "Burning",
            StatusSource::Social => "Demoralized",
        }
    }

    /// Build a fresh status instance from a template
    pub fn instantiate(
        &self,
        name: &str,
        severity: Severity,
        instance: StatusInstanceId,
    ) -> Result<EnhancedStatus> {
        let template = self
            .get(name)
            .ok_or_else(|| CombatError::UnknownStatus(name.to_string()))?;
        let profile = template
            .profile(severity)
            .ok_or_else(|| CombatError::UnknownStatus(format!("{} has no tiers", name)))?;

        let mut domain_modifiers = BTreeMap::new();
        for d in &profile.domains {
            *domain_modifiers.entry(d.domain).or_insert(0) += d.delta;
        }
        let mut stat_modifiers = BTreeMap::new();
        for s in &profile.stats {
            *stat_modifiers.entry(s.stat).or_insert(0) += s.delta;
        }

        Ok(EnhancedStatus {
            instance,
            name: template.name.clone(),
            kind: template.kind,
            severity: profile.severity,
            source: template.source,
            remaining: profile.duration,
            affected_domains: domain_modifiers.keys().copied().collect(),
            stat_modifiers,
            domain_modifiers,
            special_effects: profile.effects.clone(),
        })
    }

    /// The built-in status set
    pub fn standard() -> Self {
        use BaseStatus as K;
        use Domain::*;
        use Severity::*;
        use SpecialEffect::*;
        use Stat::*;
        use StatusSource as S;

        let mut table = StatusTable::new();

        table.insert(template("Wounded", K::Wounded, S::Physical, vec![
            tier(Minor, 2, &[(Body, -1)], &[], &[]),
            tier(Moderate, 4, &[(Body, -1)], &[], &[]),
            tier(Severe, 5, &[(Body, -2)], &[(MaxStamina, -2)], &[DamageOverTime(1)]),
            tier(Critical, 6, &[(Body, -3)], &[(MaxStamina, -3)], &[DamageOverTime(2)]),
        ]));
        table.insert(template("Bleeding", K::Bleeding, S::Physical, vec![
            tier(Minor, 2, &[], &[], &[DamageOverTime(1)]),
            tier(Moderate, 3, &[], &[], &[DamageOverTime(2)]),
            tier(Severe, 4, &[], &[], &[DamageOverTime(3)]),
            tier(Critical, 5, &[(Body, -1)], &[], &[DamageOverTime(4)]),
        ]));
        table.insert(template("Poisoned", K::Poisoned, S::Physical, vec![
            tier(Minor, 3, &[], &[], &[DamageOverTime(1)]),
            tier(Moderate, 3, &[(Body, -1)], &[], &[DamageOverTime(2)]),
            tier(Severe, 4, &[(Body, -1), (Mind, -1)], &[], &[DamageOverTime(3)]),
            tier(Critical, 5, &[(Body, -2), (Mind, -1)], &[], &[DamageOverTime(4)]),
        ]));
        table.insert(template("Burning", K::Burning, S::Magical, vec![
            tier(Minor, 2, &[], &[], &[DamageOverTime(2)]),
            tier(Moderate, 2, &[], &[], &[DamageOverTime(3)]),
            tier(Severe, 3, &[], &[(Defense, -1)], &[DamageOverTime(4)]),
            tier(Critical, 3, &[], &[(Defense, -2)], &[DamageOverTime(6)]),
        ]));
        table.insert(template("Confused", K::Confused, S::Mental, vec![
            tier(Minor, 1, &[(Mind, -1)], &[], &[]),
            tier(Moderate, 2, &[(Mind, -1), (Awareness, -1)], &[], &[]),
            tier(Severe, 3, &[(Mind, -2), (Awareness, -1)], &[], &[RollPenalty(1)]),
            tier(Critical, 3, &[(Mind, -3), (Awareness, -2)], &[], &[RollPenalty(2)]),
        ]));
        table.insert(template("Stunned", K::Stunned, S::Physical, vec![
            tier(Minor, 1, &[(Awareness, -1)], &[(Defense, -1)], &[]),
            tier(Moderate, 1, &[(Awareness, -2)], &[(Defense, -2)], &[]),
            tier(Severe, 2, &[(Awareness, -2)], &[(Defense, -2)], &[RollPenalty(2)]),
            tier(Critical, 2, &[(Awareness, -3)], &[(Defense, -3)], &[RollPenalty(3)]),
        ]));
        table.insert(template("Frightened", K::Frightened, S::Social, vec![
            tier(Minor, 2, &[(Authority, -1)], &[], &[]),
            tier(Moderate, 3, &[(Authority, -1), (Spirit, -1)], &[(Attack, -1)], &[]),
            tier(Severe, 3, &[(Authority, -2), (Spirit, -1)], &[(Attack, -2)], &[]),
            tier(Critical, 4, &[(Authority, -2), (Spirit, -2)], &[(Attack, -2)], &[RollPenalty(1)]),
        ]));
        table.insert(template("Exhausted", K::Exhausted, S::Environmental, vec![
            tier(Minor, 3, &[], &[(MaxStamina, -2)], &[]),
            tier(Moderate, 3, &[(Body, -1)], &[(MaxStamina, -3)], &[ResourceDrain { pool: Pool::Stamina, amount: 1 }]),
            tier(Severe, 4, &[(Body, -1)], &[(MaxStamina, -4)], &[ResourceDrain { pool: Pool::Stamina, amount: 2 }]),
            tier(Critical, 5, &[(Body, -2)], &[(MaxStamina, -5)], &[ResourceDrain { pool: Pool::Stamina, amount: 2 }]),
        ]));
        table.insert(template("Cursed", K::Cursed, S::Spiritual, vec![
            tier(Minor, 3, &[(Spirit, -1)], &[], &[]),
            tier(Moderate, 4, &[(Spirit, -1)], &[(MaxSpirit, -2)], &[]),
            tier(Severe, 5, &[(Spirit, -2)], &[(MaxSpirit, -3)], &[ResourceDrain { pool: Pool::Spirit, amount: 1 }]),
            tier(Critical, 6, &[(Spirit, -3)], &[(MaxSpirit, -4)], &[ResourceDrain { pool: Pool::Spirit, amount: 2 }]),
        ]));
        table.insert(template("Demoralized", K::Demoralized, S::Social, vec![
            tier(Minor, 2, &[(Social, -1)], &[], &[]),
            tier(Moderate, 3, &[(Social, -1), (Authority, -1)], &[], &[]),
            tier(Severe, 3, &[(Social, -2), (Authority, -1)], &[(Attack, -1)], &[]),
            tier(Critical, 4, &[(Social, -2), (Authority, -2)], &[(Attack, -2)], &[]),
        ]));

        // Beneficial
        table.insert(template("Empowered", K::Empowered, S::Physical, vec![
            tier(Minor, 2, &[(Body, 1)], &[], &[]),
            tier(Moderate, 3, &[(Body, 1)], &[(Attack, 1)], &[]),
            tier(Severe, 3, &[(Body, 2)], &[(Attack, 1)], &[]),
            tier(Critical, 4, &[(Body, 2)], &[(Attack, 2)], &[]),
        ]));
        table.insert(template("Focused", K::Focused, S::Mental, vec![
            tier(Minor, 2, &[(Mind, 1)], &[], &[]),
            tier(Moderate, 3, &[(Mind, 1), (Awareness, 1)], &[], &[]),
            tier(Severe, 3, &[(Mind, 2), (Awareness, 1)], &[], &[RollBonus(1)]),
            tier(Critical, 4, &[(Mind, 2), (Awareness, 2)], &[], &[RollBonus(2)]),
        ]));
        table.insert(template("Shielded", K::Shielded, S::Physical, vec![
            tier(Minor, 2, &[], &[(Defense, 1)], &[]),
            tier(Moderate, 2, &[], &[(Defense, 2)], &[]),
            tier(Severe, 3, &[], &[(Defense, 3)], &[]),
            tier(Critical, 3, &[], &[(Defense, 4), (MaxHealth, 5)], &[]),
        ]));
        table.insert(template("Inspired", K::Inspired, S::Social, vec![
            tier(Minor, 2, &[(Authority, 1)], &[], &[]),
            tier(Moderate, 3, &[(Authority, 1), (Spirit, 1)], &[], &[]),
            tier(Severe, 3, &[(Authority, 1), (Spirit, 1)], &[(Attack, 1)], &[Regeneration(1)]),
            tier(Critical, 4, &[(Authority, 2), (Spirit, 2)], &[(Attack, 1)], &[Regeneration(2)]),
        ]));

        table
    }
}

fn template(name: &str, kind: BaseStatus, source: StatusSource, tiers: Vec<TierProfile>) -> StatusTemplate {
    StatusTemplate {
        name: name.to_string(),
        kind,
        source,
        tiers,
    }
}

fn tier(
    severity: Severity,
    duration: i32,
    domains: &[(Domain, i32)],
    stats: &[(Stat, i32)],
    effects: &[SpecialEffect],
) -> TierProfile {
    TierProfile {
        severity,
        duration,
        domains: domains.iter().map(|(domain, delta)| DomainDelta { domain: *domain, delta: *delta }).collect(),
        stats: stats.iter().map(|(stat, delta)| StatDelta { stat: *stat, delta: *delta }).collect(),
        effects: effects.to_vec(),
    }
}

/// Shared read-only standard table
pub fn standard_table() -> &'static StatusTable {
    static TABLE: OnceLock<StatusTable> = OnceLock::new();
    TABLE.get_or_init(StatusTable::standard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderate_wounded_profile() {
        let status = standard_table()
            .instantiate("Wounded", Severity::Moderate, StatusInstanceId(1))
            .unwrap();
        assert_eq!(status.remaining, 4);
        assert_eq!(status.domain_modifiers.get(&Domain::Body), Some(&-1));
        assert_eq!(status.affected_domains, vec![Domain::Body]);
        assert!(status.special_effects.is_empty());
    }

    #[test]
    fn test_unknown_status_errors() {
        let result = standard_table().instantiate("Petrified", Severity::Minor, StatusInstanceId(1));
        assert!(matches!(result, Err(CombatError::UnknownStatus(_))));
    }

    #[test]
    fn test_defaults_exist_for_every_source() {
        for source in [
            StatusSource::Physical,
            StatusSource::Mental,
            StatusSource::Spiritual,
            StatusSource::Environmental,
            StatusSource::Magical,
            StatusSource::Social,
        ] {
            assert!(standard_table().get(StatusTable::default_for(source)).is_some());
        }
    }

    #[test]
    fn test_profile_falls_back_to_lower_tier() {
        let t = template("Dazed", BaseStatus::Stunned, StatusSource::Physical, vec![
            tier(Severity::Minor, 1, &[(Domain::Awareness, -1)], &[], &[]),
            tier(Severity::Severe, 2, &[(Domain::Awareness, -2)], &[], &[]),
        ]);
        assert_eq!(t.profile(Severity::Moderate).unwrap().severity, Severity::Minor);
        assert_eq!(t.profile(Severity::Critical).unwrap().severity, Severity::Severe);
    }

    #[test]
    fn test_load_from_toml() {
        let mut table = StatusTable::new();
        let count = table
            .extend_from_toml_str(
                r#"
                [[statuses]]
                name = "Soaked"
                kind = "Exhausted"
                source = "Environmental"

                [[statuses.tiers]]
                severity = "Minor"
                duration = 2
                domains = [{ domain = "Awareness", delta = -1 }]
                effects = [{ RollPenalty = 1 }]
                "#,
            )
            .unwrap();
        assert_eq!(count, 1);
        let soaked = table.instantiate("soaked", Severity::Critical, StatusInstanceId(3)).unwrap();
        assert_eq!(soaked.severity, Severity::Minor);
        assert_eq!(soaked.roll_modifier(), -1);
    }
}
