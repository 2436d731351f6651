//! Consequences: lasting scars left by severe hits
//!
//! The engine only creates them and uses them to escalate later status
//! tiers. Narrative collaborators decide what they mean after the fight.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::constants::PERMANENT;
use crate::combat::domain::Domain;
use crate::combat::stats::Stat;
use crate::core::types::Round;
use crate::status::severity::{Severity, StatusSource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consequence {
    pub name: String,
    pub description: String,
    pub severity: Severity,
    pub source: StatusSource,
    /// Days it lingers after combat (-1 = permanent)
    pub duration: i32,
    pub affected_domains: Vec<Domain>,
    pub stat_deltas: BTreeMap<Stat, i32>,
    /// Round of the hit that caused it
    pub round: Round,
}

impl Consequence {
    pub fn is_permanent(&self) -> bool {
        self.duration == PERMANENT
    }

    /// Consequence for a severe hit of the given source
    pub fn from_hit(source: StatusSource, severity: Severity, round: Round) -> Self {
        let (name, description, domains, stat): (&str, &str, &[Domain], Stat) = match source {
            StatusSource::Physical => (
                "Broken Ribs",
                "every deep breath is a reminder",
                &[Domain::Body],
                Stat::MaxStamina,
            ),
            StatusSource::Mental => (
                "Shattered Composure",
                "thoughts keep slipping back to the moment of the blow",
                &[Domain::Mind, Domain::Awareness],
                Stat::MaxFocus,
            ),
            StatusSource::Spiritual => (
                "Soul Scar",
                "something was torn loose that does not grow back",
                &[Domain::Spirit],
                Stat::MaxSpirit,
            ),
            StatusSource::Environmental => (
                "Lingering Burns",
                "the skin remembers the heat",
                &[Domain::Body],
                Stat::MaxHealth,
            ),
            StatusSource::Magical => (
                "Arcane Brand",
                "a mark that hums when magic is near",
                &[Domain::Spirit, Domain::Mind],
                Stat::MaxSpirit,
            ),
            StatusSource::Social => (
                "Public Humiliation",
                "word of this defeat travels fast",
                &[Domain::Social, Domain::Authority],
                Stat::Attack,
            ),
        };

        let (duration, delta) = match severity {
            Severity::Minor => (1, -1),
            Severity::Moderate => (3, -1),
            Severity::Severe => (7, -2),
            Severity::Critical => (PERMANENT, -2),
        };

        let mut stat_deltas = BTreeMap::new();
        stat_deltas.insert(stat, delta);

        Self {
            name: name.to_string(),
            description: description.to_string(),
            severity,
            source,
            duration,
            affected_domains: domains.to_vec(),
            stat_deltas,
            round,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_consequence_is_permanent() {
        let c = Consequence::from_hit(StatusSource::Physical, Severity::Critical, 3);
        assert!(c.is_permanent());
        assert_eq!(c.name, "Broken Ribs");
        assert_eq!(c.round, 3);
    }

    #[test]
    fn test_severe_consequence_time_boxed() {
        let c = Consequence::from_hit(StatusSource::Mental, Severity::Severe, 1);
        assert!(!c.is_permanent());
        assert_eq!(c.duration, 7);
        assert_eq!(c.stat_deltas.get(&Stat::MaxFocus), Some(&-2));
    }
}
