//! Monster archetypes and threat tiers
//!
//! Archetypes produce ready-made enemy snapshots; the tier scales pools
//! and adds a flat bonus to every rated domain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::combat::combatant::CombatantType;
use crate::combat::constants::DOMAIN_MAX;
use crate::combat::domain::Domain;
use crate::combat::status_kind::BaseStatus;
use crate::session::snapshot::CombatantSnapshot;

/// Type of monster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    GoblinSkirmisher, // Quick, dirty, fragile
    BanditBrute,      // Hits hard, thinks little
    ShadowStalker,    // Strikes from the dark
    HollowPriest,     // Curses and hexes
    StoneWarden,      // Slow, armored, stubborn
}

/// How dangerous a spawned monster is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ThreatTier {
    Minion,
    #[default]
    Standard,
    Elite,
    Boss,
}

impl ThreatTier {
    /// Pool multiplier
    pub fn pool_scale(self) -> f32 {
        match self {
            ThreatTier::Minion => 0.6,
            ThreatTier::Standard => 1.0,
            ThreatTier::Elite => 1.5,
            ThreatTier::Boss => 2.5,
        }
    }

    /// Added to every rated domain
    pub fn domain_bonus(self) -> i32 {
        match self {
            ThreatTier::Minion => -1,
            ThreatTier::Standard => 0,
            ThreatTier::Elite => 1,
            ThreatTier::Boss => 2,
        }
    }

    fn label(self) -> Option<&'static str> {
        match self {
            ThreatTier::Minion | ThreatTier::Standard => None,
            ThreatTier::Elite => Some("Elite"),
            ThreatTier::Boss => Some("Dread"),
        }
    }
}

struct ArchetypeProfile {
    name: &'static str,
    domains: &'static [(Domain, i32)],
    pools: (i32, i32, i32, i32),
    moves: &'static [&'static str],
    weak: &'static [Domain],
    strong: &'static [Domain],
    resistances: &'static [BaseStatus],
    personality: &'static str,
}

impl Archetype {
    pub fn all() -> &'static [Archetype] {
        &[
            Archetype::GoblinSkirmisher,
            Archetype::BanditBrute,
            Archetype::ShadowStalker,
            Archetype::HollowPriest,
            Archetype::StoneWarden,
        ]
    }

    pub fn name(&self) -> &'static str {
        self.profile().name
    }

    fn profile(&self) -> ArchetypeProfile {
        use Domain::*;
        match self {
            Archetype::GoblinSkirmisher => ArchetypeProfile {
                name: "Goblin Skirmisher",
                domains: &[(Body, 2), (Craft, 3), (Awareness, 3), (Mind, 1)],
                pools: (20, 10, 6, 4),
                moves: &["strike", "feint", "dirty_trick", "catch_breath"],
                weak: &[Authority],
                strong: &[Awareness],
                resistances: &[],
                personality: "trickster",
            },
            Archetype::BanditBrute => ArchetypeProfile {
                name: "Bandit Brute",
                domains: &[(Body, 4), (Craft, 1), (Authority, 2)],
                pools: (34, 14, 4, 4),
                moves: &["strike", "heavy_blow", "shield_bash", "taunt", "catch_breath"],
                weak: &[Mind],
                strong: &[Body],
                resistances: &[BaseStatus::Frightened],
                personality: "berserker",
            },
            Archetype::ShadowStalker => ArchetypeProfile {
                name: "Shadow Stalker",
                domains: &[(Craft, 4), (Awareness, 4), (Body, 2), (Mind, 2)],
                pools: (24, 10, 10, 4),
                moves: &["feint", "poisoned_blade", "read_the_flow", "strike"],
                weak: &[Spirit],
                strong: &[Awareness],
                resistances: &[BaseStatus::Poisoned],
                personality: "tactician",
            },
            Archetype::HollowPriest => ArchetypeProfile {
                name: "Hollow Priest",
                domains: &[(Spirit, 4), (Mind, 3), (Authority, 2), (Body, 1)],
                pools: (22, 6, 10, 14),
                moves: &["spirit_lance", "hex", "taunt", "meditate", "strike"],
                weak: &[Body],
                strong: &[Spirit],
                resistances: &[BaseStatus::Cursed],
                personality: "zealot",
            },
            Archetype::StoneWarden => ArchetypeProfile {
                name: "Stone Warden",
                domains: &[(Body, 4), (Spirit, 2), (Awareness, 1)],
                pools: (44, 12, 4, 8),
                moves: &["heavy_blow", "shield_bash", "iron_guard", "strike"],
                weak: &[Craft, Awareness],
                strong: &[Body],
                resistances: &[BaseStatus::Bleeding, BaseStatus::Poisoned],
                personality: "default",
            },
        }
    }

    /// Enemy snapshot of this archetype at a threat tier
    pub fn spawn(&self, tier: ThreatTier) -> CombatantSnapshot {
        let profile = self.profile();
        let scale = |value: i32| ((value as f32 * tier.pool_scale()).round() as i32).max(1);
        let (health, stamina, focus, spirit) = profile.pools;

        let name = match tier.label() {
            Some(label) => format!("{} {}", label, profile.name),
            None => profile.name.to_string(),
        };

        let mut snapshot = CombatantSnapshot::new(name, CombatantType::Enemy)
            .with_pools(scale(health), scale(stamina), scale(focus), scale(spirit))
            .with_moves(profile.moves)
            .with_personality(profile.personality);
        for (domain, rating) in profile.domains {
            snapshot = snapshot.with_domain(*domain, (rating + tier.domain_bonus()).clamp(0, DOMAIN_MAX));
        }
        snapshot.weak_domains = profile.weak.to_vec();
        snapshot.strong_domains = profile.strong.to_vec();
        snapshot.resistances = profile.resistances.to_vec();
        snapshot
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Archetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['_', '-'], " ");
        Archetype::all()
            .iter()
            .copied()
            .find(|a| a.name().to_lowercase() == key)
            .ok_or_else(|| format!("unknown archetype '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::moves::standard_library;

    #[test]
    fn test_every_archetype_knows_its_moves() {
        for archetype in Archetype::all() {
            let snapshot = archetype.spawn(ThreatTier::Standard);
            let combatant = snapshot.to_combatant(standard_library());
            assert_eq!(combatant.moves.len(), snapshot.moves.len(), "{}", archetype);
        }
    }

    #[test]
    fn test_tier_scaling() {
        let standard = Archetype::BanditBrute.spawn(ThreatTier::Standard);
        let boss = Archetype::BanditBrute.spawn(ThreatTier::Boss);
        assert_eq!(standard.health, 34);
        assert_eq!(boss.health, 85);
        assert_eq!(boss.domains.get(&Domain::Body), Some(&6));
        assert_eq!(boss.name, "Dread Bandit Brute");
    }

    #[test]
    fn test_minion_domains_floor_at_zero() {
        let minion = Archetype::StoneWarden.spawn(ThreatTier::Minion);
        assert_eq!(minion.domains.get(&Domain::Awareness), Some(&0));
    }

    #[test]
    fn test_parse_archetype() {
        assert_eq!("shadow_stalker".parse::<Archetype>().unwrap(), Archetype::ShadowStalker);
        assert!("dragon".parse::<Archetype>().is_err());
    }
}
