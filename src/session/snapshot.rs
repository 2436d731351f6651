//! Snapshots: read-only combatant descriptions from outside the engine
//!
//! Character sheets and monster records arrive as snapshots and become
//! `Combatant`s exactly once, at session start.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::combatant::{Combatant, CombatantType};
use crate::combat::domain::{Domain, DomainRatings};
use crate::combat::moves::MoveLibrary;
use crate::combat::status_kind::BaseStatus;
use crate::core::types::CombatantId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    #[serde(default)]
    pub id: Option<CombatantId>,
    pub name: String,
    #[serde(default)]
    pub kind: CombatantType,
    #[serde(default)]
    pub domains: BTreeMap<Domain, i32>,
    #[serde(default = "default_health")]
    pub health: i32,
    #[serde(default = "default_pool")]
    pub stamina: i32,
    #[serde(default = "default_pool")]
    pub focus: i32,
    #[serde(default = "default_pool")]
    pub spirit: i32,
    /// Move ids from the move library
    #[serde(default)]
    pub moves: Vec<String>,
    #[serde(default)]
    pub weak_domains: Vec<Domain>,
    #[serde(default)]
    pub strong_domains: Vec<Domain>,
    #[serde(default)]
    pub resistances: Vec<BaseStatus>,
    /// Personality file name for enemies
    #[serde(default)]
    pub personality: Option<String>,
}

fn default_health() -> i32 {
    30
}

fn default_pool() -> i32 {
    10
}

impl CombatantSnapshot {
    pub fn new(name: impl Into<String>, kind: CombatantType) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            domains: BTreeMap::new(),
            health: default_health(),
            stamina: default_pool(),
            focus: default_pool(),
            spirit: default_pool(),
            moves: Vec::new(),
            weak_domains: Vec::new(),
            strong_domains: Vec::new(),
            resistances: Vec::new(),
            personality: None,
        }
    }

    pub fn with_domain(mut self, domain: Domain, rating: i32) -> Self {
        self.domains.insert(domain, rating);
        self
    }

    pub fn with_pools(mut self, health: i32, stamina: i32, focus: i32, spirit: i32) -> Self {
        self.health = health;
        self.stamina = stamina;
        self.focus = focus;
        self.spirit = spirit;
        self
    }

    pub fn with_moves<S: AsRef<str>>(mut self, moves: &[S]) -> Self {
        self.moves = moves.iter().map(|m| m.as_ref().to_string()).collect();
        self
    }

    pub fn with_personality(mut self, name: impl Into<String>) -> Self {
        self.personality = Some(name.into());
        self
    }

    pub fn with_id(mut self, id: CombatantId) -> Self {
        self.id = Some(id);
        self
    }

    /// Build the combatant. Unknown move ids are skipped with a warning.
    pub fn to_combatant(&self, library: &MoveLibrary) -> Combatant {
        let moves = self
            .moves
            .iter()
            .filter_map(|id| match library.get(id) {
                Some(template) => Some(template.clone()),
                None => {
                    tracing::warn!(combatant = %self.name, move_id = %id, "unknown move id skipped");
                    None
                }
            })
            .collect();

        let mut combatant = Combatant::new(self.name.clone(), self.kind, DomainRatings::from(&self.domains))
            .with_pools(self.health.max(1), self.stamina.max(0), self.focus.max(0), self.spirit.max(0))
            .with_moves(moves);
        if let Some(id) = self.id {
            combatant = combatant.with_id(id);
        }
        combatant.weak_domains = self.weak_domains.clone();
        combatant.strong_domains = self.strong_domains.clone();
        combatant.resistances = self.resistances.clone();
        combatant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::moves::standard_library;

    #[test]
    fn test_unknown_moves_skipped() {
        let snapshot = CombatantSnapshot::new("Hero", CombatantType::Player)
            .with_domain(Domain::Body, 3)
            .with_moves(&["strike", "summon_dragon", "Heavy Blow"]);
        let combatant = snapshot.to_combatant(standard_library());
        assert_eq!(combatant.moves.len(), 2);
        assert_eq!(combatant.domains.get(Domain::Body), 3);
    }

    #[test]
    fn test_fixed_id_kept() {
        let id = CombatantId::from_u128(9);
        let combatant = CombatantSnapshot::new("Hero", CombatantType::Player)
            .with_id(id)
            .to_combatant(standard_library());
        assert_eq!(combatant.id, id);
    }

    #[test]
    fn test_snapshot_from_json() {
        let snapshot: CombatantSnapshot = serde_json::from_str(
            r#"{
                "name": "Mira",
                "domains": { "Craft": 4, "Awareness": 3 },
                "health": 24,
                "moves": ["feint", "dirty_trick"],
                "strong_domains": ["Awareness"]
            }"#,
        )
        .unwrap();
        assert_eq!(snapshot.kind, CombatantType::Player);
        let combatant = snapshot.to_combatant(standard_library());
        assert_eq!(combatant.health.max, 24);
        assert_eq!(combatant.stamina.max, 10);
        assert!(combatant.is_strong_in(Domain::Awareness));
    }
}
