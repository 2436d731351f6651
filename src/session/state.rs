//! Combat session state: one independent fight

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ai::EnemyMind;
use crate::combat::combatant::{Combatant, CombatantType};
use crate::combat::move_type::MoveType;
use crate::core::types::{CombatId, CombatantId, Round};
use crate::environment::state::Environment;

/// Overall state of a combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CombatStatus {
    #[default]
    Active,
    /// Every enemy defeated
    Victory,
    /// The player defeated
    Defeat,
    /// The player escaped
    Fled,
    /// Ended from outside before a decision
    Neutral,
}

impl CombatStatus {
    pub fn is_terminal(self) -> bool {
        self != CombatStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    Start,
    Interaction,
    Exchange,
    Status,
    Defeat,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub round: Round,
    pub kind: LogKind,
    pub description: String,
}

/// Registry entry for one combat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatSession {
    pub id: CombatId,
    /// Round about to be resolved (starts at 1)
    pub round: Round,
    pub combatants: Vec<Combatant>,
    /// Per-combatant momentum, always within `0..=momentum_cap`
    pub momentum: BTreeMap<CombatantId, u8>,
    pub environment: Environment,
    pub log: Vec<CombatLogEntry>,
    pub status: CombatStatus,
    /// Seed the session's dice were built from
    pub seed: u64,
    /// AI state of every acting enemy
    pub minds: Vec<EnemyMind>,
    pub player_last_move: Option<MoveType>,
}

impl CombatSession {
    pub fn new(id: CombatId, combatants: Vec<Combatant>, environment: Environment, seed: u64) -> Self {
        let momentum = combatants.iter().map(|c| (c.id, 0)).collect();
        Self {
            id,
            round: 1,
            combatants,
            momentum,
            environment,
            log: Vec::new(),
            status: CombatStatus::Active,
            seed,
            minds: Vec::new(),
            player_last_move: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CombatStatus::Active
    }

    pub fn index_of(&self, id: CombatantId) -> Option<usize> {
        self.combatants.iter().position(|c| c.id == id)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.kind == CombatantType::Player)
    }

    pub fn player_id(&self) -> Option<CombatantId> {
        self.player().map(|c| c.id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| c.kind == CombatantType::Enemy)
    }

    pub fn standing_enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.enemies().filter(|c| !c.is_defeated())
    }

    /// Default target: first enemy still standing
    pub fn first_standing_enemy(&self) -> Option<CombatantId> {
        self.standing_enemies().next().map(|c| c.id)
    }

    /// Two distinct combatants by index, mutably
    pub fn pair_mut(&mut self, first: usize, second: usize) -> Option<(&mut Combatant, &mut Combatant)> {
        if first == second || first >= self.combatants.len() || second >= self.combatants.len() {
            return None;
        }
        if first < second {
            let (left, right) = self.combatants.split_at_mut(second);
            Some((&mut left[first], &mut right[0]))
        } else {
            let (left, right) = self.combatants.split_at_mut(first);
            Some((&mut right[0], &mut left[second]))
        }
    }

    pub fn momentum_of(&self, id: CombatantId) -> u8 {
        self.momentum.get(&id).copied().unwrap_or(0)
    }

    /// Winner gains one (up to `cap`), loser drops one (down to 0)
    pub fn shift_momentum(&mut self, winner: CombatantId, loser: CombatantId, cap: u8) -> (u8, u8) {
        let won = self.momentum_of(winner).saturating_add(1).min(cap);
        let lost = self.momentum_of(loser).saturating_sub(1).min(cap);
        self.momentum.insert(winner, won);
        self.momentum.insert(loser, lost);
        (won, lost)
    }

    pub fn mind(&self, id: CombatantId) -> Option<&EnemyMind> {
        self.minds.iter().find(|m| m.combatant == id)
    }

    pub fn mind_mut(&mut self, id: CombatantId) -> Option<&mut EnemyMind> {
        self.minds.iter_mut().find(|m| m.combatant == id)
    }

    pub fn push_log(&mut self, kind: LogKind, description: impl Into<String>) {
        self.log.push(CombatLogEntry {
            round: self.round,
            kind,
            description: description.into(),
        });
    }

    /// Recompute Victory/Defeat from who is still standing
    ///
    /// Terminal states stick. Defeat wins over Victory when both sides
    /// fall in the same round.
    pub fn refresh_status(&mut self) -> CombatStatus {
        if self.status.is_terminal() {
            return self.status;
        }
        if self.player().map_or(true, |p| p.is_defeated()) {
            self.status = CombatStatus::Defeat;
        } else if self.enemies().all(|e| e.is_defeated()) {
            self.status = CombatStatus::Victory;
        }
        self.status
    }
}
