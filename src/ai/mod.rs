//! Adaptive enemy AI
//!
//! Each enemy carries its own `EnemyMind` (personality, memory of the
//! player's moves and the move it has committed to for the coming round)
//! inside the combat session.

pub mod memory;
pub mod personality;
pub mod strategy;

use serde::{Deserialize, Serialize};

use crate::combat::moves::CombatMove;
use crate::core::types::CombatantId;

pub use memory::{MoveMemory, SequenceCount};
pub use personality::{load_or_default, load_personality, load_personality_from, AiPersonality};
pub use strategy::{AIStrategy, AdaptiveStrategy, Decision, DecisionContext, DecisionKind, NullStrategy};

/// Per-enemy AI state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyMind {
    pub combatant: CombatantId,
    pub personality: AiPersonality,
    pub memory: MoveMemory,
    /// Move chosen for the next round
    pub planned: Option<CombatMove>,
}

impl EnemyMind {
    pub fn new(combatant: CombatantId, personality: AiPersonality, memory_size: usize) -> Self {
        Self {
            combatant,
            personality,
            memory: MoveMemory::new(memory_size),
            planned: None,
        }
    }
}
