//! Tale Combat - turn-based combat resolution for text adventures

pub mod ai;
pub mod combat;
pub mod core;
pub mod environment;
pub mod resolution;
pub mod session;
pub mod status;

pub use crate::core::{CombatConfig, CombatError, CombatId, CombatantId, Result};
pub use crate::resolution::{CombatSystem, RollSource, RoundResult, ScriptedRolls, SeededDice};
pub use crate::session::{
    CombatRegistry, CombatSession, CombatSetup, CombatStatus, CombatantSnapshot, FinalState, PlayerAction,
};
