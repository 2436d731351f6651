//! Resolution engine: rolls, exchanges and their results

pub mod dice;
pub mod engine;
pub mod result;

pub use dice::{RollSource, ScriptedRolls, SeededDice};
pub use engine::CombatSystem;
pub use result::{Restored, RollBreakdown, RoundResult};
