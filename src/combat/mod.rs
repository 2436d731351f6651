//! Combat data model: domains, move types, moves, statuses, combatants

pub mod combatant;
pub mod constants;
pub mod domain;
pub mod move_type;
pub mod moves;
pub mod stats;
pub mod status_kind;

pub use combatant::{Combatant, CombatantType};
pub use domain::{Domain, DomainRatings};
pub use move_type::{advantage, Advantage, MoveType};
pub use moves::{standard_library, CombatMove, MoveCost, MoveLibrary, Restore};
pub use stats::{ModifierLedger, Pool, ResourcePool, Stat};
pub use status_kind::BaseStatus;
