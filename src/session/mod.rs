//! Combat sessions and the registry that owns them

pub mod bestiary;
pub mod registry;
pub mod snapshot;
pub mod state;

pub use bestiary::{Archetype, ThreatTier};
pub use registry::{CombatRegistry, CombatSetup, FinalState, PlayerAction};
pub use snapshot::CombatantSnapshot;
pub use state::{CombatLogEntry, CombatSession, CombatStatus, LogKind};
