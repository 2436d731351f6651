use thiserror::Error;

use crate::core::types::{CombatId, CombatantId};

#[derive(Error, Debug)]
pub enum CombatError {
    #[error("Combat not found: {0}")]
    CombatNotFound(CombatId),

    #[error("Combat already resolved: {0}")]
    CombatAlreadyResolved(CombatId),

    #[error("Invalid target {target} in combat {combat}")]
    InvalidTarget { combat: CombatId, target: CombatantId },

    #[error("{combatant} cannot afford move '{move_name}'")]
    InsufficientResources { combatant: String, move_name: String },

    #[error("{combatant} does not know move '{move_name}'")]
    UnknownMove { combatant: String, move_name: String },

    #[error("No usable moves for {0}")]
    NoUsableMoves(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Interaction unavailable: {0}")]
    InteractionUnavailable(String),

    #[error("Unknown environment tag: {0}")]
    UnknownEnvironmentTag(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Combat state lock poisoned")]
    StatePoisoned,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CombatError>;
