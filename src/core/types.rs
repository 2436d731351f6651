//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a combat session
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatId(pub Uuid);

impl CombatId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CombatId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a participant in a combat
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub Uuid);

impl CombatantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Stable id built from a number (fixtures, replays)
    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

impl Default for CombatantId {
    fn default() -> Self {
        Self::new()
    }
}

/// Combat round counter (rounds start at 1)
pub type Round = u32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(CombatId::new(), CombatId::new());
        assert_ne!(CombatantId::new(), CombatantId::new());
    }

    #[test]
    fn test_fixed_ids_are_stable() {
        assert_eq!(CombatantId::from_u128(7), CombatantId::from_u128(7));
    }

    #[test]
    fn test_display_is_uuid() {
        let id = CombatantId::from_u128(1);
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000001");
    }
}
