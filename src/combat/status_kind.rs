//! Base status kinds
//!
//! The kind is the coarse label; severity, duration and modifiers live on
//! the enhanced status record built from the status table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::domain::Domain;

/// Coarse status label shared by every severity of a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BaseStatus {
    Wounded,
    Bleeding,
    Poisoned,
    Burning,
    Confused,
    Stunned,
    Frightened,
    Exhausted,
    Cursed,
    Demoralized,
    Empowered,
    Focused,
    Shielded,
    Inspired,
}

impl BaseStatus {
    /// Helpful statuses (applied by Buff moves)
    pub fn is_beneficial(self) -> bool {
        matches!(
            self,
            BaseStatus::Empowered | BaseStatus::Focused | BaseStatus::Shielded | BaseStatus::Inspired
        )
    }

    /// Domain an opponent can exploit while this status is active
    pub fn exploited_domain(self) -> Option<Domain> {
        match self {
            BaseStatus::Wounded => Some(Domain::Body),
            BaseStatus::Confused => Some(Domain::Mind),
            BaseStatus::Stunned => Some(Domain::Awareness),
            BaseStatus::Frightened => Some(Domain::Authority),
            _ => None,
        }
    }

    pub fn is_exploitable(self) -> bool {
        self.exploited_domain().is_some()
    }
}

impl fmt::Display for BaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exploitable_statuses() {
        assert_eq!(BaseStatus::Wounded.exploited_domain(), Some(Domain::Body));
        assert_eq!(BaseStatus::Confused.exploited_domain(), Some(Domain::Mind));
        assert!(BaseStatus::Stunned.is_exploitable());
        assert!(!BaseStatus::Poisoned.is_exploitable());
    }

    #[test]
    fn test_buffs_not_exploitable() {
        assert!(BaseStatus::Empowered.is_beneficial());
        assert!(!BaseStatus::Empowered.is_exploitable());
        assert!(!BaseStatus::Wounded.is_beneficial());
    }
}
