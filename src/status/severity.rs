//! Severity tiers and status sources

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::domain::Domain;
use crate::combat::moves::CombatMove;

/// How bad a status is
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Severity {
    #[default]
    Minor,
    Moderate,
    Severe,
    Critical,
}

impl Severity {
    /// Tier for a roll margin given `[moderate, severe, critical]` thresholds
    ///
    /// With the default `[3, 5, 8]`: below 3 is Minor, 3-4 Moderate,
    /// 5-7 Severe, 8 and above Critical.
    pub fn from_margin(margin: i32, thresholds: [i32; 3]) -> Self {
        let [moderate, severe, critical] = thresholds;
        if margin >= critical {
            Severity::Critical
        } else if margin >= severe {
            Severity::Severe
        } else if margin >= moderate {
            Severity::Moderate
        } else {
            Severity::Minor
        }
    }

    /// One tier worse (Critical stays Critical)
    pub fn escalate(self) -> Self {
        match self {
            Severity::Minor => Severity::Moderate,
            Severity::Moderate => Severity::Severe,
            Severity::Severe | Severity::Critical => Severity::Critical,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Where a status came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusSource {
    Physical,
    Mental,
    Spiritual,
    Environmental,
    Magical,
    Social,
}

impl StatusSource {
    /// Source implied by a domain
    pub fn for_domain(domain: Domain) -> Self {
        match domain {
            Domain::Body | Domain::Craft => StatusSource::Physical,
            Domain::Mind | Domain::Awareness => StatusSource::Mental,
            Domain::Spirit => StatusSource::Spiritual,
            Domain::Social | Domain::Authority => StatusSource::Social,
        }
    }

    /// Source implied by a move's primary domain
    pub fn for_move(combat_move: &CombatMove) -> Self {
        combat_move
            .domains
            .first()
            .map(|d| Self::for_domain(*d))
            .unwrap_or(StatusSource::Physical)
    }
}
