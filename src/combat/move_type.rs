//! Move types and the Force/Trick/Focus advantage cycle
//!
//! Force beats Trick, Trick beats Focus, Focus beats Force.
//! Buff, Debuff, Utility and Escape sit outside the cycle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of move a combatant performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoveType {
    /// Direct, overpowering attack
    Force,
    /// Misdirection, feints, dirty fighting
    Trick,
    /// Patient, precise or willed attack
    Focus,
    /// Strengthen oneself
    Buff,
    /// Weaken the opponent
    Debuff,
    /// Recover or reposition
    Utility,
    /// Attempt to leave the fight
    Escape,
}

/// Which side of an exchange holds type advantage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advantage {
    Actor,
    Target,
    Neither,
}

impl MoveType {
    /// Get all move types
    pub fn all() -> &'static [MoveType] {
        &[
            MoveType::Force,
            MoveType::Trick,
            MoveType::Focus,
            MoveType::Buff,
            MoveType::Debuff,
            MoveType::Utility,
            MoveType::Escape,
        ]
    }

    /// Does this type beat `other` in the advantage cycle?
    pub fn beats(self, other: MoveType) -> bool {
        matches!(
            (self, other),
            (MoveType::Force, MoveType::Trick)
                | (MoveType::Trick, MoveType::Focus)
                | (MoveType::Focus, MoveType::Force)
        )
    }

    /// The type that beats this one, if it is part of the cycle
    pub fn countered_by(self) -> Option<MoveType> {
        match self {
            MoveType::Trick => Some(MoveType::Force),
            MoveType::Focus => Some(MoveType::Trick),
            MoveType::Force => Some(MoveType::Focus),
            _ => None,
        }
    }

    /// Offensive types strike back when the other side fails
    pub fn is_offensive(self) -> bool {
        matches!(self, MoveType::Force | MoveType::Trick)
    }

    /// Types that deal damage when they win the exchange
    pub fn deals_damage(self) -> bool {
        matches!(self, MoveType::Force | MoveType::Trick | MoveType::Focus)
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            MoveType::Force => "Force",
            MoveType::Trick => "Trick",
            MoveType::Focus => "Focus",
            MoveType::Buff => "Buff",
            MoveType::Debuff => "Debuff",
            MoveType::Utility => "Utility",
            MoveType::Escape => "Escape",
        }
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compare two move types from the actor's point of view
pub fn advantage(actor: MoveType, target: MoveType) -> Advantage {
    if actor.beats(target) {
        Advantage::Actor
    } else if target.beats(actor) {
        Advantage::Target
    } else {
        Advantage::Neither
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle() {
        assert!(MoveType::Force.beats(MoveType::Trick));
        assert!(MoveType::Trick.beats(MoveType::Focus));
        assert!(MoveType::Focus.beats(MoveType::Force));
    }

    #[test]
    fn test_no_self_advantage() {
        for t in MoveType::all() {
            assert!(!t.beats(*t));
        }
    }

    #[test]
    fn test_countered_by_matches_beats() {
        for t in MoveType::all() {
            if let Some(counter) = t.countered_by() {
                assert!(counter.beats(*t));
            }
        }
    }

    #[test]
    fn test_support_types_neutral() {
        assert_eq!(advantage(MoveType::Buff, MoveType::Force), Advantage::Neither);
        assert_eq!(advantage(MoveType::Escape, MoveType::Focus), Advantage::Neither);
        assert_eq!(advantage(MoveType::Trick, MoveType::Force), Advantage::Target);
    }
}
