//! Domains: the skill axes every combatant is rated on

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::constants::{DOMAIN_MAX, DOMAIN_MIN};

/// A named skill axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Domain {
    /// Strength, endurance, melee
    Body,
    /// Reasoning, tactics, arcane study
    Mind,
    /// Tools, tricks, improvised devices
    Craft,
    /// Perception, reflexes, stealth
    Awareness,
    /// Persuasion, deception, reading people
    Social,
    /// Command, presence, intimidation
    Authority,
    /// Willpower, faith, the uncanny
    Spirit,
}

impl Domain {
    pub const COUNT: usize = 7;

    /// Get all domains
    pub fn all() -> &'static [Domain] {
        &[
            Domain::Body,
            Domain::Mind,
            Domain::Craft,
            Domain::Awareness,
            Domain::Social,
            Domain::Authority,
            Domain::Spirit,
        ]
    }

    /// Position in rating arrays
    pub fn index(self) -> usize {
        match self {
            Domain::Body => 0,
            Domain::Mind => 1,
            Domain::Craft => 2,
            Domain::Awareness => 3,
            Domain::Social => 4,
            Domain::Authority => 5,
            Domain::Spirit => 6,
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Domain::Body => "Body",
            Domain::Mind => "Mind",
            Domain::Craft => "Craft",
            Domain::Awareness => "Awareness",
            Domain::Social => "Social",
            Domain::Authority => "Authority",
            Domain::Spirit => "Spirit",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Base ratings for every domain, clamped to `DOMAIN_MIN..=DOMAIN_MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainRatings([i32; Domain::COUNT]);

impl DomainRatings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, domain: Domain, rating: i32) -> Self {
        self.set(domain, rating);
        self
    }

    pub fn get(&self, domain: Domain) -> i32 {
        self.0[domain.index()]
    }

    pub fn set(&mut self, domain: Domain, rating: i32) {
        self.0[domain.index()] = rating.clamp(DOMAIN_MIN, DOMAIN_MAX);
    }

    /// Iterate (domain, rating) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Domain, i32)> + '_ {
        Domain::all().iter().map(move |d| (*d, self.get(*d)))
    }
}

impl From<&BTreeMap<Domain, i32>> for DomainRatings {
    fn from(map: &BTreeMap<Domain, i32>) -> Self {
        let mut ratings = DomainRatings::new();
        for (domain, rating) in map {
            ratings.set(*domain, *rating);
        }
        ratings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_domains() {
        assert_eq!(Domain::all().len(), Domain::COUNT);
        for (i, d) in Domain::all().iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }

    #[test]
    fn test_ratings_clamped() {
        let ratings = DomainRatings::new()
            .with(Domain::Body, 99)
            .with(Domain::Mind, -4);
        assert_eq!(ratings.get(Domain::Body), DOMAIN_MAX);
        assert_eq!(ratings.get(Domain::Mind), 0);
    }

    #[test]
    fn test_from_map() {
        let mut map = BTreeMap::new();
        map.insert(Domain::Spirit, 4);
        let ratings = DomainRatings::from(&map);
        assert_eq!(ratings.get(Domain::Spirit), 4);
        assert_eq!(ratings.get(Domain::Body), 0);
    }
}
