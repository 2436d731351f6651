//! Stats, resource pools and the modifier ledger
//!
//! Status modifiers are ADDITIVE. The ledger stores the raw running sum;
//! clamping happens only when an effective value is read, so removing a
//! status subtracts exactly what it added.

use serde::{Deserialize, Serialize};

use crate::combat::domain::Domain;

/// Stats a status can modify besides domain ratings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stat {
    MaxHealth,
    MaxStamina,
    MaxFocus,
    MaxSpirit,
    /// Added to the combatant's roll when it acts
    Attack,
    /// Added to the combatant's roll when it is targeted
    Defense,
}

impl Stat {
    pub const COUNT: usize = 6;

    pub fn all() -> &'static [Stat] {
        &[
            Stat::MaxHealth,
            Stat::MaxStamina,
            Stat::MaxFocus,
            Stat::MaxSpirit,
            Stat::Attack,
            Stat::Defense,
        ]
    }

    pub fn index(self) -> usize {
        match self {
            Stat::MaxHealth => 0,
            Stat::MaxStamina => 1,
            Stat::MaxFocus => 2,
            Stat::MaxSpirit => 3,
            Stat::Attack => 4,
            Stat::Defense => 5,
        }
    }

    /// The stat that raises or lowers a pool's maximum
    pub fn max_of(pool: Pool) -> Stat {
        match pool {
            Pool::Health => Stat::MaxHealth,
            Pool::Stamina => Stat::MaxStamina,
            Pool::Focus => Stat::MaxFocus,
            Pool::Spirit => Stat::MaxSpirit,
        }
    }
}

/// The four resource pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pool {
    Health,
    Stamina,
    Focus,
    Spirit,
}

impl Pool {
    pub fn all() -> &'static [Pool] {
        &[Pool::Health, Pool::Stamina, Pool::Focus, Pool::Spirit]
    }
}

/// A resource pool with its base maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    pub current: i32,
    pub max: i32,
}

impl ResourcePool {
    /// Full pool
    pub fn full(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    /// Fraction remaining against an effective maximum
    pub fn fraction_of(&self, effective_max: i32) -> f32 {
        if effective_max <= 0 {
            return 0.0;
        }
        self.current as f32 / effective_max as f32
    }
}

/// Running sum of every active modifier on a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModifierLedger {
    domains: [i32; Domain::COUNT],
    stats: [i32; Stat::COUNT],
}

impl ModifierLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(&self, domain: Domain) -> i32 {
        self.domains[domain.index()]
    }

    pub fn stat(&self, stat: Stat) -> i32 {
        self.stats[stat.index()]
    }

    pub fn add_domain(&mut self, domain: Domain, delta: i32) {
        self.domains[domain.index()] += delta;
    }

    pub fn add_stat(&mut self, stat: Stat, delta: i32) {
        self.stats[stat.index()] += delta;
    }

    /// No modifier of any kind is active
    pub fn is_empty(&self) -> bool {
        self.domains.iter().all(|d| *d == 0) && self.stats.iter().all(|s| *s == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_add_and_reverse() {
        let mut ledger = ModifierLedger::new();
        ledger.add_domain(Domain::Body, -2);
        ledger.add_stat(Stat::Defense, 3);
        assert_eq!(ledger.domain(Domain::Body), -2);
        assert!(!ledger.is_empty());

        ledger.add_domain(Domain::Body, 2);
        ledger.add_stat(Stat::Defense, -3);
        assert!(ledger.is_empty());
        assert_eq!(ledger, ModifierLedger::default());
    }

    #[test]
    fn test_pool_fraction() {
        let pool = ResourcePool { current: 15, max: 100 };
        assert!((pool.fraction_of(100) - 0.15).abs() < 1e-6);
        assert_eq!(pool.fraction_of(0), 0.0);
    }

    #[test]
    fn test_max_stat_per_pool() {
        for pool in Pool::all() {
            let stat = Stat::max_of(*pool);
            assert!(stat.index() < 4);
        }
    }
}
