//! Combatants: one participant in a combat
//!
//! Base domain ratings and pool maxima never change during a fight.
//! Everything statuses do goes through the modifier ledger, and the
//! effective values clamp on read.

use serde::{Deserialize, Serialize};

use crate::combat::constants::{DOMAIN_MAX, DOMAIN_MIN, MIN_EFFECTIVE_MAX};
use crate::combat::domain::{Domain, DomainRatings};
use crate::combat::moves::{CombatMove, MoveCost};
use crate::combat::stats::{ModifierLedger, Pool, ResourcePool, Stat};
use crate::combat::status_kind::BaseStatus;
use crate::core::types::CombatantId;
use crate::status::{Consequence, EnhancedStatus};

/// Which side a combatant fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CombatantType {
    #[default]
    Player,
    Enemy,
    Ally,
    /// Doors, barricades, idols: can be targeted, never acts
    Object,
}

impl CombatantType {
    /// Player and allies fight together
    pub fn is_player_side(self) -> bool {
        matches!(self, CombatantType::Player | CombatantType::Ally)
    }
}

/// A participant in a combat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub kind: CombatantType,
    /// Base ratings (before status modifiers)
    pub domains: DomainRatings,
    pub health: ResourcePool,
    pub stamina: ResourcePool,
    pub focus: ResourcePool,
    pub spirit: ResourcePool,
    /// Active enhanced statuses
    pub statuses: Vec<EnhancedStatus>,
    /// Running sum of every active status modifier
    pub modifiers: ModifierLedger,
    /// Moves this combatant can attempt
    pub moves: Vec<CombatMove>,
    pub weak_domains: Vec<Domain>,
    pub strong_domains: Vec<Domain>,
    /// Status kinds this combatant shrugs off
    pub resistances: Vec<BaseStatus>,
    /// Lasting scars from severe hits
    pub consequences: Vec<Consequence>,
    pub defeated: bool,
    /// Last status instance number handed out
    #[serde(default)]
    pub status_serial: u64,
}

impl Combatant {
    /// Create a combatant with full pools and no moves
    pub fn new(name: impl Into<String>, kind: CombatantType, domains: DomainRatings) -> Self {
        Self {
            id: CombatantId::new(),
            name: name.into(),
            kind,
            domains,
            health: ResourcePool::full(30),
            stamina: ResourcePool::full(10),
            focus: ResourcePool::full(10),
            spirit: ResourcePool::full(10),
            statuses: Vec::new(),
            modifiers: ModifierLedger::new(),
            moves: Vec::new(),
            weak_domains: Vec::new(),
            strong_domains: Vec::new(),
            resistances: Vec::new(),
            consequences: Vec::new(),
            defeated: false,
            status_serial: 0,
        }
    }

    pub fn with_id(mut self, id: CombatantId) -> Self {
        self.id = id;
        self
    }

    /// Set all four pool maxima (pools start full)
    pub fn with_pools(mut self, health: i32, stamina: i32, focus: i32, spirit: i32) -> Self {
        self.health = ResourcePool::full(health);
        self.stamina = ResourcePool::full(stamina);
        self.focus = ResourcePool::full(focus);
        self.spirit = ResourcePool::full(spirit);
        self
    }

    pub fn with_moves(mut self, moves: Vec<CombatMove>) -> Self {
        self.moves = moves;
        self
    }

    pub fn pool(&self, pool: Pool) -> &ResourcePool {
        match pool {
            Pool::Health => &self.health,
            Pool::Stamina => &self.stamina,
            Pool::Focus => &self.focus,
            Pool::Spirit => &self.spirit,
        }
    }

    fn pool_mut(&mut self, pool: Pool) -> &mut ResourcePool {
        match pool {
            Pool::Health => &mut self.health,
            Pool::Stamina => &mut self.stamina,
            Pool::Focus => &mut self.focus,
            Pool::Spirit => &mut self.spirit,
        }
    }

    /// Pool maximum after status modifiers (never below 1)
    pub fn effective_max(&self, pool: Pool) -> i32 {
        (self.pool(pool).max + self.modifiers.stat(Stat::max_of(pool))).max(MIN_EFFECTIVE_MAX)
    }

    /// Domain rating after status modifiers (floored at 0)
    pub fn effective_domain(&self, domain: Domain) -> i32 {
        (self.domains.get(domain) + self.modifiers.domain(domain)).clamp(DOMAIN_MIN, DOMAIN_MAX)
    }

    /// Floored mean of effective ratings across the given domains
    pub fn domain_average(&self, domains: &[Domain]) -> i32 {
        if domains.is_empty() {
            return 0;
        }
        let sum: i32 = domains.iter().map(|d| self.effective_domain(*d)).sum();
        sum.div_euclid(domains.len() as i32)
    }

    pub fn stat_modifier(&self, stat: Stat) -> i32 {
        self.modifiers.stat(stat)
    }

    /// Can the current pools cover every cost at once?
    pub fn can_afford(&self, cost: &MoveCost) -> bool {
        self.stamina.current >= cost.stamina
            && self.focus.current >= cost.focus
            && self.spirit.current >= cost.spirit
    }

    /// Deduct a move's cost. Caller must have checked `can_afford`.
    pub fn pay(&mut self, cost: &MoveCost) {
        debug_assert!(self.can_afford(cost));
        self.stamina.current = (self.stamina.current - cost.stamina).max(0);
        self.focus.current = (self.focus.current - cost.focus).max(0);
        self.spirit.current = (self.spirit.current - cost.spirit).max(0);
    }

    /// Apply damage to health, clamped at 0. Returns damage actually taken.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        if amount <= 0 || self.defeated {
            return 0;
        }
        let taken = amount.min(self.health.current);
        self.health.current -= taken;
        if self.health.current == 0 {
            self.defeated = true;
        }
        taken
    }

    /// Raise a pool toward its effective maximum. Returns amount gained.
    pub fn restore(&mut self, pool: Pool, amount: i32) -> i32 {
        if amount <= 0 || (pool == Pool::Health && self.defeated) {
            return 0;
        }
        let max = self.effective_max(pool);
        let entry = self.pool_mut(pool);
        let before = entry.current;
        entry.current = (entry.current + amount).min(max).max(before);
        entry.current - before
    }

    /// Lower a pool, clamped at 0. Health drains go through `take_damage`.
    pub fn drain(&mut self, pool: Pool, amount: i32) -> i32 {
        if pool == Pool::Health {
            return self.take_damage(amount);
        }
        let entry = self.pool_mut(pool);
        let drained = amount.clamp(0, entry.current);
        entry.current -= drained;
        drained
    }

    /// Clamp every pool to its effective maximum (after a max shrinks)
    pub fn clamp_pools(&mut self) {
        for pool in Pool::all() {
            let max = self.effective_max(*pool);
            let entry = self.pool_mut(*pool);
            entry.current = entry.current.min(max);
        }
    }

    pub fn health_fraction(&self) -> f32 {
        self.health.fraction_of(self.effective_max(Pool::Health))
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub fn has_status(&self, kind: BaseStatus) -> bool {
        self.statuses.iter().any(|s| s.kind == kind)
    }

    pub fn resists(&self, kind: BaseStatus) -> bool {
        self.resistances.contains(&kind)
    }

    pub fn is_strong_in(&self, domain: Domain) -> bool {
        self.strong_domains.contains(&domain)
    }

    pub fn is_weak_in(&self, domain: Domain) -> bool {
        self.weak_domains.contains(&domain)
    }

    /// Find a known move by name (case-insensitive)
    pub fn find_move(&self, name: &str) -> Option<&CombatMove> {
        self.moves.iter().find(|m| m.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Moves the current pools can pay for
    pub fn affordable_moves(&self) -> Vec<&CombatMove> {
        self.moves.iter().filter(|m| self.can_afford(&m.cost)).collect()
    }

    /// Roll bonus or penalty from active status special effects
    pub fn status_roll_modifier(&self) -> i32 {
        self.statuses.iter().map(|s| s.roll_modifier()).sum()
    }
}
