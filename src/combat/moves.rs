//! Combat moves and the standard move library
//!
//! A move is an immutable template (type, domains, costs, side effects)
//! plus per-use flags: desperate, calculated, a narrative hook and an
//! optional explicit target.

use std::sync::OnceLock;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::combat::constants::FALLBACK_MOVE_NAME;
use crate::combat::domain::Domain;
use crate::combat::move_type::MoveType;
use crate::combat::stats::Pool;
use crate::core::types::CombatantId;

/// Resource costs paid when a move is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveCost {
    pub stamina: i32,
    pub focus: i32,
    pub spirit: i32,
}

impl MoveCost {
    pub fn new(stamina: i32, focus: i32, spirit: i32) -> Self {
        Self { stamina, focus, spirit }
    }

    pub fn free() -> Self {
        Self::default()
    }

    pub fn is_free(&self) -> bool {
        self.stamina == 0 && self.focus == 0 && self.spirit == 0
    }

    /// Sum of all three costs
    pub fn total(&self) -> i32 {
        self.stamina + self.focus + self.spirit
    }
}

/// Resources a Utility move gives back on success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restore {
    pub pool: Pool,
    pub amount: i32,
}

/// A move a combatant can perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatMove {
    pub name: String,
    pub move_type: MoveType,
    /// Domains the move draws on (rolled as their average)
    pub domains: Vec<Domain>,
    pub cost: MoveCost,
    /// Higher variance, higher upside
    #[serde(default)]
    pub desperate: bool,
    /// Lower variance, more consistent
    #[serde(default)]
    pub calculated: bool,
    #[serde(default)]
    pub narrative_hook: Option<String>,
    #[serde(default)]
    pub target: Option<CombatantId>,
    /// Status template this move inflicts (or grants, for Buff moves)
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub restore: Option<Restore>,
}

impl CombatMove {
    pub fn new(name: impl Into<String>, move_type: MoveType, domains: &[Domain], cost: MoveCost) -> Self {
        Self {
            name: name.into(),
            move_type,
            domains: domains.to_vec(),
            cost,
            desperate: false,
            calculated: false,
            narrative_hook: None,
            target: None,
            status: None,
            restore: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_restore(mut self, pool: Pool, amount: i32) -> Self {
        self.restore = Some(Restore { pool, amount });
        self
    }

    pub fn with_hook(mut self, hook: impl Into<String>) -> Self {
        self.narrative_hook = Some(hook.into());
        self
    }

    pub fn desperate(mut self) -> Self {
        self.desperate = true;
        self
    }

    pub fn calculated(mut self) -> Self {
        self.calculated = true;
        self
    }

    pub fn targeting(mut self, target: CombatantId) -> Self {
        self.target = Some(target);
        self
    }

    /// Does the move draw on this domain?
    pub fn uses_domain(&self, domain: Domain) -> bool {
        self.domains.contains(&domain)
    }

    /// Zero-cost move every combatant can fall back on
    pub fn struggle() -> Self {
        CombatMove::new(FALLBACK_MOVE_NAME, MoveType::Force, &[Domain::Body], MoveCost::free())
            .with_hook("lashes out with whatever strength remains")
    }

    /// Same template with per-use flags cleared
    pub fn fresh(&self) -> Self {
        Self {
            desperate: false,
            calculated: false,
            target: None,
            ..self.clone()
        }
    }
}

/// Named move templates, keyed by lowercase id
#[derive(Debug, Clone, Default)]
pub struct MoveLibrary {
    moves: AHashMap<String, CombatMove>,
}

impl MoveLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a display name or id ("Heavy Blow" -> "heavy_blow")
    pub fn key(name: &str) -> String {
        name.trim().to_lowercase().replace([' ', '-'], "_")
    }

    pub fn insert(&mut self, template: CombatMove) {
        self.moves.insert(Self::key(&template.name), template);
    }

    pub fn get(&self, id: &str) -> Option<&CombatMove> {
        self.moves.get(&Self::key(id))
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Sorted ids, for listings
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.moves.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// The built-in move set
    pub fn standard() -> Self {
        use Domain::*;
        use MoveType::*;

        let mut lib = MoveLibrary::new();

        lib.insert(
            CombatMove::new("Strike", Force, &[Body], MoveCost::new(2, 0, 0))
                .with_hook("a clean, direct blow"),
        );
        lib.insert(
            CombatMove::new("Heavy Blow", Force, &[Body], MoveCost::new(4, 0, 0))
                .with_hook("puts their whole weight behind the swing"),
        );
        lib.insert(
            CombatMove::new("Shield Bash", Force, &[Body, Craft], MoveCost::new(3, 0, 0))
                .with_status("Stunned")
                .with_hook("slams forward behind a raised guard"),
        );
        lib.insert(
            CombatMove::new("Feint", Trick, &[Craft, Awareness], MoveCost::new(2, 1, 0))
                .with_hook("shows one opening and strikes another"),
        );
        lib.insert(
            CombatMove::new("Dirty Trick", Trick, &[Craft], MoveCost::new(1, 1, 0))
                .with_status("Confused")
                .with_hook("kicks grit toward the eyes"),
        );
        lib.insert(
            CombatMove::new("Poisoned Blade", Trick, &[Craft, Body], MoveCost::new(2, 1, 0))
                .with_status("Poisoned")
                .with_hook("a shallow cut with a coated edge"),
        );
        lib.insert(
            CombatMove::new("Read the Flow", Focus, &[Mind, Awareness], MoveCost::new(0, 3, 0))
                .with_hook("waits for the exact moment"),
        );
        lib.insert(
            CombatMove::new("Spirit Lance", Focus, &[Spirit], MoveCost::new(0, 1, 3))
                .with_status("Cursed")
                .with_hook("a spear of will made visible"),
        );
        lib.insert(
            CombatMove::new("Rally", Buff, &[Authority, Social], MoveCost::new(0, 2, 0))
                .with_status("Inspired")
                .with_hook("steadies themselves with a shout"),
        );
        lib.insert(
            CombatMove::new("Iron Guard", Buff, &[Body], MoveCost::new(2, 0, 0))
                .with_status("Shielded")
                .with_hook("sets their feet and tightens their guard"),
        );
        lib.insert(
            CombatMove::new("Taunt", Debuff, &[Social, Authority], MoveCost::new(0, 2, 0))
                .with_status("Frightened")
                .with_hook("promises exactly how this ends"),
        );
        lib.insert(
            CombatMove::new("Hex", Debuff, &[Spirit], MoveCost::new(0, 0, 3))
                .with_status("Cursed")
                .with_hook("mutters a binding word"),
        );
        lib.insert(
            CombatMove::new("Catch Breath", Utility, &[Body], MoveCost::free())
                .with_restore(Pool::Stamina, 4)
                .with_hook("buys a moment to breathe"),
        );
        lib.insert(
            CombatMove::new("Meditate", Utility, &[Mind], MoveCost::free())
                .with_restore(Pool::Focus, 3)
                .with_hook("finds stillness in the chaos"),
        );
        lib.insert(
            CombatMove::new("Disengage", Escape, &[Awareness, Body], MoveCost::new(2, 0, 0))
                .with_hook("looks for a way out"),
        );
        lib.insert(CombatMove::struggle());

        lib
    }
}

/// Shared read-only standard library
pub fn standard_library() -> &'static MoveLibrary {
    static LIBRARY: OnceLock<MoveLibrary> = OnceLock::new();
    LIBRARY.get_or_init(MoveLibrary::standard)
}
