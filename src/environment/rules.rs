//! Environment rule table: passive roll modifiers and tactical interactions
//!
//! Pure data, shared read-only by every session. Modifiers are ADDITIVE:
//! every matching rule of every active tag contributes its delta.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::combat::combatant::Combatant;
use crate::combat::domain::Domain;
use crate::combat::move_type::MoveType;
use crate::combat::moves::CombatMove;
use crate::environment::tags::EnvironmentTag;

/// What a passive rule looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleScope {
    /// Moves drawing on this domain
    Domain(Domain),
    /// Moves of this type
    MoveType(MoveType),
}

/// Passive roll modifier for one tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveRule {
    pub tag: EnvironmentTag,
    pub scope: RuleScope,
    pub delta: i32,
    /// Replaces `delta` when the actor is strong in the scoped domain
    pub strong_delta: Option<i32>,
    pub hook: String,
}

impl PassiveRule {
    pub fn matches(&self, combat_move: &CombatMove) -> bool {
        match self.scope {
            RuleScope::Domain(domain) => combat_move.uses_domain(domain),
            RuleScope::MoveType(move_type) => combat_move.move_type == move_type,
        }
    }

    /// Delta for this actor
    pub fn delta_for(&self, actor: &Combatant) -> i32 {
        match (self.scope, self.strong_delta) {
            (RuleScope::Domain(domain), Some(strong)) if actor.is_strong_in(domain) => strong,
            _ => self.delta,
        }
    }
}

/// Minimum effective rating needed to use an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRequirement {
    pub domain: Domain,
    pub minimum: i32,
}

impl DomainRequirement {
    pub fn met_by(&self, actor: &Combatant) -> bool {
        actor.effective_domain(self.domain) >= self.minimum
    }
}

/// What an interaction does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionEffect {
    /// Extra damage on the actor's next successful damaging move
    BonusDamage(i32),
    /// Roll bonus banked for the actor's next action only
    NextRollBonus(i32),
    /// Added to the actor's roll whenever targeted, for a number of rounds
    DefenseBonus { amount: i32, rounds: u32 },
    /// Immediate damage (and optionally a status) to every standing opponent
    AreaEffect { damage: i32, status: Option<String> },
}

/// A special move available only while its tag is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub name: String,
    pub tag: EnvironmentTag,
    pub description: String,
    pub requirement: DomainRequirement,
    pub effect: InteractionEffect,
}

/// Every passive rule and interaction the engine knows
#[derive(Debug, Clone, Default)]
pub struct EnvironmentRules {
    pub passive: Vec<PassiveRule>,
    pub interactions: Vec<Interaction>,
}

impl EnvironmentRules {
    pub fn passive_for(&self, tag: EnvironmentTag) -> impl Iterator<Item = &PassiveRule> {
        self.passive.iter().filter(move |r| r.tag == tag)
    }

    pub fn interactions_for(&self, tag: EnvironmentTag) -> impl Iterator<Item = &Interaction> {
        self.interactions.iter().filter(move |i| i.tag == tag)
    }

    pub fn find_interaction(&self, name: &str) -> Option<&Interaction> {
        self.interactions
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn standard() -> Self {
        use Domain::*;
        use EnvironmentTag as T;
        use InteractionEffect::*;

        let passive = vec![
            passive(T::Darkness, RuleScope::Domain(Awareness), -2, Some(1), "strains to see through the dark"),
            passive(T::Darkness, RuleScope::MoveType(MoveType::Trick), 1, None, "the shadows hide the feint"),
            passive(T::Water, RuleScope::Domain(Body), -1, None, "footing slips in the water"),
            passive(T::HighGround, RuleScope::MoveType(MoveType::Force), 1, None, "strikes down from above"),
            passive(T::HighGround, RuleScope::Domain(Awareness), 1, None, "sees the whole field"),
            passive(T::Fire, RuleScope::Domain(Mind), -1, None, "the heat scatters thought"),
            passive(T::Fire, RuleScope::Domain(Spirit), 1, None, "the flames feed the will"),
            passive(T::Cover, RuleScope::Domain(Craft), 1, None, "works the angles around cover"),
            passive(T::Narrow, RuleScope::MoveType(MoveType::Force), 1, None, "no room to dodge"),
            passive(T::Narrow, RuleScope::MoveType(MoveType::Escape), -2, None, "the passage hems them in"),
            passive(T::Unstable, RuleScope::Domain(Body), -1, Some(0), "the ground shifts underfoot"),
            passive(T::Crowded, RuleScope::Domain(Social), 1, None, "plays to the crowd"),
            passive(T::Crowded, RuleScope::MoveType(MoveType::Escape), 1, None, "slips into the press of bodies"),
            passive(T::Sacred, RuleScope::Domain(Spirit), 2, None, "the holy ground answers"),
            passive(T::Sacred, RuleScope::Domain(Authority), 1, None, "speaks with borrowed sanctity"),
        ];

        let interactions = vec![
            interaction("Splash Blind", T::Water, "throws water into the opponent's eyes", Craft, 2, NextRollBonus(2)),
            interaction("Drag Under", T::Water, "hauls the opponent down into the water", Body, 3, BonusDamage(4)),
            interaction("Vanish into Shadow", T::Darkness, "melts into the dark", Awareness, 2, DefenseBonus { amount: 3, rounds: 2 }),
            interaction("Leap from Above", T::HighGround, "jumps down with the full drop behind the blow", Body, 2, BonusDamage(5)),
            interaction("Survey the Field", T::HighGround, "reads the fight from above", Awareness, 2, NextRollBonus(2)),
            interaction("Kick the Embers", T::Fire, "scatters burning coals across the floor", Craft, 1, AreaEffect { damage: 3, status: Some("Burning".to_string()) }),
            interaction("Duck Behind Cover", T::Cover, "puts something solid in the way", Awareness, 1, DefenseBonus { amount: 2, rounds: 2 }),
            interaction("Hold the Line", T::Narrow, "plants themselves in the gap", Body, 2, DefenseBonus { amount: 2, rounds: 3 }),
            interaction("Bring It Down", T::Unstable, "knocks loose what was barely standing", Craft, 3, AreaEffect { damage: 4, status: None }),
            interaction("Lose Yourself in the Crowd", T::Crowded, "vanishes among the onlookers", Social, 2, DefenseBonus { amount: 2, rounds: 1 }),
            interaction("Invoke the Shrine", T::Sacred, "calls on whatever watches this place", Spirit, 3, NextRollBonus(3)),
        ];

        Self { passive, interactions }
    }
}

fn passive(tag: EnvironmentTag, scope: RuleScope, delta: i32, strong_delta: Option<i32>, hook: &str) -> PassiveRule {
    PassiveRule {
        tag,
        scope,
        delta,
        strong_delta,
        hook: hook.to_string(),
    }
}

fn interaction(
    name: &str,
    tag: EnvironmentTag,
    description: &str,
    domain: Domain,
    minimum: i32,
    effect: InteractionEffect,
) -> Interaction {
    Interaction {
        name: name.to_string(),
        tag,
        description: description.to_string(),
        requirement: DomainRequirement { domain, minimum },
        effect,
    }
}

/// Shared read-only rule table
pub fn environment_rules() -> &'static EnvironmentRules {
    static RULES: OnceLock<EnvironmentRules> = OnceLock::new();
    RULES.get_or_init(EnvironmentRules::standard)
}
