//! Environment system: battlefield tags, passive modifiers, interactions

pub mod rules;
pub mod state;
pub mod tags;

pub use rules::{
    environment_rules, DomainRequirement, EnvironmentRules, Interaction, InteractionEffect,
    PassiveRule, RuleScope,
};
pub use state::{AreaStrike, BankedBonus, Environment, InteractionOutcome, TemporaryDefense};
pub use tags::{parse_tags, EnvironmentTag};
