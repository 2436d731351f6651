//! Combat configuration with documented constants
//!
//! Every balance number the resolution engine, status system and enemy AI
//! read lives here. The defaults reproduce the canonical game balance;
//! `data/combat.toml` can override any subset of them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{CombatError, Result};

/// Configuration for the combat systems
///
/// These values have been tuned to keep duels short (roughly 4-8 rounds
/// between evenly matched combatants). Changing them affects pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    // === ROLLS ===
    /// Number of faces on the base die
    pub die_faces: i32,

    /// Flat roll bonus for the side whose move type beats the other
    pub advantage_bonus: i32,

    /// Upper bound for momentum (lower bound is always 0)
    pub momentum_cap: u8,

    /// Lowest perturbation a desperate move adds to its roll
    pub desperate_min: i32,

    /// Highest perturbation a desperate move adds to its roll
    pub desperate_max: i32,

    /// Calculated moves pull the die face toward the top of its range.
    ///
    /// The face `f` becomes `f + (die_faces - f) / calculated_divisor`,
    /// so a divisor of 3 turns a 1 into a 7 and leaves a 20 alone.
    pub calculated_divisor: i32,

    /// Exact ties go to the defender when true
    pub ties_favor_defender: bool,

    // === DAMAGE ===
    /// Damage dealt per point of roll margin
    pub damage_per_margin: i32,

    /// Weight of the Body rating in the winner's damage bonus
    pub body_damage_weight: i32,

    /// Weight of the Mind rating in the winner's damage bonus
    pub mind_damage_weight: i32,

    /// Weight of the Craft rating in the winner's damage bonus
    pub craft_damage_weight: i32,

    /// Margin at or above which a hit is critical
    pub critical_margin: i32,

    /// Damage multiplier applied to critical hits
    pub critical_multiplier: f32,

    // === STATUS ===
    /// Margin thresholds separating Minor | Moderate | Severe | Critical
    pub tier_thresholds: [i32; 3],

    /// Chance of a status per point of margin on a non-critical win
    pub status_chance_per_margin: f32,

    /// Fraction of the target's max health a critical hit must deal
    /// before it leaves a lasting consequence
    pub consequence_health_fraction: f32,

    // === ENEMY AI ===
    /// Health fraction under which a risk-averse enemy turns desperate
    pub desperate_health_base: f32,

    /// How much full risk-taking lowers the desperate threshold
    pub desperate_risk_reduction: f32,

    /// Base counter chance before adaptability
    pub counter_base: f32,
    /// Counter chance added per point of adaptability
    pub counter_per_adaptability: f32,
    /// Extra counter chance when the player's last move type beat this enemy before
    pub counter_history_bonus: f32,
    /// Calculation above which counters are marked calculated
    pub counter_calculated_threshold: f32,

    /// Base exploit chance before aggression
    pub exploit_base: f32,
    /// Exploit chance added per point of aggression
    pub exploit_per_aggression: f32,
    /// Extra exploit chance when the player carries an exploitable status
    pub exploit_status_bonus: f32,

    /// Scale applied to risk-taking when rolling for a desperate standard move
    pub standard_desperate_scale: f32,

    /// Number of player moves each enemy remembers
    pub memory_size: usize,

    // === FEATURES ===
    /// Use the tiered status system (false = statuses are ignored)
    pub enhanced_statuses: bool,

    /// Use the adaptive enemy AI (false = enemies use their first usable move)
    pub adaptive_ai: bool,

    /// Fixed seed for every new session (None = fresh random seed per session)
    pub seed: Option<u64>,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            // Rolls
            die_faces: 20,
            advantage_bonus: 2,
            momentum_cap: 3,
            desperate_min: -3,
            desperate_max: 5,
            calculated_divisor: 3,
            ties_favor_defender: true,

            // Damage (Body counts double, Mind and Craft single)
            damage_per_margin: 3,
            body_damage_weight: 2,
            mind_damage_weight: 1,
            craft_damage_weight: 1,
            critical_margin: 8,
            critical_multiplier: 1.5,

            // Status
            tier_thresholds: [3, 5, 8],
            status_chance_per_margin: 0.1,
            consequence_health_fraction: 0.25,

            // Enemy AI
            desperate_health_base: 0.3,
            desperate_risk_reduction: 0.15,
            counter_base: 0.2,
            counter_per_adaptability: 0.4,
            counter_history_bonus: 0.2,
            counter_calculated_threshold: 0.6,
            exploit_base: 0.3,
            exploit_per_aggression: 0.4,
            exploit_status_bonus: 0.2,
            standard_desperate_scale: 0.3,
            memory_size: 10,

            // Features
            enhanced_statuses: true,
            adaptive_ai: true,
            seed: None,
        }
    }
}

impl CombatConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: CombatConfig = toml::from_str(contents)?;
        config.validate().map_err(CombatError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Same config with a fixed session seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.die_faces < 2 {
            return Err(format!("die_faces ({}) must be at least 2", self.die_faces));
        }

        if self.desperate_min > self.desperate_max {
            return Err(format!(
                "desperate_min ({}) should be <= desperate_max ({})",
                self.desperate_min, self.desperate_max
            ));
        }

        if self.calculated_divisor < 1 {
            return Err("calculated_divisor must be positive".into());
        }

        // Thresholds should be ordered
        let [moderate, severe, critical] = self.tier_thresholds;
        if !(moderate < severe && severe < critical) {
            return Err(format!(
                "tier_thresholds {:?} must be strictly increasing",
                self.tier_thresholds
            ));
        }

        if self.critical_multiplier < 1.0 {
            return Err("critical_multiplier must be >= 1.0".into());
        }

        if self.memory_size < 3 {
            return Err(format!(
                "memory_size ({}) must hold at least three moves to detect sequences",
                self.memory_size
            ));
        }

        let probabilities = [
            self.status_chance_per_margin,
            self.consequence_health_fraction,
            self.desperate_health_base,
            self.desperate_risk_reduction,
            self.counter_base,
            self.exploit_base,
        ];
        if probabilities.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err("probabilities and fractions must lie in [0, 1]".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CombatConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CombatConfig::from_toml_str("advantage_bonus = 3\nseed = 99\n").unwrap();
        assert_eq!(config.advantage_bonus, 3);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.momentum_cap, 3);
        assert_eq!(config.damage_per_margin, 3);
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let result = CombatConfig::from_toml_str("tier_thresholds = [5, 3, 8]\n");
        assert!(matches!(result, Err(CombatError::InvalidConfig(_))));
    }

    #[test]
    fn test_inverted_desperate_range_rejected() {
        let config = CombatConfig {
            desperate_min: 4,
            desperate_max: 1,
            ..CombatConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shipped_config_file_loads() {
        let config = CombatConfig::load(Path::new("data/combat.toml")).unwrap();
        assert_eq!(config.critical_margin, 8);
    }
}
