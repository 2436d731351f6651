//! Enemy personality loaded from TOML
//!
//! Four tendencies in `[0, 1]` plus optional preferences that narrow the
//! standard move pool.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::combat::domain::Domain;
use crate::combat::move_type::MoveType;
use crate::core::error::Result;

/// Directory personalities load from
pub const PERSONALITY_DIR: &str = "data/ai_personalities";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiPersonality {
    /// Name of this personality (set from filename)
    pub name: String,
    /// Favors Force over Trick, drives exploit chance
    pub aggression: f32,
    /// Drives counter chance
    pub adaptability: f32,
    /// Fights on longer before turning desperate, gambles more
    pub risk_taking: f32,
    /// Marks moves calculated
    pub calculation: f32,
    pub preferred_move_types: Vec<MoveType>,
    pub specialization_domains: Vec<Domain>,
}

impl Default for AiPersonality {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            aggression: 0.5,
            adaptability: 0.5,
            risk_taking: 0.3,
            calculation: 0.5,
            preferred_move_types: Vec::new(),
            specialization_domains: Vec::new(),
        }
    }
}

impl AiPersonality {
    /// Clamp every tendency into `[0, 1]`
    pub fn normalized(mut self) -> Self {
        self.aggression = self.aggression.clamp(0.0, 1.0);
        self.adaptability = self.adaptability.clamp(0.0, 1.0);
        self.risk_taking = self.risk_taking.clamp(0.0, 1.0);
        self.calculation = self.calculation.clamp(0.0, 1.0);
        self
    }

    pub fn from_toml_str(name: &str, contents: &str) -> Result<Self> {
        let mut personality: AiPersonality = toml::from_str(contents)?;
        personality.name = name.to_string();
        Ok(personality.normalized())
    }

    /// Does this move fit the declared preferences (type or domain)?
    pub fn prefers(&self, move_type: MoveType, domains: &[Domain]) -> bool {
        self.preferred_move_types.contains(&move_type)
            || domains.iter().any(|d| self.specialization_domains.contains(d))
    }

    pub fn has_preferences(&self) -> bool {
        !self.preferred_move_types.is_empty() || !self.specialization_domains.is_empty()
    }
}

/// Load personality from TOML file
///
/// Loads from `data/ai_personalities/{name}.toml`
pub fn load_personality(name: &str) -> Result<AiPersonality> {
    load_personality_from(Path::new(PERSONALITY_DIR), name)
}

pub fn load_personality_from(dir: &Path, name: &str) -> Result<AiPersonality> {
    let contents = fs::read_to_string(personality_path(dir, name))?;
    AiPersonality::from_toml_str(name, &contents)
}

/// Load a personality, falling back to the default on any error
pub fn load_or_default(name: &str) -> AiPersonality {
    match load_personality(name) {
        Ok(personality) => personality,
        Err(e) => {
            tracing::warn!(personality = name, error = %e, "falling back to default personality");
            AiPersonality::default()
        }
    }
}

fn personality_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.toml", name))
}
