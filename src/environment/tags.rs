//! Environment tags: labels describing the battlefield

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::CombatError;

/// A battlefield feature that unlocks interactions and shifts rolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnvironmentTag {
    Water,
    Darkness,
    HighGround,
    Fire,
    Cover,
    Narrow,
    Unstable,
    Crowded,
    Sacred,
}

impl EnvironmentTag {
    pub fn all() -> &'static [EnvironmentTag] {
        &[
            EnvironmentTag::Water,
            EnvironmentTag::Darkness,
            EnvironmentTag::HighGround,
            EnvironmentTag::Fire,
            EnvironmentTag::Cover,
            EnvironmentTag::Narrow,
            EnvironmentTag::Unstable,
            EnvironmentTag::Crowded,
            EnvironmentTag::Sacred,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnvironmentTag::Water => "Water",
            EnvironmentTag::Darkness => "Darkness",
            EnvironmentTag::HighGround => "High Ground",
            EnvironmentTag::Fire => "Fire",
            EnvironmentTag::Cover => "Cover",
            EnvironmentTag::Narrow => "Narrow",
            EnvironmentTag::Unstable => "Unstable",
            EnvironmentTag::Crowded => "Crowded",
            EnvironmentTag::Sacred => "Sacred",
        }
    }
}

impl fmt::Display for EnvironmentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnvironmentTag {
    type Err = CombatError;

    /// Accepts display names and snake/kebab forms ("High Ground", "high_ground")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();
        EnvironmentTag::all()
            .iter()
            .copied()
            .find(|tag| tag.name().replace(' ', "").to_lowercase() == key)
            .ok_or_else(|| CombatError::UnknownEnvironmentTag(s.to_string()))
    }
}

/// Parse a list of tag names, failing on the first unknown one
pub fn parse_tags<S: AsRef<str>>(names: &[S]) -> Result<Vec<EnvironmentTag>, CombatError> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}
