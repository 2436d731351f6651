//! Combat model constants
//!
//! Balance numbers the resolution engine reads live in `CombatConfig`;
//! these are structural limits of the data model.

// Domain ratings
pub const DOMAIN_MIN: i32 = 0;
pub const DOMAIN_MAX: i32 = 10;

// Resource pools
pub const MIN_EFFECTIVE_MAX: i32 = 1;

// Fallback move used when an enemy cannot afford anything
pub const FALLBACK_MOVE_NAME: &str = "Struggle";

// Statuses
pub const PERMANENT: i32 = -1;
