//! Round results handed to narrative and persistence collaborators

use serde::{Deserialize, Serialize};

use crate::combat::move_type::{Advantage, MoveType};
use crate::combat::stats::Pool;
use crate::core::types::{CombatantId, Round};
use crate::environment::state::InteractionOutcome;
use crate::session::state::CombatStatus;
use crate::status::consequence::Consequence;
use crate::status::severity::Severity;
use crate::status::system::TickReport;

/// How one side's roll was built
///
/// `total = d20 + calculated + domain_average + advantage + momentum
///        + desperate + environment + status`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollBreakdown {
    /// Raw die face
    pub d20: i32,
    /// Nudge toward the top of the die for calculated moves
    pub calculated: i32,
    pub domain_average: i32,
    pub advantage: i32,
    pub momentum: i32,
    /// Perturbation for desperate moves
    pub desperate: i32,
    /// Passive tag rules, banked one-shot bonus, temporary defense
    pub environment: i32,
    /// Roll effects plus Attack (acting) or Defense (targeted)
    pub status: i32,
    pub total: i32,
}

impl RollBreakdown {
    pub fn sum(&self) -> i32 {
        self.d20
            + self.calculated
            + self.domain_average
            + self.advantage
            + self.momentum
            + self.desperate
            + self.environment
            + self.status
    }
}

/// Resources a Utility move gave back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restored {
    pub combatant: CombatantId,
    pub pool: Pool,
    pub amount: i32,
}

/// Everything one exchange did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: Round,
    pub actor: CombatantId,
    pub target: CombatantId,
    pub actor_move: String,
    pub actor_move_type: MoveType,
    pub target_move: String,
    pub target_move_type: MoveType,
    pub advantage: Advantage,
    pub actor_roll: RollBreakdown,
    pub target_roll: RollBreakdown,
    pub winner: CombatantId,
    /// Did the actor win the exchange?
    pub success: bool,
    /// Absolute difference between the two totals
    pub margin: i32,
    pub critical: bool,
    /// Tier used for any status this exchange applied
    pub tier: Option<Severity>,
    pub damage_to_target: i32,
    pub damage_to_actor: i32,
    pub restored: Option<Restored>,
    pub status_applied: Vec<String>,
    /// Best-effort status applications that failed (damage still stands)
    pub status_failures: Vec<String>,
    pub consequence: Option<Consequence>,
    pub narrative_hooks: Vec<String>,
    pub actor_momentum: u8,
    pub target_momentum: u8,
    pub actor_defeated: bool,
    pub target_defeated: bool,
    pub fled: bool,
    /// Interaction the actor used before the exchange
    pub interaction: Option<InteractionOutcome>,
    /// Status effects fired at the end of the round
    pub tick: TickReport,
    /// Session status after the round
    pub outcome: CombatStatus,
}

impl RoundResult {
    /// One-line summary for logs
    pub fn summary(&self, actor_name: &str, target_name: &str) -> String {
        let verdict = if self.success {
            format!("{} wins by {}", actor_name, self.margin)
        } else {
            format!("{} holds by {}", target_name, self.margin)
        };
        let mut line = format!(
            "{} ({}) vs {} ({}): {}",
            self.actor_move, self.actor_roll.total, self.target_move, self.target_roll.total, verdict
        );
        if self.critical {
            line.push_str(", critical");
        }
        if self.damage_to_target > 0 {
            line.push_str(&format!(", {} takes {}", target_name, self.damage_to_target));
        }
        if self.damage_to_actor > 0 {
            line.push_str(&format!(", {} takes {}", actor_name, self.damage_to_actor));
        }
        for status in &self.status_applied {
            line.push_str(&format!(", {}", status));
        }
        line
    }
}
