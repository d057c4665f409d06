//! Dice engine: 2d6 checks against a difficulty.

use fateweaver_core::rng::DiceRng;
use serde::{Deserialize, Serialize};

/// Outcome of one 2d6 check.
///
/// Criticals are determined from the raw two-die sum only, independent of
/// the modifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DiceCheck {
    /// Raw two-die sum, 2–12.
    pub roll_result: i64,
    /// Modifier added to the raw sum.
    pub modifier: i64,
    /// `roll_result + modifier`.
    pub total: i64,
    /// Threshold the total must meet or exceed.
    pub difficulty: i64,
    pub is_success: bool,
    pub is_critical_success: bool,
    pub is_critical_fail: bool,
}

impl DiceCheck {
    /// One-line human summary for the turn log.
    #[must_use]
    pub fn summary(&self) -> String {
        let verdict = if self.is_critical_success {
            "critical success"
        } else if self.is_critical_fail {
            "critical fail"
        } else if self.is_success {
            "success"
        } else {
            "failure"
        };
        format!(
            "rolled {} + modifier {} = {} vs difficulty {} ({verdict})",
            self.roll_result, self.modifier, self.total, self.difficulty
        )
    }
}

/// Rolls two independent uniform dice in `[1, 6]`, adds `modifier`, and
/// compares the total to `difficulty`. No side effects beyond randomness.
pub fn roll_check(rng: &mut dyn DiceRng, modifier: i64, difficulty: i64) -> DiceCheck {
    let first = i64::from(rng.next_u32_range(1, 6));
    let second = i64::from(rng.next_u32_range(1, 6));
    let roll_result = first + second;
    let total = roll_result + modifier;

    DiceCheck {
        roll_result,
        modifier,
        total,
        difficulty,
        is_success: total >= difficulty,
        is_critical_success: roll_result == 12,
        is_critical_fail: roll_result == 2,
    }
}
