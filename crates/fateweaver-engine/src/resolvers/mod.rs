//! Phase resolvers — one terminal resolver per classified phase.
//!
//! Each resolver consumes the categorized entities, the classification, and
//! supporting lookups, and produces a partial [`StageUpdate`](crate::domain::turn::StageUpdate)
//! carrying entity diffs, relationship updates, a success flag, and log lines.

pub mod combat;
pub mod dialogue;
pub mod exploration;
pub mod negotiation;
pub mod recovery;
pub mod rest;
pub mod unknown;

use std::sync::Mutex;

use fateweaver_core::error::EngineError;
use fateweaver_core::rng::DiceRng;

use crate::domain::dice::{DiceCheck, roll_check};

/// Rolls a 2d6 check behind the shared RNG mutex.
///
/// The `Mutex` is locked only around the synchronous roll to avoid holding a
/// `MutexGuard` across await points.
///
/// # Errors
///
/// Returns `EngineError::Infrastructure` if the mutex is poisoned.
pub(crate) fn roll_locked(
    rng: &Mutex<dyn DiceRng + Send>,
    modifier: i64,
    difficulty: i64,
) -> Result<DiceCheck, EngineError> {
    let mut rng_guard = rng
        .lock()
        .map_err(|e| EngineError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
    Ok(roll_check(&mut *rng_guard, modifier, difficulty))
}
