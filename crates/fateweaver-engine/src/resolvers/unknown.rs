//! Unknown resolver: an unrecognized turn rolls for flavor only.

use std::sync::Mutex;

use fateweaver_core::error::EngineError;
use fateweaver_core::rng::DiceRng;

use crate::domain::turn::{StageUpdate, TurnState, push_log};
use crate::resolvers::roll_locked;

const DIFFICULTY: i64 = 6;

/// Resolves an unrecognized turn: a pure 2d6 roll feeding the log and the
/// success flag, with no diffs or relation changes.
///
/// # Errors
///
/// Returns `EngineError::Infrastructure` if the RNG mutex is poisoned.
pub fn resolve(
    state: &TurnState,
    rng: &Mutex<dyn DiceRng + Send>,
) -> Result<StageUpdate, EngineError> {
    let mut logs = state.logs.clone();
    let check = roll_locked(rng, 0, DIFFICULTY)?;
    push_log(
        &mut logs,
        format!("unrecognized phase, flavor roll: {}", check.summary()),
    );
    Ok(StageUpdate {
        is_success: Some(check.is_success),
        logs: Some(logs),
        ..StageUpdate::default()
    })
}
