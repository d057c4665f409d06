//! Rest resolver: guaranteed base healing with a roll-scaled bonus.

use std::sync::Mutex;

use fateweaver_core::error::EngineError;
use fateweaver_core::rng::DiceRng;

use crate::domain::entity::EntityDiff;
use crate::domain::turn::{StageUpdate, TurnState, push_log};
use crate::resolvers::roll_locked;

/// Healing granted regardless of the roll, also used as the roll modifier.
const BASE_HEAL: i64 = 2;
const DIFFICULTY: i64 = 6;

/// Resolves a rest turn. The player always recovers at least the base
/// amount; a success adds half the roll total, a critical adds all of it.
///
/// # Errors
///
/// Returns `EngineError::Infrastructure` if the RNG mutex is poisoned.
pub fn resolve(
    state: &TurnState,
    rng: &Mutex<dyn DiceRng + Send>,
) -> Result<StageUpdate, EngineError> {
    let mut logs = state.logs.clone();

    let Some(player_id) = state.player_id.as_deref() else {
        push_log(&mut logs, "rest skipped: no player in this turn");
        return Ok(StageUpdate {
            is_success: Some(false),
            logs: Some(logs),
            ..StageUpdate::default()
        });
    };

    let check = roll_locked(rng, BASE_HEAL, DIFFICULTY)?;
    push_log(&mut logs, format!("rest roll: {}", check.summary()));

    let additional = if check.is_critical_success {
        check.total
    } else if check.is_success {
        check.total / 2
    } else {
        0
    };
    let total_heal = BASE_HEAL + additional;
    push_log(&mut logs, format!("player rests and recovers {total_heal} hp"));

    let mut diffs = state.diffs.clone();
    diffs.push(EntityDiff::single(player_id, "hp", total_heal));

    Ok(StageUpdate {
        diffs: Some(diffs),
        is_success: Some(check.is_success),
        logs: Some(logs),
        ..StageUpdate::default()
    })
}
