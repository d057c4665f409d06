//! Dialogue resolver: a social check that moves one NPC's affinity.

use std::sync::Mutex;

use fateweaver_core::error::EngineError;
use fateweaver_core::rng::DiceRng;

use crate::domain::entity::{EntityUnit, RelationKind, RelationUpdate};
use crate::domain::turn::{StageUpdate, TurnState, push_log};
use crate::resolvers::roll_locked;

/// Fixed social ability score.
const SOCIAL_ABILITY: i64 = 3;
/// Difficulty used when no NPC is present to derive one from.
const NO_NPC_DIFFICULTY: i64 = -5;

/// Resolves a dialogue turn.
///
/// Targets the first present NPC with a prior relation to the player (its
/// affinity as the starting point), else the first NPC present at affinity 0.
/// The check's margin over the difficulty becomes the affinity change; the
/// emitted relation carries the delta, banded into a kind by the cumulative
/// total. With no NPC present the roll happens for flavor only.
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
        push_log(&mut logs, "dialogue skipped: no player in this turn");
        return Ok(StageUpdate {
            is_success: Some(false),
            logs: Some(logs),
            ..StageUpdate::default()
        });
    };

    let Some((npc, initial)) = select_npc(state, player_id, &mut logs) else {
        let check = roll_locked(rng, SOCIAL_ABILITY, NO_NPC_DIFFICULTY)?;
        push_log(&mut logs, format!("dialogue roll: {}", check.summary()));
        push_log(&mut logs, "no NPC present, dialogue produced no relation changes");
        return Ok(StageUpdate {
            is_success: Some(check.is_success),
            logs: Some(logs),
            ..StageUpdate::default()
        });
    };

    let difficulty = -initial;
    let check = roll_locked(rng, SOCIAL_ABILITY, difficulty)?;
    push_log(&mut logs, format!("dialogue roll: {}", check.summary()));

    let roll_diff = check.total - difficulty;
    let change = if check.is_success {
        roll_diff.max(1)
    } else {
        roll_diff.min(-1)
    };
    let total_affinity = initial + change;
    let kind = RelationKind::from_affinity(total_affinity);
    push_log(
        &mut logs,
        format!(
            "npc '{}' affinity {initial} {change:+} -> {total_affinity} ({kind})",
            npc.name
        ),
    );

    let mut relations = state.relations.clone();
    relations.push(RelationUpdate {
        cause_entity_id: player_id.to_owned(),
        effect_entity_id: npc.state_entity_id.clone(),
        kind,
        affinity_delta: Some(change),
        quantity: None,
    });

    Ok(StageUpdate {
        relations: Some(relations),
        is_success: Some(check.is_success),
        logs: Some(logs),
        ..StageUpdate::default()
    })
}

/// First present NPC with a prior relation to the player (either direction),
/// else the first NPC present at a starting affinity of 0.
fn select_npc<'a>(
    state: &'a TurnState,
    player_id: &str,
    logs: &mut Vec<String>,
) -> Option<(&'a EntityUnit, i64)> {
    let npcs = &state.entities.npcs;
    for npc in npcs {
        if let Some(affinity) = prior_affinity(state, player_id, &npc.state_entity_id) {
            return Some((npc, affinity));
        }
    }
    let first = npcs.first()?;
    push_log(
        logs,
        format!(
            "no prior relation with a present NPC, starting '{}' at affinity 0",
            first.name
        ),
    );
    Some((first, 0))
}

fn prior_affinity(state: &TurnState, player_id: &str, npc_id: &str) -> Option<i64> {
    state.request.relations.iter().find_map(|rel| {
        let involves = (rel.cause_entity_id == player_id && rel.effect_entity_id == npc_id)
            || (rel.cause_entity_id == npc_id && rel.effect_entity_id == player_id);
        if involves {
            Some(rel.affinity_delta.unwrap_or(0))
        } else {
            None
        }
    })
}
