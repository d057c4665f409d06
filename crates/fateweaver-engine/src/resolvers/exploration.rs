//! Exploration resolver: a perception check that loots the scene and meets
//! new faces.

use std::collections::HashSet;
use std::sync::Mutex;

use fateweaver_core::error::EngineError;
use fateweaver_core::rng::DiceRng;

use crate::domain::entity::{RelationKind, RelationUpdate};
use crate::domain::turn::{StageUpdate, TurnState, push_log};
use crate::resolvers::roll_locked;

/// Perception used when the snapshot carries none.
const BASE_PERCEPTION: i64 = 2;
const DIFFICULTY: i64 = 6;

/// Resolves an exploration turn.
///
/// Success grants every item and object present. NPCs whose ids are absent
/// from the snapshot's known relations are met fresh: Neutral on a plain
/// success, LittleFriendly on a critical, LittleHostile on a failed roll.
/// Known NPCs are untouched, so re-exploring a scene is idempotent for them.
///
/// # Errors
///
/// Returns `EngineError::Infrastructure` if the RNG mutex is poisoned.
pub fn resolve(
    state: &TurnState,
    rng: &Mutex<dyn DiceRng + Send>,
) -> Result<StageUpdate, EngineError> {
    let mut logs = state.logs.clone();

    let (Some(player_id), Some(player)) = (state.player_id.as_deref(), state.player.as_ref())
    else {
        push_log(&mut logs, "exploration skipped: no player in this turn");
        return Ok(StageUpdate {
            is_success: Some(false),
            logs: Some(logs),
            ..StageUpdate::default()
        });
    };

    let ability = player.perception.unwrap_or(BASE_PERCEPTION);
    let check = roll_locked(rng, ability, DIFFICULTY)?;
    push_log(&mut logs, format!("exploration roll: {}", check.summary()));

    let mut relations = state.relations.clone();

    if check.is_success {
        for found in state.entities.items.iter().chain(&state.entities.objects) {
            let quantity = found.quantity.unwrap_or(1);
            relations.push(RelationUpdate {
                cause_entity_id: player_id.to_owned(),
                effect_entity_id: found.state_entity_id.clone(),
                kind: RelationKind::Ownership,
                affinity_delta: None,
                quantity: Some(quantity),
            });
            push_log(&mut logs, format!("found '{}' (x{quantity})", found.name));
        }
    }

    let known: HashSet<&str> = player
        .npc_relations
        .iter()
        .map(|npc| npc.npc_id.as_str())
        .collect();
    for npc in &state.entities.npcs {
        if known.contains(npc.state_entity_id.as_str()) {
            push_log(&mut logs, format!("npc '{}' is already known", npc.name));
            continue;
        }
        let (affinity, kind) = if check.is_critical_success {
            (21, RelationKind::LittleFriendly)
        } else if check.is_success {
            (0, RelationKind::Neutral)
        } else {
            (-60, RelationKind::LittleHostile)
        };
        relations.push(RelationUpdate {
            cause_entity_id: player_id.to_owned(),
            effect_entity_id: npc.state_entity_id.clone(),
            kind,
            affinity_delta: Some(affinity),
            quantity: None,
        });
        push_log(
            &mut logs,
            format!("met '{}' for the first time ({kind}, affinity {affinity})", npc.name),
        );
    }

    Ok(StageUpdate {
        relations: Some(relations),
        is_success: Some(check.is_success),
        logs: Some(logs),
        ..StageUpdate::default()
    })
}
