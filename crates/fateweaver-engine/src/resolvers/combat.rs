//! Combat resolver: player power versus enemy difficulty over one target.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use fateweaver_core::catalog::{EnemyCatalog, ItemCatalog, ItemRecord};
use fateweaver_core::error::EngineError;
use fateweaver_core::player::{InventoryItem, PlayerSnapshot};
use fateweaver_core::rng::DiceRng;

use crate::domain::entity::{EntityDiff, EntityUnit, RelationKind};
use crate::domain::turn::{StageUpdate, TurnState, push_log};
use crate::resolvers::roll_locked;

/// Fixed combat ability score added to every power calculation.
const COMBAT_ABILITY: i64 = 2;
/// Difficulty substituted when the enemy has no catalog record or field.
const DEFAULT_DIFFICULTY: i64 = 6;
/// Metadata keys probed, in order, for the effect of scenario-local gear.
const EFFECT_META_KEYS: [&str; 6] = [
    "effect_value",
    "attack_bonus",
    "defense_bonus",
    "attack",
    "defense",
    "power",
];

/// Resolves a combat turn.
///
/// Selects one target enemy (request target fuzzy match, then a prior hostile
/// relation, then the first enemy present), compares player power
/// (gear + ability + 2d6) against the enemy's catalog difficulty, and emits
/// at most one hp diff for the gap. Prior relations pass through untouched.
///
/// # Errors
///
/// Propagates catalog transport failures. A missing enemy record or
/// difficulty field only triggers the default-difficulty substitution.
pub async fn resolve(
    state: &TurnState,
    items: &dyn ItemCatalog,
    enemies: &dyn EnemyCatalog,
    rng: &Mutex<dyn DiceRng + Send>,
) -> Result<StageUpdate, EngineError> {
    let mut logs = state.logs.clone();

    let (Some(player_id), Some(player)) = (state.player_id.as_deref(), state.player.as_ref())
    else {
        push_log(&mut logs, "combat skipped: no player in this turn");
        return Ok(StageUpdate {
            is_success: Some(false),
            logs: Some(logs),
            ..StageUpdate::default()
        });
    };

    let Some(target) = select_target(state, player_id, &mut logs) else {
        return Ok(StageUpdate {
            is_success: Some(false),
            logs: Some(logs),
            ..StageUpdate::default()
        });
    };

    let difficulty = enemy_difficulty(target, enemies, &mut logs).await?;
    let gear = gear_bonus(player, items, &mut logs).await?;

    let check = roll_locked(rng, 0, DEFAULT_DIFFICULTY)?;
    let power = gear + COMBAT_ABILITY + check.total;
    push_log(
        &mut logs,
        format!(
            "player power {power} (gear {gear} + ability {COMBAT_ABILITY} + roll {}) vs enemy difficulty {difficulty}",
            check.total
        ),
    );

    let gap = power - difficulty;
    let mut diffs = state.diffs.clone();
    let is_success = match gap.cmp(&0) {
        Ordering::Greater => {
            diffs.push(EntityDiff::single(&target.state_entity_id, "hp", -gap));
            push_log(&mut logs, format!("enemy '{}' takes {gap} damage", target.name));
            true
        }
        Ordering::Less => {
            diffs.push(EntityDiff::single(player_id, "hp", gap));
            push_log(&mut logs, format!("player takes {} damage", -gap));
            false
        }
        Ordering::Equal => {
            push_log(
                &mut logs,
                format!("draw against '{}', no damage dealt", target.name),
            );
            false
        }
    };

    Ok(StageUpdate {
        diffs: Some(diffs),
        is_success: Some(is_success),
        logs: Some(logs),
        ..StageUpdate::default()
    })
}

/// Picks the target enemy in priority order: fuzzy request-target match,
/// first prior hostile relation involving the player, first enemy present.
fn select_target<'a>(
    state: &'a TurnState,
    player_id: &str,
    logs: &mut Vec<String>,
) -> Option<&'a EntityUnit> {
    let enemies = &state.entities.enemies;
    if enemies.is_empty() {
        push_log(logs, "combat skipped: no enemy present");
        return None;
    }

    if let Some(requested) = state.request.target.as_deref() {
        if let Some(enemy) = fuzzy_match(requested, enemies) {
            push_log(
                logs,
                format!("request target '{requested}' locked onto enemy '{}'", enemy.name),
            );
            return Some(enemy);
        }
    }

    for relation in &state.request.relations {
        if relation.kind != RelationKind::Hostile {
            continue;
        }
        let other = if relation.cause_entity_id == player_id {
            &relation.effect_entity_id
        } else if relation.effect_entity_id == player_id {
            &relation.cause_entity_id
        } else {
            continue;
        };
        if let Some(enemy) = enemies.iter().find(|e| &e.state_entity_id == other) {
            push_log(
                logs,
                format!("enemy '{}' targeted from a prior hostile relation", enemy.name),
            );
            return Some(enemy);
        }
    }

    let first = &enemies[0];
    push_log(
        logs,
        format!("no hostile relation, targeting the first enemy '{}'", first.name),
    );
    Some(first)
}

/// Finds the best-scoring enemy for a requested target name or id.
///
/// An exact match (lowercased or normalized) outranks substring containment,
/// which is accepted in either direction; longer matches break ties.
fn fuzzy_match<'a>(requested: &str, enemies: &'a [EntityUnit]) -> Option<&'a EntityUnit> {
    let target_raw = requested.trim();
    if target_raw.is_empty() {
        return None;
    }
    let target_lower = target_raw.to_lowercase();
    let target_norm = normalize(target_raw);
    if target_norm.is_empty() {
        return None;
    }

    let mut best: Option<&EntityUnit> = None;
    let mut best_score = 0usize;
    for enemy in enemies {
        let mut candidate_score = 0usize;
        for alias in [enemy.state_entity_id.trim(), enemy.name.trim()] {
            if alias.is_empty() {
                continue;
            }
            candidate_score = candidate_score.max(alias_score(&target_lower, &target_norm, alias));
        }
        if candidate_score > best_score {
            best_score = candidate_score;
            best = Some(enemy);
        }
    }
    best
}

fn alias_score(target_lower: &str, target_norm: &str, alias: &str) -> usize {
    let alias_lower = alias.to_lowercase();
    let alias_norm = normalize(alias);
    if alias_norm.is_empty() {
        return 0;
    }

    let mut score = 0usize;
    if target_lower == alias_lower || target_norm == alias_norm {
        score = score.max(120 + alias_norm.chars().count());
    }
    if let Some(len) = containment_len(&alias_lower, target_lower) {
        score = score.max(90 + len);
    }
    if let Some(len) = containment_len(&alias_norm, target_norm) {
        score = score.max(80 + len);
    }
    score
}

/// Char length of the contained string when one contains the other.
fn containment_len(alias: &str, target: &str) -> Option<usize> {
    if target.contains(alias) {
        Some(alias.chars().count())
    } else if alias.contains(target) {
        Some(target.chars().count())
    } else {
        None
    }
}

/// Keeps digits, lowercased latin letters, and Korean syllables.
fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_digit() || c.is_ascii_lowercase() || ('가'..='힣').contains(c))
        .collect()
}

async fn enemy_difficulty(
    target: &EntityUnit,
    enemies: &dyn EnemyCatalog,
    logs: &mut Vec<String>,
) -> Result<i64, EngineError> {
    let Some(catalog_id) = target.catalog_id else {
        push_log(
            logs,
            format!(
                "enemy '{}' has no catalog id, defaulting difficulty to {DEFAULT_DIFFICULTY}",
                target.name
            ),
        );
        return Ok(DEFAULT_DIFFICULTY);
    };

    let records = enemies.enemies_by_ids(&[catalog_id]).await?;
    let difficulty = records
        .iter()
        .find(|r| r.enemy_id == catalog_id)
        .and_then(|r| r.base_difficulty);
    match difficulty {
        Some(difficulty) => {
            push_log(
                logs,
                format!("enemy '{}' difficulty {difficulty} from catalog", target.name),
            );
            Ok(difficulty)
        }
        None => {
            push_log(
                logs,
                format!(
                    "enemy '{}' missing catalog difficulty, defaulting to {DEFAULT_DIFFICULTY}",
                    target.name
                ),
            );
            Ok(DEFAULT_DIFFICULTY)
        }
    }
}

/// Sums the effect of the player's combat gear.
///
/// Numeric catalog ids resolve through the item catalog; scenario-local
/// string ids fall back to the item's embedded metadata keys.
async fn gear_bonus(
    player: &PlayerSnapshot,
    items: &dyn ItemCatalog,
    logs: &mut Vec<String>,
) -> Result<i64, EngineError> {
    let catalog_ids: Vec<i64> = player
        .items
        .iter()
        .filter_map(InventoryItem::catalog_id)
        .collect();
    let records = if catalog_ids.is_empty() {
        Vec::new()
    } else {
        items.items_by_ids(&catalog_ids).await?
    };
    let by_id: HashMap<i64, &ItemRecord> = records.iter().map(|r| (r.item_id, r)).collect();

    let mut bonus = 0;
    for item in &player.items {
        let record = item.catalog_id().and_then(|id| by_id.get(&id).copied());
        let item_type = record
            .and_then(|r| r.item_type.as_deref())
            .or(item.item_type.as_deref());
        if !is_combat_gear(item_type) {
            continue;
        }
        let effect = record
            .and_then(|r| r.effect_value)
            .or_else(|| EFFECT_META_KEYS.iter().find_map(|key| item.meta_i64(key)));
        if let Some(effect) = effect {
            bonus += effect;
            push_log(logs, format!("gear '{}' adds {effect} to player power", item.name));
        }
    }
    Ok(bonus)
}

fn is_combat_gear(item_type: Option<&str>) -> bool {
    let Some(kind) = item_type else {
        return false;
    };
    matches!(
        kind.trim().to_lowercase().as_str(),
        "weapon" | "armor" | "equipment" | "무기" | "방어구"
    )
}
