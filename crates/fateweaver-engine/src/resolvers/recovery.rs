//! Recovery resolver: drink one potion, heal its effect plus a rolled bonus.

use std::collections::HashMap;
use std::sync::Mutex;

use fateweaver_core::catalog::{ItemCatalog, ItemRecord};
use fateweaver_core::error::EngineError;
use fateweaver_core::interpreter::StoryInterpreter;
use fateweaver_core::player::{InventoryItem, PlayerSnapshot};
use fateweaver_core::rng::DiceRng;

use crate::domain::entity::{EntityDiff, RelationKind, RelationUpdate};
use crate::domain::turn::{StageUpdate, TurnState, push_log};
use crate::resolvers::roll_locked;

/// Bonus granted by a plain success, doubled on a critical. Also the roll
/// modifier.
const BASE_BONUS: i64 = 2;

struct PotionCandidate<'a> {
    item: &'a InventoryItem,
    /// Display name, catalog record first.
    name: String,
    heal: i64,
}

/// Resolves a recovery turn.
///
/// Scans the inventory for potions, lets the interpreter pick one when
/// several qualify (falling back to the first candidate), and heals the
/// potion's effect plus a roll-scaled bonus. Drinking a found potion counts
/// as a success whatever the roll; the roll decides only the bonus. The
/// potion is always consumed; a missing prior consume relation is logged,
/// never fabricated.
///
/// # Errors
///
/// Propagates item-catalog transport failures. Interpreter failures during
/// the potion choice do not error; the first candidate is used instead.
pub async fn resolve(
    state: &TurnState,
    items: &dyn ItemCatalog,
    interpreter: &dyn StoryInterpreter,
    rng: &Mutex<dyn DiceRng + Send>,
) -> Result<StageUpdate, EngineError> {
    let mut logs = state.logs.clone();

    let (Some(player_id), Some(player)) = (state.player_id.as_deref(), state.player.as_ref())
    else {
        push_log(&mut logs, "recovery skipped: no player in this turn");
        return Ok(StageUpdate {
            is_success: Some(false),
            logs: Some(logs),
            ..StageUpdate::default()
        });
    };

    let candidates = potion_candidates(player, items).await?;
    if candidates.is_empty() {
        push_log(&mut logs, "no potion in inventory");
        return Ok(StageUpdate {
            is_success: Some(false),
            logs: Some(logs),
            ..StageUpdate::default()
        });
    }

    let chosen = choose_candidate(&candidates, &state.request.story, interpreter, &mut logs).await;
    push_log(&mut logs, format!("drinking '{}'", chosen.name));

    let mut relations = state.relations.clone();
    relations.push(consume_relation(state, player_id, chosen.item, &mut logs));

    if chosen.heal == 0 {
        push_log(
            &mut logs,
            format!("'{}' has no heal amount, consumed without effect", chosen.name),
        );
        return Ok(StageUpdate {
            relations: Some(relations),
            is_success: Some(true),
            logs: Some(logs),
            ..StageUpdate::default()
        });
    }

    let check = roll_locked(rng, BASE_BONUS, chosen.heal)?;
    push_log(&mut logs, format!("recovery roll: {}", check.summary()));

    let bonus = if check.is_critical_success {
        BASE_BONUS * 2
    } else if check.is_success {
        BASE_BONUS
    } else {
        0
    };
    let total_heal = chosen.heal + bonus;
    push_log(&mut logs, format!("player recovers {total_heal} hp"));

    let mut diffs = state.diffs.clone();
    diffs.push(EntityDiff::single(player_id, "hp", total_heal));

    Ok(StageUpdate {
        diffs: Some(diffs),
        relations: Some(relations),
        is_success: Some(true),
        logs: Some(logs),
        ..StageUpdate::default()
    })
}

/// Scans the inventory for potions: the name contains "potion"/"포션", or the
/// resolved type is consumable. Catalog records fill in name, type, and heal
/// amount for numeric ids; embedded metadata covers scenario-local items.
async fn potion_candidates<'a>(
    player: &'a PlayerSnapshot,
    items: &dyn ItemCatalog,
) -> Result<Vec<PotionCandidate<'a>>, EngineError> {
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

    let mut candidates = Vec::new();
    for item in &player.items {
        let record = item.catalog_id().and_then(|id| by_id.get(&id).copied());
        let name = record.map_or(item.name.as_str(), |r| r.name.as_str());
        let item_type = record
            .and_then(|r| r.item_type.as_deref())
            .or(item.item_type.as_deref());
        if !is_potion(name, item_type) {
            continue;
        }
        let heal = record
            .and_then(|r| r.effect_value)
            .or_else(|| item.meta_i64("heal_amount"))
            .or_else(|| item.meta_i64("effect_value"))
            .unwrap_or(0);
        candidates.push(PotionCandidate {
            item,
            name: name.to_owned(),
            heal,
        });
    }
    Ok(candidates)
}

fn is_potion(name: &str, item_type: Option<&str>) -> bool {
    let name = name.to_lowercase();
    if name.contains("potion") || name.contains("포션") {
        return true;
    }
    matches!(
        item_type.map(|t| t.trim().to_lowercase()).as_deref(),
        Some("consumable" | "소모품")
    )
}

/// One candidate: take it. Several: ask the interpreter, falling back to the
/// first candidate on failure or an off-list answer.
async fn choose_candidate<'a>(
    candidates: &'a [PotionCandidate<'a>],
    story: &str,
    interpreter: &dyn StoryInterpreter,
    logs: &mut Vec<String>,
) -> &'a PotionCandidate<'a> {
    if candidates.len() == 1 {
        return &candidates[0];
    }
    let names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
    match interpreter.choose_item(&names, story).await {
        Ok(answer) => {
            let answer = answer.trim();
            if let Some(hit) = candidates.iter().find(|c| c.name.eq_ignore_ascii_case(answer)) {
                hit
            } else {
                push_log(
                    logs,
                    format!("interpreter chose unknown potion '{answer}', using the first candidate"),
                );
                &candidates[0]
            }
        }
        Err(e) => {
            push_log(logs, format!("potion choice failed ({e}), using the first candidate"));
            &candidates[0]
        }
    }
}

/// Builds the consume relation for the chosen potion. A prior consume
/// relation referencing it suppresses the bookkeeping log; one is never
/// fabricated.
fn consume_relation(
    state: &TurnState,
    player_id: &str,
    potion: &InventoryItem,
    logs: &mut Vec<String>,
) -> RelationUpdate {
    let matched = state.request.relations.iter().any(|rel| {
        rel.kind == RelationKind::Consume
            && (rel.effect_entity_id == potion.item_id || rel.cause_entity_id == potion.item_id)
    });
    if !matched {
        push_log(
            logs,
            format!("no prior consume relation references '{}', emitting without one", potion.name),
        );
    }
    RelationUpdate {
        cause_entity_id: player_id.to_owned(),
        effect_entity_id: potion.item_id.clone(),
        kind: RelationKind::Consume,
        affinity_delta: None,
        quantity: Some(-1),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use fateweaver_test_support::{
        FailingInterpreter, FixedInterpreter, InMemoryItemCatalog, SequenceDice,
    };

    use super::*;
    use crate::domain::entity::{CategorizedEntities, EntityRole, EntityUnit};
    use crate::domain::turn::TurnRequest;
    use fateweaver_core::phase::Phase;

    fn inv_item(id: &str, name: &str, item_type: Option<&str>) -> InventoryItem {
        InventoryItem {
            item_id: id.to_owned(),
            name: name.to_owned(),
            item_type: item_type.map(str::to_owned),
            meta: BTreeMap::new(),
        }
    }

    fn snapshot(items: Vec<InventoryItem>) -> PlayerSnapshot {
        PlayerSnapshot {
            hp: 10,
            gold: 0,
            perception: None,
            items,
            npc_relations: vec![],
        }
    }

    fn recovery_state(player: Option<PlayerSnapshot>, relations: Vec<RelationUpdate>) -> TurnState {
        let entities = vec![EntityUnit {
            state_entity_id: "player-1".to_owned(),
            catalog_id: None,
            name: "Aria".to_owned(),
            role: EntityRole::Player,
            quantity: None,
        }];
        let mut state = TurnState::new(TurnRequest {
            session_id: "sess-1".to_owned(),
            scenario_id: "scn-1".to_owned(),
            locale_id: 1,
            phase_hint: None,
            target: None,
            entities: entities.clone(),
            relations,
            story: "bleeding, the hero fumbles for a vial".to_owned(),
        });
        state.entities = CategorizedEntities::from_entities(&entities);
        state.player_id = state.entities.player_id.clone();
        state.player = player;
        state
    }

    fn healing_record(item_id: i64, effect_value: Option<i64>) -> ItemRecord {
        ItemRecord {
            item_id,
            name: "Healing Potion".to_owned(),
            item_type: Some("consumable".to_owned()),
            effect_value,
            base_price: None,
        }
    }

    fn dice(faces: Vec<u32>) -> Mutex<SequenceDice> {
        Mutex::new(SequenceDice::new(faces))
    }

    fn choosing_interpreter() -> FixedInterpreter {
        FixedInterpreter::new(Phase::Recovery, "drinks", 1.0)
    }

    // --- healing tests ---

    #[tokio::test]
    async fn test_failed_roll_still_heals_the_potion_effect() {
        // Arrange: effect 30 outruns any 2d6+2 total; bonus stays 0.
        let player = snapshot(vec![inv_item("3", "Healing Potion", None)]);
        let state = recovery_state(Some(player), vec![]);
        let items = InMemoryItemCatalog::new(vec![healing_record(3, Some(30))]);
        let rng = dice(vec![3, 3]);

        // Act
        let update = resolve(&state, &items, &choosing_interpreter(), &rng)
            .await
            .unwrap();

        // Assert: the drink itself still succeeds.
        assert_eq!(update.is_success, Some(true));
        let diffs = update.diffs.unwrap();
        assert_eq!(diffs, vec![EntityDiff::single("player-1", "hp", 30)]);
        let relations = update.relations.unwrap();
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].kind, RelationKind::Consume);
        assert_eq!(relations[0].effect_entity_id, "3");
        assert_eq!(relations[0].quantity, Some(-1));
    }

    #[tokio::test]
    async fn test_successful_roll_adds_the_base_bonus() {
        // Raw 5 + 2 = 7 vs difficulty 5: heal 5 + 2.
        let player = snapshot(vec![inv_item("3", "Healing Potion", None)]);
        let state = recovery_state(Some(player), vec![]);
        let items = InMemoryItemCatalog::new(vec![healing_record(3, Some(5))]);
        let rng = dice(vec![2, 3]);

        let update = resolve(&state, &items, &choosing_interpreter(), &rng)
            .await
            .unwrap();

        assert_eq!(update.is_success, Some(true));
        assert_eq!(update.diffs.unwrap(), vec![EntityDiff::single("player-1", "hp", 7)]);
    }

    #[tokio::test]
    async fn test_critical_roll_doubles_the_bonus() {
        let player = snapshot(vec![inv_item("3", "Healing Potion", None)]);
        let state = recovery_state(Some(player), vec![]);
        let items = InMemoryItemCatalog::new(vec![healing_record(3, Some(5))]);
        let rng = dice(vec![6, 6]);

        let update = resolve(&state, &items, &choosing_interpreter(), &rng)
            .await
            .unwrap();

        assert_eq!(update.diffs.unwrap(), vec![EntityDiff::single("player-1", "hp", 9)]);
    }

    #[tokio::test]
    async fn test_scenario_local_potion_reads_embedded_heal_amount() {
        // Arrange: a consumable-typed item with no catalog record.
        let mut elixir = inv_item("scene-elixir", "Elixir of Haste", Some("소모품"));
        elixir.meta.insert("heal_amount".to_owned(), serde_json::json!(12));
        let state = recovery_state(Some(snapshot(vec![elixir])), vec![]);
        let items = InMemoryItemCatalog::new(vec![]);
        let rng = dice(vec![3, 3]);

        // Act
        let update = resolve(&state, &items, &choosing_interpreter(), &rng)
            .await
            .unwrap();

        // Assert: total 8 vs 12 fails; heal 12.
        assert_eq!(update.diffs.unwrap(), vec![EntityDiff::single("player-1", "hp", 12)]);
    }

    // --- candidate selection tests ---

    #[tokio::test]
    async fn test_no_potion_degrades_with_a_log() {
        let player = snapshot(vec![inv_item("10", "Steel Sword", Some("weapon"))]);
        let state = recovery_state(Some(player), vec![]);
        let items = InMemoryItemCatalog::new(vec![]);
        let rng = dice(vec![]);

        let update = resolve(&state, &items, &choosing_interpreter(), &rng)
            .await
            .unwrap();

        assert_eq!(update.is_success, Some(false));
        assert!(update.diffs.is_none());
        assert!(update.relations.is_none());
        assert!(update.logs.unwrap().iter().any(|l| l.contains("no potion")));
    }

    #[tokio::test]
    async fn test_interpreter_picks_among_several_potions() {
        let player = snapshot(vec![
            inv_item("3", "Healing Potion", None),
            inv_item("8", "Mana Potion", None),
        ]);
        let state = recovery_state(Some(player), vec![]);
        let items = InMemoryItemCatalog::new(vec![]);
        let rng = dice(vec![3, 3]);
        let interpreter = choosing_interpreter().with_choice("Mana Potion");

        let update = resolve(&state, &items, &interpreter, &rng).await.unwrap();

        assert_eq!(update.relations.unwrap()[0].effect_entity_id, "8");
    }

    #[tokio::test]
    async fn test_interpreter_failure_falls_back_to_the_first_candidate() {
        let player = snapshot(vec![
            inv_item("3", "Healing Potion", None),
            inv_item("8", "Mana Potion", None),
        ]);
        let state = recovery_state(Some(player), vec![]);
        let items = InMemoryItemCatalog::new(vec![]);
        let rng = dice(vec![3, 3]);

        let update = resolve(&state, &items, &FailingInterpreter, &rng)
            .await
            .unwrap();

        assert_eq!(update.relations.unwrap()[0].effect_entity_id, "3");
    }

    #[tokio::test]
    async fn test_off_list_answer_falls_back_to_the_first_candidate() {
        let player = snapshot(vec![
            inv_item("3", "Healing Potion", None),
            inv_item("8", "Mana Potion", None),
        ]);
        let state = recovery_state(Some(player), vec![]);
        let items = InMemoryItemCatalog::new(vec![]);
        let rng = dice(vec![3, 3]);
        let interpreter = choosing_interpreter().with_choice("Dragon Ale");

        let update = resolve(&state, &items, &interpreter, &rng).await.unwrap();

        assert_eq!(update.relations.unwrap()[0].effect_entity_id, "3");
        assert!(
            update
                .logs
                .unwrap()
                .iter()
                .any(|l| l.contains("unknown potion"))
        );
    }

    // --- bookkeeping tests ---

    #[tokio::test]
    async fn test_matching_prior_consume_relation_suppresses_the_mismatch_log() {
        let player = snapshot(vec![inv_item("3", "Healing Potion", None)]);
        let prior = vec![RelationUpdate {
            cause_entity_id: "player-1".to_owned(),
            effect_entity_id: "3".to_owned(),
            kind: RelationKind::Consume,
            affinity_delta: None,
            quantity: Some(1),
        }];
        let state = recovery_state(Some(player), prior);
        let items = InMemoryItemCatalog::new(vec![healing_record(3, Some(5))]);
        let rng = dice(vec![2, 3]);

        let update = resolve(&state, &items, &choosing_interpreter(), &rng)
            .await
            .unwrap();

        let logs = update.logs.unwrap();
        assert!(!logs.iter().any(|l| l.contains("emitting without one")));
        assert_eq!(update.relations.unwrap()[0].effect_entity_id, "3");
    }

    #[tokio::test]
    async fn test_unmatched_consume_relation_is_logged_not_fabricated() {
        let player = snapshot(vec![inv_item("3", "Healing Potion", None)]);
        let state = recovery_state(Some(player), vec![]);
        let items = InMemoryItemCatalog::new(vec![healing_record(3, Some(5))]);
        let rng = dice(vec![2, 3]);

        let update = resolve(&state, &items, &choosing_interpreter(), &rng)
            .await
            .unwrap();

        let logs = update.logs.unwrap();
        assert!(logs.iter().any(|l| l.contains("emitting without one")));
        // Still exactly one relation: the consume itself.
        assert_eq!(update.relations.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_heal_potion_is_consumed_without_a_diff() {
        // Arrange: name matches the heuristic but nothing provides a heal
        // amount.
        let player = snapshot(vec![inv_item("murk", "Murky Potion", None)]);
        let state = recovery_state(Some(player), vec![]);
        let items = InMemoryItemCatalog::new(vec![]);
        let rng = dice(vec![]);

        // Act
        let update = resolve(&state, &items, &choosing_interpreter(), &rng)
            .await
            .unwrap();

        // Assert
        assert_eq!(update.is_success, Some(true));
        assert!(update.diffs.is_none());
        assert_eq!(update.relations.unwrap().len(), 1);
        assert!(update.logs.unwrap().iter().any(|l| l.contains("no heal amount")));
    }

    #[tokio::test]
    async fn test_missing_player_degrades_with_a_log() {
        let state = recovery_state(None, vec![]);
        let items = InMemoryItemCatalog::new(vec![]);
        let rng = dice(vec![]);

        let update = resolve(&state, &items, &choosing_interpreter(), &rng)
            .await
            .unwrap();

        assert_eq!(update.is_success, Some(false));
        assert!(update.logs.unwrap().iter().any(|l| l.contains("no player")));
    }
}
