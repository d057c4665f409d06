//! Negotiation resolver: a bargain check that may buy one priced item.

use std::sync::Mutex;

use fateweaver_core::catalog::ItemCatalog;
use fateweaver_core::error::EngineError;
use fateweaver_core::rng::DiceRng;

use crate::domain::entity::{EntityDiff, EntityUnit, RelationKind, RelationUpdate};
use crate::domain::turn::{StageUpdate, TurnState, push_log};
use crate::resolvers::roll_locked;

/// Fixed bargain ability score.
const BARGAIN_ABILITY: i64 = 3;

/// Resolves a negotiation turn.
///
/// The bargain difficulty opposes the player's standing with a present NPC.
/// Success with a catalog-priced item in the scene buys it at a discount
/// scaled by the raw roll, emitting the gold diff and an ownership relation;
/// anything else produces logs only.
///
/// # Errors
///
/// Propagates item-catalog transport failures.
pub async fn resolve(
    state: &TurnState,
    items: &dyn ItemCatalog,
    rng: &Mutex<dyn DiceRng + Send>,
) -> Result<StageUpdate, EngineError> {
    let mut logs = state.logs.clone();

    let Some(player_id) = state.player_id.as_deref() else {
        push_log(&mut logs, "negotiation skipped: no player in this turn");
        return Ok(StageUpdate {
            is_success: Some(false),
            logs: Some(logs),
            ..StageUpdate::default()
        });
    };

    let initial = counterparty_affinity(state, player_id);
    let check = roll_locked(rng, BARGAIN_ABILITY, -initial)?;
    push_log(&mut logs, format!("negotiation roll: {}", check.summary()));

    if !check.is_success {
        push_log(&mut logs, "bargain failed, no purchase made");
        return Ok(StageUpdate {
            is_success: Some(false),
            logs: Some(logs),
            ..StageUpdate::default()
        });
    }

    let Some((item, base_price)) = priced_item(state, items, &mut logs).await? else {
        return Ok(StageUpdate {
            is_success: Some(true),
            logs: Some(logs),
            ..StageUpdate::default()
        });
    };

    let pct = discount_pct(check.roll_result);
    let final_price = base_price * (100 - pct) / 100;
    push_log(
        &mut logs,
        format!("bought '{}' at {pct}% off: {base_price} -> {final_price} gold", item.name),
    );

    let mut diffs = state.diffs.clone();
    diffs.push(EntityDiff::single(player_id, "gold", -final_price));
    let mut relations = state.relations.clone();
    relations.push(RelationUpdate {
        cause_entity_id: player_id.to_owned(),
        effect_entity_id: item.state_entity_id.clone(),
        kind: RelationKind::Ownership,
        affinity_delta: None,
        quantity: Some(item.quantity.unwrap_or(1)),
    });

    Ok(StageUpdate {
        diffs: Some(diffs),
        relations: Some(relations),
        is_success: Some(true),
        logs: Some(logs),
        ..StageUpdate::default()
    })
}

/// First prior affinity held by the player toward a present NPC, else 0.
fn counterparty_affinity(state: &TurnState, player_id: &str) -> i64 {
    state
        .request
        .relations
        .iter()
        .find_map(|rel| {
            let toward_present_npc = rel.cause_entity_id == player_id
                && state
                    .entities
                    .npcs
                    .iter()
                    .any(|npc| npc.state_entity_id == rel.effect_entity_id);
            if toward_present_npc {
                Some(rel.affinity_delta.unwrap_or(0))
            } else {
                None
            }
        })
        .unwrap_or(0)
}

/// Discount percentage for a raw 2d6 roll: 5% at 2 up to 25% at 12.
fn discount_pct(raw_roll: i64) -> i64 {
    5 + (raw_roll - 2) * 2
}

/// First scene item (request order) whose catalog id resolves to a priced
/// record.
async fn priced_item<'a>(
    state: &'a TurnState,
    items: &dyn ItemCatalog,
    logs: &mut Vec<String>,
) -> Result<Option<(&'a EntityUnit, i64)>, EngineError> {
    let scene_items = &state.entities.items;
    let catalog_ids: Vec<i64> = scene_items.iter().filter_map(|i| i.catalog_id).collect();
    if !catalog_ids.is_empty() {
        let records = items.items_by_ids(&catalog_ids).await?;
        for item in scene_items {
            let Some(catalog_id) = item.catalog_id else {
                continue;
            };
            let price = records
                .iter()
                .find(|r| r.item_id == catalog_id)
                .and_then(|r| r.base_price);
            if let Some(price) = price {
                return Ok(Some((item, price)));
            }
        }
    }
    push_log(logs, "no catalog-priced item in the scene");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use fateweaver_core::catalog::ItemRecord;
    use fateweaver_test_support::{InMemoryItemCatalog, SequenceDice};

    use super::*;
    use crate::domain::entity::{CategorizedEntities, EntityRole};
    use crate::domain::turn::TurnRequest;

    fn entity(id: &str, name: &str, role: EntityRole, catalog_id: Option<i64>) -> EntityUnit {
        EntityUnit {
            state_entity_id: id.to_owned(),
            catalog_id,
            name: name.to_owned(),
            role,
            quantity: None,
        }
    }

    fn nego_state(entities: Vec<EntityUnit>, relations: Vec<RelationUpdate>) -> TurnState {
        let mut state = TurnState::new(TurnRequest {
            session_id: "sess-1".to_owned(),
            scenario_id: "scn-1".to_owned(),
            locale_id: 1,
            phase_hint: None,
            target: None,
            entities: entities.clone(),
            relations,
            story: "haggling over the counter".to_owned(),
        });
        state.entities = CategorizedEntities::from_entities(&entities);
        state.player_id = state.entities.player_id.clone();
        state
    }

    fn record(item_id: i64, base_price: Option<i64>) -> ItemRecord {
        ItemRecord {
            item_id,
            name: format!("item-{item_id}"),
            item_type: None,
            effect_value: None,
            base_price,
        }
    }

    fn dice(faces: Vec<u32>) -> Mutex<SequenceDice> {
        Mutex::new(SequenceDice::new(faces))
    }

    #[test]
    fn test_discount_scales_with_the_raw_roll() {
        assert_eq!(discount_pct(2), 5);
        assert_eq!(discount_pct(8), 17);
        assert_eq!(discount_pct(12), 25);
        for raw in 2..12 {
            assert!(discount_pct(raw) <= discount_pct(raw + 1));
        }
    }

    #[tokio::test]
    async fn test_successful_bargain_buys_the_item_at_a_discount() {
        // Arrange: raw 8 -> 17% off a base price of 100.
        let entities = vec![
            entity("player-1", "Aria", EntityRole::Player, None),
            entity("lamp-1", "Brass Lamp", EntityRole::Item, Some(5)),
        ];
        let state = nego_state(entities, vec![]);
        let items = InMemoryItemCatalog::new(vec![record(5, Some(100))]);
        let rng = dice(vec![4, 4]);

        // Act
        let update = resolve(&state, &items, &rng).await.unwrap();

        // Assert
        assert_eq!(update.is_success, Some(true));
        let diffs = update.diffs.unwrap();
        assert_eq!(diffs, vec![EntityDiff::single("player-1", "gold", -83)]);
        let relations = update.relations.unwrap();
        assert_eq!(relations[0].kind, RelationKind::Ownership);
        assert_eq!(relations[0].effect_entity_id, "lamp-1");
        assert_eq!(relations[0].quantity, Some(1));
    }

    #[tokio::test]
    async fn test_failed_bargain_emits_nothing() {
        // Arrange: affinity -20 -> difficulty 20; total 11 fails.
        let entities = vec![
            entity("player-1", "Aria", EntityRole::Player, None),
            entity("npc-1", "Merchant", EntityRole::Npc, None),
            entity("lamp-1", "Brass Lamp", EntityRole::Item, Some(5)),
        ];
        let relations = vec![RelationUpdate {
            cause_entity_id: "player-1".to_owned(),
            effect_entity_id: "npc-1".to_owned(),
            kind: RelationKind::Neutral,
            affinity_delta: Some(-20),
            quantity: None,
        }];
        let state = nego_state(entities, relations);
        let items = InMemoryItemCatalog::new(vec![record(5, Some(100))]);
        let rng = dice(vec![4, 4]);

        // Act
        let update = resolve(&state, &items, &rng).await.unwrap();

        // Assert
        assert_eq!(update.is_success, Some(false));
        assert!(update.diffs.is_none());
        assert!(update.relations.is_none());
    }

    #[tokio::test]
    async fn test_success_without_a_priced_item_logs_only() {
        let entities = vec![
            entity("player-1", "Aria", EntityRole::Player, None),
            entity("rumor-1", "Odd Rumor", EntityRole::Item, None),
        ];
        let state = nego_state(entities, vec![]);
        let items = InMemoryItemCatalog::new(vec![]);
        let rng = dice(vec![4, 4]);

        let update = resolve(&state, &items, &rng).await.unwrap();

        assert_eq!(update.is_success, Some(true));
        assert!(update.diffs.is_none());
        assert!(update.logs.unwrap().iter().any(|l| l.contains("no catalog-priced item")));
    }

    #[tokio::test]
    async fn test_unpriced_records_are_skipped_for_the_next_priced_item() {
        // Arrange: the first item resolves without a price; the second has one.
        let entities = vec![
            entity("player-1", "Aria", EntityRole::Player, None),
            entity("map-1", "Torn Map", EntityRole::Item, Some(5)),
            entity("lamp-1", "Brass Lamp", EntityRole::Item, Some(6)),
        ];
        let state = nego_state(entities, vec![]);
        let items = InMemoryItemCatalog::new(vec![record(5, None), record(6, Some(50))]);
        let rng = dice(vec![4, 4]);

        // Act
        let update = resolve(&state, &items, &rng).await.unwrap();

        // Assert: 50 * 83 / 100 floors to 41.
        let diffs = update.diffs.unwrap();
        assert_eq!(diffs, vec![EntityDiff::single("player-1", "gold", -41)]);
        assert_eq!(update.relations.unwrap()[0].effect_entity_id, "lamp-1");
    }

    #[tokio::test]
    async fn test_affinity_toward_the_player_does_not_set_difficulty() {
        // Arrange: only relations held BY the player count for the bargain.
        let entities = vec![
            entity("player-1", "Aria", EntityRole::Player, None),
            entity("npc-1", "Merchant", EntityRole::Npc, None),
        ];
        let relations = vec![RelationUpdate {
            cause_entity_id: "npc-1".to_owned(),
            effect_entity_id: "player-1".to_owned(),
            kind: RelationKind::Hostile,
            affinity_delta: Some(-100),
            quantity: None,
        }];
        let state = nego_state(entities, relations);
        let items = InMemoryItemCatalog::new(vec![]);
        let rng = dice(vec![1, 1]);

        // Act: difficulty stays 0, total 5 succeeds.
        let update = resolve(&state, &items, &rng).await.unwrap();

        // Assert
        assert_eq!(update.is_success, Some(true));
    }

    #[tokio::test]
    async fn test_scene_quantity_carries_into_the_ownership_relation() {
        let mut lamp = entity("lamp-1", "Brass Lamp", EntityRole::Item, Some(5));
        lamp.quantity = Some(3);
        let entities = vec![entity("player-1", "Aria", EntityRole::Player, None), lamp];
        let state = nego_state(entities, vec![]);
        let items = InMemoryItemCatalog::new(vec![record(5, Some(100))]);
        let rng = dice(vec![4, 4]);

        let update = resolve(&state, &items, &rng).await.unwrap();

        assert_eq!(update.relations.unwrap()[0].quantity, Some(3));
    }

    #[tokio::test]
    async fn test_missing_player_degrades_with_a_log() {
        let entities = vec![entity("lamp-1", "Brass Lamp", EntityRole::Item, Some(5))];
        let state = nego_state(entities, vec![]);
        let items = InMemoryItemCatalog::new(vec![]);
        let rng = dice(vec![]);

        let update = resolve(&state, &items, &rng).await.unwrap();

        assert_eq!(update.is_success, Some(false));
        assert!(update.logs.unwrap().iter().any(|l| l.contains("no player")));
    }
}
