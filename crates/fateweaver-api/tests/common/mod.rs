//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use fateweaver_api::routes;
use fateweaver_api::state::AppState;
use fateweaver_core::catalog::{EnemyRecord, ItemRecord, LocaleRecord};
use fateweaver_core::clock::Clock;
use fateweaver_core::interpreter::StoryInterpreter;
use fateweaver_core::player::{InventoryItem, PlayerDirectory, PlayerSnapshot};
use fateweaver_core::rng::DiceRng;
use fateweaver_engine::TurnEngine;
use fateweaver_test_support::{
    FailingInterpreter, FixedClock, InMemoryEnemyCatalog, InMemoryItemCatalog,
    InMemoryLocaleDirectory, MockDice, SequenceDice, StaticPlayerDirectory,
};

/// Fixed timestamp used across all integration tests.
pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Catalog fixture every scenario test runs against.
pub fn item_records() -> Vec<ItemRecord> {
    vec![
        ItemRecord {
            item_id: 3,
            name: "Lesser Healing Potion".to_string(),
            item_type: Some("consumable".to_string()),
            effect_value: Some(30),
            base_price: Some(40),
        },
        ItemRecord {
            item_id: 7,
            name: "Iron Sword".to_string(),
            item_type: Some("equipment".to_string()),
            effect_value: Some(4),
            base_price: Some(120),
        },
        ItemRecord {
            item_id: 21,
            name: "Silk Bundle".to_string(),
            item_type: None,
            effect_value: None,
            base_price: Some(100),
        },
    ]
}

pub fn enemy_records() -> Vec<EnemyRecord> {
    vec![
        EnemyRecord {
            enemy_id: 12,
            base_difficulty: Some(6),
        },
        EnemyRecord {
            enemy_id: 13,
            base_difficulty: None,
        },
    ]
}

pub fn locale_records() -> Vec<LocaleRecord> {
    vec![LocaleRecord {
        locale_id: 1,
        name: "Abandoned Mill".to_string(),
        description: Some("A sagging mill at the river bend.".to_string()),
    }]
}

/// Snapshot of a fighter holding an iron sword.
pub fn sword_fighter() -> PlayerSnapshot {
    PlayerSnapshot {
        hp: 100,
        gold: 120,
        perception: None,
        items: vec![InventoryItem {
            item_id: "7".to_string(),
            name: "Iron Sword".to_string(),
            item_type: Some("equipment".to_string()),
            meta: BTreeMap::new(),
        }],
        npc_relations: vec![],
    }
}

/// Snapshot of a wounded traveler holding one healing potion.
pub fn potion_carrier() -> PlayerSnapshot {
    PlayerSnapshot {
        hp: 40,
        gold: 15,
        perception: None,
        items: vec![InventoryItem {
            item_id: "3".to_string(),
            name: "Lesser Healing Potion".to_string(),
            item_type: Some("consumable".to_string()),
            meta: BTreeMap::new(),
        }],
        npc_relations: vec![],
    }
}

/// Snapshot with empty pockets.
pub fn bare_player() -> PlayerSnapshot {
    PlayerSnapshot {
        hp: 100,
        gold: 100,
        perception: None,
        items: vec![],
        npc_relations: vec![],
    }
}

fn build_app_with_rng(
    interpreter: Arc<dyn StoryInterpreter>,
    players: Arc<dyn PlayerDirectory>,
    rng: Arc<Mutex<dyn DiceRng + Send>>,
) -> Router {
    let engine = TurnEngine::new(
        interpreter,
        players,
        Arc::new(InMemoryItemCatalog::new(item_records())),
        Arc::new(InMemoryEnemyCatalog::new(enemy_records())),
        Arc::new(InMemoryLocaleDirectory::new(locale_records())),
        rng,
    );
    let app_state = AppState::new(engine, fixed_clock());

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/play", routes::play::router())
        .with_state(app_state)
}

/// Build the full app router over in-memory doubles, rolling the given die
/// faces in order. Uses the same route structure as `main.rs`.
pub fn build_test_app(
    interpreter: Arc<dyn StoryInterpreter>,
    players: Arc<dyn PlayerDirectory>,
    faces: Vec<u32>,
) -> Router {
    build_app_with_rng(
        interpreter,
        players,
        Arc::new(Mutex::new(SequenceDice::new(faces))),
    )
}

/// Build the app over inert doubles. Enough for health and routing tests.
pub fn build_default_app() -> Router {
    build_app_with_rng(
        Arc::new(FailingInterpreter),
        Arc::new(StaticPlayerDirectory::new()),
        Arc::new(Mutex::new(MockDice)),
    )
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
