//! HTTP client for the external player-state service.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use fateweaver_core::error::EngineError;
use fateweaver_core::player::{InventoryItem, KnownNpc, PlayerDirectory, PlayerSnapshot};

/// Default state-manager base URL.
pub const DEFAULT_STATE_MANAGER_BASE_URL: &str = "http://localhost:8100";

/// Client for the state-manager microservice.
///
/// The service wraps every success response in a
/// `{status, data, message}` envelope; this client unwraps it and maps
/// the payload into the engine's [`PlayerSnapshot`].
#[derive(Clone)]
pub struct StateManagerClient {
    client: Client,
    base_url: String,
}

impl StateManagerClient {
    /// Creates a client against the given base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PlayerDirectory for StateManagerClient {
    async fn fetch_player(&self, player_id: &str) -> Result<PlayerSnapshot, EngineError> {
        let url = format!("{}/state/player/{player_id}", self.base_url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            EngineError::Collaborator(format!("state-manager request failed: {e}"))
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(EngineError::PlayerNotFound(player_id.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Collaborator(format!(
                "state-manager answered {status}: {body}"
            )));
        }

        let envelope: Envelope = response.json().await.map_err(|e| {
            EngineError::Collaborator(format!("state-manager sent invalid JSON: {e}"))
        })?;

        if envelope.status.as_deref().is_some_and(|s| s != "success") {
            return Err(EngineError::Collaborator(format!(
                "state-manager reported '{}': {}",
                envelope.status.unwrap_or_default(),
                envelope.message.unwrap_or_default()
            )));
        }

        let payload = envelope.data.ok_or_else(|| {
            EngineError::Collaborator("state-manager response carried no data".to_string())
        })?;

        let snapshot = PlayerSnapshot::from(payload);
        debug!(
            player_id,
            items = snapshot.items.len(),
            relations = snapshot.npc_relations.len(),
            "player snapshot fetched"
        );

        Ok(snapshot)
    }
}

// --- wire types ---

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Option<PlayerStatePayload>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlayerStatePayload {
    player: PlayerBody,
    #[serde(default)]
    player_npc_relations: Vec<NpcRelationBody>,
}

#[derive(Debug, Deserialize)]
struct PlayerBody {
    hp: i64,
    gold: i64,
    #[serde(default)]
    perception: Option<i64>,
    #[serde(default)]
    items: Vec<ItemBody>,
}

#[derive(Debug, Deserialize)]
struct ItemBody {
    item_id: String,
    name: String,
    #[serde(default)]
    item_type: Option<String>,
    #[serde(default)]
    meta: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct NpcRelationBody {
    npc_id: String,
    #[serde(default)]
    npc_name: Option<String>,
    affinity_score: i64,
}

impl From<PlayerStatePayload> for PlayerSnapshot {
    fn from(payload: PlayerStatePayload) -> Self {
        Self {
            hp: payload.player.hp,
            gold: payload.player.gold,
            perception: payload.player.perception,
            items: payload.player.items.into_iter().map(Into::into).collect(),
            npc_relations: payload
                .player_npc_relations
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

impl From<ItemBody> for InventoryItem {
    fn from(body: ItemBody) -> Self {
        Self {
            item_id: body.item_id,
            name: body.name,
            item_type: body.item_type,
            meta: body.meta,
        }
    }
}

impl From<NpcRelationBody> for KnownNpc {
    fn from(body: NpcRelationBody) -> Self {
        Self {
            npc_id: body.npc_id,
            npc_name: body.npc_name,
            affinity: body.affinity_score,
        }
    }
}
