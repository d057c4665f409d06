//! Player state snapshot and the player-state collaborator port.
//!
//! Player state is owned by an external service; the engine consults it
//! read-only and only ever proposes diffs for an external apply step.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One item in the player's inventory.
///
/// `item_id` is a string: numeric values reference a persisted catalog
/// record, anything else is a scenario-local item carrying its own
/// effect metadata in `meta`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_id: String,
    pub name: String,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, serde_json::Value>,
}

impl InventoryItem {
    /// The item's catalog id, when `item_id` is numeric.
    #[must_use]
    pub fn catalog_id(&self) -> Option<i64> {
        let raw = self.item_id.trim();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse().ok()
    }

    /// Reads an integer value from the embedded metadata.
    #[must_use]
    pub fn meta_i64(&self, key: &str) -> Option<i64> {
        match self.meta.get(key)? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// An NPC the player already knows, with its current disposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownNpc {
    pub npc_id: String,
    #[serde(default)]
    pub npc_name: Option<String>,
    pub affinity: i64,
}

/// Read-only snapshot of the player as held by the external state service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub hp: i64,
    pub gold: i64,
    #[serde(default)]
    pub perception: Option<i64>,
    #[serde(default)]
    pub items: Vec<InventoryItem>,
    #[serde(default)]
    pub npc_relations: Vec<KnownNpc>,
}

/// Port to the external player-state service.
#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    /// Fetches the player's current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PlayerNotFound`] when the service does not know
    /// the id and [`EngineError::Collaborator`] on transport failure.
    async fn fetch_player(&self, player_id: &str) -> Result<PlayerSnapshot, EngineError>;
}
