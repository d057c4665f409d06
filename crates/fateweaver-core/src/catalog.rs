//! Catalog records and lookup ports for items, enemies, and locales.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A persisted item record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub item_id: i64,
    pub name: String,
    pub item_type: Option<String>,
    pub effect_value: Option<i64>,
    pub base_price: Option<i64>,
}

/// A persisted enemy record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyRecord {
    pub enemy_id: i64,
    pub base_difficulty: Option<i64>,
}

/// A persisted locale record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleRecord {
    pub locale_id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Port to the item catalog.
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// Fetches the records for the given catalog ids. Unknown ids are
    /// silently absent from the result.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Collaborator`] on transport failure.
    async fn items_by_ids(&self, ids: &[i64]) -> Result<Vec<ItemRecord>, EngineError>;
}

/// Port to the enemy catalog.
#[async_trait]
pub trait EnemyCatalog: Send + Sync {
    /// Fetches the records for the given catalog ids. Unknown ids are
    /// silently absent from the result.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Collaborator`] on transport failure.
    async fn enemies_by_ids(&self, ids: &[i64]) -> Result<Vec<EnemyRecord>, EngineError>;
}

/// Port to the locale directory.
#[async_trait]
pub trait LocaleDirectory: Send + Sync {
    /// Fetches one locale, or `None` when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Collaborator`] on transport failure.
    async fn locale_by_id(&self, locale_id: i64) -> Result<Option<LocaleRecord>, EngineError>;
}
