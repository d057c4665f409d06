//! `PostgreSQL` implementation of the `ItemCatalog` trait.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use fateweaver_core::catalog::{ItemCatalog, ItemRecord};
use fateweaver_core::error::EngineError;

/// Row shape of the `items` table.
#[derive(Debug, FromRow)]
struct ItemRow {
    item_id: i64,
    name: String,
    item_type: Option<String>,
    effect_value: Option<i64>,
    base_price: Option<i64>,
}

impl From<ItemRow> for ItemRecord {
    fn from(row: ItemRow) -> Self {
        Self {
            item_id: row.item_id,
            name: row.name,
            item_type: row.item_type,
            effect_value: row.effect_value,
            base_price: row.base_price,
        }
    }
}

/// PostgreSQL-backed item catalog.
#[derive(Debug, Clone)]
pub struct PgItemCatalog {
    pool: PgPool,
}

impl PgItemCatalog {
    /// Creates a new `PgItemCatalog`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemCatalog for PgItemCatalog {
    async fn items_by_ids(&self, ids: &[i64]) -> Result<Vec<ItemRecord>, EngineError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT item_id, name, item_type, effect_value, base_price
             FROM items
             WHERE item_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EngineError::Collaborator(format!("item catalog query failed: {e}")))?;

        debug!(requested = ids.len(), found = rows.len(), "item catalog lookup");

        Ok(rows.into_iter().map(ItemRecord::from).collect())
    }
}
