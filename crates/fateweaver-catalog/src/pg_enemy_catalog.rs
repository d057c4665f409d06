//! `PostgreSQL` implementation of the `EnemyCatalog` trait.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use fateweaver_core::catalog::{EnemyCatalog, EnemyRecord};
use fateweaver_core::error::EngineError;

/// Row shape of the `enemies` table.
#[derive(Debug, FromRow)]
struct EnemyRow {
    enemy_id: i64,
    base_difficulty: Option<i64>,
}

impl From<EnemyRow> for EnemyRecord {
    fn from(row: EnemyRow) -> Self {
        Self {
            enemy_id: row.enemy_id,
            base_difficulty: row.base_difficulty,
        }
    }
}

/// PostgreSQL-backed enemy catalog.
#[derive(Debug, Clone)]
pub struct PgEnemyCatalog {
    pool: PgPool,
}

impl PgEnemyCatalog {
    /// Creates a new `PgEnemyCatalog`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnemyCatalog for PgEnemyCatalog {
    async fn enemies_by_ids(&self, ids: &[i64]) -> Result<Vec<EnemyRecord>, EngineError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<EnemyRow> = sqlx::query_as(
            "SELECT enemy_id, base_difficulty
             FROM enemies
             WHERE enemy_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EngineError::Collaborator(format!("enemy catalog query failed: {e}")))?;

        debug!(requested = ids.len(), found = rows.len(), "enemy catalog lookup");

        Ok(rows.into_iter().map(EnemyRecord::from).collect())
    }
}
