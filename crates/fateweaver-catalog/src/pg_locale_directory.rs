//! `PostgreSQL` implementation of the `LocaleDirectory` trait.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use fateweaver_core::catalog::{LocaleDirectory, LocaleRecord};
use fateweaver_core::error::EngineError;

/// Row shape of the `locales` table.
#[derive(Debug, FromRow)]
struct LocaleRow {
    locale_id: i64,
    name: String,
    description: Option<String>,
}

impl From<LocaleRow> for LocaleRecord {
    fn from(row: LocaleRow) -> Self {
        Self {
            locale_id: row.locale_id,
            name: row.name,
            description: row.description,
        }
    }
}

/// PostgreSQL-backed locale directory.
#[derive(Debug, Clone)]
pub struct PgLocaleDirectory {
    pool: PgPool,
}

impl PgLocaleDirectory {
    /// Creates a new `PgLocaleDirectory`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocaleDirectory for PgLocaleDirectory {
    async fn locale_by_id(&self, locale_id: i64) -> Result<Option<LocaleRecord>, EngineError> {
        let row: Option<LocaleRow> = sqlx::query_as(
            "SELECT locale_id, name, description
             FROM locales
             WHERE locale_id = $1",
        )
        .bind(locale_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EngineError::Collaborator(format!("locale query failed: {e}")))?;

        debug!(locale_id, found = row.is_some(), "locale lookup");

        Ok(row.map(LocaleRecord::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_row_maps_all_columns() {
        let row = LocaleRow {
            locale_id: 77,
            name: "Abandoned Mine".to_string(),
            description: Some("A collapsed shaft, long since stripped.".to_string()),
        };

        let record = LocaleRecord::from(row);

        assert_eq!(record.locale_id, 77);
        assert_eq!(record.name, "Abandoned Mine");
        assert_eq!(
            record.description.as_deref(),
            Some("A collapsed shaft, long since stripped.")
        );
    }

    #[test]
    fn test_locale_row_keeps_missing_description_as_none() {
        let row = LocaleRow {
            locale_id: 5,
            name: "Crossroads".to_string(),
            description: None,
        };

        let record = LocaleRecord::from(row);

        assert!(record.description.is_none());
    }
}
