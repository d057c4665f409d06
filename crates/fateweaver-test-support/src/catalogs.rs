//! Test catalogs — in-memory implementations of the catalog ports.

use async_trait::async_trait;
use fateweaver_core::catalog::{
    EnemyCatalog, EnemyRecord, ItemCatalog, ItemRecord, LocaleDirectory, LocaleRecord,
};
use fateweaver_core::error::EngineError;

/// An item catalog backed by a fixed record list.
#[derive(Debug, Default)]
pub struct InMemoryItemCatalog {
    records: Vec<ItemRecord>,
}

impl InMemoryItemCatalog {
    #[must_use]
    pub fn new(records: Vec<ItemRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ItemCatalog for InMemoryItemCatalog {
    async fn items_by_ids(&self, ids: &[i64]) -> Result<Vec<ItemRecord>, EngineError> {
        Ok(self
            .records
            .iter()
            .filter(|r| ids.contains(&r.item_id))
            .cloned()
            .collect())
    }
}

/// An enemy catalog backed by a fixed record list.
#[derive(Debug, Default)]
pub struct InMemoryEnemyCatalog {
    records: Vec<EnemyRecord>,
}

impl InMemoryEnemyCatalog {
    #[must_use]
    pub fn new(records: Vec<EnemyRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl EnemyCatalog for InMemoryEnemyCatalog {
    async fn enemies_by_ids(&self, ids: &[i64]) -> Result<Vec<EnemyRecord>, EngineError> {
        Ok(self
            .records
            .iter()
            .filter(|r| ids.contains(&r.enemy_id))
            .cloned()
            .collect())
    }
}

/// A locale directory backed by a fixed record list.
#[derive(Debug, Default)]
pub struct InMemoryLocaleDirectory {
    records: Vec<LocaleRecord>,
}

impl InMemoryLocaleDirectory {
    #[must_use]
    pub fn new(records: Vec<LocaleRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl LocaleDirectory for InMemoryLocaleDirectory {
    async fn locale_by_id(&self, locale_id: i64) -> Result<Option<LocaleRecord>, EngineError> {
        Ok(self
            .records
            .iter()
            .find(|r| r.locale_id == locale_id)
            .cloned())
    }
}
