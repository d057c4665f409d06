//! `PostgreSQL` adapters for the catalog ports — items, enemies, and locales.

pub mod pg_enemy_catalog;
pub mod pg_item_catalog;
pub mod pg_locale_directory;

pub use pg_enemy_catalog::PgEnemyCatalog;
pub use pg_item_catalog::PgItemCatalog;
pub use pg_locale_directory::PgLocaleDirectory;
