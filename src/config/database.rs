//! Database configuration module for `TourOps`.
//!
//! This module handles the `SQLite` connection and creates the `kv_store` table
//! using `SeaORM`'s `Schema::create_table_from_entity`, so the schema always
//! matches the entity definition without hand-written SQL.

use crate::entities::KvEntry;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::debug;

/// Database used when `DATABASE_URL` is not set. `mode=rwc` creates the file
/// on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/tourops.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, then
/// from `configured`, then the default local `SQLite` file.
#[must_use]
pub fn get_database_url(configured: Option<&str>) -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the `kv_store` table if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut kv_table = schema.create_table_from_entity(KvEntry);
    kv_table.if_not_exists();

    db.execute(builder.build(&kv_table)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::KvEntryModel;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _: Vec<KvEntryModel> = KvEntry::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_configured_url_used_without_env() {
        if std::env::var("DATABASE_URL").is_ok() {
            return;
        }
        assert_eq!(
            get_database_url(Some("sqlite://custom.sqlite")),
            "sqlite://custom.sqlite"
        );
        assert_eq!(get_database_url(None), DEFAULT_DATABASE_URL);
    }
}
