//! Durable backing store on `SQLite` via `SeaORM`.
//!
//! Every key is one row of the `kv_store` table. A write is a single
//! `INSERT ... ON CONFLICT DO UPDATE` statement, so `SQLite` either applies the
//! whole new value or leaves the old one in place.

use super::BackingStore;
use crate::{
    config::database,
    entities::{KvEntry, kv_entry},
    errors::Result,
};
use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};
use tracing::{debug, instrument};

/// A [`BackingStore`] persisting each value as a row in `SQLite`.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Wraps an existing connection. The `kv_store` table must already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects to `database_url` and ensures the `kv_store` table exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let db = database::create_connection(database_url).await?;
        database::create_tables(&db).await?;
        Ok(Self::new(db))
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl BackingStore for SqliteStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entry = KvEntry::find_by_id(key.to_string()).one(&self.db).await?;
        debug!("Loaded '{}' (present: {})", key, entry.is_some());
        Ok(entry.map(|e| e.value))
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let entry = kv_entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(chrono::Utc::now()),
        };

        KvEntry::insert(entry)
            .on_conflict(
                OnConflict::column(kv_entry::Column::Key)
                    .update_columns([kv_entry::Column::Value, kv_entry::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        debug!("Stored '{}'", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::KvEntry;
    use sea_orm::PaginatorTrait;

    async fn memory_store() -> Result<SqliteStore> {
        SqliteStore::connect("sqlite::memory:").await
    }

    #[tokio::test]
    async fn test_get_unwritten_key_returns_none() -> Result<()> {
        let store = memory_store().await?;
        assert!(store.get("@tourops_bookings").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_set_then_get() -> Result<()> {
        let store = memory_store().await?;
        store.set("@tourops_clients", b"[]".to_vec()).await?;

        assert_eq!(store.get("@tourops_clients").await?, Some(b"[]".to_vec()));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_overwrites_single_row() -> Result<()> {
        let store = memory_store().await?;
        store.set("@tourops_tasks", b"[1]".to_vec()).await?;
        store.set("@tourops_tasks", b"[1,2]".to_vec()).await?;

        assert_eq!(store.get("@tourops_tasks").await?, Some(b"[1,2]".to_vec()));
        let rows = KvEntry::find().count(store.connection()).await?;
        assert_eq!(rows, 1);
        Ok(())
    }
}
