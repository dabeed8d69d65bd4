//! One repository per entity kind, each owning a single backing-store key.
//!
//! A repository reads and writes its whole collection as one JSON array. There
//! are no partial or delta writes: `save` always replaces the full value.

use super::BackingStore;
use crate::{
    errors::{Error, Result},
    models::Record,
};
use std::{marker::PhantomData, sync::Arc};
use tracing::{debug, error, instrument};

/// Loads and saves the complete collection of one record type.
pub struct Repository<R> {
    backing: Arc<dyn BackingStore>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            backing: Arc::clone(&self.backing),
            _record: PhantomData,
        }
    }
}

impl<R: Record> Repository<R> {
    /// Creates a repository over `backing`.
    #[must_use]
    pub fn new(backing: Arc<dyn BackingStore>) -> Self {
        Self {
            backing,
            _record: PhantomData,
        }
    }

    /// The backing-store key this repository owns.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        R::KIND.storage_key()
    }

    /// Reads the full collection.
    ///
    /// A key that was never written yields an empty collection. A backing-store
    /// failure or a payload that does not parse is reported as
    /// [`Error::StorageRead`]; corrupt data is never silently treated as empty.
    #[instrument(skip(self), fields(key = self.key()))]
    pub async fn get_all(&self) -> Result<Vec<R>> {
        let key = self.key();
        let Some(bytes) = self.backing.get(key).await.map_err(|e| Error::StorageRead {
            key: key.to_string(),
            message: e.to_string(),
        })?
        else {
            debug!("No stored collection, starting empty");
            return Ok(Vec::new());
        };

        let items: Vec<R> = serde_json::from_slice(&bytes).map_err(|e| {
            error!("Stored collection is corrupt: {}", e);
            Error::StorageRead {
                key: key.to_string(),
                message: format!("corrupt payload: {e}"),
            }
        })?;

        debug!("Loaded {} {} records", items.len(), R::KIND);
        Ok(items)
    }

    /// Replaces the stored collection with `items`.
    #[instrument(skip(self, items), fields(key = self.key(), count = items.len()))]
    pub async fn save(&self, items: &[R]) -> Result<()> {
        let key = self.key();
        let bytes = serde_json::to_vec(items).map_err(|e| Error::StorageWrite {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        self.backing
            .set(key, bytes)
            .await
            .map_err(|e| Error::StorageWrite {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        debug!("Saved {} {} records", items.len(), R::KIND);
        Ok(())
    }
}
