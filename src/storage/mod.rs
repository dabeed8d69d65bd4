//! Backing store adapter and the repositories built on it.
//!
//! The backing store is an opaque async key-value byte store. Any durable
//! mechanism that can `get` and `set` a whole value by key satisfies it;
//! [`SqliteStore`] is the durable implementation and [`MemoryStore`] keeps
//! everything in process.

pub mod memory;
pub mod repository;
pub mod sqlite;

pub use memory::MemoryStore;
pub use repository::Repository;
pub use sqlite::SqliteStore;

use crate::errors::Result;
use async_trait::async_trait;

/// Opaque key-value persistence used by the repositories.
///
/// `set` must replace the previous value atomically: a reader never observes a
/// partially written value, and a failed `set` leaves the previous value intact.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;
}
