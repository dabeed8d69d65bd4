//! Unified error types and result handling for the data core.

use crate::models::{EntityKind, TaskStatus};
use thiserror::Error;

/// Every failure the data core can surface to its callers.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The SQLite backing store reported an error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A collection could not be read, or its payload is corrupt
    #[error("Failed to read '{key}' from storage: {message}")]
    StorageRead {
        /// Storage key of the collection
        key: String,
        /// Underlying cause
        message: String,
    },

    /// A collection could not be written; the previous value is intact
    #[error("Failed to write '{key}' to storage: {message}")]
    StorageWrite {
        /// Storage key of the collection
        key: String,
        /// Underlying cause
        message: String,
    },

    /// No record with this id exists in the target collection
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Entity kind that was searched
        kind: EntityKind,
        /// Id that was not found
        id: String,
    },

    /// A task was asked to skip a column on the board
    #[error("Cannot move task from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: TaskStatus,
        /// Requested status
        to: TaskStatus,
    },

    /// The store has not completed a successful reload, so its snapshot
    /// cannot be written back without overwriting unread data
    #[error("Store has not been loaded from storage")]
    NotLoaded,
}

impl Error {
    /// Shorthand for a [`Error::NotFound`] on the given kind.
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
