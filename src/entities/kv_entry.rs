//! Key-value entry entity - one row per persisted collection.
//!
//! The backing store is an opaque byte store keyed by collection name. Each row
//! holds the full serialized collection for one entity kind and is replaced in
//! a single statement on every write.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key-value database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kv_store")]
pub struct Model {
    /// Storage key (e.g. `"@tourops_bookings"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Serialized payload
    pub value: Vec<u8>,
    /// When this entry was last written
    pub updated_at: DateTimeUtc,
}

/// `KvEntry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
