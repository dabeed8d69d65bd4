//! Entity module - Contains the SeaORM entity definitions for the database.
//! The data core keeps every collection as a single row in a key-value table,
//! so there is one entity here rather than one per domain record.

pub mod kv_entry;

pub use kv_entry::{Column as KvEntryColumn, Entity as KvEntry, Model as KvEntryModel};
