//! Client record - the customers bookings and invoices are issued to.

use super::{Draft, EntityKind, Record};
use crate::core::store::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer of the tour operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Unique identifier
    pub id: String,
    /// Full name
    pub name: String,
    /// Contact email
    #[serde(default)]
    pub email: String,
    /// Contact phone
    #[serde(default)]
    pub phone: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// When the client was added
    pub created_at: DateTime<Utc>,
}

/// Input for adding a client.
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Free-form notes
    pub notes: String,
}

impl Record for Client {
    const KIND: EntityKind = EntityKind::Client;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.clients
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.clients
    }

    fn keep_immutable_fields(&mut self, stored: &Self) {
        self.created_at = stored.created_at;
    }
}

impl Draft for NewClient {
    type Output = Client;

    fn into_record(self, id: String, now: DateTime<Utc>) -> Client {
        Client {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            notes: self.notes,
            created_at: now,
        }
    }
}
