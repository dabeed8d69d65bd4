//! Invoice record - a billing record against a booking.
//!
//! Only `paid` and `unpaid` are persisted. Whether an invoice is overdue is
//! always derived from `unpaid` plus a past due date at read time; a legacy
//! `"overdue"` value in stored data is read back as `unpaid`.

use super::{Draft, EntityKind, Record};
use crate::core::store::Snapshot;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted payment state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Payment received
    Paid,
    /// Awaiting payment
    #[serde(alias = "overdue")]
    Unpaid,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
        })
    }
}

/// A billing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Unique identifier
    pub id: String,
    /// Booking being billed (may dangle)
    pub booking_id: String,
    /// Client being billed (may dangle)
    pub client_id: String,
    /// Amount billed
    pub amount: Decimal,
    /// Payment state
    pub status: InvoiceStatus,
    /// Payment deadline
    pub due_date: DateTime<Utc>,
    /// When the invoice was issued
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Short reference shown to users, e.g. `INV-3F2A9C`.
    #[must_use]
    pub fn reference(&self) -> String {
        let prefix: String = self.id.chars().take(6).collect();
        format!("INV-{}", prefix.to_uppercase())
    }
}

/// Input for adding an invoice.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    /// Booking being billed
    pub booking_id: String,
    /// Client being billed
    pub client_id: String,
    /// Amount billed
    pub amount: Decimal,
    /// Payment state
    pub status: InvoiceStatus,
    /// Payment deadline
    pub due_date: DateTime<Utc>,
}

impl Record for Invoice {
    const KIND: EntityKind = EntityKind::Invoice;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.invoices
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.invoices
    }

    fn keep_immutable_fields(&mut self, stored: &Self) {
        self.created_at = stored.created_at;
    }
}

impl Draft for NewInvoice {
    type Output = Invoice;

    fn into_record(self, id: String, now: DateTime<Utc>) -> Invoice {
        Invoice {
            id,
            booking_id: self.booking_id,
            client_id: self.client_id,
            amount: self.amount,
            status: self.status,
            due_date: self.due_date,
            created_at: now,
        }
    }
}
