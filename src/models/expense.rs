//! Expense record - money spent, usually against a booking.

use super::{Draft, EntityKind, Record, blank_as_none};
use crate::core::store::Snapshot;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Unique identifier
    pub id: String,
    /// Booking the expense was incurred for, if any
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub booking_id: Option<String>,
    /// Open-ended category (e.g. "hotel", "transport")
    pub category: String,
    /// What was paid for
    #[serde(default)]
    pub description: String,
    /// Amount spent
    pub amount: Decimal,
    /// When the expense occurred
    pub date: DateTime<Utc>,
}

/// Input for adding an expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Booking the expense was incurred for, if any
    pub booking_id: Option<String>,
    /// Open-ended category
    pub category: String,
    /// What was paid for
    pub description: String,
    /// Amount spent
    pub amount: Decimal,
    /// When the expense occurred
    pub date: DateTime<Utc>,
}

impl Record for Expense {
    const KIND: EntityKind = EntityKind::Expense;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.expenses
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.expenses
    }
}

impl Draft for NewExpense {
    type Output = Expense;

    fn into_record(self, id: String, _now: DateTime<Utc>) -> Expense {
        Expense {
            id,
            booking_id: self.booking_id,
            category: self.category,
            description: self.description,
            amount: self.amount,
            date: self.date,
        }
    }
}
