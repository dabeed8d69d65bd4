//! Budget item - planned spending for one category of a booking.

use super::{Draft, EntityKind, Record};
use crate::core::store::Snapshot;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A planned spending allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    /// Unique identifier
    pub id: String,
    /// Booking the budget is for (may dangle)
    pub booking_id: String,
    /// Spending category
    pub category: String,
    /// Planned amount
    pub budget_amount: Decimal,
    /// Manually tracked actual amount. Variance reports use the booking's
    /// expenses instead.
    #[serde(default)]
    pub actual_amount: Decimal,
}

/// Input for adding a budget item.
#[derive(Debug, Clone)]
pub struct NewBudgetItem {
    /// Booking the budget is for
    pub booking_id: String,
    /// Spending category
    pub category: String,
    /// Planned amount
    pub budget_amount: Decimal,
    /// Manually tracked actual amount
    pub actual_amount: Decimal,
}

impl Record for BudgetItem {
    const KIND: EntityKind = EntityKind::BudgetItem;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.budget_items
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.budget_items
    }
}

impl Draft for NewBudgetItem {
    type Output = BudgetItem;

    fn into_record(self, id: String, _now: DateTime<Utc>) -> BudgetItem {
        BudgetItem {
            id,
            booking_id: self.booking_id,
            category: self.category,
            budget_amount: self.budget_amount,
            actual_amount: self.actual_amount,
        }
    }
}
