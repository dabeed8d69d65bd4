//! Pricing worksheet - a standalone cost and markup calculation.

use super::{Draft, EntityKind, Record};
use crate::core::store::Snapshot;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of cost on a worksheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostItem {
    /// Unique identifier
    pub id: String,
    /// Cost category, e.g. "hotel"
    pub category: String,
    /// What the cost is for
    #[serde(default)]
    pub description: String,
    /// Cost of one unit
    pub unit_cost: Decimal,
    /// Number of units
    pub quantity: u32,
}

impl CostItem {
    /// `unit_cost * quantity`
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_cost * Decimal::from(self.quantity)
    }
}

/// Input for adding a cost line.
#[derive(Debug, Clone)]
pub struct NewCostItem {
    /// Cost category
    pub category: String,
    /// What the cost is for
    pub description: String,
    /// Cost of one unit
    pub unit_cost: Decimal,
    /// Number of units
    pub quantity: u32,
}

/// A pricing calculation for a prospective or existing trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingWorksheet {
    /// Unique identifier
    pub id: String,
    /// Trip name
    pub trip_name: String,
    /// Destination
    pub destination: String,
    /// Number of travellers the cost is spread over
    pub pax: u32,
    /// Cost lines
    #[serde(default)]
    pub cost_items: Vec<CostItem>,
    /// Markup applied on cost, in percent
    pub markup_percent: Decimal,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// When the worksheet was created
    pub created_at: DateTime<Utc>,
}

/// Input for adding a worksheet.
#[derive(Debug, Clone)]
pub struct NewPricingWorksheet {
    /// Trip name
    pub trip_name: String,
    /// Destination
    pub destination: String,
    /// Number of travellers
    pub pax: u32,
    /// Cost lines
    pub cost_items: Vec<CostItem>,
    /// Markup in percent
    pub markup_percent: Decimal,
    /// Free-form notes
    pub notes: String,
}

impl Record for PricingWorksheet {
    const KIND: EntityKind = EntityKind::PricingWorksheet;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.pricing_worksheets
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.pricing_worksheets
    }

    fn keep_immutable_fields(&mut self, stored: &Self) {
        self.created_at = stored.created_at;
    }
}

impl Draft for NewPricingWorksheet {
    type Output = PricingWorksheet;

    fn into_record(self, id: String, now: DateTime<Utc>) -> PricingWorksheet {
        PricingWorksheet {
            id,
            trip_name: self.trip_name,
            destination: self.destination,
            pax: self.pax,
            cost_items: self.cost_items,
            markup_percent: self.markup_percent,
            notes: self.notes,
            created_at: now,
        }
    }
}
