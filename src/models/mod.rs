//! Domain records persisted by the data core.
//!
//! Each entity kind lives in its own module with the record type, the input
//! used to create it (its [`Draft`]), and any enums it owns. Records serialize
//! with camelCase field names so the stored JSON stays stable across versions.

pub mod booking;
pub mod budget;
pub mod client;
pub mod expense;
pub mod hotel;
pub mod invoice;
pub mod itinerary;
pub mod pricing;
pub mod task;
pub mod vendor;

pub use booking::{Booking, BookingStatus, NewBooking};
pub use budget::{BudgetItem, NewBudgetItem};
pub use client::{Client, NewClient};
pub use expense::{Expense, NewExpense};
pub use hotel::{HotelRoom, NewHotelRoom, NewRoomAllocation, RoomAllocation};
pub use invoice::{Invoice, InvoiceStatus, NewInvoice};
pub use itinerary::{
    ActivityType, Itinerary, ItineraryActivity, ItineraryDay, NewActivity, NewItinerary,
};
pub use pricing::{CostItem, NewCostItem, NewPricingWorksheet, PricingWorksheet};
pub use task::{NewTask, Task, TaskCategory, TaskStatus};
pub use vendor::{NewVendor, Vendor, VendorType};

use crate::core::store::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The ten entity kinds, each persisted as one collection under its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Customers
    Client,
    /// Sold trips
    Booking,
    /// Money spent, optionally against a booking
    Expense,
    /// Billing records
    Invoice,
    /// Hotels, transport companies, guides
    Vendor,
    /// Rooms with their guest allocations
    HotelRoom,
    /// Operational to-dos
    Task,
    /// Day-by-day trip plans
    Itinerary,
    /// Cost and markup calculations
    PricingWorksheet,
    /// Planned spending per booking
    BudgetItem,
}

impl EntityKind {
    /// Every kind, in load order.
    pub const ALL: [Self; 10] = [
        Self::Client,
        Self::Booking,
        Self::Expense,
        Self::Invoice,
        Self::Vendor,
        Self::HotelRoom,
        Self::Task,
        Self::Itinerary,
        Self::PricingWorksheet,
        Self::BudgetItem,
    ];

    /// Backing-store key for this kind's collection. These must never change.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Client => "@tourops_clients",
            Self::Booking => "@tourops_bookings",
            Self::Expense => "@tourops_expenses",
            Self::Invoice => "@tourops_invoices",
            Self::Vendor => "@tourops_vendors",
            Self::HotelRoom => "@tourops_hotel_rooms",
            Self::Task => "@tourops_tasks",
            Self::Itinerary => "@tourops_itineraries",
            Self::PricingWorksheet => "@tourops_pricing_worksheets",
            Self::BudgetItem => "@tourops_budget_items",
        }
    }

    /// Human-readable singular name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Booking => "booking",
            Self::Expense => "expense",
            Self::Invoice => "invoice",
            Self::Vendor => "vendor",
            Self::HotelRoom => "hotel room",
            Self::Task => "task",
            Self::Itinerary => "itinerary",
            Self::PricingWorksheet => "pricing worksheet",
            Self::BudgetItem => "budget item",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A persisted record with a stable string id.
///
/// Ties the record type to its collection inside the store [`Snapshot`], so the
/// store can offer one generic `add`/`update`/`remove` surface for all kinds.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Which collection this record belongs to
    const KIND: EntityKind;

    /// The record's unique id
    fn id(&self) -> &str;

    /// The record's collection in a snapshot
    fn collection(snapshot: &Snapshot) -> &Vec<Self>;

    /// Mutable access to the record's collection in a snapshot
    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self>;

    /// Copies fields that must never change after creation (such as
    /// `createdAt`) from the stored version onto an incoming replacement.
    fn keep_immutable_fields(&mut self, _stored: &Self) {}

    /// Restores derived invariants before the record is stored.
    fn normalize(&mut self) {}
}

/// Creation input for a record: everything except the id and creation stamp.
pub trait Draft: Send {
    /// The record produced by this draft
    type Output: Record;

    /// Builds the record with a freshly generated id. `now` is used for kinds
    /// that carry `createdAt` and ignored otherwise.
    fn into_record(self, id: String, now: DateTime<Utc>) -> Self::Output;
}

/// Generates a new globally unique record id.
#[must_use]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Reads an optional value where a missing field, `null`, or a blank string
/// all mean "unset". Used for optional foreign keys and loose dates.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_storage_keys_are_distinct() {
        let keys: HashSet<&str> = EntityKind::ALL.iter().map(|k| k.storage_key()).collect();
        assert_eq!(keys.len(), EntityKind::ALL.len());
    }

    #[test]
    fn test_storage_keys_are_stable() {
        assert_eq!(EntityKind::Client.storage_key(), "@tourops_clients");
        assert_eq!(EntityKind::HotelRoom.storage_key(), "@tourops_hotel_rooms");
        assert_eq!(
            EntityKind::PricingWorksheet.storage_key(),
            "@tourops_pricing_worksheets"
        );
    }

    #[test]
    fn test_new_id_is_unique() {
        let ids: HashSet<String> = (0..100).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 100);
    }
}
