//! Booking record - a trip sold to a client.
//!
//! A booking belongs to one client and is referenced by expenses, invoices,
//! tasks, itineraries and budget items. `paid_amount` moves when a linked
//! invoice is marked paid or unpaid.

use super::{Draft, EntityKind, Record};
use crate::core::store::Snapshot;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Trip is confirmed
    Confirmed,
    /// Awaiting confirmation (the state new bookings start in)
    Pending,
    /// Trip was cancelled; excluded from active aggregates
    Cancelled,
}

impl BookingStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 3] = [Self::Confirmed, Self::Pending, Self::Cancelled];

    /// Whether bookings in this state count as active.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Confirmed => "confirmed",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        })
    }
}

/// A sold trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique identifier
    pub id: String,
    /// Owning client (may dangle if the client was deleted)
    pub client_id: String,
    /// Trip name
    pub trip_name: String,
    /// Destination
    pub destination: String,
    /// First day of the trip
    pub start_date: DateTime<Utc>,
    /// Last day of the trip
    pub end_date: DateTime<Utc>,
    /// Number of travellers
    pub pax: u32,
    /// Lifecycle state
    pub status: BookingStatus,
    /// Total sale amount
    pub total_amount: Decimal,
    /// Amount received so far
    pub paid_amount: Decimal,
    /// Special requirements
    #[serde(default)]
    pub requirements: String,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Amount still owed on the booking.
    #[must_use]
    pub fn balance_due(&self) -> Decimal {
        self.total_amount - self.paid_amount
    }
}

/// Input for adding a booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Owning client
    pub client_id: String,
    /// Trip name
    pub trip_name: String,
    /// Destination
    pub destination: String,
    /// First day of the trip
    pub start_date: DateTime<Utc>,
    /// Last day of the trip
    pub end_date: DateTime<Utc>,
    /// Number of travellers
    pub pax: u32,
    /// Lifecycle state
    pub status: BookingStatus,
    /// Total sale amount
    pub total_amount: Decimal,
    /// Amount received so far
    pub paid_amount: Decimal,
    /// Special requirements
    pub requirements: String,
}

impl Record for Booking {
    const KIND: EntityKind = EntityKind::Booking;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.bookings
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.bookings
    }

    fn keep_immutable_fields(&mut self, stored: &Self) {
        self.created_at = stored.created_at;
    }
}

impl Draft for NewBooking {
    type Output = Booking;

    fn into_record(self, id: String, now: DateTime<Utc>) -> Booking {
        Booking {
            id,
            client_id: self.client_id,
            trip_name: self.trip_name,
            destination: self.destination,
            start_date: self.start_date,
            end_date: self.end_date,
            pax: self.pax,
            status: self.status,
            total_amount: self.total_amount,
            paid_amount: self.paid_amount,
            requirements: self.requirements,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BookingStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }

    #[test]
    fn test_reads_legacy_numeric_amounts() {
        let json = r#"{
            "id": "b1",
            "clientId": "c1",
            "tripName": "Bali Escape",
            "destination": "Bali",
            "startDate": "2025-03-01T00:00:00.000Z",
            "endDate": "2025-03-08T00:00:00.000Z",
            "pax": 2,
            "status": "pending",
            "totalAmount": 2500.5,
            "paidAmount": 0,
            "requirements": "",
            "createdAt": "2025-01-10T09:30:00.000Z"
        }"#;

        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.total_amount, dec!(2500.5));
        assert_eq!(booking.paid_amount, dec!(0));
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.balance_due(), dec!(2500.5));
    }
}
