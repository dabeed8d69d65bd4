//! Hotel room record with its embedded guest allocations.

use super::{Draft, EntityKind, Record};
use crate::core::store::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A guest placed in a room for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAllocation {
    /// Unique identifier
    pub id: String,
    /// Room this allocation is embedded in
    pub room_id: String,
    /// Booking the guest travels on
    pub booking_id: String,
    /// Guest name
    pub guest_name: String,
    /// Arrival
    pub check_in: DateTime<Utc>,
    /// Departure
    pub check_out: DateTime<Utc>,
}

/// Input for allocating a guest to a room.
#[derive(Debug, Clone)]
pub struct NewRoomAllocation {
    /// Booking the guest travels on
    pub booking_id: String,
    /// Guest name
    pub guest_name: String,
    /// Arrival
    pub check_in: DateTime<Utc>,
    /// Departure
    pub check_out: DateTime<Utc>,
}

/// A room at a hotel vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelRoom {
    /// Unique identifier
    pub id: String,
    /// Hotel vendor owning the room (may dangle)
    pub vendor_id: String,
    /// Room number or label
    pub room_number: String,
    /// Room type, e.g. "double"
    #[serde(rename = "type", default)]
    pub room_type: String,
    /// Guests placed in this room
    #[serde(default)]
    pub allocations: Vec<RoomAllocation>,
}

/// Input for adding a room.
#[derive(Debug, Clone)]
pub struct NewHotelRoom {
    /// Hotel vendor owning the room
    pub vendor_id: String,
    /// Room number or label
    pub room_number: String,
    /// Room type
    pub room_type: String,
    /// Initial allocations
    pub allocations: Vec<RoomAllocation>,
}

impl Record for HotelRoom {
    const KIND: EntityKind = EntityKind::HotelRoom;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.hotel_rooms
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.hotel_rooms
    }
}

impl Draft for NewHotelRoom {
    type Output = HotelRoom;

    fn into_record(self, id: String, _now: DateTime<Utc>) -> HotelRoom {
        let allocations = self
            .allocations
            .into_iter()
            .map(|allocation| RoomAllocation {
                room_id: id.clone(),
                ..allocation
            })
            .collect();

        HotelRoom {
            id,
            vendor_id: self.vendor_id,
            room_number: self.room_number,
            room_type: self.room_type,
            allocations,
        }
    }
}
