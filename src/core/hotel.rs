//! Hotel room allocations.

use crate::{
    core::store::{DataStore, Snapshot},
    errors::Result,
    models::{HotelRoom, NewRoomAllocation, RoomAllocation, new_id},
};

/// A room counts as occupied while it has any allocation.
#[must_use]
pub fn is_occupied(room: &HotelRoom) -> bool {
    !room.allocations.is_empty()
}

/// Rooms supplied by `vendor_id`.
pub fn rooms_for_vendor<'a>(snapshot: &'a Snapshot, vendor_id: &str) -> Vec<&'a HotelRoom> {
    snapshot
        .hotel_rooms
        .iter()
        .filter(|r| r.vendor_id == vendor_id)
        .collect()
}

/// Adds a guest allocation to a room.
#[must_use]
pub fn with_allocation_added(room: &HotelRoom, allocation: NewRoomAllocation) -> HotelRoom {
    let mut next = room.clone();
    next.allocations.push(RoomAllocation {
        id: new_id(),
        room_id: room.id.clone(),
        booking_id: allocation.booking_id,
        guest_name: allocation.guest_name,
        check_in: allocation.check_in,
        check_out: allocation.check_out,
    });
    next
}

/// Removes a guest allocation from a room.
#[must_use]
pub fn with_allocation_removed(room: &HotelRoom, allocation_id: &str) -> HotelRoom {
    let mut next = room.clone();
    next.allocations.retain(|a| a.id != allocation_id);
    next
}

/// Allocates a guest to a stored room.
pub async fn allocate_room(
    store: &DataStore,
    room_id: &str,
    allocation: NewRoomAllocation,
) -> Result<HotelRoom> {
    store
        .modify::<HotelRoom, _>(room_id, |room| Ok(with_allocation_added(room, allocation)))
        .await
}

/// Releases a guest allocation from a stored room.
pub async fn release_room(store: &DataStore, room_id: &str, allocation_id: &str) -> Result<HotelRoom> {
    store
        .modify::<HotelRoom, _>(room_id, |room| {
            Ok(with_allocation_removed(room, allocation_id))
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewHotelRoom;
    use crate::test_utils::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_allocate_and_release() -> Result<()> {
        let store = setup_test_store().await?;
        let room = store
            .add(NewHotelRoom {
                vendor_id: "v1".to_string(),
                room_number: "204".to_string(),
                room_type: "twin".to_string(),
                allocations: Vec::new(),
            })
            .await?;
        assert!(!is_occupied(&room));

        let check_in = Utc::now();
        let room = allocate_room(
            &store,
            &room.id,
            NewRoomAllocation {
                booking_id: "b1".to_string(),
                guest_name: "Ana Lima".to_string(),
                check_in,
                check_out: check_in + Duration::days(3),
            },
        )
        .await?;
        assert!(is_occupied(&room));
        assert_eq!(room.allocations[0].room_id, room.id);

        let allocation_id = room.allocations[0].id.clone();
        let room = release_room(&store, &room.id, &allocation_id).await?;
        assert!(!is_occupied(&room));

        let snapshot = store.snapshot().await;
        assert_eq!(rooms_for_vendor(&snapshot, "v1").len(), 1);
        assert!(rooms_for_vendor(&snapshot, "v2").is_empty());
        Ok(())
    }
}
