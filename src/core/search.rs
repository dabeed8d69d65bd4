//! Booking search and filtering.

use crate::{
    core::store::Snapshot,
    models::{Booking, BookingStatus},
};

/// Shown in place of a client that has been deleted.
pub const UNKNOWN_CLIENT: &str = "Unknown client";

/// Name of the client with `client_id`, or [`UNKNOWN_CLIENT`].
#[must_use]
pub fn client_name<'a>(snapshot: &'a Snapshot, client_id: &str) -> &'a str {
    snapshot
        .client(client_id)
        .map_or(UNKNOWN_CLIENT, |c| c.name.as_str())
}

/// Criteria for [`filter_bookings`]. The default matches everything.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    /// Only bookings with this status
    pub status: Option<BookingStatus>,
    /// Case-insensitive text matched against trip name, destination and
    /// client name; blank matches everything
    pub query: String,
}

/// Number of bookings per status tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// All bookings
    pub all: usize,
    /// Confirmed bookings
    pub confirmed: usize,
    /// Pending bookings
    pub pending: usize,
    /// Cancelled bookings
    pub cancelled: usize,
}

/// Bookings matching `filter`, newest first.
pub fn filter_bookings<'a>(snapshot: &'a Snapshot, filter: &BookingFilter) -> Vec<&'a Booking> {
    let query = filter.query.trim().to_lowercase();

    let mut matches: Vec<&Booking> = snapshot
        .bookings
        .iter()
        .filter(|b| filter.status.is_none_or(|status| b.status == status))
        .filter(|b| query.is_empty() || matches_query(snapshot, b, &query))
        .collect();
    matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matches
}

fn matches_query(snapshot: &Snapshot, booking: &Booking, query: &str) -> bool {
    booking.trip_name.to_lowercase().contains(query)
        || booking.destination.to_lowercase().contains(query)
        || snapshot
            .client(&booking.client_id)
            .is_some_and(|c| c.name.to_lowercase().contains(query))
}

/// Counts bookings per status.
#[must_use]
pub fn status_counts(snapshot: &Snapshot) -> StatusCounts {
    snapshot
        .bookings
        .iter()
        .fold(StatusCounts::default(), |mut counts, b| {
            counts.all += 1;
            match b.status {
                BookingStatus::Confirmed => counts.confirmed += 1,
                BookingStatus::Pending => counts.pending += 1,
                BookingStatus::Cancelled => counts.cancelled += 1,
            }
            counts
        })
}
