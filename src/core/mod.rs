/// Booking creation, status changes and the per-booking overview
pub mod booking;
/// Budget variance per booking
pub mod budget;
/// Hotel room allocations
pub mod hotel;
/// Overdue detection and the invoice/booking payment link
pub mod invoice;
/// Copy-on-write itinerary day and activity edits
pub mod itinerary;
/// Pricing worksheet margin and cost item edits
pub mod pricing;
/// Dashboard and finance summaries
pub mod report;
/// Booking search, status filter and counts
pub mod search;
/// The domain store: snapshot, mutations, reload and change events
pub mod store;
/// Task board moves and columns
pub mod task;

pub use store::{DataStore, Snapshot, StoreEvent};
