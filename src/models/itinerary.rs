//! Itinerary document - an ordered day/activity plan for a trip.
//!
//! Days and activities are embedded; the whole document is replaced on every
//! edit (see [`crate::core::itinerary`]).

use super::{Draft, EntityKind, Record, blank_as_none};
use crate::core::store::Snapshot;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// What kind of slot an activity fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    /// Getting from A to B
    Transport,
    /// Sightseeing, excursions
    #[default]
    Activity,
    /// Breakfast, lunch, dinner
    Meal,
    /// Check-in, overnight
    Accommodation,
    /// Free time
    Free,
}

/// One scheduled item within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryActivity {
    /// Unique identifier
    pub id: String,
    /// Start time as `HH:MM`
    pub time: String,
    /// Short title
    pub title: String,
    /// Details
    #[serde(default)]
    pub description: String,
    /// Where it happens
    #[serde(default)]
    pub location: String,
    /// Kind of slot
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
}

/// Input for adding an activity to a day.
#[derive(Debug, Clone)]
pub struct NewActivity {
    /// Start time as `HH:MM`
    pub time: String,
    /// Short title
    pub title: String,
    /// Details
    pub description: String,
    /// Where it happens
    pub location: String,
    /// Kind of slot
    pub activity_type: ActivityType,
}

impl Default for NewActivity {
    fn default() -> Self {
        Self {
            time: "09:00".to_string(),
            title: String::new(),
            description: String::new(),
            location: String::new(),
            activity_type: ActivityType::Activity,
        }
    }
}

/// One day of an itinerary. `day_number` is always 1..N in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    /// Unique identifier
    pub id: String,
    /// Position in the itinerary, starting at 1
    pub day_number: u32,
    /// Calendar date, if planned
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    /// Scheduled items
    #[serde(default)]
    pub activities: Vec<ItineraryActivity>,
}

/// A trip plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    /// Unique identifier
    pub id: String,
    /// Booking this plan is for, if any
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub booking_id: Option<String>,
    /// Plan title
    pub title: String,
    /// Destination
    pub destination: String,
    /// Days in order
    #[serde(default)]
    pub days: Vec<ItineraryDay>,
    /// When the plan was created
    pub created_at: DateTime<Utc>,
}

/// Input for adding an itinerary.
#[derive(Debug, Clone)]
pub struct NewItinerary {
    /// Booking this plan is for, if any
    pub booking_id: Option<String>,
    /// Plan title
    pub title: String,
    /// Destination
    pub destination: String,
    /// Days in order; renumbered 1..N on creation
    pub days: Vec<ItineraryDay>,
}

impl Record for Itinerary {
    const KIND: EntityKind = EntityKind::Itinerary;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.itineraries
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.itineraries
    }

    fn keep_immutable_fields(&mut self, stored: &Self) {
        self.created_at = stored.created_at;
    }

    fn normalize(&mut self) {
        self.renumber_days();
    }
}

impl Itinerary {
    /// Sets every `day_number` to its position in `days`, starting at 1.
    pub fn renumber_days(&mut self) {
        for (day, number) in self.days.iter_mut().zip(1..) {
            day.day_number = number;
        }
    }
}

impl Draft for NewItinerary {
    type Output = Itinerary;

    fn into_record(self, id: String, now: DateTime<Utc>) -> Itinerary {
        let mut itinerary = Itinerary {
            id,
            booking_id: self.booking_id,
            title: self.title,
            destination: self.destination,
            days: self.days,
            created_at: now,
        };
        itinerary.renumber_days();
        itinerary
    }
}
