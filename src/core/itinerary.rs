//! Itinerary document edits.
//!
//! An itinerary is one document. Every edit here builds a new [`Itinerary`]
//! from the current one and leaves the input untouched; [`edit_itinerary`]
//! then stores the result through the normal update path. Day numbers are
//! always `1..=N` in list order.

use crate::{
    core::store::{DataStore, Snapshot},
    errors::Result,
    models::{Itinerary, ItineraryActivity, ItineraryDay, NewActivity, new_id},
};
use chrono::NaiveDate;
use tracing::debug;

/// A day with no activities, for starting a new itinerary.
#[must_use]
pub fn blank_day(date: Option<NaiveDate>) -> ItineraryDay {
    ItineraryDay {
        id: new_id(),
        day_number: 1,
        date,
        activities: Vec::new(),
    }
}

/// Appends an empty day.
#[must_use]
pub fn with_day_added(itinerary: &Itinerary, date: Option<NaiveDate>) -> Itinerary {
    let mut next = itinerary.clone();
    next.days.push(blank_day(date));
    next.renumber_days();
    next
}

/// Removes a day and renumbers the rest. The last remaining day is kept.
#[must_use]
pub fn with_day_removed(itinerary: &Itinerary, day_id: &str) -> Itinerary {
    let mut next = itinerary.clone();
    if next.days.len() <= 1 {
        debug!("Keeping last day of itinerary '{}'", itinerary.id);
        return next;
    }
    next.days.retain(|d| d.id != day_id);
    next.renumber_days();
    next
}

/// Appends an activity to a day.
#[must_use]
pub fn with_activity_added(itinerary: &Itinerary, day_id: &str, activity: NewActivity) -> Itinerary {
    let activity = ItineraryActivity {
        id: new_id(),
        time: activity.time,
        title: activity.title,
        description: activity.description,
        location: activity.location,
        activity_type: activity.activity_type,
    };
    map_day(itinerary, day_id, |day| day.activities.push(activity))
}

/// Replaces the activity with the same id on a day.
#[must_use]
pub fn with_activity_updated(
    itinerary: &Itinerary,
    day_id: &str,
    activity: ItineraryActivity,
) -> Itinerary {
    map_day(itinerary, day_id, |day| {
        if let Some(slot) = day.activities.iter_mut().find(|a| a.id == activity.id) {
            *slot = activity;
        }
    })
}

/// Removes an activity from a day.
#[must_use]
pub fn with_activity_removed(itinerary: &Itinerary, day_id: &str, activity_id: &str) -> Itinerary {
    map_day(itinerary, day_id, |day| {
        day.activities.retain(|a| a.id != activity_id);
    })
}

fn map_day(itinerary: &Itinerary, day_id: &str, edit: impl FnOnce(&mut ItineraryDay)) -> Itinerary {
    let mut next = itinerary.clone();
    if let Some(day) = next.days.iter_mut().find(|d| d.id == day_id) {
        edit(day);
    }
    next
}

/// A day's activities in time order. Times are `HH:MM`, so text order is
/// chronological.
#[must_use]
pub fn sorted_activities(day: &ItineraryDay) -> Vec<&ItineraryActivity> {
    let mut activities: Vec<&ItineraryActivity> = day.activities.iter().collect();
    activities.sort_by(|a, b| a.time.cmp(&b.time));
    activities
}

/// Total activities across all days.
#[must_use]
pub fn activity_count(itinerary: &Itinerary) -> usize {
    itinerary.days.iter().map(|d| d.activities.len()).sum()
}

/// Itineraries, newest first.
pub fn itineraries_newest_first(snapshot: &Snapshot) -> Vec<&Itinerary> {
    let mut itineraries: Vec<&Itinerary> = snapshot.itineraries.iter().collect();
    itineraries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    itineraries
}

/// Applies `edit` to the stored itinerary and persists the result.
pub async fn edit_itinerary<F>(store: &DataStore, itinerary_id: &str, edit: F) -> Result<Itinerary>
where
    F: FnOnce(&Itinerary) -> Itinerary + Send,
{
    store
        .modify::<Itinerary, _>(itinerary_id, |current| Ok(edit(current)))
        .await
}
