//! Task record - operational to-dos on the task board.

use super::{Draft, EntityKind, Record, blank_as_none};
use crate::core::store::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column of the task board. Tasks move one column at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Todo,
    /// Being worked on
    InProgress,
    /// Finished
    Done,
}

impl TaskStatus {
    /// All columns in board order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// The column to the right, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Todo => Some(Self::InProgress),
            Self::InProgress => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// The column to the left, if any.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Todo => None,
            Self::InProgress => Some(Self::Todo),
            Self::Done => Some(Self::InProgress),
        }
    }

    /// Whether `to` is reachable from here in a single step.
    #[must_use]
    pub fn is_adjacent(self, to: Self) -> bool {
        self.next() == Some(to) || self.previous() == Some(to)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        })
    }
}

/// Kind of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    /// Visa paperwork
    Visa,
    /// Ticketing
    Ticket,
    /// Traveller briefing
    Briefing,
    /// Anything else
    Other,
}

/// An operational to-do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Short title
    pub title: String,
    /// Details
    #[serde(default)]
    pub description: String,
    /// Who is responsible
    #[serde(default)]
    pub assignee: String,
    /// Board column
    pub status: TaskStatus,
    /// Kind of work
    pub category: TaskCategory,
    /// Related booking, if any
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub booking_id: Option<String>,
    /// Deadline
    pub due_date: DateTime<Utc>,
    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for adding a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Short title
    pub title: String,
    /// Details
    pub description: String,
    /// Who is responsible
    pub assignee: String,
    /// Board column
    pub status: TaskStatus,
    /// Kind of work
    pub category: TaskCategory,
    /// Related booking, if any
    pub booking_id: Option<String>,
    /// Deadline
    pub due_date: DateTime<Utc>,
}

impl Record for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.tasks
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.tasks
    }

    fn keep_immutable_fields(&mut self, stored: &Self) {
        self.created_at = stored.created_at;
    }
}

impl Draft for NewTask {
    type Output = Task;

    fn into_record(self, id: String, now: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            assignee: self.assignee,
            status: self.status,
            category: self.category,
            booking_id: self.booking_id,
            due_date: self.due_date,
            created_at: now,
        }
    }
}
