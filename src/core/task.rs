//! Task board logic.
//!
//! Tasks move one column at a time: `todo -> in_progress -> done` and back.
//! [`move_task`] rejects jumps that skip a column; a plain
//! [`DataStore::update`] is not restricted.

use crate::{
    core::store::{DataStore, Snapshot},
    errors::{Error, Result},
    models::{EntityKind, Task, TaskStatus},
};
use chrono::{DateTime, Utc};
use tracing::info;

/// A task is overdue when it is not done and its due date has passed.
#[must_use]
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    task.status != TaskStatus::Done && task.due_date < now
}

/// Tasks in one board column, earliest due first.
pub fn tasks_in_column(snapshot: &Snapshot, status: TaskStatus) -> Vec<&Task> {
    let mut column: Vec<&Task> = snapshot
        .tasks
        .iter()
        .filter(|t| t.status == status)
        .collect();
    column.sort_by_key(|t| t.due_date);
    column
}

/// Tasks that are not done yet.
#[must_use]
pub fn open_task_count(snapshot: &Snapshot) -> usize {
    snapshot
        .tasks
        .iter()
        .filter(|t| t.status != TaskStatus::Done)
        .count()
}

/// Moves a task to `to`, which must be its current column or a neighbour.
///
/// # Errors
/// [`Error::InvalidTransition`] for a jump between `todo` and `done`,
/// [`Error::NotFound`] for an unknown task.
pub async fn move_task(store: &DataStore, task_id: &str, to: TaskStatus) -> Result<Task> {
    let task = store
        .modify::<Task, _>(task_id, |task| {
            if task.status != to && !task.status.is_adjacent(to) {
                return Err(Error::InvalidTransition {
                    from: task.status,
                    to,
                });
            }
            Ok(Task {
                status: to,
                ..task.clone()
            })
        })
        .await?;
    info!("Task '{}' moved to {}", task.title, to);
    Ok(task)
}

/// Moves a task one column forward. A done task stays done.
pub async fn advance_task(store: &DataStore, task_id: &str) -> Result<Task> {
    step(store, task_id, TaskStatus::next).await
}

/// Moves a task one column back. A todo task stays in todo.
pub async fn revert_task(store: &DataStore, task_id: &str) -> Result<Task> {
    step(store, task_id, TaskStatus::previous).await
}

async fn step(
    store: &DataStore,
    task_id: &str,
    direction: fn(TaskStatus) -> Option<TaskStatus>,
) -> Result<Task> {
    let current = store
        .get::<Task>(task_id)
        .await
        .ok_or_else(|| Error::not_found(EntityKind::Task, task_id))?;
    match direction(current.status) {
        Some(to) => move_task(store, task_id, to).await,
        None => Ok(current),
    }
}
