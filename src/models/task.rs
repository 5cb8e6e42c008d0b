use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of a task.
/// Corresponds to the `task_status` SQL enum. `Completed` is terminal:
/// completed tasks are never reported as overdue.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Initial state of every new task.
    Pending,
    InProgress,
    Completed,
}

/// A task as stored and returned by the API.
///
/// `created_by` and `assigned_to` hold usernames; the service layer
/// guarantees both reference existing users whenever a task is created or
/// reassigned. A task always has exactly one creator and one assignee.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier (UUID v4), generated at creation.
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    /// Username of the user who created the task.
    pub created_by: String,
    /// Username of the user responsible for completing the task.
    pub assigned_to: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// A task counts as overdue at instant `now` when its due date has
    /// passed and it has not been completed. Tasks without a due date are
    /// never overdue.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due < now && self.status != TaskStatus::Completed,
            None => false,
        }
    }
}

/// Input for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// Omitted on creation means [`TaskStatus::Pending`].
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Input for updating a task. All lifecycle fields are overwritten;
/// `assigned_to`, when present, reassigns the task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    /// New assignee username. `None` keeps the current assignee.
    pub assigned_to: Option<String>,
}

/// Per-user counters derived by scanning the user's assigned tasks.
///
/// `total = pending + in_progress + completed` always holds; `overdue`
/// overlaps the other buckets and is not part of the sum.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskStats {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub overdue: u64,
}
