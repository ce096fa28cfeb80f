//! Task entity model.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::serde_helpers::empty_string_as_none;

/// A task on the store's board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Document id.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Public URL of the attached photo, if any.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub image_url: Option<String>,
    /// Staff id the task is assigned to, if any.
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// Department that owns the task.
    pub department: String,
    /// Whether the task has been completed.
    #[serde(default)]
    pub completed: bool,
    /// Creation time (epoch milliseconds, server-resolved).
    #[serde(default)]
    pub created_at: i64,
    /// Completion time (epoch milliseconds, server-resolved).
    #[serde(default)]
    pub completed_at: Option<i64>,
}

impl Task {
    /// Whether the task is still open.
    pub fn is_open(&self) -> bool {
        !self.completed
    }

    /// Whether the task was completed at or after `since_millis`.
    pub fn completed_since(&self, since_millis: i64) -> bool {
        self.completed && self.completed_at.is_some_and(|at| at >= since_millis)
    }

    /// Creation time as a UTC timestamp.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.created_at).single()
    }
}

/// Data required to create a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Short title.
    #[validate(length(min = 1, message = "is required"))]
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Department that owns the task.
    #[validate(length(min = 1, message = "is required"))]
    pub department: String,
    /// Staff id the task is assigned to, if any.
    #[serde(default)]
    pub assigned_to: Option<String>,
}
