//! Task model for the day-cycle scheduler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Waiting in the backlog.
    Pending,
    /// Selected into the current day plan.
    Planned,
    /// Executed. Terminal.
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Planned => "planned",
            TaskStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Core task type.
///
/// Tasks are treated as values: stages take them by value and hand back
/// updated copies rather than mutating shared instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub deadline: DateTime<Utc>,

    /// Simulated duration, hours. Always > 0 once validated.
    pub estimated_hours: f64,

    pub status: TaskStatus,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>, deadline: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            deadline,
            estimated_hours: 1.0,
            status: TaskStatus::Pending,
        }
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Caller-supplied task description, before ids and status are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    /// Optional stable id. Generated as `task-<n>` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub deadline: DateTime<Utc>,
    pub estimated_hours: f64,
}

impl TaskInput {
    pub fn new(name: impl Into<String>, deadline: DateTime<Utc>, estimated_hours: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            deadline,
            estimated_hours,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
