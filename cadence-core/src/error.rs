//! Error taxonomy for initializing and driving a cycle run.

/// Why a single task input was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("name must be non-empty")]
    EmptyName,

    #[error("id must be non-empty when given")]
    EmptyId,

    #[error("estimated hours must be a positive number, got {0}")]
    NonPositiveHours(f64),

    #[error("duplicate task id: {0}")]
    DuplicateId(String),
}

/// Errors surfaced by `initialize` and the cycle driver.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CycleError {
    /// Malformed task input. Nothing is initialized.
    #[error("invalid task at index {index}: {issue}")]
    Validation { index: usize, issue: ValidationIssue },

    /// The next task by deadline cannot fit in an empty day plan.
    #[error(
        "task {task_id} ({task_name}) needs {estimated_hours}h but a day plan holds at most {capacity_hours}h"
    )]
    Starvation {
        task_id: String,
        task_name: String,
        estimated_hours: f64,
        capacity_hours: f64,
    },

    /// A re-hydrated state breaks the model invariants.
    #[error("corrupt cycle state: {0}")]
    CorruptState(String),
}
