//! Day plan: the capacity-bounded slice of the backlog chosen for one cycle.

use crate::task::Task;
use serde::{Deserialize, Serialize};

/// Per-cycle time budget, hours.
pub const DEFAULT_CAPACITY_HOURS: f64 = 8.0;

/// Ordered tasks chosen for the current cycle plus the capacity they were
/// selected against.
///
/// Capacity is checked once by the selector. Draining the plan never
/// re-checks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub tasks: Vec<Task>,
    pub capacity_hours: f64,
}

impl Default for DayPlan {
    fn default() -> Self {
        Self::empty(DEFAULT_CAPACITY_HOURS)
    }
}

impl DayPlan {
    pub fn empty(capacity_hours: f64) -> Self {
        Self {
            tasks: Vec::new(),
            capacity_hours,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn total_hours(&self) -> f64 {
        self.tasks.iter().map(|t| t.estimated_hours).sum()
    }

    pub fn task_ids(&self) -> Vec<String> {
        self.tasks.iter().map(|t| t.id.clone()).collect()
    }
}
