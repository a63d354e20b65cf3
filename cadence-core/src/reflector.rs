//! Reflector — classify what is left of the day plan after a step.

use crate::plan::DayPlan;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Step outcome as seen by the reflector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedbackKind {
    /// Planned tasks are still waiting.
    Incomplete { unfinished: usize },
    /// The plan is drained but the backlog is not.
    DayComplete { remaining: usize },
    /// Nothing left anywhere.
    AllComplete,
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackKind::Incomplete { unfinished } => write!(
                f,
                "day plan incomplete: {} unfinished",
                count_tasks(*unfinished)
            ),
            FeedbackKind::DayComplete { remaining } => write!(
                f,
                "day plan complete, {} left for future days",
                count_tasks(*remaining)
            ),
            FeedbackKind::AllComplete => f.write_str("all tasks completed"),
        }
    }
}

fn count_tasks(n: usize) -> String {
    if n == 1 {
        "1 task".to_string()
    } else {
        format!("{n} tasks")
    }
}

/// Unfinished planned tasks, in plan order.
///
/// An empty list means the day plan has been fully drained.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub tasks: Vec<Task>,
    pub kind: FeedbackKind,
}

impl Feedback {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Feedback is exactly the remaining plan contents; `backlog_len` only
/// feeds the classification.
pub fn reflect(plan: &DayPlan, backlog_len: usize) -> Feedback {
    let tasks = plan.tasks.clone();

    let kind = if !tasks.is_empty() {
        FeedbackKind::Incomplete {
            unfinished: tasks.len(),
        }
    } else if backlog_len > 0 {
        FeedbackKind::DayComplete {
            remaining: backlog_len,
        }
    } else {
        FeedbackKind::AllComplete
    };

    tracing::debug!(feedback = tasks.len(), %kind, "reflected");

    Feedback { tasks, kind }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;
    use chrono::{TimeZone, Utc};

    #[test]
    fn remaining_plan_becomes_feedback_in_order() {
        let due = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let plan = DayPlan {
            tasks: vec![
                Task::new("b", "b", due).with_status(TaskStatus::Planned),
                Task::new("c", "c", due).with_status(TaskStatus::Planned),
            ],
            capacity_hours: 8.0,
        };

        let fb = reflect(&plan, 0);
        assert_eq!(fb.tasks.len(), 2);
        assert_eq!(fb.tasks[0].id, "b");
        assert_eq!(fb.kind, FeedbackKind::Incomplete { unfinished: 2 });
        assert_eq!(fb.kind.to_string(), "day plan incomplete: 2 tasks unfinished");
    }

    #[test]
    fn drained_plan_gives_empty_feedback() {
        let fb = reflect(&DayPlan::empty(8.0), 3);
        assert!(fb.is_empty());
        assert_eq!(fb.kind, FeedbackKind::DayComplete { remaining: 3 });

        let fb = reflect(&DayPlan::empty(8.0), 0);
        assert_eq!(fb.kind, FeedbackKind::AllComplete);
    }

    #[test]
    fn single_task_messages_are_singular() {
        assert_eq!(
            FeedbackKind::Incomplete { unfinished: 1 }.to_string(),
            "day plan incomplete: 1 task unfinished"
        );
        assert_eq!(
            FeedbackKind::DayComplete { remaining: 1 }.to_string(),
            "day plan complete, 1 task left for future days"
        );
        assert_eq!(
            FeedbackKind::DayComplete { remaining: 4 }.to_string(),
            "day plan complete, 4 tasks left for future days"
        );
    }
}
