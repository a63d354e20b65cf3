//! Executor — simulated completion of the next planned task.

use crate::plan::DayPlan;
use crate::task::{Task, TaskStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// The task finished by this step, or `None` if the plan was empty.
    pub completed: Option<Task>,
    pub plan: DayPlan,
}

/// Complete exactly one task: the head of the plan.
///
/// Execution is a no-op simulation; the task is atomically marked done.
pub fn execute_day(mut plan: DayPlan) -> Execution {
    if plan.tasks.is_empty() {
        tracing::debug!("no tasks to execute");
        return Execution {
            completed: None,
            plan,
        };
    }

    let mut task = plan.tasks.remove(0);
    task.status = TaskStatus::Completed;
    tracing::info!(task_id = %task.id, task_name = %task.name, "task completed");

    Execution {
        completed: Some(task),
        plan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn completes_head_and_shortens_plan() {
        let due = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let plan = DayPlan {
            tasks: vec![
                Task::new("a", "a", due).with_status(TaskStatus::Planned),
                Task::new("b", "b", due).with_status(TaskStatus::Planned),
            ],
            capacity_hours: 8.0,
        };

        let out = execute_day(plan);
        let done = out.completed.unwrap();
        assert_eq!(done.id, "a");
        assert_eq!(done.status, TaskStatus::Completed);
        assert_eq!(out.plan.task_ids(), vec!["b".to_string()]);
        assert_eq!(out.plan.tasks[0].status, TaskStatus::Planned);
    }

    #[test]
    fn empty_plan_is_noop() {
        let out = execute_day(DayPlan::empty(8.0));
        assert!(out.completed.is_none());
        assert!(out.plan.is_empty());
    }
}
