//! Replanner — fold unfinished planned tasks back into the backlog.

use crate::task::{Task, TaskStatus};

/// Revert feedback tasks to `Pending` and append them to the end of the
/// backlog in feedback order.
///
/// Tasks already in the backlog keep their place ahead of the deferred ones.
/// Clearing the day plan is the caller's job: the feedback is the plan.
pub fn replan(feedback: Vec<Task>, mut backlog: Vec<Task>) -> Vec<Task> {
    if feedback.is_empty() {
        return backlog;
    }

    backlog.reserve(feedback.len());
    for mut task in feedback {
        tracing::debug!(task_id = %task.id, "deferred to backlog");
        task.status = TaskStatus::Pending;
        backlog.push(task);
    }
    backlog
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn appends_deferred_tasks_after_existing_backlog() {
        let due = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let backlog = vec![Task::new("old", "old", due)];
        let feedback = vec![
            Task::new("p1", "p1", due).with_status(TaskStatus::Planned),
            Task::new("p2", "p2", due).with_status(TaskStatus::Planned),
        ];

        let out = replan(feedback, backlog);
        let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["old", "p1", "p2"]);
        assert!(out.iter().all(|t| t.status == TaskStatus::Pending));
    }

    #[test]
    fn empty_feedback_leaves_backlog_untouched() {
        let due = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let backlog = vec![Task::new("a", "a", due)];
        assert_eq!(replan(vec![], backlog.clone()), backlog);
    }
}
