//! Cycle state: everything the plan/execute/reflect/replan loop threads through.

use crate::error::{CycleError, ValidationIssue};
use crate::plan::{DEFAULT_CAPACITY_HOURS, DayPlan};
use crate::task::{Task, TaskInput, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Full mutable context of one run. Owned by a single driver; never shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleState {
    pub backlog: Vec<Task>,
    pub day_plan: DayPlan,
    pub completed: Vec<Task>,
    /// Planning passes performed. Diagnostics only.
    pub cycle_count: u32,
    /// Human-readable outcome of the most recent reflection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_feedback: Option<String>,
}

/// Counts for rendering a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateSummary {
    pub total: usize,
    pub completed: usize,
    pub planned: usize,
    pub pending: usize,
    pub cycles: u32,
    /// Percent, 0..=100.
    pub completion_rate: f64,
}

/// Build a fresh state from caller input.
///
/// All tasks start `Pending` in input order. Missing ids are generated as
/// `task-<n>` (1-based input position), skipping any already claimed by
/// explicit ids.
pub fn initialize(inputs: Vec<TaskInput>) -> Result<CycleState, CycleError> {
    let mut seen: HashSet<String> = HashSet::new();

    for (index, input) in inputs.iter().enumerate() {
        validate_input(input).map_err(|issue| CycleError::Validation { index, issue })?;
        if let Some(id) = &input.id {
            if !seen.insert(id.clone()) {
                return Err(CycleError::Validation {
                    index,
                    issue: ValidationIssue::DuplicateId(id.clone()),
                });
            }
        }
    }

    let mut backlog = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.into_iter().enumerate() {
        let id = match input.id {
            Some(id) => id,
            None => {
                let mut n = index + 1;
                let mut candidate = format!("task-{n}");
                while seen.contains(&candidate) {
                    n += 1;
                    candidate = format!("task-{n}");
                }
                seen.insert(candidate.clone());
                candidate
            }
        };

        backlog.push(Task {
            id,
            name: input.name,
            deadline: input.deadline,
            estimated_hours: input.estimated_hours,
            status: TaskStatus::Pending,
        });
    }

    tracing::info!(tasks = backlog.len(), "initialized cycle state");

    Ok(CycleState {
        backlog,
        day_plan: DayPlan::empty(DEFAULT_CAPACITY_HOURS),
        completed: Vec::new(),
        cycle_count: 0,
        last_feedback: None,
    })
}

fn validate_input(input: &TaskInput) -> Result<(), ValidationIssue> {
    if input.name.trim().is_empty() {
        return Err(ValidationIssue::EmptyName);
    }
    if let Some(id) = &input.id {
        if id.trim().is_empty() {
            return Err(ValidationIssue::EmptyId);
        }
    }
    // Also rejects NaN: the comparison is false.
    if !(input.estimated_hours.is_finite() && input.estimated_hours > 0.0) {
        return Err(ValidationIssue::NonPositiveHours(input.estimated_hours));
    }
    Ok(())
}

impl CycleState {
    /// Tasks across backlog, day plan and completed.
    pub fn total_tasks(&self) -> usize {
        self.backlog.len() + self.day_plan.len() + self.completed.len()
    }

    pub fn is_finished(&self) -> bool {
        self.backlog.is_empty() && self.day_plan.is_empty()
    }

    pub fn summary(&self) -> StateSummary {
        let total = self.total_tasks();
        let completed = self.completed.len();
        let completion_rate = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        StateSummary {
            total,
            completed,
            planned: self.day_plan.len(),
            pending: self.backlog.len(),
            cycles: self.cycle_count,
            completion_rate,
        }
    }

    /// Every task: completed first, then planned, then backlog.
    pub fn all_tasks(&self) -> impl Iterator<Item = &Task> {
        self.completed
            .iter()
            .chain(self.day_plan.tasks.iter())
            .chain(self.backlog.iter())
    }

    /// Verify model invariants on a state that came from outside the driver.
    pub fn check_invariants(&self) -> Result<(), CycleError> {
        let capacity = self.day_plan.capacity_hours;
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(CycleError::CorruptState(format!(
                "day plan capacity must be positive, got {capacity}"
            )));
        }

        let mut ids = HashSet::new();

        let containers: [(&str, &[Task], TaskStatus); 3] = [
            ("backlog", self.backlog.as_slice(), TaskStatus::Pending),
            ("day plan", self.day_plan.tasks.as_slice(), TaskStatus::Planned),
            ("completed", self.completed.as_slice(), TaskStatus::Completed),
        ];

        for (label, tasks, expected) in containers {
            for t in tasks {
                if !ids.insert(t.id.as_str()) {
                    return Err(CycleError::CorruptState(format!("duplicate task id {}", t.id)));
                }
                if !(t.estimated_hours.is_finite() && t.estimated_hours > 0.0) {
                    return Err(CycleError::CorruptState(format!(
                        "task {} has non-positive estimated hours {}",
                        t.id, t.estimated_hours
                    )));
                }
                if t.name.trim().is_empty() {
                    return Err(CycleError::CorruptState(format!(
                        "task {} has an empty name",
                        t.id
                    )));
                }
                if t.status != expected {
                    return Err(CycleError::CorruptState(format!(
                        "task {} in {label} has status {}, expected {expected}",
                        t.id, t.status
                    )));
                }
            }
        }

        let planned = self.day_plan.total_hours();
        if planned > capacity {
            return Err(CycleError::CorruptState(format!(
                "day plan holds {planned}h but capacity is {capacity}h"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn initialize_assigns_ids_and_pending_status() {
        let state = initialize(vec![
            TaskInput::new("Review", due(), 2.0),
            TaskInput::new("Design", due(), 4.0),
        ])
        .unwrap();

        assert_eq!(state.backlog.len(), 2);
        assert_eq!(state.backlog[0].id, "task-1");
        assert_eq!(state.backlog[1].id, "task-2");
        assert!(state.backlog.iter().all(|t| t.status == TaskStatus::Pending));
        assert!(state.day_plan.is_empty());
        assert_eq!(state.day_plan.capacity_hours, 8.0);
        assert!(state.completed.is_empty());
        assert_eq!(state.cycle_count, 0);
    }

    #[test]
    fn generated_ids_skip_explicit_ones() {
        let state = initialize(vec![
            TaskInput::new("A", due(), 1.0),
            TaskInput::new("B", due(), 1.0).with_id("task-1"),
        ])
        .unwrap();

        assert_eq!(state.backlog[0].id, "task-2");
        assert_eq!(state.backlog[1].id, "task-1");
    }

    #[test]
    fn initialize_rejects_bad_input() {
        let err = initialize(vec![
            TaskInput::new("ok", due(), 1.0),
            TaskInput::new("zero", due(), 0.0),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CycleError::Validation {
                index: 1,
                issue: ValidationIssue::NonPositiveHours(0.0)
            }
        );

        let err = initialize(vec![TaskInput::new("  ", due(), 1.0)]).unwrap_err();
        assert!(matches!(
            err,
            CycleError::Validation {
                index: 0,
                issue: ValidationIssue::EmptyName
            }
        ));

        let err = initialize(vec![TaskInput::new("nan", due(), f64::NAN)]).unwrap_err();
        assert!(matches!(
            err,
            CycleError::Validation {
                issue: ValidationIssue::NonPositiveHours(_),
                ..
            }
        ));

        let err = initialize(vec![
            TaskInput::new("a", due(), 1.0).with_id("x"),
            TaskInput::new("b", due(), 1.0).with_id("x"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CycleError::Validation {
                index: 1,
                issue: ValidationIssue::DuplicateId("x".to_string())
            }
        );
    }

    #[test]
    fn summary_reports_completion_rate() {
        let mut state = initialize(vec![
            TaskInput::new("a", due(), 1.0),
            TaskInput::new("b", due(), 1.0),
        ])
        .unwrap();
        let mut done = state.backlog.remove(0);
        done.status = TaskStatus::Completed;
        state.completed.push(done);

        let s = state.summary();
        assert_eq!(s.total, 2);
        assert_eq!(s.completed, 1);
        assert_eq!(s.pending, 1);
        assert_eq!(s.completion_rate, 50.0);

        let empty = initialize(vec![]).unwrap();
        assert_eq!(empty.summary().completion_rate, 0.0);
    }

    #[test]
    fn check_invariants_flags_status_mismatch() {
        let mut state = initialize(vec![TaskInput::new("a", due(), 1.0)]).unwrap();
        assert!(state.check_invariants().is_ok());

        state.backlog[0].status = TaskStatus::Completed;
        let err = state.check_invariants().unwrap_err();
        assert!(matches!(err, CycleError::CorruptState(_)));
    }

    #[test]
    fn check_invariants_flags_over_capacity_plan() {
        let mut state = initialize(vec![
            TaskInput::new("a", due(), 6.0),
            TaskInput::new("b", due(), 6.0),
        ])
        .unwrap();
        for mut t in state.backlog.drain(..) {
            t.status = TaskStatus::Planned;
            state.day_plan.tasks.push(t);
        }
        assert_eq!(state.day_plan.total_hours(), 12.0);

        let err = state.check_invariants().unwrap_err();
        assert!(matches!(err, CycleError::CorruptState(msg) if msg.contains("capacity is 8h")));

        state.day_plan.capacity_hours = 12.0;
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn check_invariants_flags_bad_capacity() {
        let mut state = initialize(vec![]).unwrap();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            state.day_plan.capacity_hours = bad;
            assert!(matches!(state.check_invariants(), Err(CycleError::CorruptState(_))));
        }
    }
}
