//! Selector — build a day plan from the backlog.
//!
//! Algorithm (deterministic):
//! 1) rank backlog tasks by deadline ASC, ties kept in backlog order
//! 2) walk the ranking, adding tasks while the running total stays <= capacity
//! 3) stop at the first task that would overflow (greedy cutoff, no skipping)
//! 4) untaken tasks stay in the backlog in their original order

use crate::plan::DayPlan;
use crate::task::{Task, TaskStatus};

/// Output of one selection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub plan: DayPlan,
    pub backlog: Vec<Task>,
}

pub fn plan_tasks(backlog: Vec<Task>, capacity_hours: f64) -> Selection {
    // sort_by_key is stable, so equal deadlines keep insertion order.
    let mut ranked: Vec<usize> = (0..backlog.len()).collect();
    ranked.sort_by_key(|&i| backlog[i].deadline);

    let mut order = Vec::new();
    let mut total = 0.0;

    for idx in ranked {
        let hours = backlog[idx].estimated_hours;
        if total + hours > capacity_hours {
            break;
        }
        total += hours;
        order.push(idx);
    }

    let mut slots: Vec<Option<Task>> = backlog.into_iter().map(Some).collect();

    let mut planned = Vec::with_capacity(order.len());
    for idx in order {
        if let Some(mut task) = slots[idx].take() {
            task.status = TaskStatus::Planned;
            planned.push(task);
        }
    }

    let rest: Vec<Task> = slots.into_iter().flatten().collect();

    tracing::debug!(
        planned = planned.len(),
        remaining = rest.len(),
        hours = total,
        capacity = capacity_hours,
        "selection pass"
    );

    Selection {
        plan: DayPlan {
            tasks: planned,
            capacity_hours,
        },
        backlog: rest,
    }
}
