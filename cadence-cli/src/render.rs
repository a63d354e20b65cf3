//! Plain-text rendering of tasks, run results and the execution log.

use cadence_core::{CycleEvent, CycleState, Task, TaskInput};
use chrono::{DateTime, Utc};
use std::fmt::Write;

fn fmt_deadline(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn task_inputs(tasks: &[TaskInput]) -> String {
    let mut out = String::new();
    for (i, t) in tasks.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, t.name);
        let _ = writeln!(out, "     Due: {} ({}h)", fmt_deadline(t.deadline), t.estimated_hours);
    }
    out
}

fn task_row(out: &mut String, t: &Task) {
    let _ = writeln!(
        out,
        "{:<36} {:<10} {:<17} {:>5}h",
        t.name,
        t.status.to_string(),
        fmt_deadline(t.deadline),
        t.estimated_hours
    );
}

pub fn final_state(state: &CycleState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<36} {:<10} {:<17} {:>6}", "Task", "Status", "Deadline", "Hours");
    let _ = writeln!(out, "{}", "-".repeat(72));

    let mut tasks: Vec<&Task> = state.all_tasks().collect();
    tasks.sort_by_key(|t| t.deadline);
    for t in tasks {
        task_row(&mut out, t);
    }

    let s = state.summary();
    let _ = writeln!(out);
    let _ = writeln!(out, "Total tasks:   {}", s.total);
    let _ = writeln!(out, "Completed:     {}", s.completed);
    let _ = writeln!(out, "Planned:       {}", s.planned);
    let _ = writeln!(out, "Pending:       {}", s.pending);
    let _ = writeln!(out, "Day cycles:    {}", s.cycles);
    let _ = writeln!(out, "Completion:    {:.0}% ({}/{})", s.completion_rate, s.completed, s.total);

    if let Some(fb) = &state.last_feedback {
        let _ = writeln!(out, "Feedback:      {fb}");
    }
    out
}

pub fn event(e: &CycleEvent) -> String {
    match e {
        CycleEvent::Planned { cycle, task_ids, hours } => format!(
            "[plan]    day {cycle}: {} tasks ({hours:.1}h) {}",
            task_ids.len(),
            task_ids.join(", ")
        ),
        CycleEvent::Executed { task_id } => format!("[execute] completed {task_id}"),
        CycleEvent::Reflected { feedback } => format!("[reflect] {feedback}"),
        CycleEvent::Replanned { returned } if returned.is_empty() => {
            "[replan]  nothing to return".to_string()
        }
        CycleEvent::Replanned { returned } => {
            format!("[replan]  back to backlog: {}", returned.join(", "))
        }
        CycleEvent::Done { completed } => format!("[done]    tasks completed: {completed}"),
    }
}
