//! Cycle driver — the plan → execute → reflect → replan state machine.
//!
//! Transition table, evaluated once per step:
//!
//! ```text
//! Planning    backlog non-empty           -> select day plan  -> Executing
//! Planning    backlog and plan empty      -> Done
//! Executing   plan non-empty              -> complete one task -> Reflecting
//! Executing   plan empty                  -> Planning
//! Reflecting  feedback non-empty          -> Replanning
//! Reflecting  feedback and backlog empty  -> Done
//! Reflecting  otherwise                   -> Executing
//! Replanning  always                      -> Executing
//! ```
//!
//! A Planning step whose selection comes back empty while the backlog is not
//! fails with `CycleError::Starvation` instead of spinning.

use crate::error::CycleError;
use crate::executor::execute_day;
use crate::plan::{DEFAULT_CAPACITY_HOURS, DayPlan};
use crate::reflector::{FeedbackKind, reflect};
use crate::replanner::replan;
use crate::selector::plan_tasks;
use crate::state::CycleState;
use crate::task::Task;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Budget for a single day plan, hours.
    pub capacity_hours: f64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            capacity_hours: DEFAULT_CAPACITY_HOURS,
        }
    }
}

impl CycleConfig {
    pub fn with_capacity(capacity_hours: f64) -> Self {
        Self { capacity_hours }
    }

    fn sanitized(self) -> Self {
        if self.capacity_hours.is_finite() && self.capacity_hours > 0.0 {
            self
        } else {
            tracing::warn!(
                capacity = self.capacity_hours,
                fallback = DEFAULT_CAPACITY_HOURS,
                "invalid capacity, using default"
            );
            Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Planning,
    Executing,
    Reflecting,
    /// Carries the reflector's feedback until the replanner folds it back.
    Replanning { feedback: Vec<Task> },
    Done,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Planning => "planning",
            Phase::Executing => "executing",
            Phase::Reflecting => "reflecting",
            Phase::Replanning { .. } => "replanning",
            Phase::Done => "done",
        }
    }
}

/// Observable effect of a single step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CycleEvent {
    Planned {
        cycle: u32,
        task_ids: Vec<String>,
        hours: f64,
    },
    Executed {
        task_id: String,
    },
    Reflected {
        feedback: FeedbackKind,
    },
    Replanned {
        returned: Vec<String>,
    },
    Done {
        completed: usize,
    },
}

/// Owns one run's `CycleState` and advances it one transition at a time.
#[derive(Debug, Clone)]
pub struct CycleDriver {
    state: CycleState,
    phase: Phase,
    config: CycleConfig,
    total: usize,
}

impl CycleDriver {
    /// Wrap a state built by [`initialize`](crate::state::initialize).
    ///
    /// The state is trusted as is. Use [`CycleDriver::resume`] for anything
    /// loaded from outside.
    pub fn new(state: CycleState) -> Self {
        Self::with_config(state, CycleConfig::default())
    }

    pub fn with_config(state: CycleState, config: CycleConfig) -> Self {
        let total = state.total_tasks();
        Self {
            state,
            phase: Phase::Planning,
            config: config.sanitized(),
            total,
        }
    }

    /// Start from a state supplied by an outside collaborator (e.g. a
    /// checkpoint), validating it first. An undrained day plan must fit its
    /// own `capacity_hours`.
    pub fn resume(state: CycleState, config: CycleConfig) -> Result<Self, CycleError> {
        state.check_invariants()?;
        Ok(Self::with_config(state, config))
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    pub fn config(&self) -> CycleConfig {
        self.config
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn into_state(self) -> CycleState {
        self.state
    }

    /// Advance exactly one transition.
    ///
    /// Returns the event the transition produced, if any. Stepping a `Done`
    /// driver is a no-op. On starvation the state is left as it was before
    /// the step and the driver stays in `Planning`.
    pub fn step(&mut self) -> Result<Option<CycleEvent>, CycleError> {
        let phase = std::mem::replace(&mut self.phase, Phase::Done);
        tracing::debug!(phase = phase.name(), "step");

        let (next, event) = match phase {
            Phase::Planning => match self.plan() {
                Ok(out) => out,
                Err(e) => {
                    self.phase = Phase::Planning;
                    return Err(e);
                }
            },
            Phase::Executing => self.execute(),
            Phase::Reflecting => self.reflect(),
            Phase::Replanning { feedback } => self.replan(feedback),
            Phase::Done => (Phase::Done, None),
        };

        self.phase = next;
        debug_assert_eq!(
            self.state.total_tasks(),
            self.total,
            "task count must be conserved across steps"
        );
        Ok(event)
    }

    /// Drive to `Done`, reporting each event to `on_event`.
    pub fn run_to_completion<F: FnMut(&CycleEvent)>(
        mut self,
        mut on_event: F,
    ) -> Result<CycleState, CycleError> {
        while !self.is_done() {
            if let Some(event) = self.step()? {
                on_event(&event);
            }
        }
        Ok(self.state)
    }

    fn plan(&mut self) -> Result<(Phase, Option<CycleEvent>), CycleError> {
        if !self.state.day_plan.is_empty() {
            // Re-hydrated state with an undrained plan: finish it first.
            return Ok((Phase::Executing, None));
        }

        if self.state.backlog.is_empty() {
            return Ok((Phase::Done, Some(self.finish())));
        }

        let capacity = self.config.capacity_hours;
        let backlog = std::mem::take(&mut self.state.backlog);
        let selection = plan_tasks(backlog, capacity);

        if selection.plan.is_empty() {
            self.state.backlog = selection.backlog;
            return Err(self.starvation(capacity));
        }

        self.state.backlog = selection.backlog;
        self.state.day_plan = selection.plan;
        self.state.cycle_count += 1;

        let hours = self.state.day_plan.total_hours();
        tracing::info!(
            cycle = self.state.cycle_count,
            tasks = self.state.day_plan.len(),
            hours,
            deferred = self.state.backlog.len(),
            "day plan built"
        );

        let event = CycleEvent::Planned {
            cycle: self.state.cycle_count,
            task_ids: self.state.day_plan.task_ids(),
            hours,
        };
        Ok((Phase::Executing, Some(event)))
    }

    fn execute(&mut self) -> (Phase, Option<CycleEvent>) {
        if self.state.day_plan.is_empty() {
            return (Phase::Planning, None);
        }

        let plan = std::mem::replace(
            &mut self.state.day_plan,
            DayPlan::empty(self.config.capacity_hours),
        );
        let execution = execute_day(plan);
        self.state.day_plan = execution.plan;

        let event = execution.completed.map(|task| {
            let task_id = task.id.clone();
            self.state.completed.push(task);
            CycleEvent::Executed { task_id }
        });
        (Phase::Reflecting, event)
    }

    fn reflect(&mut self) -> (Phase, Option<CycleEvent>) {
        let feedback = reflect(&self.state.day_plan, self.state.backlog.len());
        self.state.last_feedback = Some(feedback.kind.to_string());

        if !feedback.is_empty() {
            let kind = feedback.kind;
            return (
                Phase::Replanning {
                    feedback: feedback.tasks,
                },
                Some(CycleEvent::Reflected { feedback: kind }),
            );
        }

        if self.state.backlog.is_empty() {
            return (Phase::Done, Some(self.finish()));
        }

        (
            Phase::Executing,
            Some(CycleEvent::Reflected {
                feedback: feedback.kind,
            }),
        )
    }

    fn replan(&mut self, feedback: Vec<Task>) -> (Phase, Option<CycleEvent>) {
        let returned: Vec<String> = feedback.iter().map(|t| t.id.clone()).collect();
        if !returned.is_empty() {
            tracing::info!(deferred = returned.len(), "returning unfinished tasks to backlog");
        }

        let backlog = std::mem::take(&mut self.state.backlog);
        self.state.backlog = replan(feedback, backlog);
        self.state.day_plan = DayPlan::empty(self.config.capacity_hours);

        (Phase::Executing, Some(CycleEvent::Replanned { returned }))
    }

    fn finish(&self) -> CycleEvent {
        tracing::info!(
            completed = self.state.completed.len(),
            cycles = self.state.cycle_count,
            "all tasks completed"
        );
        CycleEvent::Done {
            completed: self.state.completed.len(),
        }
    }

    fn starvation(&self, capacity_hours: f64) -> CycleError {
        // Selection walks by deadline, so the blocker is the earliest one.
        let blocker = self.state.backlog.iter().min_by_key(|t| t.deadline);
        let (task_id, task_name, estimated_hours) = blocker
            .map(|t| (t.id.clone(), t.name.clone(), t.estimated_hours))
            .unwrap_or_default();

        tracing::warn!(
            task_id = %task_id,
            estimated_hours,
            capacity = capacity_hours,
            "task exceeds day capacity, run cannot progress"
        );

        CycleError::Starvation {
            task_id,
            task_name,
            estimated_hours,
            capacity_hours,
        }
    }
}

/// Drive a freshly initialized state to completion with the default
/// 8-hour capacity.
///
/// The state is not re-validated; pass it through [`CycleDriver::resume`]
/// if it did not come from [`initialize`](crate::state::initialize).
pub fn run(state: CycleState) -> Result<CycleState, CycleError> {
    CycleDriver::new(state).run_to_completion(|_| {})
}

/// Like [`run`], with an explicit config and an event observer.
pub fn run_with_observer<F: FnMut(&CycleEvent)>(
    state: CycleState,
    config: CycleConfig,
    on_event: F,
) -> Result<CycleState, CycleError> {
    CycleDriver::with_config(state, config).run_to_completion(on_event)
}
