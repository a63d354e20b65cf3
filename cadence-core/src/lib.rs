//! cadence-core: deadline-ordered day planning with a plan/execute/reflect/replan loop.

pub mod cycle;
pub mod error;
pub mod executor;
pub mod plan;
pub mod reflector;
pub mod replanner;
pub mod sample;
pub mod selector;
pub mod state;
pub mod task;
pub mod time;

pub use cycle::{CycleConfig, CycleDriver, CycleEvent, Phase, run, run_with_observer};
pub use error::{CycleError, ValidationIssue};
pub use executor::{Execution, execute_day};
pub use plan::{DEFAULT_CAPACITY_HOURS, DayPlan};
pub use reflector::{Feedback, FeedbackKind, reflect};
pub use replanner::replan;
pub use sample::sample_tasks;
pub use selector::{Selection, plan_tasks};
pub use state::{CycleState, StateSummary, initialize};
pub use task::{Task, TaskInput, TaskStatus};
