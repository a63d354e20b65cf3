//! Demonstration backlog: one small software project spread over a week.

use crate::task::TaskInput;
use chrono::{DateTime, Duration, Utc};

/// 2024-01-01T00:00:00Z as a Unix timestamp.
const JAN_2024: i64 = 1_704_067_200;

/// (name, January day, hour UTC, estimated hours)
const SAMPLE: [(&str, i64, i64, f64); 6] = [
    ("Review project requirements", 15, 9, 2.0),
    ("Design system architecture", 15, 17, 4.0),
    ("Set up development environment", 16, 12, 1.5),
    ("Implement core features", 17, 17, 6.0),
    ("Write unit tests", 18, 15, 3.0),
    ("Create documentation", 19, 17, 2.0),
];

fn january(day: i64, hour: i64) -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
        + Duration::seconds(JAN_2024)
        + Duration::days(day - 1)
        + Duration::hours(hour)
}

pub fn sample_tasks() -> Vec<TaskInput> {
    SAMPLE
        .iter()
        .map(|&(name, day, hour, hours)| TaskInput::new(name, january(day, hour), hours))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::run;
    use crate::state::initialize;
    use chrono::TimeZone;

    #[test]
    fn sample_deadlines_fall_in_january_2024() {
        let tasks = sample_tasks();
        assert_eq!(tasks[0].deadline, Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap());
        assert_eq!(tasks[5].deadline, Utc.with_ymd_and_hms(2024, 1, 19, 17, 0, 0).unwrap());
        assert!(tasks.windows(2).all(|w| w[0].deadline <= w[1].deadline));
    }

    #[test]
    fn sample_backlog_runs_to_completion() {
        let tasks = sample_tasks();
        assert_eq!(tasks.len(), 6);

        let out = run(initialize(tasks).unwrap()).unwrap();
        assert_eq!(out.completed.len(), 6);
        assert_eq!(out.completed[0].name, "Review project requirements");
        assert!(out.is_finished());
    }
}
