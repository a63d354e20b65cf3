//! Load and write task lists as CSV or JSON.
//!
//! CSV needs a header row: `name,deadline,estimated_hours[,id]`.
//! JSON is an array of objects with the same keys.

use anyhow::{Context, Result, bail};
use cadence_core::TaskInput;
use cadence_core::time::{parse_deadline, to_rfc3339_utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase) {
            Some(ext) if ext == "csv" => Ok(Format::Csv),
            Some(ext) if ext == "json" => Ok(Format::Json),
            _ => bail!("cannot tell format of {} (use .csv or .json)", path.display()),
        }
    }
}

/// One task as written by hand: deadline still a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RawTask {
    name: String,
    deadline: String,
    estimated_hours: f64,
    #[serde(default)]
    id: Option<String>,
}

impl RawTask {
    fn into_input(self, tz: Tz) -> Result<TaskInput> {
        let deadline = parse_deadline(&self.deadline, tz)
            .with_context(|| format!("task '{}'", self.name))?;
        let mut input = TaskInput::new(self.name, deadline, self.estimated_hours);
        input.id = self.id.filter(|id| !id.trim().is_empty());
        Ok(input)
    }
}

impl From<&TaskInput> for RawTask {
    fn from(t: &TaskInput) -> Self {
        Self {
            name: t.name.clone(),
            deadline: to_rfc3339_utc(t.deadline),
            estimated_hours: t.estimated_hours,
            id: t.id.clone(),
        }
    }
}

pub fn load_tasks(path: &Path, tz: Tz) -> Result<Vec<TaskInput>> {
    let raw = match Format::from_path(path)? {
        Format::Csv => read_csv(path)?,
        Format::Json => {
            let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str::<Vec<RawTask>>(&s)
                .with_context(|| format!("parsing {}", path.display()))?
        }
    };

    raw.into_iter()
        .enumerate()
        .map(|(i, r)| r.into_input(tz).with_context(|| format!("row {}", i + 1)))
        .collect()
}

fn read_csv(path: &Path) -> Result<Vec<RawTask>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut out = Vec::new();
    for (i, result) in rdr.deserialize::<RawTask>().enumerate() {
        let row = result.with_context(|| format!("parsing {} row {}", path.display(), i + 1))?;
        out.push(row);
    }
    Ok(out)
}

pub fn write_tasks<W: Write>(tasks: &[TaskInput], format: Format, mut w: W) -> Result<()> {
    let raw: Vec<RawTask> = tasks.iter().map(RawTask::from).collect();
    match format {
        Format::Csv => {
            let mut wtr = csv::Writer::from_writer(w);
            for r in &raw {
                wtr.serialize(r)?;
            }
            wtr.flush()?;
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut w, &raw)?;
            writeln!(w)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_csv_with_and_without_ids() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("tasks.csv");
        fs::write(
            &p,
            "name,deadline,estimated_hours,id\n\
             Review,2024-01-15T09:00:00,2,\n\
             Design, 2024-01-15 17:00 ,4,design\n",
        )
        .unwrap();

        let tasks = load_tasks(&p, Tz::UTC).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, None);
        assert_eq!(tasks[0].estimated_hours, 2.0);
        assert_eq!(tasks[1].id.as_deref(), Some("design"));
        assert_eq!(to_rfc3339_utc(tasks[1].deadline), "2024-01-15T17:00:00+00:00");
    }

    #[test]
    fn loads_json_in_configured_timezone() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("tasks.json");
        fs::write(
            &p,
            r#"[{"name": "Review", "deadline": "2024-01-15 09:00", "estimated_hours": 1.5}]"#,
        )
        .unwrap();

        let tz: Tz = "America/Chicago".parse().unwrap();
        let tasks = load_tasks(&p, tz).unwrap();
        assert_eq!(to_rfc3339_utc(tasks[0].deadline), "2024-01-15T15:00:00+00:00");
    }

    #[test]
    fn bad_deadline_names_the_row() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("tasks.csv");
        fs::write(&p, "name,deadline,estimated_hours\nA,soon,1\n").unwrap();

        let err = load_tasks(&p, Tz::UTC).unwrap_err();
        assert!(format!("{err:#}").contains("row 1"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(Format::from_path(Path::new("tasks.txt")).is_err());
    }

    #[test]
    fn written_csv_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("sample.csv");
        let sample = cadence_core::sample_tasks();

        let f = fs::File::create(&p).unwrap();
        write_tasks(&sample, Format::Csv, f).unwrap();

        let back = load_tasks(&p, Tz::UTC).unwrap();
        assert_eq!(back, sample);
    }
}
