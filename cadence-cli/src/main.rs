use anyhow::{Context, Result, bail};
use cadence_core::time::parse_timezone;
use cadence_core::{
    CycleConfig, CycleError, CycleEvent, CycleState, TaskInput, initialize, run_with_observer,
    sample_tasks,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod logging;
mod render;
mod state;
mod tasks_file;

use tasks_file::Format;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CADENCE_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "cadence", version = VERSION, about = "Deadline-ordered day planner")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan, execute and replan a backlog until every task is done
    Run {
        /// Task file (.csv or .json). Uses the sample backlog when omitted.
        #[arg(long)]
        tasks: Option<PathBuf>,

        /// Hours per day plan (overrides config)
        #[arg(long)]
        capacity: Option<f64>,

        /// IANA timezone for deadlines without an offset (overrides config)
        #[arg(long)]
        timezone: Option<String>,

        /// Print the final state as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Print every plan/execute/reflect/replan step
        #[arg(long)]
        log: bool,
    },

    /// Print the sample backlog
    Sample {
        /// Emit as csv or json instead of a readable list
        #[arg(long, value_enum)]
        format: Option<Format>,
    },

    /// Manage ~/.cadence/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Run {
            tasks,
            capacity,
            timezone,
            json,
            log,
        } => {
            run_cycle(tasks, capacity, timezone, json, log)?;
        }

        Command::Sample { format } => {
            let tasks = sample_tasks();
            match format {
                Some(f) => tasks_file::write_tasks(&tasks, f, std::io::stdout().lock())?,
                None => {
                    println!("Sample tasks ({} total):", tasks.len());
                    print!("{}", render::task_inputs(&tasks));
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn run_cycle(
    tasks: Option<PathBuf>,
    capacity: Option<f64>,
    timezone: Option<String>,
    json: bool,
    log: bool,
) -> Result<()> {
    let cfg = config::load_config()?;
    let tz = parse_timezone(timezone.as_deref().unwrap_or(&cfg.input.timezone))?;

    let capacity_hours = capacity.unwrap_or(cfg.planner.capacity_hours);
    if !(capacity_hours.is_finite() && capacity_hours > 0.0) {
        bail!("capacity must be a positive number of hours, got {capacity_hours}");
    }

    let inputs: Vec<TaskInput> = match &tasks {
        Some(path) => {
            if !path.exists() {
                bail!("task file not found: {}", path.display());
            }
            tasks_file::load_tasks(path, tz).with_context(|| format!("loading {}", path.display()))?
        }
        None => sample_tasks(),
    };

    tracing::info!(tasks = inputs.len(), capacity = capacity_hours, "starting run");

    let final_state = drive(inputs, capacity_hours, |e| {
        if log {
            println!("{}", render::event(e));
        }
    })?;

    if log {
        println!();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&final_state)?);
    } else {
        print!("{}", render::final_state(&final_state));
    }

    Ok(())
}

/// Initialize and run a backlog. An empty backlog is a valid run that ends
/// at once with nothing completed.
fn drive<F: FnMut(&CycleEvent)>(
    inputs: Vec<TaskInput>,
    capacity_hours: f64,
    on_event: F,
) -> Result<CycleState> {
    let initial = initialize(inputs)?;
    match run_with_observer(initial, CycleConfig::with_capacity(capacity_hours), on_event) {
        Ok(s) => Ok(s),
        Err(CycleError::Starvation {
            task_id,
            task_name,
            estimated_hours,
            capacity_hours,
        }) => bail!(
            "task '{task_name}' ({task_id}) needs {estimated_hours}h but a day holds \
             {capacity_hours}h; split it or raise --capacity"
        ),
        Err(e) => Err(e.into()),
    }
}
