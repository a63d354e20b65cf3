use anyhow::{Context, Result};
use cadence_core::DEFAULT_CAPACITY_HOURS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{cadence_home, ensure_cadence_home};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub planner: PlannerSection,
    #[serde(default)]
    pub input: InputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerSection {
    /// Hours a single day plan may hold.
    pub capacity_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSection {
    /// IANA timezone for deadlines written without an offset.
    pub timezone: String,
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            capacity_hours: DEFAULT_CAPACITY_HOURS,
        }
    }
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(cadence_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_cadence_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default())?;
    println!("Wrote {}", written.display());
    Ok(())
}
