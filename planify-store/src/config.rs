//! On-disk configuration under the Planify home directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// File name of the single appointments slot.
pub const APPOINTMENTS_FILE: &str = "appointments.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA timezone name used to resolve "today" and "now".
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Override for the appointments slot location. Defaults to
    /// `<planify home>/appointments.json`.
    pub data_file: Option<PathBuf>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            data_file: None,
        }
    }
}

impl Config {
    /// Resolve the configured timezone, falling back to UTC on a name
    /// chrono-tz does not know.
    pub fn resolve_timezone(&self) -> Tz {
        match self.timezone.parse() {
            Ok(tz) => tz,
            Err(_) => {
                warn!("unknown timezone {:?}, falling back to UTC", self.timezone);
                Tz::UTC
            }
        }
    }

    pub fn appointments_path(&self) -> Result<PathBuf> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => Ok(ensure_planify_home()?.join(APPOINTMENTS_FILE)),
        }
    }
}

pub fn planify_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("PLANIFY_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".planify"))
}

pub fn ensure_planify_home() -> Result<PathBuf> {
    let dir = planify_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_planify_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}
