use std::env;
use std::fmt::Display;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::info;

use crate::domain::CompanySettingsCreate;

pub const DEFAULT_CHANNEL_BUFFER: usize = 32;
pub const DEFAULT_CHANGE_CAPACITY: usize = 256;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    InvalidValue { key: String, value: String, reason: String },
    #[error("Failed to read settings seed {path}: {reason}")]
    SeedRead { path: String, reason: String },
    #[error("Failed to parse settings seed {path}: {reason}")]
    SeedParse { path: String, reason: String },
    #[error("Settings seed rejected: {0}")]
    SeedRejected(String),
}

/// Runtime knobs read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Request queue depth of every table actor.
    pub channel_buffer: usize,
    /// Events retained per change stream before slow subscribers lag.
    pub change_capacity: usize,
    /// Filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Optional JSON file with company settings applied at startup.
    pub settings_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
            change_capacity: DEFAULT_CHANGE_CAPACITY,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            settings_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            channel_buffer: try_load(&lookup, "RESTAURANT_CHANNEL_BUFFER", DEFAULT_CHANNEL_BUFFER)?,
            change_capacity: try_load(&lookup, "RESTAURANT_CHANGE_CAPACITY", DEFAULT_CHANGE_CAPACITY)?,
            log_filter: lookup("RESTAURANT_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            settings_path: lookup("RESTAURANT_SETTINGS_PATH").map(PathBuf::from),
        })
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(value) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return Ok(default);
    };
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
        reason: e.to_string(),
    })
}

/// Company settings from a JSON file. Missing fields take their defaults.
pub fn load_settings_seed(path: &Path) -> Result<CompanySettingsCreate, ConfigError> {
    let display = path.display().to_string();
    let raw = read_to_string(path).map_err(|e| ConfigError::SeedRead {
        path: display.clone(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::SeedParse { path: display, reason: e.to_string() })
}
