//! Environment-driven configuration.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DB_PATH_VAR: &str = "QUIZCRAFT_DB_PATH";
pub const SHARE_BASE_URL_VAR: &str = "QUIZCRAFT_SHARE_BASE_URL";
pub const TICK_MS_VAR: &str = "QUIZCRAFT_TICK_MS";
pub const COMPRESSION_VAR: &str = "QUIZCRAFT_COMPRESSION";
pub const MAX_DIAGNOSTICS_VAR: &str = "QUIZCRAFT_MAX_DIAGNOSTICS";

const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:8080/";
const DEFAULT_TICK_MS: u64 = 500;
const DEFAULT_MAX_DIAGNOSTICS: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    NotPositive { var: &'static str, value: String },

    #[error("{var} must be \"on\" or \"off\", got {value:?}")]
    NotSwitch { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub share_base_url: String,
    pub tick: Duration,
    /// When off, every share token is emitted uncompressed.
    pub compression: bool,
    /// How many diagnostics the import screen lists.
    pub max_diagnostics: usize,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset or blank variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let db_path = get(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);
        let share_base_url =
            get(SHARE_BASE_URL_VAR).unwrap_or_else(|| DEFAULT_SHARE_BASE_URL.to_string());
        let tick_ms = match get(TICK_MS_VAR) {
            Some(value) => positive(TICK_MS_VAR, &value)?,
            None => DEFAULT_TICK_MS,
        };
        let compression = match get(COMPRESSION_VAR) {
            Some(value) => switch(COMPRESSION_VAR, &value)?,
            None => true,
        };
        let max_diagnostics = match get(MAX_DIAGNOSTICS_VAR) {
            Some(value) => positive(MAX_DIAGNOSTICS_VAR, &value)? as usize,
            None => DEFAULT_MAX_DIAGNOSTICS,
        };

        Ok(Self {
            db_path,
            share_base_url,
            tick: Duration::from_millis(tick_ms),
            compression,
            max_diagnostics,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            compression: true,
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
        }
    }
}

/// Local data directory, falling back to the working directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizcraft")
        .join("quizcraft.db")
}

fn positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::NotPositive {
            var,
            value: value.to_string(),
        }),
    }
}

fn switch(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(ConfigError::NotSwitch {
            var,
            value: value.to_string(),
        }),
    }
}
