//! Runtime configuration resolved from the environment.
//!
//! | Variable                  | Default                          |
//! |---------------------------|----------------------------------|
//! | `KANBAN_DB_PATH`          | `kanban.db` in the working dir   |
//! | `KANBAN_LOG_LEVEL`        | `debug` (debug) / `info` (release) |
//! | `KANBAN_LOG_DIR`          | unset: file logging disabled     |
//! | `KANBAN_SAVE_DEBOUNCE_MS` | `500`                            |
//!
//! Blank values count as unset.

use crate::logging::{default_log_level, normalize_level, LoggingError};
use crate::service::write_behind::DEFAULT_SAVE_DEBOUNCE;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_ENV: &str = "KANBAN_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "KANBAN_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "KANBAN_LOG_DIR";
pub const SAVE_DEBOUNCE_ENV: &str = "KANBAN_SAVE_DEBOUNCE_MS";
pub const DEFAULT_DB_FILE_NAME: &str = "kanban.db";

/// Errors from resolving configuration values.
#[derive(Debug)]
pub enum ConfigError {
    InvalidLogLevel(LoggingError),
    InvalidDebounce(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(err) => write!(f, "{LOG_LEVEL_ENV}: {err}"),
            Self::InvalidDebounce(value) => write!(
                f,
                "{SAVE_DEBOUNCE_ENV}: expected milliseconds as an unsigned integer, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLogLevel(err) => Some(err),
            Self::InvalidDebounce(_) => None,
        }
    }
}

/// Resolved settings for opening and persisting a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
    pub save_debounce: Duration,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            save_debounce: DEFAULT_SAVE_DEBOUNCE,
        }
    }
}

impl KanbanConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = value(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = value(LOG_LEVEL_ENV) {
            config.log_level = normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?;
        }
        config.log_dir = value(LOG_DIR_ENV).map(PathBuf::from);
        if let Some(raw) = value(SAVE_DEBOUNCE_ENV) {
            let millis = raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidDebounce(raw.clone()))?;
            config.save_debounce = Duration::from_millis(millis);
        }
        Ok(config)
    }
}
