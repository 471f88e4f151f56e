//! Runtime configuration from environment variables.
//!
//! # Responsibility
//! - Resolve database path, logging, poll cadence, and default travel mode.
//! - Report invalid values with the offending variable name.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults.
//! - `poll_interval` is at least one second.

use crate::logging::{default_log_level, normalize_level};
use crate::model::session::UserId;
use crate::route::command::TravelMode;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "SLUGHUB_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "SLUGHUB_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SLUGHUB_LOG_DIR";
pub const ENV_POLL_INTERVAL_SECS: &str = "SLUGHUB_POLL_INTERVAL_SECS";
pub const ENV_TRAVEL_MODE: &str = "SLUGHUB_TRAVEL_MODE";
pub const ENV_USER: &str = "SLUGHUB_USER";

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_DB_FILE_NAME: &str = "slughub.sqlite3";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    pub poll_interval: Duration,
    pub travel_mode: TravelMode,
    pub default_user: Option<UserId>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            travel_mode: TravelMode::default(),
            default_user: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps variable names to
    /// values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(level) = read(ENV_LOG_LEVEL) {
            let normalized = normalize_level(&level)
                .map_err(|err| ConfigError::invalid(ENV_LOG_LEVEL, &level, err.to_string()))?;
            config.log_level = normalized.to_string();
        }

        if let Some(dir) = read(ENV_LOG_DIR) {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError::invalid(
                    ENV_LOG_DIR,
                    &dir.display().to_string(),
                    "must be an absolute path",
                ));
            }
            config.log_dir = Some(dir);
        }

        if let Some(secs) = read(ENV_POLL_INTERVAL_SECS) {
            let parsed = secs.parse::<u64>().map_err(|err| {
                ConfigError::invalid(ENV_POLL_INTERVAL_SECS, &secs, err.to_string())
            })?;
            if parsed == 0 {
                return Err(ConfigError::invalid(
                    ENV_POLL_INTERVAL_SECS,
                    &secs,
                    "must be at least 1",
                ));
            }
            config.poll_interval = Duration::from_secs(parsed);
        }

        if let Some(mode) = read(ENV_TRAVEL_MODE) {
            config.travel_mode = mode
                .parse()
                .map_err(|err: crate::route::command::UnknownTravelMode| {
                    ConfigError::invalid(ENV_TRAVEL_MODE, &mode, err.to_string())
                })?;
        }

        if let Some(user) = read(ENV_USER) {
            config.default_user = Some(
                UserId::new(&user)
                    .map_err(|err| ConfigError::invalid(ENV_USER, &user, err.to_string()))?,
            );
        }

        Ok(config)
    }
}

/// Configuration error naming the offending variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { var, value, reason } => {
                write!(f, "invalid {var}=`{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}
