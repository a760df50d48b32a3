//! Host-facing configuration for the handle core.
//!
//! # Responsibility
//! - Resolve where the slot database lives and which key the snapshot uses.
//! - Carry optional logging settings for hosts that enable file logs.
//!
//! # Invariants
//! - Blank environment values fall back to defaults instead of failing.
//! - Explicit builder setters reject blank values.

use crate::logging::default_log_level;
use crate::persistence::gateway::DEFAULT_STORAGE_KEY;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DB_FILE_NAME: &str = "handles.sqlite3";

pub const ENV_DB_PATH: &str = "HANDLES_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "HANDLES_STORAGE_KEY";
pub const ENV_LOG_LEVEL: &str = "HANDLES_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "HANDLES_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDbPath,
    EmptyStorageKey,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "db_path cannot be empty"),
            Self::EmptyStorageKey => write!(f, "storage_key cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing the durable slot.
    pub db_path: PathBuf,
    /// Fixed key the snapshot is stored under.
    pub storage_key: String,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Resolves configuration from `HANDLES_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`; blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(key) = read(ENV_STORAGE_KEY) {
            config.storage_key = key;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        config
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDbPath);
        }
        self.db_path = path;
        Ok(self)
    }

    pub fn with_storage_key(mut self, key: &str) -> Result<Self, ConfigError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        self.storage_key = key.to_string();
        Ok(self)
    }
}
