//! Runtime configuration for store construction.
//!
//! # Responsibility
//! - Define where the local fallback files live and whether a SQLite
//!   remote tier is attached.
//! - Load configuration from a JSON file with explicit defaults.
//!
//! # Invariants
//! - Absent fields fall back to defaults; an absent config file is not an
//!   error for callers that use [`CoreConfig::default`].

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DATA_DIR: &str = "daybook-data";

/// Configuration consumed by [`crate::store::open_stores`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreConfig {
    /// Directory holding the local fallback JSON files.
    pub data_dir: PathBuf,
    /// SQLite database path for the structured tier. `None` keeps the
    /// chains local-only.
    pub remote_db: Option<PathBuf>,
    /// Log level override; `None` uses the build-mode default.
    pub log_level: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            remote_db: None,
            log_level: None,
        }
    }
}

impl CoreConfig {
    /// Local-only configuration rooted at `data_dir`.
    pub fn local_in(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}
