//! Runtime configuration loaded from an optional TOML file.
//!
//! Precedence, lowest to highest: built-in defaults, the file named by
//! `--config`, then command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use claims_store::{DEFAULT_FEED_LIMIT, DEFAULT_PER_PAGE};

/// Configuration file errors. Both are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings for the `claims` binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimsConfig {
    pub paths: PathSettings,
    pub serving: ServingSettings,
}

/// Input and store locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Claims file read by `claims ingest`.
    pub input: PathBuf,
    /// SQLite database holding the scored claims.
    pub database: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/claims.csv"),
            database: PathBuf::from("data/claims.db"),
        }
    }
}

/// Defaults for the read commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServingSettings {
    pub page_size: u64,
    pub feed_limit: u64,
}

impl Default for ServingSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PER_PAGE,
            feed_limit: DEFAULT_FEED_LIMIT,
        }
    }
}

impl ClaimsConfig {
    /// Loads the named file, or returns the defaults when no file is named.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
