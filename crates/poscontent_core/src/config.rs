//! Store location configuration.
//!
//! Sources, highest priority first:
//! 1. Explicit path via [`StoreConfig::new`].
//! 2. `POSCONTENT_STORE_PATH` environment variable via [`StoreConfig::from_env`].
//! 3. `position_content.json` in the working directory.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default store file name, resolved against the working directory.
pub const DEFAULT_STORE_FILE_NAME: &str = "position_content.json";
/// Environment variable overriding the store location.
pub const STORE_PATH_ENV: &str = "POSCONTENT_STORE_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Store path is empty after trim.
    EmptyStorePath,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStorePath => write!(f, "store path must not be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Where the persisted store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_FILE_NAME),
        }
    }
}

impl StoreConfig {
    /// Uses an explicit store path.
    ///
    /// # Errors
    /// - Returns [`ConfigError::EmptyStorePath`] for empty or blank paths.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.to_string_lossy().trim().is_empty() {
            return Err(ConfigError::EmptyStorePath);
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Reads the store path from `POSCONTENT_STORE_PATH`, falling back to the
    /// default file name when the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_value(std::env::var_os(STORE_PATH_ENV).map(PathBuf::from))
    }

    fn from_env_value(value: Option<PathBuf>) -> Result<Self, ConfigError> {
        match value {
            Some(path) => Self::new(path),
            None => Ok(Self::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
