//! Store configuration.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the document path.
const DB_PATH_VAR: &str = "GEARBOOK_DB_PATH";

/// Default document path, relative to the working directory.
const DEFAULT_DB_PATH: &str = "database.json";

/// Storage configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the backing JSON document.
    pub database_path: PathBuf,
}

impl StoreConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        let database_path = env::var(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));
        Self { database_path }
    }

    /// Overrides the document path.
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}
