//! Configuration for schema-sync.toml

use crate::dialect::Dialect;
use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_connection() -> String {
    "default".to_string()
}

fn default_migrations_dir() -> PathBuf {
    PathBuf::from("migrations")
}

fn default_migrations_table() -> String {
    "__migrations".to_string()
}

/// Main configuration struct for schema-sync.toml
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SyncConfig {
    /// Database dialect (mysql, postgresql, sqlite)
    #[serde(default)]
    pub dialect: Dialect,
    /// Connection name embedded in migration file names
    #[serde(default = "default_connection")]
    pub connection: String,
    /// Output directory for migration files
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: PathBuf,
    /// Table name for tracking applied migrations
    #[serde(default = "default_migrations_table")]
    pub migrations_table: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            connection: default_connection(),
            migrations_dir: default_migrations_dir(),
            migrations_table: default_migrations_table(),
        }
    }
}

impl SyncConfig {
    pub fn new(connection: impl Into<String>) -> Self {
        Self {
            connection: connection.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    #[must_use]
    pub fn migrations_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.migrations_dir = dir.into();
        self
    }

    #[must_use]
    pub fn migrations_table(mut self, table: impl Into<String>) -> Self {
        self.migrations_table = table.into();
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| SyncError::Config(e.to_string()))
    }
}
