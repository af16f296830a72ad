//! Database dialect tags and dispatch
//!
//! Dispatch is by explicit tag, not inheritance: asking for a comparator or
//! parser on a dialect without a complete provider fails loudly with
//! [`SyncError::UnsupportedPlatform`] at selection time.

use crate::error::{Result, SyncError};
use crate::mysql::{MySqlComparator, MySqlParser, MySqlTable};
use serde::{Deserialize, Serialize};

/// Supported database kinds
///
/// MySQL is the only dialect with a complete provider (model, parser,
/// comparator). Postgres and SQLite are recognized tags so configuration
/// can name them, but selecting them is a fatal error.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Mysql,
    Postgresql,
    Sqlite,
}

impl Dialect {
    /// Whether a full provider (parser + comparator) exists for this dialect
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Mysql)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgresql => "postgresql",
            Self::Sqlite => "sqlite",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Dialect {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::Mysql),
            "postgresql" | "postgres" => Ok(Self::Postgresql),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(SyncError::parse(format!("unknown dialect `{other}`"))),
        }
    }
}

/// Build a DDL parser for `table` on the given dialect
pub fn parser_for(dialect: Dialect, table: &str, ddl: &str) -> Result<MySqlParser> {
    match dialect {
        Dialect::Mysql => Ok(MySqlParser::new(table, ddl)),
        other => Err(SyncError::UnsupportedPlatform { dialect: other }),
    }
}

/// Build a comparator for the given dialect
pub fn comparator_for(
    dialect: Dialect,
    entity_table: MySqlTable,
    database_table: Option<MySqlTable>,
) -> Result<MySqlComparator> {
    match dialect {
        Dialect::Mysql => MySqlComparator::new(entity_table, database_table),
        other => Err(SyncError::UnsupportedPlatform { dialect: other }),
    }
}
