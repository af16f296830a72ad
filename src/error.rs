//! Error taxonomy for schema comparison and migration generation
//!
//! A table that does not exist is never an error — parsers signal it with
//! `Ok(None)` and the comparator treats it as a first creation.

use crate::dialect::Dialect;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, SyncError>;

/// All fatal conditions surfaced by the core and the migration runner
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No comparator/parser exists for the target database kind
    #[error("platform `{dialect}` is not supported")]
    UnsupportedPlatform { dialect: Dialect },

    /// The declared schema contradicts itself (e.g. PK column not declared)
    #[error("schema inconsistency in table `{table}`: {detail}")]
    SchemaInconsistency { table: String, detail: String },

    /// DDL text or a descriptor did not match any recognized pattern
    #[error("parse error: {0}")]
    Parse(String),

    /// Comparison produced an empty diff; nothing to write
    #[error("no schema changes detected")]
    NoChanges,

    #[error("configuration error: {0}")]
    Config(String),

    /// SQL execution failure reported by an executor, propagated unmodified
    #[error("sql execution failed: {0}")]
    Sql(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Shorthand for a parse failure with formatted context
    pub fn parse(detail: impl Into<String>) -> Self {
        Self::Parse(detail.into())
    }

    /// Shorthand for a schema inconsistency scoped to one table
    pub fn inconsistency(table: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::SchemaInconsistency {
            table: table.into(),
            detail: detail.into(),
        }
    }
}
