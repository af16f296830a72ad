//! Table sync planning
//!
//! Builds the declared table model, fetches and parses the observed one,
//! and turns the diff into a migration plan. Database access goes through
//! [`SchemaSource`] so the core stays driver-agnostic.

use crate::config::SyncConfig;
use crate::dialect::{comparator_for, parser_for};
use crate::error::Result;
use crate::mysql::build_table;
use crate::schema::TableSpec;
use crate::writer::build_migration_name;
use tracing::debug;

/// Read access to the live database schema
pub trait SchemaSource {
    /// The `SHOW CREATE TABLE` output for `table`, or `None` when the table
    /// does not exist yet
    fn table_ddl(&self, table: &str) -> Result<Option<String>>;
}

/// A planned migration for one table
#[derive(Debug, Clone, PartialEq)]
pub struct TablePlan {
    pub name: String,
    pub up: Vec<String>,
    pub down: Vec<String>,
}

/// Compare a declared table against the database and plan the migration.
/// Returns `Ok(None)` when the database already matches the declaration.
pub fn plan_table(
    config: &SyncConfig,
    source: &dyn SchemaSource,
    spec: &TableSpec,
) -> Result<Option<TablePlan>> {
    let entity_table = build_table(spec)?;
    let ddl = source.table_ddl(&spec.name)?.unwrap_or_default();
    let database_table = parser_for(config.dialect, &spec.name, &ddl)?.parse()?;
    debug!(
        table = %spec.name,
        exists = database_table.is_some(),
        "comparing declared table against database"
    );

    let comparator = comparator_for(config.dialect, entity_table, database_table)?;
    if comparator.is_empty() {
        return Ok(None);
    }
    let name = build_migration_name(&config.connection, &comparator.summary_parts());
    Ok(Some(TablePlan {
        name,
        up: comparator.up_queries()?,
        down: comparator.down_queries()?,
    }))
}
