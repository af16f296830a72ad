//! Runtime migration runner
//!
//! Applies the on-disk migration files through a caller-supplied executor
//! and records each applied migration in a version table. A migration's
//! statements and its version-row change always share one transaction.

use crate::config::SyncConfig;
use crate::error::Result;
use crate::writer::MigrationWriter;
use tracing::{info, warn};

/// Minimal statement-level access to the target database
pub trait SqlExecutor {
    fn execute(&mut self, sql: &str) -> Result<()>;
    fn begin(&mut self) -> Result<()>;
    fn commit(&mut self) -> Result<()>;
    fn rollback(&mut self) -> Result<()>;
    /// Versions already recorded in the migrations table
    fn applied_versions(&mut self, table: &str) -> Result<Vec<String>>;
}

/// Runtime migrator for applying migration files in order
pub struct Migrator {
    config: SyncConfig,
    writer: MigrationWriter,
}

impl Migrator {
    pub fn new(config: SyncConfig) -> Self {
        let writer = MigrationWriter::new(config.migrations_dir.clone());
        Self { config, writer }
    }

    /// The DDL for the version-tracking table
    pub fn version_table_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS `{}` (`version` VARCHAR(255) NOT NULL PRIMARY KEY, \
             `executed_at` TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6));",
            self.config.migrations_table
        )
    }

    /// Migration names on disk that the database has not applied yet, in
    /// chronological order
    pub fn pending(&self, executor: &mut dyn SqlExecutor) -> Result<Vec<String>> {
        executor.execute(&self.version_table_sql())?;
        let applied = executor.applied_versions(&self.config.migrations_table)?;
        Ok(self
            .writer
            .list()?
            .into_iter()
            .filter(|name| !applied.contains(name))
            .collect())
    }

    /// Apply every pending migration; returns the applied names
    pub fn migrate(&self, executor: &mut dyn SqlExecutor) -> Result<Vec<String>> {
        let pending = self.pending(executor)?;
        for name in &pending {
            let statements = self.writer.read_statements(name, true)?;
            self.run_in_transaction(executor, name, &statements, true)?;
            info!(migration = %name, "applied");
        }
        Ok(pending)
    }

    /// Revert one applied migration by name
    pub fn revert(&self, executor: &mut dyn SqlExecutor, name: &str) -> Result<()> {
        executor.execute(&self.version_table_sql())?;
        let statements = self.writer.read_statements(name, false)?;
        self.run_in_transaction(executor, name, &statements, false)?;
        info!(migration = %name, "reverted");
        Ok(())
    }

    /// Run the statements plus the version-row change atomically. On any
    /// failure the transaction rolls back and the original error propagates.
    fn run_in_transaction(
        &self,
        executor: &mut dyn SqlExecutor,
        name: &str,
        statements: &[String],
        up: bool,
    ) -> Result<()> {
        executor.begin()?;
        let result = self.run_statements(executor, name, statements, up);
        match result {
            Ok(()) => executor.commit(),
            Err(err) => {
                warn!(migration = %name, error = %err, "migration failed, rolling back");
                executor.rollback()?;
                Err(err)
            }
        }
    }

    fn run_statements(
        &self,
        executor: &mut dyn SqlExecutor,
        name: &str,
        statements: &[String],
        up: bool,
    ) -> Result<()> {
        let version_sql = if up {
            format!(
                "INSERT INTO `{}` (`version`) VALUES ('{name}');",
                self.config.migrations_table
            )
        } else {
            format!(
                "DELETE FROM `{}` WHERE `version` = '{name}';",
                self.config.migrations_table
            )
        };
        executor.execute(&version_sql)?;
        for statement in statements {
            executor.execute(statement)?;
        }
        Ok(())
    }
}
