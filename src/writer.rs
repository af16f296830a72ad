//! Migration file writer
//!
//! A migration is a pair of plain SQL files, `<name>.up.sql` and
//! `<name>.down.sql`, one statement per line. The name embeds a timestamp,
//! the connection name, and a human-readable change summary.

use crate::error::{Result, SyncError};
use crate::sync::TablePlan;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const NAME_LENGTH_CAP: usize = 200;

/// Build a migration name: `migration_{yymmddhhmmss}_{connection}_{summary}`.
/// Summary tokens stop accumulating once the cap is reached; the tail is
/// replaced with `_and_{n}_more`.
pub fn build_migration_name(connection: &str, summary_parts: &[String]) -> String {
    let stamp = Utc::now().format("%y%m%d%H%M%S");
    let mut result = format!("migration_{stamp}_{connection}");
    for (i, part) in summary_parts.iter().enumerate() {
        if result.len() >= NAME_LENGTH_CAP {
            let parts_left = summary_parts.len() - i;
            result.push_str(&format!("_and_{parts_left}_more"));
            break;
        }
        result.push('_');
        result.push_str(part);
    }
    result
}

/// Writes migration files for creating migration pairs on disk
pub struct MigrationWriter {
    out: PathBuf,
}

impl MigrationWriter {
    pub fn new(out: impl Into<PathBuf>) -> Self {
        Self { out: out.into() }
    }

    pub fn migrations_dir(&self) -> &Path {
        &self.out
    }

    pub fn up_path(&self, name: &str) -> PathBuf {
        self.out.join(format!("{name}.up.sql"))
    }

    pub fn down_path(&self, name: &str) -> PathBuf {
        self.out.join(format!("{name}.down.sql"))
    }

    /// Write the up/down file pair for a plan, creating the directory when
    /// missing. A plan with no forward statements is refused.
    pub fn write(&self, plan: &TablePlan) -> Result<()> {
        if plan.up.is_empty() {
            return Err(SyncError::NoChanges);
        }
        fs::create_dir_all(&self.out)?;
        fs::write(self.up_path(&plan.name), statements_file(&plan.up))?;
        fs::write(self.down_path(&plan.name), statements_file(&plan.down))?;
        info!(name = %plan.name, dir = %self.out.display(), "wrote migration");
        Ok(())
    }

    /// Migration names present on disk, sorted. The timestamp prefix makes
    /// lexicographic order chronological.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        if !self.out.exists() {
            return Ok(names);
        }
        for entry in fs::read_dir(&self.out)? {
            let file_name = entry?.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = file_name.strip_suffix(".up.sql") {
                if name.starts_with("migration_") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read back the statements of one side of a migration
    pub fn read_statements(&self, name: &str, up: bool) -> Result<Vec<String>> {
        let path = if up {
            self.up_path(name)
        } else {
            self.down_path(name)
        };
        let contents = fs::read_to_string(path)?;
        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

fn statements_file(statements: &[String]) -> String {
    let mut contents = statements.join("\n");
    contents.push('\n');
    contents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_migration_name_shape() {
        let name = build_migration_name(
            "primary",
            &["create".to_string(), "Users".to_string()],
        );
        assert!(name.starts_with("migration_"));
        assert!(name.ends_with("_primary_create_Users"));
        // timestamp is 12 digits
        let stamp = &name["migration_".len().."migration_".len() + 12];
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_build_migration_name_caps_length() {
        let parts: Vec<String> = (0..40).map(|i| format!("very_long_column_name_{i}")).collect();
        let name = build_migration_name("primary", &parts);
        assert!(name.len() < NAME_LENGTH_CAP + 40);
        assert!(name.contains("_more"));
    }
}
