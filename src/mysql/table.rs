//! MySQL table model
//!
//! Holds the full definition of one table and renders the three DDL
//! statements the comparator assembles migrations from.

use super::column::MySqlColumn;
use super::index::{MySqlIndex, MySqlIndexType};
use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};

pub const STORAGE_ENGINE_INNODB: &str = "InnoDB";
pub const DEFAULT_COLLATION: &str = "utf8mb4_unicode_ci";

/// One table definition. `indexes` excludes the primary key, which lives in
/// `primary_keys` as an ordered column-name list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MySqlTable {
    pub name: String,
    pub columns: Vec<MySqlColumn>,
    pub primary_keys: Vec<String>,
    pub indexes: Vec<MySqlIndex>,
    pub engine: Option<String>,
    pub collation: Option<String>,
}

impl MySqlTable {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<MySqlColumn>,
        primary_keys: Vec<String>,
        indexes: Vec<MySqlIndex>,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            primary_keys,
            indexes,
            engine: None,
            collation: None,
        }
    }

    #[must_use]
    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    #[must_use]
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }

    pub fn column_by_name(&self, name: &str) -> Option<&MySqlColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn index_by_name(&self, name: &str) -> Option<&MySqlIndex> {
        self.indexes.iter().find(|i| i.name == name)
    }

    /// Render the full CREATE TABLE statement as one line
    pub fn create_sql(&self) -> String {
        let mut rows: Vec<String> = self.columns.iter().map(MySqlColumn::sql).collect();
        if !self.primary_keys.is_empty() {
            let pk = MySqlIndex::new(MySqlIndexType::Primary, "", self.primary_keys.clone());
            rows.push(pk.create_table_sql());
        }
        for index in &self.indexes {
            rows.push(index.create_table_sql());
        }
        format!(
            "CREATE TABLE `{}` ({}) ENGINE={} COLLATE={};",
            self.name,
            rows.join(", "),
            self.engine.as_deref().unwrap_or(STORAGE_ENGINE_INNODB),
            self.collation.as_deref().unwrap_or(DEFAULT_COLLATION),
        )
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS `{}`;", self.name)
    }

    /// Render one ALTER TABLE statement covering the given changes, clauses
    /// in fixed order ADD, MODIFY, DROP COLUMN, primary-key swap. Returns
    /// `Ok(None)` when there is nothing to alter; a referenced column that
    /// this table does not carry is a schema inconsistency.
    pub fn alter_sql(
        &self,
        new_columns: &[String],
        changed_columns: &[String],
        deleted_columns: &[String],
        primary_key_changed: bool,
    ) -> Result<Option<String>> {
        let mut clauses = Vec::new();
        for name in new_columns {
            let column = self.column_by_name(name).ok_or_else(|| {
                SyncError::inconsistency(&self.name, format!("column `{name}` not found"))
            })?;
            clauses.push(format!("ADD {}", column.sql()));
        }
        for name in changed_columns {
            let column = self.column_by_name(name).ok_or_else(|| {
                SyncError::inconsistency(&self.name, format!("column `{name}` not found"))
            })?;
            clauses.push(format!("MODIFY {}", column.sql()));
        }
        for name in deleted_columns {
            clauses.push(format!("DROP COLUMN `{name}`"));
        }
        if primary_key_changed {
            clauses.push("DROP PRIMARY KEY".to_string());
            if !self.primary_keys.is_empty() {
                clauses.push(format!("ADD PRIMARY KEY(`{}`)", self.primary_keys.join("`,`")));
            }
        }
        if clauses.is_empty() {
            return Ok(None);
        }
        Ok(Some(format!(
            "ALTER TABLE `{}` {};",
            self.name,
            clauses.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mysql::types::MySqlColumnType;
    use crate::value::SqlValue;

    fn sample_table() -> MySqlTable {
        let columns = vec![
            MySqlColumn::new("id", MySqlColumnType::Int)
                .size(11)
                .autoincrement(),
            MySqlColumn::new("name", MySqlColumnType::Varchar).size(255),
            MySqlColumn::new("created_at", MySqlColumnType::Timestamp)
                .fsp(6)
                .default_value(SqlValue::keyword("CURRENT_TIMESTAMP")),
        ];
        let indexes = vec![MySqlIndex::new(
            MySqlIndexType::Unique,
            "Foo_unq_name",
            vec!["name".to_string()],
        )];
        MySqlTable::new("Foo", columns, vec!["id".to_string()], indexes)
    }

    #[test]
    fn test_create_sql() {
        assert_eq!(
            sample_table().create_sql(),
            "CREATE TABLE `Foo` (`id` INT(11) NOT NULL AUTO_INCREMENT, \
             `name` VARCHAR(255) NOT NULL, \
             `created_at` TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6), \
             PRIMARY KEY (`id`), \
             UNIQUE KEY `Foo_unq_name` (`name`)) \
             ENGINE=InnoDB COLLATE=utf8mb4_unicode_ci;"
        );
    }

    #[test]
    fn test_drop_sql() {
        assert_eq!(sample_table().drop_sql(), "DROP TABLE IF EXISTS `Foo`;");
    }

    #[test]
    fn test_alter_sql_orders_clauses() {
        let table = sample_table();
        let sql = table
            .alter_sql(
                &["created_at".to_string()],
                &["name".to_string()],
                &["legacy".to_string()],
                false,
            )
            .unwrap()
            .unwrap();
        assert_eq!(
            sql,
            "ALTER TABLE `Foo` ADD `created_at` TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6), \
             MODIFY `name` VARCHAR(255) NOT NULL, DROP COLUMN `legacy`;"
        );
    }

    #[test]
    fn test_alter_sql_primary_key_swap() {
        let table = sample_table();
        let sql = table.alter_sql(&[], &[], &[], true).unwrap().unwrap();
        assert_eq!(sql, "ALTER TABLE `Foo` DROP PRIMARY KEY, ADD PRIMARY KEY(`id`);");
    }

    #[test]
    fn test_alter_sql_empty() {
        let table = sample_table();
        assert!(table.alter_sql(&[], &[], &[], false).unwrap().is_none());
    }

    #[test]
    fn test_alter_sql_unknown_column() {
        let table = sample_table();
        let err = table
            .alter_sql(&["missing".to_string()], &[], &[], false)
            .unwrap_err();
        assert!(matches!(err, SyncError::SchemaInconsistency { .. }));
    }

    #[test]
    fn test_lookups() {
        let table = sample_table();
        assert!(table.column_by_name("name").is_some());
        assert!(table.column_by_name("nope").is_none());
        assert!(table.index_by_name("Foo_unq_name").is_some());
    }
}
