//! Schema comparator
//!
//! Diffs the declared table model against the observed database table. The
//! diff is computed once at construction; query and summary rendering only
//! read the frozen result.

use super::index::MySqlIndex;
use super::table::MySqlTable;
use crate::error::{Result, SyncError};

pub struct MySqlComparator {
    entity_table: MySqlTable,
    database_table: Option<MySqlTable>,
    /// Entity column names absent from the database, entity order
    pub new_columns: Vec<String>,
    /// Entity column names whose definition differs, entity order
    pub changed_columns: Vec<String>,
    /// Indexes to create: genuinely new ones plus the replacements for
    /// changed ones
    pub new_indexes: Vec<MySqlIndex>,
    /// Database indexes to drop: replaced ones plus those no longer declared
    pub deleted_indexes: Vec<MySqlIndex>,
    pub primary_key_changed: bool,
}

impl MySqlComparator {
    pub fn new(entity_table: MySqlTable, database_table: Option<MySqlTable>) -> Result<Self> {
        for pk in &entity_table.primary_keys {
            if entity_table.column_by_name(pk).is_none() {
                return Err(SyncError::inconsistency(
                    &entity_table.name,
                    format!("primary key column `{pk}` not found"),
                ));
            }
        }

        let mut new_columns = Vec::new();
        let mut changed_columns = Vec::new();
        let table_collation = database_table
            .as_ref()
            .and_then(|table| table.collation.clone());
        for entity_column in &entity_table.columns {
            match database_table
                .as_ref()
                .and_then(|table| table.column_by_name(&entity_column.name))
            {
                None => new_columns.push(entity_column.name.clone()),
                Some(db_column) => {
                    if !entity_column.equal_to(db_column, table_collation.as_deref()) {
                        changed_columns.push(entity_column.name.clone());
                    }
                }
            }
        }

        let mut new_indexes = Vec::new();
        let mut deleted_indexes = Vec::new();
        for entity_index in &entity_table.indexes {
            match database_table
                .as_ref()
                .and_then(|table| table.index_by_name(&entity_index.name))
            {
                None => new_indexes.push(entity_index.clone()),
                Some(db_index) => {
                    if entity_index.create_table_sql() != db_index.create_table_sql() {
                        new_indexes.push(entity_index.clone());
                        deleted_indexes.push(db_index.clone());
                    }
                }
            }
        }
        if let Some(db_table) = &database_table {
            for db_index in &db_table.indexes {
                if entity_table.index_by_name(&db_index.name).is_none() {
                    deleted_indexes.push(db_index.clone());
                }
            }
        }

        let primary_key_changed = database_table
            .as_ref()
            .is_some_and(|table| table.primary_keys != entity_table.primary_keys);

        Ok(Self {
            entity_table,
            database_table,
            new_columns,
            changed_columns,
            new_indexes,
            deleted_indexes,
            primary_key_changed,
        })
    }

    /// True when the database already matches the declaration
    pub fn is_empty(&self) -> bool {
        self.database_table.is_some()
            && self.new_columns.is_empty()
            && self.changed_columns.is_empty()
            && self.new_indexes.is_empty()
            && self.deleted_indexes.is_empty()
            && !self.primary_key_changed
    }

    /// Statements bringing the database forward to the declared state
    pub fn up_queries(&self) -> Result<Vec<String>> {
        let mut result = Vec::new();
        if self.database_table.is_some() {
            if let Some(alter) = self.entity_table.alter_sql(
                &self.new_columns,
                &self.changed_columns,
                &[],
                self.primary_key_changed,
            )? {
                result.push(alter);
            }
            for index in &self.deleted_indexes {
                result.push(index.drop_sql(&self.entity_table.name));
            }
            for index in &self.new_indexes {
                result.push(index.standalone_sql(&self.entity_table.name));
            }
        } else {
            result.push(self.entity_table.create_sql());
        }
        Ok(result)
    }

    /// Statements reverting the database to its observed state. Reverted
    /// MODIFY clauses render from the database table's own columns.
    pub fn down_queries(&self) -> Result<Vec<String>> {
        let mut result = Vec::new();
        match &self.database_table {
            Some(db_table) => {
                if let Some(alter) = db_table.alter_sql(
                    &[],
                    &self.changed_columns,
                    &self.new_columns,
                    self.primary_key_changed,
                )? {
                    result.push(alter);
                }
                for index in &self.new_indexes {
                    result.push(index.drop_sql(&self.entity_table.name));
                }
                for index in &self.deleted_indexes {
                    result.push(index.standalone_sql(&self.entity_table.name));
                }
            }
            None => result.push(self.entity_table.drop_sql()),
        }
        Ok(result)
    }

    /// Human-readable summary tokens for the migration file name
    pub fn summary_parts(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if self.database_table.is_none() {
            parts.push("create".to_string());
            parts.push(self.entity_table.name.clone());
            return parts;
        }
        parts.push("alter".to_string());
        parts.push(self.entity_table.name.clone());
        if !self.new_columns.is_empty() {
            parts.push("_add".to_string());
            parts.extend(self.new_columns.iter().cloned());
        }
        if !self.changed_columns.is_empty() {
            parts.push("_chg".to_string());
            parts.extend(self.changed_columns.iter().cloned());
        }
        if self.primary_key_changed {
            if self.entity_table.primary_keys.is_empty() {
                parts.push("_drp_pk".to_string());
            } else {
                parts.push("_chg_pk".to_string());
                parts.extend(self.entity_table.primary_keys.iter().cloned());
            }
        }

        // An index name present on both sides of the diff is a change; the
        // remainder split into plain additions and drops.
        let deleted_names: Vec<&str> =
            self.deleted_indexes.iter().map(|i| i.name.as_str()).collect();
        let new_names: Vec<&str> = self.new_indexes.iter().map(|i| i.name.as_str()).collect();
        let (changed, added): (Vec<&MySqlIndex>, Vec<&MySqlIndex>) = self
            .new_indexes
            .iter()
            .partition(|index| deleted_names.contains(&index.name.as_str()));
        let dropped: Vec<&MySqlIndex> = self
            .deleted_indexes
            .iter()
            .filter(|index| !new_names.contains(&index.name.as_str()))
            .collect();

        for (tag, group) in [("_add_idx", added), ("_chg_idx", changed), ("_drp_idx", dropped)] {
            if !group.is_empty() {
                parts.push(tag.to_string());
                parts.extend(
                    group
                        .iter()
                        .map(|index| index.sanitized_name(&self.entity_table.name)),
                );
            }
        }
        parts
    }
}
