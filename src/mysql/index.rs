//! MySQL index model
//!
//! Covers the primary key and every secondary index kind we generate or
//! parse. An index renders three SQL shapes: the inline clause inside
//! CREATE TABLE, a standalone CREATE statement, and a DROP statement.

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};

// ============================================================================
// Index Type
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MySqlIndexType {
    Index,
    Primary,
    Unique,
    Fulltext,
}

impl MySqlIndexType {
    pub fn parse_token(token: &str) -> Result<Self> {
        match token.to_ascii_uppercase().as_str() {
            "INDEX" | "KEY" => Ok(Self::Index),
            "PRIMARY" => Ok(Self::Primary),
            "UNIQUE" => Ok(Self::Unique),
            "FULLTEXT" => Ok(Self::Fulltext),
            other => Err(SyncError::parse(format!("unknown index type `{other}`"))),
        }
    }
}

// ============================================================================
// Index
// ============================================================================

/// One index definition.
///
/// `order` keeps per-column sort directions for DESC-bearing indexes. When
/// present it drives both name derivation and column-list rendering, and it
/// replaces `columns` as the rendered list, so callers must populate it for
/// every column or for none; [`MySqlIndex::merge_order`] builds that shape.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MySqlIndex {
    pub index_type: MySqlIndexType,
    /// Empty for the primary key
    pub name: String,
    pub columns: Vec<String>,
    pub is_unique: bool,
    pub order: Vec<(String, String)>,
}

impl MySqlIndex {
    pub fn new(
        index_type: MySqlIndexType,
        name: impl Into<String>,
        columns: Vec<String>,
    ) -> Self {
        let is_unique = matches!(index_type, MySqlIndexType::Unique | MySqlIndexType::Primary);
        Self {
            index_type,
            name: name.into(),
            columns,
            is_unique,
            order: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: Vec<(String, String)>) -> Self {
        self.order = order;
        self
    }

    /// Combine a column list with per-column sort tokens into the all-or-
    /// nothing `order` shape: one explicit direction makes every column
    /// ordered, the unmarked ones defaulting to `ASC`. No direction at all
    /// yields an empty order.
    pub fn merge_order(columns: &[String], dirs: Vec<Option<String>>) -> Vec<(String, String)> {
        if dirs.iter().all(Option::is_none) {
            return Vec::new();
        }
        columns
            .iter()
            .cloned()
            .zip(dirs.into_iter().map(|dir| dir.unwrap_or_else(|| "ASC".to_string())))
            .collect()
    }

    /// Derive the conventional index name: `{table}_{unq|idx}_{cols…}`,
    /// lowercase. Sort-bearing indexes interleave the direction tokens.
    pub fn derive_name(
        table: &str,
        is_unique: bool,
        columns: &[String],
        order: &[(String, String)],
    ) -> String {
        let mut parts = vec![table.to_string(), if is_unique { "unq" } else { "idx" }.to_string()];
        if order.is_empty() {
            parts.extend(columns.iter().map(|c| c.to_lowercase()));
        } else {
            for (column, dir) in order {
                parts.push(column.to_lowercase());
                parts.push(dir.to_lowercase());
            }
        }
        parts.join("_")
    }

    fn keyword(&self) -> &'static str {
        match self.index_type {
            MySqlIndexType::Index => "KEY",
            MySqlIndexType::Primary => "PRIMARY KEY",
            MySqlIndexType::Unique => "UNIQUE KEY",
            MySqlIndexType::Fulltext => "FULLTEXT KEY",
        }
    }

    fn columns_sql(&self) -> String {
        let rendered: Vec<String> = if self.order.is_empty() {
            self.columns.iter().map(|c| format!("`{c}`")).collect()
        } else {
            self.order
                .iter()
                .map(|(column, dir)| format!("`{column}` {dir}"))
                .collect()
        };
        format!("({})", rendered.join(","))
    }

    /// Inline clause for CREATE TABLE: `KEY `name` (`a`,`b`)`
    pub fn create_table_sql(&self) -> String {
        let mut parts = vec![self.keyword().to_string()];
        if !self.name.is_empty() {
            parts.push(format!("`{}`", self.name));
        }
        parts.push(self.columns_sql());
        parts.join(" ")
    }

    /// Standalone statement: `CREATE INDEX `name` ON `table` (`a`,`b`);`
    pub fn standalone_sql(&self, table: &str) -> String {
        let keyword = match self.index_type {
            MySqlIndexType::Index => "CREATE INDEX",
            MySqlIndexType::Primary => "CREATE PRIMARY KEY",
            MySqlIndexType::Unique => "CREATE UNIQUE KEY",
            MySqlIndexType::Fulltext => "CREATE FULLTEXT KEY",
        };
        let mut parts = vec![keyword.to_string()];
        if !self.name.is_empty() && self.index_type != MySqlIndexType::Primary {
            parts.push(format!("`{}`", self.name));
        }
        parts.push(format!("ON `{table}`"));
        parts.push(self.columns_sql());
        format!("{};", parts.join(" "))
    }

    pub fn drop_sql(&self, table: &str) -> String {
        format!("DROP INDEX `{}` ON `{}`;", self.name, table)
    }

    /// Index name with the table name and `idx`/`unq` tokens stripped, for
    /// use in migration-file summaries.
    pub fn sanitized_name(&self, table: &str) -> String {
        let mut name = self.name.clone();
        let table_lower = table.to_lowercase();
        for token in [table, table_lower.as_str(), "idx_", "unq_"] {
            name = name.replace(token, "");
        }
        let mut out = String::with_capacity(name.len());
        for ch in name.chars() {
            if ch == '_' && out.ends_with('_') {
                continue;
            }
            out.push(ch);
        }
        out.trim_matches('_').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_derive_name() {
        assert_eq!(
            MySqlIndex::derive_name("Users", false, &cols(&["name", "created_at"]), &[]),
            "Users_idx_name_created_at"
        );
        assert_eq!(
            MySqlIndex::derive_name("Users", true, &cols(&["email"]), &[]),
            "Users_unq_email"
        );
        let order = vec![("created_at".to_string(), "DESC".to_string())];
        assert_eq!(
            MySqlIndex::derive_name("Users", false, &cols(&["created_at"]), &order),
            "Users_idx_created_at_desc"
        );
    }

    #[test]
    fn test_merge_order() {
        let columns = cols(&["a", "b"]);
        assert!(MySqlIndex::merge_order(&columns, vec![None, None]).is_empty());
        assert_eq!(
            MySqlIndex::merge_order(&columns, vec![None, Some("DESC".to_string())]),
            vec![
                ("a".to_string(), "ASC".to_string()),
                ("b".to_string(), "DESC".to_string()),
            ]
        );
    }

    #[test]
    fn test_create_table_sql() {
        let idx = MySqlIndex::new(
            MySqlIndexType::Index,
            "FooI_idx_name_created_at",
            cols(&["name", "created_at"]),
        );
        assert_eq!(
            idx.create_table_sql(),
            "KEY `FooI_idx_name_created_at` (`name`,`created_at`)"
        );

        let pk = MySqlIndex::new(MySqlIndexType::Primary, "", cols(&["id"]));
        assert_eq!(pk.create_table_sql(), "PRIMARY KEY (`id`)");

        let unq = MySqlIndex::new(MySqlIndexType::Unique, "FooI_unq_name", cols(&["name"]));
        assert_eq!(unq.create_table_sql(), "UNIQUE KEY `FooI_unq_name` (`name`)");
    }

    #[test]
    fn test_create_table_sql_with_order() {
        let idx = MySqlIndex::new(
            MySqlIndexType::Index,
            "FooI_idx_created_at_desc",
            cols(&["created_at"]),
        )
        .with_order(vec![("created_at".to_string(), "DESC".to_string())]);
        assert_eq!(
            idx.create_table_sql(),
            "KEY `FooI_idx_created_at_desc` (`created_at` DESC)"
        );
    }

    #[test]
    fn test_standalone_sql() {
        let idx = MySqlIndex::new(
            MySqlIndexType::Index,
            "FooI_idx_name_created_at",
            cols(&["name", "created_at"]),
        );
        assert_eq!(
            idx.standalone_sql("FooI"),
            "CREATE INDEX `FooI_idx_name_created_at` ON `FooI` (`name`,`created_at`);"
        );

        let unq = MySqlIndex::new(MySqlIndexType::Unique, "FooI_unq_name", cols(&["name"]));
        assert_eq!(
            unq.standalone_sql("FooI"),
            "CREATE UNIQUE KEY `FooI_unq_name` ON `FooI` (`name`);"
        );
    }

    #[test]
    fn test_drop_sql() {
        let idx = MySqlIndex::new(MySqlIndexType::Index, "FooI_idx_created_at", cols(&["created_at"]));
        assert_eq!(idx.drop_sql("FooI"), "DROP INDEX `FooI_idx_created_at` ON `FooI`;");
    }

    #[test]
    fn test_sanitized_name() {
        let idx = MySqlIndex::new(
            MySqlIndexType::Index,
            "FooI_idx_name_created_at",
            cols(&["name", "created_at"]),
        );
        assert_eq!(idx.sanitized_name("FooI"), "name_created_at");

        let unq = MySqlIndex::new(MySqlIndexType::Unique, "FooI_unq_name", cols(&["name"]));
        assert_eq!(unq.sanitized_name("FooI"), "name");

        let custom = MySqlIndex::new(MySqlIndexType::Index, "my_custom_index", cols(&["a"]));
        assert_eq!(custom.sanitized_name("FooI"), "my_custom_index");
    }
}
