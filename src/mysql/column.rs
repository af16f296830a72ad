//! MySQL column model
//!
//! A column is an immutable value object constructed either by the schema
//! builder (desired state) or by the DDL parser (observed state). It renders
//! its own definition fragment and knows how to compare itself structurally
//! against an observed column.

use super::types::MySqlColumnType;
use crate::schema::EntityColumnType;
use crate::value::SqlValue;
use serde::{Deserialize, Serialize};

/// One column definition
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MySqlColumn {
    pub name: String,
    pub sql_type: MySqlColumnType,
    pub size: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub is_nullable: bool,
    /// Whether the definition carries a DEFAULT clause at all;
    /// `default` is ignored when this is false
    pub has_default: bool,
    pub default: SqlValue,
    pub is_autoincrement: bool,
    /// Enum/set members; order is significant
    pub values: Option<Vec<String>>,
    pub unsigned: bool,
    /// Fractional-seconds precision for temporal types
    pub fsp: u32,
    pub collation: Option<String>,
    /// Raw `ON UPDATE` expression
    pub on_update: Option<String>,
}

impl MySqlColumn {
    pub fn new(name: impl Into<String>, sql_type: MySqlColumnType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            size: None,
            precision: None,
            scale: None,
            is_nullable: false,
            has_default: false,
            default: SqlValue::Null,
            is_autoincrement: false,
            values: None,
            unsigned: false,
            fsp: 0,
            collation: None,
            on_update: None,
        }
    }

    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn precision(mut self, precision: u32, scale: Option<u32>) -> Self {
        self.precision = Some(precision);
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: SqlValue) -> Self {
        self.has_default = true;
        self.default = value;
        self
    }

    #[must_use]
    pub fn autoincrement(mut self) -> Self {
        self.is_autoincrement = true;
        self
    }

    #[must_use]
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    #[must_use]
    pub fn fsp(mut self, fsp: u32) -> Self {
        self.fsp = fsp;
        self
    }

    #[must_use]
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }

    #[must_use]
    pub fn on_update(mut self, expr: impl Into<String>) -> Self {
        self.on_update = Some(expr.into());
        self
    }

    /// Render the canonical column-definition fragment:
    /// `` `name` TYPE[(args)][ UNSIGNED][ COLLATE c] NOT NULL|NULL[ DEFAULT v][ AUTO_INCREMENT][ ON UPDATE e]``
    pub fn sql(&self) -> String {
        let mut out = format!("`{}` {}", self.name, self.sql_type);

        if let Some(size) = self.size.filter(|s| *s > 0) {
            out.push_str(&format!("({size})"));
        } else if self.fsp > 0 {
            out.push_str(&format!("({})", self.fsp));
        } else if let Some(values) = &self.values {
            out.push_str(&format!("('{}')", values.join("','")));
        } else if let Some(precision) = self.precision {
            match self.scale {
                Some(scale) => out.push_str(&format!("({precision},{scale})")),
                None => out.push_str(&format!("({precision})")),
            }
        }
        if self.unsigned {
            out.push_str(" UNSIGNED");
        }
        if let Some(collation) = &self.collation {
            out.push_str(&format!(" COLLATE {collation}"));
        }
        out.push_str(if self.is_nullable { " NULL" } else { " NOT NULL" });
        if let Some(default) = self.format_default() {
            out.push_str(&format!(" DEFAULT {default}"));
            if default == "CURRENT_TIMESTAMP" && self.fsp > 0 {
                out.push_str(&format!("({})", self.fsp));
            }
        }
        if self.is_autoincrement {
            out.push_str(" AUTO_INCREMENT");
        }
        if let Some(on_update) = &self.on_update {
            out.push_str(&format!(" ON UPDATE {on_update}"));
        }
        out
    }

    /// Default-clause value text, or `None` when no clause should be emitted.
    ///
    /// Types that disallow literal defaults suppress the clause entirely,
    /// except that a nullable column still renders `DEFAULT NULL`.
    fn format_default(&self) -> Option<String> {
        if !self.has_default {
            return None;
        }
        if !self.sql_type.default_value_allowed() {
            return self.is_nullable.then(|| "NULL".to_string());
        }
        let rendered = match &self.default {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Int(_) | SqlValue::Float(_) => self.default.canonical(),
            SqlValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            SqlValue::Keyword(k) => k.clone(),
            SqlValue::Text(s) => {
                if s.starts_with('\'') {
                    s.clone()
                } else if s == "CURRENT_TIMESTAMP" || s == "NULL" {
                    s.clone()
                } else {
                    format!("'{s}'")
                }
            }
        };
        Some(rendered)
    }

    /// Structural equality against an observed database column.
    ///
    /// `table_collation` is the database table's default collation; a column
    /// declared without a collation equals an observed one whose collation is
    /// just that server-applied default.
    pub fn equal_to(&self, db: &MySqlColumn, table_collation: Option<&str>) -> bool {
        if self.sql() == db.sql() {
            return true;
        }
        if self.name != db.name
            || self.sql_type != db.sql_type
            || self.size != db.size
            || self.precision != db.precision
            || self.scale != db.scale
            || self.is_nullable != db.is_nullable
            || self.is_autoincrement != db.is_autoincrement
            || self.values != db.values
            || self.unsigned != db.unsigned
            || self.fsp != db.fsp
            || self.on_update != db.on_update
        {
            return false;
        }
        if self.collation != db.collation {
            let elided = self.collation.is_none() && db.collation.as_deref() == table_collation;
            if !elided {
                return false;
            }
        }
        if self.default != db.default {
            return false;
        }
        // Only the has-default flag can still differ at this point; with the
        // effective default and nullability already matched it is not a real
        // change.
        true
    }

    /// Classify this column into a portable entity type
    pub fn entity_type(&self) -> EntityColumnType {
        if self.sql_type == MySqlColumnType::Tinyint && self.size == Some(1) {
            return EntityColumnType::Boolean;
        }
        if self.sql_type.is_string() {
            return EntityColumnType::String;
        }
        if self.sql_type.is_integer() {
            return EntityColumnType::Integer;
        }
        if self.sql_type.is_float() {
            return EntityColumnType::Float;
        }
        if self.sql_type.is_datetime() {
            return EntityColumnType::Datetime;
        }
        if self.sql_type.is_enum() {
            return EntityColumnType::Enum;
        }
        match self.sql_type {
            MySqlColumnType::Json => EntityColumnType::Array,
            _ => EntityColumnType::String,
        }
    }
}
