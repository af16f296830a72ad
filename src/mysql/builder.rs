//! Schema builder: declared table specs to MySQL table models
//!
//! Applies the MySQL defaulting rules: strings become `VARCHAR(255)`, bools
//! `TINYINT(1)`, timestamps carry fractional seconds, and a datetime default
//! captured "now" collapses to `CURRENT_TIMESTAMP`.

use super::column::MySqlColumn;
use super::index::{MySqlIndex, MySqlIndexType};
use super::table::MySqlTable;
use super::types::MySqlColumnType;
use crate::error::{Result, SyncError};
use crate::schema::{ColumnKind, ColumnSpec, DefaultSpec, IndexSpec, TableSpec};
use crate::value::SqlValue;
use chrono::Utc;

/// Build the MySQL table model for a declared spec
pub fn build_table(spec: &TableSpec) -> Result<MySqlTable> {
    let mut columns = Vec::with_capacity(spec.columns.len());
    for column_spec in &spec.columns {
        if column_spec.skip {
            continue;
        }
        columns.push(build_column(column_spec)?);
    }
    for pk in &spec.primary_keys {
        if !columns.iter().any(|c| &c.name == pk) {
            return Err(SyncError::inconsistency(
                &spec.name,
                format!("primary key column `{pk}` not found"),
            ));
        }
    }
    let mut indexes = Vec::with_capacity(spec.indexes.len());
    for index_spec in &spec.indexes {
        indexes.push(build_index(&spec.name, index_spec)?);
    }
    Ok(MySqlTable::new(
        &spec.name,
        columns,
        spec.primary_keys.clone(),
        indexes,
    ))
}

fn build_column(spec: &ColumnSpec) -> Result<MySqlColumn> {
    let sql_type = match &spec.overrides.sql_type {
        Some(token) => MySqlColumnType::parse_token(token)?,
        None => MySqlColumnType::from_kind(&spec.kind),
    };

    let mut column = MySqlColumn::new(&spec.name, sql_type);
    column.size = column_size(spec);
    column.precision = spec.overrides.precision;
    column.scale = spec.overrides.scale;
    column.is_nullable = spec.nullable;
    column.is_autoincrement = spec.autoincrement;
    column.collation = spec.overrides.collation.clone();
    if sql_type == MySqlColumnType::Timestamp && spec.overrides.size != Some(4) {
        column.fsp = 6;
    }
    if let ColumnKind::Enum(values) = &spec.kind {
        column.values = Some(values.clone());
    }
    if let Some(default) = &spec.default {
        column.has_default = true;
        column.default = render_default(default);
    }
    Ok(column)
}

fn column_size(spec: &ColumnSpec) -> Option<u32> {
    if let Some(size) = spec.overrides.size.filter(|s| *s > 0) {
        return Some(size);
    }
    match spec.kind {
        ColumnKind::Bool => Some(1),
        ColumnKind::String => Some(255),
        _ => None,
    }
}

fn render_default(default: &DefaultSpec) -> SqlValue {
    match default {
        DefaultSpec::Null => SqlValue::Null,
        DefaultSpec::Int(v) => SqlValue::Int(*v),
        DefaultSpec::Float(v) => SqlValue::Float(*v),
        DefaultSpec::Bool(v) => SqlValue::Int(i64::from(*v)),
        DefaultSpec::Text(s) => SqlValue::text(s.clone()),
        DefaultSpec::Expression(e) => SqlValue::keyword(e.clone()),
        DefaultSpec::Timestamp(at) => {
            // A default captured as the declaration was evaluated means
            // "now", not that concrete instant.
            let delta = Utc::now().timestamp() - at.timestamp();
            if (0..=1).contains(&delta) {
                SqlValue::keyword("CURRENT_TIMESTAMP")
            } else {
                SqlValue::text(at.format("%Y-%m-%d %H:%M:%S").to_string())
            }
        }
    }
}

fn build_index(table: &str, spec: &IndexSpec) -> Result<MySqlIndex> {
    let mut dirs = Vec::with_capacity(spec.columns.len());
    let mut columns = Vec::with_capacity(spec.columns.len());
    for column in &spec.columns {
        columns.push(column.name.clone());
        match &column.order {
            Some(dir) => {
                let dir = dir.to_ascii_uppercase();
                if dir != "ASC" && dir != "DESC" {
                    return Err(SyncError::parse(format!(
                        "unknown order `{dir}` in index column `{}`",
                        column.name
                    )));
                }
                dirs.push(Some(dir));
            }
            None => dirs.push(None),
        }
    }
    // One explicit direction makes the whole list ordered; the rest default
    // to ASC so every column stays in the rendered list and the name.
    let order = MySqlIndex::merge_order(&columns, dirs);
    let name = match &spec.name {
        Some(name) => name.clone(),
        None => MySqlIndex::derive_name(table, spec.unique, &columns, &order),
    };
    let index_type = if spec.unique {
        MySqlIndexType::Unique
    } else {
        MySqlIndexType::Index
    };
    Ok(MySqlIndex::new(index_type, name, columns).with_order(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnSpec;

    #[test]
    fn test_string_defaults_to_varchar_255() {
        let spec = TableSpec::new("Foo").column(ColumnSpec::new("name", ColumnKind::String));
        let table = build_table(&spec).unwrap();
        assert_eq!(table.columns[0].sql(), "`name` VARCHAR(255) NOT NULL");
    }

    #[test]
    fn test_bool_becomes_tinyint_1() {
        let spec = TableSpec::new("Foo").column(
            ColumnSpec::new("active", ColumnKind::Bool).default_value(DefaultSpec::Bool(true)),
        );
        let table = build_table(&spec).unwrap();
        assert_eq!(table.columns[0].sql(), "`active` TINYINT(1) NOT NULL DEFAULT 1");
    }

    #[test]
    fn test_timestamp_gets_fsp_6() {
        let spec = TableSpec::new("Foo").column(
            ColumnSpec::new("created_at", ColumnKind::Datetime)
                .default_value(DefaultSpec::now()),
        );
        let table = build_table(&spec).unwrap();
        assert_eq!(
            table.columns[0].sql(),
            "`created_at` TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6)"
        );
    }

    #[test]
    fn test_timestamp_size_4_disables_fsp() {
        let spec = TableSpec::new("Foo")
            .column(ColumnSpec::new("created_at", ColumnKind::Datetime).size(4));
        let table = build_table(&spec).unwrap();
        assert_eq!(table.columns[0].fsp, 0);
    }

    #[test]
    fn test_stale_timestamp_default_stays_literal() {
        let at = chrono::DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let spec = TableSpec::new("Foo").column(
            ColumnSpec::new("seen_at", ColumnKind::Datetime)
                .default_value(DefaultSpec::Timestamp(at)),
        );
        let table = build_table(&spec).unwrap();
        assert_eq!(
            table.columns[0].default,
            SqlValue::text("2020-01-01 00:00:00")
        );
    }

    #[test]
    fn test_skip_column_excluded() {
        let spec = TableSpec::new("Foo")
            .column(ColumnSpec::new("id", ColumnKind::Integer))
            .column(ColumnSpec::new("cache", ColumnKind::Object).skip());
        let table = build_table(&spec).unwrap();
        assert_eq!(table.columns.len(), 1);
    }

    #[test]
    fn test_explicit_sql_type_override() {
        let spec = TableSpec::new("Foo")
            .column(ColumnSpec::new("body", ColumnKind::String).sql_type("MEDIUMTEXT"));
        let table = build_table(&spec).unwrap();
        assert_eq!(table.columns[0].sql_type, MySqlColumnType::Mediumtext);
        // the string-kind default size still applies
        assert_eq!(table.columns[0].size, Some(255));
    }

    #[test]
    fn test_unknown_sql_type_rejected() {
        let spec = TableSpec::new("Foo")
            .column(ColumnSpec::new("x", ColumnKind::String).sql_type("WIDGET"));
        assert!(matches!(build_table(&spec), Err(SyncError::Parse(_))));
    }

    #[test]
    fn test_unknown_primary_key_rejected() {
        let spec = TableSpec::new("Foo")
            .column(ColumnSpec::new("id", ColumnKind::Integer))
            .primary_key(["missing"]);
        assert!(matches!(
            build_table(&spec),
            Err(SyncError::SchemaInconsistency { .. })
        ));
    }

    #[test]
    fn test_index_name_derived() {
        let spec = TableSpec::new("Users")
            .column(ColumnSpec::new("email", ColumnKind::String))
            .index(IndexSpec::on(["email"]).unique());
        let table = build_table(&spec).unwrap();
        assert_eq!(table.indexes[0].name, "Users_unq_email");
    }

    #[test]
    fn test_mixed_order_index_keeps_every_column() {
        let spec = TableSpec::new("Foo")
            .column(ColumnSpec::new("a", ColumnKind::Integer))
            .column(ColumnSpec::new("b", ColumnKind::Integer))
            .index(IndexSpec::on(["a"]).ordered("b", "DESC"));
        let table = build_table(&spec).unwrap();
        let index = &table.indexes[0];
        assert_eq!(index.columns, vec!["a", "b"]);
        assert_eq!(
            index.order,
            vec![
                ("a".to_string(), "ASC".to_string()),
                ("b".to_string(), "DESC".to_string()),
            ]
        );
        assert_eq!(index.name, "Foo_idx_a_asc_b_desc");
        assert_eq!(
            index.create_table_sql(),
            "KEY `Foo_idx_a_asc_b_desc` (`a` ASC,`b` DESC)"
        );
    }

    #[test]
    fn test_index_bad_order_rejected() {
        let spec = TableSpec::new("Users")
            .column(ColumnSpec::new("email", ColumnKind::String))
            .index(IndexSpec::on(Vec::<String>::new()).ordered("email", "SIDEWAYS"));
        assert!(matches!(build_table(&spec), Err(SyncError::Parse(_))));
    }

    #[test]
    fn test_enum_values_flow_through() {
        let spec = TableSpec::new("Foo").column(ColumnSpec::new(
            "status",
            ColumnKind::Enum(vec!["on".into(), "off".into()]),
        ));
        let table = build_table(&spec).unwrap();
        assert_eq!(table.columns[0].sql(), "`status` ENUM('on','off') NOT NULL");
    }
}
