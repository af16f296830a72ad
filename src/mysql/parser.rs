//! CREATE TABLE parser
//!
//! Turns the DDL text returned by `SHOW CREATE TABLE` back into the table
//! model. This is intentionally a small, tolerant parser (not a full SQL
//! parser): it handles the statement shapes MySQL itself prints, which is
//! all the comparator ever sees.

use super::column::MySqlColumn;
use super::index::{MySqlIndex, MySqlIndexType};
use super::table::MySqlTable;
use super::types::MySqlColumnType;
use crate::error::{Result, SyncError};
use crate::value::SqlValue;
use regex::Regex;
use std::sync::LazyLock;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?`?([^`\s(]+)`?\s*\(")
        .unwrap()
});
static COLUMN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^`([^`]+)`\s+([A-Za-z]+)(?:\s*\(([^)]*)\))?(.*)$").unwrap()
});
static PRIMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^PRIMARY\s+KEY\s*\((.*)\)$").unwrap());
static INDEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(?:(UNIQUE|FULLTEXT)\s+)?(?:KEY|INDEX)\s+`([^`]+)`\s*\((.*)\)$").unwrap()
});
static DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bDEFAULT\s+('(?:[^']|'')*'|[A-Za-z_]+(?:\(\d+\))?|-?\d+(?:\.\d+)?)")
        .unwrap()
});
static COLLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCOLLATE\s+(\w+)").unwrap());
static ON_UPDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bON\s+UPDATE\s+([A-Za-z_]+(?:\(\d+\))?)").unwrap()
});
static ENGINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bENGINE\s*=\s*(\w+)").unwrap());
static TABLE_COLLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCOLLATE\s*=\s*(\w+)").unwrap());

/// Parses one table's `SHOW CREATE TABLE` output
#[derive(Debug)]
pub struct MySqlParser {
    table: String,
    ddl: String,
}

impl MySqlParser {
    pub fn new(table: impl Into<String>, ddl: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ddl: ddl.into(),
        }
    }

    /// Parse the stored DDL. Empty input means the table does not exist yet
    /// and yields `Ok(None)`.
    pub fn parse(&self) -> Result<Option<MySqlTable>> {
        let ddl = self.ddl.trim();
        if ddl.is_empty() {
            return Ok(None);
        }
        let header = HEADER_RE
            .captures(ddl)
            .ok_or_else(|| SyncError::parse(format!("not a CREATE TABLE statement: `{ddl}`")))?;
        let parsed_name = header.get(1).map_or("", |m| m.as_str());
        if parsed_name != self.table {
            return Err(SyncError::parse(format!(
                "expected table `{}`, DDL defines `{parsed_name}`",
                self.table
            )));
        }

        let open = header.get(0).map_or(0, |m| m.end() - 1);
        let close = matching_paren(ddl, open)
            .ok_or_else(|| SyncError::parse("unbalanced parentheses in CREATE TABLE"))?;
        let body = &ddl[open + 1..close];
        let trailer = &ddl[close + 1..];

        let mut columns = Vec::new();
        let mut primary_keys = Vec::new();
        let mut indexes = Vec::new();
        for item in split_top_level(body) {
            let item = normalize_item(item);
            if item.is_empty() {
                continue;
            }
            if let Some(caps) = PRIMARY_RE.captures(&item) {
                let (cols, _) = parse_index_columns(&caps[1])?;
                primary_keys = cols;
            } else if let Some(caps) = INDEX_RE.captures(&item) {
                indexes.push(parse_index(&caps)?);
            } else if item.starts_with('`') {
                columns.push(parse_column(&item)?);
            } else {
                return Err(SyncError::parse(format!(
                    "unrecognized table definition item: `{item}`"
                )));
            }
        }

        let mut table = MySqlTable::new(&self.table, columns, primary_keys, indexes);
        if let Some(caps) = ENGINE_RE.captures(trailer) {
            table = table.engine(&caps[1]);
        }
        if let Some(caps) = TABLE_COLLATE_RE.captures(trailer) {
            table = table.collation(&caps[1]);
        }
        Ok(Some(table))
    }
}

/// Index of the `)` closing the `(` at `open`, skipping quoted runs
fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for (i, ch) in s[open..].char_indices().map(|(i, ch)| (open + i, ch)) {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '`' => quote = Some(ch),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

/// Split on top-level commas, outside parentheses and quoted runs
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    for (i, ch) in body.char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '`' => quote = Some(ch),
                '(' => depth += 1,
                ')' => depth -= 1,
                ',' if depth == 0 => {
                    parts.push(&body[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    parts.push(&body[start..]);
    parts
}

/// Collapse a possibly multi-line item to one whitespace-normalized line
fn normalize_item(item: &str) -> String {
    item.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_index(caps: &regex::Captures<'_>) -> Result<MySqlIndex> {
    let index_type = match caps.get(1).map(|m| m.as_str().to_ascii_uppercase()) {
        Some(modifier) => MySqlIndexType::parse_token(&modifier)?,
        None => MySqlIndexType::Index,
    };
    let name = caps[2].to_string();
    let (columns, order) = parse_index_columns(&caps[3])?;
    Ok(MySqlIndex::new(index_type, name, columns).with_order(order))
}

type IndexColumns = (Vec<String>, Vec<(String, String)>);

/// Parse an index column list: `` `a` DESC,`b` ``
fn parse_index_columns(list: &str) -> Result<IndexColumns> {
    let mut columns = Vec::new();
    let mut dirs = Vec::new();
    for item in split_top_level(list) {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let rest = item
            .strip_prefix('`')
            .ok_or_else(|| SyncError::parse(format!("malformed index column `{item}`")))?;
        let end = rest
            .find('`')
            .ok_or_else(|| SyncError::parse(format!("malformed index column `{item}`")))?;
        let name = rest[..end].to_string();
        let tail = rest[end + 1..].trim();
        if tail.is_empty() {
            dirs.push(None);
        } else {
            let dir = tail.to_ascii_uppercase();
            if dir != "ASC" && dir != "DESC" {
                return Err(SyncError::parse(format!(
                    "unknown sort token `{tail}` in index column `{name}`"
                )));
            }
            dirs.push(Some(dir));
        }
        columns.push(name);
    }
    // SHOW CREATE TABLE prints mixed lists like (`a` DESC,`b`); the unmarked
    // columns are implicitly ASC and must not drop out of the order.
    let order = MySqlIndex::merge_order(&columns, dirs);
    Ok((columns, order))
}

fn parse_column(item: &str) -> Result<MySqlColumn> {
    let caps = COLUMN_RE
        .captures(item)
        .ok_or_else(|| SyncError::parse(format!("malformed column definition `{item}`")))?;
    let name = caps[1].to_string();
    let sql_type = MySqlColumnType::parse_token(&caps[2])?;
    let args = caps.get(3).map(|m| m.as_str());
    let rest = caps.get(4).map_or("", |m| m.as_str());
    let rest_upper = rest.to_ascii_uppercase();

    let mut column = MySqlColumn::new(name, sql_type);
    if let Some(args) = args {
        apply_type_args(&mut column, args)?;
    }
    column.unsigned = rest_upper.contains("UNSIGNED");
    column.is_nullable = !rest_upper.contains("NOT NULL");
    column.is_autoincrement = rest_upper.contains("AUTO_INCREMENT");
    if let Some(collate) = COLLATE_RE.captures(rest) {
        column.collation = Some(collate[1].to_string());
    }
    if let Some(on_update) = ON_UPDATE_RE.captures(rest) {
        column.on_update = Some(on_update[1].to_string());
    }
    if let Some(default) = DEFAULT_RE.captures(rest) {
        column.has_default = true;
        column.default = parse_default(&default[1], sql_type);
    }
    Ok(column)
}

/// Interpret the parenthesized type arguments by type family: fractional
/// seconds for temporal types, precision/scale for numeric ones, the member
/// list for enums, plain size otherwise.
fn apply_type_args(column: &mut MySqlColumn, args: &str) -> Result<()> {
    let args = args.trim();
    if args.is_empty() {
        return Ok(());
    }
    if column.sql_type.is_enum() {
        let values = split_top_level(args)
            .into_iter()
            .map(|v| v.trim().trim_matches('\'').to_string())
            .collect();
        column.values = Some(values);
        return Ok(());
    }
    if column.sql_type.is_datetime() {
        column.fsp = parse_number(args, column)?;
        return Ok(());
    }
    if column.sql_type.is_float() {
        let mut parts = args.splitn(2, ',');
        if let Some(precision) = parts.next() {
            column.precision = Some(parse_number(precision.trim(), column)?);
        }
        if let Some(scale) = parts.next() {
            column.scale = Some(parse_number(scale.trim(), column)?);
        }
        return Ok(());
    }
    column.size = Some(parse_number(args, column)?);
    Ok(())
}

fn parse_number(token: &str, column: &MySqlColumn) -> Result<u32> {
    token.parse().map_err(|_| {
        SyncError::parse(format!(
            "bad numeric argument `{token}` for column `{}`",
            column.name
        ))
    })
}

/// Decode a DEFAULT token, coercing numeric literals by type family so the
/// parsed column compares cleanly against a built one.
fn parse_default(token: &str, sql_type: MySqlColumnType) -> SqlValue {
    if token.starts_with('\'') {
        return SqlValue::text(token.trim_matches('\''));
    }
    let upper = token.to_ascii_uppercase();
    if upper == "NULL" {
        return SqlValue::Null;
    }
    if upper.starts_with("CURRENT_TIMESTAMP") {
        return SqlValue::keyword("CURRENT_TIMESTAMP");
    }
    if sql_type.is_integer() {
        if let Ok(v) = token.parse::<i64>() {
            return SqlValue::Int(v);
        }
    }
    if sql_type.is_float() {
        if let Ok(v) = token.parse::<f64>() {
            return SqlValue::Float(v);
        }
    }
    SqlValue::text(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_is_none() {
        assert!(MySqlParser::new("Foo", "").parse().unwrap().is_none());
        assert!(MySqlParser::new("Foo", "  \n ").parse().unwrap().is_none());
    }

    #[test]
    fn test_parse_full_table() {
        let ddl = r"CREATE TABLE `Foo` (
            `id` int(11) unsigned NOT NULL AUTO_INCREMENT,
            `name` varchar(255) COLLATE utf8mb4_unicode_ci NOT NULL,
            `price` decimal(10,2) NOT NULL DEFAULT '0.00',
            `status` enum('active','inactive') NOT NULL DEFAULT 'active',
            `created_at` timestamp(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
            `updated_at` timestamp NULL DEFAULT NULL ON UPDATE CURRENT_TIMESTAMP,
            PRIMARY KEY (`id`),
            UNIQUE KEY `Foo_unq_name` (`name`),
            KEY `Foo_idx_status` (`status`)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci";

        let table = MySqlParser::new("Foo", ddl).parse().unwrap().unwrap();
        assert_eq!(table.name, "Foo");
        assert_eq!(table.primary_keys, vec!["id"]);
        assert_eq!(table.engine.as_deref(), Some("InnoDB"));
        assert_eq!(table.collation.as_deref(), Some("utf8mb4_unicode_ci"));
        assert_eq!(table.indexes.len(), 2);

        let id = table.column_by_name("id").unwrap();
        assert!(id.is_autoincrement && id.unsigned && !id.is_nullable);
        assert_eq!(id.size, Some(11));

        let name = table.column_by_name("name").unwrap();
        assert_eq!(name.collation.as_deref(), Some("utf8mb4_unicode_ci"));
        assert!(!name.has_default);

        let price = table.column_by_name("price").unwrap();
        assert_eq!((price.precision, price.scale), (Some(10), Some(2)));
        assert_eq!(price.default, SqlValue::Float(0.0));

        let status = table.column_by_name("status").unwrap();
        assert_eq!(
            status.values,
            Some(vec!["active".to_string(), "inactive".to_string()])
        );
        assert_eq!(status.default, SqlValue::text("active"));

        let created = table.column_by_name("created_at").unwrap();
        assert_eq!(created.fsp, 6);
        assert_eq!(created.default, SqlValue::keyword("CURRENT_TIMESTAMP"));

        let updated = table.column_by_name("updated_at").unwrap();
        assert!(updated.is_nullable && updated.has_default);
        assert!(updated.default.is_null());
        assert_eq!(updated.on_update.as_deref(), Some("CURRENT_TIMESTAMP"));
    }

    #[test]
    fn test_parse_distinguishes_missing_default_from_default_null() {
        let ddl = "CREATE TABLE `T` (`a` varchar(10), `b` varchar(10) DEFAULT NULL) ENGINE=InnoDB";
        let table = MySqlParser::new("T", ddl).parse().unwrap().unwrap();
        assert!(!table.column_by_name("a").unwrap().has_default);
        let b = table.column_by_name("b").unwrap();
        assert!(b.has_default && b.default.is_null());
    }

    #[test]
    fn test_parse_index_with_sort_direction() {
        let ddl =
            "CREATE TABLE `T` (`a` int NOT NULL, KEY `T_idx_a_desc` (`a` DESC)) ENGINE=InnoDB";
        let table = MySqlParser::new("T", ddl).parse().unwrap().unwrap();
        let idx = &table.indexes[0];
        assert_eq!(idx.order, vec![("a".to_string(), "DESC".to_string())]);
        assert_eq!(idx.create_table_sql(), "KEY `T_idx_a_desc` (`a` DESC)");
    }

    #[test]
    fn test_parse_index_with_mixed_sort_directions() {
        let ddl = "CREATE TABLE `T` (`a` int NOT NULL, `b` int NOT NULL, \
                   KEY `T_idx` (`a` DESC,`b`)) ENGINE=InnoDB";
        let table = MySqlParser::new("T", ddl).parse().unwrap().unwrap();
        let idx = &table.indexes[0];
        assert_eq!(idx.columns, vec!["a", "b"]);
        assert_eq!(
            idx.order,
            vec![
                ("a".to_string(), "DESC".to_string()),
                ("b".to_string(), "ASC".to_string()),
            ]
        );
        assert_eq!(idx.create_table_sql(), "KEY `T_idx` (`a` DESC,`b` ASC)");
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let ddl = "CREATE TABLE `T` (`a` widget NOT NULL)";
        assert!(MySqlParser::new("T", ddl).parse().is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_sort_token() {
        let ddl = "CREATE TABLE `T` (`a` int NOT NULL, KEY `k` (`a` SIDEWAYS))";
        assert!(MySqlParser::new("T", ddl).parse().is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_table_name() {
        let ddl = "CREATE TABLE `Other` (`a` int NOT NULL)";
        assert!(MySqlParser::new("T", ddl).parse().is_err());
    }

    #[test]
    fn test_parse_tolerates_trailing_comma() {
        let ddl = "CREATE TABLE `T` (`a` int NOT NULL,) ENGINE=InnoDB";
        let table = MySqlParser::new("T", ddl).parse().unwrap().unwrap();
        assert_eq!(table.columns.len(), 1);
    }

    #[test]
    fn test_round_trip_through_own_create_sql() {
        let ddl = "CREATE TABLE `Foo` (`id` INT(11) NOT NULL AUTO_INCREMENT, \
                   `name` VARCHAR(255) NOT NULL, PRIMARY KEY (`id`), \
                   UNIQUE KEY `Foo_unq_name` (`name`)) \
                   ENGINE=InnoDB COLLATE=utf8mb4_unicode_ci;";
        let table = MySqlParser::new("Foo", ddl).parse().unwrap().unwrap();
        assert_eq!(table.create_sql(), ddl);
    }
}
