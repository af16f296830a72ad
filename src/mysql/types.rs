//! MySQL column type tokens and type-family tables

use crate::error::{Result, SyncError};
use crate::schema::ColumnKind;
use serde::{Deserialize, Serialize};

/// Every column type token the parser and renderer understand
///
/// The serialized/rendered token is the variant name in uppercase.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum MySqlColumnType {
    Int,
    Smallint,
    Mediumint,
    Bigint,
    Tinyint,
    Bit,
    Float,
    Real,
    Double,
    Decimal,
    Numeric,
    Dec,
    Fixed,
    Char,
    Varchar,
    Binary,
    Varbinary,
    Text,
    Tinytext,
    Mediumtext,
    Longtext,
    Blob,
    Tinyblob,
    Mediumblob,
    Longblob,
    Enum,
    Set,
    Json,
    Timestamp,
    Datetime,
    Date,
    Time,
    Year,
    Bool,
    Point,
    Linestring,
    Polygon,
    Geometry,
    Multipoint,
    Multilinestring,
    Multipolygon,
    Geometrycollection,
}

impl MySqlColumnType {
    /// The DDL token for this type
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Smallint => "SMALLINT",
            Self::Mediumint => "MEDIUMINT",
            Self::Bigint => "BIGINT",
            Self::Tinyint => "TINYINT",
            Self::Bit => "BIT",
            Self::Float => "FLOAT",
            Self::Real => "REAL",
            Self::Double => "DOUBLE",
            Self::Decimal => "DECIMAL",
            Self::Numeric => "NUMERIC",
            Self::Dec => "DEC",
            Self::Fixed => "FIXED",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::Binary => "BINARY",
            Self::Varbinary => "VARBINARY",
            Self::Text => "TEXT",
            Self::Tinytext => "TINYTEXT",
            Self::Mediumtext => "MEDIUMTEXT",
            Self::Longtext => "LONGTEXT",
            Self::Blob => "BLOB",
            Self::Tinyblob => "TINYBLOB",
            Self::Mediumblob => "MEDIUMBLOB",
            Self::Longblob => "LONGBLOB",
            Self::Enum => "ENUM",
            Self::Set => "SET",
            Self::Json => "JSON",
            Self::Timestamp => "TIMESTAMP",
            Self::Datetime => "DATETIME",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Year => "YEAR",
            Self::Bool => "BOOL",
            Self::Point => "POINT",
            Self::Linestring => "LINESTRING",
            Self::Polygon => "POLYGON",
            Self::Geometry => "GEOMETRY",
            Self::Multipoint => "MULTIPOINT",
            Self::Multilinestring => "MULTILINESTRING",
            Self::Multipolygon => "MULTIPOLYGON",
            Self::Geometrycollection => "GEOMETRYCOLLECTION",
        }
    }

    /// Look up a raw type token, case-insensitively
    pub fn parse_token(token: &str) -> Result<Self> {
        let upper = token.to_ascii_uppercase();
        ALL_TYPES
            .iter()
            .copied()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| SyncError::parse(format!("unknown column type `{token}`")))
    }

    /// Default dialect type for a logical column kind
    pub fn from_kind(kind: &ColumnKind) -> Self {
        match kind {
            ColumnKind::Bool => Self::Tinyint,
            ColumnKind::Integer => Self::Int,
            ColumnKind::Float => Self::Float,
            ColumnKind::String => Self::Varchar,
            ColumnKind::Datetime => Self::Timestamp,
            ColumnKind::Enum(_) => Self::Enum,
            ColumnKind::Array | ColumnKind::Object => Self::Json,
        }
    }

    pub const fn is_string(self) -> bool {
        matches!(
            self,
            Self::Varchar | Self::Char | Self::Text | Self::Tinytext | Self::Mediumtext | Self::Longtext
        )
    }

    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Tinyint | Self::Smallint | Self::Mediumint | Self::Bigint
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(
            self,
            Self::Float | Self::Decimal | Self::Double | Self::Real | Self::Dec | Self::Fixed | Self::Numeric
        )
    }

    pub const fn is_datetime(self) -> bool {
        matches!(self, Self::Datetime | Self::Timestamp)
    }

    pub const fn is_enum(self) -> bool {
        matches!(self, Self::Enum)
    }

    pub const fn has_collation(self) -> bool {
        self.is_string() || self.is_enum()
    }

    /// Types that reject a literal DEFAULT clause in MySQL
    pub const fn default_value_allowed(self) -> bool {
        !matches!(
            self,
            Self::Json
                | Self::Blob
                | Self::Longblob
                | Self::Text
                | Self::Longtext
                | Self::Geometry
                | Self::Geometrycollection
        )
    }
}

impl std::fmt::Display for MySqlColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const ALL_TYPES: &[MySqlColumnType] = &[
    MySqlColumnType::Int,
    MySqlColumnType::Smallint,
    MySqlColumnType::Mediumint,
    MySqlColumnType::Bigint,
    MySqlColumnType::Tinyint,
    MySqlColumnType::Bit,
    MySqlColumnType::Float,
    MySqlColumnType::Real,
    MySqlColumnType::Double,
    MySqlColumnType::Decimal,
    MySqlColumnType::Numeric,
    MySqlColumnType::Dec,
    MySqlColumnType::Fixed,
    MySqlColumnType::Char,
    MySqlColumnType::Varchar,
    MySqlColumnType::Binary,
    MySqlColumnType::Varbinary,
    MySqlColumnType::Text,
    MySqlColumnType::Tinytext,
    MySqlColumnType::Mediumtext,
    MySqlColumnType::Longtext,
    MySqlColumnType::Blob,
    MySqlColumnType::Tinyblob,
    MySqlColumnType::Mediumblob,
    MySqlColumnType::Longblob,
    MySqlColumnType::Enum,
    MySqlColumnType::Set,
    MySqlColumnType::Json,
    MySqlColumnType::Timestamp,
    MySqlColumnType::Datetime,
    MySqlColumnType::Date,
    MySqlColumnType::Time,
    MySqlColumnType::Year,
    MySqlColumnType::Bool,
    MySqlColumnType::Point,
    MySqlColumnType::Linestring,
    MySqlColumnType::Polygon,
    MySqlColumnType::Geometry,
    MySqlColumnType::Multipoint,
    MySqlColumnType::Multilinestring,
    MySqlColumnType::Multipolygon,
    MySqlColumnType::Geometrycollection,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_case_insensitive() {
        assert_eq!(
            MySqlColumnType::parse_token("varchar").unwrap(),
            MySqlColumnType::Varchar
        );
        assert_eq!(
            MySqlColumnType::parse_token("TIMESTAMP").unwrap(),
            MySqlColumnType::Timestamp
        );
        assert!(MySqlColumnType::parse_token("uuid").is_err());
    }

    #[test]
    fn test_type_families() {
        assert!(MySqlColumnType::Longtext.is_string());
        assert!(MySqlColumnType::Bigint.is_integer());
        assert!(MySqlColumnType::Numeric.is_float());
        assert!(MySqlColumnType::Datetime.is_datetime());
        assert!(MySqlColumnType::Enum.has_collation());
        assert!(!MySqlColumnType::Int.has_collation());
    }

    #[test]
    fn test_default_value_allowed() {
        assert!(!MySqlColumnType::Json.default_value_allowed());
        assert!(!MySqlColumnType::Text.default_value_allowed());
        assert!(MySqlColumnType::Tinytext.default_value_allowed());
        assert!(MySqlColumnType::Varchar.default_value_allowed());
    }
}
