//! Declarative entity schema descriptors
//!
//! The core never inspects application types: callers resolve whatever
//! metadata they have (attributes, macros, hand-written registries) into
//! these plain descriptors and hand them to the per-dialect builder. Builder
//! methods consume `self` so a finished spec reads as one declaration:
//!
//! ```
//! use schema_sync::schema::{ColumnKind, ColumnSpec, DefaultSpec, IndexSpec, TableSpec};
//!
//! let spec = TableSpec::new("users")
//!     .column(ColumnSpec::new("id", ColumnKind::Integer).autoincrement())
//!     .column(ColumnSpec::new("email", ColumnKind::String))
//!     .column(
//!         ColumnSpec::new("active", ColumnKind::Bool)
//!             .default_value(DefaultSpec::Bool(true)),
//!     )
//!     .primary_key(["id"])
//!     .index(IndexSpec::on(["email"]).unique());
//! ```

use chrono::{DateTime, Utc};

/// Logical column kind, independent of any dialect
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnKind {
    Bool,
    Integer,
    Float,
    String,
    Datetime,
    /// Serialized list payload
    Array,
    /// Serialized structured payload
    Object,
    /// Closed value set; member order is significant
    Enum(Vec<String>),
}

/// Portable classification of a dialect column type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityColumnType {
    String,
    Integer,
    Float,
    Boolean,
    Datetime,
    Array,
    Object,
    Enum,
}

/// Declared default value, prior to dialect-specific rendering
#[derive(Clone, Debug, PartialEq)]
pub enum DefaultSpec {
    /// An explicit `DEFAULT NULL`
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// A captured timestamp; the builder collapses values within one second
    /// of "now" to the `CURRENT_TIMESTAMP` sentinel
    Timestamp(DateTime<Utc>),
    /// Raw SQL expression rendered verbatim
    Expression(String),
}

impl DefaultSpec {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// The current instant; always collapses to `CURRENT_TIMESTAMP`
    pub fn now() -> Self {
        Self::Timestamp(Utc::now())
    }
}

/// Dialect-specific overrides a declaration may carry
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnOverrides {
    /// Explicit dialect type token (e.g. `MEDIUMTEXT`); must name a known type
    pub sql_type: Option<String>,
    pub size: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub collation: Option<String>,
}

/// One declared column
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub default: Option<DefaultSpec>,
    pub autoincrement: bool,
    /// Excluded from the built table entirely; never participates in diffing
    pub skip: bool,
    pub overrides: ColumnOverrides,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            default: None,
            autoincrement: false,
            skip: false,
            overrides: ColumnOverrides::default(),
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: DefaultSpec) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    #[must_use]
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    #[must_use]
    pub fn sql_type(mut self, sql_type: impl Into<String>) -> Self {
        self.overrides.sql_type = Some(sql_type.into());
        self
    }

    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.overrides.size = Some(size);
        self
    }

    #[must_use]
    pub fn precision(mut self, precision: u32, scale: Option<u32>) -> Self {
        self.overrides.precision = Some(precision);
        self.overrides.scale = scale;
        self
    }

    #[must_use]
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.overrides.collation = Some(collation.into());
        self
    }
}

/// One column reference inside an index declaration
#[derive(Clone, Debug, PartialEq)]
pub struct IndexColumnSpec {
    pub name: String,
    /// Sort token (`ASC`/`DESC`); validated by the builder
    pub order: Option<String>,
}

/// One declared index
#[derive(Clone, Debug, PartialEq)]
pub struct IndexSpec {
    pub columns: Vec<IndexColumnSpec>,
    pub unique: bool,
    /// Explicit name; derived deterministically when absent
    pub name: Option<String>,
}

impl IndexSpec {
    pub fn on<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|c| IndexColumnSpec {
                    name: c.into(),
                    order: None,
                })
                .collect(),
            unique: false,
            name: None,
        }
    }

    /// Append a column with an explicit sort token
    #[must_use]
    pub fn ordered(mut self, column: impl Into<String>, order: impl Into<String>) -> Self {
        self.columns.push(IndexColumnSpec {
            name: column.into(),
            order: Some(order.into()),
        });
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A declared table: the desired state handed to the schema builder
#[derive(Clone, Debug, PartialEq)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    pub primary_keys: Vec<String>,
    pub indexes: Vec<IndexSpec>,
}

impl TableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    #[must_use]
    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_keys = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn index(mut self, index: IndexSpec) -> Self {
        self.indexes.push(index);
        self
    }
}
