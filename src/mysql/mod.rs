//! MySQL dialect: table model, DDL parser, schema builder, and comparator

pub mod builder;
pub mod column;
pub mod comparator;
pub mod index;
pub mod parser;
pub mod table;
pub mod types;

pub use builder::build_table;
pub use column::MySqlColumn;
pub use comparator::MySqlComparator;
pub use index::{MySqlIndex, MySqlIndexType};
pub use parser::MySqlParser;
pub use table::{DEFAULT_COLLATION, MySqlTable, STORAGE_ENGINE_INNODB};
pub use types::MySqlColumnType;
