//! schema-sync - Entity-to-database schema comparison and migration generation
//!
//! This crate provides types and utilities for:
//! - Declaring table schemas as plain descriptors ([`schema::TableSpec`])
//! - Parsing `SHOW CREATE TABLE` output back into a table model
//! - Diffing the declared schema against the live one and generating the
//!   up/down SQL that closes the gap
//! - Writing migration file pairs and applying them transactionally
//!
//! # Planning a migration
//!
//! ```ignore
//! use schema_sync::config::SyncConfig;
//! use schema_sync::schema::{ColumnKind, ColumnSpec, TableSpec};
//! use schema_sync::sync::plan_table;
//! use schema_sync::writer::MigrationWriter;
//!
//! let config = SyncConfig::from_file("schema-sync.toml".as_ref())?;
//! let spec = TableSpec::new("users")
//!     .column(ColumnSpec::new("id", ColumnKind::Integer).autoincrement())
//!     .column(ColumnSpec::new("email", ColumnKind::String))
//!     .primary_key(["id"]);
//!
//! // `source` implements SchemaSource on top of your database driver
//! if let Some(plan) = plan_table(&config, &source, &spec)? {
//!     MigrationWriter::new(&config.migrations_dir).write(&plan)?;
//! }
//! ```
//!
//! # Applying migrations
//!
//! ```ignore
//! use schema_sync::migrator::Migrator;
//!
//! // `executor` implements SqlExecutor on top of your database connection
//! let applied = Migrator::new(config).migrate(&mut executor)?;
//! ```

pub mod config;
pub mod dialect;
pub mod error;
pub mod migrator;
pub mod mysql;
pub mod schema;
pub mod sync;
pub mod value;
pub mod writer;

pub use config::SyncConfig;
pub use dialect::Dialect;
pub use error::{Result, SyncError};
pub use migrator::{Migrator, SqlExecutor};
pub use schema::{ColumnKind, ColumnSpec, DefaultSpec, IndexSpec, TableSpec};
pub use sync::{SchemaSource, TablePlan, plan_table};
pub use value::SqlValue;
pub use writer::MigrationWriter;
