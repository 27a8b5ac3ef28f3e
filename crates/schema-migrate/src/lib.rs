//! # schema-migrate
//!
//! Schema introspection and migration-diff engine for MySQL and PostgreSQL.
//!
//! This library reads a live database's structure, normalizes it into a
//! dialect-independent model, and compares it against a stored dump to
//! produce the DDL statements that migrate the database:
//!
//! - **Introspection** through a caller-supplied [`Connection`]
//! - **Normalization** into canonical [`Table`]s per dialect
//! - **JSON dumps** of the canonical schema, sorted for stable diffs
//! - **Migration planning** as an ordered list of independent statements
//!
//! Executing the statements is left to the caller.
//!
//! ## Example
//!
//! ```rust,no_run
//! use schema_migrate::{Config, Connection, SchemaService};
//!
//! fn migrate(conn: &dyn Connection) -> schema_migrate::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let service = SchemaService::from_config(conn, &config)?;
//!     match service.migration_script()? {
//!         None => eprintln!("no dump to migrate to"),
//!         Some(script) if script.is_empty() => println!("no difference in database schema"),
//!         Some(script) => print!("{}", schema_migrate::script_to_string(&script)),
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod dialect;
pub mod diff;
pub mod drivers;
pub mod dump;
pub mod error;
pub mod service;

// Re-exports for convenient access
pub use config::{Config, ConnectionConfig, PathsConfig};
pub use crate::core::{
    Column, Connection, Constraint, ConstraintType, FileStore, Index, Row, Schema,
    SchemaDialect, Table,
};
pub use dialect::CanonicalType;
pub use diff::{MigrationPlanner, TableDiff};
pub use drivers::DialectImpl;
pub use dump::{DumpStore, LocalFileStore};
pub use error::{Result, SchemaError};
pub use service::{script_to_string, SchemaService};
