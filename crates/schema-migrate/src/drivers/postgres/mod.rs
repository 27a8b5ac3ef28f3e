//! PostgreSQL schema driver.
//!
//! This module provides PostgreSQL-specific implementations for:
//! - [`PostgresDialect`]: the [`SchemaDialect`](crate::core::SchemaDialect) capability
//!   and the constraint-oriented normalizer
//! - [`PostgresReader`]: `information_schema`/`pg_catalog` introspection
//! - [`PostgresWriter`]: DDL rendering with bare identifiers
//!
//! Only the `public` schema is introspected.

mod dialect;
mod reader;
mod writer;

pub use dialect::PostgresDialect;
pub use reader::PostgresReader;
pub use writer::PostgresWriter;
