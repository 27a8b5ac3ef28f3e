//! MySQL/MariaDB schema driver.
//!
//! This module provides MySQL-specific implementations for:
//! - [`MysqlDialect`]: the [`SchemaDialect`](crate::core::SchemaDialect) capability
//! - [`MysqlReader`]: `SHOW`-based introspection and column parsing
//! - [`MysqlWriter`]: DDL rendering with backtick-quoted identifiers
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+
//! - MariaDB 10.2+

mod dialect;
mod reader;
mod writer;

pub use dialect::MysqlDialect;
pub use reader::MysqlReader;
pub use writer::MysqlWriter;
