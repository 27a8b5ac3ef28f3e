//! Database driver implementations.
//!
//! This module provides database-specific implementations of
//! [`SchemaDialect`]:
//!
//! - [`mysql`]: MySQL/MariaDB
//! - [`postgres`]: PostgreSQL
//!
//! # Architecture
//!
//! Each driver module contains:
//! - `reader`: introspection queries and native row parsing
//! - `writer`: DDL rendering
//! - `dialect`: the `SchemaDialect` implementation tying both together,
//!   plus any dialect-specific normalization
//!
//! [`DialectImpl`] is the closed set of dialects, selected by driver name.
//!
//! # Adding New Databases
//!
//! 1. Create a new module under `drivers/` with reader, writer, and dialect
//! 2. Add a [`TypeMapper`](crate::dialect::TypeMapper) in `dialect::typemap`
//! 3. Add an enum variant to `DialectImpl` and its driver names to `from_driver`

pub mod mysql;
pub mod postgres;

pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;

use crate::core::row::{RawTable, Row};
use crate::core::schema::{Column, Constraint, Index, Table};
use crate::core::traits::{Connection, SchemaDialect};
use crate::diff::TableDiff;
use crate::error::{Result, SchemaError};

/// Enum-based static dispatch for dialects.
///
/// The compiler generates a match statement instead of using vtable
/// dispatch.
#[derive(Debug, Clone)]
pub enum DialectImpl {
    Mysql(MysqlDialect),
    Postgres(PostgresDialect),
}

impl DialectImpl {
    /// Select a dialect by configured driver name (case-insensitive).
    pub fn from_driver(driver: &str) -> Result<Self> {
        match driver.trim().to_lowercase().as_str() {
            "mysql" | "mysqli" | "mariadb" => Ok(DialectImpl::Mysql(MysqlDialect::new())),
            "pgsql" | "postgres" | "postgresql" | "pg" => {
                Ok(DialectImpl::Postgres(PostgresDialect::new()))
            }
            _ => Err(SchemaError::UnknownDriver(driver.to_string())),
        }
    }

    /// Whether `driver` names a supported dialect.
    pub fn is_supported(driver: &str) -> bool {
        Self::from_driver(driver).is_ok()
    }
}

impl SchemaDialect for DialectImpl {
    fn name(&self) -> &str {
        match self {
            DialectImpl::Mysql(d) => d.name(),
            DialectImpl::Postgres(d) => d.name(),
        }
    }

    fn fetch_tables(&self, conn: &dyn Connection) -> Result<Vec<String>> {
        match self {
            DialectImpl::Mysql(d) => d.fetch_tables(conn),
            DialectImpl::Postgres(d) => d.fetch_tables(conn),
        }
    }

    fn fetch_columns(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>> {
        match self {
            DialectImpl::Mysql(d) => d.fetch_columns(conn, table),
            DialectImpl::Postgres(d) => d.fetch_columns(conn, table),
        }
    }

    fn fetch_constraints(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>> {
        match self {
            DialectImpl::Mysql(d) => d.fetch_constraints(conn, table),
            DialectImpl::Postgres(d) => d.fetch_constraints(conn, table),
        }
    }

    fn fetch_indexes(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>> {
        match self {
            DialectImpl::Mysql(d) => d.fetch_indexes(conn, table),
            DialectImpl::Postgres(d) => d.fetch_indexes(conn, table),
        }
    }

    fn normalize(&self, table: &str, raw: RawTable) -> Result<Table> {
        match self {
            DialectImpl::Mysql(d) => d.normalize(table, raw),
            DialectImpl::Postgres(d) => d.normalize(table, raw),
        }
    }

    fn normalize_table(&self, table: Table) -> Result<Table> {
        match self {
            DialectImpl::Mysql(d) => d.normalize_table(table),
            DialectImpl::Postgres(d) => d.normalize_table(table),
        }
    }

    fn render_column(
        &self,
        column: &Column,
        with_name: bool,
        with_default_and_null: bool,
    ) -> String {
        match self {
            DialectImpl::Mysql(d) => d.render_column(column, with_name, with_default_and_null),
            DialectImpl::Postgres(d) => d.render_column(column, with_name, with_default_and_null),
        }
    }

    fn render_index(&self, index: &Index) -> String {
        match self {
            DialectImpl::Mysql(d) => d.render_index(index),
            DialectImpl::Postgres(d) => d.render_index(index),
        }
    }

    fn render_constraint(&self, constraint: &Constraint) -> String {
        match self {
            DialectImpl::Mysql(d) => d.render_constraint(constraint),
            DialectImpl::Postgres(d) => d.render_constraint(constraint),
        }
    }

    fn create_table(&self, table: &Table) -> String {
        match self {
            DialectImpl::Mysql(d) => d.create_table(table),
            DialectImpl::Postgres(d) => d.create_table(table),
        }
    }

    fn create_indexes(&self, table: &Table) -> Vec<String> {
        match self {
            DialectImpl::Mysql(d) => d.create_indexes(table),
            DialectImpl::Postgres(d) => d.create_indexes(table),
        }
    }

    fn drop_table(&self, table: &Table) -> String {
        match self {
            DialectImpl::Mysql(d) => d.drop_table(table),
            DialectImpl::Postgres(d) => d.drop_table(table),
        }
    }

    fn alter_table(&self, diff: &TableDiff) -> Vec<String> {
        match self {
            DialectImpl::Mysql(d) => d.alter_table(diff),
            DialectImpl::Postgres(d) => d.alter_table(diff),
        }
    }
}
