//! Collaborator contracts and the dialect capability trait.
//!
//! - [`Connection`]: runs read-only metadata queries
//! - [`FileStore`]: reads and writes dump documents
//! - [`SchemaDialect`]: introspection, normalization, and DDL rendering for one engine

use std::path::Path;

use crate::core::row::{RawTable, Row};
use crate::core::schema::{Column, Constraint, Index, Table};
use crate::diff::TableDiff;
use crate::error::Result;

/// Relational connection used for introspection.
///
/// Only read-only metadata queries are issued. Timeouts and cancellation
/// belong to the implementation.
pub trait Connection {
    /// Driver name as configured (`mysql`, `pgsql`, ...).
    fn driver_name(&self) -> &str;

    /// Name of the configured connection; selects the dump file.
    fn connection_name(&self) -> &str;

    /// Run a query and return every row as an ordered column → value mapping.
    fn run_list_query(&self, sql: &str) -> Result<Vec<Row>>;
}

/// Byte-level document storage for dump files.
pub trait FileStore {
    /// Read the whole file. `Ok(None)` when it does not exist.
    fn read_all(&self, path: &Path) -> Result<Option<Vec<u8>>>;

    /// Replace the file's content.
    fn write_all(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Create the directory and its parents if missing.
    fn ensure_dir(&self, path: &Path) -> Result<()>;
}

/// Everything the service and planner need from one database engine.
///
/// Implemented by each driver and by [`DialectImpl`](crate::drivers::DialectImpl),
/// which dispatches to the selected driver.
pub trait SchemaDialect {
    /// Dialect name (e.g., "mysql", "postgres").
    fn name(&self) -> &str;

    /// Names of the user tables, in the order the database reports them.
    fn fetch_tables(&self, conn: &dyn Connection) -> Result<Vec<String>>;

    /// Native column rows for one table.
    fn fetch_columns(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>>;

    /// Native constraint rows for one table.
    fn fetch_constraints(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>>;

    /// Native index rows for one table.
    fn fetch_indexes(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>>;

    /// Canonicalize native rows, then apply [`normalize_table`](Self::normalize_table).
    ///
    /// Fails on any native type without a canonical mapping.
    fn normalize(&self, table: &str, raw: RawTable) -> Result<Table>;

    /// Dialect-specific structural rewrites on a canonical table.
    ///
    /// Also applied to tables loaded from a dump.
    fn normalize_table(&self, table: Table) -> Result<Table>;

    /// Render a column definition fragment.
    fn render_column(
        &self,
        column: &Column,
        with_name: bool,
        with_default_and_null: bool,
    ) -> String;

    /// Render the comparable fragment of an index.
    fn render_index(&self, index: &Index) -> String;

    /// Constraints are rendered once at normalization time.
    fn render_constraint(&self, constraint: &Constraint) -> String {
        constraint.definition.clone()
    }

    /// `CREATE TABLE` statement.
    fn create_table(&self, table: &Table) -> String;

    /// Index statements that must follow `CREATE TABLE`; empty when indexes are inline.
    fn create_indexes(&self, table: &Table) -> Vec<String>;

    /// `DROP TABLE` statement.
    fn drop_table(&self, table: &Table) -> String;

    /// Statements realizing one table's delta. Empty when nothing changed.
    fn alter_table(&self, diff: &TableDiff) -> Vec<String>;
}
