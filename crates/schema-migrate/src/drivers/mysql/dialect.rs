//! MySQL/MariaDB schema dialect.
//!
//! MySQL keeps primary and unique keys as indexes, so normalization only
//! assembles the table; no structural rewrites are needed.

use crate::core::row::{RawTable, Row};
use crate::core::schema::{Column, Index, Table};
use crate::core::traits::{Connection, SchemaDialect};
use crate::diff::TableDiff;
use crate::error::Result;

use super::{MysqlReader, MysqlWriter};

/// MySQL/MariaDB dialect implementation.
///
/// Compatible with MySQL 5.7+, 8.0+, and MariaDB 10.2+.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect {
    reader: MysqlReader,
    writer: MysqlWriter,
}

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchemaDialect for MysqlDialect {
    fn name(&self) -> &str {
        "mysql"
    }

    fn fetch_tables(&self, conn: &dyn Connection) -> Result<Vec<String>> {
        self.reader.fetch_tables(conn)
    }

    fn fetch_columns(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>> {
        self.reader.fetch_columns(conn, table)
    }

    fn fetch_constraints(&self, _conn: &dyn Connection, _table: &str) -> Result<Vec<Row>> {
        Ok(Vec::new())
    }

    fn fetch_indexes(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>> {
        self.reader.fetch_indexes(conn, table)
    }

    fn normalize(&self, table: &str, raw: RawTable) -> Result<Table> {
        let mut out = Table::new(table);
        out.columns = self.reader.parse_columns(table, &raw.columns)?;
        out.indexes = self.reader.parse_indexes(&raw.indexes)?;
        self.normalize_table(out)
    }

    fn normalize_table(&self, table: Table) -> Result<Table> {
        Ok(table)
    }

    fn render_column(
        &self,
        column: &Column,
        with_name: bool,
        with_default_and_null: bool,
    ) -> String {
        self.writer.render_column(column, with_name, with_default_and_null)
    }

    fn render_index(&self, index: &Index) -> String {
        self.writer.render_index(index)
    }

    fn create_table(&self, table: &Table) -> String {
        self.writer.create_table(table)
    }

    fn create_indexes(&self, _table: &Table) -> Vec<String> {
        Vec::new()
    }

    fn drop_table(&self, table: &Table) -> String {
        self.writer.drop_table(table)
    }

    fn alter_table(&self, diff: &TableDiff) -> Vec<String> {
        self.writer.alter_table(diff)
    }
}
