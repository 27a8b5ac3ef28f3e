//! PostgreSQL schema dialect.
//!
//! PostgreSQL expresses primary keys, unique keys, and enums as constraints.
//! Normalization rewrites MySQL-shaped tables (as found in dumps) into that
//! form so both sides of a diff look alike:
//!
//! 1. An index named `PRIMARY` becomes the `<table>_pkey` primary constraint.
//! 2. Indexes shadowed by a same-named primary/unique constraint are removed.
//! 3. Remaining unique indexes become `<table>_<firstcol>_unique` constraints.
//! 4. Enum columns become text plus a `<table>_<column>_check` constraint.
//! 5. Remaining index names get the `<table>_` prefix.

use indexmap::IndexMap;
use tracing::warn;

use crate::core::row::{RawTable, Row};
use crate::core::schema::{Column, Constraint, ConstraintType, Index, Table, PRIMARY_INDEX};
use crate::core::traits::{Connection, SchemaDialect};
use crate::dialect::CanonicalType;
use crate::diff::TableDiff;
use crate::error::Result;

use super::{PostgresReader, PostgresWriter};

/// PostgreSQL dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect {
    reader: PostgresReader,
    writer: PostgresWriter,
}

impl PostgresDialect {
    /// Create a new PostgreSQL dialect instance.
    pub fn new() -> Self {
        Self::default()
    }
}

fn key_definition(keyword: &str, columns: &[String]) -> String {
    format!("{} ({})", keyword, columns.join(", "))
}

fn enum_check_definition(column: &str, values: &[String]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| format!("'{}'::text", v.replace('\'', "''")))
        .collect();
    format!("CHECK (({} = ANY (ARRAY[{}])))", column, items.join(", "))
}

impl SchemaDialect for PostgresDialect {
    fn name(&self) -> &str {
        "postgres"
    }

    fn fetch_tables(&self, conn: &dyn Connection) -> Result<Vec<String>> {
        self.reader.fetch_tables(conn)
    }

    fn fetch_columns(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>> {
        self.reader.fetch_columns(conn, table)
    }

    fn fetch_constraints(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>> {
        self.reader.fetch_constraints(conn, table)
    }

    fn fetch_indexes(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>> {
        self.reader.fetch_indexes(conn, table)
    }

    fn normalize(&self, table: &str, raw: RawTable) -> Result<Table> {
        let mut out = Table::new(table);
        out.columns = self.reader.parse_columns(table, &raw.columns)?;
        out.constraints = self.reader.parse_constraints(table, &raw.constraints)?;
        out.indexes = self.reader.parse_indexes(&raw.indexes)?;
        self.normalize_table(out)
    }

    fn normalize_table(&self, mut table: Table) -> Result<Table> {
        let name = table.name.clone();

        if let Some(primary) = table.indexes.shift_remove(PRIMARY_INDEX) {
            let con = Constraint::new(
                format!("{}_pkey", name),
                ConstraintType::Primary,
                primary.columns.clone(),
                key_definition("PRIMARY KEY", &primary.columns),
            );
            table.add_constraint(con);
        }

        let shadowing: Vec<String> = table
            .constraints
            .values()
            .filter(|c| {
                matches!(
                    c.constraint_type,
                    ConstraintType::Primary | ConstraintType::Unique
                )
            })
            .map(|c| c.name.clone())
            .collect();
        for con_name in &shadowing {
            table.indexes.shift_remove(con_name);
        }

        let unique: Vec<Index> = table.indexes.values().filter(|i| i.unique).cloned().collect();
        for index in unique {
            table.indexes.shift_remove(&index.name);
            let first = index.columns.first().cloned().unwrap_or_default();
            let con_name = format!("{}_{}_unique", name, first);
            if table.constraints.contains_key(&con_name) {
                warn!(
                    "{}: unique index {} replaces constraint {}",
                    name, index.name, con_name
                );
            }
            table.add_constraint(Constraint::new(
                con_name,
                ConstraintType::Unique,
                index.columns.clone(),
                key_definition("UNIQUE", &index.columns),
            ));
        }

        let mut checks = Vec::new();
        for column in table.columns.values_mut() {
            if column.column_type != CanonicalType::Enum {
                continue;
            }
            checks.push(Constraint::new(
                format!("{}_{}_check", name, column.name),
                ConstraintType::Check,
                [column.name.clone()],
                enum_check_definition(&column.name, &column.values),
            ));
            column.column_type = CanonicalType::Text;
            column.values.clear();
        }
        for check in checks {
            table.add_constraint(check);
        }

        let prefix = format!("{}_", name);
        let indexes = std::mem::take(&mut table.indexes);
        table.indexes = indexes
            .into_values()
            .map(|mut index| {
                if !index.name.starts_with(&prefix) {
                    index.name = format!("{}{}", prefix, index.name);
                }
                (index.name.clone(), index)
            })
            .collect::<IndexMap<_, _>>();

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

    fn create_indexes(&self, table: &Table) -> Vec<String> {
        self.writer.create_indexes(table)
    }

    fn drop_table(&self, table: &Table) -> String {
        self.writer.drop_table(table)
    }

    fn alter_table(&self, diff: &TableDiff) -> Vec<String> {
        self.writer.alter_table(diff)
    }
}
