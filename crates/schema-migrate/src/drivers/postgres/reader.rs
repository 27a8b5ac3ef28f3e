//! PostgreSQL schema introspection.
//!
//! Reads `information_schema` and `pg_catalog` metadata for the `public`
//! schema and turns the rows into canonical columns, constraints, and
//! indexes. Structural rewrites happen later in the dialect's normalizer.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::row::{Row, RowExt};
use crate::core::schema::{Column, Constraint, ConstraintType, Index, CURRENT_TIMESTAMP};
use crate::core::traits::Connection;
use crate::dialect::{CanonicalType, PostgresTypeMapper, TypeMapper};
use crate::error::{Result, SchemaError};

/// Column list of an index definition: `... USING btree (a, b)`.
static INDEX_COLUMNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)\((.*)\)(.*)").expect("Invalid index definition regex"));

/// Type casts PostgreSQL appends to literal defaults.
const DEFAULT_CASTS: [&str; 6] = [
    "::character varying",
    "::text",
    "::bpchar",
    "::real",
    "::double precision",
    "::bigint",
];

/// Escape a value for use inside a single-quoted SQL literal.
fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Recover a canonical default from a `column_default` expression.
///
/// Returns `None` for a `NULL` default.
pub(crate) fn parse_default(expr: &str) -> Option<String> {
    let mut value = expr.to_string();
    for cast in DEFAULT_CASTS {
        value = value.replace(cast, "");
    }
    let value = value.trim_matches('\'');

    let lower = value.to_lowercase();
    if lower == "now()" || lower == CURRENT_TIMESTAMP {
        return Some(CURRENT_TIMESTAMP.to_string());
    }
    if lower == "null" {
        return None;
    }
    Some(value.replace("''", "'"))
}

/// PostgreSQL metadata reader.
#[derive(Debug, Clone, Default)]
pub struct PostgresReader {
    mapper: PostgresTypeMapper,
}

impl PostgresReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base tables of the `public` schema.
    pub fn fetch_tables(&self, conn: &dyn Connection) -> Result<Vec<String>> {
        let rows = conn.run_list_query(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_type = 'BASE TABLE'",
        )?;
        rows.iter().map(|r| r.require_str("table_name")).collect()
    }

    pub fn fetch_columns(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>> {
        let sql = format!(
            "SELECT column_name, data_type, numeric_precision, numeric_scale, \
             character_maximum_length, is_nullable, column_default \
             FROM information_schema.columns \
             WHERE table_schema = 'public' AND table_name = '{}' \
             ORDER BY ordinal_position",
            escape_literal(table)
        );
        conn.run_list_query(&sql)
    }

    /// Primary, unique, and check constraints owned by the table.
    pub fn fetch_constraints(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>> {
        let sql = format!(
            "SELECT pgc.conname AS constraint_name, ccu.column_name, pgc.contype, \
             pg_get_constraintdef(pgc.oid) AS definition \
             FROM pg_constraint pgc \
             JOIN pg_namespace nsp ON nsp.oid = pgc.connamespace \
             JOIN pg_class cls ON pgc.conrelid = cls.oid \
             LEFT JOIN information_schema.constraint_column_usage ccu \
             ON pgc.conname = ccu.constraint_name AND nsp.nspname = ccu.constraint_schema \
             AND ccu.table_name = cls.relname \
             WHERE nsp.nspname = 'public' AND cls.relname = '{}' \
             AND pgc.contype IN ('p', 'u', 'c') \
             ORDER BY pgc.conname",
            escape_literal(table)
        );
        conn.run_list_query(&sql)
    }

    pub fn fetch_indexes(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>> {
        let sql = format!(
            "SELECT indexname, indexdef FROM pg_indexes \
             WHERE schemaname = 'public' AND tablename = '{}'",
            escape_literal(table)
        );
        conn.run_list_query(&sql)
    }

    /// Canonicalize `information_schema.columns` rows.
    pub fn parse_columns(&self, table: &str, rows: &[Row]) -> Result<IndexMap<String, Column>> {
        let mut columns = IndexMap::with_capacity(rows.len());
        for row in rows {
            let column = self.parse_column(table, row)?;
            columns.insert(column.name.clone(), column);
        }
        debug!("postgres: {} columns in {}", columns.len(), table);
        Ok(columns)
    }

    fn parse_column(&self, table: &str, row: &Row) -> Result<Column> {
        let name = row.require_str("column_name")?;
        let data_type = row.require_str("data_type")?;

        let column_type = self
            .mapper
            .to_canonical(&data_type)
            .ok_or_else(|| SchemaError::unsupported_type(table, &name, &data_type))?;

        let mut column = Column::new(name, column_type);
        match column_type {
            CanonicalType::Decimal => {
                column.precision = row.get_u32("numeric_precision");
                column.scale = row.get_u32("numeric_scale");
            }
            CanonicalType::Varchar | CanonicalType::Char => {
                column.length = row.get_u32("character_maximum_length");
            }
            _ => {}
        }

        column.nullable = row.get_str("is_nullable").as_deref() == Some("YES");

        if let Some(expr) = row.get_str("column_default") {
            let serial = format!("nextval('{}_{}_seq'::regclass)", table, column.name);
            if expr == serial {
                column.autoincrement = true;
            } else {
                column.default = parse_default(&expr);
            }
        }

        Ok(column)
    }

    /// Group constraint rows (one per involved column) by name.
    pub fn parse_constraints(
        &self,
        table: &str,
        rows: &[Row],
    ) -> Result<IndexMap<String, Constraint>> {
        let mut constraints: IndexMap<String, Constraint> = IndexMap::new();
        for row in rows {
            let name = row.require_str("constraint_name")?;
            let column = row.get_str("column_name");

            if let Some(existing) = constraints.get_mut(&name) {
                existing.columns.extend(column);
                continue;
            }

            let contype = row.require_str("contype")?;
            let constraint_type = ConstraintType::parse(&contype).ok_or_else(|| {
                SchemaError::UnsupportedConstraint {
                    table: table.to_string(),
                    name: name.clone(),
                    contype: contype.clone(),
                }
            })?;
            let definition = row
                .get_str("definition")
                .or_else(|| row.get_str("pg_get_constraintdef"))
                .unwrap_or_default();

            constraints.insert(
                name.clone(),
                Constraint::new(name, constraint_type, column, definition),
            );
        }
        Ok(constraints)
    }

    /// Parse `pg_indexes` rows; uniqueness and columns come from `indexdef`.
    pub fn parse_indexes(&self, rows: &[Row]) -> Result<IndexMap<String, Index>> {
        let mut indexes = IndexMap::with_capacity(rows.len());
        for row in rows {
            let name = row.require_str("indexname")?;
            let def = row.require_str("indexdef")?;

            let columns: Vec<String> = INDEX_COLUMNS
                .captures(&def)
                .and_then(|caps| caps.get(2))
                .map(|m| {
                    m.as_str()
                        .split(',')
                        .map(|c| c.trim().to_string())
                        .filter(|c| !c.is_empty())
                        .collect()
                })
                .ok_or_else(|| {
                    SchemaError::MalformedRow(format!("index {} has no column list: {}", name, def))
                })?;

            let mut index = Index::new(name.clone(), columns);
            index.unique = def.to_lowercase().starts_with("create unique");
            indexes.insert(name, index);
        }
        Ok(indexes)
    }
}
