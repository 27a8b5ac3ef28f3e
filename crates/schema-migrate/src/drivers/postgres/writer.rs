//! PostgreSQL DDL rendering.
//!
//! Identifiers are rendered bare. Indexes live outside `ALTER TABLE`, so
//! index changes become standalone `CREATE INDEX`/`DROP INDEX` statements
//! emitted after the table statement. `ON UPDATE` has no PostgreSQL
//! rendering and is dropped.

use crate::core::schema::{Column, Index, Table, CURRENT_TIMESTAMP};
use crate::dialect::{CanonicalType, PostgresTypeMapper, TypeMapper};
use crate::diff::{ConstraintChange, IndexChange, ModifiedColumn, TableDiff};

fn is_now(value: &str) -> bool {
    value.eq_ignore_ascii_case(CURRENT_TIMESTAMP) || value.eq_ignore_ascii_case("now()")
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Renders canonical structures as PostgreSQL DDL.
#[derive(Debug, Clone, Default)]
pub struct PostgresWriter {
    mapper: PostgresTypeMapper,
}

impl PostgresWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column fragment. Autoincrement columns render as `serial`.
    pub fn render_column(
        &self,
        column: &Column,
        with_name: bool,
        with_default_and_null: bool,
    ) -> String {
        let mut out = String::new();
        if with_name {
            out.push_str(&column.name);
        }
        out.push(' ');

        if column.autoincrement {
            out.push_str("serial");
        } else {
            out.push_str(self.mapper.from_canonical(&column.column_type));
            match column.column_type {
                CanonicalType::Decimal => match (column.precision, column.scale) {
                    (Some(p), Some(s)) => out.push_str(&format!("({},{})", p, s)),
                    (Some(p), None) => out.push_str(&format!("({})", p)),
                    _ => {}
                },
                CanonicalType::Varchar | CanonicalType::Char => {
                    if let Some(len) = column.length {
                        out.push_str(&format!("({})", len));
                    }
                }
                _ => {}
            }
        }

        if with_default_and_null {
            out.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
            if let Some(default) = &column.default {
                if is_now(default) {
                    out.push_str(" DEFAULT NOW()");
                } else {
                    out.push_str(&format!(" DEFAULT {}", quote_literal(default)));
                }
            }
        }

        out
    }

    /// Comparable index fragment: the parenthesized column list.
    pub fn render_index(&self, index: &Index) -> String {
        format!("({})", index.columns.join(","))
    }

    fn create_index(&self, table: &str, index: &Index) -> String {
        let kind = if index.unique { "CREATE UNIQUE INDEX" } else { "CREATE INDEX" };
        format!("{} {} ON {}{};", kind, index.name, table, self.render_index(index))
    }

    /// Columns and constraints; indexes follow via [`create_indexes`](Self::create_indexes).
    pub fn create_table(&self, table: &Table) -> String {
        let mut lines: Vec<String> = table
            .columns
            .values()
            .map(|c| format!("   {}", self.render_column(c, true, true)))
            .collect();
        lines.extend(
            table
                .constraints
                .iter()
                .map(|(name, c)| format!("   CONSTRAINT {} {}", name, c.definition)),
        );
        format!("CREATE TABLE {} (\n{}\n);", table.name, lines.join(",\n"))
    }

    pub fn create_indexes(&self, table: &Table) -> Vec<String> {
        table
            .indexes
            .values()
            .map(|i| self.create_index(&table.name, i))
            .collect()
    }

    pub fn drop_table(&self, table: &Table) -> String {
        format!("DROP TABLE {};", table.name)
    }

    /// Default-only fragment for a modified column, if the default changed.
    fn default_change(&self, change: &ModifiedColumn) -> Option<String> {
        let normalize = |d: &Option<String>| {
            d.as_ref()
                .map(|v| if is_now(v) { "now()".to_string() } else { v.clone() })
        };
        let soll = normalize(&change.desired.default);
        let ist = normalize(&change.actual.default);
        if soll == ist {
            return None;
        }

        let name = &change.desired.name;
        let value = match soll {
            None => return Some(format!("ALTER COLUMN {} DROP DEFAULT", name)),
            Some(v) if v == "now()" => "NOW()".to_string(),
            Some(v) if v.contains("::") => v,
            Some(v) => quote_literal(&v),
        };
        Some(format!("ALTER COLUMN {} SET DEFAULT {}", name, value))
    }

    /// Nullability-only fragment for a modified column, if it changed.
    fn null_change(&self, change: &ModifiedColumn) -> Option<String> {
        if change.desired.nullable == change.actual.nullable {
            return None;
        }
        let action = if change.desired.nullable { "DROP NOT NULL" } else { "SET NOT NULL" };
        Some(format!("ALTER COLUMN {} {}", change.desired.name, action))
    }

    /// `ALTER TABLE` for columns and constraints, then index statements.
    ///
    /// A modified column is split into type, default, and nullability
    /// fragments; each is emitted only when that part differs.
    pub fn alter_table(&self, diff: &TableDiff) -> Vec<String> {
        let mut parts = Vec::new();

        for name in &diff.dropped_columns {
            parts.push(format!("DROP COLUMN {}", name));
        }

        for added in &diff.added_columns {
            parts.push(format!("ADD COLUMN {}", self.render_column(&added.column, true, true)));
        }

        for change in &diff.modified_columns {
            let soll = self.render_column(&change.desired, false, false);
            let ist = self.render_column(&change.actual, false, false);
            if soll != ist {
                parts.push(format!("ALTER COLUMN {} TYPE{}", change.desired.name, soll));
            }
            parts.extend(self.default_change(change));
            parts.extend(self.null_change(change));
        }

        for change in &diff.constraint_changes {
            parts.push(match change {
                ConstraintChange::Drop(c) => format!("DROP CONSTRAINT {}", c.name),
                ConstraintChange::Add(c) => format!("ADD CONSTRAINT {} {}", c.name, c.definition),
            });
        }

        let mut statements = Vec::new();
        if !parts.is_empty() {
            statements.push(format!(
                "ALTER TABLE {}\n    {};",
                diff.table,
                parts.join(",\n    ")
            ));
        }

        for change in &diff.index_changes {
            statements.push(match change {
                IndexChange::Drop(i) => format!("DROP INDEX {};", i.name),
                IndexChange::Add(i) => self.create_index(&diff.table, i),
            });
        }

        statements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn modified(desired: Column, actual: Column) -> TableDiff {
        TableDiff {
            table: "t".into(),
            modified_columns: vec![ModifiedColumn { desired, actual }],
            ..Default::default()
        }
    }

    #[test]
    fn test_render_column() {
        let w = PostgresWriter::new();
        assert_eq!(
            w.render_column(
                &Column::new("id", CanonicalType::BigInteger).auto_increment(),
                true,
                true
            ),
            "id serial NOT NULL"
        );
        assert_eq!(
            w.render_column(
                &Column::new("email", CanonicalType::Varchar).with_length(255).nullable(),
                true,
                true
            ),
            "email varchar(255) NULL"
        );
        assert_eq!(
            w.render_column(
                &Column::new("c", CanonicalType::DatetimeTz)
                    .with_default(CURRENT_TIMESTAMP)
                    .on_update(CURRENT_TIMESTAMP),
                true,
                true
            ),
            "c timestamp with time zone NOT NULL DEFAULT NOW()"
        );
    }

    #[test]
    fn test_type_change_only() {
        let diff = modified(
            Column::new("c", CanonicalType::Varchar).with_length(200),
            Column::new("c", CanonicalType::Varchar).with_length(100),
        );
        assert_eq!(
            PostgresWriter::new().alter_table(&diff),
            vec!["ALTER TABLE t\n    ALTER COLUMN c TYPE varchar(200);".to_string()]
        );
    }

    #[test]
    fn test_default_and_null_changes() {
        let diff = modified(
            Column::new("c", CanonicalType::Text).nullable().with_default("x"),
            Column::new("c", CanonicalType::Text),
        );
        assert_eq!(
            PostgresWriter::new().alter_table(&diff),
            vec![
                "ALTER TABLE t\n    ALTER COLUMN c SET DEFAULT 'x',\n    ALTER COLUMN c DROP NOT NULL;"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_drop_default_and_cast_default() {
        let w = PostgresWriter::new();
        let drop = modified(
            Column::new("c", CanonicalType::Integer),
            Column::new("c", CanonicalType::Integer).with_default("0"),
        );
        assert_eq!(
            w.alter_table(&drop),
            vec!["ALTER TABLE t\n    ALTER COLUMN c DROP DEFAULT;".to_string()]
        );

        let cast = modified(
            Column::new("c", CanonicalType::Integer).with_default("nextval('s'::regclass)"),
            Column::new("c", CanonicalType::Integer),
        );
        assert_eq!(
            w.alter_table(&cast),
            vec!["ALTER TABLE t\n    ALTER COLUMN c SET DEFAULT nextval('s'::regclass);".to_string()]
        );
    }

    #[test]
    fn test_now_equals_current_timestamp() {
        let w = PostgresWriter::new();
        let change = ModifiedColumn {
            desired: Column::new("c", CanonicalType::DatetimeTz).with_default(CURRENT_TIMESTAMP),
            actual: Column::new("c", CanonicalType::DatetimeTz).with_default("now()"),
        };
        assert_eq!(w.default_change(&change), None);
    }

    #[test]
    fn test_index_statements_follow_alter() {
        let diff = TableDiff {
            table: "customers".into(),
            dropped_columns: vec!["lastorder".into()],
            index_changes: vec![
                IndexChange::Drop(Index::new("customers_old", ["a"])),
                IndexChange::Add(Index::new("customers_firstname", ["firstname", "lastname"])),
            ],
            ..Default::default()
        };
        assert_eq!(
            PostgresWriter::new().alter_table(&diff),
            vec![
                "ALTER TABLE customers\n    DROP COLUMN lastorder;".to_string(),
                "DROP INDEX customers_old;".to_string(),
                "CREATE INDEX customers_firstname ON customers(firstname,lastname);".to_string(),
            ]
        );
    }

    #[test]
    fn test_index_only_change_has_no_alter_wrapper() {
        let diff = TableDiff {
            table: "t".into(),
            index_changes: vec![IndexChange::Add(Index::new("t_a", ["a"]))],
            ..Default::default()
        };
        assert_eq!(
            PostgresWriter::new().alter_table(&diff),
            vec!["CREATE INDEX t_a ON t(a);".to_string()]
        );
    }
}
