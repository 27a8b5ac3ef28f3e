//! MySQL/MariaDB DDL rendering.

use crate::core::schema::{Column, Constraint, Index, Table, CURRENT_TIMESTAMP};
use crate::dialect::{CanonicalType, MysqlTypeMapper, TypeMapper};
use crate::diff::{ConstraintChange, IndexChange, TableDiff};

use super::reader::quote_ident;

/// Quote a literal default value.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Renders canonical structures as MySQL DDL.
#[derive(Debug, Clone, Default)]
pub struct MysqlWriter {
    mapper: MysqlTypeMapper,
}

impl MysqlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column fragment: name, type with arguments, nullability, default, extras.
    ///
    /// A nullable column without default renders an explicit `DEFAULT NULL`.
    pub fn render_column(
        &self,
        column: &Column,
        with_name: bool,
        with_default_and_null: bool,
    ) -> String {
        let mut out = String::new();
        if with_name {
            out.push_str(&quote_ident(&column.name));
        }
        out.push(' ');
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
            CanonicalType::Enum if !column.values.is_empty() => {
                let values: Vec<String> = column.values.iter().map(|v| quote_literal(v)).collect();
                out.push_str(&format!("({})", values.join(",")));
            }
            _ => {}
        }

        if !with_default_and_null {
            return out;
        }

        if column.nullable {
            out.push_str(" NULL");
            if column.default.is_none() {
                out.push_str(" DEFAULT NULL");
            }
        } else {
            out.push_str(" NOT NULL");
        }

        if let Some(default) = &column.default {
            if column.default_is_current_timestamp() {
                out.push_str(" DEFAULT CURRENT_TIMESTAMP");
            } else {
                out.push_str(&format!(" DEFAULT {}", quote_literal(default)));
            }
        }

        if column.autoincrement {
            out.push_str(" AUTO_INCREMENT");
        }

        if let Some(on_update) = &column.onupdate {
            if on_update.eq_ignore_ascii_case(CURRENT_TIMESTAMP) {
                out.push_str(" ON UPDATE CURRENT_TIMESTAMP");
            } else {
                out.push_str(&format!(" ON UPDATE {}", on_update));
            }
        }

        out
    }

    /// `PRIMARY KEY (...)`, `UNIQUE `name` (...)` or `INDEX `name` (...)`.
    pub fn render_index(&self, index: &Index) -> String {
        let head = if index.is_primary() {
            "PRIMARY KEY".to_string()
        } else if index.unique {
            format!("UNIQUE {}", quote_ident(&index.name))
        } else {
            format!("INDEX {}", quote_ident(&index.name))
        };
        let cols: Vec<String> = index.columns.iter().map(|c| quote_ident(c)).collect();
        format!("{} ({})", head, cols.join(","))
    }

    /// Indexes and constraints are inlined into the statement.
    pub fn create_table(&self, table: &Table) -> String {
        let mut lines: Vec<String> = table
            .columns
            .values()
            .map(|c| format!("    {}", self.render_column(c, true, true)))
            .collect();
        lines.extend(
            table
                .constraints
                .values()
                .map(|c| format!("    CONSTRAINT {} {}", quote_ident(&c.name), c.definition)),
        );
        lines.extend(
            table
                .indexes
                .values()
                .map(|i| format!("    {}", self.render_index(i))),
        );
        format!(
            "CREATE TABLE {} (\n{}\n);",
            quote_ident(&table.name),
            lines.join(",\n")
        )
    }

    pub fn drop_table(&self, table: &Table) -> String {
        format!("DROP TABLE {};", quote_ident(&table.name))
    }

    /// One `ALTER TABLE` with every change, in the order: drop columns,
    /// add columns, modify columns, constraints, indexes.
    pub fn alter_table(&self, diff: &TableDiff) -> Vec<String> {
        let mut parts = Vec::new();

        for name in &diff.dropped_columns {
            parts.push(format!("DROP {}", quote_ident(name)));
        }

        for added in &diff.added_columns {
            let mut part = format!("ADD {}", self.render_column(&added.column, true, true));
            if let Some(after) = &added.after {
                part.push_str(&format!(" AFTER {}", quote_ident(after)));
            }
            parts.push(part);
        }

        for modified in &diff.modified_columns {
            parts.push(format!("MODIFY {}", self.render_column(&modified.desired, true, true)));
        }

        for change in &diff.constraint_changes {
            parts.push(match change {
                ConstraintChange::Drop(c) => format!("DROP CONSTRAINT {}", quote_ident(&c.name)),
                ConstraintChange::Add(c) => self.add_constraint(c),
            });
        }

        for change in &diff.index_changes {
            parts.push(match change {
                IndexChange::Drop(i) if i.is_primary() => "DROP PRIMARY KEY".to_string(),
                IndexChange::Drop(i) => format!("DROP INDEX {}", quote_ident(&i.name)),
                IndexChange::Add(i) => format!("ADD {}", self.render_index(i)),
            });
        }

        if parts.is_empty() {
            return Vec::new();
        }

        vec![format!(
            "ALTER TABLE {}\n    {};",
            quote_ident(&diff.table),
            parts.join(",\n    ")
        )]
    }

    fn add_constraint(&self, constraint: &Constraint) -> String {
        format!(
            "ADD CONSTRAINT {} {}",
            quote_ident(&constraint.name),
            constraint.definition
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::AddedColumn;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_column_variants() {
        let w = MysqlWriter::new();
        assert_eq!(
            w.render_column(
                &Column::new("id", CanonicalType::Integer).auto_increment(),
                true,
                true
            ),
            "`id` int NOT NULL AUTO_INCREMENT"
        );
        assert_eq!(
            w.render_column(
                &Column::new("email", CanonicalType::Varchar).with_length(255).nullable(),
                true,
                true
            ),
            "`email` varchar(255) NULL DEFAULT NULL"
        );
        assert_eq!(
            w.render_column(
                &Column::new("gender", CanonicalType::Enum)
                    .with_values(["male", "female"])
                    .with_default("male"),
                true,
                true
            ),
            "`gender` enum('male','female') NOT NULL DEFAULT 'male'"
        );
        assert_eq!(
            w.render_column(
                &Column::new("price", CanonicalType::Decimal).with_precision(10, Some(2)),
                false,
                false
            ),
            " decimal(10,2)"
        );
    }

    #[test]
    fn test_current_timestamp_case_is_irrelevant() {
        let w = MysqlWriter::new();
        let native = Column::new("c", CanonicalType::DatetimeTz).with_default("CURRENT_TIMESTAMP");
        let canonical = Column::new("c", CanonicalType::DatetimeTz).with_default(CURRENT_TIMESTAMP);
        assert_eq!(
            w.render_column(&native, true, true),
            w.render_column(&canonical, true, true)
        );
    }

    #[test]
    fn test_default_quotes_are_escaped() {
        let w = MysqlWriter::new();
        let col = Column::new("c", CanonicalType::Varchar).with_length(8).with_default("it's");
        assert_eq!(w.render_column(&col, true, true), "`c` varchar(8) NOT NULL DEFAULT 'it''s'");
    }

    #[test]
    fn test_render_index() {
        let w = MysqlWriter::new();
        assert_eq!(w.render_index(&Index::primary_key(["id"])), "PRIMARY KEY (`id`)");
        assert_eq!(
            w.render_index(&Index::new("username", ["username"]).unique()),
            "UNIQUE `username` (`username`)"
        );
        assert_eq!(
            w.render_index(&Index::new("gc", ["gender", "created"])),
            "INDEX `gc` (`gender`,`created`)"
        );
    }

    #[test]
    fn test_alter_table_empty_diff() {
        let diff = TableDiff {
            table: "t".into(),
            ..Default::default()
        };
        assert!(MysqlWriter::new().alter_table(&diff).is_empty());
    }

    #[test]
    fn test_alter_table_index_drops() {
        let diff = TableDiff {
            table: "t".into(),
            added_columns: vec![AddedColumn {
                column: Column::new("x", CanonicalType::Integer),
                after: Some("id".into()),
            }],
            index_changes: vec![
                IndexChange::Drop(Index::primary_key(["id"])),
                IndexChange::Drop(Index::new("old", ["x"])),
                IndexChange::Add(Index::primary_key(["id", "x"])),
            ],
            ..Default::default()
        };
        let statements = MysqlWriter::new().alter_table(&diff);
        assert_eq!(
            statements,
            vec![
                "ALTER TABLE `t`\n    ADD `x` int NOT NULL AFTER `id`,\n    DROP PRIMARY KEY,\n    DROP INDEX `old`,\n    ADD PRIMARY KEY (`id`,`x`);"
                    .to_string()
            ]
        );
    }
}
