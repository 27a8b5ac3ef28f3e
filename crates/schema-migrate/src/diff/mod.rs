//! Migration planning: diff a desired schema against an actual one.
//!
//! The planner is dialect-agnostic. It decides *what* changed by comparing
//! dialect-rendered fragments as plain strings, and asks the dialect to
//! render *how* each change is expressed. Two definitions that differ only
//! in spelling or whitespace count as changed.

use tracing::debug;

use crate::core::schema::{Column, Constraint, Index, Schema, Table};
use crate::core::traits::SchemaDialect;

/// A column present in the desired table but not in the actual one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedColumn {
    pub column: Column,
    /// Name of the preceding column in the desired table, if any.
    pub after: Option<String>,
}

/// A column whose full rendering differs between desired and actual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedColumn {
    pub desired: Column,
    pub actual: Column,
}

/// One step of a constraint change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintChange {
    Drop(Constraint),
    Add(Constraint),
}

/// One step of an index change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexChange {
    Drop(Index),
    Add(Index),
}

/// Per-dimension delta for a table present on both sides.
///
/// Change lists keep their discovery order: drops follow the actual table's
/// order, additions follow the desired table's order, and a changed
/// constraint or index appears as a drop immediately followed by an add.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDiff {
    pub table: String,
    pub dropped_columns: Vec<String>,
    pub added_columns: Vec<AddedColumn>,
    pub modified_columns: Vec<ModifiedColumn>,
    pub constraint_changes: Vec<ConstraintChange>,
    pub index_changes: Vec<IndexChange>,
}

impl TableDiff {
    /// Compare `desired` against `actual` using `dialect` renderings.
    pub fn compute<D: SchemaDialect + ?Sized>(
        dialect: &D,
        desired: &Table,
        actual: &Table,
    ) -> Self {
        let mut diff = TableDiff {
            table: actual.name.clone(),
            ..Default::default()
        };

        for (name, ist) in &actual.columns {
            match desired.columns.get(name) {
                None => diff.dropped_columns.push(name.clone()),
                Some(soll) => {
                    let a = dialect.render_column(ist, true, true);
                    let b = dialect.render_column(soll, true, true);
                    if a != b {
                        diff.modified_columns.push(ModifiedColumn {
                            desired: soll.clone(),
                            actual: ist.clone(),
                        });
                    }
                }
            }
        }

        let mut previous: Option<&str> = None;
        for (name, soll) in &desired.columns {
            if !actual.columns.contains_key(name) {
                diff.added_columns.push(AddedColumn {
                    column: soll.clone(),
                    after: previous.map(str::to_string),
                });
            }
            previous = Some(name);
        }

        for (name, ist) in &actual.constraints {
            match desired.constraints.get(name) {
                None => diff.constraint_changes.push(ConstraintChange::Drop(ist.clone())),
                Some(soll) => {
                    if dialect.render_constraint(ist) != dialect.render_constraint(soll) {
                        diff.constraint_changes.push(ConstraintChange::Drop(ist.clone()));
                        diff.constraint_changes.push(ConstraintChange::Add(soll.clone()));
                    }
                }
            }
        }
        for (name, soll) in &desired.constraints {
            if !actual.constraints.contains_key(name) {
                diff.constraint_changes.push(ConstraintChange::Add(soll.clone()));
            }
        }

        for (name, ist) in &actual.indexes {
            match desired.indexes.get(name) {
                None => diff.index_changes.push(IndexChange::Drop(ist.clone())),
                Some(soll) => {
                    if dialect.render_index(ist) != dialect.render_index(soll) {
                        diff.index_changes.push(IndexChange::Drop(ist.clone()));
                        diff.index_changes.push(IndexChange::Add(soll.clone()));
                    }
                }
            }
        }
        for (name, soll) in &desired.indexes {
            if !actual.indexes.contains_key(name) {
                diff.index_changes.push(IndexChange::Add(soll.clone()));
            }
        }

        diff
    }

    /// True when no dimension changed.
    pub fn is_empty(&self) -> bool {
        self.dropped_columns.is_empty()
            && self.added_columns.is_empty()
            && self.modified_columns.is_empty()
            && self.constraint_changes.is_empty()
            && self.index_changes.is_empty()
    }
}

/// Computes the ordered DDL statements that turn `actual` into `desired`.
pub struct MigrationPlanner<'a, D: SchemaDialect + ?Sized> {
    dialect: &'a D,
}

impl<'a, D: SchemaDialect + ?Sized> MigrationPlanner<'a, D> {
    pub fn new(dialect: &'a D) -> Self {
        Self { dialect }
    }

    /// Diff two schemas.
    ///
    /// Missing tables are created first (with their follow-up index
    /// statements), then every actual table is either altered or dropped,
    /// in the actual schema's order. Equal schemas yield no statements.
    pub fn diff(&self, desired: &Schema, actual: &Schema) -> Vec<String> {
        let mut statements = Vec::new();

        for table in desired.tables() {
            if !actual.contains(&table.name) {
                debug!("{}: create table {}", self.dialect.name(), table.name);
                statements.push(self.dialect.create_table(table));
                statements.extend(self.dialect.create_indexes(table));
            }
        }

        for table in actual.tables() {
            match desired.get(&table.name) {
                Some(soll) => {
                    let delta = TableDiff::compute(self.dialect, soll, table);
                    if delta.is_empty() {
                        continue;
                    }
                    debug!("{}: alter table {}", self.dialect.name(), table.name);
                    statements.extend(self.dialect.alter_table(&delta));
                }
                None => {
                    debug!("{}: drop table {}", self.dialect.name(), table.name);
                    statements.push(self.dialect.drop_table(table));
                }
            }
        }

        statements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::ConstraintType;
    use crate::dialect::CanonicalType;
    use crate::drivers::DialectImpl;

    fn check(name: &str, definition: &str) -> Constraint {
        Constraint::new(name, ConstraintType::Check, ["id"], definition)
    }

    fn customers() -> Table {
        let mut t = Table::new("customers");
        t.add_column(Column::new("id", CanonicalType::Integer).auto_increment())
            .add_column(Column::new("a", CanonicalType::Integer))
            .add_column(Column::new("b", CanonicalType::Integer))
            .add_index(Index::primary_key(["id"]));
        t
    }

    #[test]
    fn test_rename_is_drop_plus_add() {
        let dialect = DialectImpl::from_driver("mysql").unwrap();
        let actual = customers();
        let mut desired = customers();
        desired.columns.shift_remove("b");
        desired.add_column(Column::new("c", CanonicalType::Integer));

        let diff = TableDiff::compute(&dialect, &desired, &actual);
        assert_eq!(diff.dropped_columns, vec!["b".to_string()]);
        assert_eq!(diff.added_columns.len(), 1);
        assert_eq!(diff.added_columns[0].column.name, "c");
        assert_eq!(diff.added_columns[0].after.as_deref(), Some("a"));
        assert!(diff.modified_columns.is_empty());
    }

    #[test]
    fn test_first_added_column_has_no_after() {
        let dialect = DialectImpl::from_driver("mysql").unwrap();
        let actual = customers();
        let mut desired = Table::new("customers");
        desired.add_column(Column::new("first", CanonicalType::Text));
        for col in actual.columns.values() {
            desired.add_column(col.clone());
        }
        desired.indexes = actual.indexes.clone();

        let diff = TableDiff::compute(&dialect, &desired, &actual);
        assert_eq!(diff.added_columns[0].after, None);
    }

    #[test]
    fn test_changed_index_is_drop_then_add() {
        let dialect = DialectImpl::from_driver("mysql").unwrap();
        let mut actual = customers();
        actual.add_index(Index::new("ab", ["a", "b"]));
        let mut desired = customers();
        desired.add_index(Index::new("ab", ["b", "a"]));

        let diff = TableDiff::compute(&dialect, &desired, &actual);
        assert_eq!(diff.index_changes.len(), 2);
        assert!(matches!(&diff.index_changes[0], IndexChange::Drop(i) if i.columns == ["a", "b"]));
        assert!(matches!(&diff.index_changes[1], IndexChange::Add(i) if i.columns == ["b", "a"]));
    }

    #[test]
    fn test_changed_column_is_modified() {
        let dialect = DialectImpl::from_driver("mysql").unwrap();
        let actual = customers();
        let mut desired = customers();
        desired.add_column(Column::new("a", CanonicalType::BigInteger).nullable());

        let diff = TableDiff::compute(&dialect, &desired, &actual);
        assert!(diff.dropped_columns.is_empty());
        assert!(diff.added_columns.is_empty());
        assert_eq!(diff.modified_columns.len(), 1);
        assert_eq!(diff.modified_columns[0].actual.column_type, CanonicalType::Integer);
        assert_eq!(diff.modified_columns[0].desired.column_type, CanonicalType::BigInteger);
    }

    #[test]
    fn test_constraint_only_in_actual_is_dropped() {
        let dialect = DialectImpl::from_driver("pgsql").unwrap();
        let mut actual = customers();
        actual.add_constraint(check("customers_id_check", "CHECK ((id > 0))"));

        let diff = TableDiff::compute(&dialect, &customers(), &actual);
        assert_eq!(
            diff.constraint_changes,
            vec![ConstraintChange::Drop(check("customers_id_check", "CHECK ((id > 0))"))]
        );
    }

    #[test]
    fn test_constraint_only_in_desired_is_added() {
        let dialect = DialectImpl::from_driver("pgsql").unwrap();
        let mut desired = customers();
        desired.add_constraint(check("customers_id_check", "CHECK ((id > 0))"));

        let diff = TableDiff::compute(&dialect, &desired, &customers());
        assert_eq!(
            diff.constraint_changes,
            vec![ConstraintChange::Add(check("customers_id_check", "CHECK ((id > 0))"))]
        );
    }

    #[test]
    fn test_changed_constraint_is_drop_then_add() {
        let dialect = DialectImpl::from_driver("mysql").unwrap();
        let mut actual = customers();
        actual.add_constraint(check("customers_id_check", "CHECK ((id > 0))"));
        let mut desired = customers();
        desired.add_constraint(check("customers_id_check", "CHECK ((id > 1))"));

        let diff = TableDiff::compute(&dialect, &desired, &actual);
        assert_eq!(
            diff.constraint_changes,
            vec![
                ConstraintChange::Drop(check("customers_id_check", "CHECK ((id > 0))")),
                ConstraintChange::Add(check("customers_id_check", "CHECK ((id > 1))")),
            ]
        );
        assert!(diff.modified_columns.is_empty());
        assert!(diff.index_changes.is_empty());
    }

    #[test]
    fn test_self_diff_is_empty() {
        for driver in ["mysql", "pgsql"] {
            let dialect = DialectImpl::from_driver(driver).unwrap();
            let schema: Schema = [customers()].into_iter().collect();
            let planner = MigrationPlanner::new(&dialect);
            assert!(planner.diff(&schema, &schema).is_empty(), "{}", driver);
        }
    }

    #[test]
    fn test_table_only_in_actual_is_dropped() {
        let dialect = DialectImpl::from_driver("mysql").unwrap();
        let actual: Schema = [customers()].into_iter().collect();
        let statements = MigrationPlanner::new(&dialect).diff(&Schema::new(), &actual);
        assert_eq!(statements, vec!["DROP TABLE `customers`;".to_string()]);
    }

    #[test]
    fn test_diff_is_deterministic() {
        let dialect = DialectImpl::from_driver("pgsql").unwrap();
        let mut changed = customers();
        changed.add_column(Column::new("d", CanonicalType::Text).nullable());
        let desired: Schema = [changed, Table::new("extra")].into_iter().collect();
        let actual: Schema = [customers()].into_iter().collect();

        let planner = MigrationPlanner::new(&dialect);
        assert_eq!(planner.diff(&desired, &actual), planner.diff(&desired, &actual));
    }
}
