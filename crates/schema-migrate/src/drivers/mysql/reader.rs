//! MySQL/MariaDB schema introspection.
//!
//! Reads table, column, and index metadata with `SHOW` statements and turns
//! the native rows into canonical columns and indexes. MySQL constraints
//! are not introspected; primary and unique keys are kept as indexes.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::row::{Row, RowExt};
use crate::core::schema::{Column, Index, CURRENT_TIMESTAMP, PRIMARY_INDEX};
use crate::core::traits::Connection;
use crate::dialect::{CanonicalType, MysqlTypeMapper, TypeMapper};
use crate::error::{Result, SchemaError};

/// `base(args)suffix`, e.g. `varchar(64)` or `int(10) unsigned`.
static TYPE_WITH_ARGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)\((.*)\)(.*)").expect("Invalid column type regex"));

/// Quote an identifier with backticks, doubling embedded backticks.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Split a native column type into its base name and argument list.
///
/// Quotes are stripped from the arguments, so `enum('a','b')` yields
/// `("enum", ["a", "b"])`.
pub(crate) fn split_type(native: &str) -> (String, Vec<String>) {
    match TYPE_WITH_ARGS.captures(native) {
        Some(caps) => {
            let base = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            let args = caps
                .get(2)
                .map_or("", |m| m.as_str())
                .replace('\'', "")
                .split(',')
                .map(|s| s.trim().to_string())
                .collect();
            (base, args)
        }
        None => (native.trim().to_string(), Vec::new()),
    }
}

/// MySQL/MariaDB metadata reader.
#[derive(Debug, Clone, Default)]
pub struct MysqlReader {
    mapper: MysqlTypeMapper,
}

impl MysqlReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base tables from `SHOW TABLE STATUS`; views are skipped.
    pub fn fetch_tables(&self, conn: &dyn Connection) -> Result<Vec<String>> {
        let rows = conn.run_list_query("SHOW TABLE STATUS")?;
        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            let is_view = row
                .get_str("Comment")
                .is_some_and(|c| c.eq_ignore_ascii_case("VIEW"));
            if is_view {
                continue;
            }
            tables.push(row.require_str("Name")?);
        }
        Ok(tables)
    }

    pub fn fetch_columns(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>> {
        conn.run_list_query(&format!("SHOW FULL FIELDS FROM {}", quote_ident(table)))
    }

    pub fn fetch_indexes(&self, conn: &dyn Connection, table: &str) -> Result<Vec<Row>> {
        conn.run_list_query(&format!("SHOW INDEX FROM {}", quote_ident(table)))
    }

    /// Canonicalize `SHOW FULL FIELDS` rows.
    pub fn parse_columns(&self, table: &str, rows: &[Row]) -> Result<IndexMap<String, Column>> {
        let mut columns = IndexMap::with_capacity(rows.len());
        for row in rows {
            let column = self.parse_column(table, row)?;
            columns.insert(column.name.clone(), column);
        }
        debug!("mysql: {} columns in {}", columns.len(), table);
        Ok(columns)
    }

    fn parse_column(&self, table: &str, row: &Row) -> Result<Column> {
        let name = row.require_str("Field")?;
        let native = row.require_str("Type")?;
        let (base, args) = split_type(&native);

        let column_type = self
            .mapper
            .to_canonical(&base)
            .ok_or_else(|| SchemaError::unsupported_type(table, &name, &base))?;

        let mut column = Column::new(name, column_type);
        let arg = |i: usize| args.get(i).and_then(|a| a.parse::<u32>().ok());

        match column_type {
            CanonicalType::Decimal | CanonicalType::Float => {
                column.precision = arg(0);
                column.scale = arg(1);
            }
            CanonicalType::Enum => column.values = args.clone(),
            CanonicalType::Varchar | CanonicalType::Char => column.length = arg(0),
            _ => {}
        }

        column.nullable = row
            .get_str("Null")
            .is_some_and(|n| n.eq_ignore_ascii_case("yes"));

        if let Some(default) = row.get_str("Default") {
            let lower = default.to_lowercase();
            column.default = if lower == CURRENT_TIMESTAMP || lower == "current_timestamp()" {
                Some(CURRENT_TIMESTAMP.to_string())
            } else {
                Some(default)
            };
        }

        if let Some(extra) = row.get_str("Extra") {
            let extra = extra.to_lowercase();
            if extra.contains("auto_increment") {
                column.autoincrement = true;
            }
            if extra.contains("on update current_timestamp") {
                column.onupdate = Some(CURRENT_TIMESTAMP.to_string());
            }
        }

        Ok(column)
    }

    /// Group `SHOW INDEX` rows (one per indexed column) into indexes.
    pub fn parse_indexes(&self, rows: &[Row]) -> Result<IndexMap<String, Index>> {
        let mut indexes: IndexMap<String, Index> = IndexMap::new();
        for row in rows {
            let key_name = row.require_str("Key_name")?;
            let column = row.require_str("Column_name")?;

            if let Some(index) = indexes.get_mut(&key_name) {
                index.columns.push(column);
                continue;
            }

            let mut index = Index::new(key_name.clone(), [column]);
            if key_name == PRIMARY_INDEX {
                index.primary = true;
            } else if row.get_str("Non_unique").as_deref() == Some("0") {
                index.unique = true;
            }
            indexes.insert(key_name, index);
        }
        Ok(indexes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::row::row;
    use serde_json::{json, Value};

    fn field(name: &str, ty: &str, null: &str, default: Value, extra: &str) -> Row {
        row([
            ("Field", json!(name)),
            ("Type", json!(ty)),
            ("Collation", Value::Null),
            ("Null", Value::from(null)),
            ("Key", json!("")),
            ("Default", default),
            ("Extra", json!(extra)),
        ])
    }

    #[test]
    fn test_split_type() {
        assert_eq!(split_type("varchar(64)"), ("varchar".into(), vec!["64".into()]));
        assert_eq!(
            split_type("enum('male','female')"),
            ("enum".into(), vec!["male".into(), "female".into()])
        );
        assert_eq!(
            split_type("decimal(10,2)"),
            ("decimal".into(), vec!["10".into(), "2".into()])
        );
        assert_eq!(split_type("int(10) unsigned").0, "int");
        assert_eq!(split_type("longtext"), ("longtext".into(), vec![]));
    }

    #[test]
    fn test_parse_columns() {
        let rows = vec![
            field("id", "int(11)", "NO", Value::Null, "auto_increment"),
            field("username", "varchar(64)", "NO", json!(""), ""),
            field("gender", "enum('male','female','other')", "NO", json!("other"), ""),
            field("email", "varchar(255)", "YES", Value::Null, ""),
            field("price", "decimal(10,2)", "NO", json!("0.00"), ""),
            field(
                "changed",
                "timestamp",
                "NO",
                json!("CURRENT_TIMESTAMP"),
                "DEFAULT_GENERATED on update CURRENT_TIMESTAMP",
            ),
        ];

        let cols = MysqlReader::new().parse_columns("usertable", &rows).unwrap();

        assert!(cols["id"].autoincrement);
        assert_eq!(cols["id"].column_type, CanonicalType::Integer);
        assert_eq!(cols["username"].length, Some(64));
        assert_eq!(cols["username"].default.as_deref(), Some(""));
        assert_eq!(cols["gender"].values, vec!["male", "female", "other"]);
        assert!(cols["email"].nullable);
        assert_eq!(cols["email"].default, None);
        assert_eq!(cols["price"].precision, Some(10));
        assert_eq!(cols["price"].scale, Some(2));
        assert_eq!(cols["changed"].column_type, CanonicalType::DatetimeTz);
        assert_eq!(cols["changed"].default.as_deref(), Some(CURRENT_TIMESTAMP));
        assert_eq!(cols["changed"].onupdate.as_deref(), Some(CURRENT_TIMESTAMP));
    }

    #[test]
    fn test_unknown_type_is_fatal() {
        let rows = vec![field("shape", "geometry", "NO", Value::Null, "")];
        let err = MysqlReader::new().parse_columns("places", &rows).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid field type: geometry in table: places field: shape"
        );
    }

    #[test]
    fn test_parse_indexes_groups_columns() {
        let idx = |key: &str, col: &str, non_unique: i64| {
            row([
                ("Table", json!("usertable")),
                ("Non_unique", json!(non_unique)),
                ("Key_name", json!(key)),
                ("Column_name", json!(col)),
            ])
        };
        let rows = vec![
            idx("PRIMARY", "id", 0),
            idx("username", "username", 0),
            idx("gendercreated", "gender", 1),
            idx("gendercreated", "usercreated", 1),
        ];

        let indexes = MysqlReader::new().parse_indexes(&rows).unwrap();
        assert_eq!(indexes.len(), 3);
        assert!(indexes["PRIMARY"].primary);
        assert!(!indexes["PRIMARY"].unique);
        assert!(indexes["username"].unique);
        assert_eq!(indexes["gendercreated"].columns, vec!["gender", "usercreated"]);
        assert!(!indexes["gendercreated"].unique);
    }
}
