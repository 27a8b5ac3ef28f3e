//! Schema dump files.
//!
//! A dump is a JSON object mapping table name to
//! `{ "name", "columns", "constraints", "indexes" }`, each of the latter a
//! name-keyed object. Dumps are written sorted and pretty-printed.
//!
//! Reading is lenient so dumps produced by older writers still load:
//! - an empty mapping may appear as `[]`, and missing sections mean empty
//! - entry `name` fields are optional and default to the key
//! - flags accept any truthy value (`true`, `1`, `"1"`)
//! - numbers may be strings, and defaults may be numbers or booleans
//! - `enumValues`, `defaultValue`, `autoIncrement`, `onUpdate` are accepted
//!   as aliases of `values`, `default`, `autoincrement`, `onupdate`

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::core::row::{is_truthy, scalar_to_string, scalar_to_u32};
use crate::core::schema::{Column, Constraint, ConstraintType, Index, Schema, Table};
use crate::core::traits::{FileStore, SchemaDialect};
use crate::dialect::CanonicalType;
use crate::error::{Result, SchemaError};

/// Subdirectory of a config directory holding dump files.
pub const SCHEMA_DIR: &str = "schema";

/// [`FileStore`] backed by the local filesystem.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so readers never see a partial dump.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl FileStore for LocalFileStore {
    fn read_all(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, path: &Path, data: &[u8]) -> Result<()> {
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, data)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }
}

/// Reads and writes per-connection dump files in one directory.
#[derive(Debug, Clone)]
pub struct DumpStore<F: FileStore = LocalFileStore> {
    store: F,
    dir: PathBuf,
}

impl DumpStore<LocalFileStore> {
    /// Dumps under `<config_dir>/schema` on the local filesystem.
    pub fn local(config_dir: impl AsRef<Path>) -> Self {
        Self::new(LocalFileStore, config_dir.as_ref().join(SCHEMA_DIR))
    }
}

impl<F: FileStore> DumpStore<F> {
    /// Dumps stored directly in `dir`.
    pub fn new(store: F, dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<connection>.json`
    pub fn path(&self, connection: &str) -> PathBuf {
        self.dir.join(format!("{}.json", connection))
    }

    /// Write `schema` in canonical order; returns the file written.
    pub fn write(&self, connection: &str, schema: &Schema) -> Result<PathBuf> {
        self.store.ensure_dir(&self.dir)?;
        let path = self.path(connection);
        let json = serde_json::to_string_pretty(&schema.sorted())?;
        self.store.write_all(&path, json.as_bytes())?;
        info!("dump written to {}", path.display());
        Ok(path)
    }

    /// Load the dump for `connection`; see [`load_from`](Self::load_from).
    pub fn load<D: SchemaDialect + ?Sized>(&self, connection: &str, dialect: &D) -> Result<Schema> {
        self.load_from(&self.path(connection), dialect)
    }

    /// Load a dump and normalize every table for `dialect`.
    ///
    /// A missing or empty file yields an empty schema.
    pub fn load_from<D: SchemaDialect + ?Sized>(&self, path: &Path, dialect: &D) -> Result<Schema> {
        let data = match self.store.read_all(path)? {
            Some(data) => data,
            None => {
                warn!("no dump at {}", path.display());
                return Ok(Schema::new());
            }
        };

        let decoded = decode_schema(&data)?;
        if decoded.is_empty() {
            warn!("dump is empty: {}", path.display());
        }
        let mut schema = Schema::new();
        for table in decoded.tables() {
            schema.insert(dialect.normalize_table(table.clone())?);
        }
        Ok(schema)
    }
}

/// Decode dump bytes into a schema without dialect normalization.
pub fn decode_schema(data: &[u8]) -> Result<Schema> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Schema::new());
    }

    let root: Value = serde_json::from_slice(data)?;
    let mut schema = Schema::new();
    for (table_name, value) in entries(&root, "dump")? {
        schema.insert(decode_table(table_name, value)?);
    }
    Ok(schema)
}

/// Entries of a name-keyed mapping; `[]`, `null`, and absence are empty.
fn entries<'a>(value: &'a Value, what: &str) -> Result<Vec<(&'a str, &'a Value)>> {
    match value {
        Value::Object(map) => Ok(map.iter().map(|(k, v)| (k.as_str(), v)).collect()),
        Value::Array(items) if items.is_empty() => Ok(Vec::new()),
        Value::Null => Ok(Vec::new()),
        _ => Err(SchemaError::Dump(format!("{} must be an object", what))),
    }
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| SchemaError::Dump(format!("{} must be an object", what)))
}

/// First present, non-null value among `keys`.
fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

fn flag(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    field(obj, keys).is_some_and(is_truthy)
}

fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    field(obj, keys).and_then(scalar_to_string)
}

fn number(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    field(obj, &[key]).and_then(scalar_to_u32)
}

fn string_list(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    match field(obj, keys) {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(other) => scalar_to_string(other).into_iter().collect(),
        None => Vec::new(),
    }
}

fn decode_table(name: &str, value: &Value) -> Result<Table> {
    let obj = as_object(value, &format!("table {}", name))?;
    let mut table = Table::new(name);
    let empty = Value::Null;

    for (key, col) in entries(obj.get("columns").unwrap_or(&empty), "columns")? {
        table.add_column(decode_column(name, key, col)?);
    }
    for (key, con) in entries(obj.get("constraints").unwrap_or(&empty), "constraints")? {
        table.add_constraint(decode_constraint(name, key, con)?);
    }
    for (key, idx) in entries(obj.get("indexes").unwrap_or(&empty), "indexes")? {
        table.add_index(decode_index(name, key, idx)?);
    }
    Ok(table)
}

fn decode_column(table: &str, key: &str, value: &Value) -> Result<Column> {
    let obj = as_object(value, &format!("column {}.{}", table, key))?;
    let name = text(obj, &["name"]).unwrap_or_else(|| key.to_string());
    let type_name = text(obj, &["type"])
        .ok_or_else(|| SchemaError::Dump(format!("column {}.{} has no type", table, name)))?;
    let column_type: CanonicalType = type_name
        .parse()
        .map_err(|_| SchemaError::unsupported_type(table, &name, &type_name))?;

    let mut column = Column::new(name, column_type);
    column.length = number(obj, "length");
    column.precision = number(obj, "precision");
    column.scale = number(obj, "scale");
    column.values = string_list(obj, &["values", "enumValues"]);
    column.nullable = flag(obj, &["nullable"]);
    column.default = text(obj, &["default", "defaultValue"]);
    column.autoincrement = flag(obj, &["autoincrement", "autoIncrement"]);
    column.onupdate = text(obj, &["onupdate", "onUpdate"]);
    Ok(column)
}

fn decode_index(table: &str, key: &str, value: &Value) -> Result<Index> {
    let obj = as_object(value, &format!("index {}.{}", table, key))?;
    let name = text(obj, &["name"]).unwrap_or_else(|| key.to_string());
    let mut index = Index::new(name, string_list(obj, &["columns"]));
    index.primary = flag(obj, &["primary"]);
    index.unique = flag(obj, &["unique"]);
    Ok(index)
}

fn decode_constraint(table: &str, key: &str, value: &Value) -> Result<Constraint> {
    let obj = as_object(value, &format!("constraint {}.{}", table, key))?;
    let name = text(obj, &["name"]).unwrap_or_else(|| key.to_string());
    let kind = text(obj, &["type"]).unwrap_or_default();
    let constraint_type =
        ConstraintType::parse(&kind).ok_or_else(|| SchemaError::UnsupportedConstraint {
            table: table.to_string(),
            name: name.clone(),
            contype: kind.clone(),
        })?;
    Ok(Constraint::new(
        name,
        constraint_type,
        string_list(obj, &["columns"]),
        text(obj, &["definition"]).unwrap_or_default(),
    ))
}
