//! Schema service: the entry point tying introspection, dumps, and
//! migration planning to one connection.
//!
//! A service is bound to a single connection and holds no internal
//! synchronization; confine each instance to one thread.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::row::RawTable;
use crate::core::schema::Schema;
use crate::core::traits::{Connection, FileStore, SchemaDialect};
use crate::diff::MigrationPlanner;
use crate::drivers::DialectImpl;
use crate::dump::{DumpStore, LocalFileStore};
use crate::error::Result;

/// Introspects, dumps, and diffs the schema of one connection.
pub struct SchemaService<'a, F: FileStore = LocalFileStore> {
    conn: &'a dyn Connection,
    dialect: DialectImpl,
    dumps: DumpStore<F>,
}

impl<'a> SchemaService<'a, LocalFileStore> {
    /// Build a service whose dump location comes from `config`.
    ///
    /// The connection's name selects the config entry; its driver name
    /// selects the dialect.
    pub fn from_config(conn: &'a dyn Connection, config: &Config) -> Result<Self> {
        let dir = config.dump_dir(conn.connection_name())?;
        Self::new(conn, DumpStore::new(LocalFileStore, dir))
    }
}

impl<'a, F: FileStore> SchemaService<'a, F> {
    /// Build a service, selecting the dialect from the connection's driver name.
    pub fn new(conn: &'a dyn Connection, dumps: DumpStore<F>) -> Result<Self> {
        let dialect = DialectImpl::from_driver(conn.driver_name())?;
        Ok(Self::with_dialect(conn, dialect, dumps))
    }

    pub fn with_dialect(
        conn: &'a dyn Connection,
        dialect: DialectImpl,
        dumps: DumpStore<F>,
    ) -> Self {
        Self {
            conn,
            dialect,
            dumps,
        }
    }

    pub fn dialect(&self) -> &DialectImpl {
        &self.dialect
    }

    /// Dump file for this connection.
    pub fn dump_path(&self) -> PathBuf {
        self.dumps.path(self.conn.connection_name())
    }

    /// Introspect and normalize the live schema.
    ///
    /// An empty database is logged and yields an empty schema. Any table
    /// with an unmappable type fails the whole operation.
    pub fn schema(&self) -> Result<Schema> {
        let tables = self.dialect.fetch_tables(self.conn)?;
        if tables.is_empty() {
            warn!("database is empty");
            return Ok(Schema::new());
        }

        let mut schema = Schema::new();
        for name in tables {
            let raw = RawTable {
                columns: self.dialect.fetch_columns(self.conn, &name)?,
                constraints: self.dialect.fetch_constraints(self.conn, &name)?,
                indexes: self.dialect.fetch_indexes(self.conn, &name)?,
            };
            let table = self.dialect.normalize(&name, raw)?;
            debug!(
                "{}: {} columns, {} constraints, {} indexes",
                name,
                table.columns.len(),
                table.constraints.len(),
                table.indexes.len()
            );
            schema.insert(table);
        }

        info!(
            "introspected {} tables from {} ({})",
            schema.len(),
            self.conn.connection_name(),
            self.dialect.name()
        );
        Ok(schema)
    }

    /// Introspect and write the dump; returns the file written.
    pub fn write_dump(&self) -> Result<PathBuf> {
        let schema = self.schema()?;
        self.dumps.write(self.conn.connection_name(), &schema)
    }

    /// Load this connection's dump, normalized for the active dialect.
    pub fn load_dump(&self) -> Result<Schema> {
        self.load_dump_from(&self.dump_path())
    }

    /// Load a dump from an explicit path, normalized for the active dialect.
    pub fn load_dump_from(&self, path: &Path) -> Result<Schema> {
        self.dumps.load_from(path, &self.dialect)
    }

    /// Statements migrating the live database to this connection's dump.
    ///
    /// `Ok(None)` means the dump was missing or empty and no migration can
    /// be planned; `Ok(Some(vec![]))` means there are no differences.
    pub fn migration_script(&self) -> Result<Option<Vec<String>>> {
        self.migration_script_from(&self.dump_path())
    }

    /// Like [`migration_script`](Self::migration_script) with an explicit dump path.
    pub fn migration_script_from(&self, path: &Path) -> Result<Option<Vec<String>>> {
        let desired = self.load_dump_from(path)?;
        if desired.is_empty() {
            debug!("no migration without a dump: {}", path.display());
            return Ok(None);
        }
        let actual = self.schema()?;
        Ok(Some(self.create_migration(&desired, &actual)))
    }

    /// Diff two schemas with the active dialect.
    pub fn create_migration(&self, desired: &Schema, actual: &Schema) -> Vec<String> {
        MigrationPlanner::new(&self.dialect).diff(desired, actual)
    }

    /// Pretty JSON of `schema` in canonical order.
    pub fn to_json(&self, schema: &Schema) -> Result<String> {
        Ok(serde_json::to_string_pretty(&schema.sorted())?)
    }
}

/// One statement per line.
pub fn script_to_string(statements: &[String]) -> String {
    let mut out = String::new();
    for statement in statements {
        out.push_str(statement);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_to_string() {
        let script = script_to_string(&["DROP TABLE a;".to_string(), "DROP TABLE b;".to_string()]);
        assert_eq!(script, "DROP TABLE a;\nDROP TABLE b;\n");
        assert_eq!(script_to_string(&[]), "");
    }
}
