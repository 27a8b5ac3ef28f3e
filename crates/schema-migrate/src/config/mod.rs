//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::{Path, PathBuf};

use crate::dump::SCHEMA_DIR;
use crate::error::{Result, SchemaError};

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Look up a connection by name.
    pub fn connection(&self, name: &str) -> Result<&ConnectionConfig> {
        self.connections
            .get(name)
            .ok_or_else(|| SchemaError::Config(format!("unknown connection '{}'", name)))
    }

    /// Config directory a connection's dump lives under.
    pub fn base_dir(&self, connection: &str) -> Result<&Path> {
        let conn = self.connection(connection)?;
        if !conn.internal {
            return Ok(&self.paths.config);
        }
        self.paths.internal_config.as_deref().ok_or_else(|| {
            SchemaError::Config(format!(
                "connection '{}' is internal but paths.internal_config is not set",
                connection
            ))
        })
    }

    /// `<base>/schema`
    pub fn dump_dir(&self, connection: &str) -> Result<PathBuf> {
        Ok(self.base_dir(connection)?.join(SCHEMA_DIR))
    }

    /// `<base>/schema/<connection>.json`
    pub fn dump_path(&self, connection: &str) -> Result<PathBuf> {
        Ok(self.dump_dir(connection)?.join(format!("{}.json", connection)))
    }
}
