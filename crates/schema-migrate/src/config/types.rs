//! Configuration type definitions.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directories dump files are resolved against.
    pub paths: PathsConfig,

    /// Named database connections, in file order.
    #[serde(default)]
    pub connections: IndexMap<String, ConnectionConfig>,
}

/// Config directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Application config directory.
    pub config: PathBuf,

    /// Framework-internal config directory, used by connections flagged `internal`.
    #[serde(default)]
    pub internal_config: Option<PathBuf>,
}

/// One named connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Driver name (mysql, mysqli, mariadb, pgsql, postgres, postgresql, pg).
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Database name.
    pub database: String,

    /// Store this connection's dump under the internal config directory.
    #[serde(default)]
    pub internal: bool,
}

fn default_driver() -> String {
    "mysql".to_string()
}
