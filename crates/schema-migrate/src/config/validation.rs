//! Configuration validation.

use super::Config;
use crate::drivers::DialectImpl;
use crate::error::{Result, SchemaError};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.paths.config.as_os_str().is_empty() {
        return Err(SchemaError::Config("paths.config is required".into()));
    }
    if let Some(internal) = &config.paths.internal_config {
        if internal.as_os_str().is_empty() {
            return Err(SchemaError::Config(
                "paths.internal_config must not be empty when set".into(),
            ));
        }
    }

    for (name, conn) in &config.connections {
        if name.trim().is_empty() {
            return Err(SchemaError::Config("connection names must not be empty".into()));
        }
        if conn.database.is_empty() {
            return Err(SchemaError::Config(format!(
                "connections.{}.database is required",
                name
            )));
        }
        if !DialectImpl::is_supported(&conn.driver) {
            return Err(SchemaError::Config(format!(
                "connections.{}.driver '{}' is not supported",
                name, conn.driver
            )));
        }
        if conn.internal && config.paths.internal_config.is_none() {
            return Err(SchemaError::Config(format!(
                "connections.{} is internal but paths.internal_config is not set",
                name
            )));
        }
    }

    Ok(())
}
