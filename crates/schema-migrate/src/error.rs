//! Error types for schema introspection and migration planning.

use thiserror::Error;

/// Main error type for schema operations.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A native column type has no canonical mapping.
    #[error("invalid field type: {native_type} in table: {table} field: {column}")]
    UnsupportedType {
        table: String,
        column: String,
        native_type: String,
    },

    /// A constraint kind the normalizer cannot represent.
    #[error("unsupported constraint type '{contype}' for {name} in table {table}")]
    UnsupportedConstraint {
        table: String,
        name: String,
        contype: String,
    },

    /// No dialect is registered for the driver name.
    #[error("Unknown database driver: {0}")]
    UnknownDriver(String),

    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The connection collaborator failed to run a metadata query.
    #[error("Query failed: {message}\n  SQL: {sql}")]
    Query { message: String, sql: String },

    /// A metadata row is missing a required key.
    #[error("Malformed metadata row: {0}")]
    MalformedRow(String),

    /// Dump file content could not be interpreted.
    #[error("Dump error: {0}")]
    Dump(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SchemaError {
    /// Create an UnsupportedType error for a column.
    pub fn unsupported_type(
        table: impl Into<String>,
        column: impl Into<String>,
        native_type: impl Into<String>,
    ) -> Self {
        SchemaError::UnsupportedType {
            table: table.into(),
            column: column.into(),
            native_type: native_type.into(),
        }
    }

    /// Create a Query error carrying the offending statement.
    pub fn query(message: impl Into<String>, sql: impl Into<String>) -> Self {
        SchemaError::Query {
            message: message.into(),
            sql: sql.into(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_message() {
        let err = SchemaError::unsupported_type("usertable", "location", "geometry");
        assert_eq!(
            err.to_string(),
            "invalid field type: geometry in table: usertable field: location"
        );
    }

    #[test]
    fn test_format_detailed_includes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = SchemaError::from(io);
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: IO error: gone"));
    }
}
