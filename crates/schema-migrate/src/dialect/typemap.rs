//! Native ↔ canonical type mapping per dialect.
//!
//! Each dialect implements [`TypeMapper`] once in each direction. Mapping
//! into canonical types is partial: an unknown native type yields `None`,
//! and the caller turns that into
//! [`SchemaError::UnsupportedType`](crate::error::SchemaError::UnsupportedType).
//! Mapping out of canonical types is total.

use super::CanonicalType;

/// Converts between one dialect's native type names and [`CanonicalType`].
pub trait TypeMapper: Send + Sync {
    /// Dialect this mapper belongs to.
    fn dialect_name(&self) -> &str;

    /// Map a native base type name (no length/values suffix).
    fn to_canonical(&self, native: &str) -> Option<CanonicalType>;

    /// Native type token for a canonical type.
    fn from_canonical(&self, canonical: &CanonicalType) -> &'static str;
}

/// MySQL/MariaDB type mapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlTypeMapper;

impl TypeMapper for MysqlTypeMapper {
    fn dialect_name(&self) -> &str {
        "mysql"
    }

    fn to_canonical(&self, native: &str) -> Option<CanonicalType> {
        let lower = native.trim().to_lowercase();
        let ty = match lower.as_str() {
            "int" | "int unsigned" | "mediumint" | "mediumint unsigned" | "smallint"
            | "smallint unsigned" | "tinyint" | "tinyint unsigned" => CanonicalType::Integer,
            "bigint" | "bigint unsigned" => CanonicalType::BigInteger,
            "decimal" => CanonicalType::Decimal,
            "varchar" => CanonicalType::Varchar,
            "char" => CanonicalType::Char,
            "date" => CanonicalType::Date,
            "enum" => CanonicalType::Enum,
            "tinytext" | "text" | "mediumtext" | "longtext" => CanonicalType::Text,
            "datetime" => CanonicalType::Datetime,
            "timestamp" => CanonicalType::DatetimeTz,
            "json" => CanonicalType::Json,
            "tinyblob" | "blob" | "mediumblob" | "longblob" => CanonicalType::Blob,
            "float" => CanonicalType::Float,
            "time" => CanonicalType::Time,
            "double" => CanonicalType::Double,
            _ => return None,
        };
        Some(ty)
    }

    fn from_canonical(&self, canonical: &CanonicalType) -> &'static str {
        match canonical {
            CanonicalType::Integer => "int",
            CanonicalType::BigInteger => "bigint",
            CanonicalType::Decimal => "decimal",
            CanonicalType::Varchar => "varchar",
            CanonicalType::Char => "char",
            CanonicalType::Text => "longtext",
            CanonicalType::Date => "date",
            CanonicalType::Time => "time",
            CanonicalType::Datetime => "datetime",
            CanonicalType::DatetimeTz => "timestamp",
            CanonicalType::Json => "json",
            CanonicalType::Blob => "longblob",
            CanonicalType::Float => "float",
            CanonicalType::Double => "double",
            CanonicalType::Enum => "enum",
        }
    }
}

/// PostgreSQL type mapper.
///
/// PostgreSQL has no native enum here; enum columns are rewritten to text
/// plus a check constraint during normalization, so `Enum` renders as `text`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresTypeMapper;

impl TypeMapper for PostgresTypeMapper {
    fn dialect_name(&self) -> &str {
        "postgres"
    }

    fn to_canonical(&self, native: &str) -> Option<CanonicalType> {
        let lower = native.trim().to_lowercase();
        let ty = match lower.as_str() {
            "character varying" => CanonicalType::Varchar,
            "integer" => CanonicalType::Integer,
            "timestamp without time zone" => CanonicalType::Datetime,
            "timestamp with time zone" => CanonicalType::DatetimeTz,
            "date" => CanonicalType::Date,
            "bigint" => CanonicalType::BigInteger,
            "text" => CanonicalType::Text,
            "json" => CanonicalType::Json,
            "bytea" => CanonicalType::Blob,
            "character" => CanonicalType::Char,
            "real" => CanonicalType::Float,
            "double precision" => CanonicalType::Double,
            "time without time zone" => CanonicalType::Time,
            "decimal" | "numeric" => CanonicalType::Decimal,
            _ => return None,
        };
        Some(ty)
    }

    fn from_canonical(&self, canonical: &CanonicalType) -> &'static str {
        match canonical {
            CanonicalType::Integer => "int",
            CanonicalType::BigInteger => "bigint",
            CanonicalType::Decimal => "decimal",
            CanonicalType::Varchar => "varchar",
            CanonicalType::Char => "char",
            CanonicalType::Text | CanonicalType::Enum => "text",
            CanonicalType::Date => "date",
            CanonicalType::Time => "time without time zone",
            CanonicalType::Datetime => "timestamp without time zone",
            CanonicalType::DatetimeTz => "timestamp with time zone",
            CanonicalType::Json => "json",
            CanonicalType::Blob => "bytea",
            CanonicalType::Float => "real",
            CanonicalType::Double => "double precision",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_integer_family() {
        let m = MysqlTypeMapper;
        for native in ["int", "tinyint unsigned", "SMALLINT", "mediumint"] {
            assert_eq!(m.to_canonical(native), Some(CanonicalType::Integer), "{}", native);
        }
        assert_eq!(m.to_canonical("bigint unsigned"), Some(CanonicalType::BigInteger));
    }

    #[test]
    fn test_mysql_text_and_blob_collapse() {
        let m = MysqlTypeMapper;
        assert_eq!(m.to_canonical("mediumtext"), Some(CanonicalType::Text));
        assert_eq!(m.to_canonical("tinyblob"), Some(CanonicalType::Blob));
        assert_eq!(m.from_canonical(&CanonicalType::Text), "longtext");
        assert_eq!(m.from_canonical(&CanonicalType::Blob), "longblob");
    }

    #[test]
    fn test_mysql_timestamp_is_datetimetz() {
        let m = MysqlTypeMapper;
        assert_eq!(m.to_canonical("timestamp"), Some(CanonicalType::DatetimeTz));
        assert_eq!(m.from_canonical(&CanonicalType::DatetimeTz), "timestamp");
    }

    #[test]
    fn test_mysql_unknown_type() {
        assert_eq!(MysqlTypeMapper.to_canonical("geometry"), None);
        assert_eq!(MysqlTypeMapper.to_canonical("set"), None);
    }

    #[test]
    fn test_postgres_mapping() {
        let m = PostgresTypeMapper;
        assert_eq!(m.to_canonical("character varying"), Some(CanonicalType::Varchar));
        assert_eq!(m.to_canonical("numeric"), Some(CanonicalType::Decimal));
        assert_eq!(m.to_canonical("double precision"), Some(CanonicalType::Double));
        assert_eq!(m.to_canonical("uuid"), None);
        assert_eq!(m.from_canonical(&CanonicalType::Enum), "text");
        assert_eq!(m.from_canonical(&CanonicalType::Blob), "bytea");
    }

    #[test]
    fn test_postgres_reads_every_type() {
        // Enum has no native spelling; it is stored as text
        let m = PostgresTypeMapper;
        let natives = [
            ("character varying", CanonicalType::Varchar),
            ("integer", CanonicalType::Integer),
            ("timestamp without time zone", CanonicalType::Datetime),
            ("timestamp with time zone", CanonicalType::DatetimeTz),
            ("date", CanonicalType::Date),
            ("bigint", CanonicalType::BigInteger),
            ("text", CanonicalType::Text),
            ("json", CanonicalType::Json),
            ("bytea", CanonicalType::Blob),
            ("character", CanonicalType::Char),
            ("real", CanonicalType::Float),
            ("double precision", CanonicalType::Double),
            ("time without time zone", CanonicalType::Time),
            ("numeric", CanonicalType::Decimal),
        ];
        for (native, canonical) in natives {
            assert_eq!(m.to_canonical(native), Some(canonical), "{}", native);
        }

        for t in CanonicalType::ALL {
            let covered = natives.iter().any(|(_, c)| *c == t);
            assert_eq!(covered, t != CanonicalType::Enum, "{}", t);
        }
    }
}
