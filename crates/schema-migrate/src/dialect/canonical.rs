//! Canonical column type vocabulary.
//!
//! Every dialect maps its native type names onto this closed set and back.
//! Diffing always happens between schemas expressed in canonical types, so
//! a MySQL dump can drive a PostgreSQL database and vice versa.
//!
//! ```text
//! MySQL native   →  CanonicalType  →  PostgreSQL native
//!   mediumint    →    Integer      →    int
//!   timestamp    →    DatetimeTz   →    timestamp with time zone
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Canonical type representation shared by every dialect.
///
/// The serialized form (lowercase) is the `type` field of a dump file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalType {
    /// 32-bit integer family.
    Integer,
    /// 64-bit integer.
    BigInteger,
    /// Exact numeric with optional precision/scale.
    Decimal,
    /// Variable-length string with a length.
    Varchar,
    /// Fixed-length string with a length.
    Char,
    /// Unbounded text.
    Text,
    Date,
    Time,
    /// Timestamp without time zone.
    Datetime,
    /// Timestamp with time zone.
    DatetimeTz,
    Json,
    /// Binary large object.
    Blob,
    Float,
    Double,
    /// Enumerated string values.
    Enum,
}

impl CanonicalType {
    /// All canonical types, in declaration order.
    pub const ALL: [CanonicalType; 15] = [
        CanonicalType::Integer,
        CanonicalType::BigInteger,
        CanonicalType::Decimal,
        CanonicalType::Varchar,
        CanonicalType::Char,
        CanonicalType::Text,
        CanonicalType::Date,
        CanonicalType::Time,
        CanonicalType::Datetime,
        CanonicalType::DatetimeTz,
        CanonicalType::Json,
        CanonicalType::Blob,
        CanonicalType::Float,
        CanonicalType::Double,
        CanonicalType::Enum,
    ];

    /// Dump-file spelling of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalType::Integer => "integer",
            CanonicalType::BigInteger => "biginteger",
            CanonicalType::Decimal => "decimal",
            CanonicalType::Varchar => "varchar",
            CanonicalType::Char => "char",
            CanonicalType::Text => "text",
            CanonicalType::Date => "date",
            CanonicalType::Time => "time",
            CanonicalType::Datetime => "datetime",
            CanonicalType::DatetimeTz => "datetimetz",
            CanonicalType::Json => "json",
            CanonicalType::Blob => "blob",
            CanonicalType::Float => "float",
            CanonicalType::Double => "double",
            CanonicalType::Enum => "enum",
        }
    }

    /// Whether `length` is meaningful for this type.
    pub fn has_length(&self) -> bool {
        matches!(self, CanonicalType::Varchar | CanonicalType::Char)
    }

    /// Whether `precision`/`scale` are meaningful for this type.
    pub fn has_precision(&self) -> bool {
        matches!(self, CanonicalType::Decimal | CanonicalType::Float)
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        CanonicalType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| SchemaError::Dump(format!("unknown canonical type '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "DatetimeTZ".parse::<CanonicalType>().unwrap(),
            CanonicalType::DatetimeTz
        );
        assert_eq!(
            "biginteger".parse::<CanonicalType>().unwrap(),
            CanonicalType::BigInteger
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert!("geometry".parse::<CanonicalType>().is_err());
    }

    #[test]
    fn test_serde_spelling_matches_display() {
        for t in CanonicalType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t));
        }
    }

    #[test]
    fn test_detail_applicability() {
        assert!(CanonicalType::Varchar.has_length());
        assert!(!CanonicalType::Text.has_length());
        assert!(CanonicalType::Float.has_precision());
        assert!(!CanonicalType::Integer.has_precision());
    }
}
