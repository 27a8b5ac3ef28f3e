//! Canonical types and per-dialect type mapping.
//!
//! # Available Mappers
//!
//! - [`MysqlTypeMapper`]: MySQL/MariaDB native names
//! - [`PostgresTypeMapper`]: PostgreSQL `information_schema` names
//!
//! # Usage
//!
//! ```rust
//! use schema_migrate::dialect::{CanonicalType, MysqlTypeMapper, TypeMapper};
//!
//! let canonical = MysqlTypeMapper.to_canonical("mediumint").unwrap();
//! assert_eq!(canonical, CanonicalType::Integer);
//! assert_eq!(MysqlTypeMapper.from_canonical(&canonical), "int");
//! ```

mod canonical;
mod typemap;

pub use canonical::CanonicalType;
pub use typemap::{MysqlTypeMapper, PostgresTypeMapper, TypeMapper};
