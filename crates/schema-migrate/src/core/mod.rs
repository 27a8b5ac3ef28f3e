//! Core abstractions shared by every dialect.
//!
//! - [`schema`]: the canonical model and its sort rules
//! - [`row`]: metadata rows as returned by a connection
//! - [`traits`]: collaborator contracts and the dialect capability trait

pub mod row;
pub mod schema;
pub mod traits;

pub use row::{RawTable, Row, RowExt};
pub use schema::{
    sort_columns, sort_indexes, Column, Constraint, ConstraintType, Index, Schema, Table,
    CURRENT_TIMESTAMP, PRIMARY_INDEX,
};
pub use traits::{Connection, FileStore, SchemaDialect};
