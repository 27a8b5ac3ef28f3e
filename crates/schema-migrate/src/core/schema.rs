//! Canonical schema model: tables, columns, indexes, and constraints.
//!
//! These types are the dialect-independent representation produced by
//! introspection, persisted in dump files, and compared by the planner.
//! Every name-keyed mapping is an [`IndexMap`] so that iteration follows
//! insertion order; the planner depends on that order for positional hints
//! and for deterministic output.

use indexmap::IndexMap;
use serde::Serialize;

use crate::dialect::CanonicalType;

/// Reserved default/on-update value meaning "database-generated current timestamp".
pub const CURRENT_TIMESTAMP: &str = "current_timestamp";

/// Name MySQL gives the primary-key index.
pub const PRIMARY_INDEX: &str = "PRIMARY";

fn is_false(b: &bool) -> bool {
    !*b
}

/// Canonical column description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: CanonicalType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Enum values, in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub autoincrement: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onupdate: Option<String>,
}

impl Column {
    /// Create a NOT NULL column without default.
    pub fn new(name: impl Into<String>, column_type: CanonicalType) -> Self {
        Self {
            name: name.into(),
            column_type,
            length: None,
            precision: None,
            scale: None,
            values: Vec::new(),
            nullable: false,
            default: None,
            autoincrement: false,
            onupdate: None,
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u32, scale: Option<u32>) -> Self {
        self.precision = Some(precision);
        self.scale = scale;
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    pub fn on_update(mut self, value: impl Into<String>) -> Self {
        self.onupdate = Some(value.into());
        self
    }

    /// True when the default is the current-timestamp sentinel (any case).
    pub fn default_is_current_timestamp(&self) -> bool {
        self.default
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(CURRENT_TIMESTAMP))
    }
}

/// Canonical index description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Index {
    pub name: String,
    /// Column order is part of the index identity.
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub primary: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub unique: bool,
}

impl Index {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            primary: false,
            unique: false,
        }
    }

    /// The MySQL-style primary index, named `PRIMARY`.
    pub fn primary_key<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut idx = Self::new(PRIMARY_INDEX, columns);
        idx.primary = true;
        idx
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Primary when flagged or literally named `PRIMARY`.
    pub fn is_primary(&self) -> bool {
        self.primary || self.name == PRIMARY_INDEX
    }
}

/// Kind of a table constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintType {
    Primary,
    Unique,
    Check,
}

impl ConstraintType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintType::Primary => "primary",
            ConstraintType::Unique => "unique",
            ConstraintType::Check => "check",
        }
    }

    /// Parse the dump spelling or a PostgreSQL `contype` code.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "primary" | "p" => Some(ConstraintType::Primary),
            "unique" | "u" => Some(ConstraintType::Unique),
            "check" | "c" => Some(ConstraintType::Check),
            _ => None,
        }
    }
}

/// Table constraint with its dialect-rendered definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constraint {
    pub name: String,
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    pub columns: Vec<String>,
    /// Verbatim DDL fragment, e.g. `PRIMARY KEY (id)`.
    pub definition: String,
}

impl Constraint {
    pub fn new<I, S>(
        name: impl Into<String>,
        constraint_type: ConstraintType,
        columns: I,
        definition: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constraint_type,
            columns: columns.into_iter().map(Into::into).collect(),
            definition: definition.into(),
        }
    }
}

/// Canonical table structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub name: String,
    pub columns: IndexMap<String, Column>,
    pub constraints: IndexMap<String, Constraint>,
    pub indexes: IndexMap<String, Index>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a column, replacing any column of the same name.
    pub fn add_column(&mut self, column: Column) -> &mut Self {
        self.columns.insert(column.name.clone(), column);
        self
    }

    pub fn add_index(&mut self, index: Index) -> &mut Self {
        self.indexes.insert(index.name.clone(), index);
        self
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> &mut Self {
        self.constraints.insert(constraint.name.clone(), constraint);
        self
    }

    /// Apply the canonical column and index ordering in place.
    pub fn sort(&mut self) {
        sort_columns(&mut self.columns);
        sort_indexes(&mut self.indexes);
    }
}

/// Mapping of table name to table; the unit dumped and diffed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    tables: IndexMap<String, Table>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Return a copy in canonical dump order.
    pub fn sorted(&self) -> Schema {
        let mut schema = self.clone();
        schema.sort();
        schema
    }

    /// Sort tables by name, then each table's columns and indexes.
    ///
    /// Constraints keep their order.
    pub fn sort(&mut self) {
        self.tables.sort_keys();
        for table in self.tables.values_mut() {
            table.sort();
        }
    }
}

impl FromIterator<Table> for Schema {
    fn from_iter<T: IntoIterator<Item = Table>>(iter: T) -> Self {
        let mut schema = Schema::new();
        for table in iter {
            schema.insert(table);
        }
        schema
    }
}

/// Sort columns by name with autoincrement columns hoisted first.
pub fn sort_columns(columns: &mut IndexMap<String, Column>) {
    columns.sort_by(|ka, a, kb, b| {
        b.autoincrement
            .cmp(&a.autoincrement)
            .then_with(|| ka.cmp(kb))
    });
}

/// Sort indexes by name with the primary index hoisted first.
pub fn sort_indexes(indexes: &mut IndexMap<String, Index>) {
    indexes.sort_by(|ka, a, kb, b| {
        b.is_primary()
            .cmp(&a.is_primary())
            .then_with(|| ka.cmp(kb))
    });
}
