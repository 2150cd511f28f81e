//! Database schema types for trueup.
//!
//! The same shapes describe a *declared* schema (the structure a codebase
//! wants) and a *live* schema (the structure introspection reports), so the
//! two sides can be compared field by field. No reconciliation logic lives
//! here; these are plain data types plus their SQL renderings.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;
use trueup_sql::{Lit, index_name, unique_index_name};

/// Logical column types.
///
/// These are declaration-level symbols, not raw Postgres type names: a
/// `String` column with `limit: 40` renders as `VARCHAR(40)`, an `Integer`
/// with `limit: 2` as `SMALLINT`. Introspection maps native types back onto
/// the same symbols so that a declared and a live column compare directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlType {
    /// VARCHAR; the column `limit` is the character length (default 255).
    String,
    /// TEXT
    Text,
    /// INTEGER, or SMALLINT with `limit: 2`.
    Integer,
    /// BIGINT
    BigInt,
    /// DOUBLE PRECISION, or REAL with `limit: 4`.
    Float,
    /// NUMERIC; the column `precision`/`scale` are the type modifiers.
    Decimal,
    /// BOOLEAN
    Boolean,
    /// DATE
    Date,
    /// TIME
    Time,
    /// TIMESTAMPTZ
    DateTime,
    /// BYTEA
    Binary,
    /// A native type passed through verbatim. Unrecognized live types land
    /// here too, so they compare as changed against any logical type.
    Other(String),
}

impl SqlType {
    /// Render this type as a native Postgres type, applying the given
    /// modifiers where the type takes them.
    pub fn to_sql(&self, limit: Option<u32>, precision: Option<u32>, scale: Option<u32>) -> String {
        match self {
            SqlType::String => format!("VARCHAR({})", limit.unwrap_or(255)),
            SqlType::Text => "TEXT".to_string(),
            SqlType::Integer => match limit {
                Some(2) => "SMALLINT".to_string(),
                _ => "INTEGER".to_string(),
            },
            SqlType::BigInt => "BIGINT".to_string(),
            SqlType::Float => match limit {
                Some(4) => "REAL".to_string(),
                _ => "DOUBLE PRECISION".to_string(),
            },
            SqlType::Decimal => match (precision, scale) {
                (Some(p), Some(s)) => format!("NUMERIC({}, {})", p, s),
                (Some(p), None) => format!("NUMERIC({})", p),
                _ => "NUMERIC".to_string(),
            },
            SqlType::Boolean => "BOOLEAN".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Time => "TIME".to_string(),
            SqlType::DateTime => "TIMESTAMPTZ".to_string(),
            SqlType::Binary => "BYTEA".to_string(),
            SqlType::Other(name) => name.clone(),
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::String => write!(f, "string"),
            SqlType::Text => write!(f, "text"),
            SqlType::Integer => write!(f, "integer"),
            SqlType::BigInt => write!(f, "bigint"),
            SqlType::Float => write!(f, "float"),
            SqlType::Decimal => write!(f, "decimal"),
            SqlType::Boolean => write!(f, "boolean"),
            SqlType::Date => write!(f, "date"),
            SqlType::Time => write!(f, "time"),
            SqlType::DateTime => write!(f, "datetime"),
            SqlType::Binary => write!(f, "binary"),
            SqlType::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A column default value.
///
/// Declarations carry typed values; introspection carries the raw stored
/// text (`Value::Text`), which is normalized against the declared type
/// before any comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Bool(bool),
    Text(String),
    /// A raw SQL expression rendered verbatim, e.g. `now()`.
    Expr(String),
}

impl Value {
    /// Render this value as a SQL literal.
    pub fn to_sql(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Decimal(v) => v.to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Text(v) => format!("{}", Lit(v)),
            Value::Expr(v) => v.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

/// A column, declared or introspected.
///
/// `nullable` is tri-state: `None` in a declaration means "unspecified, do
/// not compare"; introspection always reports `Some`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Logical type.
    pub ty: SqlType,
    /// Character length for strings, byte width for integers/floats.
    pub limit: Option<u32>,
    /// NUMERIC precision.
    pub precision: Option<u32>,
    /// NUMERIC scale.
    pub scale: Option<u32>,
    /// Default value, if any.
    pub default: Option<Value>,
    /// Whether NULLs are allowed.
    pub nullable: Option<bool>,
    /// Collation name, if non-default.
    pub collation: Option<String>,
    /// Column comment.
    pub comment: Option<String>,
    /// Whether this column is the table's primary key.
    pub primary_key: bool,
}

impl Column {
    /// Create a column with the given name and type; every other attribute
    /// starts unspecified.
    pub fn new(name: impl Into<String>, ty: SqlType) -> Self {
        Self {
            name: name.into(),
            ty,
            limit: None,
            precision: None,
            scale: None,
            default: None,
            nullable: None,
            collation: None,
            comment: None,
            primary_key: false,
        }
    }
}

/// A declared or introspected table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Primary-key column name. Defaults to `"id"`; `None` suppresses the
    /// implicit primary key entirely.
    pub primary_key: Option<String>,
    /// Columns, in declaration order. The primary-key column may be listed
    /// explicitly; if it is not, an implicit `BIGSERIAL` one is assumed.
    pub columns: Vec<Column>,
    /// Raw trailing `CREATE TABLE` options, appended verbatim.
    pub options: Option<String>,
}

impl Table {
    /// Create a table with the conventional `id` primary key and no columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: Some("id".to_string()),
            columns: Vec::new(),
            options: None,
        }
    }

    /// Check this declaration for structural defects.
    ///
    /// Runs before any DDL is issued for the table; a failure skips the
    /// table without aborting the surrounding run.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        let mut seen = std::collections::BTreeSet::new();
        for col in &self.columns {
            if !seen.insert(col.name.as_str()) {
                return Err(DeclarationError::DuplicateColumn {
                    table: self.name.clone(),
                    column: col.name.clone(),
                });
            }
            // NUMERIC(p, s) cannot be rendered without a precision.
            if col.scale.is_some() && col.precision.is_none() {
                return Err(DeclarationError::ScaleWithoutPrecision {
                    table: self.name.clone(),
                    column: col.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A secondary index.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    /// Table the index belongs to.
    pub table: String,
    /// Explicit index name; derived from table and columns when absent.
    pub name: Option<String>,
    /// Indexed column names, in order.
    pub columns: Vec<String>,
    /// Whether this is a unique index.
    pub unique: bool,
}

impl Index {
    /// Create a non-unique index with a derived name.
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            table: table.into(),
            name: None,
            columns,
            unique: false,
        }
    }

    /// The effective index name: the explicit one, or the deterministic
    /// `idx_{table}_{columns}` / `uq_{table}_{columns}` convention. Live
    /// indexes are matched against this name, so it must stay stable.
    pub fn resolved_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None if self.unique => unique_index_name(&self.table, &self.columns),
            None => index_name(&self.table, &self.columns),
        }
    }
}

/// A full declared schema: tables in declaration order plus the indexes
/// declared over them. Built once per run, immutable during reconciliation.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Tables, keyed by name. The map keeps declaration order and makes
    /// duplicate table names unrepresentable.
    pub tables: IndexMap<String, Table>,
    /// Declared indexes, in declaration order.
    pub indexes: Vec<Index>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table to the declaration. A table of the same name is replaced.
    pub fn add_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Add an index to the declaration.
    pub fn add_index(&mut self, index: Index) {
        self.indexes.push(index);
    }

    /// Get a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Check an index declaration against the tables of this schema.
    pub fn validate_index(&self, index: &Index) -> Result<(), DeclarationError> {
        let name = index.resolved_name();
        if index.columns.is_empty() {
            return Err(DeclarationError::EmptyIndex {
                table: index.table.clone(),
                name,
            });
        }
        let Some(table) = self.tables.get(&index.table) else {
            return Err(DeclarationError::UnknownIndexTable {
                table: index.table.clone(),
                name,
            });
        };
        for col in &index.columns {
            let known = table.columns.iter().any(|c| &c.name == col)
                || table.primary_key.as_deref() == Some(col.as_str());
            if !known {
                return Err(DeclarationError::UnknownIndexColumn {
                    table: index.table.clone(),
                    name,
                    column: col.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A structural defect in a declaration, detected before any DDL is issued
/// for the offending entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error("table {table}: duplicate column {column}")]
    DuplicateColumn { table: String, column: String },

    #[error("table {table}, column {column}: scale declared without precision")]
    ScaleWithoutPrecision { table: String, column: String },

    #[error("index {name}: no columns")]
    EmptyIndex { table: String, name: String },

    #[error("index {name}: table {table} is not declared")]
    UnknownIndexTable { table: String, name: String },

    #[error("index {name}: table {table} was skipped")]
    IndexOnSkippedTable { table: String, name: String },

    #[error("index {name}: table {table} has no column {column}")]
    UnknownIndexColumn {
        table: String,
        name: String,
        column: String,
    },

    #[error("duplicate index name {name}")]
    DuplicateIndex { name: String },
}
