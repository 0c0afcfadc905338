//! Canonical SQL types used for argument checking and return-type inference.
//!
//! Function descriptors reason about argument and result types in terms of a
//! small set of type categories rather than dialect-specific type names.
//! Dialect names (`INT64`, `VARCHAR`, `TIMESTAMPTZ`, ...) are folded into these
//! categories by [`normalize_type_name`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical SQL type category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    Integer,
    Float,
    Text,
    Boolean,
    Timestamp,
    Date,
    Time,
    Binary,
    Json,
    Array,
}

impl SqlType {
    /// Returns the canonical type name as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SqlType::Integer => "integer",
            SqlType::Float => "float",
            SqlType::Text => "text",
            SqlType::Boolean => "boolean",
            SqlType::Timestamp => "timestamp",
            SqlType::Date => "date",
            SqlType::Time => "time",
            SqlType::Binary => "binary",
            SqlType::Json => "json",
            SqlType::Array => "array",
        }
    }

    /// Whether values of this type take part in arithmetic.
    pub const fn is_numeric(&self) -> bool {
        matches!(self, SqlType::Integer | SqlType::Float)
    }

    /// Whether this is a date, time or timestamp type.
    pub const fn is_temporal(&self) -> bool {
        matches!(self, SqlType::Timestamp | SqlType::Date | SqlType::Time)
    }

    /// Whether values of this type have a total ordering usable by MIN/MAX and ORDER BY.
    pub const fn is_comparable(&self) -> bool {
        !matches!(self, SqlType::Json | SqlType::Array | SqlType::Binary)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Normalize a (possibly dialect-specific) type name to its canonical type.
///
/// The lookup is case-insensitive and ignores any length/precision suffix, so
/// `VARCHAR(20)` and `numeric(10, 2)` are recognised.
///
/// ```
/// use sqmgen_core::{normalize_type_name, SqlType};
///
/// assert_eq!(normalize_type_name("INT64"), Some(SqlType::Integer));
/// assert_eq!(normalize_type_name("varchar(20)"), Some(SqlType::Text));
/// assert_eq!(normalize_type_name("UNKNOWN_TYPE"), None);
/// ```
pub fn normalize_type_name(type_name: &str) -> Option<SqlType> {
    let base = type_name
        .split('(')
        .next()
        .unwrap_or(type_name)
        .trim()
        .to_ascii_lowercase();
    match base.as_str() {
        "array" => Some(SqlType::Array),
        "binary" | "varbinary" | "bytea" | "blob" | "bytes" => Some(SqlType::Binary),
        "bool" | "boolean" | "bit" => Some(SqlType::Boolean),
        "date" => Some(SqlType::Date),
        "float" | "float4" | "float8" | "float64" | "double" | "double precision" | "real"
        | "decimal" | "numeric" | "number" => Some(SqlType::Float),
        "int" | "int4" | "integer" | "int64" | "bigint" | "smallint" | "tinyint" | "int2"
        | "int8" => Some(SqlType::Integer),
        "json" | "jsonb" | "variant" | "object" => Some(SqlType::Json),
        "varchar" | "char" | "text" | "string" | "nvarchar" | "nchar" | "character" => {
            Some(SqlType::Text)
        }
        "time" | "timetz" => Some(SqlType::Time),
        "timestamp" | "timestamptz" | "datetime" | "timestamp_ntz" | "timestamp_ltz"
        | "timestamp_tz" => Some(SqlType::Timestamp),
        _ => None,
    }
}

/// Check if a type can be implicitly cast to another type.
///
/// A type can always be cast to itself.
pub fn can_implicitly_cast(from: SqlType, to: SqlType) -> bool {
    if from == to {
        return true;
    }
    match from {
        SqlType::Boolean => matches!(to, SqlType::Text),
        SqlType::Date => matches!(to, SqlType::Timestamp | SqlType::Text),
        SqlType::Float => matches!(to, SqlType::Text),
        SqlType::Integer => matches!(to, SqlType::Float | SqlType::Text),
        SqlType::Json => matches!(to, SqlType::Text),
        SqlType::Time => matches!(to, SqlType::Text),
        SqlType::Timestamp => matches!(to, SqlType::Text),
        _ => false,
    }
}
