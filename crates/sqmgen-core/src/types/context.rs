//! Type context handed to validators and resolvers during expression generation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::sql_type::{can_implicitly_cast, SqlType};

/// SQL dialect the query is being compiled for.
///
/// Dialects influence type compatibility (e.g. MySQL treats booleans as
/// integers) and select the sqlparser dialect used by the front-end adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Generic,
    Ansi,
    Bigquery,
    Clickhouse,
    Databricks,
    Duckdb,
    Hive,
    Mssql,
    Mysql,
    Postgres,
    Redshift,
    Snowflake,
    Sqlite,
}

impl Dialect {
    pub fn to_sqlparser_dialect(&self) -> Box<dyn sqlparser::dialect::Dialect> {
        use sqlparser::dialect::{
            AnsiDialect, BigQueryDialect, ClickHouseDialect, DatabricksDialect, DuckDbDialect,
            GenericDialect, HiveDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
            RedshiftSqlDialect, SQLiteDialect, SnowflakeDialect,
        };
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::Ansi => Box::new(AnsiDialect {}),
            Self::Bigquery => Box::new(BigQueryDialect {}),
            Self::Clickhouse => Box::new(ClickHouseDialect {}),
            Self::Databricks => Box::new(DatabricksDialect {}),
            Self::Duckdb => Box::new(DuckDbDialect {}),
            Self::Hive => Box::new(HiveDialect {}),
            Self::Mssql => Box::new(MsSqlDialect {}),
            Self::Mysql => Box::new(MySqlDialect {}),
            Self::Postgres => Box::new(PostgreSqlDialect {}),
            Self::Redshift => Box::new(RedshiftSqlDialect {}),
            Self::Snowflake => Box::new(SnowflakeDialect {}),
            Self::Sqlite => Box::new(SQLiteDialect {}),
        }
    }

    /// Whether this dialect stores booleans as integers (0/1).
    pub const fn booleans_are_integers(&self) -> bool {
        matches!(self, Dialect::Mysql | Dialect::Mssql | Dialect::Sqlite)
    }
}

/// Ambient type information for one query compilation.
///
/// A `TypeContext` is cheap to copy and never mutated by the function layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeContext {
    /// Dialect the query is compiled for.
    #[serde(default)]
    pub dialect: Dialect,

    /// Allow implicit casts (e.g. INTEGER to FLOAT) when checking argument types
    /// (default: true). When disabled only identical types are assignable.
    #[serde(default = "default_implicit_casts")]
    pub implicit_casts: bool,
}

impl Default for TypeContext {
    fn default() -> Self {
        Self {
            dialect: Dialect::Generic,
            implicit_casts: true,
        }
    }
}

fn default_implicit_casts() -> bool {
    true
}

impl TypeContext {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Disables implicit casts, requiring exact type matches.
    pub fn strict(mut self) -> Self {
        self.implicit_casts = false;
        self
    }

    /// Returns true if a value of type `from` may be used where `to` is expected.
    pub fn is_assignable(&self, from: SqlType, to: SqlType) -> bool {
        if from == to {
            return true;
        }
        if self.dialect.booleans_are_integers()
            && matches!(
                (from, to),
                (SqlType::Boolean, SqlType::Integer) | (SqlType::Integer, SqlType::Boolean)
            )
        {
            return true;
        }
        self.implicit_casts && can_implicitly_cast(from, to)
    }

    /// Returns the narrowest type both `a` and `b` can be assigned to, if any.
    pub fn common_type(&self, a: SqlType, b: SqlType) -> Option<SqlType> {
        if self.is_assignable(a, b) {
            Some(b)
        } else if self.is_assignable(b, a) {
            Some(a)
        } else {
            None
        }
    }
}
