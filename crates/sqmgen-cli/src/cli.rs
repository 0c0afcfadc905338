//! CLI argument parsing using clap.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use sqmgen_core::{normalize_type_name, SqlType};
use std::path::PathBuf;

/// sqmgen - validate function invocations and show the typed expressions they generate
#[derive(Parser, Debug)]
#[command(name = "sqmgen")]
#[command(
    about = "Validate SQL function invocations and print the generated expression nodes",
    long_about = None
)]
#[command(version)]
pub struct Args {
    /// Function invocations, e.g. "sum(price) FILTER (WHERE paid)"
    /// (reads --input or stdin if none provided)
    #[arg(value_name = "EXPRESSIONS")]
    pub expressions: Vec<String>,

    /// File with one invocation per line
    #[arg(short, long, value_name = "FILE", conflicts_with = "expressions")]
    pub input: Option<PathBuf>,

    /// SQL dialect
    #[arg(short, long, default_value = "generic", value_enum)]
    pub dialect: DialectArg,

    /// Output format
    #[arg(short, long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Column type in NAME:TYPE format (can be repeated)
    #[arg(long = "column", value_name = "NAME:TYPE")]
    pub columns: Vec<String>,

    /// Result type expected by the surrounding expression
    #[arg(long, value_name = "TYPE")]
    pub implied_type: Option<String>,

    /// Disable implicit casts when checking argument types
    #[arg(long)]
    pub strict: bool,

    /// List the signatures of all built-in functions
    #[arg(short, long)]
    pub list: bool,

    /// Only list functions of this kind (requires --list)
    #[arg(short, long, value_enum, requires = "list")]
    pub kind: Option<KindArg>,

    /// Omit the error details below the table
    #[arg(short, long)]
    pub quiet: bool,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,
}

/// SQL dialect options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
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

impl From<DialectArg> for sqmgen_core::Dialect {
    fn from(d: DialectArg) -> Self {
        match d {
            DialectArg::Generic => sqmgen_core::Dialect::Generic,
            DialectArg::Ansi => sqmgen_core::Dialect::Ansi,
            DialectArg::Bigquery => sqmgen_core::Dialect::Bigquery,
            DialectArg::Clickhouse => sqmgen_core::Dialect::Clickhouse,
            DialectArg::Databricks => sqmgen_core::Dialect::Databricks,
            DialectArg::Duckdb => sqmgen_core::Dialect::Duckdb,
            DialectArg::Hive => sqmgen_core::Dialect::Hive,
            DialectArg::Mssql => sqmgen_core::Dialect::Mssql,
            DialectArg::Mysql => sqmgen_core::Dialect::Mysql,
            DialectArg::Postgres => sqmgen_core::Dialect::Postgres,
            DialectArg::Redshift => sqmgen_core::Dialect::Redshift,
            DialectArg::Snowflake => sqmgen_core::Dialect::Snowflake,
            DialectArg::Sqlite => sqmgen_core::Dialect::Sqlite,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON output
    Json,
}

/// Function kind filter for --list
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Scalar,
    Aggregate,
    OrderedSet,
    Window,
}

impl From<KindArg> for sqmgen_core::FunctionKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Scalar => sqmgen_core::FunctionKind::Scalar,
            KindArg::Aggregate => sqmgen_core::FunctionKind::Aggregate,
            KindArg::OrderedSet => sqmgen_core::FunctionKind::OrderedSetAggregate,
            KindArg::Window => sqmgen_core::FunctionKind::Window,
        }
    }
}

/// Parse a `NAME:TYPE` column spec. The name is lowercased.
pub fn parse_column(spec: &str) -> Result<(String, SqlType)> {
    let Some((name, type_name)) = spec.rsplit_once(':') else {
        bail!("invalid --column '{spec}': expected NAME:TYPE");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("invalid --column '{spec}': column name is empty");
    }
    Ok((name.to_ascii_lowercase(), parse_type(type_name)?))
}

/// Parse a type name such as `int`, `varchar(20)` or `timestamptz`.
pub fn parse_type(type_name: &str) -> Result<SqlType> {
    match normalize_type_name(type_name) {
        Some(sql_type) => Ok(sql_type),
        None => bail!("unknown type '{}'", type_name.trim()),
    }
}
