//! Front-end adapter: turns the SQL text of one function invocation into a
//! [`CallSite`] the function layer can consume.
//!
//! The invocation is parsed with sqlparser as the single projection of a
//! `SELECT`. Argument types come from literals, casts, the caller's column map
//! and (for nested calls) the standard registry. Clauses decide the shape:
//!
//! | clause                    | shape                  |
//! |---------------------------|------------------------|
//! | `OVER (...)`              | window                 |
//! | `WITHIN GROUP (ORDER BY)` | ordered-set aggregate  |
//! | `FILTER (WHERE ...)`      | aggregate              |
//! | none                      | plain                  |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlparser::ast::{
    BinaryOperator, Expr, Function, FunctionArg, FunctionArgExpr, FunctionArgumentClause,
    FunctionArguments, NullTreatment, OrderByExpr, SelectItem, SetExpr, Statement, UnaryOperator,
    Value, ValueWithSpan,
};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::error::{ParseError, ParseErrorKind};
use crate::function::standard_registry;
use crate::types::{
    normalize_type_name, CallSite, Dialect, InvocationShape, NullPrecedence, OrderByClause,
    Predicate, SortDirection, SortSpecification, SqlType, TypeContext, TypedNode,
};

/// Column name (lowercase) to type, used to type identifier arguments.
pub type ColumnTypes = HashMap<String, SqlType>;

/// A function invocation recovered from SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedInvocation {
    /// Function name as written, lowercased.
    pub name: String,
    pub shape: InvocationShape,
    pub call_site: CallSite,
}

/// Parses a single function-call expression such as
/// `percentile_cont(0.5) WITHIN GROUP (ORDER BY price)`.
pub fn parse_invocation(
    sql: &str,
    dialect: Dialect,
    columns: &ColumnTypes,
) -> Result<ParsedInvocation, ParseError> {
    let adapter = Adapter { dialect, columns };
    match parse_single_expression(sql, dialect)? {
        Expr::Function(function) => adapter.invocation(&function),
        Expr::Substring {
            expr,
            substring_from,
            substring_for,
            ..
        } => {
            let arguments = std::iter::once(expr)
                .chain(substring_from)
                .chain(substring_for)
                .map(|argument| adapter.typed_node(&argument))
                .collect();
            Ok(ParsedInvocation {
                name: "substring".to_string(),
                shape: InvocationShape::Plain,
                call_site: CallSite::new(arguments),
            })
        }
        expr => Err(ParseError::new(
            ParseErrorKind::NotAFunctionCall,
            format!("expected a function call, found '{expr}'"),
        )),
    }
}

fn parse_single_expression(sql: &str, dialect: Dialect) -> Result<Expr, ParseError> {
    let text = format!("SELECT {}", sql.trim().trim_end_matches(';'));
    let sqlparser_dialect = dialect.to_sqlparser_dialect();
    let mut statements = match Parser::parse_sql(sqlparser_dialect.as_ref(), &text) {
        Ok(statements) => statements,
        Err(primary_err) => {
            // Generic chokes on Postgres casts (`::`) and `$1` placeholders.
            if matches!(dialect, Dialect::Generic) {
                Parser::parse_sql(&PostgreSqlDialect {}, &text).map_err(|_| primary_err)?
            } else {
                return Err(primary_err.into());
            }
        }
    };

    let not_a_call = || {
        ParseError::new(
            ParseErrorKind::NotAFunctionCall,
            "expected a single function call expression",
        )
    };
    if statements.len() != 1 {
        return Err(not_a_call());
    }
    let Some(Statement::Query(query)) = statements.pop() else {
        return Err(not_a_call());
    };
    let query = *query;
    let SetExpr::Select(select) = *query.body else {
        return Err(not_a_call());
    };
    let select = *select;
    if select.projection.len() != 1 || !select.from.is_empty() {
        return Err(not_a_call());
    }
    match select.projection.into_iter().next() {
        Some(SelectItem::UnnamedExpr(expr)) | Some(SelectItem::ExprWithAlias { expr, .. }) => {
            Ok(expr)
        }
        _ => Err(not_a_call()),
    }
}

struct Adapter<'a> {
    dialect: Dialect,
    columns: &'a ColumnTypes,
}

impl Adapter<'_> {
    fn invocation(&self, function: &Function) -> Result<ParsedInvocation, ParseError> {
        let mut call_site = CallSite::default();

        match &function.args {
            FunctionArguments::None => {}
            FunctionArguments::Subquery(_) => {
                return Err(ParseError::new(
                    ParseErrorKind::UnsupportedArgument,
                    format!("subquery argument in call to {}", function.name),
                ));
            }
            FunctionArguments::List(list) => {
                for arg in &list.args {
                    call_site.arguments.push(self.argument(arg)?);
                }
                for clause in &list.clauses {
                    if let FunctionArgumentClause::IgnoreOrRespectNulls(treatment) = clause {
                        call_site.respect_nulls = Some(respects_nulls(treatment));
                    }
                }
            }
        }

        if let Some(treatment) = &function.null_treatment {
            call_site.respect_nulls = Some(respects_nulls(treatment));
        }
        if let Some(filter) = &function.filter {
            call_site.filter = Some(Predicate::new(filter.to_string()));
        }
        if !function.within_group.is_empty() {
            let items = function
                .within_group
                .iter()
                .map(|item| self.sort_specification(item))
                .collect();
            call_site.within_group = Some(OrderByClause::new(items));
        }

        let shape = if function.over.is_some() {
            InvocationShape::Window
        } else if call_site.within_group.is_some() {
            InvocationShape::OrderedSetAggregate
        } else if call_site.filter.is_some() {
            InvocationShape::Aggregate
        } else {
            InvocationShape::Plain
        };

        Ok(ParsedInvocation {
            name: function.name.to_string().to_ascii_lowercase(),
            shape,
            call_site,
        })
    }

    fn argument(&self, arg: &FunctionArg) -> Result<TypedNode, ParseError> {
        let arg_expr = match arg {
            FunctionArg::Unnamed(arg_expr) | FunctionArg::Named { arg: arg_expr, .. } => arg_expr,
            FunctionArg::ExprNamed { arg: arg_expr, .. } => arg_expr,
        };
        match arg_expr {
            FunctionArgExpr::Expr(expr) => Ok(self.typed_node(expr)),
            FunctionArgExpr::Wildcard => Ok(TypedNode::untyped("*")),
            FunctionArgExpr::QualifiedWildcard(name) => Err(ParseError::new(
                ParseErrorKind::UnsupportedArgument,
                format!("qualified wildcard '{name}.*' is not supported"),
            )),
        }
    }

    fn typed_node(&self, expr: &Expr) -> TypedNode {
        TypedNode::new(expr.to_string(), self.infer_type(expr))
    }

    fn sort_specification(&self, item: &OrderByExpr) -> SortSpecification {
        let mut spec = SortSpecification::ascending(self.typed_node(&item.expr));
        if item.options.asc == Some(false) {
            spec.direction = SortDirection::Descending;
        }
        spec.nulls = item.options.nulls_first.map(|first| {
            if first {
                NullPrecedence::First
            } else {
                NullPrecedence::Last
            }
        });
        spec
    }

    fn infer_type(&self, expr: &Expr) -> Option<SqlType> {
        match expr {
            Expr::Value(ValueWithSpan { value, .. }) => literal_type(value),
            Expr::Identifier(ident) => self.column_type(&ident.value),
            Expr::CompoundIdentifier(parts) => {
                let qualified = parts
                    .iter()
                    .map(|part| part.value.as_str())
                    .collect::<Vec<_>>()
                    .join(".");
                self.column_type(&qualified)
                    .or_else(|| self.column_type(&parts.last()?.value))
            }
            Expr::Cast { data_type, .. } => data_type_to_sql_type(&data_type.to_string()),
            Expr::Nested(inner) => self.infer_type(inner),
            Expr::UnaryOp { op, expr } => match op {
                UnaryOperator::Not => Some(SqlType::Boolean),
                UnaryOperator::Plus | UnaryOperator::Minus => self.infer_type(expr),
                _ => None,
            },
            Expr::BinaryOp { left, op, right } => self.binary_type(left, op, right),
            Expr::IsNull(_)
            | Expr::IsNotNull(_)
            | Expr::IsTrue(_)
            | Expr::IsFalse(_)
            | Expr::InList { .. }
            | Expr::Between { .. }
            | Expr::Like { .. }
            | Expr::ILike { .. } => Some(SqlType::Boolean),
            Expr::Function(function) => self.nested_call_type(function),
            _ => None,
        }
    }

    fn binary_type(&self, left: &Expr, op: &BinaryOperator, right: &Expr) -> Option<SqlType> {
        match op {
            BinaryOperator::And
            | BinaryOperator::Or
            | BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::Lt
            | BinaryOperator::LtEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq => Some(SqlType::Boolean),
            BinaryOperator::StringConcat => Some(SqlType::Text),
            BinaryOperator::Plus
            | BinaryOperator::Minus
            | BinaryOperator::Multiply
            | BinaryOperator::Divide
            | BinaryOperator::Modulo => {
                match (self.infer_type(left), self.infer_type(right)) {
                    (Some(l), Some(r)) => TypeContext::new(self.dialect).common_type(l, r),
                    (l, r) => l.or(r),
                }
            }
            _ => None,
        }
    }

    /// Result type of a nested call, resolved through the standard registry.
    fn nested_call_type(&self, function: &Function) -> Option<SqlType> {
        let nested = self.invocation(function).ok()?;
        standard_registry()
            .generate(
                &nested.name,
                nested.shape,
                &nested.call_site,
                &TypeContext::new(self.dialect),
            )
            .ok()?
            .result_type()
    }

    fn column_type(&self, name: &str) -> Option<SqlType> {
        self.columns.get(&name.to_ascii_lowercase()).copied()
    }
}

fn respects_nulls(treatment: &NullTreatment) -> bool {
    matches!(treatment, NullTreatment::RespectNulls)
}

fn literal_type(value: &Value) -> Option<SqlType> {
    match value {
        Value::Number(text, _) => {
            if text.contains(['.', 'e', 'E']) {
                Some(SqlType::Float)
            } else {
                Some(SqlType::Integer)
            }
        }
        Value::SingleQuotedString(_)
        | Value::DoubleQuotedString(_)
        | Value::DollarQuotedString(_)
        | Value::NationalStringLiteral(_)
        | Value::EscapedStringLiteral(_) => Some(SqlType::Text),
        Value::HexStringLiteral(_) => Some(SqlType::Binary),
        Value::Boolean(_) => Some(SqlType::Boolean),
        _ => None,
    }
}

/// Maps a rendered sqlparser data type (`VARCHAR(20)`, `TIMESTAMP WITH TIME ZONE`)
/// to a [`SqlType`].
fn data_type_to_sql_type(rendered: &str) -> Option<SqlType> {
    normalize_type_name(rendered).or_else(|| {
        let first_word = rendered.split(|c: char| c.is_whitespace() || c == '(').next()?;
        normalize_type_name(first_word)
    })
}
