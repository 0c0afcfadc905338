//! Argument validators: the arity and type contract of a function.
//!
//! A validator is the single gate in front of expression generation. It also
//! renders the argument-list part of a function's signature, using `argN`
//! placeholders with optional arguments in brackets:
//!
//! | validator          | signature                |
//! |--------------------|--------------------------|
//! | `none()`           | `([arg0[, ...]])`        |
//! | `no_args()`        | `()`                     |
//! | `exactly(2)`       | `(arg0, arg1)`           |
//! | `min(1)`           | `(arg0[, ...])`          |
//! | `between(1, 3)`    | `(arg0[, arg1[, arg2]])` |

use std::fmt;
use std::sync::Arc;

use crate::error::FunctionError;
use crate::types::{SqlType, TypeContext, TypedNode};

/// Validates the arguments of a function invocation.
pub trait ArgumentsValidator: Send + Sync + fmt::Debug {
    /// Checks `arguments` against the function's contract.
    fn validate(
        &self,
        arguments: &[TypedNode],
        function_name: &str,
        ctx: &TypeContext,
    ) -> Result<(), FunctionError>;

    /// Renders the argument list, including the surrounding parentheses.
    fn signature(&self) -> String {
        Arity::any().signature()
    }
}

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arity {
    pub min: usize,
    /// Upper bound, `None` for variadic functions.
    pub max: Option<usize>,
}

impl Arity {
    pub const fn any() -> Self {
        Self { min: 0, max: None }
    }

    pub const fn exactly(count: usize) -> Self {
        Self {
            min: count,
            max: Some(count),
        }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub const fn at_most(max: usize) -> Self {
        Self { min: 0, max: Some(max) }
    }

    /// Accepts `min..=max` arguments. Bounds are swapped if given in reverse.
    pub fn between(min: usize, max: usize) -> Self {
        Self {
            min: min.min(max),
            max: Some(min.max(max)),
        }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }

    /// Renders the argument list with `argN` placeholders.
    pub fn signature(&self) -> String {
        self.signature_with(|index| format!("arg{index}"))
    }

    /// Renders the argument list using `label` for each position.
    pub(crate) fn signature_with(&self, label: impl Fn(usize) -> String) -> String {
        let mut out = String::from("(");
        for index in 0..self.min {
            if index > 0 {
                out.push_str(", ");
            }
            out.push_str(&label(index));
        }
        match self.max {
            Some(max) => {
                for index in self.min..max {
                    out.push('[');
                    if index > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&label(index));
                }
                out.push_str(&"]".repeat(max.saturating_sub(self.min)));
            }
            None if self.min == 0 => {
                out.push('[');
                out.push_str(&label(0));
                out.push_str("[, ...]]");
            }
            None => out.push_str("[, ...]"),
        }
        out.push(')');
        out
    }

    fn check(&self, arguments: &[TypedNode], function_name: &str) -> Result<(), FunctionError> {
        if self.accepts(arguments.len()) {
            Ok(())
        } else {
            Err(FunctionError::ArgumentCount {
                function: function_name.to_string(),
                expected: *self,
                actual: arguments.len(),
            })
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn plural(count: usize) -> &'static str {
            if count == 1 {
                "argument"
            } else {
                "arguments"
            }
        }
        match (self.min, self.max) {
            (min, Some(max)) if min == max => write!(f, "exactly {min} {}", plural(min)),
            (0, Some(max)) => write!(f, "at most {max} {}", plural(max)),
            (min, Some(max)) => write!(f, "between {min} and {max} arguments"),
            (0, None) => write!(f, "any number of arguments"),
            (min, None) => write!(f, "at least {min} {}", plural(min)),
        }
    }
}

/// Type category a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    Any,
    Numeric,
    Integer,
    String,
    Boolean,
    /// Date, time or timestamp.
    Temporal,
    /// Any type with a total ordering.
    Comparable,
}

impl ParameterType {
    /// Returns true if an argument of type `sql_type` may be passed.
    pub fn accepts(&self, sql_type: SqlType, ctx: &TypeContext) -> bool {
        match self {
            ParameterType::Any => true,
            ParameterType::Numeric => {
                sql_type.is_numeric()
                    || (sql_type == SqlType::Boolean && ctx.dialect.booleans_are_integers())
            }
            ParameterType::Integer => ctx.is_assignable(sql_type, SqlType::Integer),
            ParameterType::String => sql_type == SqlType::Text,
            ParameterType::Boolean => ctx.is_assignable(sql_type, SqlType::Boolean),
            ParameterType::Temporal => sql_type.is_temporal(),
            ParameterType::Comparable => sql_type.is_comparable(),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ParameterType::Any => "ANY",
            ParameterType::Numeric => "NUMERIC",
            ParameterType::Integer => "INTEGER",
            ParameterType::String => "STRING",
            ParameterType::Boolean => "BOOLEAN",
            ParameterType::Temporal => "TEMPORAL",
            ParameterType::Comparable => "COMPARABLE",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks only the number of arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArityValidator {
    arity: Arity,
}

impl ArityValidator {
    pub fn new(arity: Arity) -> Self {
        Self { arity }
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }
}

impl ArgumentsValidator for ArityValidator {
    fn validate(
        &self,
        arguments: &[TypedNode],
        function_name: &str,
        _ctx: &TypeContext,
    ) -> Result<(), FunctionError> {
        self.arity.check(arguments, function_name)
    }

    fn signature(&self) -> String {
        self.arity.signature()
    }
}

/// Checks arity, then the type of every typed argument.
///
/// Untyped arguments always pass. When there are more arguments than parameter
/// types, the last parameter type applies to the remaining arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentTypesValidator {
    arity: Arity,
    parameter_types: Vec<ParameterType>,
}

impl ArgumentTypesValidator {
    pub fn new(arity: Arity, parameter_types: Vec<ParameterType>) -> Self {
        Self {
            arity,
            parameter_types,
        }
    }

    fn parameter_type(&self, position: usize) -> Option<ParameterType> {
        self.parameter_types
            .get(position)
            .or_else(|| self.parameter_types.last())
            .copied()
    }
}

impl ArgumentsValidator for ArgumentTypesValidator {
    fn validate(
        &self,
        arguments: &[TypedNode],
        function_name: &str,
        ctx: &TypeContext,
    ) -> Result<(), FunctionError> {
        self.arity.check(arguments, function_name)?;

        for (position, argument) in arguments.iter().enumerate() {
            let (Some(actual), Some(expected)) = (argument.sql_type, self.parameter_type(position))
            else {
                continue;
            };
            if !expected.accepts(actual, ctx) {
                return Err(FunctionError::ArgumentType {
                    function: function_name.to_string(),
                    position,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    fn signature(&self) -> String {
        self.arity
            .signature_with(|index| match self.parameter_type(index) {
                Some(ParameterType::Any) | None => format!("arg{index}"),
                Some(param) => format!("{param} arg{index}"),
            })
    }
}

/// Delegates validation but renders a fixed signature, e.g. `(*)` for `count`.
#[derive(Debug, Clone)]
pub struct SignatureOverride {
    inner: Arc<dyn ArgumentsValidator>,
    signature: String,
}

impl ArgumentsValidator for SignatureOverride {
    fn validate(
        &self,
        arguments: &[TypedNode],
        function_name: &str,
        ctx: &TypeContext,
    ) -> Result<(), FunctionError> {
        self.inner.validate(arguments, function_name, ctx)
    }

    fn signature(&self) -> String {
        self.signature.clone()
    }
}

/// Runs several validators in order, failing on the first error.
#[derive(Debug, Clone)]
pub struct CompositeValidator {
    validators: Vec<Arc<dyn ArgumentsValidator>>,
}

impl ArgumentsValidator for CompositeValidator {
    fn validate(
        &self,
        arguments: &[TypedNode],
        function_name: &str,
        ctx: &TypeContext,
    ) -> Result<(), FunctionError> {
        self.validators
            .iter()
            .try_for_each(|validator| validator.validate(arguments, function_name, ctx))
    }

    fn signature(&self) -> String {
        self.validators
            .first()
            .map(|validator| validator.signature())
            .unwrap_or_else(|| Arity::any().signature())
    }
}

/// Accepts any number of arguments of any type.
pub fn none() -> Arc<dyn ArgumentsValidator> {
    Arc::new(ArityValidator::new(Arity::any()))
}

/// Accepts no arguments.
pub fn no_args() -> Arc<dyn ArgumentsValidator> {
    exactly(0)
}

pub fn exactly(count: usize) -> Arc<dyn ArgumentsValidator> {
    Arc::new(ArityValidator::new(Arity::exactly(count)))
}

pub fn min(count: usize) -> Arc<dyn ArgumentsValidator> {
    Arc::new(ArityValidator::new(Arity::at_least(count)))
}

pub fn max(count: usize) -> Arc<dyn ArgumentsValidator> {
    Arc::new(ArityValidator::new(Arity::at_most(count)))
}

pub fn between(min: usize, max: usize) -> Arc<dyn ArgumentsValidator> {
    Arc::new(ArityValidator::new(Arity::between(min, max)))
}

/// Checks arity and per-position parameter types.
pub fn typed(arity: Arity, parameter_types: Vec<ParameterType>) -> Arc<dyn ArgumentsValidator> {
    Arc::new(ArgumentTypesValidator::new(arity, parameter_types))
}

/// Wraps `validator`, replacing its rendered signature.
pub fn with_signature(
    validator: Arc<dyn ArgumentsValidator>,
    signature: impl Into<String>,
) -> Arc<dyn ArgumentsValidator> {
    Arc::new(SignatureOverride {
        inner: validator,
        signature: signature.into(),
    })
}

/// All of `validators` must pass. The signature is taken from the first one.
pub fn all_of(validators: Vec<Arc<dyn ArgumentsValidator>>) -> Arc<dyn ArgumentsValidator> {
    Arc::new(CompositeValidator { validators })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(types: &[Option<SqlType>]) -> Vec<TypedNode> {
        types
            .iter()
            .enumerate()
            .map(|(i, ty)| TypedNode::new(format!("a{i}"), *ty))
            .collect()
    }

    #[test]
    fn test_arity_signatures() {
        assert_eq!(Arity::any().signature(), "([arg0[, ...]])");
        assert_eq!(Arity::exactly(0).signature(), "()");
        assert_eq!(Arity::exactly(2).signature(), "(arg0, arg1)");
        assert_eq!(Arity::at_least(1).signature(), "(arg0[, ...])");
        assert_eq!(Arity::at_least(2).signature(), "(arg0, arg1[, ...])");
        assert_eq!(Arity::at_most(2).signature(), "([arg0[, arg1]])");
        assert_eq!(Arity::between(1, 3).signature(), "(arg0[, arg1[, arg2]])");
    }

    #[test]
    fn test_arity_display() {
        assert_eq!(Arity::exactly(1).to_string(), "exactly 1 argument");
        assert_eq!(Arity::exactly(0).to_string(), "exactly 0 arguments");
        assert_eq!(Arity::at_least(2).to_string(), "at least 2 arguments");
        assert_eq!(Arity::at_most(1).to_string(), "at most 1 argument");
        assert_eq!(Arity::between(2, 3).to_string(), "between 2 and 3 arguments");
        assert_eq!(Arity::any().to_string(), "any number of arguments");
    }

    #[test]
    fn test_between_normalises_reversed_bounds() {
        assert_eq!(Arity::between(3, 1), Arity::between(1, 3));
    }

    #[test]
    fn test_arity_validator_rejects_wrong_count() {
        let ctx = TypeContext::default();
        let validator = exactly(1);
        assert!(validator.validate(&args(&[None]), "lower", &ctx).is_ok());

        let err = validator
            .validate(&args(&[None, None]), "lower", &ctx)
            .unwrap_err();
        assert_eq!(
            err,
            FunctionError::ArgumentCount {
                function: "lower".to_string(),
                expected: Arity::exactly(1),
                actual: 2,
            }
        );
    }

    #[test]
    fn test_none_accepts_everything() {
        let ctx = TypeContext::default();
        assert!(none().validate(&[], "f", &ctx).is_ok());
        assert!(none()
            .validate(&args(&[Some(SqlType::Json); 7]), "f", &ctx)
            .is_ok());
    }

    #[test]
    fn test_typed_validator_checks_types() {
        let ctx = TypeContext::default();
        let validator = typed(
            Arity::between(2, 3),
            vec![ParameterType::String, ParameterType::Integer],
        );
        assert!(validator
            .validate(
                &args(&[Some(SqlType::Text), Some(SqlType::Integer)]),
                "substring",
                &ctx
            )
            .is_ok());

        let err = validator
            .validate(
                &args(&[Some(SqlType::Text), Some(SqlType::Integer), Some(SqlType::Date)]),
                "substring",
                &ctx,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            FunctionError::ArgumentType {
                position: 2,
                expected: ParameterType::Integer,
                actual: SqlType::Date,
                ..
            }
        ));
    }

    #[test]
    fn test_typed_validator_lets_untyped_arguments_through() {
        let ctx = TypeContext::default();
        let validator = typed(Arity::exactly(1), vec![ParameterType::Numeric]);
        assert!(validator.validate(&args(&[None]), "abs", &ctx).is_ok());
    }

    #[test]
    fn test_typed_validator_checks_arity_first() {
        let ctx = TypeContext::default();
        let validator = typed(Arity::exactly(1), vec![ParameterType::Numeric]);
        let err = validator
            .validate(&args(&[Some(SqlType::Text), None]), "abs", &ctx)
            .unwrap_err();
        assert!(matches!(err, FunctionError::ArgumentCount { .. }));
    }

    #[test]
    fn test_typed_signature() {
        let validator = typed(
            Arity::between(2, 3),
            vec![ParameterType::String, ParameterType::Integer],
        );
        assert_eq!(
            validator.signature(),
            "(STRING arg0, INTEGER arg1[, INTEGER arg2])"
        );
        let any = typed(Arity::exactly(1), vec![ParameterType::Any]);
        assert_eq!(any.signature(), "(arg0)");
    }

    #[test]
    fn test_numeric_accepts_boolean_only_where_booleans_are_integers() {
        use crate::types::Dialect;
        let mysql = TypeContext::new(Dialect::Mysql);
        let postgres = TypeContext::new(Dialect::Postgres);
        assert!(ParameterType::Numeric.accepts(SqlType::Boolean, &mysql));
        assert!(!ParameterType::Numeric.accepts(SqlType::Boolean, &postgres));
    }

    #[test]
    fn test_integer_accepts_boolean_only_where_booleans_are_integers() {
        use crate::types::Dialect;
        let sqlite = TypeContext::new(Dialect::Sqlite);
        let postgres = TypeContext::new(Dialect::Postgres);
        assert!(ParameterType::Integer.accepts(SqlType::Boolean, &sqlite));
        assert!(!ParameterType::Integer.accepts(SqlType::Boolean, &postgres));
    }

    #[test]
    fn test_signature_override_and_composite() {
        let ctx = TypeContext::default();
        let count = with_signature(max(1), "(*)");
        assert_eq!(count.signature(), "(*)");
        assert!(count.validate(&args(&[None, None]), "count", &ctx).is_err());

        let composite = all_of(vec![
            min(1),
            typed(Arity::any(), vec![ParameterType::Comparable]),
        ]);
        assert_eq!(composite.signature(), "(arg0[, ...])");
        assert!(composite.validate(&[], "greatest", &ctx).is_err());
        assert!(composite
            .validate(&args(&[Some(SqlType::Json)]), "greatest", &ctx)
            .is_err());
        assert!(composite
            .validate(&args(&[Some(SqlType::Date)]), "greatest", &ctx)
            .is_ok());
    }
}
