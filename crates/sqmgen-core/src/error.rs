//! Error types for expression generation and invocation parsing.
//!
//! # Error Handling Strategy
//!
//! - [`FunctionError`]: a function invocation that cannot be compiled. Raised by
//!   validators, resolvers and registry lookups and returned unchanged to the
//!   caller; no partial expression node is ever produced alongside it.
//!
//! - [`ParseError`]: the SQL text handed to [`crate::parser::parse_invocation`]
//!   is not a single function call the adapter understands.

use crate::function::{Arity, ParameterType};
use crate::types::SqlType;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// A function invocation that cannot be turned into an expression node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    /// Wrong number of arguments for the function's declared arity.
    #[error("function {function}() expects {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: Arity,
        actual: usize,
    },

    /// An argument's type is incompatible with the declared parameter type.
    #[error(
        "argument {} of function {function}() must be {expected}, but has type {actual}",
        .position + 1
    )]
    ArgumentType {
        function: String,
        /// Zero-based argument position.
        position: usize,
        expected: ParameterType,
        actual: SqlType,
    },

    /// The return type could not be inferred from the arguments and implied type.
    #[error("cannot resolve return type of {function}(): {reason}")]
    ReturnTypeResolution { function: String, reason: String },

    /// No descriptor is registered under the name.
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },
}

impl FunctionError {
    /// Returns true for arity and type mismatches raised by argument validation.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            FunctionError::ArgumentCount { .. } | FunctionError::ArgumentType { .. }
        )
    }

    /// Name of the function the error refers to.
    pub fn function_name(&self) -> &str {
        match self {
            FunctionError::ArgumentCount { function, .. }
            | FunctionError::ArgumentType { function, .. }
            | FunctionError::ReturnTypeResolution { function, .. } => function,
            FunctionError::UnknownFunction { name } => name,
        }
    }
}

/// Category of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseErrorKind {
    /// sqlparser rejected the text.
    #[default]
    SyntaxError,
    /// Input ended early.
    UnexpectedEof,
    /// The text parsed, but is not a single function call.
    NotAFunctionCall,
    /// A function argument form the adapter cannot represent (e.g. `t.*`).
    UnsupportedArgument,
}

/// Line/column location reported by sqlparser (both 1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Error encountered while parsing an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: Option<Position>,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            kind,
        }
    }

    /// Extracts `Line: X, Column: Y` from a sqlparser message.
    fn position_in(message: &str) -> Option<Position> {
        static POSITION: OnceLock<Regex> = OnceLock::new();
        let re = POSITION.get_or_init(|| {
            Regex::new(r"Line:\s*(\d+)\s*,\s*Column:\s*(\d+)").expect("valid position regex")
        });
        let caps = re.captures(message)?;
        Some(Position {
            line: caps.get(1)?.as_str().parse().ok()?,
            column: caps.get(2)?.as_str().parse().ok()?,
        })
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error")?;
        if let Some(pos) = self.position {
            write!(f, " at line {}, column {}", pos.line, pos.column)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<sqlparser::parser::ParserError> for ParseError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        let message = err.to_string();
        let lower = message.to_lowercase();
        let kind = if lower.contains("eof") || lower.contains("unexpected end") {
            ParseErrorKind::UnexpectedEof
        } else {
            ParseErrorKind::SyntaxError
        };
        Self {
            position: Self::position_in(&message),
            message,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_count_message() {
        let err = FunctionError::ArgumentCount {
            function: "lower".to_string(),
            expected: Arity::exactly(1),
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "function lower() expects exactly 1 argument, got 2"
        );
        assert!(err.is_validation_error());
        assert_eq!(err.function_name(), "lower");
    }

    #[test]
    fn test_argument_type_message_is_one_based() {
        let err = FunctionError::ArgumentType {
            function: "abs".to_string(),
            position: 0,
            expected: ParameterType::Numeric,
            actual: SqlType::Text,
        };
        assert_eq!(
            err.to_string(),
            "argument 1 of function abs() must be NUMERIC, but has type TEXT"
        );
    }

    #[test]
    fn test_resolution_errors_are_not_validation_errors() {
        let err = FunctionError::ReturnTypeResolution {
            function: "coalesce".to_string(),
            reason: "no common type".to_string(),
        };
        assert!(!err.is_validation_error());
        let err = FunctionError::UnknownFunction {
            name: "frobnicate".to_string(),
        };
        assert!(!err.is_validation_error());
        assert_eq!(err.to_string(), "unknown function 'frobnicate'");
    }

    #[test]
    fn test_position_extraction() {
        let pos = ParseError::position_in("Expected ), found EOF at Line: 1, Column: 12");
        assert_eq!(pos, Some(Position { line: 1, column: 12 }));
        assert_eq!(ParseError::position_in("Line: x, Column: 2"), None);
        assert_eq!(ParseError::position_in("no position"), None);
    }

    #[test]
    fn test_display_with_position() {
        let mut err = ParseError::new(ParseErrorKind::SyntaxError, "bad token");
        err.position = Some(Position { line: 2, column: 4 });
        assert_eq!(err.to_string(), "Parse error at line 2, column 4: bad token");
    }
}
