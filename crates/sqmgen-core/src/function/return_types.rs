//! Return-type resolvers: infer the result type of an invocation.
//!
//! All standard resolvers honour the implied type (the type the surrounding
//! expression expects) when the resolved type is assignable to it, so
//! `sum(int_col)` compared with a float column produces a FLOAT node.

use std::fmt;
use std::sync::Arc;

use crate::error::FunctionError;
use crate::types::{SqlType, TypeContext, TypedNode};

/// Infers the result type of a function invocation.
pub trait ReturnTypeResolver: Send + Sync + fmt::Debug {
    /// Resolves the result type. `Ok(None)` means the type is not known yet.
    fn resolve_return_type(
        &self,
        arguments: &[TypedNode],
        implied_type: Option<SqlType>,
        function_name: &str,
        ctx: &TypeContext,
    ) -> Result<Option<SqlType>, FunctionError>;

    /// The return type as shown in a signature, empty when it depends on the arguments.
    fn return_type_signature(&self) -> String {
        String::new()
    }
}

fn prefer_implied(resolved: SqlType, implied_type: Option<SqlType>, ctx: &TypeContext) -> SqlType {
    match implied_type {
        Some(implied) if ctx.is_assignable(resolved, implied) => implied,
        _ => resolved,
    }
}

/// Type of the first argument with a known type.
#[derive(Debug, Clone, Copy, Default)]
pub struct UseFirstNonNull;

impl ReturnTypeResolver for UseFirstNonNull {
    fn resolve_return_type(
        &self,
        arguments: &[TypedNode],
        implied_type: Option<SqlType>,
        _function_name: &str,
        ctx: &TypeContext,
    ) -> Result<Option<SqlType>, FunctionError> {
        Ok(arguments
            .iter()
            .find_map(|argument| argument.sql_type)
            .map(|resolved| prefer_implied(resolved, implied_type, ctx))
            .or(implied_type))
    }
}

/// Always the same type, e.g. INTEGER for `count`.
#[derive(Debug, Clone, Copy)]
pub struct Invariant(pub SqlType);

impl ReturnTypeResolver for Invariant {
    fn resolve_return_type(
        &self,
        _arguments: &[TypedNode],
        implied_type: Option<SqlType>,
        _function_name: &str,
        ctx: &TypeContext,
    ) -> Result<Option<SqlType>, FunctionError> {
        Ok(Some(prefer_implied(self.0, implied_type, ctx)))
    }

    fn return_type_signature(&self) -> String {
        self.0.to_string()
    }
}

/// Type of the argument at a fixed position.
#[derive(Debug, Clone, Copy)]
pub struct UseArgumentType {
    position: usize,
}

impl ReturnTypeResolver for UseArgumentType {
    fn resolve_return_type(
        &self,
        arguments: &[TypedNode],
        implied_type: Option<SqlType>,
        function_name: &str,
        ctx: &TypeContext,
    ) -> Result<Option<SqlType>, FunctionError> {
        let argument = arguments.get(self.position).ok_or_else(|| {
            FunctionError::ReturnTypeResolution {
                function: function_name.to_string(),
                reason: format!(
                    "result type follows argument {}, but only {} given",
                    self.position + 1,
                    arguments.len()
                ),
            }
        })?;
        Ok(argument
            .sql_type
            .map(|resolved| prefer_implied(resolved, implied_type, ctx))
            .or(implied_type))
    }
}

/// The widest type among all typed arguments, e.g. FLOAT for `coalesce(int, float)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WidestArgumentType;

impl ReturnTypeResolver for WidestArgumentType {
    fn resolve_return_type(
        &self,
        arguments: &[TypedNode],
        implied_type: Option<SqlType>,
        function_name: &str,
        ctx: &TypeContext,
    ) -> Result<Option<SqlType>, FunctionError> {
        let mut widest: Option<SqlType> = None;
        for sql_type in arguments.iter().filter_map(|argument| argument.sql_type) {
            widest = match widest {
                None => Some(sql_type),
                Some(current) => Some(ctx.common_type(current, sql_type).ok_or_else(|| {
                    FunctionError::ReturnTypeResolution {
                        function: function_name.to_string(),
                        reason: format!(
                            "arguments of type {current} and {sql_type} have no common type"
                        ),
                    }
                })?),
            };
        }
        Ok(widest
            .map(|resolved| prefer_implied(resolved, implied_type, ctx))
            .or(implied_type))
    }
}

/// Whatever the surrounding expression expects, e.g. for `mode()`. For
/// ordered-set aggregates without an implied type, [`resolve_call`] passes the
/// type of the `WITHIN GROUP` ordering instead.
///
/// [`resolve_call`]: crate::function::resolve_call
#[derive(Debug, Clone, Copy, Default)]
pub struct Implied;

impl ReturnTypeResolver for Implied {
    fn resolve_return_type(
        &self,
        _arguments: &[TypedNode],
        implied_type: Option<SqlType>,
        _function_name: &str,
        _ctx: &TypeContext,
    ) -> Result<Option<SqlType>, FunctionError> {
        Ok(implied_type)
    }
}

/// Type of the first argument with a known type; the default resolver.
pub fn use_first_non_null() -> Arc<dyn ReturnTypeResolver> {
    Arc::new(UseFirstNonNull)
}

pub fn invariant(sql_type: SqlType) -> Arc<dyn ReturnTypeResolver> {
    Arc::new(Invariant(sql_type))
}

/// Type of the argument at zero-based `position`.
pub fn use_argument_type(position: usize) -> Arc<dyn ReturnTypeResolver> {
    Arc::new(UseArgumentType { position })
}

pub fn widest_argument_type() -> Arc<dyn ReturnTypeResolver> {
    Arc::new(WidestArgumentType)
}

pub fn implied() -> Arc<dyn ReturnTypeResolver> {
    Arc::new(Implied)
}
