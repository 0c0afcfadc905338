//! Argument-type resolvers: infer the expected type of an untyped argument.
//!
//! Used for parameters and NULL literals, e.g. the `?` in `coalesce(price, ?)`
//! is expected to be of the same type as `price`.

use std::fmt;
use std::sync::Arc;

use crate::types::{SqlType, TypeContext, TypedNode};

/// Infers the type expected at an argument position.
pub trait ArgumentTypeResolver: Send + Sync + fmt::Debug {
    fn resolve_argument_type(
        &self,
        arguments: &[TypedNode],
        position: usize,
        ctx: &TypeContext,
    ) -> Option<SqlType>;
}

/// Never infers anything; the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInference;

impl ArgumentTypeResolver for NoInference {
    fn resolve_argument_type(
        &self,
        _arguments: &[TypedNode],
        _position: usize,
        _ctx: &TypeContext,
    ) -> Option<SqlType> {
        None
    }
}

/// Fixed type per position; the last entry repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantArgumentTypes(pub Vec<SqlType>);

impl ArgumentTypeResolver for InvariantArgumentTypes {
    fn resolve_argument_type(
        &self,
        _arguments: &[TypedNode],
        position: usize,
        _ctx: &TypeContext,
    ) -> Option<SqlType> {
        self.0.get(position).or_else(|| self.0.last()).copied()
    }
}

/// Same type as the argument at a fixed position.
#[derive(Debug, Clone, Copy)]
pub struct FromArgument {
    source: usize,
}

impl ArgumentTypeResolver for FromArgument {
    fn resolve_argument_type(
        &self,
        arguments: &[TypedNode],
        position: usize,
        _ctx: &TypeContext,
    ) -> Option<SqlType> {
        if position == self.source {
            return None;
        }
        arguments.get(self.source)?.sql_type
    }
}

/// Same type as the first other argument with a known type.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTyped;

impl ArgumentTypeResolver for FirstTyped {
    fn resolve_argument_type(
        &self,
        arguments: &[TypedNode],
        position: usize,
        _ctx: &TypeContext,
    ) -> Option<SqlType> {
        arguments
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != position)
            .find_map(|(_, argument)| argument.sql_type)
    }
}

/// A separate resolver per position; the last one repeats.
#[derive(Debug, Clone)]
pub struct Positional(pub Vec<Arc<dyn ArgumentTypeResolver>>);

impl ArgumentTypeResolver for Positional {
    fn resolve_argument_type(
        &self,
        arguments: &[TypedNode],
        position: usize,
        ctx: &TypeContext,
    ) -> Option<SqlType> {
        self.0
            .get(position)
            .or_else(|| self.0.last())?
            .resolve_argument_type(arguments, position, ctx)
    }
}

pub fn none() -> Arc<dyn ArgumentTypeResolver> {
    Arc::new(NoInference)
}

pub fn invariant(types: Vec<SqlType>) -> Arc<dyn ArgumentTypeResolver> {
    Arc::new(InvariantArgumentTypes(types))
}

pub fn from_argument(source: usize) -> Arc<dyn ArgumentTypeResolver> {
    Arc::new(FromArgument { source })
}

pub fn first_typed() -> Arc<dyn ArgumentTypeResolver> {
    Arc::new(FirstTyped)
}

pub fn positional(resolvers: Vec<Arc<dyn ArgumentTypeResolver>>) -> Arc<dyn ArgumentTypeResolver> {
    Arc::new(Positional(resolvers))
}
