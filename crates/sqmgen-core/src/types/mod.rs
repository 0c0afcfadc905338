//! Types exchanged with the query compiler.
//!
//! Inputs ([`CallSite`], [`TypedNode`], clauses) describe a function invocation as
//! the compiler sees it; outputs ([`FunctionExpression`] and its call structs)
//! are the typed nodes handed on to SQL rendering.

mod context;
mod expression;
mod node;
mod sql_type;

pub use context::{Dialect, TypeContext};
pub use expression::{
    AggregateCall, FunctionCall, FunctionExpression, InvocationShape, OrderedSetAggregateCall,
    ResolvedArgument, WindowCall,
};
pub use node::{
    CallSite, NullPrecedence, OrderByClause, Predicate, SortDirection, SortSpecification,
    TypedNode,
};
pub use sql_type::{can_implicitly_cast, normalize_type_name, SqlType};
