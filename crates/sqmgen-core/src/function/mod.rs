//! Function descriptors and expression generation.
//!
//! A [`FunctionDescriptor`] owns four capabilities:
//!
//! - an [`ArgumentsValidator`] checking arity and argument types,
//! - a [`ReturnTypeResolver`] inferring the result type,
//! - an [`ArgumentTypeResolver`] inferring expected types for untyped arguments,
//! - an [`ExpressionGenerator`] building the node for each invocation shape.
//!
//! Every generation entry point validates before any generator hook runs.

pub mod argument_types;
mod descriptor;
mod generator;
mod registry;
pub mod return_types;
mod standard;
pub mod validators;

pub use argument_types::ArgumentTypeResolver;
pub use descriptor::{FunctionDescriptor, FunctionDescriptorBuilder, FunctionKind};
pub use generator::{resolve_call, ExpressionGenerator, StandardFunctionGenerator};
pub use registry::{FunctionRegistry, FunctionRegistryBuilder};
pub use return_types::ReturnTypeResolver;
pub use standard::standard_registry;
pub use validators::{ArgumentsValidator, Arity, ParameterType};
