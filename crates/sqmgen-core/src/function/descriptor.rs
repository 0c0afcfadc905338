//! Function descriptors: the registry entry for one named database function.
//!
//! A descriptor bundles the function's argument contract, its type inference
//! rules and the generator that builds expression nodes. Descriptors are
//! immutable once built and are shared between query compilations as
//! `Arc<FunctionDescriptor>`.
//!
//! # Example
//!
//! ```
//! use sqmgen_core::function::{return_types, validators, FunctionDescriptor, FunctionKind};
//! use sqmgen_core::{CallSite, Predicate, SqlType, TypeContext, TypedNode};
//!
//! let count = FunctionDescriptor::builder("count")
//!     .kind(FunctionKind::Aggregate)
//!     .arguments_validator(validators::with_signature(validators::max(1), "(*)"))
//!     .return_type_resolver(return_types::invariant(SqlType::Integer))
//!     .build();
//!
//! assert_eq!(count.signature("count"), "INTEGER count(*)");
//!
//! let site = CallSite::new(vec![TypedNode::untyped("*")]).with_filter(Predicate::new("paid"));
//! let node = count.generate_aggregate_expression(&site, &TypeContext::default()).unwrap();
//! assert_eq!(node.result_type(), Some(SqlType::Integer));
//! assert!(node.filter().is_some());
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use super::argument_types::{self, ArgumentTypeResolver};
use super::generator::{ExpressionGenerator, StandardFunctionGenerator};
use super::return_types::{self, ReturnTypeResolver};
use super::validators::{self, ArgumentsValidator};
use crate::error::FunctionError;
use crate::types::{CallSite, FunctionExpression, InvocationShape, TypeContext};

/// Category of a function, deciding which clauses its standard generator honours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub enum FunctionKind {
    /// Scalar functions (LOWER, ABS, COALESCE, ...)
    #[default]
    Scalar,
    /// Aggregate functions (SUM, COUNT, ...)
    Aggregate,
    /// Aggregates over an ordered input (PERCENTILE_CONT, LISTAGG, ...)
    OrderedSetAggregate,
    /// Window functions (ROW_NUMBER, LAG, ...)
    Window,
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionKind::Scalar => write!(f, "scalar"),
            FunctionKind::Aggregate => write!(f, "aggregate"),
            FunctionKind::OrderedSetAggregate => write!(f, "ordered-set aggregate"),
            FunctionKind::Window => write!(f, "window"),
        }
    }
}

/// Describes how a named function is validated, typed and turned into nodes.
#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    name: String,
    kind: FunctionKind,
    arguments_validator: Arc<dyn ArgumentsValidator>,
    return_type_resolver: Arc<dyn ReturnTypeResolver>,
    argument_type_resolver: Arc<dyn ArgumentTypeResolver>,
    generator: Arc<dyn ExpressionGenerator>,
    always_includes_parentheses: bool,
}

impl FunctionDescriptor {
    pub fn builder(name: impl Into<String>) -> FunctionDescriptorBuilder {
        FunctionDescriptorBuilder::new(name)
    }

    /// A descriptor with every capability defaulted.
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    pub fn arguments_validator(&self) -> &Arc<dyn ArgumentsValidator> {
        &self.arguments_validator
    }

    pub fn return_type_resolver(&self) -> &Arc<dyn ReturnTypeResolver> {
        &self.return_type_resolver
    }

    pub fn argument_type_resolver(&self) -> &Arc<dyn ArgumentTypeResolver> {
        &self.argument_type_resolver
    }

    pub fn generator(&self) -> &Arc<dyn ExpressionGenerator> {
        &self.generator
    }

    /// Whether the argument list is always rendered in parentheses, even when empty.
    pub fn always_includes_parentheses(&self) -> bool {
        self.always_includes_parentheses
    }

    /// Renders `"<return type> <invocation_name><argument list>"`.
    ///
    /// `invocation_name` is the name the function was looked up by, which may be
    /// an alias of [`Self::name`].
    pub fn signature(&self, invocation_name: &str) -> String {
        format!(
            "{}{}{}",
            self.return_signature(),
            invocation_name,
            self.argument_list_signature()
        )
    }

    /// The return type followed by a space, or an empty string when unknown.
    pub fn return_signature(&self) -> String {
        let result = self.return_type_resolver.return_type_signature();
        if result.is_empty() {
            result
        } else {
            format!("{result} ")
        }
    }

    /// The argument list. Functions whose parentheses are optional render no
    /// list when they take no arguments, and brackets instead of parentheses
    /// otherwise.
    pub fn argument_list_signature(&self) -> String {
        let args = self.arguments_validator.signature();
        if self.always_includes_parentheses {
            return args;
        }
        if args == "()" {
            return String::new();
        }
        let inner = args
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(&args);
        format!("[{inner}]")
    }

    /// Validates and builds a plain invocation.
    pub fn generate_expression(
        &self,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<FunctionExpression, FunctionError> {
        self.validate(call_site, ctx)?;
        #[cfg(feature = "tracing")]
        trace!(function = %self.name, shape = %InvocationShape::Plain, "generating expression");
        self.generator
            .generate_function(self, call_site, ctx)
            .map(FunctionExpression::Plain)
    }

    /// Validates and builds an aggregate invocation (`FILTER` aware).
    pub fn generate_aggregate_expression(
        &self,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<FunctionExpression, FunctionError> {
        self.validate(call_site, ctx)?;
        #[cfg(feature = "tracing")]
        trace!(function = %self.name, shape = %InvocationShape::Aggregate, "generating expression");
        self.generator
            .generate_aggregate(self, call_site, ctx)
            .map(FunctionExpression::Aggregate)
    }

    /// Validates and builds an ordered-set aggregate invocation (`WITHIN GROUP` aware).
    pub fn generate_ordered_set_aggregate_expression(
        &self,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<FunctionExpression, FunctionError> {
        self.validate(call_site, ctx)?;
        #[cfg(feature = "tracing")]
        trace!(
            function = %self.name,
            shape = %InvocationShape::OrderedSetAggregate,
            "generating expression"
        );
        self.generator
            .generate_ordered_set_aggregate(self, call_site, ctx)
            .map(FunctionExpression::OrderedSetAggregate)
    }

    /// Validates and builds a window invocation (null treatment aware).
    pub fn generate_window_expression(
        &self,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<FunctionExpression, FunctionError> {
        self.validate(call_site, ctx)?;
        #[cfg(feature = "tracing")]
        trace!(function = %self.name, shape = %InvocationShape::Window, "generating expression");
        self.generator
            .generate_window(self, call_site, ctx)
            .map(FunctionExpression::Window)
    }

    /// Dispatches to the entry point for `shape`.
    pub fn generate(
        &self,
        shape: InvocationShape,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<FunctionExpression, FunctionError> {
        match shape {
            InvocationShape::Plain => self.generate_expression(call_site, ctx),
            InvocationShape::Aggregate => self.generate_aggregate_expression(call_site, ctx),
            InvocationShape::OrderedSetAggregate => {
                self.generate_ordered_set_aggregate_expression(call_site, ctx)
            }
            InvocationShape::Window => self.generate_window_expression(call_site, ctx),
        }
    }

    fn validate(&self, call_site: &CallSite, ctx: &TypeContext) -> Result<(), FunctionError> {
        self.arguments_validator
            .validate(&call_site.arguments, &self.name, ctx)
            .map_err(|err| {
                #[cfg(feature = "tracing")]
                debug!(function = %self.name, error = %err, "argument validation failed");
                err
            })
    }
}

/// Builds a [`FunctionDescriptor`], substituting defaults for omitted capabilities:
///
/// - validator: [`validators::none`] (any arguments)
/// - return type: [`return_types::use_first_non_null`]
/// - argument types: [`argument_types::none`]
/// - generator: [`StandardFunctionGenerator`]
#[derive(Debug)]
pub struct FunctionDescriptorBuilder {
    name: String,
    kind: FunctionKind,
    arguments_validator: Option<Arc<dyn ArgumentsValidator>>,
    return_type_resolver: Option<Arc<dyn ReturnTypeResolver>>,
    argument_type_resolver: Option<Arc<dyn ArgumentTypeResolver>>,
    generator: Option<Arc<dyn ExpressionGenerator>>,
    always_includes_parentheses: bool,
}

impl FunctionDescriptorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FunctionKind::Scalar,
            arguments_validator: None,
            return_type_resolver: None,
            argument_type_resolver: None,
            generator: None,
            always_includes_parentheses: true,
        }
    }

    pub fn kind(mut self, kind: FunctionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn arguments_validator(mut self, validator: Arc<dyn ArgumentsValidator>) -> Self {
        self.arguments_validator = Some(validator);
        self
    }

    pub fn return_type_resolver(mut self, resolver: Arc<dyn ReturnTypeResolver>) -> Self {
        self.return_type_resolver = Some(resolver);
        self
    }

    pub fn argument_type_resolver(mut self, resolver: Arc<dyn ArgumentTypeResolver>) -> Self {
        self.argument_type_resolver = Some(resolver);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn ExpressionGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Marks the parentheses as optional, e.g. for `current_timestamp`.
    pub fn optional_parentheses(mut self) -> Self {
        self.always_includes_parentheses = false;
        self
    }

    pub fn build(self) -> FunctionDescriptor {
        FunctionDescriptor {
            name: self.name,
            kind: self.kind,
            arguments_validator: self.arguments_validator.unwrap_or_else(validators::none),
            return_type_resolver: self
                .return_type_resolver
                .unwrap_or_else(return_types::use_first_non_null),
            argument_type_resolver: self
                .argument_type_resolver
                .unwrap_or_else(argument_types::none),
            generator: self
                .generator
                .unwrap_or_else(|| Arc::new(StandardFunctionGenerator)),
            always_includes_parentheses: self.always_includes_parentheses,
        }
    }
}
