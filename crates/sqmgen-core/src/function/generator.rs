//! Shape hooks that turn a validated invocation into an expression node.
//!
//! [`ExpressionGenerator::generate_function`] is the only required hook. The
//! aggregate, ordered-set aggregate and window hooks default to building the
//! plain call and converting it into the richer node with every extra clause
//! dropped, so a generator opts into exactly the clauses it supports by
//! overriding the matching hook.
//!
//! Hooks are only ever called by [`FunctionDescriptor`] after the descriptor's
//! validator accepted the arguments.

use std::fmt;
#[cfg(feature = "tracing")]
use tracing::debug;

use super::descriptor::{FunctionDescriptor, FunctionKind};
use crate::error::FunctionError;
use crate::types::{
    AggregateCall, CallSite, FunctionCall, OrderedSetAggregateCall, ResolvedArgument, SqlType,
    TypeContext, WindowCall,
};

/// Builds expression nodes for the four invocation shapes.
pub trait ExpressionGenerator: Send + Sync + fmt::Debug {
    /// Builds the node for a plain invocation.
    fn generate_function(
        &self,
        descriptor: &FunctionDescriptor,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<FunctionCall, FunctionError>;

    /// Builds the node for an aggregate invocation. Drops the filter unless overridden.
    fn generate_aggregate(
        &self,
        descriptor: &FunctionDescriptor,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<AggregateCall, FunctionError> {
        self.generate_function(descriptor, call_site, ctx)
            .map(AggregateCall::from)
    }

    /// Builds the node for an ordered-set aggregate invocation. Drops the filter
    /// and the within-group clause unless overridden.
    fn generate_ordered_set_aggregate(
        &self,
        descriptor: &FunctionDescriptor,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<OrderedSetAggregateCall, FunctionError> {
        self.generate_function(descriptor, call_site, ctx)
            .map(OrderedSetAggregateCall::from)
    }

    /// Builds the node for a window invocation. Drops the filter and the
    /// null-treatment/from-first flags unless overridden.
    fn generate_window(
        &self,
        descriptor: &FunctionDescriptor,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<WindowCall, FunctionError> {
        self.generate_function(descriptor, call_site, ctx)
            .map(WindowCall::from)
    }
}

/// Resolves argument and return types for `call_site` using the descriptor's resolvers.
///
/// Untyped arguments get an expected type from the argument-type resolver;
/// typed arguments are left as they are. For ordered-set aggregates without an
/// implied type, the type of the first `WITHIN GROUP` item stands in for it.
pub fn resolve_call(
    descriptor: &FunctionDescriptor,
    call_site: &CallSite,
    ctx: &TypeContext,
) -> Result<FunctionCall, FunctionError> {
    let arguments = call_site
        .arguments
        .iter()
        .enumerate()
        .map(|(position, argument)| ResolvedArgument {
            expected_type: match argument.sql_type {
                Some(_) => None,
                None => descriptor.argument_type_resolver().resolve_argument_type(
                    &call_site.arguments,
                    position,
                    ctx,
                ),
            },
            expression: argument.clone(),
        })
        .collect();

    let implied_type = call_site
        .implied_type
        .or_else(|| ordering_type(descriptor, call_site));
    let result_type = descriptor
        .return_type_resolver()
        .resolve_return_type(
            &call_site.arguments,
            implied_type,
            descriptor.name(),
            ctx,
        )
        .map_err(|err| {
            #[cfg(feature = "tracing")]
            debug!(function = descriptor.name(), error = %err, "return type resolution failed");
            err
        })?;

    Ok(FunctionCall {
        function: descriptor.name().to_string(),
        arguments,
        result_type,
    })
}

fn ordering_type(descriptor: &FunctionDescriptor, call_site: &CallSite) -> Option<SqlType> {
    if !descriptor.kind().supports_within_group() {
        return None;
    }
    call_site
        .within_group
        .as_ref()?
        .items
        .first()?
        .expression
        .sql_type
}

/// Generator used by descriptors that do not supply their own.
///
/// Honours the clauses the descriptor's [`FunctionKind`] allows: `FILTER` for
/// aggregates, `WITHIN GROUP` for ordered-set aggregates, null treatment and
/// from-first for window functions. Everything else degrades to the plain call.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFunctionGenerator;

impl ExpressionGenerator for StandardFunctionGenerator {
    fn generate_function(
        &self,
        descriptor: &FunctionDescriptor,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<FunctionCall, FunctionError> {
        resolve_call(descriptor, call_site, ctx)
    }

    fn generate_aggregate(
        &self,
        descriptor: &FunctionDescriptor,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<AggregateCall, FunctionError> {
        let kind = descriptor.kind();
        Ok(AggregateCall {
            call: self.generate_function(descriptor, call_site, ctx)?,
            filter: call_site.filter.clone().filter(|_| kind.supports_filter()),
        })
    }

    fn generate_ordered_set_aggregate(
        &self,
        descriptor: &FunctionDescriptor,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<OrderedSetAggregateCall, FunctionError> {
        let kind = descriptor.kind();
        Ok(OrderedSetAggregateCall {
            call: self.generate_function(descriptor, call_site, ctx)?,
            filter: call_site.filter.clone().filter(|_| kind.supports_filter()),
            within_group: call_site
                .within_group
                .clone()
                .filter(|_| kind.supports_within_group()),
        })
    }

    fn generate_window(
        &self,
        descriptor: &FunctionDescriptor,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<WindowCall, FunctionError> {
        let kind = descriptor.kind();
        let null_treatment = kind.supports_null_treatment();
        Ok(WindowCall {
            call: self.generate_function(descriptor, call_site, ctx)?,
            filter: call_site.filter.clone().filter(|_| kind.supports_filter()),
            respect_nulls: call_site.respect_nulls.filter(|_| null_treatment),
            from_first: call_site.from_first.filter(|_| null_treatment),
        })
    }
}

impl FunctionKind {
    /// Whether `FILTER (WHERE ...)` applies to functions of this kind.
    pub const fn supports_filter(&self) -> bool {
        matches!(self, FunctionKind::Aggregate | FunctionKind::OrderedSetAggregate)
    }

    /// Whether `WITHIN GROUP (ORDER BY ...)` applies to functions of this kind.
    pub const fn supports_within_group(&self) -> bool {
        matches!(self, FunctionKind::OrderedSetAggregate)
    }

    /// Whether `RESPECT/IGNORE NULLS` and `FROM FIRST/LAST` apply.
    pub const fn supports_null_treatment(&self) -> bool {
        matches!(self, FunctionKind::Window)
    }
}
