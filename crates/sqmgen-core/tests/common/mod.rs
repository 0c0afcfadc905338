#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sqmgen_core::function::{resolve_call, return_types};
use sqmgen_core::{
    CallSite, ExpressionGenerator, FunctionCall, FunctionDescriptor, FunctionError, OrderByClause,
    Predicate, ReturnTypeResolver, SortSpecification, SqlType, TypeContext, TypedNode,
};

/// Generator that only supplies the plain hook and counts how often it runs.
#[derive(Debug, Default)]
pub struct PlainOnlyGenerator {
    pub calls: AtomicUsize,
}

impl PlainOnlyGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExpressionGenerator for PlainOnlyGenerator {
    fn generate_function(
        &self,
        descriptor: &FunctionDescriptor,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<FunctionCall, FunctionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        resolve_call(descriptor, call_site, ctx)
    }
}

/// Return-type resolver that records invocations and delegates to `use_first_non_null`.
#[derive(Debug, Default)]
pub struct RecordingResolver {
    pub calls: AtomicUsize,
}

impl RecordingResolver {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReturnTypeResolver for RecordingResolver {
    fn resolve_return_type(
        &self,
        arguments: &[TypedNode],
        implied_type: Option<SqlType>,
        function_name: &str,
        ctx: &TypeContext,
    ) -> Result<Option<SqlType>, FunctionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        return_types::use_first_non_null().resolve_return_type(
            arguments,
            implied_type,
            function_name,
            ctx,
        )
    }
}

/// A call site with every optional clause populated.
pub fn full_call_site(arguments: Vec<TypedNode>) -> CallSite {
    CallSite::new(arguments)
        .with_filter(Predicate::new("status = 'paid'"))
        .with_within_group(OrderByClause::new(vec![SortSpecification::descending(
            TypedNode::typed("amount", SqlType::Float),
        )]))
        .with_respect_nulls(false)
        .with_from_first(false)
}

pub fn plain_only(name: &str) -> (FunctionDescriptor, Arc<PlainOnlyGenerator>) {
    let generator = Arc::new(PlainOnlyGenerator::default());
    let descriptor = FunctionDescriptor::builder(name)
        .generator(generator.clone())
        .build();
    (descriptor, generator)
}
