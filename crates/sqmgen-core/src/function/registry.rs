//! Name-indexed collection of function descriptors.

use std::collections::BTreeMap;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::debug;

use super::descriptor::FunctionDescriptor;
use crate::error::FunctionError;
use crate::types::{CallSite, FunctionExpression, InvocationShape, TypeContext};

/// Immutable lookup table from (lowercase) function name to descriptor.
///
/// Aliases share the descriptor they point to, so `signature()` can still be
/// rendered with the name the query used.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, Arc<FunctionDescriptor>>,
}

impl FunctionRegistry {
    pub fn builder() -> FunctionRegistryBuilder {
        FunctionRegistryBuilder::default()
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Arc<FunctionDescriptor>> {
        self.functions.get(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names (aliases included) with their descriptors, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<FunctionDescriptor>)> {
        self.functions
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    /// Signature of `name` as invoked, or `None` if it is not registered.
    pub fn signature(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(|descriptor| descriptor.signature(&name.to_ascii_lowercase()))
    }

    /// Looks up `name` and generates the expression for `shape`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            skip(self, call_site, ctx),
            fields(arguments = call_site.arguments.len())
        )
    )]
    pub fn generate(
        &self,
        name: &str,
        shape: InvocationShape,
        call_site: &CallSite,
        ctx: &TypeContext,
    ) -> Result<FunctionExpression, FunctionError> {
        let descriptor = self.get(name).ok_or_else(|| FunctionError::UnknownFunction {
            name: name.to_string(),
        })?;
        descriptor.generate(shape, call_site, ctx)
    }
}

/// Collects descriptors into a [`FunctionRegistry`].
///
/// Registering a name twice keeps the later descriptor.
#[derive(Debug, Default)]
pub struct FunctionRegistryBuilder {
    functions: BTreeMap<String, Arc<FunctionDescriptor>>,
}

impl FunctionRegistryBuilder {
    /// Registers `descriptor` under its own name.
    pub fn register(mut self, descriptor: FunctionDescriptor) -> Self {
        let key = descriptor.name().to_ascii_lowercase();
        self.insert(key, Arc::new(descriptor));
        self
    }

    /// Registers an existing entry under an additional name.
    ///
    /// Does nothing if `target` has not been registered yet.
    pub fn register_alias(mut self, alias: &str, target: &str) -> Self {
        match self.functions.get(&target.to_ascii_lowercase()).cloned() {
            Some(descriptor) => self.insert(alias.to_ascii_lowercase(), descriptor),
            None => {
                #[cfg(feature = "tracing")]
                debug!(alias, target, "alias target not registered");
            }
        }
        self
    }

    fn insert(&mut self, key: String, descriptor: Arc<FunctionDescriptor>) {
        if let Some(_previous) = self.functions.insert(key, descriptor) {
            #[cfg(feature = "tracing")]
            debug!(function = _previous.name(), "replacing registered function");
        }
    }

    pub fn build(self) -> FunctionRegistry {
        FunctionRegistry {
            functions: self.functions,
        }
    }
}
