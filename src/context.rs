//! Contextual-instance protocol
//!
//! A [`Context`] holds the instances of one scope. It calls back into a
//! [`Contextual`] to create an instance on a cache miss and to destroy it later,
//! handing the contextual the [`CreationalContext`] it was created with.
//! Contexts identify contextuals by [`Contextual::key`], never by address.

use crate::error::ContextError;
use crate::types::{DefinitionKey, Instance, ScopeId};
use std::any::Any;
use std::sync::Arc;

pub mod memory;

pub use memory::InMemoryContext;

/// Per-creation state passed from a context to a contextual
pub trait CreationalContext: Send + Sync {
    /// Capability check used by contextuals that expect a specific kind.
    fn as_any(&self) -> &dyn Any;
}

/// Create/destroy behavior of a bean, invoked by a context
pub trait Contextual: Send + Sync {
    /// Cache key; contextuals with equal keys address the same instance.
    fn key(&self) -> &DefinitionKey;

    fn create(&self, creational: &dyn CreationalContext) -> Result<Instance, ContextError>;

    fn destroy(
        &self,
        instance: &Instance,
        creational: &dyn CreationalContext,
    ) -> Result<(), ContextError>;
}

/// Instance store for one scope
pub trait Context: Send + Sync {
    /// Scope governed by this context
    fn scope(&self) -> &ScopeId;

    fn is_active(&self) -> bool {
        true
    }

    /// Return the cached instance for `contextual`, if any. Never creates.
    fn get(&self, contextual: &dyn Contextual) -> Result<Option<Instance>, ContextError>;

    /// Return the cached instance for `contextual`, creating it on a miss.
    ///
    /// At most one creation succeeds per key, even under concurrent first
    /// access. A failed creation leaves nothing cached.
    fn get_or_create(
        &self,
        contextual: Arc<dyn Contextual>,
        creational: Arc<dyn CreationalContext>,
    ) -> Result<Instance, ContextError>;

    /// Explicit destruction support, if this context allows it.
    fn as_alterable(&self) -> Option<&dyn AlterableContext> {
        None
    }
}

/// A context whose instances can be destroyed on demand
pub trait AlterableContext: Context {
    /// Destroy the instance cached for `contextual`. No-op when nothing is cached.
    fn destroy(&self, contextual: &dyn Contextual) -> Result<(), ContextError>;
}
