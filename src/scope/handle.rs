//! Scope handle: a custom scope backed by one [`Context`]
//!
//! The context is the cache of record. The handle additionally remembers which
//! contextual backs each bean identity so that removal by identity can find the
//! instance to destroy.
//!
//! Index entries outlive instances the context destroys on its own, for example
//! when a request scope ends. Such an entry resolves to nothing: `remove` drops
//! it and returns `None`, and [`ScopeHandle::prune`] drops every one of them.

use super::bridge::BridgingContextual;
use super::carrier::CreatedBeanCarrier;
use crate::bean::BeanCreationContext;
use crate::context::Context;
use crate::error::ContextError;
use crate::types::{BeanId, Instance, ScopeId};
use dashmap::DashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

pub struct ScopeHandle {
    context: Arc<dyn Context>,
    created: DashMap<BeanId, Arc<BridgingContextual>>,
}

impl ScopeHandle {
    pub fn new(context: Arc<dyn Context>) -> Self {
        Self {
            context,
            created: DashMap::new(),
        }
    }

    /// Scope annotation this handle serves
    pub fn scope(&self) -> &ScopeId {
        self.context.scope()
    }

    pub fn context(&self) -> &Arc<dyn Context> {
        &self.context
    }

    /// Return the scoped instance for the requested bean, creating it on a miss
    pub fn get_or_create(
        &self,
        creation: Arc<dyn BeanCreationContext>,
    ) -> Result<Instance, ContextError> {
        let lookup = Arc::new(BridgingContextual::lookup(Arc::clone(
            creation.definition(),
        )));
        if let Some(existing) = self.context.get(lookup.as_ref())? {
            trace!(scope = %self.scope(), definition = %lookup.definition().key(), "Scope hit");
            return Ok(existing);
        }

        // Registered before creation so a concurrent remove can see it.
        let bean = creation.id();
        self.created.insert(bean, Arc::clone(&lookup));

        let carrier = Arc::new(CreatedBeanCarrier::new());
        let bound = Arc::new(BridgingContextual::bound(creation));
        match self.context.get_or_create(bound, carrier) {
            Ok(instance) => {
                // A failed request for the same identity may have rolled back
                // the entry while this one was waiting on the context.
                self.created
                    .entry(bean)
                    .or_insert_with(|| Arc::clone(&lookup));
                Ok(instance)
            }
            Err(err) => {
                self.created
                    .remove_if(&bean, |_, registered| Arc::ptr_eq(registered, &lookup));
                debug!(scope = %self.scope(), %bean, error = %err, "Scoped creation failed");
                Err(err)
            }
        }
    }

    /// Typed variant of [`ScopeHandle::get_or_create`]
    pub fn get_or_create_typed<T: Any + Send + Sync>(
        &self,
        creation: Arc<dyn BeanCreationContext>,
    ) -> Result<Arc<T>, ContextError> {
        let definition = creation.definition().key().clone();
        self.get_or_create(creation)?
            .downcast::<T>()
            .map_err(|_| ContextError::TypeMismatch {
                definition,
                expected: std::any::type_name::<T>(),
            })
    }

    /// Destroy the instance created for `bean`, returning it.
    ///
    /// Returns `None` when the context does not support destruction, when the
    /// identity was never created through this handle, or when the instance is
    /// already gone from the context.
    pub fn remove(&self, bean: BeanId) -> Result<Option<Instance>, ContextError> {
        let Some(alterable) = self.context.as_alterable() else {
            return Ok(None);
        };
        let Some((_, contextual)) = self.created.remove(&bean) else {
            return Ok(None);
        };

        match self.context.get(contextual.as_ref())? {
            Some(instance) => {
                alterable.destroy(contextual.as_ref())?;
                debug!(scope = %self.scope(), %bean, "Removed scoped bean");
                Ok(Some(instance))
            }
            None => Ok(None),
        }
    }

    /// Whether `bean` is recorded as created through this handle
    pub fn is_tracked(&self, bean: BeanId) -> bool {
        self.created.contains_key(&bean)
    }

    /// Number of bean identities recorded by this handle
    pub fn tracked(&self) -> usize {
        self.created.len()
    }

    /// Forget identities whose instance the context no longer holds.
    ///
    /// Returns the number of entries dropped. An inactive context holds
    /// nothing, so every entry goes.
    pub fn prune(&self) -> usize {
        let snapshot: Vec<(BeanId, Arc<BridgingContextual>)> = self
            .created
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();

        let mut pruned = 0;
        for (bean, contextual) in snapshot {
            if matches!(self.context.get(contextual.as_ref()), Ok(Some(_))) {
                continue;
            }
            if self
                .created
                .remove_if(&bean, |_, registered| Arc::ptr_eq(registered, &contextual))
                .is_some()
            {
                pruned += 1;
            }
        }

        if pruned > 0 {
            debug!(scope = %self.scope(), pruned, "Pruned stale bean identities");
        }
        pruned
    }
}

impl fmt::Debug for ScopeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeHandle")
            .field("scope", self.scope())
            .field("tracked", &self.tracked())
            .finish()
    }
}
