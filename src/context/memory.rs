//! In-memory context
//!
//! Every definition key owns a slot guarded by its own lock. A creation holds
//! only its slot, so a slow factory blocks concurrent requests for the same
//! bean and nothing else.

use super::{AlterableContext, Context, Contextual, CreationalContext};
use crate::error::ContextError;
use crate::types::{DefinitionKey, Instance, ScopeId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

struct Entry {
    instance: Instance,
    contextual: Arc<dyn Contextual>,
    creational: Arc<dyn CreationalContext>,
}

impl Entry {
    fn destroy(self) -> Result<(), ContextError> {
        self.contextual
            .destroy(&self.instance, self.creational.as_ref())
    }
}

type Slot = Arc<Mutex<Option<Entry>>>;

/// Reference [`AlterableContext`] keeping instances in memory
pub struct InMemoryContext {
    scope: ScopeId,
    alterable: bool,
    active: AtomicBool,
    // Slots live as long as the context; keys are bounded by the definitions seen.
    slots: Mutex<HashMap<DefinitionKey, Slot>>,
}

impl InMemoryContext {
    /// Create an active, alterable context for `scope`
    pub fn new(scope: impl Into<ScopeId>) -> Self {
        Self {
            scope: scope.into(),
            alterable: true,
            active: AtomicBool::new(true),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Refuse explicit destruction; instances only go away when the scope ends.
    pub fn non_alterable(mut self) -> Self {
        self.alterable = false;
        self
    }

    pub fn is_alterable(&self) -> bool {
        self.alterable
    }

    /// Number of cached instances
    pub fn len(&self) -> usize {
        self.all_slots()
            .iter()
            .filter(|slot| slot.lock().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn activate(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    /// End the scope: reject further access and destroy every cached instance.
    pub fn deactivate(&self) -> Result<(), ContextError> {
        self.active.store(false, Ordering::SeqCst);
        self.destroy_all()
    }

    /// Destroy every cached instance, returning the first failure after trying all.
    pub fn destroy_all(&self) -> Result<(), ContextError> {
        let mut first_error = None;
        for slot in self.all_slots() {
            let entry = slot.lock().take();
            let Some(entry) = entry else { continue };
            let key = entry.contextual.key().clone();
            if let Err(err) = entry.destroy() {
                warn!(
                    scope = %self.scope,
                    definition = %key,
                    error = %err,
                    "Failed to destroy contextual instance"
                );
                first_error.get_or_insert(err);
            }
        }
        debug!(scope = %self.scope, "Destroyed all contextual instances");

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn ensure_active(&self) -> Result<(), ContextError> {
        if self.active.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ContextError::ContextNotActive(self.scope.clone()))
        }
    }

    fn all_slots(&self) -> Vec<Slot> {
        self.slots.lock().values().cloned().collect()
    }

    fn slot(&self, key: &DefinitionKey) -> Option<Slot> {
        self.slots.lock().get(key).cloned()
    }

    fn slot_or_insert(&self, key: &DefinitionKey) -> Slot {
        Arc::clone(self.slots.lock().entry(key.clone()).or_default())
    }
}

impl Context for InMemoryContext {
    fn scope(&self) -> &ScopeId {
        &self.scope
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn get(&self, contextual: &dyn Contextual) -> Result<Option<Instance>, ContextError> {
        self.ensure_active()?;
        Ok(self
            .slot(contextual.key())
            .and_then(|slot| slot.lock().as_ref().map(|entry| Arc::clone(&entry.instance))))
    }

    fn get_or_create(
        &self,
        contextual: Arc<dyn Contextual>,
        creational: Arc<dyn CreationalContext>,
    ) -> Result<Instance, ContextError> {
        self.ensure_active()?;
        let slot = self.slot_or_insert(contextual.key());
        let mut guard = slot.lock();
        if let Some(entry) = guard.as_ref() {
            return Ok(Arc::clone(&entry.instance));
        }

        let instance = contextual.create(creational.as_ref())?;
        debug!(
            scope = %self.scope,
            definition = %contextual.key(),
            "Created contextual instance"
        );
        *guard = Some(Entry {
            instance: Arc::clone(&instance),
            contextual,
            creational,
        });
        Ok(instance)
    }

    fn as_alterable(&self) -> Option<&dyn AlterableContext> {
        if self.alterable {
            Some(self)
        } else {
            None
        }
    }
}

impl AlterableContext for InMemoryContext {
    fn destroy(&self, contextual: &dyn Contextual) -> Result<(), ContextError> {
        self.ensure_active()?;
        let entry = self
            .slot(contextual.key())
            .and_then(|slot| slot.lock().take());
        match entry {
            Some(entry) => {
                debug!(
                    scope = %self.scope,
                    definition = %contextual.key(),
                    "Destroying contextual instance"
                );
                entry.destroy()
            }
            None => Ok(()),
        }
    }
}

impl fmt::Debug for InMemoryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryContext")
            .field("scope", &self.scope)
            .field("alterable", &self.alterable)
            .field("active", &self.is_active())
            .finish()
    }
}
