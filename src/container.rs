//! Host container boundary: enumeration of registered contexts.

use crate::config::ScopeConfig;
use crate::context::{Context, InMemoryContext};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The host container as seen by the scope registry
pub trait BeanContainer: Send + Sync {
    /// Every context registered with the container
    fn contexts(&self) -> Vec<Arc<dyn Context>>;
}

/// In-memory container of registered contexts
#[derive(Default)]
pub struct ContextCatalog {
    contexts: RwLock<Vec<Arc<dyn Context>>>,
}

impl ContextCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog with one in-memory context per configured scope
    pub fn from_config(config: &ScopeConfig) -> Self {
        let catalog = Self::new();
        for context in &config.contexts {
            let memory = InMemoryContext::new(context.scope.clone());
            let memory = if context.alterable {
                memory
            } else {
                memory.non_alterable()
            };
            catalog.register(Arc::new(memory));
        }
        catalog
    }

    /// Register a context
    pub fn register(&self, context: Arc<dyn Context>) {
        debug!(scope = %context.scope(), "Registered context");
        self.contexts.write().push(context);
    }

    /// Register a context, builder style
    pub fn with_context(self, context: Arc<dyn Context>) -> Self {
        self.register(context);
        self
    }

    pub fn len(&self) -> usize {
        self.contexts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BeanContainer for ContextCatalog {
    fn contexts(&self) -> Vec<Arc<dyn Context>> {
        self.contexts.read().clone()
    }
}

impl fmt::Debug for ContextCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scopes: Vec<String> = self
            .contexts
            .read()
            .iter()
            .map(|c| c.scope().to_string())
            .collect();
        f.debug_struct("ContextCatalog").field("scopes", &scopes).finish()
    }
}
