//! Scope registry: resolves scope identifiers to handles over registered contexts.

use super::handle::ScopeHandle;
use crate::annotation::{resolve_declared_scope, AnnotationMetadata, Dependent, ScopeAnnotation};
use crate::config::ScopeConfig;
use crate::container::BeanContainer;
use crate::types::ScopeId;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// Lazily built directory of the scopes a container provides
///
/// The container's contexts are enumerated once, on the first lookup. Every
/// later lookup reads the built map without locking. Contexts registered with
/// the container after that point are not seen.
pub struct ScopeRegistry {
    container: Arc<dyn BeanContainer>,
    default_scope: ScopeId,
    scopes: OnceLock<HashMap<ScopeId, Arc<ScopeHandle>>>,
}

impl ScopeRegistry {
    /// Create a registry treating `Dependent` as the default scope
    pub fn new(container: Arc<dyn BeanContainer>) -> Self {
        Self {
            container,
            default_scope: Dependent::scope_id(),
            scopes: OnceLock::new(),
        }
    }

    /// Create a registry using the configured default scope
    pub fn from_config(container: Arc<dyn BeanContainer>, config: &ScopeConfig) -> Self {
        Self::new(container).with_default_scope(config.default_scope.clone())
    }

    /// Override the scope treated as "no custom scope"
    pub fn with_default_scope(mut self, scope: impl Into<ScopeId>) -> Self {
        self.default_scope = scope.into();
        self
    }

    pub fn default_scope(&self) -> &ScopeId {
        &self.default_scope
    }

    /// Resolve the custom scope declared on an element.
    ///
    /// Elements without a declaration, or declaring the default scope, have no
    /// custom scope.
    pub fn find_declared_scope(&self, metadata: &dyn AnnotationMetadata) -> Option<Arc<ScopeHandle>> {
        let scope = resolve_declared_scope(metadata, &self.default_scope);
        if scope == self.default_scope {
            return None;
        }
        self.find_scope(scope.as_str())
    }

    /// Resolve a scope by identifier
    pub fn find_scope(&self, scope: &str) -> Option<Arc<ScopeHandle>> {
        self.scope_map().get(scope).cloned()
    }

    /// Resolve a scope by annotation type
    pub fn find_scope_of<A: ScopeAnnotation>(&self) -> Option<Arc<ScopeHandle>> {
        self.find_scope(A::NAME)
    }

    /// Identifiers of every resolvable scope, sorted
    pub fn scopes(&self) -> Vec<ScopeId> {
        let mut scopes: Vec<ScopeId> = self.scope_map().keys().cloned().collect();
        scopes.sort();
        scopes
    }

    fn scope_map(&self) -> &HashMap<ScopeId, Arc<ScopeHandle>> {
        self.scopes.get_or_init(|| self.build_scope_map())
    }

    fn build_scope_map(&self) -> HashMap<ScopeId, Arc<ScopeHandle>> {
        let mut scopes = HashMap::new();
        for context in self.container.contexts() {
            match scopes.entry(context.scope().clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(Arc::new(ScopeHandle::new(context)));
                }
                Entry::Occupied(existing) => {
                    // First registration wins
                    warn!(
                        scope = %existing.key(),
                        "Ignoring duplicate context registered for scope"
                    );
                }
            }
        }

        info!(scopes = scopes.len(), "Built scope map");
        scopes
    }
}

impl fmt::Debug for ScopeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeRegistry")
            .field("default_scope", &self.default_scope)
            .field("built", &self.scopes.get().is_some())
            .finish()
    }
}
