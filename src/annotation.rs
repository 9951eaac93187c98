//! Scope annotations and declared-scope resolution
//!
//! Metadata extraction happens elsewhere; this module only consumes its output
//! through [`AnnotationMetadata`].

use crate::types::ScopeId;

/// A scope annotation type, identified by its fully qualified name.
pub trait ScopeAnnotation {
    const NAME: &'static str;

    fn scope_id() -> ScopeId {
        ScopeId::from(Self::NAME)
    }
}

/// Default pseudo-scope: a new instance per injection, never cached.
#[derive(Debug, Clone, Copy)]
pub struct Dependent;

impl ScopeAnnotation for Dependent {
    const NAME: &'static str = "jakarta.enterprise.context.Dependent";
}

#[derive(Debug, Clone, Copy)]
pub struct Singleton;

impl ScopeAnnotation for Singleton {
    const NAME: &'static str = "jakarta.inject.Singleton";
}

#[derive(Debug, Clone, Copy)]
pub struct ApplicationScoped;

impl ScopeAnnotation for ApplicationScoped {
    const NAME: &'static str = "jakarta.enterprise.context.ApplicationScoped";
}

#[derive(Debug, Clone, Copy)]
pub struct RequestScoped;

impl ScopeAnnotation for RequestScoped {
    const NAME: &'static str = "jakarta.enterprise.context.RequestScoped";
}

/// Resolved annotation metadata of an injection target or bean type
pub trait AnnotationMetadata {
    /// The scope annotation declared on the element, if any.
    fn declared_scope(&self) -> Option<&ScopeId>;
}

/// Resolve the effective scope of an element, falling back to `default_scope`.
pub fn resolve_declared_scope(
    metadata: &dyn AnnotationMetadata,
    default_scope: &ScopeId,
) -> ScopeId {
    metadata
        .declared_scope()
        .cloned()
        .unwrap_or_else(|| default_scope.clone())
}
