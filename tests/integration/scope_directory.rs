//! Integration tests for scope resolution

use super::test_utils::CountingContainer;
use beanscope::annotation::{ApplicationScoped, Dependent, RequestScoped, ScopeAnnotation};
use beanscope::{BeanDefinition, Context, ContextCatalog, InMemoryContext, ScopeRegistry};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn test_find_scope_returns_registered_context() {
    let a: Arc<dyn Context> = Arc::new(InMemoryContext::new("A"));
    let b: Arc<dyn Context> = Arc::new(InMemoryContext::new("B"));
    let catalog = ContextCatalog::new()
        .with_context(Arc::clone(&a))
        .with_context(Arc::clone(&b));
    let registry = ScopeRegistry::new(Arc::new(catalog));

    let found = registry.find_scope("A").unwrap();
    assert!(Arc::ptr_eq(found.context(), &a));
    assert!(!Arc::ptr_eq(found.context(), &b));
    assert_eq!(found.scope().as_str(), "A");

    assert!(Arc::ptr_eq(registry.find_scope("B").unwrap().context(), &b));
    assert!(registry.find_scope("C").is_none());
}

#[test]
fn test_find_scope_by_annotation_type() {
    let catalog = ContextCatalog::new()
        .with_context(Arc::new(InMemoryContext::new(ApplicationScoped::NAME)));
    let registry = ScopeRegistry::new(Arc::new(catalog));

    let handle = registry.find_scope_of::<ApplicationScoped>().unwrap();
    assert_eq!(handle.scope(), &ApplicationScoped::scope_id());
    assert!(registry.find_scope_of::<RequestScoped>().is_none());
}

#[test]
fn test_declared_default_scope_is_not_custom() {
    let catalog = ContextCatalog::new()
        .with_context(Arc::new(InMemoryContext::new(RequestScoped::NAME)))
        .with_context(Arc::new(InMemoryContext::new(Dependent::NAME)));
    let registry = ScopeRegistry::new(Arc::new(catalog));

    // Even with a context registered for it, the default scope is never custom
    let dependent = BeanDefinition::new("app.Helper").in_scope(Dependent::NAME);
    assert!(registry.find_declared_scope(&dependent).is_none());

    let scoped = BeanDefinition::new("app.Session").in_scope(RequestScoped::NAME);
    assert!(registry.find_declared_scope(&scoped).is_some());

    let unknown = BeanDefinition::new("app.Odd").in_scope("app.UnknownScope");
    assert!(registry.find_declared_scope(&unknown).is_none());
}

#[test]
fn test_enumeration_happens_once_sequentially() {
    let container = Arc::new(CountingContainer::new(vec![
        Arc::new(InMemoryContext::new("A")) as Arc<dyn Context>,
    ]));
    let registry = ScopeRegistry::new(container.clone());
    assert_eq!(container.enumerations(), 0);

    for _ in 0..10 {
        assert!(registry.find_scope("A").is_some());
        assert!(registry.find_scope("missing").is_none());
    }
    assert_eq!(registry.scopes().len(), 1);
    assert_eq!(container.enumerations(), 1);
}

#[test]
fn test_enumeration_happens_once_under_concurrency() {
    let container = Arc::new(
        CountingContainer::new(vec![
            Arc::new(InMemoryContext::new("A")) as Arc<dyn Context>,
            Arc::new(InMemoryContext::new("B")) as Arc<dyn Context>,
        ])
        .with_delay(Duration::from_millis(20)),
    );
    let registry = Arc::new(ScopeRegistry::new(container.clone()));
    let barrier = Arc::new(Barrier::new(32));

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let scope = if i % 2 == 0 { "A" } else { "B" };
                registry.find_scope(scope).is_some()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(container.enumerations(), 1);
}

#[test]
fn test_contexts_registered_after_build_are_not_seen() {
    let catalog = Arc::new(ContextCatalog::new().with_context(Arc::new(InMemoryContext::new("A"))));
    let registry = ScopeRegistry::new(catalog.clone());

    assert!(registry.find_scope("A").is_some());
    catalog.register(Arc::new(InMemoryContext::new("Late")));
    assert_eq!(catalog.len(), 2);
    assert!(registry.find_scope("Late").is_none());
}
