//! Integration tests for concurrent get-or-create and remove

use super::test_utils::{definition, GatedContext, Probe};
use beanscope::annotation::{RequestScoped, ScopeAnnotation, Singleton};
use beanscope::{
    BeanId, ContextCatalog, FactoryCreationContext, InMemoryContext, Instance, ScopeRegistry,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

fn singleton_registry() -> Arc<ScopeRegistry> {
    Arc::new(ScopeRegistry::new(Arc::new(
        ContextCatalog::new().with_context(Arc::new(InMemoryContext::new(Singleton::NAME))),
    )))
}

#[test]
fn test_fifty_threads_share_one_instance() {
    let registry = singleton_registry();
    let def = definition("app.Expensive");
    let probe = Probe::default();
    let bean = BeanId::next();
    let barrier = Arc::new(Barrier::new(50));

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let def = Arc::clone(&def);
            let probe = probe.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || -> Instance {
                barrier.wait();
                let handle = registry.find_scope(Singleton::NAME).unwrap();
                handle
                    .get_or_create(probe.slow_request(bean, &def, Duration::from_millis(10)))
                    .unwrap()
            })
        })
        .collect();

    let instances: Vec<Instance> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
    assert_eq!(probe.created(), 1);
}

#[test]
fn test_slow_factory_does_not_block_other_beans() {
    let registry = singleton_registry();
    let handle = registry.find_scope(Singleton::NAME).unwrap();
    let slow_def = definition("app.Slow");
    let fast_def = definition("app.Fast");
    let slow_probe = Probe::default();
    let fast_probe = Probe::default();

    let slow = {
        let handle = Arc::clone(&handle);
        let slow_def = Arc::clone(&slow_def);
        let slow_probe = slow_probe.clone();
        thread::spawn(move || {
            handle
                .get_or_create(slow_probe.slow_request(
                    BeanId::next(),
                    &slow_def,
                    Duration::from_millis(500),
                ))
                .unwrap()
        })
    };

    // Let the slow creation start
    thread::sleep(Duration::from_millis(50));
    let started = Instant::now();
    handle
        .get_or_create(fast_probe.request(BeanId::next(), &fast_def))
        .unwrap();
    assert!(started.elapsed() < Duration::from_millis(400));
    assert_eq!(fast_probe.created(), 1);

    slow.join().unwrap();
    assert_eq!(slow_probe.created(), 1);
}

#[test]
fn test_concurrent_remove_of_distinct_beans() {
    let registry = singleton_registry();
    let handle = registry.find_scope(Singleton::NAME).unwrap();
    let probe = Probe::default();

    let beans: Vec<(BeanId, Arc<beanscope::BeanDefinition>)> = (0..20)
        .map(|i| (BeanId::next(), definition(&format!("app.Bean{}", i))))
        .collect();
    for (bean, def) in &beans {
        handle.get_or_create(probe.request(*bean, def)).unwrap();
    }
    assert_eq!(probe.created(), 20);

    let removers: Vec<_> = beans
        .iter()
        .map(|(bean, _)| {
            let handle = Arc::clone(&handle);
            let bean = *bean;
            thread::spawn(move || handle.remove(bean).unwrap().is_some())
        })
        .collect();

    assert!(removers.into_iter().all(|h| h.join().unwrap()));
    assert_eq!(probe.closed(), 20);
    assert_eq!(handle.tracked(), 0);
}

#[test]
fn test_racing_removes_destroy_once() {
    let registry = singleton_registry();
    let handle = registry.find_scope(Singleton::NAME).unwrap();
    let probe = Probe::default();
    let bean = BeanId::next();
    handle
        .get_or_create(probe.request(bean, &definition("app.Shared")))
        .unwrap();

    let barrier = Arc::new(Barrier::new(8));
    let removers: Vec<_> = (0..8)
        .map(|_| {
            let handle = Arc::clone(&handle);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                handle.remove(bean).unwrap().is_some()
            })
        })
        .collect();

    let removed = removers
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|removed| *removed)
        .count();
    assert_eq!(removed, 1);
    assert_eq!(probe.closed(), 1);
}

#[test]
fn test_failed_request_does_not_untrack_concurrent_success() {
    let (context, gate) = GatedContext::new(RequestScoped::NAME);
    let registry = ScopeRegistry::new(Arc::new(
        ContextCatalog::new().with_context(context.clone()),
    ));
    let handle = registry.find_scope(RequestScoped::NAME).unwrap();
    let def = definition("app.Cart");
    let bean = BeanId::next();

    let succeeding = {
        let handle = Arc::clone(&handle);
        let def = Arc::clone(&def);
        thread::spawn(move || {
            handle.get_or_create(Arc::new(FactoryCreationContext::new(bean, def, || {
                Ok(String::from("X"))
            })))
        })
    };

    // The succeeding request is registered and parked inside the context
    gate.wait_until_parked();
    let failed = handle.get_or_create(Arc::new(FactoryCreationContext::new(
        bean,
        Arc::clone(&def),
        || -> anyhow::Result<String> { Err(anyhow::anyhow!("pool exhausted")) },
    )));
    assert!(failed.is_err());

    gate.release();
    let created = succeeding.join().unwrap().unwrap();
    assert_eq!(context.len(), 1);
    assert!(handle.is_tracked(bean));

    let removed = handle.remove(bean).unwrap().unwrap();
    assert!(Arc::ptr_eq(&removed, &created));
    assert_eq!(removed.downcast_ref::<String>().unwrap(), "X");
    assert_eq!(context.len(), 0);
}

#[test]
fn test_remove_during_creation_waits_for_instance() {
    let registry = singleton_registry();
    let handle = registry.find_scope(Singleton::NAME).unwrap();
    let bean = BeanId::next();
    let started = Arc::new(Barrier::new(2));
    let closes = Arc::new(AtomicUsize::new(0));

    let creator = {
        let handle = Arc::clone(&handle);
        let started = Arc::clone(&started);
        let closes = Arc::clone(&closes);
        let request = FactoryCreationContext::new(bean, definition("app.Slow"), move || {
            started.wait();
            thread::sleep(Duration::from_millis(100));
            Ok(vec![7_u8; 8])
        })
        .with_close_hook(move |_| {
            closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        thread::spawn(move || handle.get_or_create(Arc::new(request)).unwrap())
    };

    // The factory is running; the identity is already registered
    started.wait();
    assert!(handle.is_tracked(bean));
    let removed = handle.remove(bean).unwrap();

    let created = creator.join().unwrap();
    let removed = removed.expect("removal sees the in-flight creation");
    assert!(Arc::ptr_eq(&removed, &created));
    assert_eq!(closes.load(Ordering::SeqCst), 1);

    // Whatever the index still holds resolves to nothing
    assert!(handle.remove(bean).unwrap().is_none());
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}
