//! Property-based tests for get-or-create / remove sequences

use beanscope::annotation::{ScopeAnnotation, Singleton};
use beanscope::{
    BeanDefinition, BeanId, ContextCatalog, FactoryCreationContext, InMemoryContext, ScopeRegistry,
};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Get(usize),
    Remove(usize),
    RemoveUnknown,
}

fn op_strategy(beans: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..beans).prop_map(Op::Get),
        2 => (0..beans).prop_map(Op::Remove),
        1 => Just(Op::RemoveUnknown),
    ]
}

/// The factory runs exactly when a bean is requested while absent, and remove
/// returns an instance exactly when one is present.
#[test]
fn test_lifecycle_matches_model() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &prop::collection::vec(op_strategy(4), 0..64),
            |ops| {
                let context = Arc::new(InMemoryContext::new(Singleton::NAME));
                let registry =
                    ScopeRegistry::new(Arc::new(ContextCatalog::new().with_context(context.clone())));
                let handle = registry.find_scope(Singleton::NAME).unwrap();

                let runs = Arc::new(AtomicUsize::new(0));
                let closes = Arc::new(AtomicUsize::new(0));
                let beans: Vec<(BeanId, Arc<BeanDefinition>)> = (0..4)
                    .map(|i| (BeanId::next(), Arc::new(BeanDefinition::new(format!("app.Bean{}", i)))))
                    .collect();

                let mut present = [false; 4];
                let mut expected_runs = 0;
                let mut expected_closes = 0;

                for op in ops {
                    match op {
                        Op::Get(i) => {
                            let (bean, def) = &beans[i];
                            let runs = Arc::clone(&runs);
                            let closes = Arc::clone(&closes);
                            let request = FactoryCreationContext::new(*bean, Arc::clone(def), move || {
                                Ok(runs.fetch_add(1, Ordering::SeqCst))
                            })
                            .with_close_hook(move |_| {
                                closes.fetch_add(1, Ordering::SeqCst);
                                Ok(())
                            });
                            handle.get_or_create(Arc::new(request)).unwrap();
                            if !present[i] {
                                present[i] = true;
                                expected_runs += 1;
                            }
                        }
                        Op::Remove(i) => {
                            let removed = handle.remove(beans[i].0).unwrap();
                            prop_assert_eq!(removed.is_some(), present[i]);
                            if present[i] {
                                present[i] = false;
                                expected_closes += 1;
                            }
                        }
                        Op::RemoveUnknown => {
                            prop_assert!(handle.remove(BeanId::next()).unwrap().is_none());
                        }
                    }
                }

                prop_assert_eq!(runs.load(Ordering::SeqCst), expected_runs);
                prop_assert_eq!(closes.load(Ordering::SeqCst), expected_closes);
                prop_assert_eq!(context.len(), present.iter().filter(|p| **p).count());
                Ok(())
            },
        )
        .unwrap();
}
