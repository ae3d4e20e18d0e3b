//! Integration tests for recursive adaptation and the applier cache
//!
//! Tests cover:
//! - Interface-typed results adapted on read through the converter
//! - Navigation of cyclic object graphs
//! - Idempotent cached generation
//! - Concurrent first-time generation

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use latebind_engine::{
    Applier, ApplierFactory, CachedValueConverter, CachingApplierFactory, CombinedApplierFactory,
    EngineConfig, ValueConverter,
};
use latebind_sdk::{
    same_object, AdaptResult, Expando, ObjectExt, ObjectRef, PropertyInfo, Record, TypeDescriptor,
    TypeRegistry, Value, ValueType,
};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn node_registry() -> Arc<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    registry
        .register(
            TypeDescriptor::interface("INode")
                .property(PropertyInfo::read_write("Name", ValueType::String))
                .property(PropertyInfo::read_write(
                    "Hierarchy",
                    ValueType::interface("INodeHierarchy"),
                )),
        )
        .unwrap();
    registry
        .register(
            TypeDescriptor::interface("INodeHierarchy")
                .property(PropertyInfo::read_only("Previous", ValueType::interface("INode")))
                .property(PropertyInfo::read_only("Self", ValueType::interface("INode")))
                .property(PropertyInfo::read_only("Next", ValueType::interface("INode"))),
        )
        .unwrap();
    Arc::new(registry)
}

fn node(name: &str) -> Arc<Record> {
    Record::builder("Node")
        .field("Name", ValueType::String, name)
        .field("Hierarchy", ValueType::Object, Value::Null)
        .build()
        .unwrap()
}

fn hierarchy() -> Arc<Record> {
    Record::builder("NodeHierarchy")
        .field("Previous", ValueType::Object, Value::Null)
        .field("Self", ValueType::Object, Value::Null)
        .field("Next", ValueType::Object, Value::Null)
        .build()
        .unwrap()
}

/// Three nodes in a ring: Node1 <-> Node2 <-> Node3 <-> Node1
fn ring() -> Vec<Arc<Record>> {
    let nodes: Vec<Arc<Record>> = (1..=3).map(|i| node(&format!("Node{}", i))).collect();
    for (i, current) in nodes.iter().enumerate() {
        let previous = nodes[(i + nodes.len() - 1) % nodes.len()].clone();
        let next = nodes[(i + 1) % nodes.len()].clone();
        let links = hierarchy();
        links.set_field("Previous", Value::object(previous)).unwrap();
        links.set_field("Self", Value::object(current.clone())).unwrap();
        links.set_field("Next", Value::object(next)).unwrap();
        current.set_field("Hierarchy", Value::object(links)).unwrap();
    }
    nodes
}

fn standard_stack(registry: Arc<TypeRegistry>) -> (Arc<CachingApplierFactory>, Arc<dyn ValueConverter>) {
    let factory = Arc::new(CachingApplierFactory::standard(registry, EngineConfig::default()));
    let converter: Arc<dyn ValueConverter> = CachedValueConverter::new(factory.clone());
    (factory, converter)
}

// =============================================================================
// RECURSIVE ADAPTATION
// =============================================================================

mod graph_tests {
    use super::*;

    #[test]
    fn test_cyclic_navigation() {
        let nodes = ring();
        let (factory, converter) = standard_stack(node_registry());
        let applier = factory.generate("INode", converter).unwrap();
        let node2 = applier.apply(Value::object(nodes[1].clone())).unwrap();

        let mut current = node2;
        for step in ["Previous", "Next", "Next", "Previous"] {
            let links = current.get("Hierarchy").unwrap();
            let links = links.as_object().unwrap();
            assert!(links.implements("INodeHierarchy"));
            current = links.get(step).unwrap().as_object().unwrap().clone();
            assert!(current.implements("INode"));
        }
        assert_eq!(current.get("Name").unwrap(), Value::from("Node2"));
    }

    #[test]
    fn test_results_are_adapted_on_read() {
        let nodes = ring();
        let (factory, converter) = standard_stack(node_registry());
        let applier = factory.generate("INode", converter).unwrap();
        let node1 = applier.apply(Value::object(nodes[0].clone())).unwrap();

        // Only INode exists until the first Hierarchy read
        assert_eq!(factory.len(), 1);
        let links = node1.get("Hierarchy").unwrap();
        assert!(factory.contains("INodeHierarchy"));
        assert_eq!(factory.len(), 2);

        let own = links.as_object().unwrap().get("Self").unwrap();
        assert_eq!(own.as_object().unwrap().get("Name").unwrap(), Value::from("Node1"));
    }

    #[test]
    fn test_null_links_stay_null() {
        let lonely = node("Alone");
        let (factory, converter) = standard_stack(node_registry());
        let applier = factory.generate("INode", converter).unwrap();
        let adapted = applier.apply(Value::object(lonely)).unwrap();
        assert_eq!(adapted.get("Hierarchy").unwrap(), Value::Null);
    }

    #[test]
    fn test_writes_reach_source_through_nested_adapters() {
        let nodes = ring();
        let (factory, converter) = standard_stack(node_registry());
        let applier = factory.generate("INode", converter).unwrap();
        let node1 = applier.apply(Value::object(nodes[0].clone())).unwrap();

        let next = node1.get("Hierarchy").unwrap().as_object().unwrap().get("Next").unwrap();
        next.as_object().unwrap().set("Name", "Renamed").unwrap();
        assert_eq!(nodes[1].get_field("Name"), Some(Value::from("Renamed")));
    }

    #[test]
    fn test_automation_graph() {
        // Same navigation, but the link object is an automation component
        let target = node("Target");
        let links = Expando::new("Links")
            .with_property("Next", Value::object(target))
            .build();
        let start = node("Start");
        start.set_field("Hierarchy", Value::object(links)).unwrap();

        let (factory, converter) = standard_stack(node_registry());
        let applier = factory.generate("INode", converter).unwrap();
        let adapted = applier.apply(Value::object(start)).unwrap();

        let next = adapted.get("Hierarchy").unwrap().as_object().unwrap().get("Next").unwrap();
        assert_eq!(next.as_object().unwrap().get("Name").unwrap(), Value::from("Target"));
    }
}

// =============================================================================
// APPLIER CACHE
// =============================================================================

mod cache_tests {
    use super::*;

    struct Counting {
        inner: CombinedApplierFactory,
        calls: AtomicUsize,
    }

    impl ApplierFactory for Counting {
        fn generate(
            &self,
            interface: &str,
            converter: Arc<dyn ValueConverter>,
        ) -> AdaptResult<Arc<dyn Applier>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.generate(interface, converter)
        }
    }

    fn counting() -> Arc<Counting> {
        Arc::new(Counting {
            inner: CombinedApplierFactory::standard(node_registry(), EngineConfig::default()),
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_generation_is_idempotent() {
        let inner = counting();
        let cache = Arc::new(CachingApplierFactory::new(inner.clone()));
        let converter: Arc<dyn ValueConverter> = CachedValueConverter::new(cache.clone());

        let first = cache.generate("INode", converter.clone()).unwrap();
        for _ in 0..10 {
            let again = cache.generate("INode", converter.clone()).unwrap();
            assert!(Arc::ptr_eq(&first, &again));
        }
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_first_generation() {
        const THREADS: usize = 8;

        let inner = counting();
        let cache = Arc::new(CachingApplierFactory::new(inner.clone()));
        let converter: Arc<dyn ValueConverter> = CachedValueConverter::new(cache.clone());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let cache = cache.clone();
                let converter = converter.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    cache.generate("INode", converter).unwrap()
                })
            })
            .collect();
        let appliers: Vec<Arc<dyn Applier>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Racing threads may all generate, but every caller gets the kept one
        for applier in &appliers {
            assert!(Arc::ptr_eq(applier, &appliers[0]));
        }
        let calls = inner.calls.load(Ordering::SeqCst);
        assert!((1..=THREADS).contains(&calls));
        assert_eq!(cache.len(), 1);
        assert!(Arc::ptr_eq(
            &cache.generate("INode", converter).unwrap(),
            &appliers[0]
        ));
    }

    #[test]
    fn test_concurrent_adaptation() {
        let nodes = ring();
        let (factory, converter) = standard_stack(node_registry());
        let applier = factory.generate("INode", converter).unwrap();

        let handles: Vec<_> = nodes
            .iter()
            .cloned()
            .map(|n| {
                let applier = applier.clone();
                thread::spawn(move || {
                    let adapted: ObjectRef = applier.apply(Value::object(n)).unwrap();
                    let links = adapted.get("Hierarchy").unwrap();
                    let own = links.as_object().unwrap().get("Self").unwrap();
                    own.as_object().unwrap().get("Name").unwrap()
                })
            })
            .collect();
        let names: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            names,
            vec![Value::from("Node1"), Value::from("Node2"), Value::from("Node3")]
        );
        assert_eq!(factory.len(), 2);
    }

    #[test]
    fn test_adapted_result_passes_through_again() {
        let nodes = ring();
        let (factory, converter) = standard_stack(node_registry());
        let applier = factory.generate("INode", converter).unwrap();
        let adapted = applier.apply(Value::object(nodes[0].clone())).unwrap();
        let again = applier.apply(Value::Object(adapted.clone())).unwrap();
        assert!(same_object(&adapted, &again));
    }
}
