//! Applier cache
//!
//! Generation is expensive and an interface name always maps to the same
//! adapter surface, so appliers are cached per interface name. The lock is
//! never held while generating: two threads racing on a cold name may both
//! build an applier, but only the first stored one is kept and both callers
//! get that one.
//!
//! The cache is keyed by interface name alone. Whichever converter
//! accompanies the first successful request is the one wired into the
//! cached applier.

use std::sync::Arc;

use latebind_sdk::{AdaptResult, TypeRegistry};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::applier::{Applier, ApplierFactory};
use crate::combined::CombinedApplierFactory;
use crate::config::EngineConfig;
use crate::converter::ValueConverter;

/// Memoizing wrapper around another factory.
pub struct CachingApplierFactory {
    inner: Arc<dyn ApplierFactory>,
    cache: Mutex<FxHashMap<String, Arc<dyn Applier>>>,
}

impl CachingApplierFactory {
    /// Cache appliers produced by `inner`
    pub fn new(inner: Arc<dyn ApplierFactory>) -> Self {
        Self {
            inner,
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    /// The usual stack: a cache over [`CombinedApplierFactory::standard`]
    pub fn standard(registry: Arc<TypeRegistry>, config: EngineConfig) -> Self {
        Self::new(Arc::new(CombinedApplierFactory::standard(registry, config)))
    }

    /// Number of cached appliers
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Is the cache empty?
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Is there a cached applier for `interface`?
    pub fn contains(&self, interface: &str) -> bool {
        self.cache.lock().contains_key(interface)
    }
}

impl ApplierFactory for CachingApplierFactory {
    fn generate(
        &self,
        interface: &str,
        converter: Arc<dyn ValueConverter>,
    ) -> AdaptResult<Arc<dyn Applier>> {
        if let Some(hit) = self.cache.lock().get(interface) {
            return Ok(hit.clone());
        }

        // Generate outside the lock; failures are not cached.
        let fresh = self.inner.generate(interface, converter)?;

        let mut cache = self.cache.lock();
        let kept = cache
            .entry(interface.to_string())
            .or_insert_with(|| fresh.clone())
            .clone();
        if Arc::as_ptr(&kept) as *const () != Arc::as_ptr(&fresh) as *const () {
            tracing::debug!(interface, "lost applier generation race, using cached applier");
        } else {
            tracing::debug!(interface, cached = cache.len(), "cached applier");
        }
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::PassthroughConverter;
    use latebind_sdk::{AdaptError, ObjectRef, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(&'static str);

    impl Applier for Fixed {
        fn target(&self) -> &str {
            self.0
        }

        fn apply(&self, _source: Value) -> AdaptResult<ObjectRef> {
            Err(AdaptError::Invocation("not used".to_string()))
        }
    }

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl ApplierFactory for Counting {
        fn generate(
            &self,
            interface: &str,
            _converter: Arc<dyn ValueConverter>,
        ) -> AdaptResult<Arc<dyn Applier>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match interface {
                "IGood" => Ok(Arc::new(Fixed("IGood"))),
                "IOther" => Ok(Arc::new(Fixed("IOther"))),
                _ => Err(AdaptError::InvalidArgument(interface.to_string())),
            }
        }
    }

    #[test]
    fn test_same_applier_for_same_name() {
        let inner = Arc::new(Counting::default());
        let cache = CachingApplierFactory::new(inner.clone());
        let a = cache.generate("IGood", Arc::new(PassthroughConverter)).unwrap();
        let b = cache.generate("IGood", Arc::new(PassthroughConverter)).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("IGood"));
    }

    #[test]
    fn test_distinct_names_distinct_entries() {
        let cache = CachingApplierFactory::new(Arc::new(Counting::default()));
        let a = cache.generate("IGood", Arc::new(PassthroughConverter)).unwrap();
        let b = cache.generate("IOther", Arc::new(PassthroughConverter)).unwrap();
        assert_eq!(a.target(), "IGood");
        assert_eq!(b.target(), "IOther");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let inner = Arc::new(Counting::default());
        let cache = CachingApplierFactory::new(inner.clone());
        assert!(cache.generate("IBad", Arc::new(PassthroughConverter)).is_err());
        assert!(cache.generate("IBad", Arc::new(PassthroughConverter)).is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }
}
