//! Strategy selection per source object
//!
//! The combined factory hands out appliers that look at each source before
//! wrapping it:
//!
//! 1. already implements the interface → returned unchanged (same object)
//! 2. exposes automation dispatch → dispatch delegate
//! 3. anything else → reflection delegate
//!
//! Delegates are generated on first need only, so an interface used purely
//! with automation objects never builds a reflection template.

use std::sync::Arc;

use latebind_sdk::{AdaptResult, ObjectExt, ObjectRef, TypeRegistry, Value};
use once_cell::sync::OnceCell;

use crate::applier::{Applier, ApplierFactory};
use crate::config::EngineConfig;
use crate::converter::ValueConverter;
use crate::hierarchy::FlatInterface;
use crate::proxy::{source_object, DispatchProxyGenerator, ReflectionProxyGenerator};

/// Factory selecting a strategy per source.
pub struct CombinedApplierFactory {
    registry: Arc<TypeRegistry>,
    reflection: Arc<dyn ApplierFactory>,
    dispatch: Arc<dyn ApplierFactory>,
}

impl CombinedApplierFactory {
    /// Combine two delegate factories
    pub fn new(
        registry: Arc<TypeRegistry>,
        reflection: Arc<dyn ApplierFactory>,
        dispatch: Arc<dyn ApplierFactory>,
    ) -> Self {
        Self {
            registry,
            reflection,
            dispatch,
        }
    }

    /// Reflection plus dispatch generators over one registry
    pub fn standard(registry: Arc<TypeRegistry>, config: EngineConfig) -> Self {
        let reflection = Arc::new(ReflectionProxyGenerator::reflection(
            registry.clone(),
            config.clone(),
        ));
        let dispatch = Arc::new(DispatchProxyGenerator::dispatch(registry.clone(), config));
        Self::new(registry, reflection, dispatch)
    }
}

impl ApplierFactory for CombinedApplierFactory {
    fn generate(
        &self,
        interface: &str,
        converter: Arc<dyn ValueConverter>,
    ) -> AdaptResult<Arc<dyn Applier>> {
        // Shape and visibility errors surface here rather than on first use.
        let flat = FlatInterface::prepare(&self.registry, interface)?;
        Ok(Arc::new(CombinedApplier {
            interface: flat.name().to_string(),
            converter,
            reflection: Delegate::new(self.reflection.clone()),
            dispatch: Delegate::new(self.dispatch.clone()),
        }))
    }
}

/// A delegate applier generated on first use.
///
/// The outcome is kept either way: a failed generation is re-raised on every
/// later use without asking the factory again.
struct Delegate {
    factory: Arc<dyn ApplierFactory>,
    cell: OnceCell<AdaptResult<Arc<dyn Applier>>>,
}

impl Delegate {
    fn new(factory: Arc<dyn ApplierFactory>) -> Self {
        Self {
            factory,
            cell: OnceCell::new(),
        }
    }

    fn get(&self, interface: &str, converter: &Arc<dyn ValueConverter>) -> AdaptResult<&Arc<dyn Applier>> {
        self.cell
            .get_or_init(|| self.factory.generate(interface, converter.clone()))
            .as_ref()
            .map_err(Clone::clone)
    }
}

/// Applier produced by [`CombinedApplierFactory`].
pub struct CombinedApplier {
    interface: String,
    converter: Arc<dyn ValueConverter>,
    reflection: Delegate,
    dispatch: Delegate,
}

impl Applier for CombinedApplier {
    fn target(&self) -> &str {
        &self.interface
    }

    fn apply(&self, source: Value) -> AdaptResult<ObjectRef> {
        let object = source_object(source)?;

        if object.implements(&self.interface) {
            tracing::trace!(interface = %self.interface, "source implements interface, passing through");
            return Ok(object);
        }

        let (strategy, delegate) = if object.as_dispatch().is_some() {
            ("dispatch", &self.dispatch)
        } else {
            ("reflection", &self.reflection)
        };
        tracing::trace!(interface = %self.interface, strategy, "selected delegate");
        delegate
            .get(&self.interface, &self.converter)?
            .apply(Value::Object(object))
    }
}
