//! Appliers and applier factories
//!
//! An [`Applier`] wraps sources as one fixed interface. An [`ApplierFactory`]
//! produces appliers; generators, the combined selector and the cache are
//! all factories so they stack freely.

use std::marker::PhantomData;
use std::sync::Arc;

use latebind_sdk::{AdaptResult, ObjectRef, Value};

use crate::converter::ValueConverter;

/// Wraps source objects as a specific interface.
pub trait Applier: Send + Sync {
    /// Name of the interface produced by this applier
    fn target(&self) -> &str;

    /// Wrap `source`.
    ///
    /// - `Null` → `InvalidArgument`
    /// - a source the strategy cannot use → `UnsupportedSource`
    fn apply(&self, source: Value) -> AdaptResult<ObjectRef>;
}

/// Produces appliers for interfaces.
pub trait ApplierFactory: Send + Sync {
    /// Generate (or look up) an applier for `interface`, wiring `converter`
    /// into every adapter it produces.
    fn generate(
        &self,
        interface: &str,
        converter: Arc<dyn ValueConverter>,
    ) -> AdaptResult<Arc<dyn Applier>>;
}

// ============================================================================
// Typed facades
// ============================================================================

/// A statically-typed view of an interface.
///
/// Implemented by hand-written wrapper types that carry the interface name
/// and turn an adapter object into typed accessors.
pub trait Facade: Sized {
    /// Interface this facade stands for
    const INTERFACE: &'static str;

    /// Wrap an object known to implement [`Self::INTERFACE`]
    fn from_object(object: ObjectRef) -> Self;
}

/// An applier whose output is a typed facade.
pub struct TypedApplier<F> {
    inner: Arc<dyn Applier>,
    _facade: PhantomData<fn() -> F>,
}

impl<F: Facade> TypedApplier<F> {
    /// Wrap an untyped applier
    pub fn new(inner: Arc<dyn Applier>) -> Self {
        Self {
            inner,
            _facade: PhantomData,
        }
    }

    /// Wrap `source` and return it as the facade type
    pub fn apply(&self, source: impl Into<Value>) -> AdaptResult<F> {
        self.inner.apply(source.into()).map(F::from_object)
    }

    /// The untyped applier
    pub fn untyped(&self) -> &Arc<dyn Applier> {
        &self.inner
    }
}

impl<F> Clone for TypedApplier<F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _facade: PhantomData,
        }
    }
}

/// Typed generation on any factory
pub trait ApplierFactoryExt {
    /// Generate an applier for `F::INTERFACE`
    fn generate_adapter<F: Facade>(
        &self,
        converter: Arc<dyn ValueConverter>,
    ) -> AdaptResult<TypedApplier<F>>;
}

impl<T: ApplierFactory + ?Sized> ApplierFactoryExt for T {
    fn generate_adapter<F: Facade>(
        &self,
        converter: Arc<dyn ValueConverter>,
    ) -> AdaptResult<TypedApplier<F>> {
        self.generate(F::INTERFACE, converter).map(TypedApplier::new)
    }
}
