//! Value conversion at the adapter boundary
//!
//! Every value an adapter returns passes through a [`ValueConverter`] before
//! it reaches the caller. The converter sees the interface member the value
//! came from, so it knows what type the caller expects.

use std::sync::{Arc, Weak};

use latebind_sdk::{AdaptError, AdaptResult, Member, ObjectExt, Value};

use crate::applier::ApplierFactory;

/// Converts raw member results into the member's declared type.
pub trait ValueConverter: Send + Sync {
    /// Convert `value`, produced by `member`
    fn convert(&self, member: &Member, value: Value) -> AdaptResult<Value>;
}

/// Returns every value unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughConverter;

impl ValueConverter for PassthroughConverter {
    fn convert(&self, _member: &Member, value: Value) -> AdaptResult<Value> {
        Ok(value)
    }
}

/// Wraps interface-typed results with appliers from a factory.
///
/// A member declared as interface `I` whose raw result is an object that
/// does not already implement `I` gets adapted to `I` on the spot. The
/// converter hands itself to the factory, so nested adapters convert their
/// own results the same way. Cyclic object graphs stay navigable because
/// nothing is wrapped until it is read.
pub struct CachedValueConverter {
    factory: Arc<dyn ApplierFactory>,
    this: Weak<CachedValueConverter>,
}

impl CachedValueConverter {
    /// Create a converter drawing appliers from `factory`
    pub fn new(factory: Arc<dyn ApplierFactory>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            factory,
            this: this.clone(),
        })
    }

    /// The factory appliers are drawn from
    pub fn factory(&self) -> &Arc<dyn ApplierFactory> {
        &self.factory
    }

    fn shared(&self) -> AdaptResult<Arc<dyn ValueConverter>> {
        let this: Arc<dyn ValueConverter> = self
            .this
            .upgrade()
            .ok_or_else(|| AdaptError::Invocation("value converter was dropped".to_string()))?;
        Ok(this)
    }
}

impl ValueConverter for CachedValueConverter {
    fn convert(&self, member: &Member, value: Value) -> AdaptResult<Value> {
        let Some(interface) = member.value_type().interface_name() else {
            return Ok(value);
        };
        let Some(object) = value.as_object() else {
            return Ok(value);
        };
        if object.implements(interface) {
            return Ok(value);
        }

        tracing::trace!(
            member = member.name(),
            interface,
            source = object.type_name(),
            "adapting member result"
        );
        let applier = self.factory.generate(interface, self.shared()?)?;
        applier.apply(value).map(Value::Object)
    }
}
