//! Proxy generators
//!
//! A generator turns an interface name into an [`Applier`] by asking a
//! [`ProxyStrategy`] for one forwarding thunk per member of the flattened
//! interface. Two strategies exist:
//!
//! - [`ReflectionStrategy`]: forwards to same-named members of a plain
//!   object's declared shape
//! - [`DispatchStrategy`]: forwards by name through the automation facet

mod dispatch;
mod reflection;

pub use dispatch::DispatchStrategy;
pub use reflection::ReflectionStrategy;

use std::sync::Arc;

use latebind_sdk::{
    AdaptError, AdaptResult, Member, MethodInfo, Object, ObjectRef, PropertyInfo, TypeRegistry,
    Value,
};

use crate::applier::{Applier, ApplierFactory};
use crate::config::EngineConfig;
use crate::converter::ValueConverter;
use crate::hierarchy::FlatInterface;
use crate::template::{AdapterTemplate, Getter, Invoker, MethodSlot, PropertySlot, Setter};

/// How generated adapters reach the wrapped source.
pub trait ProxyStrategy: Send + Sync + 'static {
    /// Strategy name, for diagnostics
    fn name(&self) -> &'static str;

    /// Reject sources this strategy cannot forward to
    fn check_source(&self, _source: &dyn Object) -> AdaptResult<()> {
        Ok(())
    }

    /// Thunk reading `property`
    fn getter(&self, property: &PropertyInfo) -> Getter;

    /// Thunk writing `property`
    fn setter(&self, property: &PropertyInfo) -> Setter;

    /// Thunk calling `method`
    fn invoker(&self, method: &MethodInfo) -> Invoker;
}

/// Builds adapter templates with one strategy.
pub struct ProxyGenerator<S> {
    registry: Arc<TypeRegistry>,
    config: EngineConfig,
    strategy: Arc<S>,
}

/// Generator forwarding to plain objects by declared shape
pub type ReflectionProxyGenerator = ProxyGenerator<ReflectionStrategy>;

/// Generator forwarding to automation objects by name
pub type DispatchProxyGenerator = ProxyGenerator<DispatchStrategy>;

impl ProxyGenerator<ReflectionStrategy> {
    /// Create a reflection generator
    pub fn reflection(registry: Arc<TypeRegistry>, config: EngineConfig) -> Self {
        Self::new(registry, config, ReflectionStrategy)
    }
}

impl ProxyGenerator<DispatchStrategy> {
    /// Create a dispatch generator
    pub fn dispatch(registry: Arc<TypeRegistry>, config: EngineConfig) -> Self {
        Self::new(registry, config, DispatchStrategy)
    }
}

impl<S: ProxyStrategy> ProxyGenerator<S> {
    /// Create a generator with an explicit strategy
    pub fn new(registry: Arc<TypeRegistry>, config: EngineConfig, strategy: S) -> Self {
        Self {
            registry,
            config,
            strategy: Arc::new(strategy),
        }
    }

    /// Build the template for `interface` without wrapping it in an applier.
    pub fn template(&self, interface: &str) -> AdaptResult<Arc<AdapterTemplate>> {
        let flat = FlatInterface::prepare(&self.registry, interface)?;

        let mut properties = Vec::new();
        let mut methods = Vec::new();
        for member in flat.members() {
            match member {
                Member::Property(p) => {
                    let getter = p.can_read.then(|| self.strategy.getter(p));
                    let setter = p.can_write.then(|| self.strategy.setter(p));
                    properties.push(PropertySlot::new(p.clone(), getter, setter));
                }
                Member::Method(m) => {
                    methods.push(MethodSlot::new(m.clone(), self.strategy.invoker(m)));
                }
            }
        }

        let template = AdapterTemplate::new(
            flat,
            &self.config.adapters.module_name,
            self.strategy.name(),
            properties,
            methods,
            self.config.adapters.expose_dispatch,
        );
        tracing::debug!(
            interface,
            strategy = self.strategy.name(),
            type_name = template.type_name(),
            "generated adapter template"
        );
        Ok(Arc::new(template))
    }
}

impl<S: ProxyStrategy> ApplierFactory for ProxyGenerator<S> {
    fn generate(
        &self,
        interface: &str,
        converter: Arc<dyn ValueConverter>,
    ) -> AdaptResult<Arc<dyn Applier>> {
        let template = self.template(interface)?;
        let strategy: Arc<dyn ProxyStrategy> = self.strategy.clone();
        Ok(Arc::new(TemplateApplier {
            template,
            converter,
            strategy,
        }))
    }
}

/// Applier instantiating one template.
pub struct TemplateApplier {
    template: Arc<AdapterTemplate>,
    converter: Arc<dyn ValueConverter>,
    strategy: Arc<dyn ProxyStrategy>,
}

impl TemplateApplier {
    /// The template this applier instantiates
    pub fn template(&self) -> &Arc<AdapterTemplate> {
        &self.template
    }
}

impl Applier for TemplateApplier {
    fn target(&self) -> &str {
        self.template.interface().name()
    }

    fn apply(&self, source: Value) -> AdaptResult<ObjectRef> {
        let source = source_object(source)?;
        self.strategy.check_source(source.as_ref())?;
        Ok(self.template.instantiate(source, self.converter.clone()))
    }
}

/// Unwrap an object source (`Null` → `InvalidArgument`, other values →
/// `UnsupportedSource`)
pub(crate) fn source_object(source: Value) -> AdaptResult<ObjectRef> {
    match source {
        Value::Object(obj) => Ok(obj),
        Value::Null => Err(AdaptError::InvalidArgument(
            "source must not be null".to_string(),
        )),
        other => Err(AdaptError::unsupported(
            other.type_name(),
            "only objects can be adapted",
        )),
    }
}
