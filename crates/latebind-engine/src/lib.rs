//! latebind engine - adapter generation
//!
//! Turns interface descriptors into appliers that wrap arbitrary objects as
//! implementations of those interfaces.
//!
//! # Architecture
//!
//! ```text
//! CachingApplierFactory          one applier per interface name
//!   └── CombinedApplierFactory   pick a strategy per source object
//!         ├── ReflectionProxyGenerator   plain objects, by declared shape
//!         └── DispatchProxyGenerator     automation objects, by name
//! ```
//!
//! Every generator flattens the interface hierarchy ([`hierarchy`]), builds
//! an [`AdapterTemplate`] of forwarding thunks ([`template`]) and hands out
//! adapters that push every result through a [`ValueConverter`]. The
//! [`CachedValueConverter`] closes the loop: interface-typed results are
//! adapted with appliers from the same factory stack.
//!
//! # Example
//!
//! ```ignore
//! let registry = Arc::new(registry);
//! let factory: Arc<dyn ApplierFactory> =
//!     Arc::new(CachingApplierFactory::standard(registry, EngineConfig::default()));
//! let converter = CachedValueConverter::new(factory.clone());
//! let applier = factory.generate("IControl", converter)?;
//! let control = applier.apply(Value::object(component))?;
//! control.call("Init", &[Value::object(app)])?;
//! ```

pub mod applier;
pub mod caching;
pub mod combined;
pub mod config;
pub mod converter;
pub mod hierarchy;
pub mod proxy;
pub mod template;

pub use applier::{Applier, ApplierFactory, ApplierFactoryExt, Facade, TypedApplier};
pub use caching::CachingApplierFactory;
pub use combined::{CombinedApplier, CombinedApplierFactory};
pub use config::{AdapterConfig, ConfigError, EngineConfig};
pub use converter::{CachedValueConverter, PassthroughConverter, ValueConverter};
pub use hierarchy::{flatten, FlatInterface, InterfaceHierarchy};
pub use proxy::{
    DispatchProxyGenerator, DispatchStrategy, ProxyGenerator, ProxyStrategy,
    ReflectionProxyGenerator, ReflectionStrategy, TemplateApplier,
};
pub use template::{Adapter, AdapterTemplate};
