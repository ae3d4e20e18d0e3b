//! latebind SDK - values, descriptors and object capabilities
//!
//! This crate holds everything a host needs to *describe* interfaces and to
//! *offer* objects for adaptation, without depending on the adapter engine.
//!
//! - [`Value`] / [`ValueType`]: late-bound values and exact static types
//! - [`TypeDescriptor`] / [`TypeRegistry`]: interface descriptors
//! - [`Object`] and its facets [`Implementation`], [`Reflect`], [`Dispatch`]
//! - [`Record`] (plain object) and [`Expando`] (automation object)
//! - [`AdaptError`] / [`AdaptResult`]: the error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use latebind_sdk::{PropertyInfo, TypeDescriptor, TypeRegistry, ValueType};
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     TypeDescriptor::interface("INamed")
//!         .property(PropertyInfo::read_only("Name", ValueType::String)),
//! )?;
//! ```

#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod expando;
pub mod object;
pub mod record;
pub mod types;
pub mod value;

pub use convert::FromValue;
pub use error::{AdaptError, AdaptResult};
pub use expando::{Expando, ExpandoMethod};
pub use object::{same_object, Dispatch, Implementation, Object, ObjectExt, ObjectRef, Reflect};
pub use record::{Record, RecordBuilder, RecordMethod};
pub use types::{
    ClassShape, ClassShapeBuilder, FieldShape, Member, MethodInfo, MethodShape, ParamMode,
    ParameterInfo, PropertyInfo, TypeDescriptor, TypeKind, TypeRegistry, Visibility,
};
pub use value::{IndexKey, Value, ValueType};
