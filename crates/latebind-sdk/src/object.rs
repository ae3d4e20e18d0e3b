//! Object capabilities: the contract a wrapped source can offer
//!
//! A source is any `Arc<dyn Object>`. It advertises up to three facets and
//! the adaptation engine picks a strategy from whichever are present:
//!
//! | Facet            | Meaning                                        | Strategy     |
//! |------------------|------------------------------------------------|--------------|
//! | `Implementation` | Already implements an interface directly       | pass-through |
//! | `Dispatch`       | Automation object: name-based get/set/call     | dispatch     |
//! | `Reflect`        | Plain object with a declared `ClassShape`      | reflection   |
//!
//! Adapters themselves are `Implementation`s, which is what lets a value
//! that has already been adapted pass straight through a second time.

use std::sync::Arc;

use crate::error::{AdaptError, AdaptResult};
use crate::types::ClassShape;
use crate::value::Value;

/// Shared handle to a late-bound object
pub type ObjectRef = Arc<dyn Object>;

/// Root trait for every value that can be wrapped or returned as an object.
pub trait Object: Send + Sync {
    /// Type name used in diagnostics
    fn type_name(&self) -> &str;

    /// Direct interface implementation, if any
    fn as_implementation(&self) -> Option<&dyn Implementation> {
        None
    }

    /// Declared-shape access for the reflection strategy, if any
    fn as_reflect(&self) -> Option<&dyn Reflect> {
        None
    }

    /// Name-based automation access, if any
    fn as_dispatch(&self) -> Option<&dyn Dispatch> {
        None
    }
}

/// An object that implements one or more interfaces itself.
pub trait Implementation: Send + Sync {
    /// Does this object satisfy the named interface?
    fn implements(&self, interface: &str) -> bool;

    /// Read a property
    fn get(&self, name: &str, indices: &[Value]) -> AdaptResult<Value>;

    /// Write a property
    fn set(&self, name: &str, value: Value, indices: &[Value]) -> AdaptResult<()>;

    /// Call a method
    fn call(&self, name: &str, args: &[Value]) -> AdaptResult<Value>;
}

/// Access to an object's own declared members, addressed by slot.
///
/// Slots index into [`ClassShape::fields`] and [`ClassShape::methods`].
pub trait Reflect: Send + Sync {
    /// The declared shape of this object
    fn shape(&self) -> &ClassShape;

    /// Read a field slot
    fn read(&self, slot: usize, indices: &[Value]) -> AdaptResult<Value>;

    /// Write a field slot
    fn write(&self, slot: usize, value: Value, indices: &[Value]) -> AdaptResult<()>;

    /// Invoke a method slot
    fn invoke(&self, slot: usize, args: &[Value]) -> AdaptResult<Value>;
}

/// Narrow automation-invocation capability: everything by name.
pub trait Dispatch: Send + Sync {
    /// Read a (possibly indexed) property by name
    fn get_property(&self, name: &str, indices: &[Value]) -> AdaptResult<Value>;

    /// Write a (possibly indexed) property by name
    fn set_property(&self, name: &str, value: Value, indices: &[Value]) -> AdaptResult<()>;

    /// Call a method by name
    fn call_method(&self, name: &str, args: &[Value]) -> AdaptResult<Value>;
}

/// Reference identity for objects (ignores vtable pointers).
pub fn same_object(a: &ObjectRef, b: &ObjectRef) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Caller-side conveniences for driving an object through its
/// `Implementation` facet (usually an adapter).
pub trait ObjectExt {
    /// Does this object implement the named interface directly?
    fn implements(&self, interface: &str) -> bool;

    /// Read a property
    fn get(&self, name: &str) -> AdaptResult<Value>;

    /// Read an indexed property
    fn get_indexed(&self, name: &str, indices: &[Value]) -> AdaptResult<Value>;

    /// Write a property
    fn set(&self, name: &str, value: impl Into<Value>) -> AdaptResult<()>;

    /// Call a method
    fn call(&self, name: &str, args: &[Value]) -> AdaptResult<Value>;
}

impl ObjectExt for dyn Object {
    fn implements(&self, interface: &str) -> bool {
        self.as_implementation()
            .is_some_and(|imp| imp.implements(interface))
    }

    fn get(&self, name: &str) -> AdaptResult<Value> {
        self.get_indexed(name, &[])
    }

    fn get_indexed(&self, name: &str, indices: &[Value]) -> AdaptResult<Value> {
        implementation_of(self)?.get(name, indices)
    }

    fn set(&self, name: &str, value: impl Into<Value>) -> AdaptResult<()> {
        implementation_of(self)?.set(name, value.into(), &[])
    }

    fn call(&self, name: &str, args: &[Value]) -> AdaptResult<Value> {
        implementation_of(self)?.call(name, args)
    }
}

fn implementation_of(obj: &dyn Object) -> AdaptResult<&dyn Implementation> {
    obj.as_implementation().ok_or_else(|| {
        AdaptError::unsupported(obj.type_name(), "does not implement any interface directly")
    })
}
