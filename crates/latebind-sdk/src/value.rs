//! Late-bound values and their static types
//!
//! `Value` is what flows across an adapter boundary: arguments in, results
//! out. `ValueType` is the static type a descriptor declares for a property,
//! parameter or return slot. Type checks are exact: an `I16` never satisfies
//! an `I32` slot and vice versa.

use std::fmt;
use std::sync::Arc;

use crate::error::{AdaptError, AdaptResult};
use crate::object::{Object, ObjectRef};

// ============================================================================
// ValueType
// ============================================================================

/// Static type of a member, parameter or field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// No value (method return only)
    Void,
    /// Boolean
    Bool,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 64-bit float
    F64,
    /// UTF-8 string
    String,
    /// Any object reference
    Object,
    /// Object implementing the named interface
    Interface(String),
}

impl ValueType {
    /// Create an interface type reference
    pub fn interface(name: impl Into<String>) -> Self {
        ValueType::Interface(name.into())
    }

    /// Check if this is the void type
    pub fn is_void(&self) -> bool {
        matches!(self, ValueType::Void)
    }

    /// Reference types accept `Value::Null`
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            ValueType::String | ValueType::Object | ValueType::Interface(_)
        )
    }

    /// Interface name, if this is an interface type
    pub fn interface_name(&self) -> Option<&str> {
        match self {
            ValueType::Interface(name) => Some(name),
            _ => None,
        }
    }

    /// Exact type test (no widening, no narrowing)
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::Void, Value::Null) => true,
            (ty, Value::Null) => ty.is_reference(),
            (ValueType::Bool, Value::Bool(_))
            | (ValueType::I16, Value::I16(_))
            | (ValueType::I32, Value::I32(_))
            | (ValueType::I64, Value::I64(_))
            | (ValueType::F64, Value::F64(_))
            | (ValueType::String, Value::String(_))
            | (ValueType::Object, Value::Object(_)) => true,
            (ValueType::Interface(name), Value::Object(obj)) => obj
                .as_implementation()
                .is_some_and(|imp| imp.implements(name)),
            _ => false,
        }
    }

    /// Like [`accepts`](Self::accepts), but raises `TypeMismatch`
    pub fn check(&self, value: &Value) -> AdaptResult<()> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(AdaptError::type_mismatch(self, value.type_name()))
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Void => write!(f, "void"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::I16 => write!(f, "i16"),
            ValueType::I32 => write!(f, "i32"),
            ValueType::I64 => write!(f, "i64"),
            ValueType::F64 => write!(f, "f64"),
            ValueType::String => write!(f, "string"),
            ValueType::Object => write!(f, "object"),
            ValueType::Interface(name) => write!(f, "{}", name),
        }
    }
}

// ============================================================================
// Value
// ============================================================================

/// A late-bound value.
///
/// Objects are shared (`Arc`); everything else is stored inline.
#[derive(Clone, Default)]
pub enum Value {
    /// Null / empty / void result
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// 16-bit signed integer
    I16(i16),
    /// 32-bit signed integer
    I32(i32),
    /// 64-bit signed integer
    I64(i64),
    /// 64-bit float
    F64(f64),
    /// UTF-8 string
    String(String),
    /// Object reference
    Object(ObjectRef),
}

impl Value {
    /// Wrap any concrete object
    pub fn object<T: Object + 'static>(obj: Arc<T>) -> Self {
        Value::Object(obj)
    }

    /// Check if this is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool if this is a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i16 if this is an i16
    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Value::I16(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as i32 if this is an i32
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as i64 if this is an i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is an f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string slice if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as object reference if this is an object
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Runtime type name, used in diagnostics
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F64(_) => "f64",
            Value::String(_) => "string",
            Value::Object(obj) => obj.type_name(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => crate::object::same_object(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Value::Null"),
            Value::Bool(b) => write!(f, "Value::Bool({})", b),
            Value::I16(i) => write!(f, "Value::I16({})", i),
            Value::I32(i) => write!(f, "Value::I32({})", i),
            Value::I64(i) => write!(f, "Value::I64({})", i),
            Value::F64(x) => write!(f, "Value::F64({})", x),
            Value::String(s) => write!(f, "Value::String({:?})", s),
            Value::Object(obj) => write!(f, "Value::Object({})", obj.type_name()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I16(i) => write!(f, "{}", i),
            Value::I32(i) => write!(f, "{}", i),
            Value::I64(i) => write!(f, "{}", i),
            Value::F64(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            Value::Object(obj) => write!(f, "[object {}]", obj.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i16> for Value {
    fn from(i: i16) -> Self {
        Value::I16(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::I32(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::I64(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::F64(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

// ============================================================================
// IndexKey
// ============================================================================

/// Hashable identity of an index value.
///
/// Keys are typed: `I32(1)` and `String("1")` are different positions.
/// Floats compare by bit pattern, objects by pointer identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    /// Null index
    Null,
    /// Boolean index
    Bool(bool),
    /// 16-bit index
    I16(i16),
    /// 32-bit index
    I32(i32),
    /// 64-bit index
    I64(i64),
    /// Float index (bit pattern)
    F64(u64),
    /// String index
    String(String),
    /// Object index (address of the shared object)
    Object(usize),
}

impl IndexKey {
    /// Keys for a whole index tuple, in order
    pub fn tuple(indices: &[Value]) -> Vec<IndexKey> {
        indices.iter().map(IndexKey::from).collect()
    }
}

impl From<&Value> for IndexKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => IndexKey::Null,
            Value::Bool(b) => IndexKey::Bool(*b),
            Value::I16(i) => IndexKey::I16(*i),
            Value::I32(i) => IndexKey::I32(*i),
            Value::I64(i) => IndexKey::I64(*i),
            Value::F64(x) => IndexKey::F64(x.to_bits()),
            Value::String(s) => IndexKey::String(s.clone()),
            Value::Object(obj) => IndexKey::Object(Arc::as_ptr(obj) as *const () as usize),
        }
    }
}
