//! Strict conversion from `Value` into Rust types.
//!
//! Used by typed facades to turn an adapter's results into plain Rust
//! values. Conversions never widen or narrow: an `i16` value does not
//! convert to `i32`.
//!
//! # Example
//!
//! ```ignore
//! use latebind_sdk::{FromValue, ObjectExt, ObjectRef, AdaptResult};
//!
//! struct Named(ObjectRef);
//!
//! impl Named {
//!     fn name(&self) -> AdaptResult<String> {
//!         String::from_value(self.0.get("Name")?)
//!     }
//! }
//! ```

use crate::error::{AdaptError, AdaptResult};
use crate::object::ObjectRef;
use crate::value::Value;

/// Convert from `Value` to a Rust type, failing with `TypeMismatch`.
pub trait FromValue: Sized {
    /// Convert, returning an error if the type doesn't match exactly
    fn from_value(value: Value) -> AdaptResult<Self>;
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> AdaptResult<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(AdaptError::type_mismatch($name, other.type_name())),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(i16, I16, "i16");
impl_from_value!(i32, I32, "i32");
impl_from_value!(i64, I64, "i64");
impl_from_value!(f64, F64, "f64");
impl_from_value!(String, String, "string");
impl_from_value!(ObjectRef, Object, "object");

impl FromValue for Value {
    fn from_value(value: Value) -> AdaptResult<Self> {
        Ok(value)
    }
}

impl FromValue for () {
    fn from_value(value: Value) -> AdaptResult<Self> {
        match value {
            Value::Null => Ok(()),
            other => Err(AdaptError::type_mismatch("void", other.type_name())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> AdaptResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
