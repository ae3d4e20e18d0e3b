//! Expando: an automation object
//!
//! A property bag plus named method closures, reachable only by name through
//! the [`Dispatch`] facet. It has no declared shape and no static types:
//! whatever is stored under a name is returned as-is, which is exactly the
//! contract of a script-backed automation component.
//!
//! Indexed properties live apart from plain ones, keyed by name plus the
//! typed index tuple, so `Cell` at `[2]` never aliases a property literally
//! named `Cell[2]`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{AdaptError, AdaptResult};
use crate::object::{Dispatch, Object};
use crate::value::{IndexKey, Value};

/// Method body of an expando
pub type ExpandoMethod = Arc<dyn Fn(&Expando, &[Value]) -> AdaptResult<Value> + Send + Sync>;

/// Late-bound automation object.
pub struct Expando {
    type_name: String,
    properties: RwLock<HashMap<String, Value>>,
    indexed: RwLock<HashMap<(String, Vec<IndexKey>), Value>>,
    methods: HashMap<String, ExpandoMethod>,
}

impl Expando {
    /// Create an empty expando
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: RwLock::new(HashMap::new()),
            indexed: RwLock::new(HashMap::new()),
            methods: HashMap::new(),
        }
    }

    /// Add an initial property value
    pub fn with_property(self, name: &str, value: impl Into<Value>) -> Self {
        self.properties.write().insert(name.to_string(), value.into());
        self
    }

    /// Add a method
    pub fn with_method<F>(mut self, name: &str, body: F) -> Self
    where
        F: Fn(&Expando, &[Value]) -> AdaptResult<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.to_string(), Arc::new(body));
        self
    }

    /// Finish building
    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Read a stored property (host side)
    pub fn property(&self, name: &str) -> Option<Value> {
        self.properties.read().get(name).cloned()
    }

    /// Read a stored indexed property (host side)
    pub fn indexed_property(&self, name: &str, indices: &[Value]) -> Option<Value> {
        self.indexed
            .read()
            .get(&(name.to_string(), IndexKey::tuple(indices)))
            .cloned()
    }
}

fn describe_indexed(name: &str, indices: &[Value]) -> String {
    let parts: Vec<String> = indices.iter().map(|v| format!("{:?}", v)).collect();
    format!("{}[{}]", name, parts.join(", "))
}

impl Object for Expando {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn as_dispatch(&self) -> Option<&dyn Dispatch> {
        Some(self)
    }
}

impl Dispatch for Expando {
    fn get_property(&self, name: &str, indices: &[Value]) -> AdaptResult<Value> {
        let found = if indices.is_empty() {
            self.property(name)
        } else {
            self.indexed_property(name, indices)
        };
        found.ok_or_else(|| {
            let member = if indices.is_empty() {
                name.to_string()
            } else {
                describe_indexed(name, indices)
            };
            AdaptError::member_not_found(&self.type_name, member)
        })
    }

    fn set_property(&self, name: &str, value: Value, indices: &[Value]) -> AdaptResult<()> {
        if indices.is_empty() {
            self.properties.write().insert(name.to_string(), value);
        } else {
            self.indexed
                .write()
                .insert((name.to_string(), IndexKey::tuple(indices)), value);
        }
        Ok(())
    }

    fn call_method(&self, name: &str, args: &[Value]) -> AdaptResult<Value> {
        let body = self
            .methods
            .get(name)
            .ok_or_else(|| AdaptError::member_not_found(&self.type_name, name))?;
        body(self, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_by_name() {
        let obj = Expando::new("Control").with_property("Version", 2i16).build();
        assert_eq!(obj.get_property("Version", &[]).unwrap(), Value::I16(2));
        obj.set_property("Version", Value::I16(3), &[]).unwrap();
        assert_eq!(obj.property("Version"), Some(Value::I16(3)));
    }

    #[test]
    fn test_unknown_name_fails() {
        let obj = Expando::new("Control").build();
        assert!(matches!(
            obj.get_property("Missing", &[]),
            Err(AdaptError::MemberNotFound { .. })
        ));
        assert!(matches!(
            obj.call_method("Missing", &[]),
            Err(AdaptError::MemberNotFound { .. })
        ));
    }

    #[test]
    fn test_indexed_properties_are_positional() {
        let obj = Expando::new("Grid").build();
        obj.set_property("Cell", Value::from("x"), &[Value::I32(1), Value::I32(2)])
            .unwrap();
        assert_eq!(
            obj.get_property("Cell", &[Value::I32(1), Value::I32(2)]).unwrap(),
            Value::from("x")
        );
        assert!(obj.get_property("Cell", &[Value::I32(2), Value::I32(1)]).is_err());
        assert_eq!(
            obj.indexed_property("Cell", &[Value::I32(1), Value::I32(2)]),
            Some(Value::from("x"))
        );
        assert_eq!(obj.property("Cell"), None);
    }

    #[test]
    fn test_indexed_keys_do_not_alias() {
        let obj = Expando::new("Grid").build();
        obj.set_property("Cell", Value::I32(7), &[Value::from("1")]).unwrap();
        obj.set_property("Cell[2]", Value::I32(9), &[]).unwrap();

        assert!(matches!(
            obj.get_property("Cell", &[Value::I32(1)]),
            Err(AdaptError::MemberNotFound { .. })
        ));
        assert!(matches!(
            obj.get_property("Cell", &[Value::I32(2)]),
            Err(AdaptError::MemberNotFound { .. })
        ));
        assert_eq!(obj.get_property("Cell", &[Value::from("1")]).unwrap(), Value::I32(7));
        assert_eq!(obj.get_property("Cell[2]", &[]).unwrap(), Value::I32(9));
    }

    #[test]
    fn test_methods_see_self() {
        let obj = Expando::new("Counter")
            .with_property("Count", 1i32)
            .with_method("Next", |this, _args| {
                let next = this.property("Count").and_then(|v| v.as_i32()).unwrap_or(0) + 1;
                this.set_property("Count", Value::I32(next), &[])?;
                Ok(Value::I32(next))
            })
            .build();
        assert_eq!(obj.call_method("Next", &[]).unwrap(), Value::I32(2));
        assert_eq!(obj.call_method("Next", &[]).unwrap(), Value::I32(3));
    }
}
