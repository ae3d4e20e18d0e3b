//! Record: a plain object with a declared shape
//!
//! The simplest source for the reflection strategy: typed fields plus named
//! methods backed by closures. Records know nothing about interfaces; an
//! adapter finds their members by name through the [`Reflect`] facet.
//!
//! ```ignore
//! let person = Record::builder("Person")
//!     .readonly_field("Name", ValueType::String, "Ada")
//!     .field("Age", ValueType::I32, 36)
//!     .method("Greet", vec![ValueType::String], ValueType::String, |this, args| {
//!         Ok(Value::from(format!("{}, {}", args[0], this.get_field("Name").unwrap_or_default())))
//!     })
//!     .build()?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{AdaptError, AdaptResult};
use crate::object::{Object, Reflect};
use crate::types::{ClassShape, ClassShapeBuilder, FieldShape};
use crate::value::{IndexKey, Value, ValueType};

/// Method body of a record
pub type RecordMethod = Arc<dyn Fn(&Record, &[Value]) -> AdaptResult<Value> + Send + Sync>;

/// Builder for [`Record`]
pub struct RecordBuilder {
    shape: ClassShapeBuilder,
    values: Vec<Value>,
    methods: Vec<RecordMethod>,
}

impl RecordBuilder {
    /// Add a read-write field with an initial value
    pub fn field(mut self, name: &str, ty: ValueType, initial: impl Into<Value>) -> Self {
        self.shape = self.shape.field(name, ty);
        self.values.push(initial.into());
        self
    }

    /// Add a read-only field with an initial value
    pub fn readonly_field(mut self, name: &str, ty: ValueType, initial: impl Into<Value>) -> Self {
        self.shape = self.shape.readonly_field(name, ty);
        self.values.push(initial.into());
        self
    }

    /// Add an indexed, read-write field. Unset positions read as `Null`.
    pub fn indexed_field(mut self, name: &str, ty: ValueType, index_params: Vec<ValueType>) -> Self {
        self.shape = self.shape.indexed_field(name, ty, index_params);
        self.values.push(Value::Null);
        self
    }

    /// Add a method
    pub fn method<F>(mut self, name: &str, params: Vec<ValueType>, return_type: ValueType, body: F) -> Self
    where
        F: Fn(&Record, &[Value]) -> AdaptResult<Value> + Send + Sync + 'static,
    {
        self.shape = self.shape.method(name, params, return_type);
        self.methods.push(Arc::new(body));
        self
    }

    /// Build the record. Every initial value must match its field's type.
    pub fn build(self) -> AdaptResult<Arc<Record>> {
        let shape = self.shape.build();
        let plain = shape
            .fields()
            .iter()
            .zip(&self.values)
            .filter(|(field, _)| field.index_params.is_empty());
        for (field, value) in plain {
            field.ty.check(value).map_err(|err| match err {
                AdaptError::TypeMismatch { expected, got } => AdaptError::InvalidArgument(format!(
                    "{}.{} declared {} but initialized with {}",
                    shape.class_name(),
                    field.name,
                    expected,
                    got
                )),
                other => other,
            })?;
        }
        Ok(Arc::new(Record {
            shape,
            values: RwLock::new(self.values),
            indexed: RwLock::new(HashMap::new()),
            methods: self.methods,
        }))
    }
}

/// A plain object exposing only its declared shape.
pub struct Record {
    shape: ClassShape,
    values: RwLock<Vec<Value>>,
    indexed: RwLock<HashMap<(usize, Vec<IndexKey>), Value>>,
    methods: Vec<RecordMethod>,
}

impl Record {
    /// Start building a record of the given class
    pub fn builder(class_name: &str) -> RecordBuilder {
        RecordBuilder {
            shape: ClassShape::builder(class_name),
            values: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Read a field by name (host side)
    pub fn get_field(&self, name: &str) -> Option<Value> {
        let slot = self.shape.field_slot(name)?;
        self.values.read().get(slot).cloned()
    }

    /// Write a field by name (host side). Read-only fields may be set here;
    /// the declared type is still enforced.
    pub fn set_field(&self, name: &str, value: impl Into<Value>) -> AdaptResult<()> {
        let slot = self
            .shape
            .field_slot(name)
            .ok_or_else(|| AdaptError::member_not_found(self.shape.class_name(), name))?;
        self.store_at(slot, value.into(), &[])
    }

    /// Resolve a field slot and check the index values against its shape.
    fn checked_field(&self, slot: usize, indices: &[Value]) -> AdaptResult<&FieldShape> {
        let field = self.shape.field(slot).ok_or_else(|| {
            AdaptError::member_not_found(self.shape.class_name(), format!("#{}", slot))
        })?;
        if field.index_params.len() != indices.len() {
            return Err(AdaptError::InvalidArgument(format!(
                "{}.{} expects {} index value(s), got {}",
                self.shape.class_name(),
                field.name,
                field.index_params.len(),
                indices.len()
            )));
        }
        for (ty, index) in field.index_params.iter().zip(indices) {
            ty.check(index)?;
        }
        Ok(field)
    }

    fn store_at(&self, slot: usize, value: Value, indices: &[Value]) -> AdaptResult<()> {
        let field = self.checked_field(slot, indices)?;
        field.ty.check(&value)?;
        if indices.is_empty() {
            self.values.write()[slot] = value;
        } else {
            self.indexed.write().insert((slot, IndexKey::tuple(indices)), value);
        }
        Ok(())
    }
}

impl Object for Record {
    fn type_name(&self) -> &str {
        self.shape.class_name()
    }

    fn as_reflect(&self) -> Option<&dyn Reflect> {
        Some(self)
    }
}

impl Reflect for Record {
    fn shape(&self) -> &ClassShape {
        &self.shape
    }

    fn read(&self, slot: usize, indices: &[Value]) -> AdaptResult<Value> {
        self.checked_field(slot, indices)?;
        if indices.is_empty() {
            return Ok(self.values.read()[slot].clone());
        }
        Ok(self
            .indexed
            .read()
            .get(&(slot, IndexKey::tuple(indices)))
            .cloned()
            .unwrap_or_default())
    }

    fn write(&self, slot: usize, value: Value, indices: &[Value]) -> AdaptResult<()> {
        self.store_at(slot, value, indices)
    }

    fn invoke(&self, slot: usize, args: &[Value]) -> AdaptResult<Value> {
        let (shape, body) = match (self.shape.method(slot), self.methods.get(slot)) {
            (Some(shape), Some(body)) => (shape, body),
            _ => {
                return Err(AdaptError::member_not_found(
                    self.shape.class_name(),
                    format!("#{}", slot),
                ))
            }
        };
        if shape.params.len() != args.len() {
            return Err(AdaptError::InvalidArgument(format!(
                "{}.{} expects {} argument(s), got {}",
                self.shape.class_name(),
                shape.name,
                shape.params.len(),
                args.len()
            )));
        }
        for (ty, arg) in shape.params.iter().zip(args) {
            ty.check(arg)?;
        }
        body(self, args)
    }
}
