//! Type descriptors
//!
//! Two kinds of static metadata live here:
//!
//! - [`TypeDescriptor`]: what an adapter is generated against. Interfaces
//!   declare properties and methods and may extend other interfaces by name.
//!   Descriptors are registered once in a [`TypeRegistry`] and never change.
//! - [`ClassShape`]: the declared members of a concrete plain object, used by
//!   the reflection strategy to find same-named members by slot.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AdaptError, AdaptResult};
use crate::value::ValueType;

// ============================================================================
// Members
// ============================================================================

/// How a parameter is passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamMode {
    /// By value (the only supported mode)
    #[default]
    In,
    /// Output parameter
    Out,
    /// By-reference parameter
    Ref,
}

/// Parameter of a method or an indexed property
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    /// Parameter name
    pub name: String,
    /// Declared type
    pub ty: ValueType,
    /// Passing mode
    pub mode: ParamMode,
    /// Whether the parameter is optional
    pub optional: bool,
}

impl ParameterInfo {
    /// Create a by-value, required parameter
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty,
            mode: ParamMode::In,
            optional: false,
        }
    }

    /// Mark as an output parameter
    pub fn out(mut self) -> Self {
        self.mode = ParamMode::Out;
        self
    }

    /// Mark as a by-reference parameter
    pub fn by_ref(mut self) -> Self {
        self.mode = ParamMode::Ref;
        self
    }

    /// Mark as optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Property declared on an interface
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    /// Property name
    pub name: String,
    /// Declared type
    pub ty: ValueType,
    /// Has a getter
    pub can_read: bool,
    /// Has a setter
    pub can_write: bool,
    /// Index parameters (empty for plain properties)
    pub index_params: Vec<ParameterInfo>,
}

impl PropertyInfo {
    /// Read-only property
    pub fn read_only(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty,
            can_read: true,
            can_write: false,
            index_params: Vec::new(),
        }
    }

    /// Read-write property
    pub fn read_write(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            can_write: true,
            ..Self::read_only(name, ty)
        }
    }

    /// Write-only property
    pub fn write_only(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            can_read: false,
            ..Self::read_write(name, ty)
        }
    }

    /// Add an index parameter
    pub fn indexed(mut self, param: ParameterInfo) -> Self {
        self.index_params.push(param);
        self
    }
}

/// Method declared on an interface
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    /// Method name
    pub name: String,
    /// Parameters in order
    pub params: Vec<ParameterInfo>,
    /// Return type (`Void` for none)
    pub return_type: ValueType,
}

impl MethodInfo {
    /// Create a void method with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: ValueType::Void,
        }
    }

    /// Set return type
    pub fn returns(mut self, ty: ValueType) -> Self {
        self.return_type = ty;
        self
    }

    /// Add a parameter
    pub fn param(mut self, param: ParameterInfo) -> Self {
        self.params.push(param);
        self
    }
}

/// A member of an interface
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// Property (possibly indexed)
    Property(PropertyInfo),
    /// Method
    Method(MethodInfo),
}

impl Member {
    /// Member name
    pub fn name(&self) -> &str {
        match self {
            Member::Property(p) => &p.name,
            Member::Method(m) => &m.name,
        }
    }

    /// Type of the value this member produces: the property type or the
    /// method return type
    pub fn value_type(&self) -> &ValueType {
        match self {
            Member::Property(p) => &p.ty,
            Member::Method(m) => &m.return_type,
        }
    }

    /// All parameters (index parameters for properties)
    pub fn params(&self) -> &[ParameterInfo] {
        match self {
            Member::Property(p) => &p.index_params,
            Member::Method(m) => &m.params,
        }
    }
}

// ============================================================================
// TypeDescriptor
// ============================================================================

/// Descriptor kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Pure interface: members only
    Interface,
    /// Concrete class: may carry fields
    Class,
}

/// Descriptor visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Adapters may be generated
    #[default]
    Public,
    /// Inaccessible to the adapter generator
    Private,
}

/// Static description of an interface (or, for rejection, a class).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name; also its identity in the registry
    pub name: String,
    /// Interface or class
    pub kind: TypeKind,
    /// Visibility
    pub visibility: Visibility,
    /// Directly extended interfaces
    pub extends: Vec<String>,
    /// Declared members (not including inherited ones)
    pub members: Vec<Member>,
    /// Declared fields (classes only)
    pub fields: Vec<String>,
}

impl TypeDescriptor {
    /// Create an empty public interface descriptor
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Interface,
            visibility: Visibility::Public,
            extends: Vec::new(),
            members: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Create an empty public class descriptor
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Class,
            ..Self::interface(name)
        }
    }

    /// Mark as private
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Extend another interface
    pub fn extends(mut self, interface: impl Into<String>) -> Self {
        self.extends.push(interface.into());
        self
    }

    /// Declare a property
    pub fn property(mut self, property: PropertyInfo) -> Self {
        self.members.push(Member::Property(property));
        self
    }

    /// Declare a method
    pub fn method(mut self, method: MethodInfo) -> Self {
        self.members.push(Member::Method(method));
        self
    }

    /// Declare a field
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Is this a pure interface (interface kind, no fields)?
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface && self.fields.is_empty()
    }

    /// Is this descriptor public?
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

// ============================================================================
// TypeRegistry
// ============================================================================

/// Registry of type descriptors, keyed by name.
///
/// Populated once at startup and then shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. Names are unique.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> AdaptResult<()> {
        if self.types.contains_key(&descriptor.name) {
            return Err(AdaptError::InvalidArgument(format!(
                "type '{}' is already registered",
                descriptor.name
            )));
        }
        self.types
            .insert(descriptor.name.clone(), Arc::new(descriptor));
        Ok(())
    }

    /// Get a descriptor by name
    pub fn get(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(name)
    }

    /// Get a descriptor by name or fail with `InvalidArgument`
    pub fn resolve(&self, name: &str) -> AdaptResult<&Arc<TypeDescriptor>> {
        self.get(name)
            .ok_or_else(|| AdaptError::InvalidArgument(format!("unknown type '{}'", name)))
    }

    /// Check if a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of registered descriptors
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

// ============================================================================
// ClassShape
// ============================================================================

/// Declared field (or property) of a concrete class
#[derive(Debug, Clone, PartialEq)]
pub struct FieldShape {
    /// Field name
    pub name: String,
    /// Declared type
    pub ty: ValueType,
    /// Readable through reflection
    pub readable: bool,
    /// Writable through reflection
    pub writable: bool,
    /// Index parameter types (empty for plain fields)
    pub index_params: Vec<ValueType>,
}

/// Declared method of a concrete class
#[derive(Debug, Clone, PartialEq)]
pub struct MethodShape {
    /// Method name
    pub name: String,
    /// Parameter types
    pub params: Vec<ValueType>,
    /// Return type
    pub return_type: ValueType,
}

/// Builder for [`ClassShape`]
pub struct ClassShapeBuilder {
    class_name: String,
    fields: Vec<FieldShape>,
    methods: Vec<MethodShape>,
}

impl ClassShapeBuilder {
    /// Add a read-write field
    pub fn field(self, name: &str, ty: ValueType) -> Self {
        self.push_field(name, ty, true)
    }

    /// Add a read-only field
    pub fn readonly_field(self, name: &str, ty: ValueType) -> Self {
        self.push_field(name, ty, false)
    }

    /// Add an indexed, read-write field
    pub fn indexed_field(mut self, name: &str, ty: ValueType, index_params: Vec<ValueType>) -> Self {
        self.fields.push(FieldShape {
            name: name.to_string(),
            ty,
            readable: true,
            writable: true,
            index_params,
        });
        self
    }

    /// Add a method
    pub fn method(mut self, name: &str, params: Vec<ValueType>, return_type: ValueType) -> Self {
        self.methods.push(MethodShape {
            name: name.to_string(),
            params,
            return_type,
        });
        self
    }

    fn push_field(mut self, name: &str, ty: ValueType, writable: bool) -> Self {
        self.fields.push(FieldShape {
            name: name.to_string(),
            ty,
            readable: true,
            writable,
            index_params: Vec::new(),
        });
        self
    }

    /// Build the ClassShape
    pub fn build(self) -> ClassShape {
        let field_lookup = self
            .fields
            .iter()
            .enumerate()
            .map(|(slot, f)| (f.name.clone(), slot))
            .collect();
        let mut method_lookup: HashMap<String, Vec<usize>> = HashMap::new();
        for (slot, m) in self.methods.iter().enumerate() {
            method_lookup.entry(m.name.clone()).or_default().push(slot);
        }
        ClassShape {
            class_name: self.class_name,
            fields: self.fields,
            methods: self.methods,
            field_lookup,
            method_lookup,
        }
    }
}

/// Declared members of a concrete class, addressed by slot.
///
/// Build once per class and share between instances. Lookups by name are
/// `HashMap` → O(1). A later field with the same name shadows an earlier
/// one; same-named methods are kept as overloads in declaration order.
#[derive(Debug, Clone)]
pub struct ClassShape {
    class_name: String,
    fields: Vec<FieldShape>,
    methods: Vec<MethodShape>,
    field_lookup: HashMap<String, usize>,
    method_lookup: HashMap<String, Vec<usize>>,
}

impl ClassShape {
    /// Create a builder
    pub fn builder(class_name: &str) -> ClassShapeBuilder {
        ClassShapeBuilder {
            class_name: class_name.to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Class name
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Look up a field slot by name
    pub fn field_slot(&self, name: &str) -> Option<usize> {
        self.field_lookup.get(name).copied()
    }

    /// First declared method slot with this name
    pub fn method_slot(&self, name: &str) -> Option<usize> {
        self.method_slots(name).first().copied()
    }

    /// Every overload with this name, in declaration order
    pub fn method_slots(&self, name: &str) -> &[usize] {
        self.method_lookup.get(name).map_or(&[], Vec::as_slice)
    }

    /// Field by slot
    pub fn field(&self, slot: usize) -> Option<&FieldShape> {
        self.fields.get(slot)
    }

    /// Method by slot
    pub fn method(&self, slot: usize) -> Option<&MethodShape> {
        self.methods.get(slot)
    }

    /// All fields in slot order
    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    /// All methods in slot order
    pub fn methods(&self) -> &[MethodShape] {
        &self.methods
    }
}
