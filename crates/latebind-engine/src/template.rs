//! Adapter templates
//!
//! Rust cannot define new types at run time, so a generated adapter is a
//! *template*: one forwarding thunk per interface member, built once per
//! (interface, strategy) and shared by every adapter instance. An
//! [`Adapter`] is then just a template, the wrapped source and a converter.
//!
//! Each forwarding call runs the same pipeline:
//!
//! 1. find the member on the flattened surface (`MemberNotFound` if absent)
//! 2. check accessor direction, arity and argument types
//! 3. run the strategy's thunk against the source
//! 4. pass the raw result through the converter
//! 5. check the converted result against the declared type

use std::fmt;
use std::sync::Arc;

use latebind_sdk::{
    AdaptError, AdaptResult, Dispatch, Implementation, Member, MethodInfo, Object, ObjectRef,
    ParameterInfo, PropertyInfo, Value,
};
use rustc_hash::FxHashMap;

use crate::converter::ValueConverter;
use crate::hierarchy::FlatInterface;

/// Forwards a property read (`indices` are the index arguments)
pub type Getter = Box<dyn Fn(&dyn Object, &[Value]) -> AdaptResult<Value> + Send + Sync>;

/// Forwards a property write
pub type Setter = Box<dyn Fn(&dyn Object, Value, &[Value]) -> AdaptResult<()> + Send + Sync>;

/// Forwards a method call
pub type Invoker = Box<dyn Fn(&dyn Object, &[Value]) -> AdaptResult<Value> + Send + Sync>;

/// Forwarding entry for one property
pub struct PropertySlot {
    info: PropertyInfo,
    member: Member,
    getter: Option<Getter>,
    setter: Option<Setter>,
}

impl PropertySlot {
    /// Create a slot; accessors exist only where the property declares them
    pub fn new(info: PropertyInfo, getter: Option<Getter>, setter: Option<Setter>) -> Self {
        Self {
            member: Member::Property(info.clone()),
            info,
            getter,
            setter,
        }
    }
}

/// Forwarding entry for one method
pub struct MethodSlot {
    info: MethodInfo,
    member: Member,
    invoker: Invoker,
}

impl MethodSlot {
    /// Create a slot
    pub fn new(info: MethodInfo, invoker: Invoker) -> Self {
        Self {
            member: Member::Method(info.clone()),
            info,
            invoker,
        }
    }
}

/// The generated "type" of an adapter: interface surface plus thunks.
pub struct AdapterTemplate {
    interface: Arc<FlatInterface>,
    type_name: String,
    strategy: &'static str,
    properties: FxHashMap<String, PropertySlot>,
    methods: FxHashMap<String, MethodSlot>,
    expose_dispatch: bool,
}

impl AdapterTemplate {
    /// Assemble a template.
    ///
    /// The adapter type name is `{module_name}.Adapter<{interface}>`.
    pub fn new(
        interface: Arc<FlatInterface>,
        module_name: &str,
        strategy: &'static str,
        properties: Vec<PropertySlot>,
        methods: Vec<MethodSlot>,
        expose_dispatch: bool,
    ) -> Self {
        let type_name = format!("{}.Adapter<{}>", module_name, interface.name());
        Self {
            interface,
            type_name,
            strategy,
            properties: properties
                .into_iter()
                .map(|slot| (slot.member.name().to_string(), slot))
                .collect(),
            methods: methods
                .into_iter()
                .map(|slot| (slot.member.name().to_string(), slot))
                .collect(),
            expose_dispatch,
        }
    }

    /// The flattened interface this template implements
    pub fn interface(&self) -> &Arc<FlatInterface> {
        &self.interface
    }

    /// Adapter type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Name of the strategy whose thunks this template holds
    pub fn strategy(&self) -> &'static str {
        self.strategy
    }

    /// Create an adapter instance over `source`
    pub fn instantiate(
        self: &Arc<Self>,
        source: ObjectRef,
        converter: Arc<dyn ValueConverter>,
    ) -> Arc<Adapter> {
        Arc::new(Adapter {
            template: self.clone(),
            source,
            converter,
        })
    }
}

impl fmt::Debug for AdapterTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterTemplate")
            .field("type_name", &self.type_name)
            .field("strategy", &self.strategy)
            .field("properties", &self.properties.len())
            .field("methods", &self.methods.len())
            .finish()
    }
}

// ============================================================================
// Adapter
// ============================================================================

/// A generated adapter instance.
///
/// Implements the target interface and all of its ancestors by forwarding
/// to the wrapped source.
pub struct Adapter {
    template: Arc<AdapterTemplate>,
    source: ObjectRef,
    converter: Arc<dyn ValueConverter>,
}

impl Adapter {
    /// The wrapped source object
    pub fn source(&self) -> &ObjectRef {
        &self.source
    }

    /// The template this adapter was instantiated from
    pub fn template(&self) -> &Arc<AdapterTemplate> {
        &self.template
    }

    fn property(&self, name: &str) -> AdaptResult<&PropertySlot> {
        self.template
            .properties
            .get(name)
            .ok_or_else(|| AdaptError::member_not_found(&self.template.type_name, name))
    }

    fn finish(&self, member: &Member, raw: Value) -> AdaptResult<Value> {
        let converted = self.converter.convert(member, raw)?;
        member.value_type().check(&converted)?;
        Ok(converted)
    }
}

fn check_args(owner: &str, member: &str, params: &[ParameterInfo], args: &[Value]) -> AdaptResult<()> {
    if params.len() != args.len() {
        return Err(AdaptError::InvalidArgument(format!(
            "{}.{} expects {} argument(s), got {}",
            owner,
            member,
            params.len(),
            args.len()
        )));
    }
    for (param, arg) in params.iter().zip(args) {
        param.ty.check(arg)?;
    }
    Ok(())
}

impl Object for Adapter {
    fn type_name(&self) -> &str {
        &self.template.type_name
    }

    fn as_implementation(&self) -> Option<&dyn Implementation> {
        Some(self)
    }

    fn as_dispatch(&self) -> Option<&dyn Dispatch> {
        if self.template.expose_dispatch {
            Some(self)
        } else {
            None
        }
    }
}

impl Implementation for Adapter {
    fn implements(&self, interface: &str) -> bool {
        self.template.interface.contains(interface)
    }

    fn get(&self, name: &str, indices: &[Value]) -> AdaptResult<Value> {
        let slot = self.property(name)?;
        let info = &slot.info;
        let getter = slot.getter.as_ref().ok_or_else(|| {
            AdaptError::InvalidArgument(format!(
                "property {}.{} is write-only",
                self.template.interface.name(),
                name
            ))
        })?;
        check_args(&self.template.type_name, name, &info.index_params, indices)?;

        let raw = getter(self.source.as_ref(), indices)?;
        self.finish(&slot.member, raw)
    }

    fn set(&self, name: &str, value: Value, indices: &[Value]) -> AdaptResult<()> {
        let slot = self.property(name)?;
        let info = &slot.info;
        let setter = slot.setter.as_ref().ok_or_else(|| {
            AdaptError::InvalidArgument(format!(
                "property {}.{} is read-only",
                self.template.interface.name(),
                name
            ))
        })?;
        check_args(&self.template.type_name, name, &info.index_params, indices)?;
        info.ty.check(&value)?;

        setter(self.source.as_ref(), value, indices)
    }

    fn call(&self, name: &str, args: &[Value]) -> AdaptResult<Value> {
        let slot = self
            .template
            .methods
            .get(name)
            .ok_or_else(|| AdaptError::member_not_found(&self.template.type_name, name))?;
        let info = &slot.info;
        check_args(&self.template.type_name, name, &info.params, args)?;

        let raw = (slot.invoker)(self.source.as_ref(), args)?;
        if info.return_type.is_void() {
            return Ok(Value::Null);
        }
        self.finish(&slot.member, raw)
    }
}

impl Dispatch for Adapter {
    fn get_property(&self, name: &str, indices: &[Value]) -> AdaptResult<Value> {
        self.get(name, indices)
    }

    fn set_property(&self, name: &str, value: Value, indices: &[Value]) -> AdaptResult<()> {
        self.set(name, value, indices)
    }

    fn call_method(&self, name: &str, args: &[Value]) -> AdaptResult<Value> {
        self.call(name, args)
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("type_name", &self.template.type_name)
            .field("source", &self.source.type_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::PassthroughConverter;
    use latebind_sdk::{ObjectExt, TypeDescriptor, TypeRegistry, ValueType};

    struct Blank;

    impl Object for Blank {
        fn type_name(&self) -> &str {
            "Blank"
        }
    }

    fn counter_template(expose_dispatch: bool) -> Arc<AdapterTemplate> {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                TypeDescriptor::interface("ICounter")
                    .property(PropertyInfo::read_only("Count", ValueType::I32))
                    .property(PropertyInfo::write_only("Seed", ValueType::I32))
                    .method(
                        MethodInfo::new("Add")
                            .param(ParameterInfo::new("n", ValueType::I32))
                            .returns(ValueType::I32),
                    )
                    .method(MethodInfo::new("Reset")),
            )
            .unwrap();
        let flat = FlatInterface::prepare(&registry, "ICounter").unwrap();

        let count = flat.property("Count").unwrap().clone();
        let seed = flat.property("Seed").unwrap().clone();
        let add = flat.method("Add").unwrap().clone();
        let reset = flat.method("Reset").unwrap().clone();

        Arc::new(AdapterTemplate::new(
            flat,
            "latebind",
            "test",
            vec![
                PropertySlot::new(count, Some(Box::new(|_, _| Ok(Value::I32(7)))), None),
                PropertySlot::new(seed, None, Some(Box::new(|_, _, _| Ok(())))),
            ],
            vec![
                MethodSlot::new(
                    add,
                    Box::new(|_, args| Ok(Value::I32(args[0].as_i32().unwrap_or(0) + 1))),
                ),
                MethodSlot::new(reset, Box::new(|_, _| Ok(Value::from("ignored")))),
            ],
            expose_dispatch,
        ))
    }

    fn adapter(expose_dispatch: bool) -> ObjectRef {
        counter_template(expose_dispatch).instantiate(Arc::new(Blank), Arc::new(PassthroughConverter))
    }

    #[test]
    fn test_type_name_and_implements() {
        let obj = adapter(false);
        assert_eq!(obj.type_name(), "latebind.Adapter<ICounter>");
        assert!(obj.implements("ICounter"));
        assert!(!obj.implements("IOther"));
        assert!(obj.as_dispatch().is_none());
        assert!(adapter(true).as_dispatch().is_some());
    }

    #[test]
    fn test_accessor_direction() {
        let obj = adapter(false);
        assert_eq!(obj.get("Count").unwrap(), Value::I32(7));
        assert!(matches!(obj.set("Count", 1i32), Err(AdaptError::InvalidArgument(_))));
        assert!(obj.set("Seed", 1i32).is_ok());
        assert!(matches!(obj.get("Seed"), Err(AdaptError::InvalidArgument(_))));
    }

    #[test]
    fn test_unknown_member() {
        let obj = adapter(false);
        assert!(matches!(obj.get("Missing"), Err(AdaptError::MemberNotFound { .. })));
        assert!(matches!(obj.call("Missing", &[]), Err(AdaptError::MemberNotFound { .. })));
    }

    #[test]
    fn test_argument_checks() {
        let obj = adapter(false);
        assert_eq!(obj.call("Add", &[Value::I32(1)]).unwrap(), Value::I32(2));
        assert!(matches!(obj.call("Add", &[]), Err(AdaptError::InvalidArgument(_))));
        assert!(matches!(
            obj.call("Add", &[Value::I16(1)]),
            Err(AdaptError::TypeMismatch { .. })
        ));
        assert!(matches!(
            obj.set("Seed", Value::I64(1)),
            Err(AdaptError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_void_method_discards_result() {
        let obj = adapter(false);
        assert_eq!(obj.call("Reset", &[]).unwrap(), Value::Null);
    }
}
