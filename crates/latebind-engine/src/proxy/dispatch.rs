//! Dispatch strategy: forward everything by name.
//!
//! Property indices travel positionally with the name; method arguments are
//! passed through in order. Results come back untyped, so the converter and
//! the adapter's declared-type check do the rest.

use latebind_sdk::{AdaptError, AdaptResult, Dispatch, MethodInfo, Object, PropertyInfo};

use super::ProxyStrategy;
use crate::template::{Getter, Invoker, Setter};

/// Forwards to automation objects through their [`Dispatch`] facet.
#[derive(Debug, Default, Clone, Copy)]
pub struct DispatchStrategy;

fn dispatch_of(source: &dyn Object) -> AdaptResult<&dyn Dispatch> {
    source
        .as_dispatch()
        .ok_or_else(|| AdaptError::unsupported(source.type_name(), "does not support automation dispatch"))
}

impl ProxyStrategy for DispatchStrategy {
    fn name(&self) -> &'static str {
        "dispatch"
    }

    fn check_source(&self, source: &dyn Object) -> AdaptResult<()> {
        dispatch_of(source).map(|_| ())
    }

    fn getter(&self, property: &PropertyInfo) -> Getter {
        let name = property.name.clone();
        Box::new(move |source, indices| dispatch_of(source)?.get_property(&name, indices))
    }

    fn setter(&self, property: &PropertyInfo) -> Setter {
        let name = property.name.clone();
        Box::new(move |source, value, indices| {
            dispatch_of(source)?.set_property(&name, value, indices)
        })
    }

    fn invoker(&self, method: &MethodInfo) -> Invoker {
        let name = method.name.clone();
        Box::new(move |source, args| dispatch_of(source)?.call_method(&name, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latebind_sdk::{Expando, ObjectRef, Record, Value, ValueType};

    #[test]
    fn test_check_source_requires_dispatch() {
        let plain: ObjectRef = Record::builder("Plain").build().unwrap();
        let automation: ObjectRef = Expando::new("Control").build();
        assert!(matches!(
            DispatchStrategy.check_source(plain.as_ref()),
            Err(AdaptError::UnsupportedSource { .. })
        ));
        assert!(DispatchStrategy.check_source(automation.as_ref()).is_ok());
    }

    #[test]
    fn test_indexed_property_forwarding() {
        let src: ObjectRef = Expando::new("Grid").build();
        let cell = PropertyInfo::read_write("Cell", ValueType::String);
        let setter = DispatchStrategy.setter(&cell);
        let getter = DispatchStrategy.getter(&cell);

        setter(src.as_ref(), Value::from("x"), &[Value::I32(1), Value::I32(2)]).unwrap();
        assert_eq!(
            getter(src.as_ref(), &[Value::I32(1), Value::I32(2)]).unwrap(),
            Value::from("x")
        );
    }

    #[test]
    fn test_method_forwarding() {
        let src: ObjectRef = Expando::new("Calc")
            .with_method("Sum", |_, args| {
                Ok(Value::I32(args.iter().filter_map(|a| a.as_i32()).sum()))
            })
            .build();
        let invoker = DispatchStrategy.invoker(&MethodInfo::new("Sum").returns(ValueType::I32));
        assert_eq!(
            invoker(src.as_ref(), &[Value::I32(2), Value::I32(3)]).unwrap(),
            Value::I32(5)
        );
    }
}
