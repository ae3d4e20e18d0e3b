//! Reflection strategy: forward to same-named declared members.
//!
//! Lookup happens on every call against the source's own [`ClassShape`], so
//! one template serves any plain object. A source without the member (or
//! with one of the wrong shape) fails that call with `MemberNotFound`.

use latebind_sdk::{
    AdaptError, AdaptResult, ClassShape, MethodInfo, Object, PropertyInfo, Reflect, Value,
};

use super::ProxyStrategy;
use crate::template::{Getter, Invoker, Setter};

/// Forwards to plain objects through their [`Reflect`] facet.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReflectionStrategy;

fn reflect_of<'a>(source: &'a dyn Object, member: &str) -> AdaptResult<&'a dyn Reflect> {
    source
        .as_reflect()
        .ok_or_else(|| AdaptError::member_not_found(source.type_name(), member))
}

/// Field slot usable for the requested access.
fn field_slot(
    shape: &ClassShape,
    name: &str,
    arity: usize,
    write: bool,
) -> AdaptResult<usize> {
    let not_found = || AdaptError::member_not_found(shape.class_name(), name);
    let slot = shape.field_slot(name).ok_or_else(not_found)?;
    let field = shape.field(slot).ok_or_else(not_found)?;
    let accessible = if write { field.writable } else { field.readable };
    if !accessible || field.index_params.len() != arity {
        return Err(not_found());
    }
    Ok(slot)
}

/// Overload taking these arguments.
///
/// Among same-named methods of matching arity, the first whose parameter
/// types accept the arguments wins; failing that, the first of matching
/// arity is used and reports the type mismatch itself.
fn method_slot(shape: &ClassShape, name: &str, args: &[Value]) -> AdaptResult<usize> {
    let candidates: Vec<usize> = shape
        .method_slots(name)
        .iter()
        .copied()
        .filter(|&slot| shape.method(slot).is_some_and(|m| m.params.len() == args.len()))
        .collect();
    candidates
        .iter()
        .copied()
        .find(|&slot| {
            shape
                .method(slot)
                .is_some_and(|m| m.params.iter().zip(args).all(|(ty, arg)| ty.accepts(arg)))
        })
        .or_else(|| candidates.first().copied())
        .ok_or_else(|| AdaptError::member_not_found(shape.class_name(), name))
}

impl ProxyStrategy for ReflectionStrategy {
    fn name(&self) -> &'static str {
        "reflection"
    }

    fn getter(&self, property: &PropertyInfo) -> Getter {
        let name = property.name.clone();
        Box::new(move |source, indices| {
            let reflect = reflect_of(source, &name)?;
            let slot = field_slot(reflect.shape(), &name, indices.len(), false)?;
            reflect.read(slot, indices)
        })
    }

    fn setter(&self, property: &PropertyInfo) -> Setter {
        let name = property.name.clone();
        Box::new(move |source, value: Value, indices| {
            let reflect = reflect_of(source, &name)?;
            let slot = field_slot(reflect.shape(), &name, indices.len(), true)?;
            reflect.write(slot, value, indices)
        })
    }

    fn invoker(&self, method: &MethodInfo) -> Invoker {
        let name = method.name.clone();
        Box::new(move |source, args| {
            let reflect = reflect_of(source, &name)?;
            let slot = method_slot(reflect.shape(), &name, args)?;
            reflect.invoke(slot, args)
        })
    }
}
