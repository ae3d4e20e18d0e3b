//! Interface hierarchy flattening
//!
//! An adapter for `T` must also satisfy every ancestor of `T`, so members are
//! always enumerated over the flattened set `{T} ∪ ancestors(T)`. Each
//! interface is visited once even under diamond inheritance.

use std::sync::Arc;

use latebind_sdk::{
    AdaptError, AdaptResult, Member, MethodInfo, ParamMode, PropertyInfo, TypeDescriptor,
    TypeRegistry,
};
use rustc_hash::{FxHashMap, FxHashSet};

/// `{target} ∪ transitive ancestors`, target first.
#[derive(Debug, Clone)]
pub struct InterfaceHierarchy {
    interfaces: Vec<Arc<TypeDescriptor>>,
}

impl InterfaceHierarchy {
    /// The interface the hierarchy was built for
    pub fn target(&self) -> &Arc<TypeDescriptor> {
        &self.interfaces[0]
    }

    /// All interfaces, target first, each once
    pub fn interfaces(&self) -> &[Arc<TypeDescriptor>] {
        &self.interfaces
    }
}

/// Flatten an interface and its ancestors.
///
/// Fails with `InvalidArgument` for unknown names and for descriptors that
/// are not pure interfaces, i.e. classes or interfaces declaring fields
/// (the target or any ancestor).
pub fn flatten(registry: &TypeRegistry, interface: &str) -> AdaptResult<InterfaceHierarchy> {
    let mut interfaces = Vec::new();
    let mut seen = FxHashSet::default();
    collect(registry, interface, &mut interfaces, &mut seen)?;
    Ok(InterfaceHierarchy { interfaces })
}

fn collect(
    registry: &TypeRegistry,
    name: &str,
    out: &mut Vec<Arc<TypeDescriptor>>,
    seen: &mut FxHashSet<String>,
) -> AdaptResult<()> {
    if !seen.insert(name.to_string()) {
        return Ok(());
    }
    let descriptor = registry.resolve(name)?;
    if !descriptor.is_interface() {
        return Err(AdaptError::InvalidArgument(format!(
            "'{}' must be an interface type",
            name
        )));
    }
    out.push(descriptor.clone());
    for parent in &descriptor.extends {
        collect(registry, parent, out, seen)?;
    }
    Ok(())
}

// ============================================================================
// FlatInterface
// ============================================================================

/// The deduplicated member surface of an interface hierarchy.
///
/// Properties and methods live in separate namespaces. Within each, the
/// first declaration met while walking the hierarchy (target first) wins and
/// hides same-named declarations further up.
#[derive(Debug)]
pub struct FlatInterface {
    name: String,
    interfaces: Vec<Arc<TypeDescriptor>>,
    members: Vec<Member>,
    property_lookup: FxHashMap<String, usize>,
    method_lookup: FxHashMap<String, usize>,
}

impl FlatInterface {
    /// Merge the members of a flattened hierarchy
    pub fn build(hierarchy: InterfaceHierarchy) -> Self {
        let mut members = Vec::new();
        let mut property_lookup = FxHashMap::default();
        let mut method_lookup = FxHashMap::default();

        for descriptor in &hierarchy.interfaces {
            for member in &descriptor.members {
                let lookup = match member {
                    Member::Property(_) => &mut property_lookup,
                    Member::Method(_) => &mut method_lookup,
                };
                if lookup.contains_key(member.name()) {
                    continue;
                }
                lookup.insert(member.name().to_string(), members.len());
                members.push(member.clone());
            }
        }

        Self {
            name: hierarchy.target().name.clone(),
            interfaces: hierarchy.interfaces,
            members,
            property_lookup,
            method_lookup,
        }
    }

    /// Flatten, merge and validate in one step.
    ///
    /// This is the generation-time gate every generator goes through: shape
    /// violations and inaccessible interfaces are reported here, before any
    /// call is attempted.
    pub fn prepare(registry: &TypeRegistry, interface: &str) -> AdaptResult<Arc<Self>> {
        let flat = Self::build(flatten(registry, interface)?);
        flat.validate()?;
        Ok(Arc::new(flat))
    }

    /// Check visibility and parameter shapes.
    ///
    /// - any non-public interface → `GenerationFailure`
    /// - any out, by-reference or optional parameter → `InvalidArgument`
    pub fn validate(&self) -> AdaptResult<()> {
        if let Some(hidden) = self.interfaces.iter().find(|d| !d.is_public()) {
            return Err(AdaptError::GenerationFailure {
                interface: self.name.clone(),
                reason: format!("interface '{}' is not accessible", hidden.name),
            });
        }

        // Hidden duplicates are still part of the contract, so check every
        // declaration rather than only the merged surface.
        for descriptor in &self.interfaces {
            for member in &descriptor.members {
                for param in member.params() {
                    let problem = match param.mode {
                        ParamMode::Out => Some("Output parameters are not supported"),
                        ParamMode::Ref => Some("Ref parameters are not supported"),
                        ParamMode::In if param.optional => {
                            Some("Optional parameters are not supported")
                        }
                        ParamMode::In => None,
                    };
                    if let Some(problem) = problem {
                        return Err(AdaptError::InvalidArgument(format!(
                            "{} ({}.{}, parameter '{}')",
                            problem,
                            descriptor.name,
                            member.name(),
                            param.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Target interface name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Is `interface` the target or one of its ancestors?
    pub fn contains(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|d| d.name == interface)
    }

    /// Flattened interfaces, target first
    pub fn interfaces(&self) -> &[Arc<TypeDescriptor>] {
        &self.interfaces
    }

    /// Merged members in declaration order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Look up a property by name
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        match self.property_lookup.get(name).map(|&i| &self.members[i]) {
            Some(Member::Property(p)) => Some(p),
            _ => None,
        }
    }

    /// Look up a method by name
    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        match self.method_lookup.get(name).map(|&i| &self.members[i]) {
            Some(Member::Method(m)) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latebind_sdk::{ParameterInfo, ValueType};

    fn diamond() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                TypeDescriptor::interface("IBase")
                    .property(PropertyInfo::read_only("Id", ValueType::I32)),
            )
            .unwrap();
        registry
            .register(
                TypeDescriptor::interface("ILeft")
                    .extends("IBase")
                    .property(PropertyInfo::read_write("Name", ValueType::String)),
            )
            .unwrap();
        registry
            .register(
                TypeDescriptor::interface("IRight")
                    .extends("IBase")
                    .property(PropertyInfo::read_only("Name", ValueType::String))
                    .method(MethodInfo::new("Reset")),
            )
            .unwrap();
        registry
            .register(
                TypeDescriptor::interface("IBoth")
                    .extends("ILeft")
                    .extends("IRight"),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_flatten_diamond_visits_once() {
        let registry = diamond();
        let hierarchy = flatten(&registry, "IBoth").unwrap();
        let names: Vec<&str> = hierarchy
            .interfaces()
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["IBoth", "ILeft", "IBase", "IRight"]);
        assert_eq!(hierarchy.target().name, "IBoth");
    }

    #[test]
    fn test_flatten_rejects_non_interface() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeDescriptor::class("Person")).unwrap();
        registry
            .register(TypeDescriptor::interface("IPerson").extends("Person"))
            .unwrap();

        assert!(matches!(
            flatten(&registry, "Person"),
            Err(AdaptError::InvalidArgument(_))
        ));
        assert!(matches!(
            flatten(&registry, "IPerson"),
            Err(AdaptError::InvalidArgument(_))
        ));
        assert!(matches!(
            flatten(&registry, "IMissing"),
            Err(AdaptError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_flatten_rejects_fields() {
        let mut registry = TypeRegistry::new();
        registry
            .register(TypeDescriptor::interface("IStateful").field("state"))
            .unwrap();
        assert!(matches!(
            flatten(&registry, "IStateful"),
            Err(AdaptError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_flat_members_first_declaration_wins() {
        let registry = diamond();
        let flat = FlatInterface::build(flatten(&registry, "IBoth").unwrap());

        // ILeft is walked before IRight, so its read-write Name wins
        assert!(flat.property("Name").unwrap().can_write);
        assert_eq!(flat.property("Id").unwrap().ty, ValueType::I32);
        assert!(flat.method("Reset").is_some());
        assert_eq!(flat.members().len(), 3);
        assert!(flat.contains("IBase"));
        assert!(!flat.contains("IOther"));
    }

    #[test]
    fn test_prepare_rejects_parameter_shapes() {
        for param in [
            ParameterInfo::new("value", ValueType::I32).out(),
            ParameterInfo::new("value", ValueType::I32).by_ref(),
            ParameterInfo::new("value", ValueType::I32).optional(),
        ] {
            let mut registry = TypeRegistry::new();
            registry
                .register(
                    TypeDescriptor::interface("IBad")
                        .method(MethodInfo::new("Load").param(param)),
                )
                .unwrap();
            assert!(matches!(
                FlatInterface::prepare(&registry, "IBad"),
                Err(AdaptError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_prepare_rejects_private_ancestor() {
        let mut registry = TypeRegistry::new();
        registry
            .register(TypeDescriptor::interface("IHidden").private())
            .unwrap();
        registry
            .register(TypeDescriptor::interface("IVisible").extends("IHidden"))
            .unwrap();
        assert!(matches!(
            FlatInterface::prepare(&registry, "IVisible"),
            Err(AdaptError::GenerationFailure { .. })
        ));
    }
}
