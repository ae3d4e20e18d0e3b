//! Demo interfaces and sources
//!
//! A script-style control is an automation object with no static types. The
//! host only knows the `IControl` contract, wraps the control through the
//! engine and drives its render lifecycle with a native output writer.

use std::sync::Arc;

use latebind_engine::Facade;
use latebind_sdk::{
    AdaptError, AdaptResult, Dispatch, Expando, FromValue, Implementation, MethodInfo, Object,
    ObjectExt, ObjectRef, ParameterInfo, PropertyInfo, TypeDescriptor, TypeRegistry, Value,
    ValueType,
};
use parking_lot::Mutex;

pub const ICONTROL: &str = "IControl";
pub const IAPPLICATION: &str = "IApplication";
pub const IOUTPUT_WRITER: &str = "IOutputWriter";

/// Registry holding the demo interfaces.
pub fn registry() -> AdaptResult<TypeRegistry> {
    let mut registry = TypeRegistry::new();

    registry.register(
        TypeDescriptor::interface(IAPPLICATION)
            .property(PropertyInfo::read_only("Name", ValueType::String)),
    )?;

    let content = || ParameterInfo::new("content", ValueType::String);
    registry.register(
        TypeDescriptor::interface(IOUTPUT_WRITER)
            .method(MethodInfo::new("Append").param(content()))
            .method(MethodInfo::new("AppendLine").param(content()))
            .method(MethodInfo::new("Write").param(content()))
            .method(MethodInfo::new("WriteLine").param(content())),
    )?;

    registry.register(
        TypeDescriptor::interface(ICONTROL)
            .property(PropertyInfo::read_only("InterfaceVersion", ValueType::I16))
            .property(PropertyInfo::read_write(
                "Application",
                ValueType::interface(IAPPLICATION),
            ))
            .method(MethodInfo::new("Init"))
            .method(MethodInfo::new("GetRenderDependencies").returns(ValueType::String))
            .method(
                MethodInfo::new("Render")
                    .param(ParameterInfo::new("writer", ValueType::interface(IOUTPUT_WRITER))),
            )
            .method(MethodInfo::new("Dispose")),
    )?;

    Ok(registry)
}

// ============================================================================
// Sources
// ============================================================================

/// A script-style control component.
pub fn control_component() -> Arc<Expando> {
    let application = Expando::new("Scripting.Application")
        .with_property("Name", "Demo Application")
        .build();

    Expando::new("Scripting.Control")
        .with_property("InterfaceVersion", 1i16)
        .with_property("Application", Value::object(application))
        .with_property("Title", "Hello from a late-bound control")
        .with_property("State", "created")
        .with_method("Init", |this, _args| {
            this.set_property("State", Value::from("initialized"), &[])?;
            Ok(Value::Null)
        })
        .with_method("GetRenderDependencies", |_this, _args| {
            Ok(Value::from("/css/control.css,/js/control.js"))
        })
        .with_method("Render", |this, args| {
            let writer = args
                .first()
                .and_then(Value::as_object)
                .ok_or_else(|| AdaptError::InvalidArgument("Render expects a writer".to_string()))?;
            let title = this.property("Title").unwrap_or_default();
            let state = this.property("State").unwrap_or_default();

            writer.call("WriteLine", &[Value::from("<div class=\"control\">")])?;
            writer.call("Write", &[Value::from("  <h1>")])?;
            writer.call("Append", &[title])?;
            writer.call("AppendLine", &[Value::from("</h1>")])?;
            writer.call("Write", &[Value::from("  <p>state: ")])?;
            writer.call("Append", &[state])?;
            writer.call("AppendLine", &[Value::from("</p>")])?;
            writer.call("WriteLine", &[Value::from("</div>")])?;
            Ok(Value::Null)
        })
        .with_method("Dispose", |this, _args| {
            this.set_property("State", Value::from("disposed"), &[])?;
            Ok(Value::Null)
        })
        .build()
}

/// Native buffer implementing `IOutputWriter` directly.
///
/// Null content is ignored.
#[derive(Default)]
pub struct OutputWriter {
    content: Mutex<String>,
}

impl OutputWriter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Everything written so far
    pub fn content(&self) -> String {
        self.content.lock().clone()
    }
}

impl Object for OutputWriter {
    fn type_name(&self) -> &str {
        "OutputWriter"
    }

    fn as_implementation(&self) -> Option<&dyn Implementation> {
        Some(self)
    }
}

impl Implementation for OutputWriter {
    fn implements(&self, interface: &str) -> bool {
        interface == IOUTPUT_WRITER
    }

    fn get(&self, name: &str, _indices: &[Value]) -> AdaptResult<Value> {
        Err(AdaptError::member_not_found(self.type_name(), name))
    }

    fn set(&self, name: &str, _value: Value, _indices: &[Value]) -> AdaptResult<()> {
        Err(AdaptError::member_not_found(self.type_name(), name))
    }

    fn call(&self, name: &str, args: &[Value]) -> AdaptResult<Value> {
        let newline = match name {
            "Append" | "Write" => false,
            "AppendLine" | "WriteLine" => true,
            _ => return Err(AdaptError::member_not_found(self.type_name(), name)),
        };
        let text = match args {
            [Value::Null] => return Ok(Value::Null),
            [Value::String(text)] => text,
            [other] => return Err(AdaptError::type_mismatch(ValueType::String, other.type_name())),
            _ => {
                return Err(AdaptError::InvalidArgument(format!(
                    "{}.{} expects 1 argument, got {}",
                    self.type_name(),
                    name,
                    args.len()
                )))
            }
        };

        let mut content = self.content.lock();
        content.push_str(text);
        if newline {
            content.push('\n');
        }
        Ok(Value::Null)
    }
}

// ============================================================================
// Facades
// ============================================================================

/// Typed view of `IControl`.
pub struct Control(ObjectRef);

impl Facade for Control {
    const INTERFACE: &'static str = ICONTROL;

    fn from_object(object: ObjectRef) -> Self {
        Control(object)
    }
}

impl Control {
    pub fn object(&self) -> &ObjectRef {
        &self.0
    }

    pub fn interface_version(&self) -> AdaptResult<i16> {
        i16::from_value(self.0.get("InterfaceVersion")?)
    }

    /// `Application.Name`, read through the nested `IApplication` adapter
    pub fn application_name(&self) -> AdaptResult<Option<String>> {
        let Some(application) = Option::<ObjectRef>::from_value(self.0.get("Application")?)? else {
            return Ok(None);
        };
        String::from_value(application.get("Name")?).map(Some)
    }

    pub fn init(&self) -> AdaptResult<()> {
        self.0.call("Init", &[]).map(|_| ())
    }

    pub fn render_dependencies(&self) -> AdaptResult<String> {
        String::from_value(self.0.call("GetRenderDependencies", &[])?)
    }

    pub fn render(&self, writer: &Arc<OutputWriter>) -> AdaptResult<()> {
        self.0
            .call("Render", &[Value::object(writer.clone())])
            .map(|_| ())
    }

    pub fn dispose(&self) -> AdaptResult<()> {
        self.0.call("Dispose", &[]).map(|_| ())
    }
}
