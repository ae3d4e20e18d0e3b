//! `latebind inspect`: show an interface's flattened member surface.

use latebind_engine::FlatInterface;
use latebind_sdk::{Member, ParameterInfo};
use termcolor::ColorChoice;

use super::components;
use crate::output::StyledOutput;

pub fn execute(interface: &str, color: ColorChoice) -> anyhow::Result<()> {
    let registry = components::registry()?;
    let flat = FlatInterface::prepare(&registry, interface)?;

    let mut out = StyledOutput::new(color);
    out.heading(flat.name());
    let ancestors: Vec<&str> = flat.interfaces()[1..]
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    if !ancestors.is_empty() {
        out.field("Extends", &ancestors.join(", "));
    }
    out.newline();

    for member in flat.members() {
        out.line(&format!("  {}", describe(member)));
    }
    Ok(())
}

fn params(params: &[ParameterInfo]) -> String {
    params
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe(member: &Member) -> String {
    match member {
        Member::Property(p) => {
            let access = match (p.can_read, p.can_write) {
                (true, true) => "get; set;",
                (true, false) => "get;",
                _ => "set;",
            };
            let index = if p.index_params.is_empty() {
                String::new()
            } else {
                format!("[{}]", params(&p.index_params))
            };
            format!("{}{}: {} {{ {} }}", p.name, index, p.ty, access)
        }
        Member::Method(m) => {
            format!("{}({}) -> {}", m.name, params(&m.params), m.return_type)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latebind_sdk::{MethodInfo, PropertyInfo, ValueType};

    #[test]
    fn test_describe_members() {
        let prop = Member::Property(PropertyInfo::read_only("InterfaceVersion", ValueType::I16));
        assert_eq!(describe(&prop), "InterfaceVersion: i16 { get; }");

        let method = Member::Method(
            MethodInfo::new("Render").param(ParameterInfo::new(
                "writer",
                ValueType::interface("IOutputWriter"),
            )),
        );
        assert_eq!(describe(&method), "Render(writer: IOutputWriter) -> void");
    }
}
