//! `latebind demo`: wrap a script-style control and render it.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use latebind_engine::{
    ApplierFactoryExt, CachedValueConverter, CachingApplierFactory, EngineConfig,
};
use latebind_sdk::Value;
use termcolor::ColorChoice;

use super::components::{self, Control, OutputWriter};
use crate::output::StyledOutput;

pub fn execute(config: Option<&Path>, color: ColorChoice) -> anyhow::Result<()> {
    let config = match config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    tracing::debug!(?config, "engine configuration");

    let registry = Arc::new(components::registry()?);
    let factory = Arc::new(CachingApplierFactory::standard(registry, config));
    let converter = CachedValueConverter::new(factory.clone());

    let applier = factory
        .generate_adapter::<Control>(converter)
        .context("generating IControl applier")?;
    let control = applier
        .apply(Value::object(components::control_component()))
        .context("wrapping control component")?;

    let mut out = StyledOutput::new(color);
    out.heading("Control");
    out.field("Adapter", control.object().type_name());
    out.field("Version", &control.interface_version()?.to_string());
    let application = control.application_name()?;
    out.field("Application", application.as_deref().unwrap_or("(none)"));

    control.init()?;
    out.field("Dependencies", &control.render_dependencies()?);

    let writer = OutputWriter::new();
    control.render(&writer)?;
    control.dispose()?;

    out.newline();
    out.heading("Rendered output");
    for line in writer.content().lines() {
        out.line(line);
    }
    out.newline();
    out.success(&format!("Done ({} applier(s) cached)", factory.len()));
    Ok(())
}
