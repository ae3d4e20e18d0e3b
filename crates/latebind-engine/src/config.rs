//! Engine configuration (`latebind.toml`)
//!
//! ```toml
//! [adapters]
//! module_name = "DynamicAssembly"
//! expose_dispatch = true
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Adapter generation settings
    #[serde(default)]
    pub adapters: AdapterConfig,
}

/// `[adapters]` table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterConfig {
    /// Prefix of generated adapter type names (`{module_name}.Adapter<I>`)
    #[serde(default = "default_module_name")]
    pub module_name: String,

    /// Let adapters answer name-based automation calls themselves
    #[serde(default)]
    pub expose_dispatch: bool,
}

fn default_module_name() -> String {
    "latebind".to_string()
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            module_name: default_module_name(),
            expose_dispatch: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: EngineConfig = toml::from_str(content)?;
        config.adapters.module_name = config.adapters.module_name.trim().to_string();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.adapters.module_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "adapters.module_name cannot be empty".to_string(),
            ));
        }
        if self
            .adapters
            .module_name
            .chars()
            .any(|c| c.is_whitespace() || c == '<' || c == '>')
        {
            return Err(ConfigError::ValidationError(format!(
                "adapters.module_name '{}' contains invalid characters",
                self.adapters.module_name
            )));
        }
        Ok(())
    }
}
