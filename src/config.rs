//! Configuration management for form registries
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (forms.toml)
//! - Environment variables (FORMS__*)
//!
//! ## Example config file (forms.toml):
//! ```toml
//! [form]
//! validate_on_change = true
//! default_field_type = "text"
//! array_separator = "-"
//!
//! [diagnostics]
//! warn_stale_references = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main configuration for a form registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Registration and validation behavior
    #[serde(default)]
    pub form: FormSettings,

    /// Diagnostic output
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Registration and validation behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSettings {
    /// Attach a change handler to props that revalidates and republishes
    #[serde(default)]
    pub validate_on_change: bool,

    /// Field type used when a descriptor does not name one
    #[serde(default = "default_field_type")]
    pub default_field_type: String,

    /// Joins a field array's name and counter into child names
    #[serde(default = "default_array_separator")]
    pub array_separator: String,
}

/// Diagnostic output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Warn when operating on an unregistered element (debug builds only)
    #[serde(default = "default_true")]
    pub warn_stale_references: bool,
}

// Default value functions
fn default_field_type() -> String {
    "text".to_string()
}

fn default_array_separator() -> String {
    "-".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            validate_on_change: false,
            default_field_type: default_field_type(),
            array_separator: default_array_separator(),
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            warn_stale_references: true,
        }
    }
}

impl FormConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["forms.toml", ".forms.toml", "config/forms.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "forms") {
            let xdg_config = config_dir.config_dir().join("forms.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (FORMS__*)
        builder = builder.add_source(
            Environment::with_prefix("FORMS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Shorthand for a default config that validates on change
    pub fn validating_on_change() -> Self {
        let mut config = Self::default();
        config.form.validate_on_change = true;
        config
    }
}
