use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "JVMLAUNCH_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// `$JVMLAUNCH_CONFIG` wins when set. Otherwise uses
    /// `~/.config/jvmlaunch/config.toml` on Unix, or the platform
    /// equivalent via `dirs::config_dir()`, falling back to the current
    /// directory.
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("jvmlaunch").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - Otherwise parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Entry point names are non-empty
    /// - Method signatures look like JNI descriptors
    /// - The agent pattern compiles
    pub fn validate(&self) -> Result<(), ConfigError> {
        let runtime = &self.runtime;
        let names = [
            ("runtime.bootstrap_class", &runtime.bootstrap_class),
            ("runtime.main_method", &runtime.main_method),
            ("runtime.stop_callback", &runtime.stop_callback),
            ("properties.version_property", &self.properties.version_property),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    message: format!("{} must not be empty", field),
                });
            }
        }

        if runtime.bootstrap_class.contains('.') {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "runtime.bootstrap_class '{}' must use '/' as package separator",
                    runtime.bootstrap_class
                ),
            });
        }

        let signatures = [
            ("runtime.main_signature", &runtime.main_signature),
            ("runtime.stop_callback_signature", &runtime.stop_callback_signature),
        ];
        for (field, sig) in signatures {
            if !is_method_descriptor(sig) {
                return Err(ConfigError::ValidationError {
                    message: format!("{} '{}' is not a method descriptor", field, sig),
                });
            }
        }

        if let Err(e) = regex::Regex::new(&self.agents.pattern) {
            return Err(ConfigError::ValidationError {
                message: format!("agents.pattern '{}' is invalid: {}", self.agents.pattern, e),
            });
        }

        Ok(())
    }
}

/// `(<params>)<return>` with a non-empty return type.
fn is_method_descriptor(sig: &str) -> bool {
    match (sig.strip_prefix('('), sig.find(')')) {
        (Some(_), Some(close)) => close + 1 < sig.len(),
        _ => false,
    }
}
