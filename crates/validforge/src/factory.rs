//! Validator bootstrap that hides configuration loading.

use std::path::Path;

use tracing::debug;
use validforge_config::{ConfigError, ValidatorConfig};
use validforge_engine::ValidatorBuilder;

/// Configuration file read by [`ValidatorFactory::configure`].
pub const DEFAULT_CONFIG_FILE: &str = "validforge.toml";

/// Entry point for building validators.
pub struct ValidatorFactory;

impl ValidatorFactory {
    /// Builder preloaded with `validforge.toml` from the working directory.
    ///
    /// A missing or unreadable file falls back to the default configuration.
    pub fn configure() -> ValidatorBuilder {
        Self::configure_from(DEFAULT_CONFIG_FILE)
    }

    /// Builder preloaded with the configuration at `path`, or the default
    /// configuration if it cannot be loaded.
    pub fn configure_from(path: impl AsRef<Path>) -> ValidatorBuilder {
        let path = path.as_ref();
        let config = ValidatorConfig::load(path).unwrap_or_else(|err| {
            debug!(event = "config_default", path = %path.display(), reason = %err);
            ValidatorConfig::default()
        });
        ValidatorBuilder::new().with_config(config)
    }

    /// Builder preloaded with the configuration at `path`.
    ///
    /// YAML is used for `.yaml`/`.yml` files, TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns the load error instead of falling back.
    pub fn from_file(path: impl AsRef<Path>) -> Result<ValidatorBuilder, ConfigError> {
        let path = path.as_ref();
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => ValidatorConfig::from_yaml_file(path)?,
            _ => ValidatorConfig::from_toml_file(path)?,
        };
        Ok(ValidatorBuilder::new().with_config(config))
    }
}
