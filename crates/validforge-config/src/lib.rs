//! Configuration system for ValidForge.
//!
//! Load validator configuration from TOML or YAML files to control
//! fail-fast behavior, null root handling and named group sequences
//! without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use validforge_config::{NullRootPolicy, ValidatorConfig};
//!
//! let config = ValidatorConfig::from_toml_str(r#"
//!     fail_fast = true
//!     null_root = "tolerate"
//!
//!     [[group_sequences]]
//!     name = "Checkout"
//!     groups = ["Basic", "Billing"]
//! "#).unwrap();
//!
//! assert!(config.fail_fast);
//! assert_eq!(config.null_root, NullRootPolicy::Tolerate);
//! assert_eq!(config.group_sequences.len(), 1);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use validforge_config::ValidatorConfig;
//!
//! let config = ValidatorConfig::load("validforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use validforge_core::{GroupId, GroupSequence};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main validator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidatorConfig {
    /// Stop at the first violation.
    #[serde(default)]
    pub fail_fast: bool,

    /// How a null root value is handled.
    #[serde(default)]
    pub null_root: NullRootPolicy,

    /// Named group sequences.
    #[serde(default)]
    pub group_sequences: Vec<GroupSequenceConfig>,
}

impl ValidatorConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML or
    /// declares malformed group sequences.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!(
            event = "config_loaded",
            path = %path.display(),
            format = "toml",
            group_sequences = config.group_sequences.len(),
        );
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.check()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&contents)?;
        info!(
            event = "config_loaded",
            path = %path.display(),
            format = "yaml",
            group_sequences = config.group_sequences.len(),
        );
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.check()?;
        Ok(config)
    }

    /// Enables or disables fail-fast mode.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Sets the null root policy.
    pub fn with_null_root(mut self, policy: NullRootPolicy) -> Self {
        self.null_root = policy;
        self
    }

    /// Adds a named group sequence.
    pub fn with_group_sequence<I, S>(mut self, name: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_sequences.push(GroupSequenceConfig {
            name: name.into(),
            groups: groups.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Returns the configured sequences as core group sequences.
    pub fn sequences(&self) -> Vec<GroupSequence> {
        self.group_sequences
            .iter()
            .map(GroupSequenceConfig::to_sequence)
            .collect()
    }

    // Cycles between sequences are detected when the engine registers them.
    fn check(&self) -> Result<(), ConfigError> {
        for seq in &self.group_sequences {
            if seq.name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "group sequence name must not be blank".to_string(),
                ));
            }
            if seq.groups.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "group sequence '{}' has no groups",
                    seq.name
                )));
            }
        }
        Ok(())
    }
}

/// Handling of a null root value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NullRootPolicy {
    /// Fail the call with a null root error.
    #[default]
    Reject,

    /// Return an empty result.
    Tolerate,
}

/// Named group sequence configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupSequenceConfig {
    /// Name under which the sequence is requested.
    pub name: String,

    /// Member groups in evaluation order.
    pub groups: Vec<String>,
}

impl GroupSequenceConfig {
    pub fn to_sequence(&self) -> GroupSequence {
        GroupSequence::new(
            GroupId::new(self.name.clone()),
            self.groups.iter().map(|g| GroupId::new(g.clone())),
        )
    }
}
