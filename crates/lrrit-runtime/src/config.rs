//! Run configuration for a review.
//!
//! ```yaml
//! provider:
//!   type: openai
//!   settings:
//!     base_url: https://api.openai.com/v1
//! model: gpt-4o-mini
//! max_tokens: 1500
//! temperature: 0.0
//! timeout: 60s
//! strict_quote_check: true
//! dimensions: [D1, D2, D3, D4, D5]
//! definitions:
//!   D3: "Learning actions: specific, owned and linked to contributory factors."
//! ```
//!
//! Every field is optional; omitted fields take the defaults above.

use lrrit_core::DimensionId;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::providers::CompletionConfig;

/// Errors loading a run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which completion backend to use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Registered provider type, e.g. "openai" or "anthropic"
    #[serde(rename = "type")]
    pub kind: String,

    /// Provider-specific settings, passed to the provider factory as JSON
    #[serde(default = "empty_object")]
    pub settings: JsonValue,
}

fn empty_object() -> JsonValue {
    JsonValue::Object(Default::default())
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: "openai".to_string(),
            settings: empty_object(),
        }
    }
}

/// Configuration for one review run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub provider: ProviderConfig,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,

    /// Per-call transport timeout, e.g. "30s" or "2m"
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,

    /// Verify quotes against their cited blocks before meta-evaluation
    pub strict_quote_check: bool,

    /// Dimensions to judge, in report order
    pub dimensions: Vec<DimensionId>,

    /// Replacement definitions for built-in dimensions
    pub definitions: BTreeMap<DimensionId, String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let completion = CompletionConfig::default();
        Self {
            provider: ProviderConfig::default(),
            model: completion.model,
            max_tokens: completion.max_tokens,
            temperature: completion.temperature,
            timeout: completion.timeout,
            strict_quote_check: true,
            dimensions: DimensionId::ALL[..5].to_vec(),
            definitions: BTreeMap::new(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Definition the judges of `dimension` work from.
    pub fn definition(&self, dimension: DimensionId) -> &str {
        self.definitions
            .get(&dimension)
            .map(String::as_str)
            .unwrap_or_else(|| dimension.definition())
    }

    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
            prompt_caching: self.provider.settings["prompt_caching"]
                .as_bool()
                .unwrap_or(false),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.kind.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.type is empty".to_string()));
        }
        if !self.provider.settings.is_object() {
            return Err(ConfigError::Invalid(
                "provider.settings must be a mapping".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model is empty".to_string()));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid("max_tokens must be positive".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature {} outside 0.0..=2.0",
                self.temperature
            )));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be positive".to_string()));
        }
        if self.dimensions.is_empty() {
            return Err(ConfigError::Invalid("no dimensions selected".to_string()));
        }

        let mut seen = BTreeSet::new();
        for dimension in &self.dimensions {
            if !seen.insert(dimension) {
                return Err(ConfigError::Invalid(format!(
                    "dimension {} listed twice",
                    dimension
                )));
            }
        }

        if let Some((dimension, _)) = self.definitions.iter().find(|(_, d)| d.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "definition for {} is empty",
                dimension
            )));
        }

        Ok(())
    }
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(text.trim()).map_err(serde::de::Error::custom)
    }
}
