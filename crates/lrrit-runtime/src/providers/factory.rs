//! Provider factories, so the run configuration can name a backend by type.
//!
//! ```ignore
//! let registry = ProviderRegistry::with_defaults();
//! let provider = registry.create("openai", &settings)?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::{LlmProvider, ProviderError};

/// Creates providers of one type from JSON settings.
pub trait ProviderFactory: Send + Sync {
    /// Type name used in configuration, e.g. "openai".
    fn provider_type(&self) -> &'static str;

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError>;

    /// Check settings without creating a provider.
    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError>;

    fn default_config(&self) -> JsonValue {
        serde_json::json!({})
    }

    fn description(&self) -> &'static str {
        "Completion provider"
    }
}

/// Provider factories by type name.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<String, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any with the same type.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factories
            .insert(factory.provider_type().to_string(), factory);
    }

    pub fn create(
        &self,
        provider_type: &str,
        config: &JsonValue,
    ) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        let factory = self.factories.get(provider_type).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "Unknown provider type: '{}'. Available: {:?}",
                provider_type,
                self.available_types()
            ))
        })?;
        factory.validate_config(config)?;
        factory.create(config)
    }

    pub fn validate(&self, provider_type: &str, config: &JsonValue) -> Result<(), ProviderError> {
        self.factories
            .get(provider_type)
            .ok_or_else(|| {
                ProviderError::NotConfigured(format!("Unknown provider type: '{}'", provider_type))
            })?
            .validate_config(config)
    }

    pub fn available_types(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    pub fn has_provider(&self, provider_type: &str) -> bool {
        self.factories.contains_key(provider_type)
    }

    pub fn default_config(&self, provider_type: &str) -> Option<JsonValue> {
        self.factories
            .get(provider_type)
            .map(|f| f.default_config())
    }

    /// A registry with every provider compiled into this build.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "anthropic")]
        registry.register(Arc::new(super::AnthropicProviderFactory));
        #[cfg(feature = "openai")]
        registry.register(Arc::new(super::OpenAiProviderFactory));
        registry
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.available_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::scripted::ScriptedProvider;

    struct ScriptedFactory;

    impl ProviderFactory for ScriptedFactory {
        fn provider_type(&self) -> &'static str {
            "scripted"
        }

        fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
            let reply = config["reply"].as_str().unwrap_or("{}").to_string();
            Ok(Arc::new(ScriptedProvider::constant(reply)))
        }

        fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
            match config.get("reply") {
                Some(JsonValue::String(_)) | None => Ok(()),
                Some(_) => Err(ProviderError::NotConfigured("reply must be a string".into())),
            }
        }
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(ScriptedFactory));

        assert!(registry.has_provider("scripted"));
        assert_eq!(registry.available_types(), vec!["scripted"]);

        let provider = registry
            .create("scripted", &serde_json::json!({"reply": "{}"}))
            .unwrap();
        assert_eq!(provider.name(), "scripted");
    }

    #[test]
    fn test_create_validates_settings_first() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(ScriptedFactory));

        let result = registry.create("scripted", &serde_json::json!({"reply": 7}));
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn test_unknown_provider_lists_available() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(ScriptedFactory));

        match registry.create("gemini", &serde_json::json!({})) {
            Err(ProviderError::NotConfigured(msg)) => {
                assert!(msg.contains("Unknown provider type: 'gemini'"));
                assert!(msg.contains("scripted"));
            }
            other => panic!("expected NotConfigured, got {:?}", other.map(|p| p.name().to_string())),
        }
        assert!(registry.validate("gemini", &serde_json::json!({})).is_err());
    }
}
