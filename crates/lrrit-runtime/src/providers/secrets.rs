//! Credential handling for completion providers.
//!
//! Credentials are wrapped in [`SecretString`] as soon as they are read, so
//! they cannot reach a log line or a serialized review report through
//! `Debug` or `Display`.
//!
//! ```ignore
//! let cred = ApiCredential::from_config_or_env(&settings, "api_key", "OPENAI_API_KEY", "OpenAI API key")?;
//! request.bearer_auth(cred.expose());
//! ```

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use std::fmt;

use super::ProviderError;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Provider settings in the run configuration
    Config,
    Environment,
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// An API key that prints as `[REDACTED]`.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load from an environment variable.
    pub fn from_env(env_var: &str, name: &'static str) -> Result<Self, ProviderError> {
        std::env::var(env_var)
            .map(|v| Self::new(v, CredentialSource::Environment, name))
            .map_err(|_| {
                ProviderError::NotConfigured(format!(
                    "{} not set: configure '{}' environment variable",
                    name, env_var
                ))
            })
    }

    /// Load from provider settings, falling back to an environment variable.
    ///
    /// A key present in the settings always wins over the environment.
    pub fn from_config_or_env(
        config: &JsonValue,
        config_key: &str,
        env_var: &str,
        name: &'static str,
    ) -> Result<Self, ProviderError> {
        if let Some(value) = config[config_key].as_str() {
            return Ok(Self::new(value, CredentialSource::Config, name));
        }

        if let Ok(value) = std::env::var(env_var) {
            return Ok(Self::new(value, CredentialSource::Environment, name));
        }

        Err(ProviderError::NotConfigured(format!(
            "{} required: set '{}' in provider settings or {} environment variable",
            name, config_key, env_var
        )))
    }

    /// Whether a credential could be loaded, without loading it.
    pub fn is_available(config: &JsonValue, config_key: &str, env_var: &str) -> bool {
        config[config_key].as_str().is_some() || std::env::var(env_var).is_ok()
    }

    /// The raw value. Call only where the key is sent, never store the result.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "sk-judge-secret-0042";

    #[test]
    fn test_credential_redacted_in_debug_and_display() {
        let cred = ApiCredential::new(SECRET, CredentialSource::Config, "Judge API key");

        let debug = format!("{:?}", cred);
        let display = format!("{}", cred);
        assert!(!debug.contains(SECRET));
        assert!(!display.contains(SECRET));
        assert!(debug.contains("[REDACTED]"));
        assert_eq!(display, "Judge API key from config [REDACTED]");
    }

    #[test]
    fn test_expose_returns_the_value() {
        let cred = ApiCredential::new(SECRET, CredentialSource::Programmatic, "Judge API key");
        assert_eq!(cred.expose(), SECRET);
        assert!(!cred.is_empty());
    }

    #[test]
    fn test_settings_take_precedence_over_environment() {
        std::env::set_var("LRRIT_TEST_KEY_PRIORITY", "env-key");
        let settings = serde_json::json!({"api_key": "settings-key"});

        let cred = ApiCredential::from_config_or_env(
            &settings,
            "api_key",
            "LRRIT_TEST_KEY_PRIORITY",
            "Test key",
        )
        .unwrap();
        assert_eq!(cred.expose(), "settings-key");
        assert_eq!(cred.source(), CredentialSource::Config);

        std::env::remove_var("LRRIT_TEST_KEY_PRIORITY");
    }

    #[test]
    fn test_falls_back_to_environment() {
        std::env::set_var("LRRIT_TEST_KEY_FALLBACK", "env-key");

        let cred = ApiCredential::from_config_or_env(
            &serde_json::json!({}),
            "api_key",
            "LRRIT_TEST_KEY_FALLBACK",
            "Test key",
        )
        .unwrap();
        assert_eq!(cred.expose(), "env-key");
        assert_eq!(cred.source(), CredentialSource::Environment);

        std::env::remove_var("LRRIT_TEST_KEY_FALLBACK");
    }

    #[test]
    fn test_missing_credential_names_both_sources() {
        let err = ApiCredential::from_config_or_env(
            &serde_json::json!({}),
            "api_key",
            "LRRIT_TEST_KEY_ABSENT_9137",
            "Test key",
        )
        .unwrap_err()
        .to_string();

        assert!(err.contains("api_key"));
        assert!(err.contains("LRRIT_TEST_KEY_ABSENT_9137"));
        assert!(!ApiCredential::is_available(
            &serde_json::json!({}),
            "api_key",
            "LRRIT_TEST_KEY_ABSENT_9137"
        ));
    }
}
