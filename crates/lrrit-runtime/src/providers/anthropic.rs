//! Anthropic Messages API provider.

use super::{
    factory::ProviderFactory,
    http_client,
    secrets::{ApiCredential, CredentialSource},
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding the Anthropic API key.
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

/// Anthropic provider. The key is held as an [`ApiCredential`].
pub struct AnthropicProvider {
    credential: ApiCredential,
    base_url: String,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            credential: ApiCredential::new(
                api_key,
                CredentialSource::Programmatic,
                "Anthropic API key",
            ),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, ProviderError> {
        let credential = ApiCredential::from_env(ANTHROPIC_API_KEY_ENV, "Anthropic API key")?;
        Ok(Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Build from provider settings (`api_key`, `base_url`), falling back
    /// to `ANTHROPIC_API_KEY` for the key.
    pub fn from_config(config: &JsonValue) -> Result<Self, ProviderError> {
        let credential = ApiCredential::from_config_or_env(
            config,
            "api_key",
            ANTHROPIC_API_KEY_ENV,
            "Anthropic API key",
        )?;

        let base_url = config["base_url"]
            .as_str()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            credential,
            base_url,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        cache_control: Option<CacheControl>,
    },
}

#[derive(Debug, Serialize)]
struct CacheControl {
    #[serde(rename = "type")]
    type_: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlockResponse>,
    model: String,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlockResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
    #[serde(default)]
    cache_creation_input_tokens: u32,
    #[serde(default)]
    cache_read_input_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

/// Split out the system message; Anthropic takes it as a top-level field.
fn to_request(messages: Vec<ChatMessage>, config: &CompletionConfig) -> AnthropicRequest {
    let mut system = None;
    let mut api_messages = Vec::new();

    for msg in messages {
        if msg.role == "system" {
            system = Some(msg.content);
            continue;
        }
        api_messages.push(AnthropicMessage {
            role: msg.role,
            content: vec![ContentBlock::Text {
                text: msg.content,
                cache_control: config.prompt_caching.then(|| CacheControl {
                    type_: "ephemeral".to_string(),
                }),
            }],
        });
    }

    AnthropicRequest {
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        system,
        messages: api_messages,
        temperature: config.temperature,
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = to_request(messages, config);

        let response = http_client()?
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", self.credential.expose())
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == 401 {
            return Err(ProviderError::AuthError);
        }

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ProviderError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let error_body = response
                .json::<AnthropicError>()
                .await
                .map_err(|e| ProviderError::ParseError(e.to_string()))?;

            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: error_body.error.message,
            });
        }

        let body: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let content = body
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        Ok(CompletionResponse {
            content,
            usage: TokenUsage {
                prompt_tokens: body.usage.input_tokens,
                completion_tokens: body.usage.output_tokens,
                cache_read_tokens: body.usage.cache_read_input_tokens,
                cache_creation_tokens: body.usage.cache_creation_input_tokens,
            },
            model: body.model,
            stop_reason: body.stop_reason,
        })
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Factory for `type: anthropic`.
///
/// Settings: `api_key` (optional, else `ANTHROPIC_API_KEY`), `base_url` (optional).
pub struct AnthropicProviderFactory;

impl ProviderFactory for AnthropicProviderFactory {
    fn provider_type(&self) -> &'static str {
        "anthropic"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        Ok(Arc::new(AnthropicProvider::from_config(config)?))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        if !ApiCredential::is_available(config, "api_key", ANTHROPIC_API_KEY_ENV) {
            return Err(ProviderError::NotConfigured(format!(
                "Anthropic API key required: set 'api_key' in provider settings or {} env",
                ANTHROPIC_API_KEY_ENV
            )));
        }

        if let Some(url) = config["base_url"].as_str() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ProviderError::NotConfigured(
                    "base_url must start with http:// or https://".to_string(),
                ));
            }
        }

        Ok(())
    }

    fn default_config(&self) -> JsonValue {
        serde_json::json!({ "base_url": DEFAULT_BASE_URL })
    }

    fn description(&self) -> &'static str {
        "Anthropic Messages API"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_is_lifted_out() {
        let config = CompletionConfig {
            model: "claude-sonnet-4-5".into(),
            ..CompletionConfig::default()
        };
        let request = to_request(
            vec![
                ChatMessage::system("You are a careful, evidence-grounded evaluator."),
                ChatMessage::user("Rate D4."),
            ],
            &config,
        );

        assert_eq!(
            request.system.as_deref(),
            Some("You are a careful, evidence-grounded evaluator.")
        );
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["temperature"], 0.0);
        assert!(json["messages"][0]["content"][0].get("cache_control").is_none());
    }

    #[test]
    fn test_prompt_caching_marks_user_content() {
        let config = CompletionConfig {
            prompt_caching: true,
            ..CompletionConfig::default()
        };
        let json = serde_json::to_value(to_request(vec![ChatMessage::user("x")], &config)).unwrap();
        assert_eq!(json["messages"][0]["content"][0]["cache_control"]["type"], "ephemeral");
    }

    #[test]
    fn test_from_config_uses_settings() {
        let config = serde_json::json!({
            "api_key": "settings-key",
            "base_url": "https://proxy.internal/v1/"
        });
        let provider = AnthropicProvider::from_config(&config).unwrap();

        assert_eq!(provider.base_url, "https://proxy.internal/v1");
        assert_eq!(provider.credential.source(), CredentialSource::Config);
    }

    #[test]
    fn test_factory_rejects_bad_base_url() {
        let config = serde_json::json!({"api_key": "k", "base_url": "proxy.internal"});
        assert!(AnthropicProviderFactory.validate_config(&config).is_err());
    }

    #[test]
    fn test_api_key_not_in_debug_output() {
        let secret = "sk-ant-review-secret-1234";
        let debug = format!("{:?}", AnthropicProvider::new(secret));
        assert!(!debug.contains(secret));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_health_check_requires_a_key() {
        assert!(AnthropicProvider::new("k").health_check().await);
        assert!(!AnthropicProvider::new("").health_check().await);
    }
}
