//! Completion providers for lrrit-runtime.
//!
//! Judges see a provider only through [`LlmProvider`]; concrete backends
//! are feature-gated and created from configuration via the
//! [`ProviderRegistry`].
//!
//! ## Security
//!
//! All providers use the [`secrets`] module for credential handling.
//! See [`ApiCredential`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

mod factory;
pub mod secrets;

#[cfg(feature = "anthropic")]
mod anthropic;

#[cfg(feature = "openai")]
mod openai;

#[cfg(test)]
pub(crate) mod scripted;

pub use factory::{ProviderFactory, ProviderRegistry};
pub use secrets::{ApiCredential, CredentialSource};

#[cfg(feature = "anthropic")]
pub use anthropic::{AnthropicProvider, AnthropicProviderFactory};

#[cfg(feature = "openai")]
pub use openai::{OpenAiProvider, OpenAiProviderFactory};

/// Errors from completion providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed provider response: {0}")]
    ParseError(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Settings for one completion request.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub model: String,
    pub max_tokens: u32,

    /// 0.0 for reproducible judgements
    pub temperature: f32,

    /// Transport timeout; the only timeout applied to a judgement
    pub timeout: Duration,

    /// Anthropic-only
    pub prompt_caching: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1500,
            temperature: 0.0,
            timeout: Duration::from_secs(60),
            prompt_caching: false,
        }
    }
}

/// A chat message for completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant"
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A completed chat response.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub model: String,
    pub stop_reason: Option<String>,
}

/// Token usage reported for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,

    /// Anthropic prompt cache reads
    pub cache_read_tokens: u32,

    /// Anthropic prompt cache writes
    pub cache_creation_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// A chat completion backend.
///
/// This is the only place model calls are made. Grounding, guards and
/// meta guards never call it.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Execute a chat completion.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Whether the provider looks usable (credentials present).
    async fn health_check(&self) -> bool;

    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Rough token estimate for a prompt.
    fn estimate_tokens(&self, text: &str) -> u32 {
        // ~4 chars per token
        (text.len() / 4) as u32
    }
}

/// Build the shared HTTP client for the feature-gated providers.
#[cfg(any(feature = "anthropic", feature = "openai"))]
pub(crate) fn http_client() -> Result<&'static reqwest::Client, ProviderError> {
    static CLIENT: std::sync::OnceLock<reqwest::Client> = std::sync::OnceLock::new();

    if let Some(client) = CLIENT.get() {
        return Ok(client);
    }
    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| ProviderError::HttpError(e.to_string()))?;
    Ok(CLIENT.get_or_init(|| client))
}
