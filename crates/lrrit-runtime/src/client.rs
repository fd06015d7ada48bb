//! The single-call completion contract the judges use.

use std::sync::Arc;

use crate::providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError};
use crate::usage::{LlmUsage, UsageTracker};

/// System message sent with every judging call.
pub const SYSTEM_PROMPT: &str = "You are a careful, evidence-grounded evaluator.";

/// Turns a chat provider into `prompt -> response text`, tallying usage.
pub struct CompletionClient {
    provider: Arc<dyn LlmProvider>,
    config: CompletionConfig,
    usage: Arc<UsageTracker>,
}

impl CompletionClient {
    pub fn new(provider: Arc<dyn LlmProvider>, config: CompletionConfig) -> Self {
        Self {
            provider,
            config,
            usage: Arc::new(UsageTracker::new()),
        }
    }

    /// Share a usage tally with other clients.
    pub fn with_usage(mut self, usage: Arc<UsageTracker>) -> Self {
        self.usage = usage;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    pub fn usage(&self) -> LlmUsage {
        self.usage.snapshot()
    }

    /// One completion call. Failures propagate unchanged; there is no retry.
    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let messages = vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];

        tracing::debug!(
            provider = self.provider.name(),
            model = %self.config.model,
            estimated_prompt_tokens = self.provider.estimate_tokens(prompt),
            "Completion request"
        );

        let response = self.provider.complete(messages, &self.config).await?;
        self.usage.record(&response.usage, &response.model);

        tracing::debug!(
            provider = self.provider.name(),
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            stop_reason = ?response.stop_reason,
            "Completion received"
        );

        Ok(response.content)
    }
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}
