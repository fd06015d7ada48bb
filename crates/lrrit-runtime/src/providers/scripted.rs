//! In-process provider for tests: replies are computed from the prompt.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage};

type Reply = dyn Fn(&str) -> Result<String, ProviderError> + Send + Sync;

pub(crate) struct ScriptedProvider {
    reply: Box<Reply>,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    /// Reply with the result of `reply(user_prompt)`.
    pub(crate) fn new(
        reply: impl Fn(&str) -> Result<String, ProviderError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            reply: Box::new(reply),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn constant(reply: impl Into<String>) -> Self {
        let reply = reply.into();
        Self::new(move |_| Ok(reply.clone()))
    }

    /// Every message list received, in call order.
    pub(crate) fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().push(messages);

        let content = (self.reply)(&prompt)?;
        Ok(CompletionResponse {
            usage: TokenUsage {
                prompt_tokens: self.estimate_tokens(&prompt),
                completion_tokens: self.estimate_tokens(&content),
                ..TokenUsage::default()
            },
            content,
            model: config.model.clone(),
            stop_reason: Some("stop".to_string()),
        })
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
