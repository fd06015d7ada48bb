//! Token and cost accounting across completion calls.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::providers::TokenUsage;

/// Accumulated usage for a review run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmUsage {
    pub total_tokens: u32,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub llm_calls: u32,

    /// Estimated cost in USD
    pub estimated_cost: f64,

    pub cache_creation_tokens: u32,
    pub cache_read_tokens: u32,
}

impl LlmUsage {
    /// Add one completion's usage.
    pub fn add(&mut self, usage: &TokenUsage, model: &str) {
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
        self.total_tokens += usage.total();
        self.llm_calls += 1;
        self.cache_creation_tokens += usage.cache_creation_tokens;
        self.cache_read_tokens += usage.cache_read_tokens;
        self.estimated_cost += Self::estimate_cost(usage, model);
    }

    /// Usage accrued since `earlier`, a previous snapshot of the same tally.
    pub fn since(&self, earlier: &LlmUsage) -> LlmUsage {
        LlmUsage {
            total_tokens: self.total_tokens.saturating_sub(earlier.total_tokens),
            prompt_tokens: self.prompt_tokens.saturating_sub(earlier.prompt_tokens),
            completion_tokens: self.completion_tokens.saturating_sub(earlier.completion_tokens),
            llm_calls: self.llm_calls.saturating_sub(earlier.llm_calls),
            estimated_cost: (self.estimated_cost - earlier.estimated_cost).max(0.0),
            cache_creation_tokens: self
                .cache_creation_tokens
                .saturating_sub(earlier.cache_creation_tokens),
            cache_read_tokens: self.cache_read_tokens.saturating_sub(earlier.cache_read_tokens),
        }
    }

    fn estimate_cost(usage: &TokenUsage, model: &str) -> f64 {
        // USD per million tokens: input, output, cache write, cache read
        let (input_rate, output_rate, cache_write_rate, cache_read_rate) = match model {
            m if m.contains("gpt-4o-mini") => (0.15, 0.6, 0.0, 0.075),
            m if m.contains("gpt-4o") => (2.5, 10.0, 0.0, 1.25),
            m if m.contains("gpt-4.1-mini") => (0.4, 1.6, 0.0, 0.1),
            m if m.contains("sonnet-4-5") => (3.0, 15.0, 3.75, 0.3),
            m if m.contains("haiku-4-5") => (1.0, 5.0, 1.25, 0.1),
            m if m.contains("opus-4-5") => (5.0, 25.0, 6.25, 0.5),
            _ => (2.5, 10.0, 0.0, 0.0),
        };

        let per_million = |tokens: u32, rate: f64| tokens as f64 / 1_000_000.0 * rate;
        per_million(usage.prompt_tokens, input_rate)
            + per_million(usage.completion_tokens, output_rate)
            + per_million(usage.cache_creation_tokens, cache_write_rate)
            + per_million(usage.cache_read_tokens, cache_read_rate)
    }
}

/// Usage tally shared by every judge that uses one client.
#[derive(Debug, Default)]
pub struct UsageTracker {
    usage: Mutex<LlmUsage>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, usage: &TokenUsage, model: &str) {
        self.usage.lock().add(usage, model);
    }

    pub fn snapshot(&self) -> LlmUsage {
        self.usage.lock().clone()
    }

    pub fn reset(&self) {
        *self.usage.lock() = LlmUsage::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(prompt: u32, completion: u32) -> TokenUsage {
        TokenUsage {
            prompt_tokens: prompt,
            completion_tokens: completion,
            ..TokenUsage::default()
        }
    }

    #[test]
    fn test_add_accumulates_calls_and_tokens() {
        let mut total = LlmUsage::default();
        total.add(&usage(1000, 200), "gpt-4o-mini");
        total.add(&usage(500, 100), "gpt-4o-mini");

        assert_eq!(total.llm_calls, 2);
        assert_eq!(total.prompt_tokens, 1500);
        assert_eq!(total.total_tokens, 1800);
    }

    #[test]
    fn test_cost_uses_model_rates() {
        let mut mini = LlmUsage::default();
        mini.add(&usage(1_000_000, 0), "gpt-4o-mini");
        assert!((mini.estimated_cost - 0.15).abs() < 1e-9);

        let mut sonnet = LlmUsage::default();
        sonnet.add(&usage(0, 1_000_000), "claude-sonnet-4-5");
        assert!((sonnet.estimated_cost - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_since_reports_the_delta() {
        let tracker = UsageTracker::new();
        tracker.record(&usage(100, 10), "gpt-4o");
        let before = tracker.snapshot();
        tracker.record(&usage(300, 30), "gpt-4o");

        let delta = tracker.snapshot().since(&before);
        assert_eq!(delta.llm_calls, 1);
        assert_eq!(delta.total_tokens, 330);
    }

    #[test]
    fn test_reset_clears_the_tally() {
        let tracker = UsageTracker::new();
        tracker.record(&usage(100, 10), "gpt-4o");
        tracker.reset();
        assert_eq!(tracker.snapshot(), LlmUsage::default());
    }
}
