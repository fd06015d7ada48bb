//! # lrrit-runtime
//!
//! Completion-backed judging for LRRIT reviews.
//!
//! This crate makes the model calls: one judgement per review dimension,
//! then one meta-evaluation of each judgement. Everything between the
//! calls (structure recovery, schema checks, guards, evidence grounding
//! and meta guards) is done by the deterministic `lrrit-core`.
//!
//! ## Flow per dimension
//!
//! 1. The dimension judge sees the whole evidence store and returns a rating
//!    with cited quotes
//! 2. Guards escalate uncertainty where the rating and evidence disagree
//! 3. Citations are resolved and quotes verified, without a model
//! 4. The meta judge sees only the cited blocks and scores the judgement
//! 5. Meta guards cap that score by what grounding found
//!
//! Dimensions run concurrently and fail independently.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lrrit_runtime::{ProviderRegistry, ReviewOrchestrator, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_file("review.yaml")?;
//! let orchestrator = ReviewOrchestrator::from_config(&config, &ProviderRegistry::with_defaults())?;
//! let report = orchestrator.review(&store).await;
//! ```

pub mod agents;
pub mod client;
pub mod config;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod usage;

pub use agents::{AgentError, AgentRun, DimensionAgent, DimensionJudge, MetaEvaluator};
pub use client::{CompletionClient, SYSTEM_PROMPT};
pub use config::{ConfigError, ProviderConfig, RuntimeConfig};
pub use orchestrator::{
    DimensionOutcome, ReviewOrchestrator, ReviewOrchestratorBuilder, ReviewReport, RuntimeError,
};
pub use providers::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError,
    ProviderFactory, ProviderRegistry, TokenUsage,
};
pub use usage::{LlmUsage, UsageTracker};
