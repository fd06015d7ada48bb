//! Review orchestration across dimensions.
//!
//! The orchestrator implements:
//! - Parallel fan-out to every configured dimension judge
//! - Meta-evaluation of each judge's output as soon as it is available
//! - Per-dimension failure isolation: one failed judgement never aborts the review
//! - Outcomes reported in configured order

use chrono::{DateTime, Utc};
use futures::future::join_all;
use lrrit_core::{DimensionId, EvidenceStore, MetaVerdict};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::agents::{AgentRun, DimensionAgent, DimensionJudge, MetaEvaluator};
use crate::client::CompletionClient;
use crate::config::{ConfigError, RuntimeConfig};
use crate::providers::{LlmProvider, ProviderError, ProviderRegistry};
use crate::usage::{LlmUsage, UsageTracker};

/// Errors setting up a review.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No dimension judges registered")]
    NoJudges,
}

/// What happened for one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DimensionOutcome {
    /// Judged and meta-evaluated
    Completed { run: AgentRun, meta: MetaVerdict },

    /// Judged, but the meta-evaluation failed
    MetaFailed { run: AgentRun, error: String },

    /// The judgement itself failed
    JudgeFailed {
        dimension: DimensionId,
        error: String,
    },
}

impl DimensionOutcome {
    pub fn run(&self) -> Option<&AgentRun> {
        match self {
            DimensionOutcome::Completed { run, .. } | DimensionOutcome::MetaFailed { run, .. } => {
                Some(run)
            }
            DimensionOutcome::JudgeFailed { .. } => None,
        }
    }

    pub fn meta(&self) -> Option<&MetaVerdict> {
        match self {
            DimensionOutcome::Completed { meta, .. } => Some(meta),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, DimensionOutcome::Completed { .. })
    }
}

/// A full review of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewReport {
    pub document_id: String,
    pub store_hash: String,

    /// One per judge, in registration order
    pub outcomes: Vec<DimensionOutcome>,

    /// Completion usage for this review
    pub usage: LlmUsage,

    pub generated_at: DateTime<Utc>,
}

/// Runs the dimension judges and meta-evaluations for a document.
///
/// # Architecture
/// - Fan-out: all judges run concurrently; each judge's meta-evaluation
///   follows its own judgement without waiting for the others
/// - Isolation: judges share only the read-only store
/// - No retry or timeout policy beyond the transport timeout
pub struct ReviewOrchestrator {
    judges: Vec<Arc<dyn DimensionJudge>>,
    meta: MetaEvaluator,
    usage: Arc<UsageTracker>,
}

impl ReviewOrchestrator {
    /// Build judges for every configured dimension on one provider.
    pub fn from_config(
        config: &RuntimeConfig,
        registry: &ProviderRegistry,
    ) -> Result<Self, RuntimeError> {
        let provider = registry.create(&config.provider.kind, &config.provider.settings)?;
        ReviewOrchestratorBuilder::new()
            .provider(provider)
            .config(config.clone())
            .build()
    }

    /// Load a YAML run configuration and build from it.
    pub fn from_config_file(
        path: impl AsRef<std::path::Path>,
        registry: &ProviderRegistry,
    ) -> Result<Self, RuntimeError> {
        let config = RuntimeConfig::from_file(path)?;
        Self::from_config(&config, registry)
    }

    pub fn builder() -> ReviewOrchestratorBuilder {
        ReviewOrchestratorBuilder::new()
    }

    pub fn dimensions(&self) -> Vec<DimensionId> {
        self.judges.iter().map(|j| j.dimension()).collect()
    }

    /// Review a document.
    ///
    /// Usage in the report covers only this call, provided reviews on the
    /// same orchestrator do not overlap.
    pub async fn review(&self, store: &EvidenceStore) -> ReviewReport {
        let before = self.usage.snapshot();

        tracing::info!(
            document_id = %store.document_id(),
            store_hash = %store.store_hash(),
            dimensions = self.judges.len(),
            "Review started"
        );

        let outcomes = join_all(
            self.judges
                .iter()
                .map(|judge| self.review_dimension(judge.as_ref(), store)),
        )
        .await;

        let completed = outcomes.iter().filter(|o| o.is_completed()).count();
        tracing::info!(
            document_id = %store.document_id(),
            completed,
            failed = outcomes.len() - completed,
            "Review finished"
        );

        ReviewReport {
            document_id: store.document_id().to_string(),
            store_hash: store.store_hash().to_string(),
            outcomes,
            usage: self.usage.snapshot().since(&before),
            generated_at: Utc::now(),
        }
    }

    async fn review_dimension(
        &self,
        judge: &dyn DimensionJudge,
        store: &EvidenceStore,
    ) -> DimensionOutcome {
        let dimension = judge.dimension();

        let run = match judge.judge(store).await {
            Ok(run) => run,
            Err(e) => {
                tracing::warn!(dimension = %dimension, error = %e, "Dimension judgement failed");
                return DimensionOutcome::JudgeFailed {
                    dimension,
                    error: e.to_string(),
                };
            }
        };

        match self.meta.evaluate(store, &run, judge.definition()).await {
            Ok(meta) => DimensionOutcome::Completed { run, meta },
            Err(e) => {
                tracing::warn!(dimension = %dimension, error = %e, "Meta-evaluation failed");
                DimensionOutcome::MetaFailed {
                    run,
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Builder for [`ReviewOrchestrator`].
pub struct ReviewOrchestratorBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    config: RuntimeConfig,
    judges: Vec<Arc<dyn DimensionJudge>>,
}

impl ReviewOrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            config: RuntimeConfig::default(),
            judges: Vec::new(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a custom judge. When any are registered, `config.dimensions`
    /// is ignored and only these judges run.
    pub fn judge(mut self, judge: Arc<dyn DimensionJudge>) -> Self {
        self.judges.push(judge);
        self
    }

    pub fn build(self) -> Result<ReviewOrchestrator, RuntimeError> {
        let provider = self
            .provider
            .ok_or_else(|| RuntimeError::ProviderNotConfigured("No provider set".to_string()))?;

        let usage = Arc::new(UsageTracker::new());
        let client = Arc::new(
            CompletionClient::new(provider, self.config.completion_config())
                .with_usage(usage.clone()),
        );

        let judges = if self.judges.is_empty() {
            self.config
                .dimensions
                .iter()
                .map(|&dimension| {
                    Arc::new(
                        DimensionAgent::new(dimension, client.clone())
                            .with_definition(self.config.definition(dimension)),
                    ) as Arc<dyn DimensionJudge>
                })
                .collect()
        } else {
            self.judges
        };

        if judges.is_empty() {
            return Err(RuntimeError::NoJudges);
        }

        let meta = MetaEvaluator::new(client)
            .with_strict_quote_check(self.config.strict_quote_check);

        Ok(ReviewOrchestrator {
            judges,
            meta,
            usage,
        })
    }
}

impl Default for ReviewOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
