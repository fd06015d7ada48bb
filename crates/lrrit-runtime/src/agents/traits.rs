//! Dimension judge trait and common types.

use async_trait::async_trait;
use lrrit_core::{DimensionId, EvidenceStore, GuardedVerdict, MetaError, ParseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::providers::ProviderError;

/// Errors from a judging call.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Completion failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Judge response rejected: {0}")]
    Parse(#[from] ParseError),

    #[error("Meta-evaluation rejected: {0}")]
    Meta(#[from] MetaError),
}

/// One dimension judge's guarded output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRun {
    /// Dimension id, e.g. "D4"
    pub agent_id: String,

    /// Dimension display name
    pub dimension: String,

    pub verdict: GuardedVerdict,

    /// Unparsed completion text
    pub raw_output: String,
}

impl AgentRun {
    /// The judge output as shown to the meta judge.
    ///
    /// Guard findings and the raw completion are left out; the verdict
    /// fields appear as the judge returned them, with guard escalation
    /// applied to `uncertainty`.
    pub fn agent_output(&self) -> serde_json::Value {
        let verdict = &self.verdict.verdict;
        serde_json::json!({
            "agent_id": self.agent_id,
            "dimension": self.dimension,
            "rating": verdict.rating,
            "rationale": verdict.rationale,
            "evidence": verdict.evidence,
            "uncertainty": verdict.uncertainty,
        })
    }
}

/// A judge for one review dimension.
///
/// Judges share nothing mutable: each reads the immutable store and makes
/// its own completion call, so any number can run concurrently.
#[async_trait]
pub trait DimensionJudge: Send + Sync {
    fn dimension(&self) -> DimensionId;

    /// Definition the judge works from; the meta judge is shown the same text.
    fn definition(&self) -> &str;

    /// Rate the dimension over the whole store.
    async fn judge(&self, store: &EvidenceStore) -> Result<AgentRun, AgentError>;
}
