//! Meta-evaluation: a second-pass judgement of a dimension judge's output.
//!
//! The meta judge does not re-review the document. It sees the dimension
//! verdict, the programmatic flags and only the blocks that verdict cited,
//! and scores the verdict on a fixed six-metric basket. Its response is then
//! guarded so that it can never score above what the flags permit.

mod grounding;
mod guard;
mod metrics;

pub use grounding::{ground_evidence, GroundingReport, ItemCheck, ProgrammaticFlags, NO_EVIDENCE_BLOCKS};
pub use guard::{apply_meta_guards, judge_response, GuardedMeta, MetaError, M6_CLAMP_NOTE};
pub use metrics::{MetaResponse, MetricId, MetricResult, RawMetric, Score};

use serde::{Deserialize, Serialize};

/// Id of the meta judge.
pub const JUDGE_ID: &str = "LaJ";

/// A guarded meta-evaluation of one dimension verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaVerdict {
    pub judge_id: String,
    pub agent_id: String,
    pub dimension: String,
    pub overall: Score,
    /// Exactly six, M1..M6 in order
    pub metrics: Vec<MetricResult>,
    pub flags: ProgrammaticFlags,
    pub raw_output: String,
}

impl MetaVerdict {
    pub fn new(
        agent_id: impl Into<String>,
        dimension: impl Into<String>,
        guarded: GuardedMeta,
        flags: ProgrammaticFlags,
        raw_output: impl Into<String>,
    ) -> Self {
        Self {
            judge_id: JUDGE_ID.to_string(),
            agent_id: agent_id.into(),
            dimension: dimension.into(),
            overall: guarded.overall,
            metrics: guarded.metrics,
            flags,
            raw_output: raw_output.into(),
        }
    }

    /// Parse and guard a raw meta judge completion.
    pub fn from_response(
        agent_id: impl Into<String>,
        dimension: impl Into<String>,
        flags: ProgrammaticFlags,
        raw_output: impl Into<String>,
    ) -> Result<Self, MetaError> {
        let raw_output = raw_output.into();
        let guarded = judge_response(&raw_output, &flags)?;
        Ok(Self::new(agent_id, dimension, guarded, flags, raw_output))
    }
}
