//! Guards applied to the meta judge's parsed response.
//!
//! The programmatic flags set a floor the meta judge cannot argue its way
//! past. Rules, in order:
//!
//! 1. keep exactly one result per metric id M1..M6, in that order; unknown
//!    ids are dropped, the last of duplicate ids wins, a missing id fails
//! 2. M6 FAIL becomes WARN when grounding is clean
//! 3. overall PASS becomes WARN on an invalid id or quote mismatch
//! 4. M2 and M6 PASS become WARN when no evidence was cited

use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use super::grounding::ProgrammaticFlags;
use super::metrics::{MetaResponse, MetricId, MetricResult, RawMetric, Score};
use crate::response::{parse_response, ParseError};
use crate::schema::ResponseSchema;

/// Note attached to M6 when it is lowered from FAIL.
pub const M6_CLAMP_NOTE: &str =
    "No programmatic grounding issues detected; treat as potential overreach rather than hallucination.";

/// Errors from meta-evaluation.
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Meta response is missing metric {0}")]
    MissingMetric(MetricId),

    #[error("Meta response has an invalid score for {metric_id}: {score}")]
    InvalidScore { metric_id: MetricId, score: String },
}

/// Overall score and the six metrics after guarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedMeta {
    pub overall: Score,
    pub metrics: Vec<MetricResult>,
}

impl GuardedMeta {
    pub fn metric(&self, id: MetricId) -> Option<&MetricResult> {
        self.metrics.iter().find(|m| m.metric_id == id)
    }
}

/// Apply the meta guards to a decoded response.
pub fn apply_meta_guards(
    response: MetaResponse,
    flags: &ProgrammaticFlags,
) -> Result<GuardedMeta, MetaError> {
    let mut by_id: BTreeMap<MetricId, MetricResult> = BTreeMap::new();

    for raw in response.metrics {
        let Ok(metric_id) = raw.metric_id.parse::<MetricId>() else {
            tracing::warn!(metric_id = %raw.metric_id, "Dropping unknown metric");
            continue;
        };

        let result = into_result(metric_id, raw)?;
        if by_id.insert(metric_id, result).is_some() {
            tracing::warn!(metric_id = %metric_id, "Duplicate metric; keeping the last");
        }
    }

    let mut metrics = Vec::with_capacity(MetricId::ALL.len());
    for id in MetricId::ALL {
        let metric = by_id.remove(&id).ok_or(MetaError::MissingMetric(id))?;
        metrics.push(metric);
    }

    if flags.grounding_clean() {
        if let Some(m6) = metrics.iter_mut().find(|m| m.metric_id == MetricId::M6) {
            if m6.score == Score::Fail {
                tracing::warn!("M6 lowered from FAIL to WARN: grounding is clean");
                m6.score = Score::Warn;
                m6.notes = M6_CLAMP_NOTE.to_string();
            }
        }
    }

    let mut overall = response.overall;
    if !flags.grounding_clean() && overall == Score::Pass {
        tracing::warn!(
            invalid_evidence_id = flags.invalid_evidence_id,
            quote_mismatch = flags.quote_mismatch,
            "Overall capped at WARN"
        );
        overall = Score::Warn;
    }

    if flags.missing_evidence {
        for metric in metrics
            .iter_mut()
            .filter(|m| matches!(m.metric_id, MetricId::M2 | MetricId::M6))
        {
            if metric.score == Score::Pass {
                tracing::warn!(metric_id = %metric.metric_id, "Raised to WARN: no evidence cited");
            }
            metric.score = metric.score.no_better_than(Score::Warn);
        }
    }

    Ok(GuardedMeta { overall, metrics })
}

fn into_result(metric_id: MetricId, raw: RawMetric) -> Result<MetricResult, MetaError> {
    let score = Score::deserialize(&raw.score).map_err(|_| MetaError::InvalidScore {
        metric_id,
        score: raw.score.to_string(),
    })?;
    let notes = match raw.notes {
        JsonValue::String(notes) => notes,
        _ => String::new(),
    };
    Ok(MetricResult {
        metric_id,
        score,
        notes,
    })
}

/// Parse a raw meta judge completion and guard it.
pub fn judge_response(raw: &str, flags: &ProgrammaticFlags) -> Result<GuardedMeta, MetaError> {
    let response: MetaResponse = parse_response(raw, ResponseSchema::MetaResponse)?;
    apply_meta_guards(response, flags)
}
