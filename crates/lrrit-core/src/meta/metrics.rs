//! The fixed metric basket scored by the meta-evaluator.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

use crate::verdict::null_as_default;

/// Categorical meta-evaluation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Score {
    Pass,
    Warn,
    Fail,
}

impl Score {
    fn severity(self) -> u8 {
        match self {
            Score::Pass => 0,
            Score::Warn => 1,
            Score::Fail => 2,
        }
    }

    /// This score, or `ceiling` if this one is better.
    pub fn no_better_than(self, ceiling: Score) -> Score {
        if self.severity() < ceiling.severity() {
            ceiling
        } else {
            self
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Pass => write!(f, "PASS"),
            Score::Warn => write!(f, "WARN"),
            Score::Fail => write!(f, "FAIL"),
        }
    }
}

/// Metric ids, in the order they are always reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricId {
    M1,
    M2,
    M3,
    M4,
    M5,
    M6,
}

impl MetricId {
    pub const ALL: [MetricId; 6] = [
        MetricId::M1,
        MetricId::M2,
        MetricId::M3,
        MetricId::M4,
        MetricId::M5,
        MetricId::M6,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricId::M1 => "M1",
            MetricId::M2 => "M2",
            MetricId::M3 => "M3",
            MetricId::M4 => "M4",
            MetricId::M5 => "M5",
            MetricId::M6 => "M6",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MetricId::M1 => "Rubric Fidelity",
            MetricId::M2 => "Evidence Grounding",
            MetricId::M3 => "Reasoning Quality & Internal Coherence",
            MetricId::M4 => "Values Alignment (PSIRF/LRRIT)",
            MetricId::M5 => "Transparency & Uncertainty Handling",
            MetricId::M6 => "Hallucination Screening",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        MetricId::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or(())
    }
}

/// One scored metric in a guarded meta verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricResult {
    pub metric_id: MetricId,
    pub score: Score,
    pub notes: String,
}

/// A metric entry as returned by the meta judge, before id checking.
///
/// Score and notes stay untyped until the id is known to be in the basket,
/// so an extra entry the guards will drop cannot fail the decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawMetric {
    pub metric_id: String,
    #[serde(default)]
    pub score: JsonValue,
    #[serde(default)]
    pub notes: JsonValue,
}

/// The meta judge's decoded response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetaResponse {
    pub overall: Score,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: Vec<RawMetric>,
}
