//! Review dimensions judged by the dimension agents.
//!
//! Each dimension is one independently scored axis of the LRRIT rubric.
//! The ids are stable wire identifiers (`"D1"`..`"D8"`) and double as agent ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A rubric dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DimensionId {
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
    D8,
}

impl DimensionId {
    /// All dimensions in rubric order.
    pub const ALL: [DimensionId; 8] = [
        DimensionId::D1,
        DimensionId::D2,
        DimensionId::D3,
        DimensionId::D4,
        DimensionId::D5,
        DimensionId::D6,
        DimensionId::D7,
        DimensionId::D8,
    ];

    /// Wire id, also used as the judging agent's id.
    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionId::D1 => "D1",
            DimensionId::D2 => "D2",
            DimensionId::D3 => "D3",
            DimensionId::D4 => "D4",
            DimensionId::D5 => "D5",
            DimensionId::D6 => "D6",
            DimensionId::D7 => "D7",
            DimensionId::D8 => "D8",
        }
    }

    /// Human-readable dimension name.
    pub fn name(&self) -> &'static str {
        match self {
            DimensionId::D1 => "Compassionate engagement with people affected",
            DimensionId::D2 => "Systems approach to contributory factors",
            DimensionId::D3 => "Quality and appropriateness of learning actions",
            DimensionId::D4 => "Blame language avoided",
            DimensionId::D5 => "Local rationality",
            DimensionId::D6 => "Hindsight bias and counterfactual certainty avoided",
            DimensionId::D7 => "Improvement actions",
            DimensionId::D8 => "Communication quality and usability",
        }
    }

    /// Short definition of what a judge of this dimension should assess.
    pub fn definition(&self) -> &'static str {
        match self {
            DimensionId::D1 => "Compassionate engagement with people affected: assess evidence of empathy, communication, support, duty of candour tone; avoid purely clinical narration.",
            DimensionId::D2 => "Systems approach to contributory factors: focus on system conditions and interactions, not individual blame; identify latent factors and work-as-done.",
            DimensionId::D3 => "Quality and appropriateness of learning actions: actions should be specific, feasible, risk-relevant, and linked to contributory factors; avoid safety clutter.",
            DimensionId::D4 => "Blame language avoided: avoid person-focused blame; prefer neutral/system framing; flag person-cues/blame cues where present.",
            DimensionId::D5 => "Local rationality: explain why actions made sense at the time given information/constraints; avoid counterfactual outcome arguments.",
            DimensionId::D6 => "Avoid hindsight bias/counterfactual certainty: be cautious about outcome attribution; recognise uncertainty; avoid definitive unsupported counterfactual claims.",
            DimensionId::D7 => "Improvement actions: system-focused, evidence-informed, collaboratively developed, with ownership/monitoring; avoid generic compliance-heavy actions.",
            DimensionId::D8 => "Communication quality/usability: clear structure, readable narrative, jargon managed, learning/actions easy to extract.",
        }
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known dimension id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown dimension: '{0}' (expected D1..D8)")]
pub struct UnknownDimension(pub String);

impl FromStr for DimensionId {
    type Err = UnknownDimension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DimensionId::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownDimension(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimension_ids() {
        assert_eq!("D4".parse::<DimensionId>().unwrap(), DimensionId::D4);
        assert_eq!(" d5 ".parse::<DimensionId>().unwrap(), DimensionId::D5);
        assert!("D9".parse::<DimensionId>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_ids() {
        let json = serde_json::to_string(&DimensionId::D2).unwrap();
        assert_eq!(json, "\"D2\"");
    }

    #[test]
    fn test_every_dimension_has_a_definition() {
        for dimension in DimensionId::ALL {
            assert!(!dimension.name().is_empty());
            assert!(dimension.definition().len() > 40, "{} definition too short", dimension);
        }
    }
}
