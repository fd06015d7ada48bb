//! Dimension judge output: ratings, cited evidence and uncertainty.
//!
//! These are the types a dimension judge produces. They are plain data;
//! the guard engine reads them and may only raise `uncertainty`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Categorical rating a dimension judge assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rating {
    Good,
    Some,
    Little,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Good => write!(f, "GOOD"),
            Rating::Some => write!(f, "SOME"),
            Rating::Little => write!(f, "LITTLE"),
        }
    }
}

/// Whether a cited quote supports or undermines the dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

/// A claimed verbatim quotation cited to support a rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Citation id, e.g. "Text p03_c01" or "Table p02_t01"
    pub id: String,

    /// Claimed verbatim excerpt from the cited block
    #[serde(default, deserialize_with = "null_as_default")]
    pub quote: String,

    /// Polarity label assigned by the judge
    #[serde(rename = "evidence_type")]
    pub polarity: Polarity,
}

impl EvidenceItem {
    pub fn new(id: impl Into<String>, quote: impl Into<String>, polarity: Polarity) -> Self {
        Self {
            id: id.into(),
            quote: quote.into(),
            polarity,
        }
    }

    pub fn positive(id: impl Into<String>, quote: impl Into<String>) -> Self {
        Self::new(id, quote, Polarity::Positive)
    }

    pub fn negative(id: impl Into<String>, quote: impl Into<String>) -> Self {
        Self::new(id, quote, Polarity::Negative)
    }
}

/// A dimension judge's verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentVerdict {
    pub rating: Rating,

    #[serde(default, deserialize_with = "null_as_default")]
    pub rationale: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub evidence: Vec<EvidenceItem>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub uncertainty: bool,
}

impl AgentVerdict {
    /// Create a verdict with no evidence and no uncertainty.
    pub fn new(rating: Rating, rationale: impl Into<String>) -> Self {
        Self {
            rating,
            rationale: rationale.into(),
            evidence: Vec::new(),
            uncertainty: false,
        }
    }

    /// Add a cited evidence item.
    pub fn with_evidence(mut self, item: EvidenceItem) -> Self {
        self.evidence.push(item);
        self
    }

    /// Set the self-reported uncertainty.
    pub fn with_uncertainty(mut self, uncertainty: bool) -> Self {
        self.uncertainty = uncertainty;
        self
    }

    /// Whether at least one cited item carries the given polarity.
    pub fn has_polarity(&self, polarity: Polarity) -> bool {
        self.evidence.iter().any(|e| e.polarity == polarity)
    }
}

/// Treat an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
