//! Cue-based guard engine.
//!
//! Guards are deterministic, model-free checks of a dimension judge's
//! verdict. The only thing a guard may do is escalate `uncertainty` from
//! `false` to `true`; rating, rationale and evidence polarity are never
//! touched. Every rule that fires is recorded as a [`GuardFinding`] so the
//! escalation can be audited.
//!
//! Rules are data: a [`GuardTable`] maps each dimension to its rules, and
//! the generic rules R1 to R3 run first for every dimension.
//!
//! | Dimension | Rules |
//! |-----------|-------|
//! | all | R1 auditability, R2 GOOD needs positive, R3 LITTLE needs negative |
//! | D1 | SOME needs positive |
//! | D4 | negative items need blame or person attribution |
//! | D5 | positives need contemporaneous reasoning, negatives need hindsight judgement |

mod blame;
mod compassion;
pub mod cues;
mod generic;
mod local_rationality;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::dimension::DimensionId;
use crate::verdict::{AgentVerdict, EvidenceItem};

/// The condition under which a rule escalates.
#[derive(Clone, Copy)]
pub enum Predicate {
    /// Evaluated once against the whole verdict
    Verdict(fn(&AgentVerdict) -> bool),
    /// Evaluated against each evidence item in turn
    Item(fn(&EvidenceItem) -> bool),
}

/// A single escalation rule.
#[derive(Clone, Copy)]
pub struct GuardRule {
    /// Stable id recorded in findings, e.g. "R1-AUDITABILITY"
    pub id: &'static str,
    pub reason: &'static str,
    pub predicate: Predicate,
}

impl GuardRule {
    pub const fn verdict(
        id: &'static str,
        reason: &'static str,
        predicate: fn(&AgentVerdict) -> bool,
    ) -> Self {
        Self {
            id,
            reason,
            predicate: Predicate::Verdict(predicate),
        }
    }

    pub const fn item(
        id: &'static str,
        reason: &'static str,
        predicate: fn(&EvidenceItem) -> bool,
    ) -> Self {
        Self {
            id,
            reason,
            predicate: Predicate::Item(predicate),
        }
    }

    fn evaluate(&self, verdict: &AgentVerdict) -> Vec<GuardFinding> {
        match self.predicate {
            Predicate::Verdict(fires) => {
                if fires(verdict) {
                    vec![self.finding(None)]
                } else {
                    Vec::new()
                }
            }
            Predicate::Item(fires) => verdict
                .evidence
                .iter()
                .enumerate()
                .filter(|(_, item)| fires(item))
                .map(|(index, _)| self.finding(Some(index)))
                .collect(),
        }
    }

    fn finding(&self, evidence_index: Option<usize>) -> GuardFinding {
        GuardFinding {
            rule_id: self.id.to_string(),
            reason: self.reason.to_string(),
            evidence_index,
        }
    }
}

impl fmt::Debug for GuardRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self.predicate {
            Predicate::Verdict(_) => "verdict",
            Predicate::Item(_) => "item",
        };
        f.debug_struct("GuardRule")
            .field("id", &self.id)
            .field("scope", &scope)
            .finish()
    }
}

/// One rule firing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardFinding {
    pub rule_id: String,
    pub reason: String,

    /// Index into `evidence` for per-item rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_index: Option<usize>,
}

/// A verdict after guarding, with the audit trail of fired rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardedVerdict {
    #[serde(flatten)]
    pub verdict: AgentVerdict,

    #[serde(default)]
    pub findings: Vec<GuardFinding>,
}

impl GuardedVerdict {
    pub fn escalated(&self) -> bool {
        !self.findings.is_empty()
    }

    pub fn fired(&self, rule_id: &str) -> bool {
        self.findings.iter().any(|f| f.rule_id == rule_id)
    }
}

/// Rules per dimension.
#[derive(Debug, Clone)]
pub struct GuardTable {
    generic: Vec<GuardRule>,
    by_dimension: BTreeMap<DimensionId, Vec<GuardRule>>,
}

impl GuardTable {
    /// Generic rules only.
    pub fn generic() -> Self {
        Self {
            generic: generic::rules(),
            by_dimension: BTreeMap::new(),
        }
    }

    /// Generic rules plus the built-in dimension rules.
    pub fn standard() -> Self {
        Self::generic()
            .with_rules(DimensionId::D1, compassion::rules())
            .with_rules(DimensionId::D4, blame::rules())
            .with_rules(DimensionId::D5, local_rationality::rules())
    }

    /// Add a rule for one dimension.
    pub fn insert(&mut self, dimension: DimensionId, rule: GuardRule) {
        self.by_dimension.entry(dimension).or_default().push(rule);
    }

    pub fn with_rules(mut self, dimension: DimensionId, rules: Vec<GuardRule>) -> Self {
        self.by_dimension.entry(dimension).or_default().extend(rules);
        self
    }

    /// Rules applied to a dimension, generic rules first.
    pub fn rules_for(&self, dimension: DimensionId) -> impl Iterator<Item = &GuardRule> {
        self.generic.iter().chain(
            self.by_dimension
                .get(&dimension)
                .into_iter()
                .flat_map(|rules| rules.iter()),
        )
    }
}

impl Default for GuardTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Applies a [`GuardTable`] to verdicts.
#[derive(Debug, Clone, Default)]
pub struct GuardEngine {
    table: GuardTable,
}

impl GuardEngine {
    pub fn new(table: GuardTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &GuardTable {
        &self.table
    }

    /// Guard a verdict for a dimension.
    ///
    /// Every rule is evaluated; none short-circuits. Running the engine again
    /// on its own output yields the same verdict and findings.
    pub fn apply(&self, dimension: DimensionId, verdict: AgentVerdict) -> GuardedVerdict {
        let findings: Vec<GuardFinding> = self
            .table
            .rules_for(dimension)
            .flat_map(|rule| rule.evaluate(&verdict))
            .collect();

        let mut verdict = verdict;
        if !findings.is_empty() {
            for finding in &findings {
                tracing::warn!(
                    dimension = %dimension,
                    rule = %finding.rule_id,
                    evidence_index = ?finding.evidence_index,
                    "Guard escalated uncertainty"
                );
            }
            verdict.uncertainty = true;
        }

        GuardedVerdict { verdict, findings }
    }
}
