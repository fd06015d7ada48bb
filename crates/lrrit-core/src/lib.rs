//! # lrrit-core
//!
//! Deterministic evidence grounding and rating-consistency guards for
//! LLM review judges.
//!
//! Dimension judges rate a document and cite verbatim quotations. This
//! crate decides, without calling any model, whether:
//! - each cited id names a real block of the document
//! - each quote actually occurs in that block
//! - the rating is consistent with the polarity and wording of its evidence
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **No LLM calls**: Grounding and guards are rule-based
//! 3. **Escalate only**: Guards raise `uncertainty` and cap scores; they never rewrite a rating
//! 4. **Auditable**: Every escalation records the rule that fired
//!
//! ## Example
//!
//! ```rust,ignore
//! use lrrit_core::{ground_evidence, parse_verdict, DimensionId, EvidenceStoreBuilder, MetaVerdict};
//!
//! let store = EvidenceStoreBuilder::new("case-17", "case-17.pdf")
//!     .page(3, "Overnight the patient was not\nreviewed urgently.")
//!     .build()?;
//!
//! let guarded = parse_verdict(DimensionId::D4, &judge_output)?;
//! let report = ground_evidence(&store, &guarded.verdict.evidence, true);
//! let meta = MetaVerdict::from_response("D4", DimensionId::D4.name(), report.flags, &meta_output)?;
//! ```

pub mod dimension;
pub mod evidence;
pub mod guards;
pub mod meta;
pub mod response;
pub mod schema;
pub mod text;
pub mod verdict;

// Re-export main types at crate root
pub use dimension::{DimensionId, UnknownDimension};
pub use evidence::{
    extract_block_id, stable_hash, BlockKind, EvidenceError, EvidenceStore, EvidenceStoreBuilder,
    PageText, Provenance, ResolvedBlock, TableBlock, TableInput, TextBlock,
};
pub use guards::{GuardEngine, GuardFinding, GuardRule, GuardTable, GuardedVerdict, Predicate};
pub use meta::{
    apply_meta_guards, ground_evidence, judge_response, GroundingReport, GuardedMeta, ItemCheck,
    MetaError, MetaResponse, MetaVerdict, MetricId, MetricResult, ProgrammaticFlags, Score,
    JUDGE_ID, M6_CLAMP_NOTE, NO_EVIDENCE_BLOCKS,
};
pub use response::{parse_response, recover_json, ParseError};
pub use schema::ResponseSchema;
pub use text::{match_quote, matches, MatchPolicy, MatchTier};
pub use verdict::{AgentVerdict, EvidenceItem, Polarity, Rating};

/// Guard a verdict with the standard rule table.
pub fn guard(dimension: DimensionId, verdict: AgentVerdict) -> GuardedVerdict {
    GuardEngine::default().apply(dimension, verdict)
}

/// Parse a dimension judge's raw completion and guard the verdict.
///
/// Fails rather than synthesizing a verdict when the response cannot be
/// recovered, violates the schema, or does not decode.
pub fn parse_verdict(dimension: DimensionId, raw: &str) -> Result<GuardedVerdict, ParseError> {
    let verdict: AgentVerdict = parse_response(raw, ResponseSchema::AgentVerdict)?;
    Ok(guard(dimension, verdict))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_guard_a_judge_response() {
        let raw = r#"Here is my verdict:
{
  "rating": "GOOD",
  "rationale": "Consistently neutral, system-focused language.",
  "evidence": [
    {"id": "Text p03_c01", "quote": "The escalation policy was ambiguous", "evidence_type": "negative"}
  ]
}"#;
        let guarded = parse_verdict(DimensionId::D4, raw).unwrap();

        assert_eq!(guarded.verdict.rating, Rating::Good);
        assert!(guarded.verdict.uncertainty);
        assert!(guarded.fired("R2-GOOD-POSITIVE"));
        assert!(guarded.fired("D4-NEGATIVE-ATTRIBUTION"));
    }

    #[test]
    fn test_end_to_end_grounding_and_meta_guard() {
        let store = EvidenceStoreBuilder::new("case-17", "case-17.pdf")
            .page(3, "Overnight the patient was not\nreviewed urgently despite a rising NEWS2.")
            .build()
            .unwrap();

        let verdict = AgentVerdict::new(Rating::Little, "Delay framed as individual failure.")
            .with_evidence(EvidenceItem::negative("Text p03_c01", "the patient was not reviewed"))
            .with_evidence(EvidenceItem::negative("Text p07_c01", "the nurse failed to escalate"));
        let guarded = guard(DimensionId::D4, verdict);

        let report = ground_evidence(&store, &guarded.verdict.evidence, true);
        assert!(report.flags.invalid_evidence_id);
        assert!(!report.flags.quote_mismatch);
        assert_eq!(report.cited_block_ids, vec!["p03_c01"]);

        let meta_raw = r#"{"overall": "PASS", "metrics": [
            {"metric_id": "M1", "score": "PASS", "notes": ""},
            {"metric_id": "M2", "score": "WARN", "notes": "one id does not resolve"},
            {"metric_id": "M3", "score": "PASS", "notes": ""},
            {"metric_id": "M4", "score": "PASS", "notes": ""},
            {"metric_id": "M5", "score": "PASS", "notes": ""},
            {"metric_id": "M6", "score": "FAIL", "notes": "cites a missing block"}
        ]}"#;
        let meta = MetaVerdict::from_response("D4", DimensionId::D4.name(), report.flags, meta_raw)
            .unwrap();

        assert_eq!(meta.overall, Score::Warn);
        assert_eq!(meta.metrics[5].score, Score::Fail);
    }
}
