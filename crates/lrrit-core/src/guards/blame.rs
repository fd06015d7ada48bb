//! D4: blame language avoided.
//!
//! A negative item is only credible blame language when the quote carries
//! judgement or fault language, or attributes the event to a person or
//! team. Delays, uncertainty and process weaknesses described without
//! either are likely mislabelled system statements.

use super::cues::{contains_cue, refers_to_person, BLAME_CUES};
use super::GuardRule;
use crate::verdict::{EvidenceItem, Polarity};

pub(super) fn rules() -> Vec<GuardRule> {
    vec![GuardRule::item(
        "D4-NEGATIVE-ATTRIBUTION",
        "Negative item has neither a blame cue nor a person reference",
        unattributed_negative,
    )]
}

fn unattributed_negative(item: &EvidenceItem) -> bool {
    item.polarity == Polarity::Negative
        && !contains_cue(&item.quote, BLAME_CUES)
        && !refers_to_person(&item.quote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::DimensionId;
    use crate::guards::GuardEngine;
    use crate::verdict::{AgentVerdict, Rating};

    fn guard(items: Vec<EvidenceItem>) -> crate::guards::GuardedVerdict {
        let verdict = items
            .into_iter()
            .fold(AgentVerdict::new(Rating::Little, "Blame language present."), |v, item| {
                v.with_evidence(item)
            });
        GuardEngine::default().apply(DimensionId::D4, verdict)
    }

    #[test]
    fn test_blame_cue_supports_negative() {
        let guarded = guard(vec![EvidenceItem::negative(
            "Text p03_c01",
            "Observations were not repeated, which was careless.",
        )]);
        assert!(!guarded.verdict.uncertainty);
    }

    #[test]
    fn test_person_reference_supports_negative() {
        let guarded = guard(vec![EvidenceItem::negative(
            "Text p03_c01",
            "The nurse was distracted during the drug round.",
        )]);
        assert!(!guarded.verdict.uncertainty);
    }

    #[test]
    fn test_plural_roles_support_negative() {
        let guarded = guard(vec![
            EvidenceItem::negative("Text p03_c01", "The doctors ignored the rising NEWS2 score."),
            EvidenceItem::negative("Text p04_c01", "Nurses left the patient unobserved overnight."),
            EvidenceItem::negative("Text p05_c01", "The consultants chose to delay surgery."),
        ]);
        assert!(!guarded.verdict.uncertainty);
        assert!(guarded.findings.is_empty());
    }

    #[test]
    fn test_curly_apostrophe_blame_cue() {
        let guarded = guard(vec![EvidenceItem::negative(
            "Text p03_c01",
            "Escalation didn\u{2019}t happen until morning.",
        )]);
        assert!(!guarded.verdict.uncertainty);
    }

    #[test]
    fn test_system_statement_labelled_negative_escalates() {
        let guarded = guard(vec![
            EvidenceItem::negative("Text p03_c01", "The consultant should have attended."),
            EvidenceItem::negative("Text p04_c01", "There was a four hour delay in theatre access."),
        ]);

        assert!(guarded.verdict.uncertainty);
        assert_eq!(guarded.findings.len(), 1);
        assert_eq!(guarded.findings[0].rule_id, "D4-NEGATIVE-ATTRIBUTION");
        assert_eq!(guarded.findings[0].evidence_index, Some(1));
    }

    #[test]
    fn test_pronoun_inside_a_word_is_not_a_person_reference() {
        assert!(unattributed_negative(&EvidenceItem::negative(
            "Text p03_c01",
            "Therefore the theatre list overran.",
        )));
    }

    #[test]
    fn test_positive_items_are_not_checked() {
        assert!(!unattributed_negative(&EvidenceItem::positive(
            "Text p03_c01",
            "Staffing gaps contributed to the delay.",
        )));
    }
}
