//! D5: local rationality.
//!
//! Positive evidence must reconstruct why an action made sense at the time.
//! Reassurance about the quality of care is not that. Negative evidence
//! should be hindsight judgement; statements that the outcome cannot be
//! attributed speak to counterfactuals, not to contemporaneous sense-making.

use super::cues::{
    contains_cue, CONTEMPORANEOUS_CUES, COUNTERFACTUAL_CUES, HINDSIGHT_CUES, REASSURANCE_CUES,
};
use super::GuardRule;
use crate::verdict::{EvidenceItem, Polarity};

pub(super) fn rules() -> Vec<GuardRule> {
    vec![
        GuardRule::item(
            "D5-POSITIVE-REASSURANCE-ONLY",
            "Positive item offers reassurance without contemporaneous reasoning",
            reassurance_only,
        ),
        GuardRule::item(
            "D5-POSITIVE-NO-CONTEMPORANEOUS",
            "Positive item has no contemporaneous-reasoning cue",
            lacks_contemporaneous_reasoning,
        ),
        GuardRule::item(
            "D5-NEGATIVE-COUNTERFACTUAL",
            "Negative item concerns outcome attribution rather than sense-making",
            counterfactual_negative,
        ),
        GuardRule::item(
            "D5-NEGATIVE-NO-HINDSIGHT",
            "Negative item has no hindsight-judgement cue",
            negative_without_hindsight,
        ),
    ]
}

fn reassurance_only(item: &EvidenceItem) -> bool {
    item.polarity == Polarity::Positive
        && contains_cue(&item.quote, REASSURANCE_CUES)
        && !contains_cue(&item.quote, CONTEMPORANEOUS_CUES)
}

fn lacks_contemporaneous_reasoning(item: &EvidenceItem) -> bool {
    item.polarity == Polarity::Positive
        && !contains_cue(&item.quote, REASSURANCE_CUES)
        && !contains_cue(&item.quote, CONTEMPORANEOUS_CUES)
}

fn counterfactual_negative(item: &EvidenceItem) -> bool {
    item.polarity == Polarity::Negative && contains_cue(&item.quote, COUNTERFACTUAL_CUES)
}

fn negative_without_hindsight(item: &EvidenceItem) -> bool {
    item.polarity == Polarity::Negative
        && !contains_cue(&item.quote, COUNTERFACTUAL_CUES)
        && !contains_cue(&item.quote, HINDSIGHT_CUES)
}
