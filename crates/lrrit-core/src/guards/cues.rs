//! Lexical cue lists shared by the dimension guards.
//!
//! Phrase cues are matched as substrings of the typography-folded quote, so
//! stems such as `neglig` cover "negligent" and "negligence". Person
//! references are matched as whole canonical tokens so that `he` does not
//! fire inside "the" or "hendersons"; role nouns also match their plural.

use crate::text::{fold_typography, tokens};

// =============================================================================
// BLAME LANGUAGE (D4)
// =============================================================================

/// Judgement or fault-attribution language.
pub const BLAME_CUES: &[&str] = &[
    "failed",
    "should have",
    "should've",
    "did not",
    "didn't",
    "non-compliance",
    "neglig",
    "careless",
    "incompet",
    "to blame",
    "fault",
];

/// Roles or teams. A trailing `s` is accepted.
pub const PERSON_ROLES: &[&str] = &["staff", "team", "sho", "doctor", "nurse", "consultant"];

/// Pronouns, matched exactly.
pub const PERSON_PRONOUNS: &[&str] = &["they", "he", "she", "we"];

// =============================================================================
// LOCAL RATIONALITY (D5)
// =============================================================================

/// Markers of contemporaneous sense-making: what was known, assumed or constrained.
pub const CONTEMPORANEOUS_CUES: &[&str] = &[
    "at the time",
    "based on",
    "given",
    "in the context",
    "initially",
    "working diagnosis",
    "appeared",
    "interpreted",
    "thought",
    "believed",
    "concern",
    "uncertain",
    "uncertainty",
    "ambigu",
    "limited information",
    "competing",
    "priority",
    "trade-off",
    "capacity",
    "availability",
    "handover",
    "pathway",
    "access",
    "resource",
    "workload",
    "pressure",
];

/// Judgement made with knowledge of the outcome.
pub const HINDSIGHT_CUES: &[&str] = &[
    "should have",
    "should've",
    "failed to",
    "did not",
    "didn't",
    "obvious",
    "clearly",
    "in hindsight",
    "neglig",
    "incompet",
    "to blame",
    "fault",
];

/// Uncertainty about outcome attribution rather than about the decision.
pub const COUNTERFACTUAL_CUES: &[&str] = &[
    "no certainty",
    "cannot determine",
    "can't determine",
    "unclear whether",
    "we cannot determine",
    "no way of knowing",
];

/// Approval of care that says nothing about why it made sense.
pub const REASSURANCE_CUES: &[&str] = &["timely", "appropriate", "good care", "managed well"];

/// Whether the folded text contains any of the phrase cues.
pub fn contains_cue(text: &str, cues: &[&str]) -> bool {
    let folded = fold_typography(text);
    cues.iter().any(|cue| folded.contains(cue))
}

/// Whether the text refers to an individual, role or team.
pub fn refers_to_person(text: &str) -> bool {
    tokens(text).iter().any(|token| {
        let token = token.as_str();
        let singular = token.strip_suffix('s').unwrap_or(token);
        PERSON_PRONOUNS.contains(&token)
            || PERSON_ROLES.contains(&token)
            || PERSON_ROLES.contains(&singular)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cues_match_through_typography() {
        assert!(contains_cue("The SHO didn\u{2019}t call", BLAME_CUES));
        assert!(contains_cue("Clear NEGLIGENCE was found", BLAME_CUES));
        assert!(!contains_cue("The pathway was unclear", BLAME_CUES));
    }

    #[test]
    fn test_person_references_are_whole_words() {
        assert!(refers_to_person("He did not document it"));
        assert!(refers_to_person("the on-call Consultant"));
        assert!(!refers_to_person("the theatre schedule overran"));
        assert!(!refers_to_person("shortage of beds"));
    }

    #[test]
    fn test_plural_and_possessive_roles_are_person_references() {
        assert!(refers_to_person("The doctors ignored the rising score"));
        assert!(refers_to_person("Nurses left the bay"));
        assert!(refers_to_person("two SHOs were covering"));
        assert!(refers_to_person("the staff's handover"));
        assert!(refers_to_person("both teams disagreed"));
        assert!(!refers_to_person("Staffing was short overnight"));
        // pronouns take no plural
        assert!(!refers_to_person("hes shes wes"));
    }

    #[test]
    fn test_cue_lists_are_lowercase() {
        for list in [
            BLAME_CUES,
            PERSON_ROLES,
            PERSON_PRONOUNS,
            CONTEMPORANEOUS_CUES,
            HINDSIGHT_CUES,
            COUNTERFACTUAL_CUES,
            REASSURANCE_CUES,
        ] {
            for cue in list {
                assert_eq!(*cue, cue.to_lowercase());
            }
        }
    }
}
