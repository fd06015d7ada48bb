//! Canonical text forms for tolerant quote comparison.
//!
//! Text reproduced by a model drifts from its source: line-wrap hyphenation,
//! curly quotes, collapsed whitespace. Both sides of every comparison are
//! reduced to the same canonical form first.
//!
//! | Form | Produced by |
//! |------|-------------|
//! | canonical | trim, drop soft hyphens, ASCII quotes/dashes, rejoin wrapped words, lower-case, punctuation to spaces, collapse whitespace |
//! | compact | canonical with every non-`[a-z0-9]` character removed |
//! | tokens | runs of `[a-z0-9]` in the canonical form |

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// "perfor-\nated" -> "perforated"
    static ref HYPHEN_LINEBREAK: Regex = Regex::new(r"(\w)-\s+(\w)").unwrap();

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    static ref TOKEN: Regex = Regex::new(r"[a-z0-9]+").unwrap();

    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

const SOFT_HYPHEN: char = '\u{00AD}';

/// Replace typographic quotes and dashes with their ASCII forms and drop soft hyphens.
fn normalize_typography(s: &str) -> String {
    s.chars()
        .filter(|&c| c != SOFT_HYPHEN)
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .collect()
}

/// Lower-cased, typography-normalized text for cue lookups.
///
/// Punctuation is kept so that cues such as `didn't` or `trade-off` still match.
pub fn fold_typography(s: &str) -> String {
    normalize_typography(s).to_lowercase()
}

/// Whitespace, punctuation and case tolerant canonical form.
pub fn canonical(s: &str) -> String {
    let s = normalize_typography(s.trim());
    let s = HYPHEN_LINEBREAK.replace_all(&s, "${1}${2}");
    let s: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();
    WHITESPACE.replace_all(&s, " ").trim().to_string()
}

/// Canonical form with all non-alphanumerics removed.
///
/// Strictly weaker than [`canonical`]; only ever a second-tier test.
pub fn compact(s: &str) -> String {
    NON_ALPHANUMERIC.replace_all(&canonical(s), "").into_owned()
}

/// Alphanumeric token runs of the canonical form.
pub fn tokens(s: &str) -> Vec<String> {
    tokens_of_canonical(&canonical(s))
}

fn tokens_of_canonical(canonical: &str) -> Vec<String> {
    TOKEN
        .find_iter(canonical)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// All three comparison forms of one piece of text, computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalText {
    pub canonical: String,
    pub compact: String,
    pub tokens: Vec<String>,
}

impl CanonicalText {
    pub fn new(s: &str) -> Self {
        let canonical = canonical(s);
        let compact = NON_ALPHANUMERIC.replace_all(&canonical, "").into_owned();
        let tokens = tokens_of_canonical(&canonical);
        Self {
            canonical,
            compact,
            tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rejoins_wrapped_words() {
        assert_eq!(canonical("perfor-\nated bowel"), "perforated bowel");
        assert_eq!(canonical("perfor-  \n  ated"), "perforated");
    }

    #[test]
    fn test_drops_soft_hyphens() {
        assert_eq!(canonical("esca\u{00AD}lation"), "escalation");
    }

    #[test]
    fn test_normalizes_curly_quotes_and_dashes() {
        assert_eq!(
            fold_typography("The team didn\u{2019}t \u{201C}escalate\u{201D} \u{2013} sadly"),
            "the team didn't \"escalate\" - sadly"
        );
    }

    #[test]
    fn test_punctuation_becomes_space_and_whitespace_collapses() {
        assert_eq!(
            canonical("  The patient, (aged 74),\twas NOT reviewed.  "),
            "the patient aged 74 was not reviewed"
        );
    }

    #[test]
    fn test_compact_removes_everything_but_alphanumerics() {
        assert_eq!(compact("Co-ordination / hand-over"), "coordinationhandover");
        assert_eq!(compact("NEWS2 = 7"), "news27");
    }

    #[test]
    fn test_tokens_split_on_alphanumeric_runs() {
        assert_eq!(
            tokens("Ward 5's NEWS2-score rose"),
            vec!["ward", "5", "s", "news2", "score", "rose"]
        );
    }

    #[test]
    fn test_canonical_text_bundles_all_forms() {
        let text = CanonicalText::new("Hand-\nover was missed.");
        assert_eq!(text.canonical, "handover was missed");
        assert_eq!(text.compact, "handoverwasmissed");
        assert_eq!(text.tokens, vec!["handover", "was", "missed"]);
        assert!(CanonicalText::new(" ... ").is_empty());
    }

    const NOISY_TEXT: &str =
        "[A-Za-z0-9 \\t\\n.,;:!?()'\"\\-\u{00AD}\u{2018}\u{2019}\u{201C}\u{201D}\u{2013}\u{2014}]{0,80}";

    proptest! {
        #[test]
        fn prop_canonical_is_idempotent(s in NOISY_TEXT) {
            let once = canonical(&s);
            prop_assert_eq!(canonical(&once), once);
        }

        #[test]
        fn prop_canonical_has_no_ascii_punctuation_or_double_spaces(s in NOISY_TEXT) {
            let c = canonical(&s);
            prop_assert!(!c.chars().any(|ch| ch.is_ascii_punctuation()));
            prop_assert!(!c.contains("  "));
            prop_assert_eq!(c.trim(), c.as_str());
        }

        #[test]
        fn prop_compact_is_ascii_alphanumeric(s in NOISY_TEXT) {
            prop_assert!(compact(&s).chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit()));
        }
    }
}
