//! Rules applied to every dimension.

use super::GuardRule;
use crate::verdict::{AgentVerdict, Polarity, Rating};

pub(super) fn rules() -> Vec<GuardRule> {
    vec![
        GuardRule::verdict(
            "R1-AUDITABILITY",
            "No evidence cited; the rating cannot be audited",
            |v| v.evidence.is_empty(),
        ),
        GuardRule::verdict(
            "R2-GOOD-POSITIVE",
            "Rated GOOD without any positive evidence",
            |v| v.rating == Rating::Good && !v.has_polarity(Polarity::Positive),
        ),
        GuardRule::verdict(
            "R3-LITTLE-NEGATIVE",
            "Rated LITTLE without any negative evidence",
            |v| v.rating == Rating::Little && !v.has_polarity(Polarity::Negative),
        ),
    ]
}
