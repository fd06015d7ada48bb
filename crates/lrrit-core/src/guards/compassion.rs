//! D1: compassionate engagement with people affected.

use super::GuardRule;
use crate::verdict::{Polarity, Rating};

pub(super) fn rules() -> Vec<GuardRule> {
    vec![GuardRule::verdict(
        "D1-SOME-POSITIVE",
        "Rated SOME without any positive evidence of engagement",
        |v| v.rating == Rating::Some && !v.has_polarity(Polarity::Positive),
    )]
}
