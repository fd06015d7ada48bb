//! Quote-in-block support test.
//!
//! Three tiers, applied in order and short-circuiting on the first success:
//!
//! 1. canonical containment
//! 2. compact containment
//! 3. fuzzy in-order token match over a bounded sliding window
//!
//! The fuzzy tier tolerates small insertions, deletions and ellipses while
//! still requiring most quote words to appear in their original relative
//! order within a span only slightly longer than the quote. Scattered or
//! shuffled tokens do not satisfy it.

use serde::{Deserialize, Serialize};

use super::canonical::CanonicalText;

/// Which tier accepted a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum MatchTier {
    Canonical,
    Compact,
    Fuzzy { hits: usize, total: usize },
}

/// Tuning for the fuzzy tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchPolicy {
    /// Quotes with fewer tokens never reach the fuzzy tier
    pub min_fuzzy_tokens: usize,

    /// Extra block tokens allowed in a window beyond the quote length
    pub window_slack: usize,

    /// In-order hits / quote tokens required for a fuzzy match
    pub min_hit_ratio: f64,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            min_fuzzy_tokens: 6,
            window_slack: 10,
            min_hit_ratio: 0.80,
        }
    }
}

impl MatchPolicy {
    /// Decide whether `quote` is supported by `block`, reporting the tier that accepted it.
    pub fn match_quote(&self, quote: &str, block: &str) -> Option<MatchTier> {
        if quote.is_empty() || block.is_empty() {
            return None;
        }

        let q = CanonicalText::new(quote);
        let b = CanonicalText::new(block);

        if !q.canonical.is_empty() && b.canonical.contains(&q.canonical) {
            return Some(MatchTier::Canonical);
        }

        if !q.compact.is_empty() && b.compact.contains(&q.compact) {
            return Some(MatchTier::Compact);
        }

        self.fuzzy_match(&q.tokens, &b.tokens)
            .map(|hits| MatchTier::Fuzzy {
                hits,
                total: q.tokens.len(),
            })
    }

    /// Best-effort in-order token scan; returns the hit count of the first accepting window.
    fn fuzzy_match(&self, quote: &[String], block: &[String]) -> Option<usize> {
        let n = quote.len();
        if n == 0 || n < self.min_fuzzy_tokens {
            return None;
        }

        let window = n + self.window_slack;
        if block.len() < window {
            return None;
        }

        for start in 0..=(block.len() - window) {
            let mut next = 0;
            for token in &block[start..start + window] {
                if *token == quote[next] {
                    next += 1;
                    if next == n {
                        break;
                    }
                }
            }

            if next as f64 / n as f64 >= self.min_hit_ratio {
                return Some(next);
            }
        }

        None
    }
}

/// Whether `quote` occurs in `block` under the default policy.
pub fn matches(quote: &str, block: &str) -> bool {
    match_quote(quote, block).is_some()
}

/// Tier under which `quote` occurs in `block` under the default policy.
pub fn match_quote(quote: &str, block: &str) -> Option<MatchTier> {
    MatchPolicy::default().match_quote(quote, block)
}
