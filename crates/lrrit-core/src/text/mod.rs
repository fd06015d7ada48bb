//! Text canonicalization and quote matching.

pub mod canonical;
pub mod matcher;

pub use canonical::{canonical, compact, fold_typography, tokens, CanonicalText};
pub use matcher::{match_quote, matches, MatchPolicy, MatchTier};
