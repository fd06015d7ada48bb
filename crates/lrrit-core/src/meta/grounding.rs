//! Programmatic grounding of cited evidence.
//!
//! Runs before any second-pass judgement and needs no model: each cited id
//! is resolved against the store and each quote is checked against its
//! block. The resulting flags are an authoritative floor on later scoring,
//! and the resolved blocks are the only context the meta judge sees.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::evidence::EvidenceStore;
use crate::text::{match_quote, MatchTier};
use crate::verdict::EvidenceItem;

/// Placeholder shown to the meta judge when no block could be cited.
pub const NO_EVIDENCE_BLOCKS: &str = "[NO EVIDENCE BLOCKS PROVIDED]";

/// Flags computed without any model call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammaticFlags {
    pub missing_evidence: bool,
    pub invalid_evidence_id: bool,
    pub quote_mismatch: bool,
}

impl ProgrammaticFlags {
    /// No unresolved ids and no unverifiable quotes.
    pub fn grounding_clean(&self) -> bool {
        !self.invalid_evidence_id && !self.quote_mismatch
    }
}

/// Outcome of checking one evidence item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemCheck {
    /// Citation does not name a block in the store
    Unresolved,
    /// Block resolved; quote empty or checking disabled
    Unchecked { block_id: String },
    /// Quote found in the block
    Verified { block_id: String, tier: MatchTier },
    /// Quote not found in the block
    Mismatch { block_id: String },
}

/// Flags plus the bounded context for the meta judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingReport {
    pub flags: ProgrammaticFlags,

    /// Cited blocks only, each as `[<cited id>]\n<text>`, separated by a blank line
    pub context: String,

    /// Resolved block ids in first-citation order, without duplicates
    pub cited_block_ids: Vec<String>,

    /// One entry per evidence item, in order
    pub items: Vec<ItemCheck>,
}

impl GroundingReport {
    /// The context, or the placeholder when it is empty.
    pub fn context_or_placeholder(&self) -> &str {
        if self.context.is_empty() {
            NO_EVIDENCE_BLOCKS
        } else {
            &self.context
        }
    }
}

/// Resolve and verify cited evidence.
///
/// With `strict_quote_check` off, or for an empty quote, the quote is not
/// compared against its block.
pub fn ground_evidence(
    store: &EvidenceStore,
    evidence: &[EvidenceItem],
    strict_quote_check: bool,
) -> GroundingReport {
    let mut flags = ProgrammaticFlags::default();

    if evidence.is_empty() {
        flags.missing_evidence = true;
        tracing::warn!(document_id = %store.document_id(), "No evidence cited");
        return GroundingReport {
            flags,
            context: String::new(),
            cited_block_ids: Vec::new(),
            items: Vec::new(),
        };
    }

    let mut seen = HashSet::new();
    let mut blocks = Vec::new();
    let mut cited_block_ids = Vec::new();
    let mut items = Vec::with_capacity(evidence.len());

    for (index, item) in evidence.iter().enumerate() {
        let citation = item.id.trim();
        let Some(block) = store.resolve(citation) else {
            flags.invalid_evidence_id = true;
            tracing::debug!(index, citation, "Evidence id did not resolve");
            items.push(ItemCheck::Unresolved);
            continue;
        };

        let block_id = block.block_id.to_string();
        let quote = item.quote.trim();

        let check = if !strict_quote_check || quote.is_empty() {
            ItemCheck::Unchecked {
                block_id: block_id.clone(),
            }
        } else {
            match match_quote(quote, block.text) {
                Some(tier) => ItemCheck::Verified {
                    block_id: block_id.clone(),
                    tier,
                },
                None => {
                    flags.quote_mismatch = true;
                    ItemCheck::Mismatch {
                        block_id: block_id.clone(),
                    }
                }
            }
        };
        tracing::debug!(index, citation, check = ?check, "Evidence item grounded");
        items.push(check);

        if seen.insert(block_id.to_ascii_lowercase()) {
            blocks.push(format!("[{}]\n{}", citation, block.text));
            cited_block_ids.push(block_id);
        }
    }

    if !flags.grounding_clean() {
        tracing::warn!(
            document_id = %store.document_id(),
            invalid_evidence_id = flags.invalid_evidence_id,
            quote_mismatch = flags.quote_mismatch,
            "Evidence grounding failed"
        );
    }

    GroundingReport {
        flags,
        context: blocks.join("\n\n"),
        cited_block_ids,
        items,
    }
}
