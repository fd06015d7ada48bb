//! Citation id resolution.
//!
//! A citation is any string embedding a block id token such as `p03_c01`
//! (text) or `p02_t01` (table); surrounding words like "Text" or "Table" are
//! ignored. Resolution is a pure read of the store.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::store::EvidenceStore;

lazy_static! {
    static ref CITATION_TOKEN: Regex = Regex::new(r"(?i)p\d{1,3}_(c|t)\d{1,3}").unwrap();

    static ref BLOCK_ID: Regex = Regex::new(r"(?i)^p\d{1,3}_(c|t)\d{1,3}$").unwrap();
}

/// Which collection a block id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Table,
}

impl BlockKind {
    fn from_marker(marker: &str) -> Self {
        if marker.eq_ignore_ascii_case("c") {
            BlockKind::Text
        } else {
            BlockKind::Table
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Text => write!(f, "text"),
            BlockKind::Table => write!(f, "table"),
        }
    }
}

/// A block a citation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedBlock<'a> {
    /// Id as stored, which may differ in case from the citation
    pub block_id: &'a str,
    pub kind: BlockKind,
    pub page: u32,
    /// Raw text for text blocks, the fallback rendering for tables
    pub text: &'a str,
}

/// The block id token embedded in a citation, if any.
pub fn extract_block_id(citation: &str) -> Option<&str> {
    CITATION_TOKEN.find(citation).map(|m| m.as_str())
}

/// Kind of a bare block id, or `None` when it is not a well-formed id.
pub(crate) fn block_kind(id: &str) -> Option<BlockKind> {
    BLOCK_ID
        .captures(id)
        .and_then(|caps| caps.get(1))
        .map(|m| BlockKind::from_marker(m.as_str()))
}

impl EvidenceStore {
    /// Resolve a citation to the block it names.
    ///
    /// Ids compare case-insensitively. A `_c` token only ever resolves to a
    /// text block and a `_t` token only to a table.
    pub fn resolve(&self, citation: &str) -> Option<ResolvedBlock<'_>> {
        let caps = CITATION_TOKEN.captures(citation)?;
        let token = caps.get(0)?.as_str();
        let kind = BlockKind::from_marker(caps.get(1)?.as_str());

        match kind {
            BlockKind::Text => self.text_block(token).map(|b| ResolvedBlock {
                block_id: &b.id,
                kind,
                page: b.provenance.page,
                text: &b.text,
            }),
            BlockKind::Table => self.table(token).map(|t| ResolvedBlock {
                block_id: &t.id,
                kind,
                page: t.provenance.page,
                text: &t.text_fallback,
            }),
        }
    }
}
