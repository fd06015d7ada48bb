//! Read-only evidence store and citation resolution.
//!
//! An [`EvidenceStore`] holds the text and table blocks extracted from one
//! source document. It is built once by [`EvidenceStoreBuilder`] and is
//! immutable afterwards, so any number of dimension judges and
//! meta-evaluations can resolve citations against it concurrently.
//!
//! Every block and the store itself carry a short content hash so that a
//! review can be tied back to the exact evidence it was run against.

mod render;
mod resolver;
mod store;

pub use render::{normalise_cell, render_markdown_table, render_table_fallback, MAX_TABLE_ROWS};
pub use resolver::{extract_block_id, BlockKind, ResolvedBlock};
pub use store::{
    EvidenceStore, EvidenceStoreBuilder, PageText, Provenance, TableBlock, TableInput, TextBlock,
};

use sha2::{Digest, Sha256};

/// Errors raised while building or loading an evidence store.
#[derive(Debug, thiserror::Error)]
pub enum EvidenceError {
    #[error("Failed to parse evidence store JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid {kind} block id '{id}'")]
    InvalidBlockId { id: String, kind: BlockKind },

    #[error("Duplicate block id: {0}")]
    DuplicateBlockId(String),

    #[error("Hash mismatch for {target}: recorded {recorded}, computed {computed}")]
    HashMismatch {
        target: String,
        recorded: String,
        computed: String,
    },
}

/// Short, stable content hash: the first 16 hex chars of SHA-256 over
/// key-sorted compact JSON.
pub fn stable_hash(value: &serde_json::Value) -> String {
    let bytes = serde_json::to_vec(&sorted(value)).unwrap_or_else(|_| b"null".to_vec());
    let digest = Sha256::digest(&bytes);
    let mut hex = hex::encode(digest);
    hex.truncate(16);
    hex
}

fn sorted(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Array(values) => {
            serde_json::Value::Array(values.iter().map(sorted).collect())
        }
        serde_json::Value::Object(map) => {
            let mut entries = map.iter().collect::<Vec<_>>();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));

            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in entries {
                out.insert(k.clone(), sorted(v));
            }
            serde_json::Value::Object(out)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stable_hash_is_short_hex() {
        let hash = stable_hash(&json!({"text": "The patient was reviewed."}));
        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_stable_hash_ignores_key_order() {
        let a = json!({"b": 1, "a": {"d": 4, "c": 3}});
        let b = json!({"a": {"c": 3, "d": 4}, "b": 1});
        assert_eq!(stable_hash(&a), stable_hash(&b));
    }

    #[test]
    fn test_stable_hash_changes_with_content() {
        assert_ne!(
            stable_hash(&json!({"text": "escalated"})),
            stable_hash(&json!({"text": "not escalated"}))
        );
    }
}
