use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;

use super::render::{render_markdown_table, render_table_fallback};
use super::resolver::{block_kind, BlockKind};
use super::{stable_hash, EvidenceError};

const DEFAULT_TEXT_EXTRACTOR: &str = "text-layer";
const DEFAULT_TABLE_EXTRACTOR: &str = "table-extractor";

/// Where a block came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub document_id: String,
    pub source_path: String,
    pub page: u32,
    pub extractor: String,

    /// `[x0, y0, x1, y1]` in page coordinates, when the extractor reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,

    /// Extractor confidence in 0..1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A block of running text, e.g. `p03_c01`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: String,
    pub provenance: Provenance,
    pub text: String,
    pub text_hash: String,
}

/// An extracted table, e.g. `p02_t01`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    pub id: String,
    pub provenance: Provenance,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_hint: Option<String>,

    #[serde(default)]
    pub header: Option<Vec<String>>,

    #[serde(default)]
    pub rows: Vec<Vec<String>>,

    pub n_rows: usize,
    pub n_cols: usize,
    pub table_hash: String,

    /// Short rendering used wherever the table is shown to a judge
    pub text_fallback: String,
}

/// Text extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub page: u32,
    #[serde(default)]
    pub text: String,
}

/// A table as reported by an extractor, before it is added to a store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableInput {
    pub page: u32,
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub extractor: Option<String>,
    #[serde(default)]
    pub title_hint: Option<String>,
    #[serde(default)]
    pub header: Option<Vec<String>>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    #[serde(default)]
    pub text_fallback: Option<String>,
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TableInput {
    pub fn new(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }
}

/// Immutable collection of the text and table blocks of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoreRepr")]
pub struct EvidenceStore {
    document_id: String,
    source_path: String,
    text_blocks: Vec<TextBlock>,
    tables: Vec<TableBlock>,
    store_hash: String,
    metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct StoreRepr {
    document_id: String,
    source_path: String,
    #[serde(default)]
    text_blocks: Vec<TextBlock>,
    #[serde(default)]
    tables: Vec<TableBlock>,
    store_hash: String,
    #[serde(default)]
    metadata: serde_json::Map<String, serde_json::Value>,
}

impl TryFrom<StoreRepr> for EvidenceStore {
    type Error = EvidenceError;

    fn try_from(repr: StoreRepr) -> Result<Self, Self::Error> {
        validate_ids(&repr.text_blocks, &repr.tables)?;

        for block in &repr.text_blocks {
            check_hash(&block.id, &block.text_hash, text_hash(&block.text))?;
        }
        for table in &repr.tables {
            let computed = table_hash(
                &table.id,
                table.provenance.page,
                &table.provenance.extractor,
                table.header.as_deref(),
                &table.rows,
            );
            check_hash(&table.id, &table.table_hash, computed)?;
        }

        let store = EvidenceStore {
            store_hash: String::new(),
            document_id: repr.document_id,
            source_path: repr.source_path,
            text_blocks: repr.text_blocks,
            tables: repr.tables,
            metadata: repr.metadata,
        };
        let computed = store.compute_store_hash();
        check_hash("store", &repr.store_hash, computed.clone())?;

        Ok(EvidenceStore {
            store_hash: computed,
            ..store
        })
    }
}

impl EvidenceStore {
    /// Load a previously built store, re-checking ids and hashes.
    pub fn from_json(json: &str) -> Result<Self, EvidenceError> {
        let repr: StoreRepr = serde_json::from_str(json)?;
        EvidenceStore::try_from(repr)
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn text_blocks(&self) -> &[TextBlock] {
        &self.text_blocks
    }

    pub fn tables(&self) -> &[TableBlock] {
        &self.tables
    }

    pub fn store_hash(&self) -> &str {
        &self.store_hash
    }

    pub fn metadata(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.metadata
    }

    /// Text block with the given id, compared case-insensitively.
    pub fn text_block(&self, id: &str) -> Option<&TextBlock> {
        self.text_blocks
            .iter()
            .find(|b| b.id.eq_ignore_ascii_case(id))
    }

    /// Table with the given id, compared case-insensitively.
    pub fn table(&self, id: &str) -> Option<&TableBlock> {
        self.tables.iter().find(|t| t.id.eq_ignore_ascii_case(id))
    }

    pub fn is_empty(&self) -> bool {
        self.text_blocks.is_empty() && self.tables.is_empty()
    }

    fn compute_store_hash(&self) -> String {
        stable_hash(&json!({
            "document_id": self.document_id,
            "source_path": self.source_path,
            "text_blocks": self.text_blocks.iter().map(|b| &b.text_hash).collect::<Vec<_>>(),
            "tables": self.tables.iter().map(|t| &t.table_hash).collect::<Vec<_>>(),
            "metadata": self.metadata,
        }))
    }
}

/// Builder for an [`EvidenceStore`].
///
/// Pages become one text block each (`p<page>_c01`); finer-grained text
/// blocks can be added with explicit ids.
#[derive(Debug, Clone)]
pub struct EvidenceStoreBuilder {
    document_id: String,
    source_path: String,
    text_extractor: String,
    text_blocks: Vec<TextBlock>,
    tables: Vec<TableBlock>,
    metadata: serde_json::Map<String, serde_json::Value>,
}

impl EvidenceStoreBuilder {
    pub fn new(document_id: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            source_path: source_path.into(),
            text_extractor: DEFAULT_TEXT_EXTRACTOR.to_string(),
            text_blocks: Vec::new(),
            tables: Vec::new(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Name recorded as the extractor of subsequently added text.
    pub fn text_extractor(mut self, name: impl Into<String>) -> Self {
        self.text_extractor = name.into();
        self
    }

    /// Add a page of text as a single block. Blank pages are skipped.
    pub fn page(self, page: u32, text: &str) -> Self {
        let id = format!("p{:02}_c01", page);
        self.text_block(id, page, text)
    }

    /// Add every page in order.
    pub fn pages(self, pages: impl IntoIterator<Item = PageText>) -> Self {
        pages
            .into_iter()
            .fold(self, |builder, p| builder.page(p.page, &p.text))
    }

    /// Add a text block with an explicit id. Blank text is skipped.
    pub fn text_block(mut self, id: impl Into<String>, page: u32, text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return self;
        }

        let provenance = self.provenance(page, self.text_extractor.clone());
        self.text_blocks.push(TextBlock {
            id: id.into(),
            provenance,
            text: text.to_string(),
            text_hash: text_hash(text),
        });
        self
    }

    /// Add an extracted table.
    pub fn table(mut self, input: TableInput) -> Self {
        let page = input.page;
        let id = input
            .table_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("p{:02}_t00", page));
        let extractor = input
            .extractor
            .unwrap_or_else(|| DEFAULT_TABLE_EXTRACTOR.to_string());

        let n_rows = input.rows.len();
        let n_cols = match &input.header {
            Some(h) if !h.is_empty() => h.len(),
            _ => input.rows.first().map(Vec::len).unwrap_or(0),
        };

        let table_hash = table_hash(&id, page, &extractor, input.header.as_deref(), &input.rows);
        let text_fallback = match input.text_fallback {
            Some(text) if !text.trim().is_empty() => text,
            _ => render_table_fallback(
                &id,
                page,
                &render_markdown_table(input.header.as_deref(), &input.rows),
            ),
        };

        let mut provenance = self.provenance(page, extractor);
        provenance.bbox = input.bbox;
        provenance.confidence = input.confidence;
        provenance.notes = input.notes;

        self.tables.push(TableBlock {
            id,
            provenance,
            title_hint: input.title_hint,
            header: input.header,
            rows: input.rows,
            n_rows,
            n_cols,
            table_hash,
            text_fallback,
        });
        self
    }

    /// Add every table in order.
    pub fn tables(self, tables: impl IntoIterator<Item = TableInput>) -> Self {
        tables.into_iter().fold(self, Self::table)
    }

    /// Attach a document-level metadata field.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Validate ids and seal the store.
    pub fn build(self) -> Result<EvidenceStore, EvidenceError> {
        validate_ids(&self.text_blocks, &self.tables)?;

        let mut store = EvidenceStore {
            document_id: self.document_id,
            source_path: self.source_path,
            text_blocks: self.text_blocks,
            tables: self.tables,
            store_hash: String::new(),
            metadata: self.metadata,
        };
        store.store_hash = store.compute_store_hash();

        tracing::debug!(
            document_id = %store.document_id,
            text_blocks = store.text_blocks.len(),
            tables = store.tables.len(),
            store_hash = %store.store_hash,
            "Evidence store built"
        );

        Ok(store)
    }

    fn provenance(&self, page: u32, extractor: String) -> Provenance {
        Provenance {
            document_id: self.document_id.clone(),
            source_path: self.source_path.clone(),
            page,
            extractor,
            bbox: None,
            confidence: None,
            notes: None,
        }
    }
}

fn text_hash(text: &str) -> String {
    stable_hash(&json!({ "text": text }))
}

fn table_hash(
    id: &str,
    page: u32,
    extractor: &str,
    header: Option<&[String]>,
    rows: &[Vec<String>],
) -> String {
    stable_hash(&json!({
        "table_id": id,
        "page": page,
        "extractor": extractor,
        "header": header,
        "rows": rows,
    }))
}

fn check_hash(target: &str, recorded: &str, computed: String) -> Result<(), EvidenceError> {
    if recorded == computed {
        Ok(())
    } else {
        Err(EvidenceError::HashMismatch {
            target: target.to_string(),
            recorded: recorded.to_string(),
            computed,
        })
    }
}

fn validate_ids(text_blocks: &[TextBlock], tables: &[TableBlock]) -> Result<(), EvidenceError> {
    let mut seen = HashSet::new();

    let ids = text_blocks
        .iter()
        .map(|b| (b.id.as_str(), BlockKind::Text))
        .chain(tables.iter().map(|t| (t.id.as_str(), BlockKind::Table)));

    for (id, kind) in ids {
        if block_kind(id) != Some(kind) {
            return Err(EvidenceError::InvalidBlockId {
                id: id.to_string(),
                kind,
            });
        }
        if !seen.insert(id.to_ascii_lowercase()) {
            return Err(EvidenceError::DuplicateBlockId(id.to_string()));
        }
    }

    Ok(())
}
