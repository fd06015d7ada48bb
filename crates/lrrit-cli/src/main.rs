//! `lrrit`: evidence grounding, guards and review runs from the command line.
//!
//! Every subcommand writes JSON to stdout. Logs go to stderr, filtered by
//! `RUST_LOG` (default `info`).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lrrit_core::{
    ground_evidence, match_quote, parse_response, parse_verdict, AgentVerdict, DimensionId,
    EvidenceStore, EvidenceStoreBuilder, PageText, ResponseSchema, TableInput,
};
use lrrit_runtime::{ProviderRegistry, ReviewOrchestrator, RuntimeConfig};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lrrit", version, about = "Evidence-grounded LRRIT review tooling")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check whether a quote occurs in a block of text
    Match {
        #[arg(long)]
        quote: String,
        #[arg(long)]
        block_file: PathBuf,
    },
    /// Build an evidence store from extracted pages and tables
    Pack {
        #[arg(long)]
        document_id: String,
        #[arg(long)]
        source: String,
        /// JSON array of {"page": n, "text": "..."}
        #[arg(long)]
        pages: PathBuf,
        /// JSON array of extracted tables
        #[arg(long)]
        tables: Option<PathBuf>,
    },
    /// Print the block a citation id names
    Resolve {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        id: String,
    },
    /// Parse a judge response and apply the dimension's guards
    Guard {
        #[arg(long)]
        dimension: DimensionId,
        /// Raw judge response
        #[arg(long)]
        verdict: PathBuf,
    },
    /// Resolve citations and verify quotes for a judge response
    Ground {
        #[arg(long)]
        store: PathBuf,
        /// Raw judge response
        #[arg(long)]
        verdict: PathBuf,
        /// Resolve ids only; do not verify quotes
        #[arg(long)]
        no_strict: bool,
    },
    /// Judge and meta-evaluate a document with a completion provider
    Review {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        store: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct Resolved<'a> {
    block_id: &'a str,
    kind: lrrit_core::BlockKind,
    page: u32,
    text: &'a str,
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn load_store(path: &Path) -> Result<EvidenceStore> {
    EvidenceStore::from_json(&read(path)?)
        .with_context(|| format!("loading evidence store {}", path.display()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cmd: Command) -> Result<()> {
    match cmd {
        Command::Match { quote, block_file } => {
            let block = read(&block_file)?;
            print_json(&match_quote(&quote, &block))
        }
        Command::Pack {
            document_id,
            source,
            pages,
            tables,
        } => {
            let pages: Vec<PageText> =
                serde_json::from_str(&read(&pages)?).context("parsing pages")?;
            let tables: Vec<TableInput> = match tables {
                Some(path) => serde_json::from_str(&read(&path)?).context("parsing tables")?,
                None => Vec::new(),
            };

            let store = EvidenceStoreBuilder::new(document_id, source)
                .pages(pages)
                .tables(tables)
                .build()?;
            tracing::info!(
                document_id = %store.document_id(),
                text_blocks = store.text_blocks().len(),
                tables = store.tables().len(),
                store_hash = %store.store_hash(),
                "Evidence store built"
            );
            print_json(&store)
        }
        Command::Resolve { store, id } => {
            let store = load_store(&store)?;
            let Some(block) = store.resolve(&id) else {
                bail!("'{}' does not name a block in {}", id, store.document_id());
            };
            print_json(&Resolved {
                block_id: block.block_id,
                kind: block.kind,
                page: block.page,
                text: block.text,
            })
        }
        Command::Guard { dimension, verdict } => {
            let guarded = parse_verdict(dimension, &read(&verdict)?)?;
            print_json(&guarded)
        }
        Command::Ground {
            store,
            verdict,
            no_strict,
        } => {
            let store = load_store(&store)?;
            let verdict: AgentVerdict =
                parse_response(&read(&verdict)?, ResponseSchema::AgentVerdict)?;
            print_json(&ground_evidence(&store, &verdict.evidence, !no_strict))
        }
        Command::Review { config, store } => {
            let config = RuntimeConfig::from_file(&config)
                .with_context(|| format!("loading config {}", config.display()))?;
            let store = load_store(&store)?;

            let registry = ProviderRegistry::with_defaults();
            if !registry.has_provider(&config.provider.kind) {
                bail!(
                    "provider '{}' is not compiled in (available: {:?}); rebuild with --features {}",
                    config.provider.kind,
                    registry.available_types(),
                    config.provider.kind
                );
            }

            let orchestrator = ReviewOrchestrator::from_config(&config, &registry)?;
            let report = orchestrator.review(&store).await;
            print_json(&report)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli.cmd).await
}
