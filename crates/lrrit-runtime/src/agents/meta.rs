//! The second-pass judge of a dimension judge's output.

use lrrit_core::{ground_evidence, EvidenceStore, MetaVerdict};
use std::sync::Arc;

use super::traits::{AgentError, AgentRun};
use crate::client::CompletionClient;
use crate::prompts::meta_prompt;

/// Grounds a dimension run's citations, asks the meta judge to score the
/// run, and guards that score against the grounding flags.
pub struct MetaEvaluator {
    client: Arc<CompletionClient>,
    strict_quote_check: bool,
}

impl MetaEvaluator {
    pub fn new(client: Arc<CompletionClient>) -> Self {
        Self {
            client,
            strict_quote_check: true,
        }
    }

    /// Skip quote verification; ids are still resolved.
    pub fn with_strict_quote_check(mut self, strict: bool) -> Self {
        self.strict_quote_check = strict;
        self
    }

    pub async fn evaluate(
        &self,
        store: &EvidenceStore,
        run: &AgentRun,
        definition: &str,
    ) -> Result<MetaVerdict, AgentError> {
        let report = ground_evidence(store, &run.verdict.verdict.evidence, self.strict_quote_check);
        let prompt = meta_prompt(definition, &run.agent_output(), &report.flags, &report.context);

        let raw_output = self.client.complete(&prompt).await?;
        let verdict = MetaVerdict::from_response(
            run.agent_id.clone(),
            run.dimension.clone(),
            report.flags,
            raw_output,
        )
        .map_err(|e| {
            tracing::warn!(agent_id = %run.agent_id, error = %e, "Meta response rejected");
            e
        })?;

        tracing::info!(
            agent_id = %verdict.agent_id,
            overall = %verdict.overall,
            missing_evidence = verdict.flags.missing_evidence,
            invalid_evidence_id = verdict.flags.invalid_evidence_id,
            quote_mismatch = verdict.flags.quote_mismatch,
            "Meta-evaluation complete"
        );

        Ok(verdict)
    }
}
