//! The completion-backed judge used for every built-in dimension.

use async_trait::async_trait;
use lrrit_core::{
    parse_response, AgentVerdict, DimensionId, EvidenceStore, GuardEngine, ResponseSchema,
};
use std::sync::Arc;

use super::traits::{AgentError, AgentRun, DimensionJudge};
use crate::client::CompletionClient;
use crate::prompts::dimension_prompt;

/// Judges one dimension with one completion call, then guards the verdict.
pub struct DimensionAgent {
    dimension: DimensionId,
    definition: String,
    client: Arc<CompletionClient>,
    guards: Arc<GuardEngine>,
}

impl DimensionAgent {
    /// A judge using the built-in definition and the standard guard table.
    pub fn new(dimension: DimensionId, client: Arc<CompletionClient>) -> Self {
        Self {
            dimension,
            definition: dimension.definition().to_string(),
            client,
            guards: Arc::new(GuardEngine::default()),
        }
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    pub fn with_guards(mut self, guards: Arc<GuardEngine>) -> Self {
        self.guards = guards;
        self
    }
}

#[async_trait]
impl DimensionJudge for DimensionAgent {
    fn dimension(&self) -> DimensionId {
        self.dimension
    }

    fn definition(&self) -> &str {
        &self.definition
    }

    async fn judge(&self, store: &EvidenceStore) -> Result<AgentRun, AgentError> {
        let prompt = dimension_prompt(self.dimension, &self.definition, store);
        let raw_output = self.client.complete(&prompt).await?;

        let verdict: AgentVerdict =
            parse_response(&raw_output, ResponseSchema::AgentVerdict).map_err(|e| {
                tracing::warn!(dimension = %self.dimension, error = %e, "Judge response rejected");
                e
            })?;
        let verdict = self.guards.apply(self.dimension, verdict);

        tracing::info!(
            dimension = %self.dimension,
            rating = %verdict.verdict.rating,
            evidence_items = verdict.verdict.evidence.len(),
            uncertainty = verdict.verdict.uncertainty,
            guard_findings = verdict.findings.len(),
            "Dimension judged"
        );

        Ok(AgentRun {
            agent_id: self.dimension.as_str().to_string(),
            dimension: self.dimension.name().to_string(),
            verdict,
            raw_output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::scripted::ScriptedProvider;
    use crate::providers::CompletionConfig;
    use lrrit_core::{EvidenceStoreBuilder, GuardTable, ParseError, Rating};

    fn store() -> EvidenceStore {
        EvidenceStoreBuilder::new("case-17", "case-17.pdf")
            .page(4, "Staff explained at the time that the escalation pathway was unclear.")
            .build()
            .unwrap()
    }

    fn agent(dimension: DimensionId, provider: Arc<ScriptedProvider>) -> DimensionAgent {
        let client = Arc::new(CompletionClient::new(provider, CompletionConfig::default()));
        DimensionAgent::new(dimension, client)
    }

    #[tokio::test]
    async fn test_judge_parses_and_guards() {
        let provider = Arc::new(ScriptedProvider::constant(
            r#"```json
{"rating": "GOOD", "rationale": "Reasoning at the time is explained.",
 "evidence": [{"id": "Text p04_c01", "quote": "the escalation pathway was unclear", "evidence_type": "negative"}],
 "uncertainty": false}
```"#,
        ));
        let run = agent(DimensionId::D5, provider.clone())
            .judge(&store())
            .await
            .unwrap();

        assert_eq!(run.agent_id, "D5");
        assert_eq!(run.dimension, "Local rationality");
        assert_eq!(run.verdict.verdict.rating, Rating::Good);
        assert!(run.verdict.verdict.uncertainty);
        assert!(run.verdict.fired("R2-GOOD-POSITIVE"));
        assert!(run.raw_output.starts_with("```json"));

        let prompt = &provider.calls()[0][1].content;
        assert!(prompt.contains("[Text p04_c01 | page 4]"));
    }

    #[tokio::test]
    async fn test_unrecoverable_response_is_an_error() {
        let provider = Arc::new(ScriptedProvider::constant("I would rate this GOOD."));
        let result = agent(DimensionId::D2, provider).judge(&store()).await;
        assert!(matches!(result, Err(AgentError::Parse(ParseError::Unrecoverable))));
    }

    #[tokio::test]
    async fn test_custom_definition_and_guards() {
        let provider = Arc::new(ScriptedProvider::constant(
            r#"{"rating": "LITTLE", "rationale": "", "evidence": null}"#,
        ));
        let client = Arc::new(CompletionClient::new(provider.clone(), CompletionConfig::default()));
        let judge = DimensionAgent::new(DimensionId::D7, client)
            .with_definition("Actions have named owners and review dates.")
            .with_guards(Arc::new(GuardEngine::new(GuardTable::generic())));

        let run = judge.judge(&store()).await.unwrap();
        assert_eq!(judge.definition(), "Actions have named owners and review dates.");
        assert!(run.verdict.verdict.evidence.is_empty());
        assert!(run.verdict.fired("R1-AUDITABILITY"));
        assert!(provider.calls()[0][1]
            .content
            .contains("Actions have named owners and review dates."));
    }

    #[test]
    fn test_agent_output_shape() {
        let run = AgentRun {
            agent_id: "D4".into(),
            dimension: DimensionId::D4.name().into(),
            verdict: lrrit_core::guard(
                DimensionId::D4,
                AgentVerdict::new(Rating::Some, "Mixed framing."),
            ),
            raw_output: "{}".into(),
        };
        let output = run.agent_output();

        assert_eq!(output["agent_id"], "D4");
        assert_eq!(output["rating"], "SOME");
        assert_eq!(output["uncertainty"], true);
        assert!(output.get("findings").is_none());
        assert!(output.get("raw_output").is_none());
    }
}
