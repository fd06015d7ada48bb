//! Prompt construction for dimension judges and the meta judge.
//!
//! Both prompts ask for strict JSON and carry the exact response shape the
//! schemas in `lrrit-core` enforce. The dimension prompt shows the whole
//! evidence store; the meta prompt shows only the blocks the dimension
//! judge cited.

use lrrit_core::{DimensionId, EvidenceStore, MetricId, ProgrammaticFlags, NO_EVIDENCE_BLOCKS};

/// Response shape requested from a dimension judge.
pub const AGENT_VERDICT_SHAPE: &str = r#"{
  "rating": "GOOD" | "SOME" | "LITTLE",
  "rationale": "string",
  "evidence": [
    {
      "id": "Text pXX_cYY" | "Table pXX_tYY",
      "quote": "verbatim excerpt from evidence, <= 25 words",
      "evidence_type": "positive" | "negative"
    }
  ],
  "uncertainty": true | false
}"#;

/// Response shape requested from the meta judge.
pub const META_RESPONSE_SHAPE: &str = r#"{
  "overall": "PASS" | "WARN" | "FAIL",
  "metrics": [
    {
      "metric_id": "M1",
      "score": "PASS" | "WARN" | "FAIL",
      "notes": "short, actionable notes (<= 2 sentences)"
    }
  ]
}"#;

/// Every block in the store as a citeable section.
///
/// Text blocks come first as `[Text <id> | page <n>]`, then tables as
/// `[Table <id> | page <n>]` followed by their fallback rendering.
pub fn render_evidence(store: &EvidenceStore) -> String {
    let text = store.text_blocks().iter().map(|block| {
        format!(
            "[Text {} | page {}]\n{}",
            block.id, block.provenance.page, block.text
        )
    });
    let tables = store.tables().iter().map(|table| {
        format!(
            "[Table {} | page {}]\n{}",
            table.id, table.provenance.page, table.text_fallback
        )
    });

    text.chain(tables).collect::<Vec<_>>().join("\n\n")
}

/// Prompt for judging one dimension over the whole store.
pub fn dimension_prompt(dimension: DimensionId, definition: &str, store: &EvidenceStore) -> String {
    format!(
        r#"You are an expert reviewer applying the Learning Response Review and Improvement Tool (LRRIT).

Dimension: {name} ({id}).

Definition:
{definition}

Task:
- Judge how strongly the report shows the qualities in the definition.
- Base your judgement ONLY on the evidence provided.

Rating options:
- GOOD evidence: the qualities are clear and consistent throughout
- SOME evidence: the qualities are partial, uneven or mixed
- LITTLE evidence: the qualities are mostly absent or contradicted

Return STRICT JSON ONLY (no markdown, no extra text):

{shape}

Rules:
- Every evidence item MUST include a verbatim quote from the cited Text/Table block (<= 25 words).
- Cite blocks by the ids shown in square brackets, e.g. "Text p03_c01" or "Table p02_t01".
- evidence_type:
  - "positive" = the excerpt shows the qualities in the definition.
  - "negative" = the excerpt shows their absence or opposite.
- If rating is GOOD: include at least one positive evidence item.
- If rating is LITTLE: include at least one negative evidence item (if present). If not present, evidence may be [] but set uncertainty true.
- If no relevant excerpt exists to quote, set evidence to [] AND set uncertainty true.
- Do not invent quotes. Do not paraphrase quotes.

Evidence:
{evidence}"#,
        name = dimension.name(),
        id = dimension.as_str(),
        definition = definition.trim(),
        shape = AGENT_VERDICT_SHAPE,
        evidence = render_evidence(store),
    )
}

/// The metric basket as `- M1 Rubric Fidelity` lines.
pub fn metric_list() -> String {
    MetricId::ALL
        .iter()
        .map(|m| format!("- {} {}", m.as_str(), m.name()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt for meta-evaluating one dimension judge's output.
///
/// `context` is the cited-blocks context from grounding; an empty context
/// is shown as the no-evidence placeholder.
pub fn meta_prompt(
    definition: &str,
    agent_output: &serde_json::Value,
    flags: &ProgrammaticFlags,
    context: &str,
) -> String {
    let agent_json =
        serde_json::to_string_pretty(agent_output).unwrap_or_else(|_| agent_output.to_string());
    let flags_json = serde_json::to_string_pretty(flags).unwrap_or_default();
    let context = if context.is_empty() {
        NO_EVIDENCE_BLOCKS
    } else {
        context
    };

    format!(
        r#"You are an LLM-as-Judge (LaJ) meta-evaluator. Your job is to assess the QUALITY of a dimension-agent's output,
not to re-review the original report.

You MUST NOT introduce new evidence from outside the supplied evidence blocks.
You MUST NOT re-grade the report for the dimension; only judge whether the agent output is rubric-faithful,
well-grounded, coherent, values-aligned, transparent about uncertainty, and free of unsupported claims.

Target dimension definition (what the agent should be judging):
{definition}

Dimension agent output (JSON):
{agent_json}

Programmatic QA flags (JSON):
{flags_json}

Referenced evidence blocks ONLY (agent-cited):
{context}

Metric basket:
{metrics}

Return STRICT JSON ONLY in the following schema:

{shape}

Scoring guidance:
- PASS: clearly meets the metric
- WARN: partially meets; minor gaps
- FAIL: materially fails; unreliable

Rules:
- Provide ALL 6 metrics M1..M6 exactly once.
- Keep notes short and actionable.
- If programmatic flags indicate issues (missing evidence, invalid evidence id, quote mismatch), reflect this in M2/M6.
Hallucination Screening (M6) is ONLY about unsupported factual assertions about the report content.
- PASS if the rationale stays within what is supported by the provided evidence blocks, even if the critique is generic.
- WARN if evidence is thin but not demonstrably false.
- FAIL only if the rationale asserts facts that are not present in the provided evidence blocks, OR programmatic flags indicate invalid evidence IDs / unverifiable quotes.

Do NOT use M6 to penalise "insufficient specificity", "weak emphasis", or "could have cited more examples".
Those belong in M1/M3 (rubric fidelity / reasoning quality)."#,
        definition = definition.trim(),
        agent_json = agent_json,
        flags_json = flags_json,
        context = context,
        metrics = metric_list(),
        shape = META_RESPONSE_SHAPE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lrrit_core::{EvidenceStoreBuilder, TableInput};

    fn store() -> EvidenceStore {
        EvidenceStoreBuilder::new("case-17", "case-17.pdf")
            .page(3, "The escalation policy was ambiguous on nights.")
            .page(1, "Summary of the incident.")
            .table(TableInput {
                table_id: Some("p02_t01".into()),
                header: Some(vec!["Time".into(), "NEWS2".into()]),
                rows: vec![vec!["02:10".into(), "7".into()]],
                ..TableInput::new(2)
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_evidence_lists_text_then_tables() {
        let rendered = render_evidence(&store());

        let text = rendered.find("[Text p03_c01 | page 3]\nThe escalation policy").unwrap();
        let table = rendered.find("[Table p02_t01 | page 2]\n[Table p02_t01 | page 2]").unwrap();
        assert!(text < table);
        assert!(rendered.contains("| 02:10 | 7 |"));
    }

    #[test]
    fn test_dimension_prompt_carries_definition_and_shape() {
        let prompt = dimension_prompt(DimensionId::D4, "Avoid person-focused blame.", &store());

        assert!(prompt.contains("Dimension: Blame language avoided (D4)."));
        assert!(prompt.contains("Avoid person-focused blame."));
        assert!(prompt.contains(r#""evidence_type": "positive" | "negative""#));
        assert!(prompt.ends_with(&render_evidence(&store())));
    }

    #[test]
    fn test_metric_list_names_all_six() {
        let list = metric_list();
        assert_eq!(list.lines().count(), 6);
        assert!(list.starts_with("- M1 Rubric Fidelity"));
        assert!(list.ends_with("- M6 Hallucination Screening"));
    }

    #[test]
    fn test_meta_prompt_uses_placeholder_for_empty_context() {
        let flags = ProgrammaticFlags {
            missing_evidence: true,
            ..ProgrammaticFlags::default()
        };
        let prompt = meta_prompt(
            DimensionId::D2.definition(),
            &serde_json::json!({"agent_id": "D2", "rating": "SOME"}),
            &flags,
            "",
        );

        assert!(prompt.contains(NO_EVIDENCE_BLOCKS));
        assert!(prompt.contains("\"missing_evidence\": true"));
        assert!(prompt.contains("\"agent_id\": \"D2\""));
        assert!(prompt.contains("- M4 Values Alignment (PSIRF/LRRIT)"));
    }

    #[test]
    fn test_meta_prompt_shows_only_given_context() {
        let prompt = meta_prompt(
            "Local rationality.",
            &serde_json::json!({}),
            &ProgrammaticFlags::default(),
            "[Text p03_c01]\nThe escalation policy was ambiguous on nights.",
        );
        assert!(prompt.contains("agent-cited):\n[Text p03_c01]\nThe escalation policy"));
        assert!(!prompt.contains("Summary of the incident."));
        assert!(!prompt.contains(NO_EVIDENCE_BLOCKS));
    }
}
