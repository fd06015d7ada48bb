//! JSON Schema validation for judge responses.
//!
//! Responses are checked against the embedded schemas in `schemas/` after
//! structure recovery and before typed decoding, so that an out-of-range
//! rating or score is reported with its JSON path rather than as a bare
//! decode error.

use std::fmt;
use std::sync::OnceLock;

const AGENT_VERDICT_SCHEMA_JSON: &str = include_str!("../schemas/agent_verdict.schema.json");
const META_RESPONSE_SCHEMA_JSON: &str = include_str!("../schemas/meta_response.schema.json");

static AGENT_VERDICT_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();
static META_RESPONSE_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// A response shape a judge is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSchema {
    /// `{rating, rationale, evidence[], uncertainty}` from a dimension judge
    AgentVerdict,
    /// `{overall, metrics[]}` from the meta-evaluator
    MetaResponse,
}

impl ResponseSchema {
    fn source(&self) -> &'static str {
        match self {
            ResponseSchema::AgentVerdict => AGENT_VERDICT_SCHEMA_JSON,
            ResponseSchema::MetaResponse => META_RESPONSE_SCHEMA_JSON,
        }
    }

    fn compiled(&self) -> Result<&'static jsonschema::Validator, String> {
        let cell = match self {
            ResponseSchema::AgentVerdict => &AGENT_VERDICT_SCHEMA,
            ResponseSchema::MetaResponse => &META_RESPONSE_SCHEMA,
        };

        let result = cell.get_or_init(|| {
            let schema_value: serde_json::Value = match serde_json::from_str(self.source()) {
                Ok(v) => v,
                Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
            };

            jsonschema::options()
                .build(&schema_value)
                .map_err(|e| format!("Failed to compile schema: {}", e))
        });

        result.as_ref().map_err(Clone::clone)
    }

    /// Validate a value, collecting every violation as `"<message> at <path>"`.
    pub fn validate(&self, value: &serde_json::Value) -> Result<(), Vec<String>> {
        let validator = self.compiled().map_err(|e| vec![e])?;

        let errors: Vec<String> = validator
            .iter_errors(value)
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn is_valid(&self, value: &serde_json::Value) -> bool {
        self.compiled().map(|v| v.is_valid(value)).unwrap_or(false)
    }
}

impl fmt::Display for ResponseSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseSchema::AgentVerdict => write!(f, "agent verdict"),
            ResponseSchema::MetaResponse => write!(f, "meta response"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_embedded_schemas_compile() {
        assert!(ResponseSchema::AgentVerdict.compiled().is_ok());
        assert!(ResponseSchema::MetaResponse.compiled().is_ok());
    }

    #[test]
    fn test_valid_agent_verdict() {
        let value = json!({
            "rating": "SOME",
            "rationale": "Partial reconstruction of the night shift.",
            "evidence": [{"id": "Text p04_c01", "quote": "at the time the ward was short-staffed", "evidence_type": "positive"}],
            "uncertainty": false
        });
        assert!(ResponseSchema::AgentVerdict.validate(&value).is_ok());
    }

    #[test]
    fn test_agent_verdict_tolerates_nulls_and_missing_optionals() {
        let value = json!({"rating": "LITTLE", "evidence": null, "rationale": null});
        assert!(ResponseSchema::AgentVerdict.is_valid(&value));
    }

    #[test]
    fn test_unknown_rating_is_reported_with_path() {
        let value = json!({"rating": "MOSTLY", "evidence": []});
        let errors = ResponseSchema::AgentVerdict.validate(&value).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("/rating"), "{}", errors[0]);
    }

    #[test]
    fn test_unknown_polarity_fails() {
        let value = json!({
            "rating": "GOOD",
            "evidence": [{"id": "Text p01_c01", "quote": "x", "evidence_type": "neutral"}]
        });
        assert!(!ResponseSchema::AgentVerdict.is_valid(&value));
    }

    #[test]
    fn test_meta_response_requires_overall_and_metrics() {
        assert!(!ResponseSchema::MetaResponse.is_valid(&json!({"overall": "PASS"})));
        assert!(!ResponseSchema::MetaResponse.is_valid(&json!({
            "overall": "GREAT",
            "metrics": []
        })));
        assert!(ResponseSchema::MetaResponse.is_valid(&json!({
            "overall": "WARN",
            "metrics": [{"metric_id": "M9", "score": "PASS"}]
        })));
    }
}
