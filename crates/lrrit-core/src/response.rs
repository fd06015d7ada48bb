//! Recovery of a structured object from free-form completion text.
//!
//! Two bounded stages only:
//!
//! 1. parse the trimmed response as JSON
//! 2. parse the inclusive slice from the first `{` to the last `}`
//!
//! Anything else fails. A malformed response is never coerced into a
//! default verdict.

use serde::de::DeserializeOwned;

use crate::schema::ResponseSchema;

/// Errors from parsing a judge response.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Response did not contain a JSON object")]
    Unrecoverable,

    #[error("Response failed {schema} validation: {}", .errors.join("; "))]
    SchemaViolation {
        schema: ResponseSchema,
        errors: Vec<String>,
    },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Recover the JSON object encoded in a completion.
pub fn recover_json(text: &str) -> Option<serde_json::Value> {
    let text = text.trim();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        if value.is_object() {
            return Some(value);
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }

    serde_json::from_str::<serde_json::Value>(&text[start..=end])
        .ok()
        .filter(serde_json::Value::is_object)
}

/// Recover, validate and decode a judge response.
pub fn parse_response<T: DeserializeOwned>(
    text: &str,
    schema: ResponseSchema,
) -> Result<T, ParseError> {
    let value = recover_json(text).ok_or(ParseError::Unrecoverable)?;

    schema
        .validate(&value)
        .map_err(|errors| ParseError::SchemaViolation { schema, errors })?;

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::{AgentVerdict, Rating};

    #[test]
    fn test_plain_json() {
        let value = recover_json(r#"  {"rating": "GOOD"}  "#).unwrap();
        assert_eq!(value["rating"], "GOOD");
    }

    #[test]
    fn test_fenced_json_with_prose() {
        let text = "Here is my assessment:\n```json\n{\"rating\": \"SOME\", \"evidence\": []}\n```\nThanks.";
        let value = recover_json(text).unwrap();
        assert_eq!(value["rating"], "SOME");
    }

    #[test]
    fn test_non_object_json_falls_through_to_slice() {
        assert_eq!(recover_json("\"no object here\""), None);
        assert_eq!(recover_json("[1, 2, 3]"), None);
    }

    #[test]
    fn test_garbage_is_unrecoverable() {
        assert_eq!(recover_json("I could not find any evidence."), None);
        assert_eq!(recover_json("} reversed {"), None);
        assert_eq!(recover_json("{ not: json }"), None);
        assert_eq!(recover_json(""), None);
    }

    #[test]
    fn test_parse_response_decodes_agent_verdict() {
        let text = "Result: {\"rating\": \"LITTLE\", \"rationale\": \"Blame throughout.\", \"evidence\": [{\"id\": \"Text p02_c01\", \"quote\": \"the nurse failed to escalate\", \"evidence_type\": \"negative\"}]}";
        let verdict: AgentVerdict = parse_response(text, ResponseSchema::AgentVerdict).unwrap();
        assert_eq!(verdict.rating, Rating::Little);
        assert!(!verdict.uncertainty);
    }

    #[test]
    fn test_parse_response_reports_schema_violation() {
        let result: Result<AgentVerdict, _> =
            parse_response(r#"{"rating": "EXCELLENT"}"#, ResponseSchema::AgentVerdict);
        assert!(matches!(
            result,
            Err(ParseError::SchemaViolation {
                schema: ResponseSchema::AgentVerdict,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_response_never_defaults() {
        let result: Result<AgentVerdict, _> =
            parse_response("Rating: GOOD", ResponseSchema::AgentVerdict);
        assert!(matches!(result, Err(ParseError::Unrecoverable)));
    }
}
