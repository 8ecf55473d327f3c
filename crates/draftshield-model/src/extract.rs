//! Tolerant JSON extraction from model output.
//!
//! Local models wrap JSON in markdown fences or surrounding prose despite
//! being asked not to. Strip the wrapping, then decode into the typed struct.

use serde::de::DeserializeOwned;

/// Cut the JSON object out of a possibly fenced / prose-wrapped response.
pub fn extract_json(raw: &str) -> &str {
    let inner = if let Some(start) = raw.find("```") {
        let after = &raw[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        match after.find("```") {
            Some(end) => &after[..end],
            None => after,
        }
    } else {
        raw
    };

    match (inner.find('{'), inner.rfind('}')) {
        (Some(start), Some(end)) if end >= start => &inner[start..=end],
        _ => inner.trim(),
    }
}

pub fn parse_lenient<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(extract_json(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AuditVerdict, DetectedPii};

    #[test]
    fn test_plain_json() {
        let v: AuditVerdict =
            parse_lenient(r#"{"semantic_risk": true, "risk_reason": "unique_org_role"}"#).unwrap();
        assert!(v.semantic_risk);
        assert_eq!(v.risk_reason, "unique_org_role");
    }

    #[test]
    fn test_fenced_json() {
        let raw = "```json\n{\"semantic_risk\": false, \"risk_reason\": \"\"}\n```";
        let v: AuditVerdict = parse_lenient(raw).unwrap();
        assert!(!v.semantic_risk);
    }

    #[test]
    fn test_prose_wrapped_json() {
        let raw = "Here is my analysis: {\"persons\": [\"John Doe\"], \"emails\": []} hope it helps";
        let pii: DetectedPii = parse_lenient(raw).unwrap();
        assert_eq!(pii.persons, vec!["John Doe"]);
    }

    #[test]
    fn test_missing_fields_default() {
        let pii: DetectedPii = parse_lenient("{}").unwrap();
        assert!(pii.is_empty());
    }

    #[test]
    fn test_garbage_is_error() {
        assert!(parse_lenient::<AuditVerdict>("I cannot answer that.").is_err());
    }
}
