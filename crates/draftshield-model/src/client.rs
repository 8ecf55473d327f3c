//! HTTP client for the local model endpoint.

use std::time::Duration;

use draftshield_core::{Error, Result, ShieldConfig};
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::debug;

use crate::extract::parse_lenient;
use crate::types::{AuditVerdict, DetectedPii, ModelError};
use crate::{AuditBackend, DetectBackend};

const DETECT_PROMPT: &str = r#"Identify all personally identifiable information (PII) in the following text.
Return ONLY a JSON object with this structure:
{
  "persons": ["name1", "name2"],
  "organizations": ["org1"],
  "emails": ["email1"],
  "phone_numbers": ["phone1"],
  "addresses": ["address1"]
}
If no PII is found, return empty arrays."#;

const AUDIT_PROMPT: &str = r#"You are a privacy auditor. Analyze this anonymized text for semantic leaks.
A semantic leak means the text reveals someone's identity through context,
even if names are replaced with tokens (for example "[PERSON_A] is the CEO
of [ORG_A]" when the organization is unique, or a very specific event).
Return ONLY a JSON object:
{
  "semantic_risk": true/false,
  "risk_reason": "short code or empty string"
}
Use short codes like "high_specificity_context", "unique_org_role",
"identifiable_location"."#;

/// Client for the detection and audit models.
///
/// Both calls use the same endpoint with a short timeout: if the model is
/// down we want to know within seconds and degrade, not stall the run.
#[derive(Clone)]
pub struct ModelClient {
    http: Client,
    base_url: String,
    detect_model: String,
    audit_model: String,
}

impl ModelClient {
    pub fn new(config: &ShieldConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.model_base_url.clone(),
            detect_model: config.detect_model.clone(),
            audit_model: config.audit_model.clone(),
        })
    }

    /// One generate round-trip; returns the raw response string.
    async fn generate(&self, model: &str, prompt: String) -> std::result::Result<String, ModelError> {
        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&json!({
                "model": model,
                "prompt": prompt,
                "stream": false,
                "format": "json",
            }))
            .send()
            .await
            .map_err(|e| ModelError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ModelError::Unreachable(format!("model {model} not found")));
        }
        if !status.is_success() {
            return Err(ModelError::Malformed(format!("status {status}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ModelError::Malformed(e.to_string()))?;

        body.get("response")
            .and_then(|r| r.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ModelError::Malformed("missing response field".into()))
    }

    async fn detect_pii(&self, text: &str) -> std::result::Result<DetectedPii, ModelError> {
        let prompt = format!("{DETECT_PROMPT}\n\nText to analyze:\n{text}\n\nJSON:");
        let raw = self.generate(&self.detect_model, prompt).await?;
        let pii: DetectedPii =
            parse_lenient(&raw).map_err(|e| ModelError::Malformed(e.to_string()))?;
        debug!(
            model = %self.detect_model,
            items = pii.total(),
            "PII detection completed"
        );
        Ok(pii)
    }

    async fn audit_text(&self, text: &str) -> std::result::Result<AuditVerdict, ModelError> {
        let prompt = format!("{AUDIT_PROMPT}\n\nText to audit:\n{text}\n\nJSON:");
        let raw = self.generate(&self.audit_model, prompt).await?;
        let verdict: AuditVerdict =
            parse_lenient(&raw).map_err(|e| ModelError::Malformed(e.to_string()))?;
        debug!(
            model = %self.audit_model,
            semantic_risk = verdict.semantic_risk,
            reason_len = verdict.risk_reason.len(),
            "semantic audit completed"
        );
        Ok(verdict)
    }
}

impl DetectBackend for ModelClient {
    fn detect(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = std::result::Result<DetectedPii, ModelError>> + Send {
        self.detect_pii(text)
    }
}

impl AuditBackend for ModelClient {
    fn audit(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = std::result::Result<AuditVerdict, ModelError>> + Send {
        self.audit_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(timeout_secs: u64) -> ModelClient {
        let config = ShieldConfig {
            // nothing listens here; connection is refused immediately
            model_base_url: "http://127.0.0.1:9".into(),
            request_timeout_secs: timeout_secs,
            ..ShieldConfig::default()
        };
        ModelClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_infra_error() {
        let client = test_client(1);
        match client.detect_pii("some text").await {
            Err(ModelError::Unreachable(_)) => {}
            other => panic!("expected Unreachable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_audit_unreachable_endpoint() {
        let client = test_client(1);
        assert!(matches!(
            client.audit_text("[PERSON_A] var där.").await,
            Err(ModelError::Unreachable(_))
        ));
    }
}
