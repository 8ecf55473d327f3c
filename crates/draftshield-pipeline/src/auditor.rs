//! Layer 3 — semantic leak audit with a two-tier failure policy.

use draftshield_model::{AuditBackend, ModelError};
use tracing::warn;

/// Reasons longer than this are model chatter, not codes.
const MAX_REASON_LEN: usize = 50;

#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub semantic_risk: bool,
    pub reason: String,
    /// True when the verdict came from the failure policy rather than the
    /// model.
    pub degraded: bool,
}

/// Asks the audit backend whether anonymized text still identifies someone.
///
/// Failure policy is deliberately asymmetric: an unreachable model is an
/// infrastructure problem and fails open, while a reachable model producing
/// garbage fails closed — it looked at the text and we could not read its
/// answer.
pub struct SemanticAuditor<A: AuditBackend> {
    backend: A,
}

impl<A: AuditBackend> SemanticAuditor<A> {
    pub fn new(backend: A) -> Self {
        Self { backend }
    }

    pub async fn audit(&self, text: &str) -> AuditOutcome {
        match self.backend.audit(text).await {
            Ok(verdict) => {
                let reason = if verdict.risk_reason.len() > MAX_REASON_LEN {
                    "high_specificity_context".to_string()
                } else {
                    verdict.risk_reason
                };
                AuditOutcome {
                    semantic_risk: verdict.semantic_risk,
                    reason,
                    degraded: false,
                }
            }
            Err(ModelError::Unreachable(e)) => {
                warn!(error = %e, "audit model unreachable, failing open");
                AuditOutcome {
                    semantic_risk: false,
                    reason: "audit_unavailable".to_string(),
                    degraded: true,
                }
            }
            Err(ModelError::Malformed(e)) => {
                warn!(error = %e, "audit response unusable, failing closed");
                AuditOutcome {
                    semantic_risk: true,
                    reason: "audit_failed".to_string(),
                    degraded: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftshield_model::AuditVerdict;

    struct StubAudit(std::result::Result<AuditVerdict, ModelError>);

    impl AuditBackend for StubAudit {
        fn audit(
            &self,
            _text: &str,
        ) -> impl std::future::Future<Output = std::result::Result<AuditVerdict, ModelError>> + Send
        {
            let result = self.0.clone();
            async move { result }
        }
    }

    #[tokio::test]
    async fn test_long_reason_coerced_to_code() {
        let auditor = SemanticAuditor::new(StubAudit(Ok(AuditVerdict {
            semantic_risk: true,
            risk_reason: "this reason rambles on about the specific people and places involved"
                .into(),
        })));
        let outcome = auditor.audit("[PERSON_A] var där.").await;
        assert!(outcome.semantic_risk);
        assert_eq!(outcome.reason, "high_specificity_context");
    }

    #[tokio::test]
    async fn test_short_reason_kept() {
        let auditor = SemanticAuditor::new(StubAudit(Ok(AuditVerdict {
            semantic_risk: true,
            risk_reason: "unique_org_role".into(),
        })));
        let outcome = auditor.audit("x").await;
        assert_eq!(outcome.reason, "unique_org_role");
    }

    #[tokio::test]
    async fn test_unreachable_fails_open() {
        let auditor = SemanticAuditor::new(StubAudit(Err(ModelError::Unreachable("down".into()))));
        let outcome = auditor.audit("x").await;
        assert!(!outcome.semantic_risk);
        assert_eq!(outcome.reason, "audit_unavailable");
        assert!(outcome.degraded);
    }

    #[tokio::test]
    async fn test_malformed_fails_closed() {
        let auditor = SemanticAuditor::new(StubAudit(Err(ModelError::Malformed("junk".into()))));
        let outcome = auditor.audit("x").await;
        assert!(outcome.semantic_risk);
        assert_eq!(outcome.reason, "audit_failed");
        assert!(outcome.degraded);
    }
}
