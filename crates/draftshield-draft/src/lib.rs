//! The drafting boundary — the last check before text reaches a writer.
//!
//! Everything upstream can degrade; this boundary cannot. It trusts only
//! the stored verdict for an event, never flags supplied by the caller,
//! and for gated events it demands a valid approval token.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use draftshield_store::{ApprovalService, VerdictStore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct DraftSubmission {
    pub event_id: Uuid,
    pub clean_text: String,
    /// The caller's own claim. Refusal-only: a `false` here refuses even a
    /// safe event, a `true` never overrides the stored verdict.
    pub is_anonymized: bool,
    pub approval_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftAccepted {
    pub draft_id: Uuid,
    pub event_id: Uuid,
    /// True when acceptance went through an approval token rather than a
    /// clean verdict.
    pub approved_override: bool,
    pub accepted_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftRefusal {
    #[error("no verdict recorded for this event")]
    NoVerdict,
    #[error("text is not anonymized")]
    NotAnonymized,
    #[error("event is gated and requires a valid approval token")]
    ApprovalRequired,
}

pub struct DraftBoundary {
    verdicts: Arc<VerdictStore>,
    approvals: Arc<ApprovalService>,
}

impl DraftBoundary {
    pub fn new(verdicts: Arc<VerdictStore>, approvals: Arc<ApprovalService>) -> Self {
        Self {
            verdicts,
            approvals,
        }
    }

    /// Accept or refuse a draft submission.
    ///
    /// A missing or expired verdict refuses: no evidence of safety means no
    /// draft. Gated events pass only with a token that verifies for exactly
    /// this event id.
    pub fn submit(&self, sub: &DraftSubmission) -> Result<DraftAccepted, DraftRefusal> {
        let Some(status) = self.verdicts.get(&sub.event_id) else {
            warn!(event_id = %sub.event_id, "draft refused, no verdict on file");
            return Err(DraftRefusal::NoVerdict);
        };

        if !sub.is_anonymized {
            warn!(event_id = %sub.event_id, "draft refused, caller flagged text as raw");
            return Err(DraftRefusal::NotAnonymized);
        }

        let approved_override = if status.gated {
            let valid = sub
                .approval_token
                .as_deref()
                .map(|token| self.approvals.verify(&sub.event_id, token))
                .unwrap_or(false);
            if !valid {
                warn!(event_id = %sub.event_id, "draft refused, gated without valid token");
                return Err(DraftRefusal::ApprovalRequired);
            }
            true
        } else {
            false
        };

        let accepted = DraftAccepted {
            draft_id: Uuid::new_v4(),
            event_id: sub.event_id,
            approved_override,
            accepted_at: Utc::now(),
        };
        info!(
            event_id = %sub.event_id,
            draft_id = %accepted.draft_id,
            approved_override,
            "draft accepted"
        );
        Ok(accepted)
    }

    /// Standalone token check, used by the approval endpoint.
    pub fn present_token(&self, event_id: &Uuid, token: &str) -> bool {
        self.approvals.verify(event_id, token)
    }
}
