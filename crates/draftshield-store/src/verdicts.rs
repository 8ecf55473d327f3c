//! Per-event gate status.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Outcome of one pipeline run, as far as the drafting gate is concerned.
///
/// `gated` is derived, never set directly: a text is gated unless
/// verification passed AND the audit saw no semantic risk.
#[derive(Debug, Clone, Serialize)]
pub struct VerdictStatus {
    pub verification_passed: bool,
    pub semantic_risk: bool,
    pub gated: bool,
    pub approval_required: bool,
    /// SHA-256 hash of the outstanding approval token, if one was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_token_hash: Option<String>,
}

impl VerdictStatus {
    pub fn new(verification_passed: bool, semantic_risk: bool) -> Self {
        let gated = !verification_passed || semantic_risk;
        Self {
            verification_passed,
            semantic_risk,
            gated,
            approval_required: gated,
            approval_token_hash: None,
        }
    }

    pub fn with_token_hash(mut self, hash: String) -> Self {
        self.approval_token_hash = Some(hash);
        self
    }
}

pub struct VerdictStore {
    entries: DashMap<Uuid, (VerdictStatus, Instant)>,
    ttl: Duration,
}

impl VerdictStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Record the verdict for an event. Last writer wins; a re-run replaces
    /// whatever an earlier run stored.
    pub fn set(&self, event_id: Uuid, status: VerdictStatus) {
        debug!(
            event_id = %event_id,
            gated = status.gated,
            verification_passed = status.verification_passed,
            semantic_risk = status.semantic_risk,
            "verdict recorded"
        );
        self.entries
            .insert(event_id, (status, Instant::now() + self.ttl));
    }

    pub fn get(&self, event_id: &Uuid) -> Option<VerdictStatus> {
        self.entries.get(event_id).and_then(|entry| {
            let (status, deadline) = entry.value();
            if Instant::now() < *deadline {
                Some(status.clone())
            } else {
                None
            }
        })
    }

    /// Missing or expired verdicts count as gated: no evidence of safety
    /// means no draft.
    pub fn is_gated(&self, event_id: &Uuid) -> bool {
        self.get(event_id).map(|s| s.gated).unwrap_or(true)
    }

    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, (_, deadline)| now < *deadline);
        before - self.entries.len()
    }
}
