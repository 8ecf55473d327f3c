//! Human approval tokens for gated texts.
//!
//! Only the SHA-256 hash of a token is retained. The plaintext is returned
//! once at issue time and never stored, so a memory dump of this process
//! cannot mint approvals.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;

pub struct ApprovalService {
    by_event: DashMap<Uuid, (String, Instant)>,
    ttl: Duration,
}

impl ApprovalService {
    pub fn new(ttl: Duration) -> Self {
        Self {
            by_event: DashMap::new(),
            ttl,
        }
    }

    /// Issue a fresh approval token for an event, replacing any previous
    /// one. Returns the plaintext token.
    pub fn issue(&self, event_id: Uuid) -> String {
        let token = format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        );
        self.by_event
            .insert(event_id, (token_hash(&token), Instant::now() + self.ttl));
        debug!(event_id = %event_id, "approval token issued");
        token
    }

    /// Check a presented token against the stored hash for this event.
    pub fn verify(&self, event_id: &Uuid, token: &str) -> bool {
        let Some(entry) = self.by_event.get(event_id) else {
            warn!(event_id = %event_id, "approval check for event with no token");
            return false;
        };
        let (hash, deadline) = entry.value();
        if Instant::now() >= *deadline {
            return false;
        }
        *hash == token_hash(token)
    }

    pub fn revoke(&self, event_id: &Uuid) {
        self.by_event.remove(event_id);
    }

    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.by_event.len();
        self.by_event.retain(|_, (_, deadline)| now < *deadline);
        before - self.by_event.len()
    }
}

/// SHA-256 hex digest of a token. This is the only form a token exists in
/// after issue time.
pub fn token_hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let approvals = ApprovalService::new(Duration::from_secs(60));
        let id = Uuid::new_v4();
        let token = approvals.issue(id);
        assert!(token.len() >= 16);
        assert!(approvals.verify(&id, &token));
        assert!(!approvals.verify(&id, "wrong-token"));
        assert!(!approvals.verify(&Uuid::new_v4(), &token));
    }

    #[test]
    fn test_reissue_invalidates_old_token() {
        let approvals = ApprovalService::new(Duration::from_secs(60));
        let id = Uuid::new_v4();
        let old = approvals.issue(id);
        let new = approvals.issue(id);
        assert!(!approvals.verify(&id, &old));
        assert!(approvals.verify(&id, &new));
    }

    #[test]
    fn test_expired_token_rejected() {
        let approvals = ApprovalService::new(Duration::ZERO);
        let id = Uuid::new_v4();
        let token = approvals.issue(id);
        std::thread::sleep(Duration::from_millis(5));
        assert!(!approvals.verify(&id, &token));
        assert_eq!(approvals.evict_expired(), 1);
    }

    #[test]
    fn test_revoke() {
        let approvals = ApprovalService::new(Duration::from_secs(60));
        let id = Uuid::new_v4();
        let token = approvals.issue(id);
        approvals.revoke(&id);
        assert!(!approvals.verify(&id, &token));
    }
}
