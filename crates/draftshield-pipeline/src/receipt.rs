//! Append-only run receipts.
//!
//! A receipt records what happened to an event without recording the event:
//! step names, statuses, timing, and numeric metrics. No values, no text,
//! only a hash of the final output.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Ok,
    Retry,
    Blocked,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptStep {
    pub name: String,
    pub status: StepStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// Counts and category tallies only.
    pub metrics: BTreeMap<String, u64>,
}

/// Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub event_id: Uuid,
    pub steps: Vec<ReceiptStep>,
    pub flags: Vec<String>,
    pub clean_text_sha256: String,
    pub completed_at: DateTime<Utc>,
}

pub struct ReceiptBuilder {
    event_id: Uuid,
    steps: Vec<ReceiptStep>,
    flags: Vec<String>,
    mark: DateTime<Utc>,
}

impl ReceiptBuilder {
    pub fn new(event_id: Uuid) -> Self {
        Self {
            event_id,
            steps: Vec::new(),
            flags: Vec::new(),
            mark: Utc::now(),
        }
    }

    /// Append a step. Its start time is the end of the previous step.
    pub fn step(&mut self, name: &str, status: StepStatus, metrics: BTreeMap<String, u64>) {
        self.step_with_model(name, status, None, metrics);
    }

    pub fn step_with_model(
        &mut self,
        name: &str,
        status: StepStatus,
        model_id: Option<String>,
        metrics: BTreeMap<String, u64>,
    ) {
        let now = Utc::now();
        self.steps.push(ReceiptStep {
            name: name.to_string(),
            status,
            started_at: self.mark,
            ended_at: now,
            model_id,
            metrics,
        });
        self.mark = now;
    }

    /// Record a flag once; repeats are dropped.
    pub fn flag(&mut self, flag: &str) {
        if !self.flags.iter().any(|f| f == flag) {
            self.flags.push(flag.to_string());
        }
    }

    pub fn finish(self, clean_text: &str) -> Receipt {
        Receipt {
            event_id: self.event_id,
            steps: self.steps,
            flags: self.flags,
            clean_text_sha256: hex::encode(Sha256::digest(clean_text.as_bytes())),
            completed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_ordered_and_timed() {
        let mut builder = ReceiptBuilder::new(Uuid::new_v4());
        builder.step("l0_mask", StepStatus::Ok, BTreeMap::new());
        builder.step("l1_anonymize", StepStatus::Retry, BTreeMap::new());
        let receipt = builder.finish("clean");
        assert_eq!(receipt.steps.len(), 2);
        assert_eq!(receipt.steps[0].name, "l0_mask");
        assert!(receipt.steps[0].ended_at <= receipt.steps[1].started_at);
    }

    #[test]
    fn test_flags_deduplicated() {
        let mut builder = ReceiptBuilder::new(Uuid::new_v4());
        builder.flag("verification_failed");
        builder.flag("verification_failed");
        let receipt = builder.finish("");
        assert_eq!(receipt.flags, vec!["verification_failed"]);
    }

    #[test]
    fn test_hash_covers_clean_text() {
        let a = ReceiptBuilder::new(Uuid::new_v4()).finish("text a");
        let b = ReceiptBuilder::new(Uuid::new_v4()).finish("text b");
        assert_ne!(a.clean_text_sha256, b.clean_text_sha256);
        assert_eq!(a.clean_text_sha256.len(), 64);
    }

    #[test]
    fn test_serialized_statuses_are_lowercase() {
        let json = serde_json::to_string(&StepStatus::Blocked).unwrap();
        assert_eq!(json, "\"blocked\"");
    }
}
