//! Typed results for the two external model calls.

use serde::Deserialize;
use thiserror::Error;

/// Categorized PII values from the detection model (or the local fallback).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectedPii {
    #[serde(default)]
    pub persons: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    #[serde(default)]
    pub addresses: Vec<String>,
}

impl DetectedPii {
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
            && self.organizations.is_empty()
            && self.emails.is_empty()
            && self.phone_numbers.is_empty()
            && self.addresses.is_empty()
    }

    pub fn total(&self) -> usize {
        self.persons.len()
            + self.organizations.len()
            + self.emails.len()
            + self.phone_numbers.len()
            + self.addresses.len()
    }
}

/// Structured verdict from the audit model.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditVerdict {
    #[serde(default)]
    pub semantic_risk: bool,
    #[serde(default)]
    pub risk_reason: String,
}

/// Model call failures, split by what the caller should do about them.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// The endpoint or model could not be reached at all.
    #[error("model unreachable: {0}")]
    Unreachable(String),
    /// The model answered but the response could not be decoded.
    #[error("malformed model response: {0}")]
    Malformed(String),
}
