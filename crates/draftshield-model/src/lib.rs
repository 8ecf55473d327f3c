//! External model calls — PII detection and semantic audit.
//!
//! Both calls go to a local Ollama-compatible endpoint with a short
//! fail-fast timeout. Responses are decoded through one tolerant-parse
//! adapter per call so the rest of the pipeline only ever sees typed values.
//! Failures are split into `Unreachable` (infra) and `Malformed` (the model
//! ran and produced garbage) because the pipeline treats the two
//! asymmetrically.

pub mod client;
pub mod extract;
pub mod types;

pub use client::ModelClient;
pub use types::{AuditVerdict, DetectedPii, ModelError};

use std::future::Future;

/// Seam for the PII detection call, so the pipeline can be exercised with
/// stub backends in tests.
pub trait DetectBackend: Send + Sync {
    fn detect(&self, text: &str)
        -> impl Future<Output = Result<DetectedPii, ModelError>> + Send;
}

/// Seam for the semantic audit call.
pub trait AuditBackend: Send + Sync {
    fn audit(&self, text: &str)
        -> impl Future<Output = Result<AuditVerdict, ModelError>> + Send;
}
