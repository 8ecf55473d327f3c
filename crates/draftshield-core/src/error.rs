//! Error types for DraftShield.
//!
//! The variants map onto the failure taxonomy the service exposes: validation
//! errors are rejected before processing, processing errors abort the request
//! with no verdict, and the production hard stop is a distinct, loud variant
//! so callers can always tell "hard refused" from "system error". Policy
//! gates (failed verification, semantic risk outside production mode) are not
//! errors at all — they produce a gated verdict.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any processing.
    #[error("input exceeds maximum length ({len} > {max} chars)")]
    InputTooLarge { len: usize, max: usize },

    /// Anonymization failed on every attempt; no verdict was produced.
    #[error("anonymization failed after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// Production mode is on and the run is gated. No override path exists.
    #[error("production mode is on: verification failed or semantic risk detected; cannot proceed")]
    ProductionBlocked,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("detection error: {0}")]
    Detection(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, Error>;
