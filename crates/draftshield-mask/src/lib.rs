//! Deterministic regex masking and leak verification.
//!
//! Layer 0 of the privacy pipeline (pre-flight masking with category-level
//! placeholders) and layer 2 (detect-only verification of anonymized text).
//! Pure regex, no model calls; rule order is high-precision first so narrow
//! categories are never shadowed by loose heuristics.

pub mod masker;
pub mod patterns;
pub mod verifier;

pub use masker::{MaskLogEntry, MaskMode, MaskOutcome, RegexMasker};
pub use patterns::{PatternLibrary, PiiCategory};
pub use verifier::{LeakReport, LeakVerifier};
