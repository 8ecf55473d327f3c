//! Layer 1 — model-driven anonymization with per-entity tokens.
//!
//! Detected PII values are replaced with lettered/numbered tokens
//! (`[PERSON_A]`, `[EMAIL_1]`) and recorded in an ephemeral token↔value map.
//! If the detection call fails a local heuristic extractor takes over with
//! the same token-assignment logic, trading recall for availability. Direct regex sweeps run after either path to catch values
//! the detector missed.

pub mod anonymizer;
pub mod fallback;
pub mod tokens;

pub use anonymizer::{AnonymizeOutcome, Anonymizer};
pub use tokens::{TokenKind, TokenSequence};
