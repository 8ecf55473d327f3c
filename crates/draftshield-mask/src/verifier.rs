//! Layer 2 — detect-only verification of anonymized text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::patterns::PatternLibrary;

/// More than this many capitalized word pairs is treated as residual names.
const NAME_PAIR_THRESHOLD: usize = 3;

static NAME_PAIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-ZÅÄÖ][a-zåäöé]+\s[A-ZÅÄÖ][a-zåäöé]+\b").unwrap());

/// Verification result. `residual` holds category labels only, never values.
#[derive(Debug, Clone, Serialize)]
pub struct LeakReport {
    pub passed: bool,
    pub residual: Vec<String>,
}

/// Re-runs the pattern library against already-anonymized text. Any hit fails
/// verification; the orchestrator decides whether to retry layer 1.
pub struct LeakVerifier {
    library: PatternLibrary,
}

impl LeakVerifier {
    pub fn new() -> Self {
        Self {
            library: PatternLibrary::new(),
        }
    }

    pub fn verify(&self, text: &str) -> LeakReport {
        let mut residual = Vec::new();

        for (category, re) in self.library.rules() {
            if re.is_match(text) {
                residual.push(category.label().to_string());
            }
        }

        // Recall-heavy heuristic: a pile of capitalized word pairs in text
        // that should only contain tokens suggests unmapped names.
        if NAME_PAIR_RE.find_iter(text).count() > NAME_PAIR_THRESHOLD {
            residual.push("potential_name_patterns".to_string());
        }

        LeakReport {
            passed: residual.is_empty(),
            residual,
        }
    }
}

impl Default for LeakVerifier {
    fn default() -> Self {
        Self::new()
    }
}
