//! Token replacement driven by a detection backend.

use std::collections::HashMap;

use draftshield_core::{Error, Result};
use draftshield_mask::PatternLibrary;
use draftshield_model::{DetectBackend, DetectedPii};
use regex::Regex;
use tracing::{debug, warn};

use crate::fallback;
use crate::tokens::{TokenKind, TokenSequence};

/// Result of one anonymization pass.
#[derive(Debug)]
pub struct AnonymizeOutcome {
    pub clean_text: String,
    /// token -> original value
    pub mapping: HashMap<String, String>,
    pub fallback_used: bool,
}

/// Layer 1. Asks the detection backend for PII values, replaces each with a
/// per-run token, then sweeps the text with the layer-0 rule set to catch
/// anything the detector missed.
pub struct Anonymizer<D: DetectBackend> {
    backend: D,
    library: PatternLibrary,
}

impl<D: DetectBackend> Anonymizer<D> {
    pub fn new(backend: D) -> Self {
        Self {
            backend,
            library: PatternLibrary::new(),
        }
    }

    pub async fn anonymize(
        &self,
        text: &str,
        seq: &mut TokenSequence,
    ) -> Result<AnonymizeOutcome> {
        let (detected, fallback_used) = match self.backend.detect(text).await {
            Ok(pii) => (pii, false),
            Err(e) => {
                warn!(error = %e, "detection model failed, using local extractor");
                (fallback::extract_heuristic(text), true)
            }
        };

        let mut clean = text.to_string();
        let mut mapping: HashMap<String, String> = HashMap::new();

        self.replace_detected(&mut clean, &mut mapping, seq, &detected)?;
        self.sweep(&mut clean, &mut mapping, seq);

        debug!(
            tokens = seq.issued(),
            fallback = fallback_used,
            "anonymization pass completed"
        );
        Ok(AnonymizeOutcome {
            clean_text: clean,
            mapping,
            fallback_used,
        })
    }

    fn replace_detected(
        &self,
        clean: &mut String,
        mapping: &mut HashMap<String, String>,
        seq: &mut TokenSequence,
        detected: &DetectedPii,
    ) -> Result<()> {
        let groups: [(&[String], TokenKind); 5] = [
            (&detected.persons, TokenKind::Person),
            (&detected.organizations, TokenKind::Org),
            (&detected.emails, TokenKind::Email),
            (&detected.phone_numbers, TokenKind::Phone),
            (&detected.addresses, TokenKind::Address),
        ];
        for (values, kind) in groups {
            for value in values {
                let value = value.trim();
                if value.is_empty() || already_mapped(mapping, value) {
                    continue;
                }
                let pattern = match kind {
                    // phones come back from the model with arbitrary
                    // separators, match them loosely
                    TokenKind::Phone => flexible_phone_pattern(value),
                    _ => format!("(?i){}", regex::escape(value)),
                };
                // compilation fails when a runaway detector value exceeds
                // the regex size limit; the orchestrator treats that as a
                // retryable layer-1 failure
                let re = Regex::new(&pattern).map_err(|e| Error::Detection(e.to_string()))?;
                if !re.is_match(clean) {
                    continue;
                }
                let token = seq.next(kind);
                *clean = re.replace_all(clean, token.as_str()).into_owned();
                mapping.insert(token, value.to_string());
            }
        }
        Ok(())
    }

    /// Direct rule sweep over whatever the detector left behind. Every
    /// category the verifier can flag is sweepable here, so a verify-retry
    /// loop converges instead of failing on the same residue forever.
    fn sweep(
        &self,
        clean: &mut String,
        mapping: &mut HashMap<String, String>,
        seq: &mut TokenSequence,
    ) {
        for (category, re) in self.library.rules() {
            let hits: Vec<String> = re
                .find_iter(clean)
                .map(|m| m.as_str().to_string())
                .collect();
            for hit in hits {
                if already_mapped(mapping, &hit) {
                    continue;
                }
                let token = seq.next(TokenKind::from(*category));
                *clean = clean.replace(&hit, &token);
                mapping.insert(token, hit);
            }
        }
    }
}

fn already_mapped(mapping: &HashMap<String, String>, value: &str) -> bool {
    mapping.values().any(|v| v.eq_ignore_ascii_case(value))
}

/// Match a phone number regardless of separator style: every non-alphanumeric
/// character in the detected value becomes an optional separator class.
fn flexible_phone_pattern(value: &str) -> String {
    let mut pattern = String::new();
    for c in value.chars() {
        if c.is_alphanumeric() {
            pattern.push_str(&regex::escape(&c.to_string()));
        } else {
            pattern.push_str(r"[\s\-.()]?");
        }
    }
    pattern
}
