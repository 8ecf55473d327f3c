//! Layer 0 — pre-flight regex masking to fixpoint.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::patterns::PatternLibrary;

/// Masking strictness. Strict mode allows a third substitution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    Balanced,
    Strict,
}

impl MaskMode {
    fn max_passes(self) -> usize {
        match self {
            MaskMode::Balanced => 2,
            MaskMode::Strict => 3,
        }
    }
}

/// One masking log entry: rule label and hit count only, never values.
#[derive(Debug, Clone, Serialize)]
pub struct MaskLogEntry {
    pub rule: &'static str,
    pub hits: usize,
    pub pass: usize,
}

/// Result of a masking run.
#[derive(Debug, Clone, Serialize)]
pub struct MaskOutcome {
    pub text: String,
    /// Total hits per category label across all passes.
    pub counts: BTreeMap<&'static str, usize>,
    pub log: Vec<MaskLogEntry>,
    /// Number of passes actually executed.
    pub passes: usize,
}

/// Applies the pattern library with category-level placeholders.
///
/// Pure and deterministic. Runs multiple passes because a substitution can
/// expose a match that an intervening token previously broke up; stops early
/// once a pass changes nothing, so `mask(mask(t)) == mask(t)` at fixpoint.
pub struct RegexMasker {
    library: PatternLibrary,
}

impl RegexMasker {
    pub fn new() -> Self {
        Self {
            library: PatternLibrary::new(),
        }
    }

    pub fn mask(&self, text: &str, mode: MaskMode) -> MaskOutcome {
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut log = Vec::new();

        if text.is_empty() {
            return MaskOutcome {
                text: String::new(),
                counts,
                log,
                passes: 0,
            };
        }

        let mut current = text.to_string();
        let mut passes = 0;

        for pass in 0..mode.max_passes() {
            let mut changed = false;
            for (category, re) in self.library.rules() {
                let hits = re.find_iter(&current).count();
                if hits == 0 {
                    continue;
                }
                current = re.replace_all(&current, category.placeholder()).into_owned();
                *counts.entry(category.label()).or_insert(0) += hits;
                log.push(MaskLogEntry {
                    rule: category.label(),
                    hits,
                    pass,
                });
                changed = true;
            }
            passes = pass + 1;
            if !changed {
                break;
            }
        }

        debug!(passes, rules_hit = log.len(), "mask complete");

        MaskOutcome {
            text: current,
            counts,
            log,
            passes,
        }
    }
}

impl Default for RegexMasker {
    fn default() -> Self {
        Self::new()
    }
}
