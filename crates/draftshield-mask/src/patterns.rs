//! The ordered pattern library shared by the masker and the leak verifier.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// PII categories detected by the regex layer.
///
/// Placeholders are category-level (`[EMAIL]`), deliberately coarser than the
/// per-entity lettered tokens layer 1 assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiCategory {
    /// Swedish personnummer (YYMMDD-XXXX, with or without century).
    Pnr,
    Email,
    Phone,
    Postcode,
    Address,
    /// Loose id-like references (booking codes etc). Runs last.
    Id,
}

impl PiiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PiiCategory::Pnr => "PNR",
            PiiCategory::Email => "EMAIL",
            PiiCategory::Phone => "PHONE",
            PiiCategory::Postcode => "POSTCODE",
            PiiCategory::Address => "ADDRESS",
            PiiCategory::Id => "ID",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            PiiCategory::Pnr => "[PNR]",
            PiiCategory::Email => "[EMAIL]",
            PiiCategory::Phone => "[PHONE]",
            PiiCategory::Postcode => "[POSTCODE]",
            PiiCategory::Address => "[ADDRESS]",
            PiiCategory::Id => "[ID]",
        }
    }
}

// Compiled once, reused. Letter classes include Swedish extended Latin
// (å ä ö é) so street names and surnames match case-correctly.
static PNR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:19|20)?\d{2}(?:0[1-9]|1[0-2])(?:0[1-9]|[12]\d|3[01])[-+]?\d{4}\b").unwrap()
});
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \b(?:\+46[\s.-]?\d{1,2}|0\d{1,2})[\s.-]?\d{3}[\s.-]?\d{2,3}[\s.-]?\d{2,3}\b  # Swedish
        |\b\d{3}[.-]\d{3}[.-]\d{4}\b                                                  # US-style
        |\b\(\d{3}\)\s?\d{3}[.-]?\d{4}\b",
    )
    .unwrap()
});
static POSTCODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{3}\s\d{2}\b").unwrap());
static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \b[A-ZÅÄÖ][a-zåäöé]+(?:gatan|gata|vägen|väg|stigen|gränd|torget|torg|plan|platsen|plats|backen)\s\d{1,4}(?:\s?[A-Za-z])?\b
        |\b\d{1,4}\s[A-Z][a-z]+\s(?:Street|St|Avenue|Ave|Road|Rd|Lane|Ln|Drive|Dr)\b
        |\b[A-ZÅÄÖ][a-zåäöé]{2,}\s\d{1,4}[A-Za-z]?\b  # loose word+number heuristic
        ",
    )
    .unwrap()
});
static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{2,3}-?\d{5,8}\b").unwrap());

/// Ordered, deterministic regex rules per PII category.
///
/// Narrow, high-precision categories run before loose heuristics so a
/// personnummer is never half-eaten by the address rule.
pub struct PatternLibrary {
    rules: Vec<(PiiCategory, &'static Regex)>,
}

impl PatternLibrary {
    pub fn new() -> Self {
        Self {
            rules: vec![
                (PiiCategory::Pnr, &PNR_RE),
                (PiiCategory::Email, &EMAIL_RE),
                (PiiCategory::Phone, &PHONE_RE),
                (PiiCategory::Postcode, &POSTCODE_RE),
                (PiiCategory::Address, &ADDRESS_RE),
                (PiiCategory::Id, &ID_RE),
            ],
        }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[(PiiCategory, &'static Regex)] {
        &self.rules
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category_for(text: &str) -> Option<PiiCategory> {
        let lib = PatternLibrary::new();
        for (category, re) in lib.rules() {
            if re.is_match(text) {
                return Some(*category);
            }
        }
        None
    }

    #[test]
    fn test_pnr_variants() {
        for pnr in ["19800101-1234", "800101-1234", "20000229+5678", "8001011234"] {
            assert_eq!(category_for(pnr), Some(PiiCategory::Pnr), "{pnr}");
        }
    }

    #[test]
    fn test_swedish_phone_formats() {
        for phone in ["08-123 45 67", "070-123 45 67", "+46 8 123 45 67", "+46 70 123 45 67"] {
            assert!(PHONE_RE.is_match(phone), "{phone}");
        }
    }

    #[test]
    fn test_email() {
        assert!(EMAIL_RE.is_match("john.doe@example.com"));
        assert!(!EMAIL_RE.is_match("no at sign here"));
    }

    #[test]
    fn test_swedish_address() {
        assert!(ADDRESS_RE.is_match("Storgatan 12"));
        assert!(ADDRESS_RE.is_match("Ringvägen 4B"));
    }

    #[test]
    fn test_rule_order_narrow_first() {
        let lib = PatternLibrary::new();
        assert_eq!(lib.rules()[0].0, PiiCategory::Pnr);
        assert_eq!(lib.rules().last().unwrap().0, PiiCategory::Id);
    }

    #[test]
    fn test_placeholders_do_not_rematch() {
        let lib = PatternLibrary::new();
        for (category, _) in lib.rules() {
            assert_eq!(category_for(category.placeholder()), None);
        }
    }
}
