//! Local heuristic PII extraction, used when the detection model is down.
//!
//! Recall-heavy and precision-poor by design, especially the name heuristic.
//! Best-effort degraded mode: better to over-tokenize than to leak.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use draftshield_model::DetectedPii;

const MAX_NAMES: usize = 8;
const MAX_ORGS: usize = 5;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \b(?:\+46[\s.-]?\d{1,2}|0\d{1,2})[\s.-]?\d{3}[\s.-]?\d{2,3}[\s.-]?\d{2,3}\b
        |\b\d{3}[.-]\d{3}[.-]\d{4}\b",
    )
    .unwrap()
});
static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b[A-ZÅÄÖ][a-zåäöé]+(?:gatan|gata|vägen|väg|stigen|gränd|torget|torg)\s\d{1,4}[A-Za-z]?\b",
    )
    .unwrap()
});
static ORG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-ZÅÄÖ][A-Za-zåäöé]+(?:\s[A-ZÅÄÖ][A-Za-zåäöé]+)*\s(?:AB|Corp|Inc|Ltd|LLC|GmbH)\b")
        .unwrap()
});

// Sentence-leading words that look like the first half of a name pair.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "Det", "Den", "De", "Dessa", "Detta", "Jag", "Du", "Han", "Hon", "Vi", "Ni", "Men",
        "Och", "Eller", "Efter", "Under", "Enligt", "Idag", "Igår", "Imorgon", "Kontakta",
        "Ring", "Maila", "Fråga", "The", "This", "That", "These", "Those", "When", "Where",
        "What", "Which", "Contact", "Call", "Email",
    ]
    .into_iter()
    .collect()
});

/// Capitalized word followed only by lowercase letters.
fn name_like(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_uppercase() => {}
        _ => return false,
    }
    let mut rest = chars.peekable();
    rest.peek().is_some() && rest.all(|c| c.is_lowercase())
}

/// Extract PII candidates with pure regex heuristics.
pub fn extract_heuristic(text: &str) -> DetectedPii {
    let mut pii = DetectedPii::default();

    for m in EMAIL_RE.find_iter(text) {
        push_unique(&mut pii.emails, m.as_str());
    }
    for m in PHONE_RE.find_iter(text) {
        push_unique(&mut pii.phone_numbers, m.as_str());
    }
    for m in ADDRESS_RE.find_iter(text) {
        push_unique(&mut pii.addresses, m.as_str());
    }
    for m in ORG_RE.find_iter(text) {
        if pii.organizations.len() >= MAX_ORGS {
            break;
        }
        push_unique(&mut pii.organizations, m.as_str());
    }

    // Adjacent capitalized word pairs. A sliding window rather than a regex
    // scan, so "Kontakta John Doe" still yields "John Doe" after the
    // stopword in front is dropped.
    let words: Vec<&str> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .collect();
    for pair in words.windows(2) {
        if pii.persons.len() >= MAX_NAMES {
            break;
        }
        let (first, second) = (pair[0], pair[1]);
        if !name_like(first) || !name_like(second) || STOPWORDS.contains(first) {
            continue;
        }
        let candidate = format!("{first} {second}");
        // Already claimed by the org rule? Leave it there.
        if pii.organizations.iter().any(|org| org.contains(&candidate)) {
            continue;
        }
        push_unique(&mut pii.persons, &candidate);
    }

    pii
}

fn push_unique(values: &mut Vec<String>, candidate: &str) {
    if !values.iter().any(|v| v.eq_ignore_ascii_case(candidate)) {
        values.push(candidate.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_email_and_phone() {
        let pii = extract_heuristic("Kontakta John Doe på john.doe@example.com eller ring 08-123 45 67.");
        assert_eq!(pii.emails, vec!["john.doe@example.com"]);
        assert_eq!(pii.phone_numbers, vec!["08-123 45 67"]);
        assert!(pii.persons.contains(&"John Doe".to_string()));
    }

    #[test]
    fn test_stopword_pairs_skipped() {
        let pii = extract_heuristic("Det Regnade mycket. Men Vädret blev bättre.");
        assert!(pii.persons.is_empty(), "persons: {:?}", pii.persons);
    }

    #[test]
    fn test_swedish_address() {
        let pii = extract_heuristic("Hon bor på Storgatan 12 i centrum.");
        assert_eq!(pii.addresses, vec!["Storgatan 12"]);
    }

    #[test]
    fn test_org_suffix() {
        let pii = extract_heuristic("Han jobbar på Exempelbolaget AB sedan 2019.");
        assert!(pii
            .organizations
            .iter()
            .any(|org| org.contains("Exempelbolaget AB")));
    }

    #[test]
    fn test_name_cap() {
        let text = "Anna Berg Erik Lund Karin Holm Johan Strand Sara Ek Lars Alm \
                    Maria Falk Nils Dahl Eva Lind Olof Hägg";
        let pii = extract_heuristic(text);
        assert!(pii.persons.len() <= MAX_NAMES);
    }
}
