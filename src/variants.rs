//! Variation phrase parsing and expansion.

use std::collections::BTreeSet;

/// Split comma-separated input into normalized phrases.
///
/// Each phrase is trimmed and lower-cased; empty entries and duplicates are
/// dropped. Input order is preserved otherwise.
pub fn parse_variations(input: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    input
        .split(',')
        .map(normalize_phrase)
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Trim, lower-case, and collapse internal whitespace of one phrase.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Expand phrases into the full variant set used for matching.
///
/// The result holds every phrase plus every whitespace token inside each
/// phrase, deduplicated, longest first. Equal lengths sort alphabetically so
/// the order never depends on input order.
pub fn expand_variants<S: AsRef<str>>(phrases: &[S]) -> Vec<String> {
    let mut set = BTreeSet::new();
    for phrase in phrases {
        let phrase = normalize_phrase(phrase.as_ref());
        if phrase.is_empty() {
            continue;
        }
        for token in phrase.split(' ') {
            set.insert(token.to_string());
        }
        set.insert(phrase);
    }

    let mut variants: Vec<String> = set.into_iter().collect();
    // BTreeSet already yields alphabetical order; a stable sort keeps it for ties.
    variants.sort_by_key(|v| std::cmp::Reverse(v.chars().count()));
    variants
}
