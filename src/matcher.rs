use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::error::AnalysisError;
use crate::variants::{expand_variants, normalize_phrase};

/// One compiled variant.
#[derive(Debug, Clone)]
struct Pattern {
    variant: String,
    regex: Regex,
}

/// Precompiled matcher table for one analysis run.
///
/// Variants are tried longest first; within a text block an accepted match
/// claims its span, and later candidates that overlap a claimed span are
/// skipped. Each variant is counted at most once per block.
#[derive(Debug, Clone)]
pub struct VariantMatcher {
    patterns: Vec<Pattern>,
}

impl VariantMatcher {
    /// Compile a matcher for already expanded variants.
    ///
    /// Variants are normalized like block text (lower-cased, whitespace
    /// collapsed), empties dropped, and the list re-sorted longest first
    /// (stable, so equal lengths keep their given order).
    pub fn new<S: AsRef<str>>(variants: &[S]) -> Result<Self, AnalysisError> {
        let mut variants: Vec<String> = variants
            .iter()
            .map(|v| normalize_phrase(v.as_ref()))
            .filter(|v| !v.is_empty())
            .collect();
        variants.sort_by_key(|v| std::cmp::Reverse(v.chars().count()));

        let mut patterns: Vec<Pattern> = Vec::with_capacity(variants.len());
        for variant in variants {
            if patterns.iter().any(|p| p.variant == variant) {
                continue;
            }
            let regex = RegexBuilder::new(&regex::escape(&variant))
                .case_insensitive(true)
                .build()
                .map_err(|source| AnalysisError::InvalidVariant {
                    variant: variant.clone(),
                    source,
                })?;
            patterns.push(Pattern { variant, regex });
        }
        Ok(Self { patterns })
    }

    /// Expand user phrases (phrase + its tokens) and compile them.
    pub fn from_phrases<S: AsRef<str>>(phrases: &[S]) -> Result<Self, AnalysisError> {
        Self::new(&expand_variants(phrases))
    }

    /// Variants in the order they are tried.
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.variant.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Distinct variants found in `text`, in the order they were tried.
    pub fn find_matches(&self, text: &str) -> Vec<&str> {
        self.find_spans(text)
            .into_iter()
            .map(|(variant, _)| variant)
            .collect()
    }

    /// Number of distinct variants found in `text`.
    pub fn count(&self, text: &str) -> usize {
        self.find_spans(text).len()
    }

    /// Accepted matches with their byte spans in the lower-cased text.
    pub fn find_spans(&self, text: &str) -> Vec<(&str, Range<usize>)> {
        if text.is_empty() || self.patterns.is_empty() {
            return Vec::new();
        }
        let text = text.to_lowercase();
        let mut claimed: Vec<Range<usize>> = Vec::new();
        let mut accepted = Vec::new();

        for pattern in &self.patterns {
            let mut pos = 0;
            while let Some(m) = pattern.regex.find_at(&text, pos) {
                let span = m.range();
                if is_bounded(&text, &span) && !claimed.iter().any(|c| overlaps(c, &span)) {
                    claimed.push(span.clone());
                    accepted.push((pattern.variant.as_str(), span));
                    break;
                }
                // Resume one char later so a rejected candidate can't hide an
                // overlapping one that starts inside it.
                pos = span.start + text[span.start..].chars().next().map_or(1, char::len_utf8);
            }
        }
        accepted
    }
}

/// Matches `\w`: Unicode letters and digits plus underscore.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Neither neighbour of the span is a word character.
fn is_bounded(text: &str, span: &Range<usize>) -> bool {
    let before = text[..span.start].chars().next_back();
    let after = text[span.end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Half-open spans share at least one position.
fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}
