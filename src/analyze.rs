use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::TagCategory;
use crate::extract::{extract, Extraction};
use crate::matcher::VariantMatcher;
use crate::preprocess;

/// Word count and per-category variation counts of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct PageMetrics {
    pub word_count: usize,
    /// Always holds every category, zero when nothing matched.
    pub counts: BTreeMap<TagCategory, u32>,
}

impl PageMetrics {
    pub fn new(word_count: usize, counts: [u32; 4]) -> Self {
        Self {
            word_count,
            counts: TagCategory::ALL.into_iter().zip(counts).collect(),
        }
    }

    /// Count for one category.
    pub fn count(&self, category: TagCategory) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }
}

/// Why a document could not be analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Unreadable {
    #[error("document is empty")]
    Empty,
}

/// Sum, per category, the distinct variants matched in each block.
pub fn count_matches(extraction: &Extraction, matcher: &VariantMatcher) -> PageMetrics {
    let mut counts = [0u32; 4];
    for block in &extraction.blocks {
        let matched = matcher.count(&block.match_text());
        let slot = &mut counts[block.category.index()];
        *slot = slot.saturating_add(u32::try_from(matched).unwrap_or(u32::MAX));
    }
    PageMetrics::new(extraction.word_count, counts)
}

/// Analyze one decoded HTML document.
pub fn analyze(html: &str, matcher: &VariantMatcher, exclude_structural: bool) -> PageMetrics {
    let doc = preprocess::clean(html, exclude_structural);
    count_matches(&extract(&doc), matcher)
}

/// Decode and analyze one raw document.
///
/// Malformed markup, stray NUL bytes included, is recovered by the parser;
/// only a document with no content after decoding is unreadable.
pub fn analyze_bytes(
    bytes: &[u8],
    matcher: &VariantMatcher,
    exclude_structural: bool,
) -> Result<PageMetrics, Unreadable> {
    let html = preprocess::decode(bytes);
    if html.trim().is_empty() {
        return Err(Unreadable::Empty);
    }
    Ok(analyze(&html, matcher, exclude_structural))
}
