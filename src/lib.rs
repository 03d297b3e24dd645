//! Keyword variation benchmarking for HTML page structure.
//!
//! `seo_variations` counts how many distinct variation phrases (a keyword and
//! its synonyms or inflections) appear in a page's H2, H3, H4 and body-text
//! (`<p>` + `<li>`) elements, then compares those counts with a set of
//! competitor pages to recommend a `[min, max]` range per category, scaled
//! to the page's length.
//!
//! # Quick start
//!
//! ```rust
//! use seo_variations::{run, AnalysisRequest, Config, Document};
//!
//! let request = AnalysisRequest::new(Document::new("mine", "<h2>Fleece jacka herr</h2>"))
//!     .with_competitor(Document::new("a", "<h2>Fleece herr</h2><h2>Fleece</h2>"))
//!     .with_variations("fleece jacka herr");
//! let analysis = run(&request, &Config::default()).unwrap();
//! for row in &analysis.results {
//!     println!("{} {} {}-{} {}", row.category, row.current_count,
//!         row.recommended_min, row.recommended_max, row.status);
//! }
//! ```
//!
//! Matching is literal: a variant matches only as a whole word or phrase,
//! longer variants claim their text first, and each variant counts at most
//! once per element.

mod analyze;
mod benchmark;
mod block;
mod error;
mod extract;
mod matcher;
mod pipeline;
mod preprocess;
mod report;
mod variants;

pub use analyze::{analyze, analyze_bytes, count_matches, PageMetrics, Unreadable};
pub use benchmark::{
    bounds, default_weights, recommend, scale_factor, to_range, validate_weights, weighted_mean,
    weighted_percentile, weighted_std, CategoryTuning, RangePolicy, RecommendedRange,
    DEFAULT_TRIM_THRESHOLD,
};
pub use block::{TagCategory, TextBlock};
pub use error::{AnalysisError, InputProblem};
pub use extract::{extract, Extraction};
pub use matcher::VariantMatcher;
pub use pipeline::{
    run, Analysis, AnalysisRequest, AnalysisTrace, CompetitorTrace, Document, DocumentWarning,
};
pub use preprocess::{clean, decode};
pub use report::{report, AnalysisResult, Status};
pub use variants::{expand_variants, normalize_phrase, parse_variations};

/// Configuration for an analysis run.
///
/// Defaults use the weighted mean ± standard deviation policy, a wider spread
/// for body text than for headings, and a cap of 20 on H3 counts.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    pub policy: RangePolicy,
    pub h2: CategoryTuning,
    pub h3: CategoryTuning,
    pub h4: CategoryTuning,
    pub body_text: CategoryTuning,
    /// Also drop `nav`, `header`, `footer` and `aside` subtrees.
    pub exclude_structural: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy: RangePolicy::default(),
            h2: CategoryTuning::default_for(TagCategory::H2),
            h3: CategoryTuning::default_for(TagCategory::H3),
            h4: CategoryTuning::default_for(TagCategory::H4),
            body_text: CategoryTuning::default_for(TagCategory::BodyText),
            exclude_structural: false,
        }
    }
}

impl Config {
    /// Tuning for one category.
    pub fn tuning(&self, category: TagCategory) -> &CategoryTuning {
        match category {
            TagCategory::H2 => &self.h2,
            TagCategory::H3 => &self.h3,
            TagCategory::H4 => &self.h4,
            TagCategory::BodyText => &self.body_text,
        }
    }

    fn tuning_mut(&mut self, category: TagCategory) -> &mut CategoryTuning {
        match category {
            TagCategory::H2 => &mut self.h2,
            TagCategory::H3 => &mut self.h3,
            TagCategory::H4 => &mut self.h4,
            TagCategory::BodyText => &mut self.body_text,
        }
    }

    pub fn with_policy(mut self, policy: RangePolicy) -> Self {
        self.policy = policy;
        self
    }
    pub fn with_tuning(mut self, category: TagCategory, tuning: CategoryTuning) -> Self {
        *self.tuning_mut(category) = tuning;
        self
    }
    pub fn with_spread(mut self, category: TagCategory, spread: f64) -> Self {
        self.tuning_mut(category).spread = spread;
        self
    }
    pub fn with_cap(mut self, category: TagCategory, cap: Option<u32>) -> Self {
        self.tuning_mut(category).cap = cap;
        self
    }
    pub fn with_exclude_structural(mut self, v: bool) -> Self {
        self.exclude_structural = v;
        self
    }
}
