use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analyze::{analyze_bytes, PageMetrics, Unreadable};
use crate::benchmark::{default_weights, recommend, scale_factor, validate_weights, RangePolicy};
use crate::block::TagCategory;
use crate::error::{AnalysisError, InputProblem};
use crate::matcher::VariantMatcher;
use crate::report::{report, AnalysisResult};
use crate::variants::{normalize_phrase, parse_variations};
use crate::Config;

/// One HTML page. The label (usually its URL) is never dereferenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub label: String,
    pub html: Vec<u8>,
}

impl Document {
    pub fn new(label: impl Into<String>, html: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            html: html.into(),
        }
    }
}

/// Everything one analysis needs.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct AnalysisRequest {
    pub user: Option<Document>,
    /// Competitors in rank order.
    pub competitors: Vec<Document>,
    pub variations: Vec<String>,
    /// Aligned with `competitors`; rank-based defaults when absent.
    pub weights: Option<Vec<f64>>,
}

impl AnalysisRequest {
    pub fn new(user: Document) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    pub fn with_competitor(mut self, doc: Document) -> Self {
        self.competitors.push(doc);
        self
    }

    /// Replace the variation phrases with comma-separated free text.
    pub fn with_variations(mut self, input: &str) -> Self {
        self.variations = parse_variations(input);
        self
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }
}

/// A document that was left out of the statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentWarning {
    /// Position in the competitor list.
    pub index: usize,
    pub label: String,
    pub reason: Unreadable,
}

/// What one competitor contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorTrace {
    pub index: usize,
    pub label: String,
    pub weight: f64,
    pub metrics: PageMetrics,
}

/// Intermediate values of one run, for debugging a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTrace {
    /// Variants in the order they were tried.
    pub variants: Vec<String>,
    pub policy: RangePolicy,
    pub user: PageMetrics,
    /// Readable competitors only.
    pub competitors: Vec<CompetitorTrace>,
    pub scale: f64,
    /// Raw competitor counts per category, in competitor order.
    pub competitor_counts: BTreeMap<TagCategory, Vec<u32>>,
}

/// Result of a full analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// One row per category, in fixed order.
    pub results: Vec<AnalysisResult>,
    /// Competitors that could not be read and were excluded.
    pub warnings: Vec<DocumentWarning>,
    pub trace: AnalysisTrace,
}

fn check_request(request: &AnalysisRequest, phrases: &[String]) -> Vec<InputProblem> {
    let mut problems = Vec::new();
    if request.user.is_none() {
        problems.push(InputProblem::MissingUserPage);
    }
    if request.competitors.is_empty() {
        problems.push(InputProblem::NoCompetitors);
    }
    if phrases.is_empty() {
        problems.push(InputProblem::NoVariations);
    }
    if let Some(weights) = &request.weights {
        problems.extend(validate_weights(weights, request.competitors.len()));
    }
    problems
}

/// Analyze the user page against its competitors.
///
/// Missing or invalid input is reported as [`AnalysisError::InsufficientInput`]
/// listing every problem. Unreadable competitors are dropped from the
/// statistics (with their weights) and reported in [`Analysis::warnings`].
pub fn run(request: &AnalysisRequest, config: &Config) -> Result<Analysis, AnalysisError> {
    let phrases: Vec<String> = request
        .variations
        .iter()
        .map(|p| normalize_phrase(p))
        .filter(|p| !p.is_empty())
        .collect();

    let mut problems = check_request(request, &phrases);
    let user = match &request.user {
        Some(user) if problems.is_empty() => user,
        _ => return Err(AnalysisError::InsufficientInput(problems)),
    };

    let matcher = VariantMatcher::from_phrases(&phrases)?;
    let weights = request
        .weights
        .clone()
        .unwrap_or_else(|| default_weights(request.competitors.len()));

    let user_metrics = match analyze_bytes(&user.html, &matcher, config.exclude_structural) {
        Ok(metrics) => Some(metrics),
        Err(reason) => {
            problems.push(InputProblem::UnreadableUserPage {
                label: user.label.clone(),
                reason: reason.to_string(),
            });
            None
        }
    };

    let mut competitors = Vec::with_capacity(request.competitors.len());
    let mut warnings = Vec::new();
    for (index, (doc, &weight)) in request.competitors.iter().zip(&weights).enumerate() {
        match analyze_bytes(&doc.html, &matcher, config.exclude_structural) {
            Ok(metrics) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    index,
                    label = %doc.label,
                    word_count = metrics.word_count,
                    "competitor analyzed"
                );
                competitors.push(CompetitorTrace {
                    index,
                    label: doc.label.clone(),
                    weight,
                    metrics,
                });
            }
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(index, label = %doc.label, %reason, "competitor excluded");
                warnings.push(DocumentWarning {
                    index,
                    label: doc.label.clone(),
                    reason,
                });
            }
        }
    }
    if competitors.is_empty() {
        problems.push(InputProblem::NoReadableCompetitors);
    }

    let user_metrics = match user_metrics {
        Some(metrics) if problems.is_empty() => metrics,
        _ => return Err(AnalysisError::InsufficientInput(problems)),
    };

    let metrics: Vec<PageMetrics> = competitors.iter().map(|c| c.metrics.clone()).collect();
    let used_weights: Vec<f64> = competitors.iter().map(|c| c.weight).collect();

    let recommend_for =
        |category| recommend(&user_metrics, &metrics, &used_weights, category, config);
    let ranges = [
        recommend_for(TagCategory::H2)?,
        recommend_for(TagCategory::H3)?,
        recommend_for(TagCategory::H4)?,
        recommend_for(TagCategory::BodyText)?,
    ];

    let word_counts: Vec<usize> = metrics.iter().map(|m| m.word_count).collect();
    let results = report(&user_metrics, &ranges);
    let trace = AnalysisTrace {
        variants: matcher.variants().map(str::to_string).collect(),
        policy: config.policy,
        scale: scale_factor(user_metrics.word_count, &word_counts, &used_weights),
        competitor_counts: TagCategory::ALL
            .iter()
            .map(|&category| (category, metrics.iter().map(|m| m.count(category)).collect()))
            .collect(),
        user: user_metrics,
        competitors,
    };

    Ok(Analysis {
        results,
        warnings,
        trace,
    })
}
