//! Recommended ranges from competitor statistics.
//!
//! Every competitor contributes its category count with an importance weight.
//! The chosen [`RangePolicy`] turns those weighted values into pre-scale
//! `(low, high)` bounds, which are multiplied by the word-count scale factor
//! and rounded outward (floor for the minimum, ceil for the maximum).

use serde::{Deserialize, Serialize};

use crate::analyze::PageMetrics;
use crate::block::TagCategory;
use crate::error::{AnalysisError, InputProblem};
use crate::Config;

/// Values this close to an integer are treated as that integer before rounding.
const SNAP_EPSILON: f64 = 1e-9;

/// Default for [`RangePolicy::TrimmedPercentile::trim_threshold`].
pub const DEFAULT_TRIM_THRESHOLD: usize = 4;

/// How competitor values become a `(low, high)` pair. One policy per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum RangePolicy {
    /// Weighted mean ± `spread` × weighted (population) standard deviation.
    #[default]
    WeightedMeanStd,
    /// Weighted percentiles of the values left after trimming outliers.
    TrimmedPercentile {
        low: f64,
        high: f64,
        /// Trimming only applies to competitor sets larger than this.
        trim_threshold: usize,
    },
}

impl RangePolicy {
    /// Percentile policy with the default trim threshold.
    pub fn trimmed_percentile(low: f64, high: f64) -> Self {
        RangePolicy::TrimmedPercentile {
            low,
            high,
            trim_threshold: DEFAULT_TRIM_THRESHOLD,
        }
    }
}

/// Per-category tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct CategoryTuning {
    /// Standard deviation multiplier for [`RangePolicy::WeightedMeanStd`].
    pub spread: f64,
    /// Competitor values above this are clamped before any statistics.
    pub cap: Option<u32>,
    /// Drop the lowest value under [`RangePolicy::TrimmedPercentile`].
    pub trim_low: bool,
    /// Drop the highest value under [`RangePolicy::TrimmedPercentile`].
    pub trim_high: bool,
}

impl CategoryTuning {
    pub fn new(spread: f64) -> Self {
        Self {
            spread,
            cap: None,
            trim_low: false,
            trim_high: false,
        }
    }

    pub fn with_cap(mut self, cap: Option<u32>) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_trim(mut self, low: bool, high: bool) -> Self {
        self.trim_low = low;
        self.trim_high = high;
        self
    }

    /// Defaults per category: narrow spreads for the low-count headings, a
    /// wider one for body text, and a cap on H3 outliers.
    pub fn default_for(category: TagCategory) -> Self {
        match category {
            TagCategory::H2 => Self::new(1.0).with_trim(false, true),
            TagCategory::H3 => Self::new(1.0).with_cap(Some(20)).with_trim(false, true),
            TagCategory::H4 => Self::new(1.0),
            TagCategory::BodyText => Self::new(1.5).with_trim(true, true),
        }
    }
}

/// Recommended `[min, max]` count for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedRange {
    pub category: TagCategory,
    pub min: u32,
    pub max: u32,
}

impl RecommendedRange {
    pub fn contains(&self, count: u32) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// Rank-based default weights: `n, n-1, ..., 1` for `n` competitors.
pub fn default_weights(n: usize) -> Vec<f64> {
    (1..=n).rev().map(|w| w as f64).collect()
}

/// Check that `weights` lines up with `n` competitors and is usable.
pub fn validate_weights(weights: &[f64], n: usize) -> Vec<InputProblem> {
    let mut problems = Vec::new();
    if weights.len() != n {
        problems.push(InputProblem::WeightCountMismatch {
            expected: n,
            actual: weights.len(),
        });
    }
    for (index, &value) in weights.iter().enumerate() {
        if !(value.is_finite() && value > 0.0) {
            problems.push(InputProblem::InvalidWeight { index, value });
        }
    }
    problems
}

/// Weighted arithmetic mean. Zero for empty input.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    if values.is_empty() || total <= 0.0 {
        return 0.0;
    }
    values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / total
}

/// Weighted population standard deviation.
pub fn weighted_std(values: &[f64], weights: &[f64]) -> f64 {
    let mean = weighted_mean(values, weights);
    let deviations: Vec<f64> = values.iter().map(|v| (v - mean).powi(2)).collect();
    weighted_mean(&deviations, weights).sqrt()
}

/// Weighted percentile (`q` in 0..=100) with linear interpolation.
///
/// Each value sits at the midpoint of its cumulative weight; the first value
/// maps to 0 and the last to 100. With equal weights this equals numpy's
/// default (`linear`) percentile.
pub fn weighted_percentile(values: &[f64], weights: &[f64], q: f64) -> f64 {
    let mut pairs: Vec<(f64, f64)> = values.iter().copied().zip(weights.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    percentile_sorted(&pairs, q)
}

fn percentile_sorted(pairs: &[(f64, f64)], q: f64) -> f64 {
    match pairs {
        [] => return 0.0,
        [(v, _)] => return *v,
        _ => {}
    }
    let first = pairs[0].1 / 2.0;
    let last = pairs[pairs.len() - 1].1 / 2.0;
    let total: f64 = pairs.iter().map(|(_, w)| w).sum::<f64>() - first - last;
    let target = (q / 100.0).clamp(0.0, 1.0);

    let mut cumulative = 0.0;
    let mut prev: Option<(f64, f64)> = None;
    for &(value, weight) in pairs {
        let position = (cumulative + weight / 2.0 - first) / total;
        cumulative += weight;
        if let Some((prev_pos, prev_value)) = prev {
            if target <= position {
                let span = position - prev_pos;
                if span <= 0.0 {
                    return value;
                }
                return prev_value + (value - prev_value) * (target - prev_pos) / span;
            }
        } else if target <= position {
            return value;
        }
        prev = Some((position, value));
    }
    pairs[pairs.len() - 1].0
}

/// User word count over the weighted average competitor word count.
///
/// Falls back to 1.0 when the competitor average is zero.
pub fn scale_factor(
    user_word_count: usize,
    competitor_word_counts: &[usize],
    weights: &[f64],
) -> f64 {
    let counts: Vec<f64> = competitor_word_counts.iter().map(|&c| c as f64).collect();
    let average = weighted_mean(&counts, weights);
    if average > 0.0 {
        user_word_count as f64 / average
    } else {
        1.0
    }
}

/// Pre-scale `(low, high)` bounds for one category's competitor values.
pub fn bounds(
    values: &[u32],
    weights: &[f64],
    tuning: &CategoryTuning,
    policy: RangePolicy,
) -> (f64, f64) {
    let mut pairs: Vec<(f64, f64)> = values
        .iter()
        .map(|&v| tuning.cap.map_or(v, |cap| v.min(cap)))
        .map(f64::from)
        .zip(weights.iter().copied())
        .collect();

    match policy {
        RangePolicy::WeightedMeanStd => {
            let (values, weights): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let mean = weighted_mean(&values, &weights);
            let std = weighted_std(&values, &weights);
            (mean - tuning.spread * std, mean + tuning.spread * std)
        }
        RangePolicy::TrimmedPercentile {
            low,
            high,
            trim_threshold,
        } => {
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            if pairs.len() > trim_threshold {
                if tuning.trim_high {
                    pairs.pop();
                }
                if tuning.trim_low {
                    pairs.remove(0);
                }
            }
            (percentile_sorted(&pairs, low), percentile_sorted(&pairs, high))
        }
    }
}

fn snap(x: f64) -> f64 {
    let rounded = x.round();
    if (x - rounded).abs() < SNAP_EPSILON {
        rounded
    } else {
        x
    }
}

fn to_count(x: f64) -> u32 {
    if x.is_finite() && x > 0.0 {
        // `as` saturates at u32::MAX
        x as u32
    } else {
        0
    }
}

/// Scale and round pre-scale bounds into a well-formed range.
pub fn to_range(category: TagCategory, low: f64, high: f64, scale: f64) -> RecommendedRange {
    let min = to_count(snap(low * scale).floor());
    let max = to_count(snap(high * scale).ceil());
    let (min, max) = if max < min { (max, min) } else { (min, max) };
    RecommendedRange { category, min, max }
}

/// Recommend a range for one category.
///
/// `weights` must align with `competitors`. Competitor sets where every value
/// is zero collapse to `(0, 0)` without scaling.
pub fn recommend(
    user: &PageMetrics,
    competitors: &[PageMetrics],
    weights: &[f64],
    category: TagCategory,
    config: &Config,
) -> Result<RecommendedRange, AnalysisError> {
    let mut problems = Vec::new();
    if competitors.is_empty() {
        problems.push(InputProblem::NoCompetitors);
    }
    problems.extend(validate_weights(weights, competitors.len()));
    if !problems.is_empty() {
        return Err(AnalysisError::InsufficientInput(problems));
    }

    let values: Vec<u32> = competitors.iter().map(|c| c.count(category)).collect();
    if values.iter().all(|&v| v == 0) {
        return Ok(RecommendedRange {
            category,
            min: 0,
            max: 0,
        });
    }

    let word_counts: Vec<usize> = competitors.iter().map(|c| c.word_count).collect();
    let scale = scale_factor(user.word_count, &word_counts, weights);
    let (low, high) = bounds(&values, weights, config.tuning(category), config.policy);

    #[cfg(feature = "tracing")]
    tracing::debug!(?category, scale, low, high, "category bounds");

    Ok(to_range(category, low, high, scale))
}
