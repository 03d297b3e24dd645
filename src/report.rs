use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analyze::PageMetrics;
use crate::benchmark::RecommendedRange;
use crate::block::TagCategory;

/// Where the user's count falls relative to the recommendation.
///
/// Serialized with the same labels as [`Status::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Too few")]
    TooFew,
    #[serde(rename = "Too many")]
    TooMany,
    #[serde(rename = "OK")]
    Ok,
}

impl Status {
    pub fn classify(current: u32, range: &RecommendedRange) -> Self {
        if current < range.min {
            Status::TooFew
        } else if current > range.max {
            Status::TooMany
        } else {
            Status::Ok
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::TooFew => "Too few",
            Status::TooMany => "Too many",
            Status::Ok => "OK",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the final result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct AnalysisResult {
    pub category: TagCategory,
    pub current_count: u32,
    pub recommended_min: u32,
    pub recommended_max: u32,
    pub status: Status,
}

/// Combine the user's counts with the recommended ranges.
///
/// `ranges` holds one range per category in [`TagCategory::ALL`] order, so
/// every category gets exactly one row.
pub fn report(user: &PageMetrics, ranges: &[RecommendedRange; 4]) -> Vec<AnalysisResult> {
    TagCategory::ALL
        .iter()
        .zip(ranges)
        .map(|(&category, range)| {
            let current_count = user.count(category);
            AnalysisResult {
                category,
                current_count,
                recommended_min: range.min,
                recommended_max: range.max,
                status: Status::classify(current_count, range),
            }
        })
        .collect()
}
