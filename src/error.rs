use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("insufficient input: {}", ProblemList(.0))]
    InsufficientInput(Vec<InputProblem>),

    #[error("variant {variant:?} could not be compiled: {source}")]
    InvalidVariant {
        variant: String,
        #[source]
        source: regex::Error,
    },
}

impl AnalysisError {
    /// Every input problem found during validation; empty for other errors.
    pub fn problems(&self) -> &[InputProblem] {
        match self {
            AnalysisError::InsufficientInput(problems) => problems,
            AnalysisError::InvalidVariant { .. } => &[],
        }
    }
}

/// A missing or invalid input that prevents an analysis from running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputProblem {
    #[error("no user page supplied")]
    MissingUserPage,
    #[error("user page {label:?} is unreadable: {reason}")]
    UnreadableUserPage { label: String, reason: String },
    #[error("no competitor pages supplied")]
    NoCompetitors,
    #[error("none of the competitor pages could be read")]
    NoReadableCompetitors,
    #[error("no variation phrases supplied")]
    NoVariations,
    #[error("expected {expected} competitor weights, got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },
    #[error("competitor weight {index} must be positive and finite, got {value}")]
    InvalidWeight { index: usize, value: f64 },
}

struct ProblemList<'a>(&'a [InputProblem]);

impl fmt::Display for ProblemList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, problem) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{problem}")?;
        }
        Ok(())
    }
}
