//! Error taxonomy for the analysis pipeline.
//!
//! Detectors never return these: they absorb short or degenerate input into
//! neutral results. Only the top-level `evaluate()` surfaces an error, and
//! only when there is nothing meaningful to score.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("insufficient data: {available} bars < required {required}")]
    InsufficientData { required: usize, available: usize },

    #[error("degenerate arithmetic: {context}")]
    DegenerateArithmetic { context: String },
}

impl AnalysisError {
    pub fn degenerate(context: impl Into<String>) -> Self {
        Self::DegenerateArithmetic {
            context: context.into(),
        }
    }
}
