//! Error types for the prediction pipeline

use thiserror::Error;

/// Errors raised by the pipeline itself.
///
/// Missing statistics are never reported here: absent documents and paths
/// are default-filled or omitted. Every variant indicates a model artifact
/// that does not match what the pipeline produces or expects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("class label '{0}' not present in label encoding")]
    MissingClass(String),

    #[error("classifier returned {got} probabilities, label encoding has {expected} classes")]
    ProbabilityShape { expected: usize, got: usize },

    #[error("classifier returned a non-finite probability at index {index}")]
    NonFiniteProbability { index: usize },

    #[error("predicted class '{0}' is not one of H, D, A")]
    UnknownLabel(String),

    #[error("feature schema is empty")]
    EmptySchema,
}

pub type Result<T> = std::result::Result<T, PredictionError>;
