use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("query vector `{field}` has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid scoring parameters: {reason}")]
    InvalidParameters { reason: String },
}
