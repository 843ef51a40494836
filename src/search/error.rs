use thiserror::Error;

use crate::scoring::ScoringError;

/// Errors from the search boundary.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// Rejected query (e.g. query vectors of the wrong dimension).
    #[error("invalid scoring parameters: {reason}")]
    InvalidScoringParameters { reason: String },

    #[error("search backend unavailable: {reason}")]
    Unavailable { reason: String },
}

impl From<ScoringError> for SearchError {
    fn from(err: ScoringError) -> Self {
        SearchError::InvalidScoringParameters {
            reason: err.to_string(),
        }
    }
}
