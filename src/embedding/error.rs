use thiserror::Error;

use crate::constants::DimValidationError;

/// Errors from embedding providers.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("embedding provider returned {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    #[error("invalid embedding response: {reason}")]
    InvalidResponse { reason: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding count mismatch: sent {expected} texts, got {actual} vectors")]
    CountMismatch { expected: usize, actual: usize },

    #[error("invalid embedding configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        EmbeddingError::RequestFailed {
            reason: err.to_string(),
        }
    }
}

impl From<DimValidationError> for EmbeddingError {
    fn from(err: DimValidationError) -> Self {
        match err {
            DimValidationError::DimensionMismatch { expected, actual } => {
                EmbeddingError::DimensionMismatch { expected, actual }
            }
            DimValidationError::ZeroDimension => EmbeddingError::InvalidConfig {
                reason: err.to_string(),
            },
        }
    }
}
