use std::path::PathBuf;

use thiserror::Error;

/// Errors from title-mapping providers and vocabulary loading.
#[derive(Debug, Error)]
pub enum TitleMappingError {
    #[error("title mapping request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("title mapping provider returned {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    #[error("invalid title mapping response: {reason}")]
    InvalidResponse { reason: String },

    #[error("invalid title mapping configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("failed to read title vocabulary {path}: {source}")]
    VocabularyUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for TitleMappingError {
    fn from(err: reqwest::Error) -> Self {
        TitleMappingError::RequestFailed {
            reason: err.to_string(),
        }
    }
}
