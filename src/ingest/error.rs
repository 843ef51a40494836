use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an ingestion run. Per-record problems never do.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read record source {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record source {path}: {reason}")]
    SourceMalformed { path: PathBuf, reason: String },

    #[error("failed to write sync checkpoint {path}: {source}")]
    CheckpointWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
