use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`DiskStore`](super::DiskStore).
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage path unavailable: {path}")]
    StorageUnavailable { path: PathBuf },

    #[error("corrupt entry {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Convenience result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
