//! Cross-cutting, shared constants.
//!
//! Derive secondary constants from primary ones to avoid drift.
//!
//! # Dimension Invariants
//!
//! All four candidate vectors and all job query vectors share one dimensionality.
//! Pass [`DimConfig`] through initialization and call [`validate_embedding_dim`] at
//! module boundaries (provider output, document indexing, query construction).

use thiserror::Error;

/// Dimensionality of `text-embedding-3-small`.
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;
/// Bytes for one little-endian f32 vector on disk.
pub const EMBEDDING_F32_BYTES: usize = DEFAULT_EMBEDDING_DIM * 4;

/// Default embedding model identifier (part of every embedding cache key).
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// Default chat model used for title standardization.
pub const DEFAULT_TITLE_MODEL: &str = "gpt-4o-mini";

/// Max texts per embedding provider call.
pub const EMBEDDING_BATCH_SIZE: usize = 100;
/// Max raw titles per title-mapping call.
pub const TITLE_BATCH_SIZE: usize = 20;
/// Max vocabulary entries sent to the title mapper.
pub const MAX_VOCABULARY_SIZE: usize = 2000;
/// Candidates enriched and flushed per ingestion window.
pub const DEFAULT_INGEST_WINDOW: usize = 200;

/// Characters of skills text embedded when a candidate has no work history.
pub const SKILLS_FALLBACK_CHARS: usize = 500;
/// Title text embedded when nothing else is available.
pub const TITLE_PLACEHOLDER: &str = "Professional";
/// Cap on job requirement text fields.
pub const MAX_REQUIREMENT_CHARS: usize = 32_000;
/// Cap on stored work-history descriptions.
pub const MAX_DESCRIPTION_CHARS: usize = 10_000;

/// Default work/search radius in kilometres.
pub const DEFAULT_RADIUS_KM: u32 = 50;
/// Default desired workload (percent of full time).
pub const DEFAULT_PENSUM_DESIRED: u32 = 100;
/// Default minimum acceptable workload (percent of full time).
pub const DEFAULT_PENSUM_FROM: u32 = 0;

/// Runtime dimension configuration shared by providers, caches and the search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimConfig {
    /// The embedding vector dimension (number of floats).
    pub embedding_dim: usize,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl DimConfig {
    /// Creates a new dimension configuration.
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    /// Rejects a zero dimension.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        if self.embedding_dim == 0 {
            return Err(DimValidationError::ZeroDimension);
        }
        Ok(())
    }

    /// Returns the number of bytes needed for the on-disk f32 representation.
    pub fn f32_bytes(&self) -> usize {
        self.embedding_dim * 4
    }

    /// Returns a zero vector of this dimension.
    pub fn zero_vector(&self) -> Vec<f32> {
        vec![0.0; self.embedding_dim]
    }
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    #[error("embedding dimension cannot be zero")]
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use seniormatch::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(1536, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(768, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
