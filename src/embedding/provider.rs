use async_trait::async_trait;

use super::error::EmbeddingError;

/// Maps texts to fixed-dimension dense vectors.
///
/// Implementations must be deterministic for identical input and model, and
/// return exactly one vector per input text, in input order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier of the model; part of every embedding cache key.
    fn model_id(&self) -> &str;

    /// Output dimensionality.
    fn dimension(&self) -> usize;

    /// Short provider label for health reporting.
    fn mode(&self) -> &'static str;

    /// Embeds one batch of non-blank texts.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}
