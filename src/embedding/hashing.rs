use async_trait::async_trait;

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use super::vector::l2_normalize;
use crate::hashing::hash_to_u64;

/// Model id reported by [`HashingEmbedder`]; bump when tokenization changes.
pub const HASHING_MODEL_ID: &str = "feature-hashing-v1";

/// Deterministic offline embedder using signed feature hashing.
///
/// Each lowercase alphanumeric token adds ±1 to one bucket chosen by its BLAKE3
/// hash; the result is L2-normalized. Texts sharing tokens get positive cosine
/// similarity, disjoint texts are near-orthogonal. Used when no API key is
/// configured and in tests.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Embeds one text synchronously.
    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokens(text) {
            let h = hash_to_u64(token.as_bytes());
            let idx = (h % self.dimension as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign;
        }
        l2_normalize(&mut vector);
        vector
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn model_id(&self) -> &str {
        HASHING_MODEL_ID
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn mode(&self) -> &'static str {
        "hashing"
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
