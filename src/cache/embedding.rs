use std::path::PathBuf;
use std::sync::Arc;

use super::{CacheStats, TwoTier};
use crate::hashing::embedding_cache_key;
use crate::storage::{DiskStore, StorageResult, decode_f32, encode_f32};

/// `(trimmed text, model)` → vector memo table.
pub struct EmbeddingCache {
    inner: TwoTier<Arc<[f32]>>,
}

fn encode(v: &Arc<[f32]>) -> Vec<u8> {
    encode_f32(v)
}

fn decode(bytes: &[u8]) -> Option<Arc<[f32]>> {
    decode_f32(bytes).filter(|v| !v.is_empty()).map(Arc::from)
}

impl EmbeddingCache {
    /// Memory cache backed by a disk namespace at `dir`.
    pub fn persistent(dir: impl Into<PathBuf>, memory_capacity: u64) -> Self {
        Self {
            inner: TwoTier::new(
                "embeddings",
                memory_capacity,
                Some(DiskStore::new(dir)),
                encode,
                decode,
            ),
        }
    }

    pub fn in_memory(memory_capacity: u64) -> Self {
        Self {
            inner: TwoTier::new("embeddings", memory_capacity, None, encode, decode),
        }
    }

    pub fn get(&self, text: &str, model_id: &str) -> Option<Vec<f32>> {
        self.inner
            .get(&embedding_cache_key(text, model_id))
            .map(|v| v.to_vec())
    }

    pub fn put(&self, text: &str, model_id: &str, vector: &[f32]) {
        self.inner
            .put(embedding_cache_key(text, model_id), Arc::from(vector));
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.counters.snapshot()
    }

    pub fn memory_len(&self) -> u64 {
        self.inner.memory_len()
    }

    pub fn reset(&self) -> StorageResult<usize> {
        self.inner.reset()
    }
}

impl std::fmt::Debug for EmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCache")
            .field("entries", &self.inner.memory.entry_count())
            .field("disk", &self.inner.disk_root())
            .finish()
    }
}
