use std::path::PathBuf;

use super::{CacheStats, TwoTier};
use crate::hashing::title_cache_key;
use crate::profile::TitleResolution;
use crate::storage::{DiskStore, StorageResult};

/// Raw title (trimmed) → canonical title or NONE.
pub struct TitleCache {
    inner: TwoTier<TitleResolution>,
}

fn encode(v: &TitleResolution) -> Vec<u8> {
    v.to_string().into_bytes()
}

fn decode(bytes: &[u8]) -> Option<TitleResolution> {
    std::str::from_utf8(bytes)
        .ok()
        .map(|s| TitleResolution::from(s.to_string()))
}

impl TitleCache {
    pub fn persistent(dir: impl Into<PathBuf>, memory_capacity: u64) -> Self {
        Self {
            inner: TwoTier::new(
                "titles",
                memory_capacity,
                Some(DiskStore::new(dir)),
                encode,
                decode,
            ),
        }
    }

    pub fn in_memory(memory_capacity: u64) -> Self {
        Self {
            inner: TwoTier::new("titles", memory_capacity, None, encode, decode),
        }
    }

    pub fn get(&self, raw_title: &str) -> Option<TitleResolution> {
        self.inner.get(&title_cache_key(raw_title))
    }

    pub fn put(&self, raw_title: &str, resolution: TitleResolution) {
        self.inner.put(title_cache_key(raw_title), resolution);
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

impl std::fmt::Debug for TitleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleCache")
            .field("entries", &self.inner.memory.entry_count())
            .field("disk", &self.inner.disk_root())
            .finish()
    }
}
