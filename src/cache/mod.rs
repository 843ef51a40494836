//! Two-tier memoization caches: bounded moka in front of a [`DiskStore`].
//!
//! Both caches are pure memo tables. Entries are never invalidated
//! automatically; [`Caches::reset`] is the explicit out-of-band reset. Disk
//! read failures count as misses and write failures are logged and dropped,
//! so cache I/O never fails a caller.

mod embedding;
mod title;

#[cfg(test)]
mod tests;

pub use embedding::EmbeddingCache;
pub use title::TitleCache;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::sync::Cache;
use serde::Serialize;
use tracing::{debug, warn};

use crate::storage::{DiskStore, StorageResult};

/// Default in-memory entries per cache.
pub const DEFAULT_MEMORY_CAPACITY: u64 = 100_000;
/// Sub-directory of the storage root holding both caches.
pub const CACHE_DIR: &str = "cache";
pub const EMBEDDINGS_NAMESPACE: &str = "embeddings";
pub const TITLES_NAMESPACE: &str = "titles";

/// Hit/miss counters of one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
    }
}

/// Shared memory + disk lookup logic, parameterized by a byte codec.
struct TwoTier<V: Clone + Send + Sync + 'static> {
    name: &'static str,
    memory: Cache<[u8; 32], V>,
    disk: Option<DiskStore>,
    counters: Counters,
    encode: fn(&V) -> Vec<u8>,
    decode: fn(&[u8]) -> Option<V>,
}

impl<V: Clone + Send + Sync + 'static> TwoTier<V> {
    fn new(
        name: &'static str,
        capacity: u64,
        disk: Option<DiskStore>,
        encode: fn(&V) -> Vec<u8>,
        decode: fn(&[u8]) -> Option<V>,
    ) -> Self {
        Self {
            name,
            memory: Cache::builder().max_capacity(capacity).build(),
            disk,
            counters: Counters::default(),
            encode,
            decode,
        }
    }

    fn get(&self, key: &[u8; 32]) -> Option<V> {
        if let Some(value) = self.memory.get(key) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Some(value);
        }

        let from_disk = self.disk.as_ref().and_then(|disk| match disk.get(key) {
            Ok(Some(bytes)) => {
                let decoded = (self.decode)(&bytes);
                if decoded.is_none() {
                    debug!(cache = self.name, "undecodable disk entry treated as miss");
                }
                decoded
            }
            Ok(None) => None,
            Err(e) => {
                debug!(cache = self.name, error = %e, "disk read failed, treating as miss");
                None
            }
        });

        match from_disk {
            Some(value) => {
                self.memory.insert(*key, value.clone());
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn put(&self, key: [u8; 32], value: V) {
        if let Some(disk) = &self.disk
            && let Err(e) = disk.put(&key, &(self.encode)(&value))
        {
            warn!(cache = self.name, error = %e, "disk write failed, keeping memory entry only");
        }
        self.memory.insert(key, value);
        self.counters.writes.fetch_add(1, Ordering::Relaxed);
    }

    fn reset(&self) -> StorageResult<usize> {
        self.memory.invalidate_all();
        self.memory.run_pending_tasks();
        self.counters.reset();
        match &self.disk {
            Some(disk) => disk.clear(),
            None => Ok(0),
        }
    }

    fn memory_len(&self) -> u64 {
        self.memory.run_pending_tasks();
        self.memory.entry_count()
    }

    fn disk_root(&self) -> Option<&Path> {
        self.disk.as_ref().map(DiskStore::root)
    }
}

/// Both caches opened under one storage root.
#[derive(Debug)]
pub struct Caches {
    pub embeddings: Arc<EmbeddingCache>,
    pub titles: Arc<TitleCache>,
}

impl Caches {
    /// Opens `<storage_root>/cache/{embeddings,titles}`.
    pub fn open(storage_root: &Path, memory_capacity: u64) -> Self {
        let root = cache_root(storage_root);
        Self {
            embeddings: Arc::new(EmbeddingCache::persistent(
                root.join(EMBEDDINGS_NAMESPACE),
                memory_capacity,
            )),
            titles: Arc::new(TitleCache::persistent(
                root.join(TITLES_NAMESPACE),
                memory_capacity,
            )),
        }
    }

    /// Memory-only caches.
    pub fn in_memory(memory_capacity: u64) -> Self {
        Self {
            embeddings: Arc::new(EmbeddingCache::in_memory(memory_capacity)),
            titles: Arc::new(TitleCache::in_memory(memory_capacity)),
        }
    }

    /// Clears both caches in memory and on disk. Returns removed disk entries.
    pub fn reset(&self) -> StorageResult<usize> {
        Ok(self.embeddings.reset()? + self.titles.reset()?)
    }
}

pub fn cache_root(storage_root: &Path) -> PathBuf {
    storage_root.join(CACHE_DIR)
}
