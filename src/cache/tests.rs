use super::*;
use crate::profile::TitleResolution;
use tempfile::TempDir;

const MODEL: &str = "text-embedding-3-small";

#[test]
fn test_embedding_cache_roundtrip_counts_hits() {
    let cache = EmbeddingCache::in_memory(16);
    assert_eq!(cache.get("IFRS", MODEL), None);

    cache.put("IFRS", MODEL, &[0.1, 0.2]);
    assert_eq!(cache.get(" IFRS ", MODEL), Some(vec![0.1, 0.2]));
    assert_eq!(cache.get("IFRS", "other-model"), None);

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.writes, 1);
}

#[test]
fn test_embedding_cache_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("embeddings");

    EmbeddingCache::persistent(&path, 16).put("Controller", MODEL, &[1.0, 0.0, 0.5]);

    let reopened = EmbeddingCache::persistent(&path, 16);
    assert_eq!(reopened.get("Controller", MODEL), Some(vec![1.0, 0.0, 0.5]));
    assert_eq!(reopened.stats().hits, 1);
    assert_eq!(reopened.memory_len(), 1);
}

#[test]
fn test_corrupt_disk_entry_is_a_miss() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("embeddings");
    let store = crate::storage::DiskStore::new(&path);
    store
        .put(&crate::hashing::embedding_cache_key("x", MODEL), &[1, 2, 3])
        .unwrap();

    let cache = EmbeddingCache::persistent(&path, 16);
    assert_eq!(cache.get("x", MODEL), None);
    assert_eq!(cache.stats().misses, 1);
}

#[test]
fn test_unwritable_disk_still_caches_in_memory() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"not a dir").unwrap();

    let cache = TitleCache::persistent(blocker.join("titles"), 16);
    cache.put("CFO", TitleResolution::Canonical("Chief Financial Officer".into()));
    assert_eq!(
        cache.get("CFO"),
        Some(TitleResolution::Canonical("Chief Financial Officer".into()))
    );
}

#[test]
fn test_title_cache_stores_none_sentinel() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("titles");
    TitleCache::persistent(&path, 16).put("Astronaut", TitleResolution::NoMatch);

    let reopened = TitleCache::persistent(&path, 16);
    assert_eq!(reopened.get("Astronaut "), Some(TitleResolution::NoMatch));
}

#[test]
fn test_reset_clears_memory_and_disk() {
    let dir = TempDir::new().unwrap();
    let caches = Caches::open(dir.path(), 16);
    caches.embeddings.put("a", MODEL, &[1.0]);
    caches.titles.put("b", TitleResolution::NoMatch);

    assert_eq!(caches.reset().unwrap(), 2);
    assert_eq!(caches.embeddings.get("a", MODEL), None);
    assert_eq!(caches.titles.get("b"), None);
    assert!(!cache_root(dir.path()).join(EMBEDDINGS_NAMESPACE).exists());
}
