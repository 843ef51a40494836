//! BLAKE3 content hashes used as cache keys and stable identifiers.
//!
//! Text keys are computed over the *trimmed* input so that surrounding whitespace
//! never produces a second cache entry for the same content.

use blake3::Hasher;

const KEY_SEPARATOR: &[u8] = &[0x1f];

/// Hashes trimmed text.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.trim().as_bytes()).as_bytes()
}

/// Cache key for an embedding: trimmed text plus the model identifier.
///
/// Changing the model changes every key, so vectors from different models never mix.
#[inline]
pub fn embedding_cache_key(text: &str, model_id: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(text.trim().as_bytes());
    hasher.update(KEY_SEPARATOR);
    hasher.update(model_id.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Cache key for a raw title lookup.
#[inline]
pub fn title_cache_key(raw_title: &str) -> [u8; 32] {
    hash_text(raw_title)
}

/// First 8 bytes of a BLAKE3 hash as a little-endian `u64`.
///
/// Collisions are tolerable where this is used (feature hashing, log fields).
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Lowercase hex rendering of a 32-byte key (used for on-disk file names).
#[inline]
pub fn key_to_hex(key: &[u8; 32]) -> String {
    blake3::Hash::from_bytes(*key).to_hex().to_string()
}
