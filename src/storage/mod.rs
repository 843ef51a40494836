//! File-per-entry persistent key/value store.
//!
//! Each namespace is a directory; each entry is `<hex key>.bin`. Writes go to a
//! uniquely named temp file that is renamed over the final path, so readers see
//! either the old or the new content and concurrent writers resolve to the last
//! rename.

pub mod error;


pub use error::{StorageError, StorageResult};

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::hashing::key_to_hex;

const ENTRY_EXTENSION: &str = "bin";
const TEMP_EXTENSION: &str = "tmp";

fn replace_file(temp_path: &Path, final_path: &Path, value: &[u8]) -> io::Result<()> {
    {
        let mut file = File::create(temp_path)?;
        file.write_all(value)?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(temp_path, final_path) {
        let _ = fs::remove_file(temp_path);
        return Err(e);
    }
    Ok(())
}

/// Writes `value` to `path` through a sibling temp file and a rename,
/// creating the parent directory if needed.
pub fn write_atomic(path: &Path, value: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(format!(".{}.{}", uuid::Uuid::new_v4().simple(), TEMP_EXTENSION));
    replace_file(&path.with_file_name(temp_name), path, value)
}

/// Stores opaque byte values under 32-byte keys in one directory.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Creates a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensures the namespace directory exists.
    pub fn ensure_dir(&self) -> StorageResult<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|_| StorageError::StorageUnavailable {
                path: self.root.clone(),
            })?;
        }
        Ok(())
    }

    fn entry_path(&self, key: &[u8; 32]) -> PathBuf {
        self.root.join(format!("{}.{}", key_to_hex(key), ENTRY_EXTENSION))
    }

    fn temp_path(&self, key: &[u8; 32]) -> PathBuf {
        self.root.join(format!(
            "{}.{}.{}",
            key_to_hex(key),
            uuid::Uuid::new_v4().simple(),
            TEMP_EXTENSION
        ))
    }

    /// Reads the value for `key`, or `None` if absent.
    pub fn get(&self, key: &[u8; 32]) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(self.entry_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes `value` under `key`, replacing any previous value.
    pub fn put(&self, key: &[u8; 32], value: &[u8]) -> StorageResult<()> {
        self.ensure_dir()?;

        replace_file(&self.temp_path(key), &self.entry_path(key), value)?;
        Ok(())
    }

    /// Removes `key`. Returns whether an entry existed.
    pub fn remove(&self, key: &[u8; 32]) -> StorageResult<bool> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn contains(&self, key: &[u8; 32]) -> bool {
        self.entry_path(key).exists()
    }

    /// Number of stored entries (temp files excluded).
    pub fn len(&self) -> StorageResult<usize> {
        if !self.root.exists() {
            return Ok(0);
        }
        let mut count = 0;
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION) {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Deletes the namespace directory and everything in it. Returns the number
    /// of entries removed.
    pub fn clear(&self) -> StorageResult<usize> {
        let removed = self.len()?;
        match fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(removed),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

/// Native-endian byte view of an f32 vector.
pub fn encode_f32(values: &[f32]) -> Vec<u8> {
    bytemuck::cast_slice::<f32, u8>(values).to_vec()
}

/// Inverse of [`encode_f32`]. The byte length must be a multiple of 4.
pub fn decode_f32(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % size_of::<f32>() != 0 {
        return None;
    }
    let mut out = vec![0.0f32; bytes.len() / size_of::<f32>()];
    bytemuck::cast_slice_mut::<f32, u8>(&mut out).copy_from_slice(bytes);
    Some(out)
}
