use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::IngestError;
use crate::storage::write_atomic;

/// File name of the checkpoint under the storage root.
pub const CHECKPOINT_FILE_NAME: &str = "sync_state.json";
const CHECKPOINT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointDocument {
    last_synced_at: Option<String>,
}

/// `{"last_synced_at": "..."}` document recording the last completed sync.
#[derive(Debug, Clone)]
pub struct SyncCheckpoint {
    path: PathBuf,
}

impl SyncCheckpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last sync time; `None` when missing or unreadable.
    pub fn load(&self) -> Option<DateTime<Utc>> {
        let bytes = fs::read(&self.path).ok()?;
        let doc: CheckpointDocument = match serde_json::from_slice(&bytes) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable sync checkpoint");
                return None;
            }
        };
        let raw = doc.last_synced_at?;
        let parsed = NaiveDateTime::parse_from_str(raw.trim(), CHECKPOINT_FORMAT)
            .map(|naive| naive.and_utc())
            .ok();
        if parsed.is_none() {
            warn!(value = %raw, "Ignoring unparsable sync checkpoint timestamp");
        }
        parsed
    }

    pub fn save(&self, synced_at: DateTime<Utc>) -> Result<(), IngestError> {
        let doc = CheckpointDocument {
            last_synced_at: Some(synced_at.format(CHECKPOINT_FORMAT).to_string()),
        };
        let json = serde_json::to_vec_pretty(&doc).map_err(|e| IngestError::CheckpointWrite {
            path: self.path.clone(),
            source: e.into(),
        })?;
        write_atomic(&self.path, &json).map_err(|source| IngestError::CheckpointWrite {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), at = %synced_at, "Sync checkpoint saved");
        Ok(())
    }
}
