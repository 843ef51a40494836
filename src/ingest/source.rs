use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::error::IngestError;
use crate::record::{RawRecord, parse_modified};

/// Upstream supplier of raw records, paged in modification order.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Up to `limit` records modified after `since` (all when `None`),
    /// skipping the first `offset`.
    async fn fetch(
        &self,
        since: Option<DateTime<Utc>>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RawRecord>, IngestError>;
}

/// Records from a JSON array or JSON-lines file, loaded once.
///
/// Records with an unparsable `post_modified` sort first and count as
/// modified for every `since`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    records: Vec<(Option<DateTime<Utc>>, RawRecord)>,
}

impl JsonFileSource {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, IngestError> {
        let path = path.into();
        let text = fs::read_to_string(&path).map_err(|source| IngestError::SourceUnreadable {
            path: path.clone(),
            source,
        })?;
        let records = parse_records(&path, &text)?;
        debug!(path = %path.display(), records = records.len(), "Loaded record source");
        Ok(Self::from_records(path, records))
    }

    /// Builds a source from records already in memory.
    pub fn from_records(path: impl Into<PathBuf>, records: Vec<RawRecord>) -> Self {
        let mut records: Vec<_> = records
            .into_iter()
            .map(|r| (r.post_modified.as_deref().and_then(parse_modified), r))
            .collect();
        records.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.post_id.cmp(&b.1.post_id)));
        Self {
            path: path.into(),
            records,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_records(path: &Path, text: &str) -> Result<Vec<RawRecord>, IngestError> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| IngestError::SourceMalformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        });
    }

    let mut records = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => records.push(record),
            Err(e) => warn!(line = line_no + 1, error = %e, "Skipping malformed record line"),
        }
    }
    Ok(records)
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn fetch(
        &self,
        since: Option<DateTime<Utc>>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RawRecord>, IngestError> {
        Ok(self
            .records
            .iter()
            .filter(|(modified, _)| match (since, modified) {
                (Some(since), Some(modified)) => *modified > since,
                _ => true,
            })
            .skip(offset)
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect())
    }
}
