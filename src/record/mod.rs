//! Record normalizer: raw WordPress-style records into typed profiles.
//!
//! Raw records carry their structured fields as PHP-serialized strings inside a
//! flat `meta` map. Decoding goes through [`php::decode`] into a [`PhpValue`] tree
//! first; the candidate and job mappers then pull named fields out of that tree
//! with explicit defaults. A malformed sub-field never fails the record: it
//! degrades to its default and the reason is kept in
//! [`NormalizedRecord::degradations`].

mod candidate;
mod coerce;
mod date;
mod error;
mod html;
mod job;
pub mod php;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use candidate::{keys as candidate_keys, normalize_candidate, parse_languages, parse_work_history};
pub use coerce::{Parsed, float_opt, int_or, nonzero_float, text, truncate_chars};
pub use date::{parse_available_from, parse_modified, parse_unix_date};
pub use error::PhpDecodeError;
pub use html::{strip_html, strip_html_opt};
pub use job::{keys as job_keys, normalize_job};
pub use php::{PhpKey, PhpValue};

/// A record as delivered by the upstream data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub post_id: u64,
    #[serde(default)]
    pub post_title: Option<String>,
    #[serde(default)]
    pub post_content: Option<String>,
    #[serde(default)]
    pub post_excerpt: Option<String>,
    #[serde(default)]
    pub post_date: Option<String>,
    #[serde(default)]
    pub post_modified: Option<String>,
    #[serde(default)]
    pub meta: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(post_id: u64) -> Self {
        Self {
            post_id,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.post_title = Some(title.into());
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Meta value by key.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// First non-blank meta value among `keys`.
    pub fn first_meta(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|k| self.meta(k))
            .find(|v| !v.trim().is_empty())
    }
}

/// A field that fell back to its default during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDegradation {
    pub field: &'static str,
    pub reason: String,
}

/// Normalizer output: the typed record plus every degradation applied.
#[derive(Debug, Clone)]
pub struct NormalizedRecord<T> {
    pub record: T,
    pub degradations: Vec<FieldDegradation>,
}

impl<T> NormalizedRecord<T> {
    pub fn into_record(self) -> T {
        self.record
    }

    pub fn is_clean(&self) -> bool {
        self.degradations.is_empty()
    }
}

/// Collects degradations while unwrapping [`Parsed`] values.
#[derive(Debug, Default)]
pub(crate) struct DegradationLog {
    entries: Vec<FieldDegradation>,
}

impl DegradationLog {
    pub(crate) fn take<T>(&mut self, field: &'static str, parsed: Parsed<T>) -> T {
        if let Parsed::Degraded { reason, .. } = &parsed {
            tracing::debug!(field, reason = %reason, "field degraded to default");
            self.entries.push(FieldDegradation {
                field,
                reason: reason.clone(),
            });
        }
        parsed.into_value()
    }

    pub(crate) fn finish<T>(self, record: T) -> NormalizedRecord<T> {
        NormalizedRecord {
            record,
            degradations: self.entries,
        }
    }
}
