//! Persisted scoring settings (weights, threshold, result cap).
//!
//! Read from disk on every [`SettingsStore::load`]; nothing is cached between
//! calls. Updates are load-merge-save without locking, so concurrent updates
//! race and the last writer wins.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::SettingsError;
use crate::scoring::{Dimension, Weights};
use crate::storage::write_atomic;

pub const DEFAULT_MIN_SCORE_RAW: f64 = 1.55;
pub const DEFAULT_MAX_RESULTS: usize = 20;

fn default_min_score_raw() -> f64 {
    DEFAULT_MIN_SCORE_RAW
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// The scoring settings document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub scoring_weights: Weights,
    #[serde(default = "default_min_score_raw")]
    pub min_score_raw: f64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scoring_weights: Weights::default(),
            min_score_raw: DEFAULT_MIN_SCORE_RAW,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Partial update. Only supplied weights replace stored ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub scoring_weights: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub min_score_raw: Option<f64>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl SettingsUpdate {
    fn validate(&self) -> Result<(), SettingsError> {
        if let Some(weights) = &self.scoring_weights {
            for (name, value) in weights {
                if Dimension::parse(name).is_some() && (!value.is_finite() || *value < 0.0) {
                    return Err(SettingsError::InvalidWeight {
                        dimension: name.clone(),
                        value: *value,
                    });
                }
            }
        }
        if let Some(min_score) = self.min_score_raw
            && !min_score.is_finite()
        {
            return Err(SettingsError::InvalidValue {
                field: "min_score_raw",
                reason: format!("must be a finite number, got {min_score}"),
            });
        }
        if self.max_results == Some(0) {
            return Err(SettingsError::InvalidValue {
                field: "max_results",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// JSON-file-backed settings document.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current settings. A missing or unreadable document yields the defaults.
    pub fn load(&self) -> Settings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No settings file, using defaults");
                return Settings::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Settings unreadable, using defaults");
                return Settings::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Settings unparsable, using defaults");
                Settings::default()
            }
        }
    }

    /// Writes the whole document.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let json = serde_json::to_vec_pretty(settings)?;
        write_atomic(&self.path, &json).map_err(|source| SettingsError::WriteFailed {
            path: self.path.clone(),
            source,
        })
    }

    /// Load, merge, save. Returns the merged document.
    pub fn update(&self, update: SettingsUpdate) -> Result<Settings, SettingsError> {
        update.validate()?;

        let mut settings = self.load();
        let changed = update
            .scoring_weights
            .as_ref()
            .map(|w| settings.scoring_weights.merge(w))
            .unwrap_or_default();
        if let Some(min_score) = update.min_score_raw {
            settings.min_score_raw = min_score;
        }
        if let Some(max_results) = update.max_results {
            settings.max_results = max_results;
        }

        self.save(&settings)?;
        info!(
            changed_weights = ?changed,
            min_score_raw = settings.min_score_raw,
            max_results = settings.max_results,
            "Scoring settings updated"
        );
        Ok(settings)
    }

    /// Deletes the document so defaults apply again. Returns whether it existed.
    pub fn reset(&self) -> Result<bool, SettingsError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(SettingsError::RemoveFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
