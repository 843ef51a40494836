use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::mapper::TitleMapper;
use super::vocabulary::TitleVocabulary;
use crate::cache::TitleCache;
use crate::constants::TITLE_BATCH_SIZE;
use crate::profile::{CandidateProfile, TitleResolution};

/// Cache-first, batched raw-title → canonical-title resolution.
pub struct TitleStandardizer {
    mapper: Arc<dyn TitleMapper>,
    cache: Arc<TitleCache>,
    vocabulary: Arc<TitleVocabulary>,
    batch_size: usize,
}

impl std::fmt::Debug for TitleStandardizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleStandardizer")
            .field("mapper", &self.mapper.mode())
            .field("vocabulary", &self.vocabulary.len())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl TitleStandardizer {
    pub fn new(
        mapper: Arc<dyn TitleMapper>,
        cache: Arc<TitleCache>,
        vocabulary: Arc<TitleVocabulary>,
    ) -> Self {
        Self {
            mapper,
            cache,
            vocabulary,
            batch_size: TITLE_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn mapper_mode(&self) -> &'static str {
        self.mapper.mode()
    }

    pub fn vocabulary(&self) -> &TitleVocabulary {
        &self.vocabulary
    }

    /// Resolves each distinct trimmed raw title. The returned map is keyed by
    /// the trimmed title; blank titles are not included.
    ///
    /// Cached titles are never sent to the mapper. A failed batch resolves all
    /// of its titles to NONE, which is cached like any other answer. With an
    /// empty vocabulary every title is NONE and nothing is cached.
    pub async fn standardize(&self, raw_titles: &[String]) -> HashMap<String, TitleResolution> {
        let mut resolved = HashMap::new();
        let mut misses = Vec::new();
        let mut seen = HashSet::new();

        for raw in raw_titles {
            let title = raw.trim();
            if title.is_empty() || !seen.insert(title) {
                continue;
            }
            match self.cache.get(title) {
                Some(hit) => {
                    resolved.insert(title.to_string(), hit);
                }
                None => misses.push(title.to_string()),
            }
        }

        if misses.is_empty() {
            return resolved;
        }
        if self.vocabulary.is_empty() {
            debug!(count = misses.len(), "empty title vocabulary, resolving to NONE");
            resolved.extend(misses.into_iter().map(|t| (t, TitleResolution::NoMatch)));
            return resolved;
        }

        for batch in misses.chunks(self.batch_size) {
            let mut answers = match self.mapper.map_batch(batch, &self.vocabulary).await {
                Ok(answers) => answers,
                Err(e) => {
                    warn!(batch = batch.len(), error = %e, "title mapping batch failed, using NONE");
                    HashMap::new()
                }
            };
            for title in batch {
                let resolution = answers.remove(title).unwrap_or(TitleResolution::NoMatch);
                self.cache.put(title, resolution.clone());
                resolved.insert(title.clone(), resolution);
            }
        }
        resolved
    }

    /// Sets the canonical title of every work-history entry of every profile,
    /// with one lookup pass across all of them.
    #[instrument(skip(self, profiles), fields(count = profiles.len()))]
    pub async fn apply_to_profiles(&self, profiles: &mut [CandidateProfile]) {
        let raw: Vec<String> = profiles
            .iter()
            .flat_map(|p| &p.work_experiences)
            .map(|e| e.raw_title.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        let mapping = self.standardize(&raw).await;

        for entry in profiles.iter_mut().flat_map(|p| p.work_experiences.iter_mut()) {
            let resolution = mapping
                .get(entry.raw_title.trim())
                .cloned()
                .unwrap_or(TitleResolution::NoMatch);
            entry.canonical_title = Some(resolution);
        }
    }

    pub async fn apply_to_profile(&self, profile: &mut CandidateProfile) {
        self.apply_to_profiles(std::slice::from_mut(profile)).await;
    }
}
