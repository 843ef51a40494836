use std::collections::HashMap;

use async_trait::async_trait;

use super::error::TitleMappingError;
use super::vocabulary::TitleVocabulary;
use crate::profile::TitleResolution;

/// Maps raw job titles onto a canonical vocabulary.
///
/// Implementations may omit titles from the returned map; the standardizer
/// resolves omitted titles to NONE.
#[async_trait]
pub trait TitleMapper: Send + Sync {
    /// Short provider label for health reporting.
    fn mode(&self) -> &'static str;

    async fn map_batch(
        &self,
        raw_titles: &[String],
        vocabulary: &TitleVocabulary,
    ) -> Result<HashMap<String, TitleResolution>, TitleMappingError>;
}

/// Offline mapper: exact match after case and whitespace folding.
#[derive(Debug, Clone, Copy, Default)]
pub struct VocabularyMatcher;

#[async_trait]
impl TitleMapper for VocabularyMatcher {
    fn mode(&self) -> &'static str {
        "vocabulary"
    }

    async fn map_batch(
        &self,
        raw_titles: &[String],
        vocabulary: &TitleVocabulary,
    ) -> Result<HashMap<String, TitleResolution>, TitleMappingError> {
        Ok(raw_titles
            .iter()
            .map(|raw| {
                let resolution = match vocabulary.canonical(raw) {
                    Some(canonical) => TitleResolution::Canonical(canonical.to_string()),
                    None => TitleResolution::NoMatch,
                };
                (raw.clone(), resolution)
            })
            .collect())
    }
}
