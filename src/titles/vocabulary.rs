use std::collections::HashMap;
use std::path::Path;

use super::error::TitleMappingError;
use crate::constants::MAX_VOCABULARY_SIZE;

/// Ordered canonical job-title vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleVocabulary {
    titles: Vec<String>,
    index: HashMap<String, usize>,
}

/// Lowercases and collapses internal whitespace.
pub(crate) fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl TitleVocabulary {
    /// One title per line; blank and `#` lines skipped, duplicates removed,
    /// capped to the first [`MAX_VOCABULARY_SIZE`] entries.
    pub fn parse(content: &str) -> Self {
        Self::from_titles(content.lines())
    }

    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = Self::default();
        for title in titles {
            if vocabulary.titles.len() >= MAX_VOCABULARY_SIZE {
                break;
            }
            let title = title.as_ref().trim();
            if title.is_empty() || title.starts_with('#') {
                continue;
            }
            let key = normalize_title(title);
            if vocabulary.index.contains_key(&key) {
                continue;
            }
            vocabulary.index.insert(key, vocabulary.titles.len());
            vocabulary.titles.push(title.to_string());
        }
        vocabulary
    }

    pub fn load(path: &Path) -> Result<Self, TitleMappingError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| TitleMappingError::VocabularyUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::parse(&content))
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Vocabulary spelling of `title`, matched case- and whitespace-insensitively.
    pub fn canonical(&self, title: &str) -> Option<&str> {
        self.index
            .get(&normalize_title(title))
            .map(|&i| self.titles[i].as_str())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.canonical(title).is_some()
    }
}
