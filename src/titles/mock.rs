use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::TitleMappingError;
use super::mapper::TitleMapper;
use super::vocabulary::TitleVocabulary;
use crate::profile::TitleResolution;

/// Test double: fixed answers, optional failure, call accounting.
#[derive(Debug, Default)]
pub struct MockTitleMapper {
    answers: Mutex<HashMap<String, TitleResolution>>,
    fail: AtomicBool,
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<String>>>,
}

impl MockTitleMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(self, raw: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.answers
            .lock()
            .insert(raw.into(), TitleResolution::from(canonical.into()));
        self
    }

    /// Every batch fails while set.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Raw titles of every batch received, in call order.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().clone()
    }
}

#[async_trait]
impl TitleMapper for MockTitleMapper {
    fn mode(&self) -> &'static str {
        "mock"
    }

    async fn map_batch(
        &self,
        raw_titles: &[String],
        _vocabulary: &TitleVocabulary,
    ) -> Result<HashMap<String, TitleResolution>, TitleMappingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().push(raw_titles.to_vec());
        if self.fail.load(Ordering::SeqCst) {
            return Err(TitleMappingError::RequestFailed {
                reason: "mock failure".to_string(),
            });
        }
        let answers = self.answers.lock();
        Ok(raw_titles
            .iter()
            .filter_map(|raw| answers.get(raw).map(|r| (raw.clone(), r.clone())))
            .collect())
    }
}
