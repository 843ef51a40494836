use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::EmbeddingError;
use super::hashing::HashingEmbedder;
use super::provider::EmbeddingProvider;

/// Test double: scripted vectors, hashing fallback, injectable failures and
/// call accounting.
#[derive(Debug)]
pub struct ScriptedEmbedder {
    fallback: HashingEmbedder,
    scripted: Mutex<HashMap<String, Vec<f32>>>,
    fail_when_contains: Mutex<Vec<String>>,
    calls: AtomicUsize,
    embedded: Mutex<Vec<String>>,
}

impl ScriptedEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            fallback: HashingEmbedder::new(dimension),
            scripted: Mutex::new(HashMap::new()),
            fail_when_contains: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            embedded: Mutex::new(Vec::new()),
        }
    }

    /// Returns `vector` for exactly `text`.
    pub fn with_vector(self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.scripted.lock().insert(text.into(), vector);
        self
    }

    /// Fails any batch containing a text that contains `needle`.
    pub fn failing_on(self, needle: impl Into<String>) -> Self {
        self.fail_when_contains.lock().push(needle.into());
        self
    }

    /// Number of `embed_batch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every text sent to the provider, in call order.
    pub fn embedded_texts(&self) -> Vec<String> {
        self.embedded.lock().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for ScriptedEmbedder {
    fn model_id(&self) -> &str {
        "scripted"
    }

    fn dimension(&self) -> usize {
        self.fallback.dimension()
    }

    fn mode(&self) -> &'static str {
        "scripted"
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.embedded.lock().extend(texts.iter().cloned());

        let failing = self.fail_when_contains.lock();
        if let Some(text) = texts.iter().find(|t| failing.iter().any(|n| t.contains(n.as_str()))) {
            return Err(EmbeddingError::RequestFailed {
                reason: format!("scripted failure for {text:?}"),
            });
        }
        drop(failing);

        let scripted = self.scripted.lock();
        Ok(texts
            .iter()
            .map(|t| {
                scripted
                    .get(t)
                    .cloned()
                    .unwrap_or_else(|| self.fallback.embed_one(t))
            })
            .collect())
    }
}
