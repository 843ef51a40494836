use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::ingest::{IngestPipeline, SyncCheckpoint};
use crate::matching::MatchService;
use crate::search::SearchBackend;

/// Shared handler state. Cloned per request; everything heavy sits behind `Arc`.
pub struct HandlerState<B: SearchBackend> {
    pub matcher: MatchService<B>,

    pub pipeline: Arc<IngestPipeline<B>>,

    pub checkpoint: SyncCheckpoint,

    pub candidate_source: Option<PathBuf>,

    pub job_source: Option<PathBuf>,

    /// Held for the duration of a sync; concurrent sync requests queue.
    pub sync_lock: Arc<Mutex<()>>,
}

impl<B: SearchBackend> Clone for HandlerState<B> {
    fn clone(&self) -> Self {
        Self {
            matcher: self.matcher.clone(),
            pipeline: Arc::clone(&self.pipeline),
            checkpoint: self.checkpoint.clone(),
            candidate_source: self.candidate_source.clone(),
            job_source: self.job_source.clone(),
            sync_lock: Arc::clone(&self.sync_lock),
        }
    }
}

impl<B: SearchBackend> HandlerState<B> {
    pub fn new(
        matcher: MatchService<B>,
        pipeline: Arc<IngestPipeline<B>>,
        checkpoint: SyncCheckpoint,
    ) -> Self {
        Self {
            matcher,
            pipeline,
            checkpoint,
            candidate_source: None,
            job_source: None,
            sync_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_sources(mut self, candidates: Option<PathBuf>, jobs: Option<PathBuf>) -> Self {
        self.candidate_source = candidates;
        self.job_source = jobs;
        self
    }

    /// `"openai"`, `"hashing"`, …
    pub fn embedder_mode(&self) -> &'static str {
        self.matcher.aggregator().provider().mode()
    }
}
