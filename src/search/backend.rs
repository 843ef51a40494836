use std::future::Future;

use futures_util::stream::BoxStream;
use serde::Serialize;

use super::document::CandidateDocument;
use super::error::SearchError;
use crate::profile::{CandidateProfile, JobDocument};
use crate::scoring::{HardFilters, ScoreComponents, ScoringModel};

/// Per-document result of a bulk index.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexOutcome {
    Indexed { post_id: u64 },
    Failed { post_id: u64, reason: String },
}

impl IndexOutcome {
    pub fn post_id(&self) -> u64 {
        match self {
            IndexOutcome::Indexed { post_id } | IndexOutcome::Failed { post_id, .. } => *post_id,
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, IndexOutcome::Indexed { .. })
    }
}

/// Filters, scoring function and result shaping of one query.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub filters: HardFilters,
    pub model: ScoringModel,
    /// Raw-scale threshold; hits below it are dropped.
    pub min_score: f64,
    /// Applied after ranking.
    pub limit: usize,
    /// Strip the four vectors from returned documents.
    pub exclude_vectors: bool,
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub post_id: u64,
    pub raw_score: f64,
    pub components: ScoreComponents,
    pub document: CandidateProfile,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResponse {
    /// Ranked by raw score, descending, at most `limit`.
    pub hits: Vec<SearchHit>,
    /// Candidates passing the filters with a score at or above `min_score`,
    /// counted before truncation.
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackendHealth {
    pub backend: &'static str,
    pub healthy: bool,
    pub candidates: usize,
    pub jobs: usize,
}

/// Executor of the filter and score contract over the candidate population.
pub trait SearchBackend: Send + Sync {
    /// Indexes documents, yielding one outcome per document as it is applied.
    fn index_candidates(&self, documents: Vec<CandidateDocument>) -> BoxStream<'static, IndexOutcome>;

    fn search(
        &self,
        request: SearchRequest,
    ) -> impl Future<Output = Result<SearchResponse, SearchError>> + Send;

    fn put_job(&self, job: JobDocument) -> impl Future<Output = Result<(), SearchError>> + Send;

    fn get_job(
        &self,
        post_id: u64,
    ) -> impl Future<Output = Result<Option<JobDocument>, SearchError>> + Send;

    /// Returns how many candidates were removed.
    fn delete_candidates(
        &self,
        post_ids: &[u64],
    ) -> impl Future<Output = Result<usize, SearchError>> + Send;

    /// Removes every candidate and job.
    fn reset(&self) -> impl Future<Output = Result<(), SearchError>> + Send;

    fn count(&self) -> impl Future<Output = Result<usize, SearchError>> + Send;

    fn health(&self) -> impl Future<Output = BackendHealth> + Send;
}
