use std::collections::HashMap;
use std::sync::Arc;

use futures_util::stream::{self, BoxStream, StreamExt};
use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::{debug, instrument};

use super::backend::{BackendHealth, IndexOutcome, SearchBackend, SearchHit, SearchRequest, SearchResponse};
use super::document::CandidateDocument;
use super::error::SearchError;
use crate::constants::validate_embedding_dim;
use crate::profile::JobDocument;
use crate::scoring::ScoreComponents;

#[derive(Debug, Default)]
struct Store {
    /// Insertion order; re-indexing keeps a document's original slot.
    order: Vec<u64>,
    candidates: HashMap<u64, CandidateDocument>,
    jobs: HashMap<u64, JobDocument>,
}

impl Store {
    fn upsert(&mut self, document: CandidateDocument) {
        let id = document.post_id();
        if self.candidates.insert(id, document).is_none() {
            self.order.push(id);
        }
    }
}

/// In-process search backend: brute-force filtering and scoring with rayon.
#[derive(Debug, Clone)]
pub struct InMemorySearchBackend {
    store: Arc<RwLock<Store>>,
    dim: usize,
}

impl InMemorySearchBackend {
    pub fn new(dim: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
            dim,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    fn index_one(store: &RwLock<Store>, dim: usize, document: CandidateDocument) -> IndexOutcome {
        let post_id = document.post_id();
        if let Some(Err(e)) = document
            .vector_dims()
            .into_iter()
            .map(|actual| validate_embedding_dim(actual, dim))
            .find(Result::is_err)
        {
            return IndexOutcome::Failed {
                post_id,
                reason: e.to_string(),
            };
        }
        store.write().upsert(document);
        IndexOutcome::Indexed { post_id }
    }

    fn search_now(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        if request.model.dimension() != self.dim {
            return Err(SearchError::InvalidScoringParameters {
                reason: format!(
                    "query vectors have dimension {}, index has {}",
                    request.model.dimension(),
                    self.dim
                ),
            });
        }
        if !request.min_score.is_finite() {
            return Err(SearchError::InvalidScoringParameters {
                reason: format!("min_score must be finite, got {}", request.min_score),
            });
        }

        let store = self.store.read();
        let mut scored: Vec<(usize, u64, f64, ScoreComponents)> = store
            .order
            .par_iter()
            .enumerate()
            .filter_map(|(slot, id)| {
                let doc = store.candidates.get(id)?;
                let profile = doc.profile();
                if !request.filters.passes(profile) {
                    return None;
                }
                let components = request.model.components(profile);
                let raw = request.model.raw_score(&components);
                (raw >= request.min_score).then_some((slot, *id, raw, components))
            })
            .collect();

        let total = scored.len();
        scored.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(&b.0)));
        scored.truncate(request.limit);

        let hits = scored
            .into_iter()
            .filter_map(|(_, id, raw_score, components)| {
                let doc = store.candidates.get(&id)?;
                let document = if request.exclude_vectors {
                    doc.without_vectors()
                } else {
                    doc.profile().clone()
                };
                Some(SearchHit {
                    post_id: id,
                    raw_score,
                    components,
                    document,
                })
            })
            .collect::<Vec<_>>();

        debug!(total, returned = hits.len(), "in-memory search complete");
        Ok(SearchResponse { hits, total })
    }
}

impl SearchBackend for InMemorySearchBackend {
    fn index_candidates(&self, documents: Vec<CandidateDocument>) -> BoxStream<'static, IndexOutcome> {
        let store = Arc::clone(&self.store);
        let dim = self.dim;
        stream::iter(documents)
            .map(move |document| Self::index_one(&store, dim, document))
            .boxed()
    }

    #[instrument(skip(self, request), fields(limit = request.limit, min_score = request.min_score))]
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, SearchError> {
        // The rayon scan holds the read lock; keep it off the async workers.
        let backend = self.clone();
        tokio::task::spawn_blocking(move || backend.search_now(&request))
            .await
            .map_err(|e| SearchError::Unavailable {
                reason: format!("search task failed: {e}"),
            })?
    }

    async fn put_job(&self, job: JobDocument) -> Result<(), SearchError> {
        self.store.write().jobs.insert(job.post_id, job);
        Ok(())
    }

    async fn get_job(&self, post_id: u64) -> Result<Option<JobDocument>, SearchError> {
        Ok(self.store.read().jobs.get(&post_id).cloned())
    }

    async fn delete_candidates(&self, post_ids: &[u64]) -> Result<usize, SearchError> {
        let mut store = self.store.write();
        let removed = post_ids
            .iter()
            .filter(|id| store.candidates.remove(*id).is_some())
            .count();
        if removed > 0 {
            let Store {
                order, candidates, ..
            } = &mut *store;
            order.retain(|id| candidates.contains_key(id));
        }
        Ok(removed)
    }

    async fn reset(&self) -> Result<(), SearchError> {
        *self.store.write() = Store::default();
        Ok(())
    }

    async fn count(&self) -> Result<usize, SearchError> {
        Ok(self.store.read().candidates.len())
    }

    async fn health(&self) -> BackendHealth {
        let store = self.store.read();
        BackendHealth {
            backend: "in-memory",
            healthy: true,
            candidates: store.candidates.len(),
            jobs: store.jobs.len(),
        }
    }
}
