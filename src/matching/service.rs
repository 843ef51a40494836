use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::response::{CandidateMatch, MatchOverrides, MatchResponse, NO_MATCHES_MESSAGE};
use crate::config::SettingsStore;
use crate::embedding::EmbeddingAggregator;
use crate::profile::JobRequest;
use crate::scoring::{HardFilters, ScoringModel};
use crate::search::{SearchBackend, SearchError, SearchRequest};

/// Query-time orchestration: settings, query vectors, search, projection.
pub struct MatchService<B: SearchBackend> {
    aggregator: Arc<EmbeddingAggregator>,
    backend: Arc<B>,
    settings: SettingsStore,
}

impl<B: SearchBackend> Clone for MatchService<B> {
    fn clone(&self) -> Self {
        Self {
            aggregator: Arc::clone(&self.aggregator),
            backend: Arc::clone(&self.backend),
            settings: self.settings.clone(),
        }
    }
}

impl<B: SearchBackend> MatchService<B> {
    pub fn new(aggregator: Arc<EmbeddingAggregator>, backend: Arc<B>, settings: SettingsStore) -> Self {
        Self {
            aggregator,
            backend,
            settings,
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn aggregator(&self) -> &Arc<EmbeddingAggregator> {
        &self.aggregator
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Ranks the indexed candidates against `request`.
    ///
    /// Never fails: an embedding or search error becomes an empty response whose
    /// message starts with `"Search failed: "`.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn run_match(&self, request: &JobRequest, overrides: MatchOverrides) -> MatchResponse {
        let settings = self.settings.load();
        // A threshold in the request body wins over the query override; the
        // result cap is the other way round.
        let min_score = request
            .min_score
            .or(overrides.min_score)
            .unwrap_or(settings.min_score_raw);
        let max_results = overrides
            .max_results
            .or(request.max_results)
            .unwrap_or(settings.max_results);
        let weights = settings.scoring_weights;

        let vectors = match self.aggregator.job_vectors(request).await {
            Ok(vectors) => vectors,
            Err(e) => {
                warn!(error = %e, "Query embedding failed");
                return MatchResponse::failed(e);
            }
        };

        let dim = self.aggregator.dim().embedding_dim;
        let model = match ScoringModel::new(weights, request.expected_tier(), vectors, dim) {
            Ok(model) => model,
            Err(e) => return MatchResponse::failed(SearchError::from(e)),
        };

        let search = SearchRequest {
            filters: HardFilters::from_request(request),
            model,
            min_score,
            limit: max_results,
            exclude_vectors: true,
        };

        let response = match self.backend.search(search).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Search execution failed");
                return MatchResponse::failed(e);
            }
        };

        debug!(
            hits = response.hits.len(),
            total = response.total,
            min_score,
            max_results,
            "Search complete"
        );

        let matches: Vec<CandidateMatch> = response
            .hits
            .into_iter()
            .enumerate()
            .map(|(i, hit)| CandidateMatch::from_hit(hit, i + 1, request, &weights))
            .collect();

        info!(matches = matches.len(), total = response.total, "Match complete");

        MatchResponse {
            message: matches.is_empty().then(|| NO_MATCHES_MESSAGE.to_string()),
            matches,
            total_above_threshold: response.total,
        }
    }

    /// Matches against a stored job, or `None` when the job is unknown.
    #[instrument(skip(self))]
    pub async fn match_job(
        &self,
        job_id: u64,
        overrides: MatchOverrides,
    ) -> Result<Option<MatchResponse>, SearchError> {
        let Some(job) = self.backend.get_job(job_id).await? else {
            debug!(job_id, "Job not found");
            return Ok(None);
        };
        let request = job.to_request();
        Ok(Some(self.run_match(&request, overrides).await))
    }
}
