use std::path::PathBuf;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::{Settings, SettingsUpdate};
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::ingest::{IngestReport, JobSyncReport, JsonFileSource};
use crate::matching::{MatchOverrides, MatchResponse};
use crate::profile::JobRequest;
use crate::search::SearchBackend;

pub const NO_SOURCE_MESSAGE: &str = "no source configured";

/// `{ok, report}` on success, `{ok: false, error}` otherwise.
#[derive(Debug, Serialize)]
pub struct SyncResponse<R> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<R>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<R> SyncResponse<R> {
    fn completed(report: R) -> Self {
        Self {
            ok: true,
            report: Some(report),
            error: None,
        }
    }

    fn failed(error: impl ToString) -> Self {
        Self {
            ok: false,
            report: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub search_backend: &'static str,
    pub indexed_candidates: usize,
    pub stored_jobs: usize,
    pub embedder_mode: &'static str,
}

#[instrument(skip(state, request), fields(title = %request.title))]
pub async fn match_handler<B>(
    State(state): State<HandlerState<B>>,
    Json(request): Json<JobRequest>,
) -> Result<Json<MatchResponse>, GatewayError>
where
    B: SearchBackend + 'static,
{
    if !request.location_lat.is_finite() || !request.location_lon.is_finite() {
        return Err(GatewayError::InvalidRequest(
            "location_lat and location_lon must be finite".to_string(),
        ));
    }

    let response = state
        .matcher
        .run_match(&request, MatchOverrides::default())
        .await;
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn job_matches_handler<B>(
    State(state): State<HandlerState<B>>,
    Path(job_id): Path<u64>,
    Query(overrides): Query<MatchOverrides>,
) -> Result<Json<MatchResponse>, GatewayError>
where
    B: SearchBackend + 'static,
{
    match state.matcher.match_job(job_id, overrides).await? {
        Some(response) => Ok(Json(response)),
        None => Err(GatewayError::NotFound(format!("job {job_id}"))),
    }
}

#[instrument(skip(state))]
pub async fn sync_candidates_handler<B>(
    State(state): State<HandlerState<B>>,
) -> Json<SyncResponse<IngestReport>>
where
    B: SearchBackend + 'static,
{
    let Some(path) = state.candidate_source.clone() else {
        return Json(SyncResponse::failed(NO_SOURCE_MESSAGE));
    };

    let _guard = state.sync_lock.lock().await;
    let source = match open_source(path).await {
        Ok(source) => source,
        Err(e) => return Json(SyncResponse::failed(e)),
    };

    match state
        .pipeline
        .run_incremental(&source, &state.checkpoint)
        .await
    {
        Ok(report) => Json(SyncResponse::completed(report)),
        Err(e) => {
            warn!(error = %e, "Candidate sync failed");
            Json(SyncResponse::failed(e))
        }
    }
}

#[instrument(skip(state))]
pub async fn sync_jobs_handler<B>(
    State(state): State<HandlerState<B>>,
) -> Json<SyncResponse<JobSyncReport>>
where
    B: SearchBackend + 'static,
{
    let Some(path) = state.job_source.clone() else {
        return Json(SyncResponse::failed(NO_SOURCE_MESSAGE));
    };

    let _guard = state.sync_lock.lock().await;
    let source = match open_source(path).await {
        Ok(source) => source,
        Err(e) => return Json(SyncResponse::failed(e)),
    };

    match state.pipeline.sync_jobs(&source, None).await {
        Ok(report) => Json(SyncResponse::completed(report)),
        Err(e) => {
            warn!(error = %e, "Job sync failed");
            Json(SyncResponse::failed(e))
        }
    }
}

#[instrument(skip(state))]
pub async fn health_handler<B>(State(state): State<HandlerState<B>>) -> Response
where
    B: SearchBackend + 'static,
{
    let health = state.matcher.backend().health().await;
    let status_code = if health.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if health.healthy { "ok" } else { "degraded" },
            search_backend: health.backend,
            indexed_candidates: health.candidates,
            stored_jobs: health.jobs,
            embedder_mode: state.embedder_mode(),
        }),
    )
        .into_response()
}

#[instrument(skip(state))]
pub async fn get_config_handler<B>(State(state): State<HandlerState<B>>) -> Json<Settings>
where
    B: SearchBackend + 'static,
{
    Json(state.matcher.settings().load())
}

#[instrument(skip(state, update))]
pub async fn update_config_handler<B>(
    State(state): State<HandlerState<B>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<Settings>, GatewayError>
where
    B: SearchBackend + 'static,
{
    let settings = state.matcher.settings().update(update)?;
    info!(
        min_score_raw = settings.min_score_raw,
        max_results = settings.max_results,
        "Settings updated"
    );
    Ok(Json(settings))
}

async fn open_source(path: PathBuf) -> Result<JsonFileSource, String> {
    tokio::task::spawn_blocking(move || JsonFileSource::open(path))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
}
