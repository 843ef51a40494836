//! HTTP gateway (Axum) for matching, sync and settings.
//!
//! Primarily used by the `seniormatch` server binary; tests drive the router
//! in-process.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{HealthResponse, NO_SOURCE_MESSAGE, SyncResponse};
pub use state::HandlerState;

use crate::search::SearchBackend;

pub fn create_router_with_state<B>(state: HandlerState<B>) -> Router
where
    B: SearchBackend + 'static,
{
    Router::new()
        .route("/api/match", post(handler::match_handler::<B>))
        .route("/api/jobs/{id}/matches", get(handler::job_matches_handler::<B>))
        .route(
            "/api/index/candidates/sync",
            post(handler::sync_candidates_handler::<B>),
        )
        .route("/api/index/jobs/sync", post(handler::sync_jobs_handler::<B>))
        .route("/api/health", get(handler::health_handler::<B>))
        .route(
            "/api/config",
            get(handler::get_config_handler::<B>).patch(handler::update_config_handler::<B>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
