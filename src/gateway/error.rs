use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::config::SettingsError;
use crate::search::SearchError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("search failed: {0}")]
    SearchFailed(#[from] SearchError),

    #[error("settings error: {0}")]
    SettingsFailed(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<SettingsError> for GatewayError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::InvalidWeight { .. } | SettingsError::InvalidValue { .. } => {
                GatewayError::InvalidRequest(err.to_string())
            }
            other => GatewayError::SettingsFailed(other.to_string()),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::SearchFailed(_) => StatusCode::BAD_GATEWAY,
            GatewayError::SettingsFailed(_) | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
