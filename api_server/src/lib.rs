//! Thin HTTP adapter over the entrypoint dispatcher

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use entrypoints::{Dispatcher, EntrypointError};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod types;

use handlers::*;
use types::ErrorResponse;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub request_timeout_seconds: u64,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>, request_timeout_seconds: u64) -> Self {
        Self {
            dispatcher,
            request_timeout_seconds,
            started_at: Instant::now(),
        }
    }
}

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Entrypoint(#[from] EntrypointError),
}

/// HTTP status for each entrypoint error kind
pub fn status_for(err: &EntrypointError) -> StatusCode {
    match err {
        EntrypointError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        EntrypointError::UnresolvedEntity { .. } | EntrypointError::UnknownEntrypoint { .. } => {
            StatusCode::NOT_FOUND
        }
        EntrypointError::UpstreamUnavailable { .. }
        | EntrypointError::UpstreamContractViolation { .. } => StatusCode::BAD_GATEWAY,
        EntrypointError::UpstreamTransport { .. } => StatusCode::GATEWAY_TIMEOUT,
        EntrypointError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        EntrypointError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Entrypoint(err) = self;

        let body = Json(ErrorResponse {
            error: err.to_string(),
            kind: err.kind().to_string(),
            retryable: err.retryable(),
            timestamp: chrono::Utc::now(),
        });

        (status_for(&err), body).into_response()
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/entrypoints", get(list_entrypoints))
        .route("/entrypoints/:name/invoke", post(invoke_entrypoint))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .into_inner(),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (EntrypointError::invalid_input("x"), StatusCode::BAD_REQUEST),
            (
                EntrypointError::UnresolvedEntity {
                    identifier: "XYZ".to_string(),
                    hint: String::new(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                EntrypointError::UpstreamUnavailable {
                    status: 500,
                    endpoint: "team(13)".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                EntrypointError::UpstreamTransport {
                    message: "timeout".to_string(),
                },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (EntrypointError::Cancelled, StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, status) in cases {
            assert_eq!(status_for(&err), status, "{}", err.kind());
        }
    }
}
