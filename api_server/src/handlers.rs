use crate::types::{HealthResponse, SuccessResponse};
use crate::{ApiError, AppState};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json};
use entrypoints::{DiscoveryDocument, EntrypointError, EntrypointResult};
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Health check
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(SuccessResponse::new(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        entrypoints: state.dispatcher.names(),
    }))
}

/// Discovery document: names, descriptions, prices and input schemas
pub async fn list_entrypoints(State(state): State<AppState>) -> Json<DiscoveryDocument> {
    Json(state.dispatcher.discovery())
}

/// Invoke one entrypoint with a JSON body (an empty body counts as `{}`).
///
/// The invocation is cancelled when the request timeout elapses or when the
/// client goes away and this future is dropped.
pub async fn invoke_entrypoint(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<EntrypointResult<Value>>, ApiError> {
    let input = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            EntrypointError::invalid_input(format!("request body is not valid JSON: {}", e))
        })?
    };

    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();
    let timeout = Duration::from_secs(state.request_timeout_seconds);

    debug!("📥 POST /entrypoints/{}/invoke", name);
    match tokio::time::timeout(timeout, state.dispatcher.dispatch(&name, input, &cancel)).await {
        Ok(result) => Ok(Json(result?)),
        Err(_) => {
            warn!("⏱️ {} exceeded the {}s request timeout", name, timeout.as_secs());
            cancel.cancel();
            Err(EntrypointError::Cancelled.into())
        }
    }
}
