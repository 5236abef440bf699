use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine readable error kind, e.g. `unresolved_entity`
    pub kind: String,
    pub retryable: bool,
    pub timestamp: DateTime<Utc>,
}

/// Standard API success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub entrypoints: Vec<&'static str>,
}
