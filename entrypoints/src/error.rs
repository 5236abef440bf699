use espn_client::UpstreamError;
use fetch_orchestrator::OrchestratorError;
use stats_core::{ExtraAliasError, RankingError, ResolveError};
use thiserror::Error;

/// Every way an entrypoint invocation can fail
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntrypointError {
    #[error("Could not resolve '{identifier}': {hint}")]
    UnresolvedEntity { identifier: String, hint: String },

    #[error("Invalid input: {constraint}")]
    InvalidInput { constraint: String },

    #[error("Unknown entrypoint '{name}'")]
    UnknownEntrypoint { name: String },

    #[error("Upstream returned HTTP {status} for {endpoint}")]
    UpstreamUnavailable { status: u16, endpoint: String },

    #[error("Upstream unreachable: {message}")]
    UpstreamTransport { message: String },

    #[error("Upstream broke its contract: {message}")]
    UpstreamContractViolation { message: String },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EntrypointError {
    pub fn invalid_input(constraint: impl Into<String>) -> Self {
        EntrypointError::InvalidInput {
            constraint: constraint.into(),
        }
    }

    /// Stable snake_case name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            EntrypointError::UnresolvedEntity { .. } => "unresolved_entity",
            EntrypointError::InvalidInput { .. } => "invalid_input",
            EntrypointError::UnknownEntrypoint { .. } => "unknown_entrypoint",
            EntrypointError::UpstreamUnavailable { .. } => "upstream_unavailable",
            EntrypointError::UpstreamTransport { .. } => "upstream_transport",
            EntrypointError::UpstreamContractViolation { .. } => "upstream_contract_violation",
            EntrypointError::Cancelled => "cancelled",
            EntrypointError::Internal { .. } => "internal",
        }
    }

    /// Whether the same request may succeed if the caller tries again
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            EntrypointError::UpstreamUnavailable { .. }
                | EntrypointError::UpstreamTransport { .. }
                | EntrypointError::UpstreamContractViolation { .. }
                | EntrypointError::Cancelled
        )
    }
}

impl From<ResolveError> for EntrypointError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::UnresolvedEntity {
                identifier, hint, ..
            } => EntrypointError::UnresolvedEntity { identifier, hint },
        }
    }
}

impl From<UpstreamError> for EntrypointError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Unavailable { status, endpoint } => {
                EntrypointError::UpstreamUnavailable { status, endpoint }
            }
            UpstreamError::Transport { message } => EntrypointError::UpstreamTransport { message },
            UpstreamError::Cancelled => EntrypointError::Cancelled,
        }
    }
}

impl From<OrchestratorError> for EntrypointError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::Upstream { source, .. } => source.into(),
            OrchestratorError::Cancelled => EntrypointError::Cancelled,
            other => EntrypointError::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl From<RankingError> for EntrypointError {
    fn from(err: RankingError) -> Self {
        EntrypointError::UpstreamContractViolation {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for EntrypointError {
    fn from(err: serde_json::Error) -> Self {
        EntrypointError::Internal {
            message: format!("Failed to serialize output: {}", err),
        }
    }
}

/// Failures while assembling a dispatcher from configuration
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Upstream client setup failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Team alias configuration rejected: {0}")]
    Alias(#[from] ExtraAliasError),
}

pub type Result<T> = std::result::Result<T, EntrypointError>;
