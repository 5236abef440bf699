use thiserror::Error;

/// Failure of a single upstream call.
///
/// Cloneable so one in-flight result can be handed to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Upstream returned HTTP {status} for {endpoint}")]
    Unavailable { status: u16, endpoint: String },

    #[error("Upstream transport failure: {message}")]
    Transport { message: String },

    #[error("Upstream call cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Transport {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for UpstreamError {
    fn from(err: url::ParseError) -> Self {
        UpstreamError::Transport {
            message: format!("Invalid upstream URL: {}", err),
        }
    }
}
