//! Upstream access to the ESPN public NBA JSON APIs.

pub mod cache;
pub mod client;
pub mod endpoint;
pub mod error;

pub use cache::CachingClient;
pub use client::{EspnClient, UpstreamClient};
pub use endpoint::{ApiBase, Endpoint, UpstreamRequest};
pub use error::UpstreamError;

use config_manager::SystemConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Raw upstream JSON, shared read-only between the cache and its readers
pub type UpstreamPayload = Arc<serde_json::Value>;

pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Build the upstream client described by `config`, wrapped in the response
/// cache when it is enabled.
pub fn build_upstream(config: &SystemConfig) -> Result<Arc<dyn UpstreamClient>> {
    let espn: Arc<dyn UpstreamClient> = Arc::new(EspnClient::new(config.espn.clone())?);

    if config.cache.enabled {
        info!("💾 Upstream response cache enabled (ttl {}s)", config.cache.ttl_seconds);
        Ok(Arc::new(CachingClient::new(
            espn,
            Duration::from_secs(config.cache.ttl_seconds),
        )))
    } else {
        Ok(espn)
    }
}
