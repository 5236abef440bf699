use crate::endpoint::{ApiBase, UpstreamRequest};
use crate::error::UpstreamError;
use crate::{Result, UpstreamPayload};
use async_trait::async_trait;
use config_manager::EspnConfig;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

/// Source of upstream payloads.
///
/// One call, no retries. Cancelling `cancel` abandons the call and yields
/// [`UpstreamError::Cancelled`].
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn fetch(
        &self,
        request: &UpstreamRequest,
        cancel: &CancellationToken,
    ) -> Result<UpstreamPayload>;
}

/// ESPN public JSON API client
#[derive(Debug, Clone)]
pub struct EspnClient {
    config: EspnConfig,
    http_client: Client,
}

impl EspnClient {
    pub fn new(config: EspnConfig) -> Result<Self> {
        // Surface malformed base URLs at startup rather than per request
        for base in [
            &config.site_api_base_url,
            &config.web_api_base_url,
            &config.standings_base_url,
        ] {
            Url::parse(base)?;
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Absolute URL for a request, query string included
    pub fn url_for(&self, request: &UpstreamRequest) -> Result<Url> {
        let base = match request.endpoint().base() {
            ApiBase::Site => &self.config.site_api_base_url,
            ApiBase::Web => &self.config.web_api_base_url,
            ApiBase::Standings => &self.config.standings_base_url,
        };

        let mut url = Url::parse(&format!(
            "{}/{}/{}",
            base.trim_end_matches('/'),
            self.config.sport_path.trim_matches('/'),
            request.path()
        ))?;

        if !request.params().is_empty() {
            url.query_pairs_mut().extend_pairs(request.params());
        }

        Ok(url)
    }

    async fn get_json(&self, request: &UpstreamRequest, url: Url) -> Result<UpstreamPayload> {
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("⚠️ {} returned HTTP {}", request, status.as_u16());
            return Err(UpstreamError::Unavailable {
                status: status.as_u16(),
                endpoint: request.to_string(),
            });
        }

        let body = response.bytes().await?;
        let payload = serde_json::from_slice(&body).map_err(|e| {
            warn!("⚠️ {} returned a body that is not JSON: {}", request, e);
            UpstreamError::Transport {
                message: format!("{} returned a body that is not JSON: {}", request, e),
            }
        })?;

        Ok(Arc::new(payload))
    }
}

#[async_trait]
impl UpstreamClient for EspnClient {
    async fn fetch(
        &self,
        request: &UpstreamRequest,
        cancel: &CancellationToken,
    ) -> Result<UpstreamPayload> {
        let url = self.url_for(request)?;
        debug!("🌐 GET {}", url);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("🛑 {} cancelled", request);
                Err(UpstreamError::Cancelled)
            }
            result = self.get_json(request, url) => result,
        }
    }
}
