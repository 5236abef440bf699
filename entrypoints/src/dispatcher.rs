use crate::context::Context;
use crate::entrypoint::{EntrypointResult, ErasedEntrypoint};
use crate::error::{EntrypointError, Result, SetupError};
use crate::ops::{
    LeagueLeadersEntrypoint, MatchupEntrypoint, PlayerStatsEntrypoint, ScoreboardEntrypoint,
    StandingsEntrypoint, TeamProfileEntrypoint,
};
use crate::pricing::Price;
use config_manager::{PricingConfig, SystemConfig};
use espn_client::UpstreamClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Discovery entry for one entrypoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrypointDescriptor {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub input_schema: Value,
}

/// Everything a caller needs to find and price the entrypoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryDocument {
    pub entrypoints: Vec<EntrypointDescriptor>,
}

/// Routes invocations by name to the registered entrypoints
pub struct Dispatcher {
    context: Context,
    pricing: PricingConfig,
    entrypoints: BTreeMap<&'static str, Arc<dyn ErasedEntrypoint>>,
}

impl Dispatcher {
    /// Dispatcher with every built-in entrypoint registered
    pub fn new(
        config: &SystemConfig,
        upstream: Arc<dyn UpstreamClient>,
    ) -> std::result::Result<Self, SetupError> {
        let context = Context::new(config, upstream)?;
        let mut dispatcher = Self {
            context,
            pricing: config.pricing.clone(),
            entrypoints: BTreeMap::new(),
        };

        dispatcher.register(Arc::new(ScoreboardEntrypoint));
        dispatcher.register(Arc::new(StandingsEntrypoint));
        dispatcher.register(Arc::new(TeamProfileEntrypoint));
        dispatcher.register(Arc::new(PlayerStatsEntrypoint));
        dispatcher.register(Arc::new(LeagueLeadersEntrypoint));
        dispatcher.register(Arc::new(MatchupEntrypoint));

        info!(
            "📋 Registered {} entrypoints ({:?} aggregation, {:?} ranking)",
            dispatcher.entrypoints.len(),
            config.orchestrator.aggregation_policy,
            config.leaders.ranking_policy
        );
        Ok(dispatcher)
    }

    /// Dispatcher talking to the upstream described by `config`
    pub fn from_config(config: &SystemConfig) -> std::result::Result<Self, SetupError> {
        let upstream = espn_client::build_upstream(config)?;
        Self::new(config, upstream)
    }

    pub fn register(&mut self, entrypoint: Arc<dyn ErasedEntrypoint>) {
        self.entrypoints.insert(entrypoint.name(), entrypoint);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entrypoints.keys().copied().collect()
    }

    /// Invoke `name` with raw JSON input
    pub async fn dispatch(
        &self,
        name: &str,
        input: Value,
        cancel: &CancellationToken,
    ) -> Result<EntrypointResult<Value>> {
        let entrypoint = self
            .entrypoints
            .get(name)
            .ok_or_else(|| EntrypointError::UnknownEntrypoint {
                name: name.to_string(),
            })?;

        let request_id = Uuid::new_v4();
        let span = info_span!("entrypoint", name = %name, request_id = %request_id);

        async move {
            let started = Instant::now();
            info!("▶️ Invoking {}", name);

            let result = entrypoint.invoke(&self.context, input, cancel).await;
            let elapsed_ms = started.elapsed().as_millis();

            match &result {
                Ok(_) => info!("✅ {} completed in {}ms", name, elapsed_ms),
                Err(e) => warn!("❌ {} failed after {}ms ({}): {}", name, elapsed_ms, e.kind(), e),
            }
            result
        }
        .instrument(span)
        .await
    }

    pub fn discovery(&self) -> DiscoveryDocument {
        DiscoveryDocument {
            entrypoints: self
                .entrypoints
                .values()
                .map(|entrypoint| EntrypointDescriptor {
                    name: entrypoint.name().to_string(),
                    description: entrypoint.description().to_string(),
                    price: entrypoint.tier().price(&self.pricing),
                    input_schema: entrypoint.input_schema(),
                })
                .collect(),
        }
    }
}
