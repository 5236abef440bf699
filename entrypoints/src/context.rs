use crate::error::Result;
use config_manager::{LeadersConfig, SystemConfig};
use espn_client::UpstreamClient;
use fetch_orchestrator::{Aggregate, FetchOrchestrator, FetchPlan};
use stats_core::{
    nba_alias_table, nba_team_resolver, player_resolver, with_extra_aliases,
    EntityResolver, ExtraAliasError, ResolvedEntity,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared, read-only collaborators of every entrypoint
pub struct Context {
    pub orchestrator: FetchOrchestrator,
    pub teams: EntityResolver,
    pub players: EntityResolver,
    pub leaders: LeadersConfig,
}

impl Context {
    pub fn new(
        config: &SystemConfig,
        upstream: Arc<dyn UpstreamClient>,
    ) -> std::result::Result<Self, ExtraAliasError> {
        let table = with_extra_aliases(nba_alias_table(), &config.resolver.extra_team_aliases)?;

        Ok(Self {
            orchestrator: FetchOrchestrator::new(upstream, config.orchestrator.aggregation_policy),
            teams: nba_team_resolver(table),
            players: player_resolver(),
            leaders: config.leaders.clone(),
        })
    }

    pub fn resolve_team(&self, identifier: &str) -> Result<ResolvedEntity> {
        Ok(self.teams.resolve(identifier)?)
    }

    pub fn resolve_player(&self, identifier: &str) -> Result<ResolvedEntity> {
        Ok(self.players.resolve(identifier)?)
    }

    pub async fn fetch(&self, plan: FetchPlan, cancel: &CancellationToken) -> Result<Aggregate> {
        Ok(self.orchestrator.execute(plan, cancel).await?)
    }
}
