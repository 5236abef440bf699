use crate::context::Context;
use crate::entrypoint::{Entrypoint, EntrypointResult, ValidateInput};
use crate::error::Result;
use crate::pricing::PriceTier;
use async_trait::async_trait;
use espn_client::UpstreamRequest;
use fetch_orchestrator::FetchPlan;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use stats_core::{normalize_player, PlayerStats};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlayerStatsInput {
    /// ESPN athlete id, e.g. "1966"
    pub player: String,
}

impl ValidateInput for PlayerStatsInput {}

pub struct PlayerStatsEntrypoint;

#[async_trait]
impl Entrypoint for PlayerStatsEntrypoint {
    type Input = PlayerStatsInput;
    type Output = PlayerStats;

    fn name(&self) -> &'static str {
        "player-stats"
    }

    fn description(&self) -> &'static str {
        "Season per-game averages for one player"
    }

    fn tier(&self) -> PriceTier {
        PriceTier::Standard
    }

    async fn run(
        &self,
        ctx: &Context,
        input: PlayerStatsInput,
        cancel: &CancellationToken,
    ) -> Result<EntrypointResult<PlayerStats>> {
        let player = ctx.resolve_player(&input.player)?;

        let plan =
            FetchPlan::new().required("athlete", UpstreamRequest::athlete(&player.canonical_id));
        let aggregate = ctx.fetch(plan, cancel).await?;

        Ok(EntrypointResult::new(
            normalize_player(aggregate.require("athlete")?),
            aggregate.settled_at(),
        ))
    }
}
