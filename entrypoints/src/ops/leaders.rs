use crate::context::Context;
use crate::entrypoint::{Entrypoint, EntrypointResult, ValidateInput};
use crate::error::{EntrypointError, Result};
use crate::pricing::PriceTier;
use async_trait::async_trait;
use espn_client::UpstreamRequest;
use fetch_orchestrator::FetchPlan;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use stats_core::{apply_ranking_policy, normalize_leaderboard, LeaderboardEntry};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Per-game averages a leaderboard can be ranked by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeaderStat {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
}

impl LeaderStat {
    /// Upstream statistics category and stat name
    pub fn upstream_key(self) -> (&'static str, &'static str) {
        match self {
            LeaderStat::Points => ("offensive", "avgPoints"),
            LeaderStat::Rebounds => ("general", "avgRebounds"),
            LeaderStat::Assists => ("offensive", "avgAssists"),
            LeaderStat::Steals => ("defensive", "avgSteals"),
            LeaderStat::Blocks => ("defensive", "avgBlocks"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LeagueLeadersInput {
    pub stat: LeaderStat,
    /// Number of players to return; the configured default when omitted
    pub limit: Option<u32>,
}

impl ValidateInput for LeagueLeadersInput {
    fn validate(&self) -> Result<()> {
        if self.limit == Some(0) {
            return Err(EntrypointError::invalid_input("limit must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueLeaders {
    pub stat: LeaderStat,
    pub leaders: Vec<LeaderboardEntry>,
}

pub struct LeagueLeadersEntrypoint;

#[async_trait]
impl Entrypoint for LeagueLeadersEntrypoint {
    type Input = LeagueLeadersInput;
    type Output = LeagueLeaders;

    fn name(&self) -> &'static str {
        "league-leaders"
    }

    fn description(&self) -> &'static str {
        "Top players by a per-game average (points, rebounds, assists, steals or blocks)"
    }

    fn tier(&self) -> PriceTier {
        PriceTier::Standard
    }

    async fn run(
        &self,
        ctx: &Context,
        input: LeagueLeadersInput,
        cancel: &CancellationToken,
    ) -> Result<EntrypointResult<LeagueLeaders>> {
        let limit = input.limit.unwrap_or(ctx.leaders.default_limit);
        if limit > ctx.leaders.max_limit {
            return Err(EntrypointError::invalid_input(format!(
                "limit must be at most {}",
                ctx.leaders.max_limit
            )));
        }

        let (category, stat) = input.stat.upstream_key();
        let request = UpstreamRequest::leaders(category, stat, limit);
        let plan = FetchPlan::new().required("leaders", request);
        let aggregate = ctx.fetch(plan, cancel).await?;

        let entries = normalize_leaderboard(aggregate.require("leaders")?, category, stat);
        debug!(
            "🏀 {} leaderboard entries for {}.{} under {:?}",
            entries.len(),
            category,
            stat,
            ctx.leaders.ranking_policy
        );
        let mut leaders = apply_ranking_policy(entries, ctx.leaders.ranking_policy, stat)?;
        leaders.truncate(limit as usize);

        Ok(EntrypointResult::new(
            LeagueLeaders {
                stat: input.stat,
                leaders,
            },
            aggregate.settled_at(),
        ))
    }
}
