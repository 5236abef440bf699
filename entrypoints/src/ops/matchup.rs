use crate::context::Context;
use crate::entrypoint::{Entrypoint, EntrypointResult, ValidateInput};
use crate::error::{EntrypointError, Result};
use crate::pricing::PriceTier;
use async_trait::async_trait;
use espn_client::UpstreamRequest;
use fetch_orchestrator::FetchPlan;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use stats_core::{normalize_schedule, normalize_team, Game, Team};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MatchupInput {
    /// Home team name, city, abbreviation or id
    pub home: String,
    /// Away team name, city, abbreviation or id
    pub away: String,
}

impl ValidateInput for MatchupInput {}

/// Two teams side by side with this season's games between them.
///
/// `headToHead` is null when the home schedule could not be fetched under
/// best-effort aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub home: Team,
    pub away: Team,
    pub head_to_head: Option<Vec<Game>>,
    pub degraded: Vec<String>,
}

pub struct MatchupEntrypoint;

#[async_trait]
impl Entrypoint for MatchupEntrypoint {
    type Input = MatchupInput;
    type Output = Matchup;

    fn name(&self) -> &'static str {
        "matchup"
    }

    fn description(&self) -> &'static str {
        "Head-to-head comparison of two teams with their meetings this season"
    }

    fn tier(&self) -> PriceTier {
        PriceTier::Premium
    }

    async fn run(
        &self,
        ctx: &Context,
        input: MatchupInput,
        cancel: &CancellationToken,
    ) -> Result<EntrypointResult<Matchup>> {
        let home = ctx.resolve_team(&input.home)?;
        let away = ctx.resolve_team(&input.away)?;

        // "LAL" and "Lakers" are the same team
        if home.canonical_id == away.canonical_id {
            return Err(EntrypointError::invalid_input(format!(
                "home and away must be different teams, both resolve to {}",
                home.canonical_id
            )));
        }

        let plan = FetchPlan::new()
            .required("home team", UpstreamRequest::team(&home.canonical_id))
            .required("away team", UpstreamRequest::team(&away.canonical_id))
            .optional("home schedule", UpstreamRequest::team_schedule(&home.canonical_id));
        let aggregate = ctx.fetch(plan, cancel).await?;

        let head_to_head = aggregate.get("home schedule").map(|payload| {
            normalize_schedule(payload)
                .into_iter()
                .filter(|game| game.involves(&away.canonical_id))
                .collect()
        });

        let matchup = Matchup {
            home: normalize_team(aggregate.require("home team")?),
            away: normalize_team(aggregate.require("away team")?),
            head_to_head,
            degraded: aggregate.degraded_roles(),
        };

        Ok(EntrypointResult::new(matchup, aggregate.settled_at()))
    }
}
