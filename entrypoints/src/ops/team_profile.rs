use crate::context::Context;
use crate::entrypoint::{Entrypoint, EntrypointResult, ValidateInput};
use crate::error::{EntrypointError, Result};
use crate::pricing::PriceTier;
use async_trait::async_trait;
use espn_client::UpstreamRequest;
use fetch_orchestrator::FetchPlan;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use stats_core::{normalize_roster, normalize_schedule, normalize_team, Game, RosterPlayer, Team};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TeamProfileInput {
    /// Team name, city, abbreviation or ESPN team id
    pub team: String,
}

impl ValidateInput for TeamProfileInput {
    fn validate(&self) -> Result<()> {
        if self.team.trim().is_empty() {
            return Err(EntrypointError::invalid_input("team cannot be empty"));
        }
        Ok(())
    }
}

/// A team with its roster and season schedule.
///
/// `roster` and `schedule` are null when their upstream call failed under
/// best-effort aggregation; `degraded` then names the missing sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamProfile {
    pub team: Team,
    pub roster: Option<Vec<RosterPlayer>>,
    pub schedule: Option<Vec<Game>>,
    pub degraded: Vec<String>,
}

pub struct TeamProfileEntrypoint;

#[async_trait]
impl Entrypoint for TeamProfileEntrypoint {
    type Input = TeamProfileInput;
    type Output = TeamProfile;

    fn name(&self) -> &'static str {
        "team-profile"
    }

    fn description(&self) -> &'static str {
        "Team details, current roster and season schedule"
    }

    fn tier(&self) -> PriceTier {
        PriceTier::Standard
    }

    async fn run(
        &self,
        ctx: &Context,
        input: TeamProfileInput,
        cancel: &CancellationToken,
    ) -> Result<EntrypointResult<TeamProfile>> {
        let team = ctx.resolve_team(&input.team)?;
        let id = team.canonical_id.as_str();

        let plan = FetchPlan::new()
            .required("team", UpstreamRequest::team(id))
            .optional("roster", UpstreamRequest::team_roster(id))
            .optional("schedule", UpstreamRequest::team_schedule(id));
        let aggregate = ctx.fetch(plan, cancel).await?;

        let profile = TeamProfile {
            team: normalize_team(aggregate.require("team")?),
            roster: aggregate.get("roster").map(|payload| normalize_roster(payload)),
            schedule: aggregate.get("schedule").map(|payload| normalize_schedule(payload)),
            degraded: aggregate.degraded_roles(),
        };

        Ok(EntrypointResult::new(profile, aggregate.settled_at()))
    }
}
