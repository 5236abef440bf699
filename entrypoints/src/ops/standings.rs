use crate::context::Context;
use crate::entrypoint::{Entrypoint, EntrypointResult, ValidateInput};
use crate::error::Result;
use crate::pricing::PriceTier;
use async_trait::async_trait;
use espn_client::UpstreamRequest;
use fetch_orchestrator::FetchPlan;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use stats_core::{normalize_standings, StandingsGroup};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Conference {
    East,
    West,
}

impl Conference {
    fn matches(self, group: &StandingsGroup) -> bool {
        let needle = match self {
            Conference::East => "east",
            Conference::West => "west",
        };
        [&group.abbreviation, &group.name]
            .into_iter()
            .flatten()
            .any(|label| label.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StandingsInput {
    /// Restrict to one conference; both when omitted
    pub conference: Option<Conference>,
}

impl ValidateInput for StandingsInput {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsOutput {
    pub conferences: Vec<StandingsGroup>,
}

pub struct StandingsEntrypoint;

#[async_trait]
impl Entrypoint for StandingsEntrypoint {
    type Input = StandingsInput;
    type Output = StandingsOutput;

    fn name(&self) -> &'static str {
        "standings"
    }

    fn description(&self) -> &'static str {
        "Current NBA standings by conference"
    }

    fn tier(&self) -> PriceTier {
        PriceTier::Basic
    }

    async fn run(
        &self,
        ctx: &Context,
        input: StandingsInput,
        cancel: &CancellationToken,
    ) -> Result<EntrypointResult<StandingsOutput>> {
        let plan = FetchPlan::new().required("standings", UpstreamRequest::standings());
        let aggregate = ctx.fetch(plan, cancel).await?;

        let mut conferences = normalize_standings(aggregate.require("standings")?);
        if let Some(conference) = input.conference {
            conferences.retain(|group| conference.matches(group));
        }

        Ok(EntrypointResult::new(
            StandingsOutput { conferences },
            aggregate.settled_at(),
        ))
    }
}
