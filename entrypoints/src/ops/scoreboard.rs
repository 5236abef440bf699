use crate::context::Context;
use crate::entrypoint::{Entrypoint, EntrypointResult, ValidateInput};
use crate::error::{EntrypointError, Result};
use crate::pricing::PriceTier;
use async_trait::async_trait;
use chrono::NaiveDate;
use espn_client::UpstreamRequest;
use fetch_orchestrator::FetchPlan;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use stats_core::{normalize_scoreboard, Scoreboard};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScoreboardInput {
    /// Game day as YYYYMMDD; today's scoreboard when omitted
    pub date: Option<String>,
}

impl ValidateInput for ScoreboardInput {
    fn validate(&self) -> Result<()> {
        match &self.date {
            Some(date) => validate_date(date),
            None => Ok(()),
        }
    }
}

/// `YYYYMMDD` naming a real calendar day
pub(crate) fn validate_date(date: &str) -> Result<()> {
    let well_formed = date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit());
    if !well_formed || NaiveDate::parse_from_str(date, "%Y%m%d").is_err() {
        return Err(EntrypointError::invalid_input(format!(
            "date must be a calendar day formatted YYYYMMDD, got '{}'",
            date
        )));
    }
    Ok(())
}

pub struct ScoreboardEntrypoint;

#[async_trait]
impl Entrypoint for ScoreboardEntrypoint {
    type Input = ScoreboardInput;
    type Output = Scoreboard;

    fn name(&self) -> &'static str {
        "scoreboard"
    }

    fn description(&self) -> &'static str {
        "Games, scores and status for one NBA game day"
    }

    fn tier(&self) -> PriceTier {
        PriceTier::Basic
    }

    async fn run(
        &self,
        ctx: &Context,
        input: ScoreboardInput,
        cancel: &CancellationToken,
    ) -> Result<EntrypointResult<Scoreboard>> {
        let plan = FetchPlan::new().required(
            "scoreboard",
            UpstreamRequest::scoreboard(input.date.as_deref()),
        );
        let aggregate = ctx.fetch(plan, cancel).await?;

        let mut scoreboard = normalize_scoreboard(aggregate.require("scoreboard")?);
        if scoreboard.date.is_none() {
            scoreboard.date = input.date;
        }

        Ok(EntrypointResult::new(scoreboard, aggregate.settled_at()))
    }
}
