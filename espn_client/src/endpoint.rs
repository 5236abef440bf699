use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Which configured base URL an endpoint lives under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiBase {
    /// Site API: scoreboard, teams, rosters, schedules
    Site,
    /// Common v3 web API: athletes, statistics
    Web,
    /// v2 standings API
    Standings,
}

/// ESPN endpoints used by the entrypoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Scoreboard,
    Team,
    TeamRoster,
    TeamSchedule,
    AthleteOverview,
    StatisticsByAthlete,
    Standings,
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Scoreboard => "scoreboard",
            Endpoint::Team => "team",
            Endpoint::TeamRoster => "team_roster",
            Endpoint::TeamSchedule => "team_schedule",
            Endpoint::AthleteOverview => "athlete_overview",
            Endpoint::StatisticsByAthlete => "statistics_by_athlete",
            Endpoint::Standings => "standings",
        }
    }

    pub fn base(&self) -> ApiBase {
        match self {
            Endpoint::Scoreboard
            | Endpoint::Team
            | Endpoint::TeamRoster
            | Endpoint::TeamSchedule => ApiBase::Site,
            Endpoint::AthleteOverview | Endpoint::StatisticsByAthlete => ApiBase::Web,
            Endpoint::Standings => ApiBase::Standings,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One upstream call: an endpoint, its path id and its query parameters.
///
/// Equal requests address the same upstream resource, so this doubles as the
/// response cache key. Parameters live in a `BTreeMap` to keep the key
/// independent of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpstreamRequest {
    endpoint: Endpoint,
    id: Option<String>,
    params: BTreeMap<String, String>,
}

impl UpstreamRequest {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            id: None,
            params: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Scoreboard for `date` (`YYYYMMDD`), or today's when absent
    pub fn scoreboard(date: Option<&str>) -> Self {
        let request = Self::new(Endpoint::Scoreboard);
        match date {
            Some(date) => request.with_param("dates", date),
            None => request,
        }
    }

    pub fn team(team_id: &str) -> Self {
        Self::new(Endpoint::Team).with_id(team_id)
    }

    pub fn team_roster(team_id: &str) -> Self {
        Self::new(Endpoint::TeamRoster).with_id(team_id)
    }

    pub fn team_schedule(team_id: &str) -> Self {
        Self::new(Endpoint::TeamSchedule).with_id(team_id)
    }

    pub fn athlete(athlete_id: &str) -> Self {
        Self::new(Endpoint::AthleteOverview).with_id(athlete_id)
    }

    /// Athletes sorted descending by `category.stat`, at most `limit` of them
    pub fn leaders(category: &str, stat: &str, limit: u32) -> Self {
        Self::new(Endpoint::StatisticsByAthlete)
            .with_param("category", category)
            .with_param("sort", format!("{}.{}:desc", category, stat))
            .with_param("limit", limit.to_string())
    }

    pub fn standings() -> Self {
        Self::new(Endpoint::Standings)
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Path below `{base}/{sport_path}/`
    pub fn path(&self) -> String {
        let id = self.id.as_deref().unwrap_or_default();
        match self.endpoint {
            Endpoint::Scoreboard => "scoreboard".to_string(),
            Endpoint::Team => format!("teams/{}", id),
            Endpoint::TeamRoster => format!("teams/{}/roster", id),
            Endpoint::TeamSchedule => format!("teams/{}/schedule", id),
            Endpoint::AthleteOverview => format!("athletes/{}", id),
            Endpoint::StatisticsByAthlete => "statistics/byathlete".to_string(),
            Endpoint::Standings => "standings".to_string(),
        }
    }
}

impl fmt::Display for UpstreamRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.endpoint)?;
        if let Some(id) = &self.id {
            write!(f, "({})", id)?;
        }
        Ok(())
    }
}
