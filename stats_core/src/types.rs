use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Every Option below serializes as an explicit `null` when the upstream field
// was missing. Nothing is defaulted to zero or an empty string.

/// Lifecycle state of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final,
    Postponed,
    Unknown,
}

impl GameStatus {
    /// Games that have not tipped off carry no score, period or clock
    pub fn is_pregame(&self) -> bool {
        matches!(self, GameStatus::Scheduled | GameStatus::Postponed)
    }
}

/// A single game, flattened to home/away columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: Option<String>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub status: GameStatus,
    pub status_detail: Option<String>,
    pub period: Option<u32>,
    pub clock: Option<String>,
    pub venue: Option<String>,

    pub home_team_id: Option<String>,
    pub home_team: Option<String>,
    pub home_abbreviation: Option<String>,
    pub home_score: Option<u32>,
    pub home_record: Option<String>,

    pub away_team_id: Option<String>,
    pub away_team: Option<String>,
    pub away_abbreviation: Option<String>,
    pub away_score: Option<u32>,
    pub away_record: Option<String>,

    pub winner_team_id: Option<String>,
}

impl Game {
    /// True when either side is the given team
    pub fn involves(&self, team_id: &str) -> bool {
        self.home_team_id.as_deref() == Some(team_id)
            || self.away_team_id.as_deref() == Some(team_id)
    }
}

/// Games on one scoreboard day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scoreboard {
    pub date: Option<String>,
    pub games: Vec<Game>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Option<String>,
    pub abbreviation: Option<String>,
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub logo: Option<String>,
    /// Overall win-loss record, e.g. "31-12"
    pub record: Option<String>,
    pub standing_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPlayer {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub jersey: Option<String>,
    pub position: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub age: Option<u32>,
    pub experience_years: Option<u32>,
}

/// Season summary for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub jersey: Option<String>,
    pub position: Option<String>,
    pub team_id: Option<String>,
    pub team_name: Option<String>,
    pub season_label: Option<String>,
    pub points_per_game: Option<f64>,
    pub rebounds_per_game: Option<f64>,
    pub assists_per_game: Option<f64>,
    pub field_goal_pct: Option<f64>,
    pub three_point_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based rank
    pub rank: u32,
    pub athlete_id: Option<String>,
    pub name: Option<String>,
    pub team: Option<String>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsEntry {
    pub team_id: Option<String>,
    pub abbreviation: Option<String>,
    pub display_name: Option<String>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub win_percent: Option<f64>,
    pub games_behind: Option<f64>,
    pub streak: Option<String>,
    pub playoff_seed: Option<u32>,
}

/// Standings for one conference (or the whole league when ungrouped)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsGroup {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub entries: Vec<StandingsEntry>,
}
