use super::json::{as_count, at, boolean, count, first, items, text};
use crate::types::{Game, GameStatus, Scoreboard};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Normalize a scoreboard payload (`{ day, events: [...] }`)
pub fn normalize_scoreboard(payload: &Value) -> Scoreboard {
    Scoreboard {
        date: text(payload, &["day", "date"]),
        games: items(payload, "events").iter().map(normalize_event).collect(),
    }
}

/// Normalize a team schedule payload (`{ events: [...] }`)
pub fn normalize_schedule(payload: &Value) -> Vec<Game> {
    items(payload, "events").iter().map(normalize_event).collect()
}

/// Normalize one event as found in either a scoreboard or a schedule
pub fn normalize_event(event: &Value) -> Game {
    let competition = first(event, "competitions");

    // Scoreboard events carry status twice; schedule events only on the competition
    let status_node = competition
        .and_then(|c| c.get("status"))
        .or_else(|| event.get("status"));
    let status = status_node.map(game_status).unwrap_or(GameStatus::Unknown);

    let competitors = competition.map(|c| items(c, "competitors")).unwrap_or(&[]);
    let home = Side::from_competitors(competitors, "home", status);
    let away = Side::from_competitors(competitors, "away", status);

    let winner_team_id = match status {
        GameStatus::Final => competitors
            .iter()
            .find(|c| boolean(c, &["winner"]) == Some(true))
            .and_then(team_id),
        _ => None,
    };

    Game {
        id: text(event, &["id"]),
        name: text(event, &["name"]),
        short_name: text(event, &["shortName"]),
        start_time: text(event, &["date"])
            .or_else(|| competition.and_then(|c| text(c, &["date"])))
            .and_then(|raw| parse_start_time(&raw)),
        status,
        status_detail: status_node.and_then(|s| {
            text(s, &["type", "shortDetail"]).or_else(|| text(s, &["type", "detail"]))
        }),
        period: status_node
            .filter(|_| !status.is_pregame())
            .and_then(|s| count(s, &["period"]))
            .filter(|p| *p > 0),
        clock: status_node
            .filter(|_| status == GameStatus::InProgress)
            .and_then(|s| text(s, &["displayClock"])),
        venue: competition.and_then(|c| text(c, &["venue", "fullName"])),

        home_team_id: home.team_id,
        home_team: home.team,
        home_abbreviation: home.abbreviation,
        home_score: home.score,
        home_record: home.record,

        away_team_id: away.team_id,
        away_team: away.team,
        away_abbreviation: away.abbreviation,
        away_score: away.score,
        away_record: away.record,

        winner_team_id,
    }
}

fn game_status(status: &Value) -> GameStatus {
    let name = text(status, &["type", "name"]).unwrap_or_default();
    if name.contains("POSTPONED") || name.contains("CANCELED") || name.contains("SUSPENDED") {
        return GameStatus::Postponed;
    }

    match text(status, &["type", "state"]).as_deref() {
        Some("pre") => GameStatus::Scheduled,
        Some("in") => GameStatus::InProgress,
        Some("post") => GameStatus::Final,
        _ => match boolean(status, &["type", "completed"]) {
            Some(true) => GameStatus::Final,
            _ => GameStatus::Unknown,
        },
    }
}

/// ESPN timestamps omit seconds ("2024-01-15T00:30Z")
fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn team_id(competitor: &Value) -> Option<String> {
    text(competitor, &["team", "id"]).or_else(|| text(competitor, &["id"]))
}

#[derive(Default)]
struct Side {
    team_id: Option<String>,
    team: Option<String>,
    abbreviation: Option<String>,
    score: Option<u32>,
    record: Option<String>,
}

impl Side {
    fn from_competitors(competitors: &[Value], home_away: &str, status: GameStatus) -> Self {
        let Some(competitor) = competitors
            .iter()
            .find(|c| text(c, &["homeAway"]).as_deref() == Some(home_away))
        else {
            return Side::default();
        };

        Side {
            team_id: team_id(competitor),
            team: text(competitor, &["team", "displayName"]),
            abbreviation: text(competitor, &["team", "abbreviation"]),
            // Pre-game payloads often carry "0"; that is not a score
            score: if status.is_pregame() { None } else { score(competitor) },
            record: record(competitor),
        }
    }
}

/// Scoreboards send `"112"`, schedules send `{ "value": 112.0, "displayValue": "112" }`
fn score(competitor: &Value) -> Option<u32> {
    let raw = competitor.get("score")?;
    as_count(raw)
        .or_else(|| count(raw, &["value"]))
        .or_else(|| count(raw, &["displayValue"]))
}

/// Overall record from `records` (scoreboard) or `record` (schedule)
fn record(competitor: &Value) -> Option<String> {
    let entries = match items(competitor, "records") {
        [] => items(competitor, "record"),
        entries => entries,
    };

    let summary =
        |entry: &Value| text(entry, &["summary"]).or_else(|| text(entry, &["displayValue"]));

    entries
        .iter()
        .find(|entry| text(entry, &["type"]).as_deref() == Some("total"))
        .and_then(summary)
        .or_else(|| entries.first().and_then(summary))
        .or_else(|| at(competitor, &["record"]).and_then(|r| r.as_str().map(str::to_string)))
}
