use super::json::{items, text};
use super::stats::stat_value;
use crate::types::PlayerStats;
use serde_json::Value;

/// Normalize an athlete overview payload.
///
/// `statsSummary` is missing entirely for players who have not appeared in a
/// game this season; every per-game figure is then absent.
pub fn normalize_player(payload: &Value) -> PlayerStats {
    let athlete = payload.get("athlete").unwrap_or(payload);
    let summary = athlete.get("statsSummary");
    let statistics = summary.map(|s| items(s, "statistics")).unwrap_or(&[]);

    PlayerStats {
        id: text(athlete, &["id"]),
        display_name: text(athlete, &["displayName"]),
        jersey: text(athlete, &["jersey"]),
        position: text(athlete, &["position", "abbreviation"]),
        team_id: text(athlete, &["team", "id"]),
        team_name: text(athlete, &["team", "displayName"]),
        season_label: summary.and_then(|s| text(s, &["displayName"])),
        points_per_game: stat_value(statistics, "avgPoints"),
        rebounds_per_game: stat_value(statistics, "avgRebounds"),
        assists_per_game: stat_value(statistics, "avgAssists"),
        field_goal_pct: stat_value(statistics, "fieldGoalPct"),
        three_point_pct: stat_value(statistics, "threePointFieldGoalPct"),
    }
}
