use super::json::{at, items, text};
use super::stats::{stat_display, stat_value};
use crate::types::{StandingsEntry, StandingsGroup};
use serde_json::Value;

/// Normalize a standings payload.
///
/// League standings are split into `children` (conferences), each holding
/// `standings.entries`. A payload without children is treated as a single
/// group. Entry order is kept as received.
pub fn normalize_standings(payload: &Value) -> Vec<StandingsGroup> {
    match items(payload, "children") {
        [] if at(payload, &["standings", "entries"]).is_some() => vec![normalize_group(payload)],
        [] => Vec::new(),
        children => children.iter().map(normalize_group).collect(),
    }
}

fn normalize_group(group: &Value) -> StandingsGroup {
    let entries = group
        .get("standings")
        .map(|standings| items(standings, "entries"))
        .unwrap_or(&[]);

    StandingsGroup {
        name: text(group, &["name"]),
        abbreviation: text(group, &["abbreviation"]),
        entries: entries.iter().map(normalize_entry).collect(),
    }
}

fn normalize_entry(entry: &Value) -> StandingsEntry {
    let stats = items(entry, "stats");
    let whole = |name: &str| {
        stat_value(stats, name)
            .filter(|v| *v >= 0.0 && v.fract() == 0.0)
            .map(|v| v as u32)
    };

    StandingsEntry {
        team_id: text(entry, &["team", "id"]),
        abbreviation: text(entry, &["team", "abbreviation"]),
        display_name: text(entry, &["team", "displayName"]),
        wins: whole("wins"),
        losses: whole("losses"),
        win_percent: stat_value(stats, "winPercent"),
        games_behind: stat_value(stats, "gamesBehind"),
        streak: stat_display(stats, "streak"),
        playoff_seed: whole("playoffSeed"),
    }
}
