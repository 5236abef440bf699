use super::json::{count, first, items, text};
use crate::types::{RosterPlayer, Team};
use serde_json::Value;

/// Normalize a team payload (`{ team: {...} }` or the bare team object)
pub fn normalize_team(payload: &Value) -> Team {
    let team = payload.get("team").unwrap_or(payload);

    let record_items = team
        .get("record")
        .map(|record| items(record, "items"))
        .unwrap_or(&[]);
    let record = record_items
        .iter()
        .find(|item| text(item, &["type"]).as_deref() == Some("total"))
        .or_else(|| record_items.first())
        .and_then(|item| text(item, &["summary"]));

    Team {
        id: text(team, &["id"]),
        abbreviation: text(team, &["abbreviation"]),
        display_name: text(team, &["displayName"]),
        location: text(team, &["location"]),
        name: text(team, &["name"]),
        color: text(team, &["color"]),
        logo: first(team, "logos").and_then(|logo| text(logo, &["href"])),
        record,
        standing_summary: text(team, &["standingSummary"]),
    }
}

/// Normalize a roster payload. Athletes arrive either as a flat list or
/// grouped by position (`[{ position, items: [...] }]`).
pub fn normalize_roster(payload: &Value) -> Vec<RosterPlayer> {
    items(payload, "athletes")
        .iter()
        .flat_map(|entry| match entry.get("items").and_then(Value::as_array) {
            Some(group) => group.iter().collect::<Vec<_>>(),
            None => vec![entry],
        })
        .map(normalize_roster_player)
        .collect()
}

fn normalize_roster_player(athlete: &Value) -> RosterPlayer {
    RosterPlayer {
        id: text(athlete, &["id"]),
        display_name: text(athlete, &["displayName"]).or_else(|| text(athlete, &["fullName"])),
        jersey: text(athlete, &["jersey"]),
        position: text(athlete, &["position", "abbreviation"]),
        height: text(athlete, &["displayHeight"]),
        weight: text(athlete, &["displayWeight"]),
        age: count(athlete, &["age"]),
        experience_years: count(athlete, &["experience", "years"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_team_with_record_and_logo() {
        let payload = json!({
            "team": {
                "id": "13",
                "abbreviation": "LAL",
                "displayName": "Los Angeles Lakers",
                "location": "Los Angeles",
                "name": "Lakers",
                "color": "552583",
                "logos": [{"href": "https://a.espncdn.com/lal.png"}],
                "record": {"items": [
                    {"type": "home", "summary": "15-5"},
                    {"type": "total", "summary": "25-17"}
                ]},
                "standingSummary": "7th in Western Conference"
            }
        });

        let team = normalize_team(&payload);
        assert_eq!(team.id.as_deref(), Some("13"));
        assert_eq!(team.record.as_deref(), Some("25-17"));
        assert_eq!(team.logo.as_deref(), Some("https://a.espncdn.com/lal.png"));
        assert_eq!(team.standing_summary.as_deref(), Some("7th in Western Conference"));
    }

    #[test]
    fn test_team_without_record_is_absent() {
        let team = normalize_team(&json!({"team": {"id": "2", "displayName": "Boston Celtics"}}));
        assert_eq!(team.record, None);
        assert_eq!(team.logo, None);
        assert_eq!(team.color, None);
    }

    #[test]
    fn test_flat_and_grouped_rosters() {
        let flat = json!({"athletes": [
            {"id": "1966", "displayName": "LeBron James", "jersey": "23",
             "position": {"abbreviation": "F"}, "age": 39, "experience": {"years": 21},
             "displayHeight": "6' 9\"", "displayWeight": "250 lbs"},
            {"id": "3", "fullName": "Rookie Player"}
        ]});
        let grouped = json!({"athletes": [
            {"position": "guards", "items": [{"id": "10", "displayName": "Guard One"}]},
            {"position": "forwards", "items": [{"id": "11", "displayName": "Forward One"}]}
        ]});

        let flat = normalize_roster(&flat);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].experience_years, Some(21));
        assert_eq!(flat[0].position.as_deref(), Some("F"));
        assert_eq!(flat[1].display_name.as_deref(), Some("Rookie Player"));
        assert_eq!(flat[1].age, None);
        assert_eq!(flat[1].experience_years, None);

        let grouped = normalize_roster(&grouped);
        let ids: Vec<_> = grouped.iter().filter_map(|p| p.id.as_deref()).collect();
        assert_eq!(ids, vec!["10", "11"]);
    }
}
