//! End-to-end dispatch against a canned in-memory upstream

use async_trait::async_trait;
use config_manager::{AggregationPolicy, RankingPolicy, SystemConfig};
use entrypoints::{Dispatcher, EntrypointError};
use espn_client::{UpstreamClient, UpstreamError, UpstreamPayload, UpstreamRequest};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct CannedUpstream {
    responses: HashMap<UpstreamRequest, Result<Value, UpstreamError>>,
    seen: Mutex<Vec<UpstreamRequest>>,
}

impl CannedUpstream {
    fn with(mut self, request: UpstreamRequest, body: Value) -> Self {
        self.responses.insert(request, Ok(body));
        self
    }

    fn failing(mut self, request: UpstreamRequest, status: u16) -> Self {
        let endpoint = request.to_string();
        self.responses
            .insert(request, Err(UpstreamError::Unavailable { status, endpoint }));
        self
    }

    fn seen(&self) -> Vec<UpstreamRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamClient for CannedUpstream {
    async fn fetch(
        &self,
        request: &UpstreamRequest,
        cancel: &CancellationToken,
    ) -> espn_client::Result<UpstreamPayload> {
        if cancel.is_cancelled() {
            return Err(UpstreamError::Cancelled);
        }
        self.seen.lock().unwrap().push(request.clone());
        match self.responses.get(request) {
            Some(Ok(body)) => Ok(Arc::new(body.clone())),
            Some(Err(e)) => Err(e.clone()),
            None => Err(UpstreamError::Unavailable {
                status: 404,
                endpoint: request.to_string(),
            }),
        }
    }
}

fn team_payload(id: &str, abbreviation: &str, name: &str) -> Value {
    json!({"team": {
        "id": id,
        "abbreviation": abbreviation,
        "displayName": name,
        "record": {"items": [{"type": "total", "summary": "25-17"}]}
    }})
}

fn competitor(id: &str, home_away: &str, score: &str, winner: bool) -> Value {
    json!({
        "homeAway": home_away,
        "score": score,
        "winner": winner,
        "team": {"id": id, "abbreviation": id}
    })
}

fn final_game(id: &str, home: &str, away: &str) -> Value {
    json!({
        "id": id,
        "date": "2024-01-15T20:00Z",
        "competitions": [{
            "status": {"type": {"name": "STATUS_FINAL", "state": "post", "completed": true}},
            "competitors": [
                competitor(home, "home", "112", true),
                competitor(away, "away", "104", false)
            ]
        }]
    })
}

fn leaders_payload(points: [f64; 3]) -> Value {
    let athlete = |id: &str, value: f64| {
        json!({
            "athlete": {"id": id, "displayName": format!("Player {}", id), "teamShortName": "LAL"},
            "categories": [{"name": "offensive", "names": ["avgPoints"], "values": [value]}]
        })
    };
    json!({"athletes": [athlete("1", points[0]), athlete("2", points[1]), athlete("3", points[2])]})
}

fn dispatcher(
    config: &SystemConfig,
    upstream: CannedUpstream,
) -> (Dispatcher, Arc<CannedUpstream>) {
    let upstream = Arc::new(upstream);
    let dispatcher = Dispatcher::new(config, upstream.clone()).unwrap();
    (dispatcher, upstream)
}

fn matchup_upstream() -> CannedUpstream {
    CannedUpstream::default()
        .with(UpstreamRequest::team("13"), team_payload("13", "LAL", "Los Angeles Lakers"))
        .with(UpstreamRequest::team("2"), team_payload("2", "BOS", "Boston Celtics"))
}

#[tokio::test]
async fn test_scoreboard_for_date() {
    let upstream = CannedUpstream::default().with(
        UpstreamRequest::scoreboard(Some("20240115")),
        json!({"day": {"date": "2024-01-15"}, "events": [final_game("401", "13", "2")]}),
    );
    let (dispatcher, _) = dispatcher(&SystemConfig::default(), upstream);

    let result = dispatcher
        .dispatch("scoreboard", json!({"date": "20240115"}), &CancellationToken::new())
        .await
        .unwrap();

    let games = result.output["games"].as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["status"], "final");
    assert_eq!(games[0]["homeScore"], 112);
    assert_eq!(games[0]["winnerTeamId"], "13");

    let envelope = serde_json::to_value(&result).unwrap();
    assert!(envelope["fetchedAt"].is_string());
}

#[tokio::test]
async fn test_team_profile_resolves_aliases() {
    let upstream = CannedUpstream::default()
        .with(UpstreamRequest::team("13"), team_payload("13", "LAL", "Los Angeles Lakers"))
        .with(
            UpstreamRequest::team_roster("13"),
            json!({"athletes": [{"id": "1966", "displayName": "LeBron James", "jersey": "23"}]}),
        )
        .with(
            UpstreamRequest::team_schedule("13"),
            json!({"events": [final_game("401", "13", "2")]}),
        );
    let (dispatcher, upstream) = dispatcher(&SystemConfig::default(), upstream);

    for identifier in ["Lakers", "LAL", "13", " los angeles lakers "] {
        let result = dispatcher
            .dispatch("team-profile", json!({"team": identifier}), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.output["team"]["id"], "13", "identifier {}", identifier);
        assert_eq!(result.output["team"]["record"], "25-17");
        assert_eq!(result.output["roster"][0]["displayName"], "LeBron James");
        assert_eq!(result.output["schedule"].as_array().unwrap().len(), 1);
        assert_eq!(result.output["degraded"], json!([]));
    }
    assert_eq!(upstream.seen().len(), 12);
}

#[tokio::test]
async fn test_unresolved_team_makes_no_upstream_call() {
    let (dispatcher, upstream) = dispatcher(&SystemConfig::default(), CannedUpstream::default());

    let err = dispatcher
        .dispatch("team-profile", json!({"team": "XYZ"}), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        EntrypointError::UnresolvedEntity { identifier, hint } => {
            assert_eq!(identifier, "XYZ");
            assert!(hint.contains("Lakers"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(upstream.seen().is_empty());

    let err = dispatcher
        .dispatch("team-profile", json!({"team": "Los Angeles"}), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "unresolved_entity");
}

#[tokio::test]
async fn test_player_stats_requires_numeric_id() {
    let upstream = CannedUpstream::default().with(
        UpstreamRequest::athlete("1966"),
        json!({"athlete": {"id": "1966", "displayName": "LeBron James"}}),
    );
    let (dispatcher, _) = dispatcher(&SystemConfig::default(), upstream);
    let cancel = CancellationToken::new();

    let result = dispatcher
        .dispatch("player-stats", json!({"player": "1966"}), &cancel)
        .await
        .unwrap();
    assert_eq!(result.output["displayName"], "LeBron James");
    assert_eq!(result.output["pointsPerGame"], Value::Null);

    let err = dispatcher
        .dispatch("player-stats", json!({"player": "LeBron"}), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "unresolved_entity");
}

#[tokio::test]
async fn test_unknown_entrypoint_and_invalid_input() {
    let (dispatcher, upstream) = dispatcher(&SystemConfig::default(), CannedUpstream::default());
    let cancel = CancellationToken::new();

    let err = dispatcher.dispatch("box-score", json!({}), &cancel).await.unwrap_err();
    assert_eq!(
        err,
        EntrypointError::UnknownEntrypoint {
            name: "box-score".to_string()
        }
    );

    let err = dispatcher
        .dispatch("scoreboard", json!({"date": "20240115", "league": "wnba"}), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_input");

    let err = dispatcher
        .dispatch("scoreboard", json!({"date": "2024-01-15"}), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_input");

    assert!(upstream.seen().is_empty());
}

#[tokio::test]
async fn test_leaders_resorted_by_default() {
    let upstream = CannedUpstream::default().with(
        UpstreamRequest::leaders("offensive", "avgPoints", 3),
        leaders_payload([25.0, 31.5, 28.0]),
    );
    let (dispatcher, _) = dispatcher(&SystemConfig::default(), upstream);

    let result = dispatcher
        .dispatch(
            "league-leaders",
            json!({"stat": "points", "limit": 3}),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let ranked: Vec<(u64, String)> = result.output["leaders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["rank"].as_u64().unwrap(), e["athleteId"].as_str().unwrap().to_string()))
        .collect();
    assert_eq!(
        ranked,
        vec![(1, "2".to_string()), (2, "3".to_string()), (3, "1".to_string())]
    );
}

#[tokio::test]
async fn test_leaders_verify_and_positional_policies() {
    let upstream = || {
        CannedUpstream::default().with(
            UpstreamRequest::leaders("offensive", "avgPoints", 3),
            leaders_payload([25.0, 31.5, 28.0]),
        )
    };
    let input = json!({"stat": "points", "limit": 3});

    let mut config = SystemConfig::default();
    config.leaders.ranking_policy = RankingPolicy::Verify;
    let (verifying, _) = dispatcher(&config, upstream());
    let err = verifying
        .dispatch("league-leaders", input.clone(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "upstream_contract_violation");

    config.leaders.ranking_policy = RankingPolicy::Positional;
    let (positional, _) = dispatcher(&config, upstream());
    let result = positional
        .dispatch("league-leaders", input, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(result.output["leaders"][0]["athleteId"], "1");
    assert_eq!(result.output["leaders"][0]["rank"], 1);
}

#[tokio::test]
async fn test_leaders_limit_bounds() {
    let (dispatcher, upstream) = dispatcher(&SystemConfig::default(), CannedUpstream::default());

    let err = dispatcher
        .dispatch(
            "league-leaders",
            json!({"stat": "points", "limit": 500}),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_input");
    assert!(upstream.seen().is_empty());
}

#[tokio::test]
async fn test_matchup_head_to_head() {
    let upstream = matchup_upstream().with(
        UpstreamRequest::team_schedule("13"),
        json!({"events": [
            final_game("401", "13", "2"),
            final_game("402", "13", "9"),
            final_game("403", "2", "13")
        ]}),
    );
    let (dispatcher, _) = dispatcher(&SystemConfig::default(), upstream);

    let result = dispatcher
        .dispatch(
            "matchup",
            json!({"home": "Lakers", "away": "Celtics"}),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.output["home"]["abbreviation"], "LAL");
    assert_eq!(result.output["away"]["abbreviation"], "BOS");
    let ids: Vec<&str> = result.output["headToHead"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["401", "403"]);
}

#[tokio::test]
async fn test_matchup_rejects_same_team() {
    let (dispatcher, upstream) = dispatcher(&SystemConfig::default(), matchup_upstream());

    let err = dispatcher
        .dispatch("matchup", json!({"home": "LAL", "away": "Lakers"}), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_input");
    assert!(upstream.seen().is_empty());
}

#[tokio::test]
async fn test_matchup_schedule_failure_by_policy() {
    let upstream = || matchup_upstream().failing(UpstreamRequest::team_schedule("13"), 503);
    let input = json!({"home": "LAL", "away": "BOS"});

    // Fail-fast: any failure fails the request
    let (fail_fast, _) = dispatcher(&SystemConfig::default(), upstream());
    let err = fail_fast
        .dispatch("matchup", input.clone(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EntrypointError::UpstreamUnavailable {
            status: 503,
            endpoint: "team_schedule(13)".to_string()
        }
    );
    assert!(err.retryable());

    // Best-effort: the optional section degrades to null
    let mut config = SystemConfig::default();
    config.orchestrator.aggregation_policy = AggregationPolicy::BestEffort;
    let (best_effort, _) = dispatcher(&config, upstream());
    let result = best_effort
        .dispatch("matchup", input, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(result.output["headToHead"], Value::Null);
    assert_eq!(result.output["degraded"], json!(["home schedule"]));
    assert_eq!(result.output["home"]["id"], "13");
}

#[tokio::test]
async fn test_required_failure_under_best_effort() {
    let upstream = CannedUpstream::default()
        .failing(UpstreamRequest::team("13"), 500)
        .with(UpstreamRequest::team_roster("13"), json!({"athletes": []}))
        .with(UpstreamRequest::team_schedule("13"), json!({"events": []}));
    let mut config = SystemConfig::default();
    config.orchestrator.aggregation_policy = AggregationPolicy::BestEffort;
    let (dispatcher, _) = dispatcher(&config, upstream);

    let err = dispatcher
        .dispatch("team-profile", json!({"team": "LAL"}), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, EntrypointError::UpstreamUnavailable { status: 500, .. }));
}

#[tokio::test]
async fn test_standings_conference_filter() {
    let upstream = CannedUpstream::default().with(
        UpstreamRequest::standings(),
        json!({"children": [
            {"name": "Eastern Conference", "abbreviation": "East", "standings": {"entries": []}},
            {"name": "Western Conference", "abbreviation": "West", "standings": {"entries": []}}
        ]}),
    );
    let (dispatcher, _) = dispatcher(&SystemConfig::default(), upstream);
    let cancel = CancellationToken::new();

    let all = dispatcher.dispatch("standings", Value::Null, &cancel).await.unwrap();
    assert_eq!(all.output["conferences"].as_array().unwrap().len(), 2);

    let west = dispatcher
        .dispatch("standings", json!({"conference": "west"}), &cancel)
        .await
        .unwrap();
    assert_eq!(west.output["conferences"][0]["abbreviation"], "West");
    assert_eq!(west.output["conferences"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancelled_request() {
    let (dispatcher, _) = dispatcher(&SystemConfig::default(), matchup_upstream());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = dispatcher
        .dispatch("matchup", json!({"home": "LAL", "away": "BOS"}), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err, EntrypointError::Cancelled);
}

#[tokio::test]
async fn test_discovery_document() {
    let (dispatcher, _) = dispatcher(&SystemConfig::default(), CannedUpstream::default());
    let document = serde_json::to_value(dispatcher.discovery()).unwrap();

    let entrypoints = document["entrypoints"].as_array().unwrap();
    let names: Vec<&str> = entrypoints.iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["league-leaders", "matchup", "player-stats", "scoreboard", "standings", "team-profile"]
    );

    let matchup = &entrypoints[1];
    assert_eq!(matchup["price"], json!({"tier": "premium", "amountUsd": "0.005"}));
    assert!(matchup["inputSchema"]["properties"]["home"].is_object());
    assert!(matchup["description"].as_str().unwrap().len() > 10);
}

#[tokio::test]
async fn test_invalid_extra_aliases_are_rejected_at_setup() {
    use entrypoints::SetupError;
    use stats_core::ExtraAliasError;

    let mut shadowing = SystemConfig::default();
    shadowing.resolver.extra_team_aliases.insert("7".to_string(), 13);
    let err = Dispatcher::new(&shadowing, Arc::new(CannedUpstream::default())).err();
    assert!(matches!(err, Some(SetupError::Alias(ExtraAliasError::NumericAlias { .. }))));

    let mut out_of_range = SystemConfig::default();
    out_of_range.resolver.extra_team_aliases.insert("showtime".to_string(), 99);
    let err = Dispatcher::new(&out_of_range, Arc::new(CannedUpstream::default())).err();
    assert!(matches!(
        err,
        Some(SetupError::Alias(ExtraAliasError::UnknownTeamId { id: 99, .. }))
    ));
}

#[tokio::test]
async fn test_extra_alias_resolves_through_dispatch() {
    let mut config = SystemConfig::default();
    config.orchestrator.aggregation_policy = AggregationPolicy::BestEffort;
    config.resolver.extra_team_aliases.insert("Showtime".to_string(), 13);
    let upstream = CannedUpstream::default()
        .with(UpstreamRequest::team("13"), team_payload("13", "LAL", "Los Angeles Lakers"));
    let (dispatcher, _) = dispatcher(&config, upstream);

    let result = dispatcher
        .dispatch("team-profile", json!({"team": "showtime"}), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(result.output["team"]["abbreviation"], "LAL");
}
