use futures::StreamExt;
use httpmock::prelude::*;
use serde_json::json;
use valdeck_api::DashboardApiClient;
use valdeck_shared::UpdateState;
use valdeck_shared::errors::ApiError;
use valdeck_shared::traits::{MatchApi, PlayerApi, ReportApi, UpdateApi};

fn summary_body(id: u64, result: &str) -> serde_json::Value {
    json!({
        "id": id,
        "match_id": format!("m-{id}"),
        "agent_name": "Jett",
        "agent_image": "https://cdn.example/jett.png",
        "map": "Ascent",
        "result": result,
        "roundsWon": 13,
        "roundsLost": 7,
        "kda": "21/14/3",
        "kdRatio": "1.50",
        "fmt_pos": "MVP",
        "hsPercent": 28.5,
        "adr": 161.2,
        "acs": 255.0
    })
}

#[tokio::test]
async fn get_player_resolves_lookup() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v1/players/player/NA1");
        then.status(200)
            .json_body(json!({ "puuid": "p-123", "region": "na" }));
    });

    let api = DashboardApiClient::new(server.base_url());
    let player = api
        .get_player("player".to_string(), "NA1".to_string())
        .await
        .unwrap();

    mock.assert();
    assert_eq!(player.puuid, "p-123");
    assert_eq!(player.region, "na");
    assert_eq!(player.display_name(), "player#NA1");
}

#[tokio::test]
async fn get_player_encodes_path_segments() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v1/players/Le%20Conservateur/3012");
        then.status(200)
            .json_body(json!({ "puuid": "p-456", "region": "eu" }));
    });

    let api = DashboardApiClient::new(server.base_url());
    let player = api
        .get_player("Le Conservateur".to_string(), "3012".to_string())
        .await
        .unwrap();

    mock.assert();
    assert_eq!(player.game_name, "Le Conservateur");
}

#[tokio::test]
async fn get_player_maps_404_to_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/players/ghost/NA1");
        then.status(404);
    });

    let api = DashboardApiClient::new(server.base_url());
    let err = api
        .get_player("ghost".to_string(), "NA1".to_string())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn get_matches_decodes_list() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/matches/na/p-123");
        then.status(200)
            .json_body(json!([summary_body(1, "win"), summary_body(2, "loss")]));
    });

    let api = DashboardApiClient::new(server.base_url());
    let matches = api
        .get_matches("na".to_string(), "p-123".to_string())
        .await
        .unwrap();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].match_id, "m-1");
    assert_eq!(matches[0].kd_ratio, 1.5);
    assert_eq!(matches[0].to_formatted_score(), "13:7");
}

#[tokio::test]
async fn get_matches_maps_server_error_to_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/matches/na/p-123");
        then.status(500);
    });

    let api = DashboardApiClient::new(server.base_url());
    let err = api
        .get_matches("na".to_string(), "p-123".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 500));
}

#[tokio::test]
async fn get_match_decodes_detail() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/matches/m-42");
        then.status(200).json_body(json!({
            "id": "m-42",
            "map_name": "Lotus",
            "start_time": 1_700_000_000_000_i64,
            "duration_ms": 2_215_000,
            "winning_team": "Blue",
            "rounds_play": 21,
            "participations": [{
                "puuid": "p-123",
                "user_id": "player",
                "user_tag": "NA1",
                "agent_name": "Sova",
                "team_id": "Blue",
                "kills": 18,
                "deaths": 12,
                "assists": 6,
                "combat_score": 4800,
                "damage_dealt": 3100,
                "headshots": 11,
                "othershots": 40,
                "rounds_played": 21,
                "result": "win",
                "position": 1
            }]
        }));
    });

    let api = DashboardApiClient::new(server.base_url());
    let detail = api.get_match("m-42".to_string()).await.unwrap();

    assert_eq!(detail.map_name, "Lotus");
    assert_eq!(detail.to_formatted_duration(), "36:55");
    let me = detail.participation_of("p-123").unwrap();
    assert_eq!(me.position_label(), "MVP");
}

#[tokio::test]
async fn update_trigger_and_status_round() {
    let server = MockServer::start();
    let trigger = server.mock(|when, then| {
        when.method(POST).path("/api/v1/matches/na/p-123/update");
        then.status(200).json_body(json!({ "task_id": "task-9" }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/matches/update/status/task-9");
        then.status(200).json_body(json!({
            "state": "PROGRESS",
            "meta": { "current": 1, "total": 4, "status": "Fetching from API..." }
        }));
    });

    let api = DashboardApiClient::new(server.base_url());
    let task_id = api
        .start_update("na".to_string(), "p-123".to_string())
        .await
        .unwrap();
    trigger.assert();
    assert_eq!(task_id, "task-9");

    let status = api.update_status(task_id).await.unwrap();
    assert_eq!(status.state, UpdateState::Progress);
    assert_eq!(status.meta.unwrap().total, Some(4));
}

#[tokio::test]
async fn report_stream_concatenates_chunks() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/ai/report/p-123");
        then.status(200).body("Hello world");
    });

    let api = DashboardApiClient::new(server.base_url());
    let mut stream = api.report_stream("p-123".to_string()).await.unwrap();

    let mut text = String::new();
    while let Some(piece) = stream.next().await {
        text.push_str(&piece.unwrap());
    }

    assert_eq!(text, "Hello world");
}

#[tokio::test]
async fn report_stream_surfaces_http_failure_upfront() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/ai/report/p-123");
        then.status(500);
    });

    let api = DashboardApiClient::new(server.base_url());
    let res = api.report_stream("p-123".to_string()).await;

    assert!(matches!(res, Err(ApiError::Status(_))));
}
