use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use cricket_xi::api::{create_router, AppState};
use cricket_xi::config::ModelConfig;
use cricket_xi::data::{CsvRecordSource, SnapshotStore};
use cricket_xi::domain::MatchFormat;
use cricket_xi::ml::{PredictorKind, PredictorSlot};
use cricket_xi::{HeuristicPredictor, TeamSelector};

const HEADER: &str =
    "player_name,main_role,bowling_style,opposition,ground,pitch_type,weather,batting_runs,strike_rate,dismissal,runs_conceded,wicket_taken,economy\n";

fn odi_rows() -> String {
    let mut csv = HEADER.to_string();
    let players = [
        ("Kusal Mendis", "Wicketkeeper Batter", "", 55, 0),
        ("Sadeera Samarawickrama", "Wicketkeeper Batter", "", 30, 0),
        ("Pathum Nissanka", "Top order Batter", "", 70, 0),
        ("Charith Asalanka", "Middle order Batter", "Right-arm offbreak", 45, 0),
        ("Avishka Fernando", "Batter", "", 35, 0),
        ("Sadeera Rajapaksa", "Batter", "", 25, 0),
        ("Janith Liyanage", "Batter", "", 20, 0),
        ("Dhananjaya de Silva", "Batting Allrounder", "Right-arm offbreak", 40, 1),
        ("Wanindu Hasaranga", "Bowling Allrounder", "Legbreak googly", 20, 3),
        ("Dunith Wellalage", "Bowling Allrounder", "Slow left-arm orthodox", 15, 2),
        ("Maheesh Theekshana", "Bowler", "Right-arm offbreak", 5, 2),
        ("Dushmantha Chameera", "Bowler", "Right-arm fast", 2, 2),
        ("Dilshan Madushanka", "Bowler", "Left-arm fast-medium", 1, 3),
        ("Matheesha Pathirana", "Bowler", "Right-arm fast", 0, 1),
    ];
    for (i, (name, role, style, runs, wickets)) in players.iter().enumerate() {
        let opposition = if i % 2 == 0 { "India" } else { "Australia" };
        csv.push_str(&format!(
            "{name},{role},{style},{opposition},R. Premadasa,Flat,Sunny,{runs},90,caught,40,{wickets},5.0\n"
        ));
    }
    csv
}

async fn app_with(dir: &Path, predictor: PredictorSlot) -> Router {
    let odi = dir.join("odi.csv");
    std::fs::write(&odi, odi_rows()).unwrap();
    let source = CsvRecordSource::new(vec![
        (MatchFormat::Odi, odi),
        (MatchFormat::T20, dir.join("t20.csv")),
    ]);
    let snapshots = SnapshotStore::load(Arc::new(source)).await.unwrap();

    let state = AppState::new(
        Arc::new(snapshots),
        predictor,
        TeamSelector::default(),
        None,
        ModelConfig {
            kind: PredictorKind::Heuristic,
            path: None,
        },
    );
    create_router(state)
}

async fn app(dir: &Path) -> Router {
    app_with(
        dir,
        PredictorSlot::new(Some(Arc::new(HeuristicPredictor::default()))),
    )
    .await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_loaded_data() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(dir.path()).await, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["data_source"], "csv");
    assert_eq!(body["records"], 14);
    assert_eq!(body["predictor_loaded"], true);
}

#[tokio::test]
async fn vocabularies_come_from_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let router = app(dir.path()).await;

    let (status, body) = send(router.clone(), get("/api/ml/match-types")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["ODI"]));

    let (_, body) = send(router.clone(), get("/api/ml/oppositions?match_type=ODI")).await;
    assert_eq!(body, json!(["Australia", "India"]));

    let (_, body) = send(router.clone(), get("/api/ml/weather-conditions")).await;
    assert_eq!(body, json!(["Sunny"]));

    let (status, body) = send(router, get("/api/ml/pitch-types?match_type=Hundred")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "invalid_request");
}

#[tokio::test]
async fn predict_team_returns_a_full_eleven() {
    let dir = tempfile::tempdir().unwrap();
    let request = post_json(
        "/api/predict-team",
        json!({
            "match_type": "ODI",
            "pitch_type": "Flat",
            "weather": "Sunny",
            "opposition": "India"
        }),
    );
    let (status, body) = send(app(dir.path()).await, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["partial"], false);
    assert_eq!(body["match_type"], "ODI");
    let players = body["players"].as_array().unwrap();
    assert_eq!(players.len(), 11);
    let keepers: Vec<&Value> = players
        .iter()
        .filter(|p| p["role"] == "Wicket-Keeper")
        .collect();
    assert_eq!(keepers.len(), 1);
    assert_eq!(keepers[0]["name"], "Kusal Mendis");
}

#[tokio::test]
async fn generate_accepts_query_parameters_and_default_weather() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        app(dir.path()).await,
        get("/api/best-xi/generate?matchType=ODI&pitchType=Flat&opposition=India"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weather"], "Sunny");
    assert_eq!(body["players"].as_array().unwrap().len(), 11);
}

#[tokio::test]
async fn selection_failures_have_distinct_statuses() {
    let dir = tempfile::tempdir().unwrap();

    let request = post_json(
        "/api/predict-team",
        json!({"match_type": "T20", "pitch_type": "Flat", "opposition": "India"}),
    );
    let (status, body) = send(app(dir.path()).await, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["reason"], "no_data");

    let request = post_json(
        "/api/predict-team",
        json!({"match_type": "ODI", "pitch_type": "Flat", "opposition": "India"}),
    );
    let (status, body) = send(app_with(dir.path(), PredictorSlot::default()).await, request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["reason"], "no_predictor");

    let request = post_json("/api/predict-team", json!({"match_type": "ODI", "opposition": "India"}));
    let (status, body) = send(app(dir.path()).await, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "invalid_request");
}

#[tokio::test]
async fn health_is_degraded_without_predictor() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app_with(dir.path(), PredictorSlot::default()).await, get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn dataset_routes_need_a_store() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(dir.path()).await, get("/api/dataset/records?match_type=ODI")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["reason"], "no_store");
}

#[tokio::test]
async fn reload_reports_the_new_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/api/dataset/reload")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(dir.path()).await, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], 14);
    assert_eq!(body["predictor_loaded"], true);
}

#[tokio::test]
async fn stats_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let router = app(dir.path()).await;

    let (_, body) = send(router.clone(), get("/api/homepage-stats")).await;
    assert_eq!(body["top_scorer"]["name"], "Pathum Nissanka");
    assert_eq!(body["top_wicket_taker"]["name"], "Wanindu Hasaranga");

    let (_, body) = send(router.clone(), get("/api/bowling/players?match_type=ODI")).await;
    assert_eq!(body.as_array().unwrap().len(), 7);

    let (status, body) = send(
        router.clone(),
        get("/api/player-ground-stats?player=Kusal%20Mendis&ground=R.%20Premadasa"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_runs"], 55.0);

    let (status, _) = send(
        router.clone(),
        get("/api/player-ground-stats?player=Kusal%20Mendis&ground=Galle"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(router, get("/api/grounds-for-player")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn every_stats_route_reads_the_current_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let router = app(dir.path()).await;

    let (status, body) = send(router.clone(), get("/api/players")).await;
    assert_eq!(status, StatusCode::OK);
    // Matheesha Pathirana never scored a run.
    assert_eq!(body.as_array().unwrap().len(), 13);

    let (_, body) = send(router.clone(), get("/api/grounds-for-player?player=Kusal%20Mendis")).await;
    assert_eq!(body, json!(["R. Premadasa"]));

    let (status, body) = send(
        router.clone(),
        get("/api/player-ground-chart-data?player=Kusal%20Mendis&ground=R.%20Premadasa"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["labels"], json!(["India"]));
    assert_eq!(body["data"], json!([55.0]));

    let (_, body) = send(
        router.clone(),
        get("/api/bowling/grounds-for-player?player=Wanindu%20Hasaranga"),
    )
    .await;
    assert_eq!(body, json!(["R. Premadasa"]));

    let (status, body) = send(
        router.clone(),
        get("/api/bowling/player-ground-stats?player=Wanindu%20Hasaranga&ground=R.%20Premadasa"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wickets"], 3.0);
    assert_eq!(body["runs_conceded"], 40.0);
    assert_eq!(body["best_opposition"], "India");

    let (status, body) = send(
        router,
        get("/api/bowling/player-ground-stats?player=Pathum%20Nissanka&ground=R.%20Premadasa"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["reason"], "not_found");
}
