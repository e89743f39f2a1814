use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_handler))
        // Selection vocabularies
        .route("/api/ml/match-types", get(handlers::get_match_types))
        .route("/api/ml/oppositions", get(handlers::get_oppositions))
        .route("/api/ml/pitch-types", get(handlers::get_pitch_types))
        .route("/api/ml/weather-conditions", get(handlers::get_weather_conditions))
        // Best XI
        .route("/api/predict-team", post(handlers::predict_team))
        .route("/api/best-xi/generate", get(handlers::generate_best_xi))
        // Batting stats
        .route("/api/homepage-stats", get(handlers::get_homepage_stats))
        .route("/api/players", get(handlers::get_batting_players))
        .route("/api/grounds-for-player", get(handlers::get_batting_grounds))
        .route("/api/player-ground-stats", get(handlers::get_batting_report))
        .route("/api/player-ground-chart-data", get(handlers::get_batting_chart))
        // Bowling stats
        .route("/api/bowling/players", get(handlers::get_bowling_players))
        .route("/api/bowling/grounds-for-player", get(handlers::get_bowling_grounds))
        .route("/api/bowling/player-ground-stats", get(handlers::get_bowling_report))
        // Dataset management
        .route("/api/dataset/reload", post(handlers::reload_dataset))
        .route("/api/dataset/add-record", post(handlers::add_record))
        .route("/api/dataset/records", get(handlers::list_records))
        .route("/api/dataset/records/:id", delete(handlers::delete_record))
        .route("/api/dataset/check-condition", get(handlers::check_condition))
        // Add state and CORS
        .with_state(state)
        .layer(cors)
}
