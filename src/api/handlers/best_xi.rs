use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::{state::AppState, types::*};
use crate::domain::MatchFormat;
use crate::error::XiError;

/// GET /api/ml/match-types
pub async fn get_match_types(State(state): State<AppState>) -> Json<Vec<MatchFormat>> {
    Json(state.snapshot().await.formats())
}

/// GET /api/ml/oppositions
pub async fn get_oppositions(
    State(state): State<AppState>,
    Query(q): Query<FormatQuery>,
) -> ApiResult<Vec<String>> {
    let format = optional_format(q.match_type.as_deref()).map_err(error_response)?;
    Ok(Json(state.snapshot().await.oppositions(format)))
}

/// GET /api/ml/pitch-types
pub async fn get_pitch_types(
    State(state): State<AppState>,
    Query(q): Query<FormatQuery>,
) -> ApiResult<Vec<String>> {
    let format = optional_format(q.match_type.as_deref()).map_err(error_response)?;
    Ok(Json(state.snapshot().await.pitch_types(format)))
}

/// GET /api/ml/weather-conditions
pub async fn get_weather_conditions(
    State(state): State<AppState>,
    Query(q): Query<FormatQuery>,
) -> ApiResult<Vec<String>> {
    let format = optional_format(q.match_type.as_deref()).map_err(error_response)?;
    Ok(Json(state.snapshot().await.weather_conditions(format)))
}

async fn best_xi(state: &AppState, req: &PredictTeamRequest) -> ApiResult<TeamResponse> {
    let format = format_or_default(req.match_type.as_deref()).map_err(error_response)?;
    let pitch_type = required(&req.pitch_type, "pitch_type").map_err(error_response)?;
    let opposition = required(&req.opposition, "opposition").map_err(error_response)?;
    let weather = req.weather.as_deref().unwrap_or_default();

    let team = state
        .select_best_xi(format, pitch_type, weather, opposition)
        .await
        .map_err(|e| error_response(XiError::from(e)))?;

    Ok(Json(TeamResponse::from(team)))
}

/// POST /api/predict-team
pub async fn predict_team(
    State(state): State<AppState>,
    Json(req): Json<PredictTeamRequest>,
) -> ApiResult<TeamResponse> {
    best_xi(&state, &req).await
}

/// GET /api/best-xi/generate
pub async fn generate_best_xi(
    State(state): State<AppState>,
    Query(req): Query<PredictTeamRequest>,
) -> ApiResult<TeamResponse> {
    best_xi(&state, &req).await
}
