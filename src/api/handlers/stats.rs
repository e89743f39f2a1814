use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::{state::AppState, types::*};
use crate::error::XiError;
use crate::stats::{self, BattingReport, BowlingReport, HomepageSummary, OppositionChart};

/// GET /api/homepage-stats
pub async fn get_homepage_stats(State(state): State<AppState>) -> Json<HomepageSummary> {
    let snapshot = state.snapshot().await;
    Json(stats::homepage_summary(&snapshot))
}

/// GET /api/players
pub async fn get_batting_players(
    State(state): State<AppState>,
    Query(q): Query<FormatQuery>,
) -> ApiResult<Vec<String>> {
    let format = format_or_default(q.match_type.as_deref()).map_err(error_response)?;
    let snapshot = state.snapshot().await;
    Ok(Json(stats::batting_players(&snapshot, format)))
}

/// GET /api/grounds-for-player
pub async fn get_batting_grounds(
    State(state): State<AppState>,
    Query(q): Query<PlayerQuery>,
) -> ApiResult<Vec<String>> {
    let format = format_or_default(q.match_type.as_deref()).map_err(error_response)?;
    let Ok(player) = required(&q.player, "player") else {
        return Ok(Json(Vec::new()));
    };
    let snapshot = state.snapshot().await;
    Ok(Json(stats::batting_grounds(&snapshot, format, player)))
}

/// GET /api/player-ground-stats
pub async fn get_batting_report(
    State(state): State<AppState>,
    Query(q): Query<PlayerGroundQuery>,
) -> ApiResult<BattingReport> {
    let format = format_or_default(q.match_type.as_deref()).map_err(error_response)?;
    let player = required(&q.player, "player").map_err(error_response)?;
    let ground = required(&q.ground, "ground").map_err(error_response)?;

    let snapshot = state.snapshot().await;
    stats::batting_report(&snapshot, format, player, ground)
        .map(Json)
        .ok_or_else(|| {
            error_response(XiError::NotFound(format!(
                "no {format} batting data for {player} at {ground}"
            )))
        })
}

/// GET /api/player-ground-chart-data
pub async fn get_batting_chart(
    State(state): State<AppState>,
    Query(q): Query<PlayerGroundQuery>,
) -> ApiResult<OppositionChart> {
    let format = format_or_default(q.match_type.as_deref()).map_err(error_response)?;
    let player = required(&q.player, "player").map_err(error_response)?;
    let ground = required(&q.ground, "ground").map_err(error_response)?;
    let snapshot = state.snapshot().await;
    Ok(Json(stats::batting_chart(&snapshot, format, player, ground)))
}

/// GET /api/bowling/players
pub async fn get_bowling_players(
    State(state): State<AppState>,
    Query(q): Query<FormatQuery>,
) -> ApiResult<Vec<String>> {
    let format = format_or_default(q.match_type.as_deref()).map_err(error_response)?;
    let snapshot = state.snapshot().await;
    Ok(Json(stats::bowling_players(&snapshot, format)))
}

/// GET /api/bowling/grounds-for-player
pub async fn get_bowling_grounds(
    State(state): State<AppState>,
    Query(q): Query<PlayerQuery>,
) -> ApiResult<Vec<String>> {
    let format = format_or_default(q.match_type.as_deref()).map_err(error_response)?;
    let Ok(player) = required(&q.player, "player") else {
        return Ok(Json(Vec::new()));
    };
    let snapshot = state.snapshot().await;
    Ok(Json(stats::bowling_grounds(&snapshot, format, player)))
}

/// GET /api/bowling/player-ground-stats
pub async fn get_bowling_report(
    State(state): State<AppState>,
    Query(q): Query<PlayerGroundQuery>,
) -> ApiResult<BowlingReport> {
    let format = format_or_default(q.match_type.as_deref()).map_err(error_response)?;
    let player = required(&q.player, "player").map_err(error_response)?;
    let ground = required(&q.ground, "ground").map_err(error_response)?;

    let snapshot = state.snapshot().await;
    stats::bowling_report(&snapshot, format, player, ground)
        .map(Json)
        .ok_or_else(|| {
            error_response(XiError::NotFound(format!(
                "no {format} bowling data for {player} at {ground}"
            )))
        })
}
