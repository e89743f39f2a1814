use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::api::{state::AppState, types::*};
use crate::domain::PerformanceRecord;
use crate::error::XiError;

/// POST /api/dataset/add-record
pub async fn add_record(
    State(state): State<AppState>,
    Json(record): Json<PerformanceRecord>,
) -> std::result::Result<(StatusCode, Json<RecordCreatedResponse>), ApiError> {
    let store = state.require_store().map_err(error_response)?;
    if record.player_name.trim().is_empty() {
        return Err(error_response(XiError::Validation(
            "player_name must not be blank".to_string(),
        )));
    }

    let id = store.insert_record(&record).await.map_err(error_response)?;
    info!(id, format = %record.format, player = %record.player_name, "Record added");
    state.refresh_after_write().await;

    Ok((
        StatusCode::CREATED,
        Json(RecordCreatedResponse {
            id,
            message: format!("{} record added", record.format),
        }),
    ))
}

/// GET /api/dataset/records
pub async fn list_records(
    State(state): State<AppState>,
    Query(q): Query<FormatQuery>,
) -> ApiResult<Vec<PerformanceRecord>> {
    let store = state.require_store().map_err(error_response)?;
    let format = format_or_default(q.match_type.as_deref()).map_err(error_response)?;
    let records = store.list_records(format).await.map_err(error_response)?;
    Ok(Json(records))
}

/// DELETE /api/dataset/records/:id
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<FormatQuery>,
) -> ApiResult<RecordDeletedResponse> {
    let store = state.require_store().map_err(error_response)?;
    let format = format_or_default(q.match_type.as_deref()).map_err(error_response)?;

    if !store.delete_record(format, id).await.map_err(error_response)? {
        return Err(error_response(XiError::NotFound(format!(
            "{format} record {id}"
        ))));
    }
    info!(id, format = %format, "Record deleted");
    state.refresh_after_write().await;

    Ok(Json(RecordDeletedResponse {
        id,
        message: "Record deleted".to_string(),
    }))
}

/// GET /api/dataset/check-condition
pub async fn check_condition(
    State(state): State<AppState>,
    Query(q): Query<ConditionQuery>,
) -> ApiResult<ExistsResponse> {
    let store = state.require_store().map_err(error_response)?;
    let format = format_or_default(q.match_type.as_deref()).map_err(error_response)?;
    let player = required(&q.player_name, "player_name").map_err(error_response)?;
    let opposition = required(&q.opposition, "opposition").map_err(error_response)?;

    let exists = store
        .record_exists(format, player, opposition)
        .await
        .map_err(error_response)?;
    Ok(Json(ExistsResponse { exists }))
}
