use axum::{extract::State, http::StatusCode, Json};

use crate::api::{state::AppState, types::*};

/// GET /health -- liveness plus data / predictor readiness
pub async fn health_handler(
    State(state): State<AppState>,
) -> std::result::Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let snapshot = state.snapshot().await;

    let db = match &state.store {
        Some(store) => Some(
            match sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(store.pool())
                .await
            {
                Ok(_) => "connected".to_string(),
                Err(_) => "disconnected".to_string(),
            },
        ),
        None => None,
    };

    let predictor_loaded = state.predictor.is_loaded();
    let ok = predictor_loaded
        && !snapshot.records().is_empty()
        && db.as_deref().map_or(true, |d| d == "connected");
    let resp = HealthResponse {
        status: if ok { "ok".to_string() } else { "degraded".to_string() },
        data_source: snapshot.source().to_string(),
        records: snapshot.records().len(),
        formats: snapshot.formats(),
        predictor_loaded,
        db,
        loaded_at: snapshot.loaded_at(),
        uptime_secs: state.uptime_seconds(),
    };

    if ok {
        Ok(Json(resp))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(resp)))
    }
}

/// POST /api/dataset/reload
pub async fn reload_dataset(State(state): State<AppState>) -> ApiResult<ReloadResponse> {
    let snapshot = state.reload().await.map_err(error_response)?;

    Ok(Json(ReloadResponse {
        source: snapshot.source().to_string(),
        records: snapshot.records().len(),
        formats: snapshot.formats(),
        predictor_loaded: state.predictor.is_loaded(),
        loaded_at: snapshot.loaded_at(),
    }))
}
