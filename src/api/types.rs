use axum::{http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{
    parse_match_format, BowlingStyle, MatchFormat, PitchCategory, PlayerRole, RoleShortfall,
    ScoringSkip, SelectedTeam, TeamComposition,
};
use crate::error::{Result, SelectionError, XiError};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    /// Stable machine-readable cause (`no_data`, `no_predictor`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);
pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Map a library error onto an HTTP status and JSON body.
pub fn error_response(err: XiError) -> ApiError {
    let (status, reason) = match &err {
        XiError::Selection(e) => (selection_status(e), Some(e.reason())),
        XiError::Validation(_) => (StatusCode::BAD_REQUEST, Some("invalid_request")),
        XiError::NotFound(_) => (StatusCode::NOT_FOUND, Some("not_found")),
        XiError::StoreUnavailable => (StatusCode::SERVICE_UNAVAILABLE, Some("no_store")),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, None),
    };
    if status.is_server_error() {
        warn!(error = %err, status = status.as_u16(), "Request failed");
    }
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
            reason: reason.map(str::to_string),
        }),
    )
}

fn selection_status(err: &SelectionError) -> StatusCode {
    match err {
        SelectionError::NoCandidates { .. } => StatusCode::NOT_FOUND,
        SelectionError::PredictorUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Optional `match_type` parameter, ODI when absent.
pub fn format_or_default(raw: Option<&str>) -> Result<MatchFormat> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_match_format(s),
        None => Ok(MatchFormat::Odi),
    }
}

/// Optional `match_type` parameter, all formats when absent.
pub fn optional_format(raw: Option<&str>) -> Result<Option<MatchFormat>> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_match_format)
        .transpose()
}

pub fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| XiError::Validation(format!("missing required parameter '{name}'")))
}

// ============================================================================
// Query Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    #[serde(alias = "matchType")]
    pub match_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerQuery {
    #[serde(alias = "matchType")]
    pub match_type: Option<String>,
    pub player: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerGroundQuery {
    #[serde(alias = "matchType")]
    pub match_type: Option<String>,
    pub player: Option<String>,
    pub ground: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConditionQuery {
    #[serde(alias = "matchType")]
    pub match_type: Option<String>,
    pub player_name: Option<String>,
    pub opposition: Option<String>,
}

// ============================================================================
// Best XI Types
// ============================================================================

/// Conditions for a Best XI request (JSON body or query string)
#[derive(Debug, Clone, Deserialize)]
pub struct PredictTeamRequest {
    #[serde(alias = "matchType", alias = "format")]
    pub match_type: Option<String>,
    #[serde(alias = "pitchType", alias = "pitch")]
    pub pitch_type: Option<String>,
    pub weather: Option<String>,
    #[serde(alias = "opponent", alias = "opponent_team")]
    pub opposition: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamPlayerResponse {
    pub name: String,
    /// Role in this eleven
    pub role: PlayerRole,
    /// Role from the player's records
    pub player_type: PlayerRole,
    pub bowling_style: BowlingStyle,
    pub predicted_score: f64,
    pub backfilled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionResponse {
    pub wicket_keepers: usize,
    pub batsmen: usize,
    pub all_rounders: usize,
    pub bowlers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bowling_bias: Option<String>,
}

impl From<&TeamComposition> for CompositionResponse {
    fn from(c: &TeamComposition) -> Self {
        Self {
            wicket_keepers: c.keepers,
            batsmen: c.batsmen,
            all_rounders: c.all_rounders,
            bowlers: c.bowlers,
            bowling_bias: c.bowling_bias.map(|b| format!("at least {} {}", b.min, b.style)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamResponse {
    pub match_type: MatchFormat,
    pub opposition: String,
    pub pitch_type: String,
    pub pitch_category: PitchCategory,
    pub weather: String,
    pub composition: CompositionResponse,
    pub players: Vec<TeamPlayerResponse>,
    pub partial: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub shortfalls: Vec<RoleShortfall>,
    pub skipped: Vec<ScoringSkip>,
}

impl From<SelectedTeam> for TeamResponse {
    fn from(team: SelectedTeam) -> Self {
        let pitch_category = team.context.pitch_category();
        let players = team
            .slots
            .into_iter()
            .map(|slot| TeamPlayerResponse {
                role: slot.assigned_role,
                player_type: slot.player.player.role,
                bowling_style: slot.player.player.bowling_style,
                predicted_score: slot.player.predicted_score,
                backfilled: slot.backfilled,
                name: slot.player.player.name,
            })
            .collect();
        Self {
            match_type: team.context.match_format,
            opposition: team.context.opposition,
            pitch_type: team.context.pitch_type,
            pitch_category,
            weather: team.context.weather,
            composition: CompositionResponse::from(&team.composition),
            players,
            partial: team.warning.is_some(),
            warning: team.warning.map(|w| w.to_string()),
            shortfalls: team.shortfalls,
            skipped: team.skipped,
        }
    }
}

// ============================================================================
// Dataset Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub source: String,
    pub records: usize,
    pub formats: Vec<MatchFormat>,
    pub predictor_loaded: bool,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordCreatedResponse {
    pub id: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDeletedResponse {
    pub id: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

// ============================================================================
// Health Check Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub data_source: String,
    pub records: usize,
    pub formats: Vec<MatchFormat>,
    pub predictor_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    pub loaded_at: DateTime<Utc>,
    pub uptime_secs: i64,
}
