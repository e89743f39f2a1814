use thiserror::Error;

use crate::domain::MatchFormat;

/// Main error type for the cricket backend
#[derive(Error, Debug)]
pub enum XiError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Dataset store not configured")]
    StoreUnavailable,

    // Ingestion errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Selection errors
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Not found: {0}")]
    NotFound(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for XiError
pub type Result<T> = std::result::Result<T, XiError>;

/// Request-fatal outcomes of a Best XI selection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("No players available for format {format}")]
    NoCandidates { format: MatchFormat },

    #[error("Score predictor unavailable: {0}")]
    PredictorUnavailable(String),
}

impl SelectionError {
    /// Stable machine-readable reason for API consumers.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NoCandidates { .. } => "no_data",
            Self::PredictorUnavailable(_) => "no_predictor",
        }
    }
}

/// Failure reported by a score predictor
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// The player's features were rejected; only this player is dropped.
    #[error("Invalid feature: {0}")]
    InvalidFeature(String),

    /// The predictor cannot serve any request.
    #[error("Predictor unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_reasons_are_distinct() {
        let no_data = SelectionError::NoCandidates {
            format: MatchFormat::T20,
        };
        let no_model = SelectionError::PredictorUnavailable("not loaded".into());
        assert_eq!(no_data.reason(), "no_data");
        assert_eq!(no_model.reason(), "no_predictor");
        assert_eq!(no_data.to_string(), "No players available for format T20");
    }

    #[test]
    fn selection_error_converts_into_crate_error() {
        let err: XiError = SelectionError::PredictorUnavailable("x".into()).into();
        assert!(matches!(err, XiError::Selection(_)));
    }
}
