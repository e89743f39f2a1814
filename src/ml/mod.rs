//! Score predictors (deploy-safe, CPU-only inference).

pub mod dense;
pub mod heuristic;
pub mod predictor;

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

pub use dense::{Activation, DenseLayer, DenseScoreModel, ScoreNetwork};
pub use heuristic::HeuristicPredictor;
#[cfg(test)]
pub use predictor::MockScorePredictor;
pub use predictor::{PredictorSlot, ScorePredictor};

use crate::config::ModelConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PredictorKind {
    #[default]
    Dense,
    Heuristic,
}

/// Build the configured predictor. A dense model that cannot be loaded leaves
/// the slot empty so requests report the predictor as unavailable.
pub fn load_predictor(config: &ModelConfig) -> Option<Arc<dyn ScorePredictor>> {
    match config.kind {
        PredictorKind::Heuristic => {
            info!("Using heuristic score predictor");
            Some(Arc::new(HeuristicPredictor::default()))
        }
        PredictorKind::Dense => {
            let Some(path) = config.path.as_ref() else {
                warn!("model.kind = dense but model.path is not set; predictor unavailable");
                return None;
            };
            match DenseScoreModel::from_file(path) {
                Ok(model) => {
                    info!(path = %path.display(), inputs = model.input_dim(), "Score model loaded");
                    Some(Arc::new(model))
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Score model not loaded");
                    None
                }
            }
        }
    }
}
