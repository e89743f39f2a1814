//! Score predictor contract and the hot-swappable slot the API holds it in.

use std::sync::{Arc, RwLock};

use crate::domain::{MatchContext, PlayerAggregate};
use crate::error::PredictError;

/// Maps a player's aggregated features plus match conditions to a score.
///
/// Per-player rejections must come back as [`PredictError::InvalidFeature`];
/// [`PredictError::Unavailable`] aborts the whole selection.
#[cfg_attr(test, mockall::automock)]
pub trait ScorePredictor: Send + Sync {
    fn predict(
        &self,
        player: &PlayerAggregate,
        context: &MatchContext,
    ) -> Result<f64, PredictError>;
}

/// Holder for the currently loaded predictor, if any.
#[derive(Clone, Default)]
pub struct PredictorSlot {
    inner: Arc<RwLock<Option<Arc<dyn ScorePredictor>>>>,
}

impl PredictorSlot {
    pub fn new(predictor: Option<Arc<dyn ScorePredictor>>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(predictor)),
        }
    }

    pub fn current(&self) -> Option<Arc<dyn ScorePredictor>> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn replace(&self, predictor: Option<Arc<dyn ScorePredictor>>) {
        match self.inner.write() {
            Ok(mut guard) => *guard = predictor,
            Err(poisoned) => *poisoned.into_inner() = predictor,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }
}

impl std::fmt::Debug for PredictorSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictorSlot")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
