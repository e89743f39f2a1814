use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::PostgresStore;
use crate::config::ModelConfig;
use crate::data::{DataSnapshot, SnapshotStore};
use crate::domain::{MatchContext, MatchFormat, SelectedTeam};
use crate::error::{Result, SelectionError, XiError};
use crate::ml::{load_predictor, PredictorSlot};
use crate::selection::TeamSelector;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Current dataset snapshot and its source
    pub snapshots: Arc<SnapshotStore>,

    /// Loaded score predictor, replaced on reload
    pub predictor: PredictorSlot,

    /// Composition table and roster overrides
    pub selector: Arc<TeamSelector>,

    /// Dataset store (only set when a database is configured)
    pub store: Option<Arc<PostgresStore>>,

    /// Where the predictor is reloaded from
    pub model: Arc<ModelConfig>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        snapshots: Arc<SnapshotStore>,
        predictor: PredictorSlot,
        selector: TeamSelector,
        store: Option<Arc<PostgresStore>>,
        model: ModelConfig,
    ) -> Self {
        Self {
            snapshots,
            predictor,
            selector: Arc::new(selector),
            store,
            model: Arc::new(model),
            start_time: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }

    pub async fn snapshot(&self) -> Arc<DataSnapshot> {
        self.snapshots.current().await
    }

    pub fn require_store(&self) -> Result<&Arc<PostgresStore>> {
        self.store.as_ref().ok_or(XiError::StoreUnavailable)
    }

    /// Best XI for the given conditions against the current snapshot.
    ///
    /// A blank `weather` falls back to the format's most common weather.
    pub async fn select_best_xi(
        &self,
        format: MatchFormat,
        pitch_type: &str,
        weather: &str,
        opposition: &str,
    ) -> std::result::Result<SelectedTeam, SelectionError> {
        let snapshot = self.snapshot().await;
        let weather = match weather.trim() {
            "" => snapshot.default_weather(format),
            w => w.to_string(),
        };
        let context = MatchContext::new(format, pitch_type.trim(), weather, opposition.trim());
        let aggregates = snapshot.get_aggregates(format, self.selector.roster());
        let predictor = self.predictor.current();

        let team = self
            .selector
            .select_best_xi(&aggregates, &context, predictor.as_deref())?;
        if let Some(warning) = &team.warning {
            warn!(format = %format, %warning, "Partial Best XI");
        }
        Ok(team)
    }

    /// Rebuild the snapshot from its source and reload the predictor.
    pub async fn reload(&self) -> Result<Arc<DataSnapshot>> {
        let snapshot = self.snapshots.reload().await?;
        self.predictor.replace(load_predictor(&self.model));
        info!(
            records = snapshot.records().len(),
            predictor_loaded = self.predictor.is_loaded(),
            "Dataset and predictor reloaded"
        );
        Ok(snapshot)
    }

    /// Refresh the snapshot after a write when it is served from the database.
    pub async fn refresh_after_write(&self) {
        if self.store.is_none() || self.snapshots.source_name() != "postgres" {
            return;
        }
        if let Err(e) = self.snapshots.reload().await {
            warn!(error = %e, "Snapshot refresh after write failed");
        }
    }
}
