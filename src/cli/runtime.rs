//! Wiring from configuration to a ready [`AppState`].

use std::sync::Arc;

use tracing::info;

use crate::adapters::PostgresStore;
use crate::api::AppState;
use crate::config::{AppConfig, DataSourceKind};
use crate::data::{CsvRecordSource, RecordSource, SnapshotStore};
use crate::error::{Result, XiError};
use crate::ml::{load_predictor, PredictorSlot};

/// Connect the store (if any), load the first snapshot and the predictor.
pub async fn build_state(config: &AppConfig) -> Result<AppState> {
    let store = match &config.database {
        Some(db) => {
            let store = PostgresStore::new(&db.url, db.max_connections).await?;
            if db.migrate {
                store.migrate().await?;
            }
            Some(Arc::new(store))
        }
        None => None,
    };

    let source: Arc<dyn RecordSource> = match config.data.source {
        DataSourceKind::Csv => Arc::new(CsvRecordSource::from_config(&config.data)?),
        DataSourceKind::Postgres => store.clone().ok_or(XiError::StoreUnavailable)?,
    };
    info!(source = source.name(), "Loading dataset");

    let snapshots = Arc::new(SnapshotStore::load(source).await?);
    let predictor = PredictorSlot::new(load_predictor(&config.model));
    let selector = config.build_selector()?;

    Ok(AppState::new(
        snapshots,
        predictor,
        selector,
        store,
        config.model.clone(),
    ))
}
