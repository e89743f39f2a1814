use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::aggregation::aggregate_players;
use crate::domain::{MatchFormat, PerformanceRecord, PlayerAggregate, RosterOverrides};
use crate::error::Result;

/// Weather used when a format has no weather data at all.
pub const FALLBACK_WEATHER: &str = "Balanced";

/// Anything that can produce the full set of performance records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    fn name(&self) -> &str;

    async fn load_records(&self) -> Result<Vec<PerformanceRecord>>;
}

/// Immutable view of every loaded record.
#[derive(Debug, Clone)]
pub struct DataSnapshot {
    records: Vec<PerformanceRecord>,
    source: String,
    loaded_at: DateTime<Utc>,
}

impl DataSnapshot {
    pub fn new(source: impl Into<String>, records: Vec<PerformanceRecord>) -> Self {
        Self {
            records,
            source: source.into(),
            loaded_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new("empty", Vec::new())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn records(&self) -> &[PerformanceRecord] {
        &self.records
    }

    pub fn records_for(&self, format: MatchFormat) -> impl Iterator<Item = &PerformanceRecord> {
        self.records.iter().filter(move |r| r.format == format)
    }

    pub fn record_count(&self, format: MatchFormat) -> usize {
        self.records_for(format).count()
    }

    /// Formats that have at least one record, in canonical order.
    pub fn formats(&self) -> Vec<MatchFormat> {
        MatchFormat::ALL
            .into_iter()
            .filter(|f| self.record_count(*f) > 0)
            .collect()
    }

    /// Per-player aggregates for one format; empty when the format has no data.
    pub fn get_aggregates(&self, format: MatchFormat, roster: &RosterOverrides) -> Vec<PlayerAggregate> {
        aggregate_players(&self.records, format, roster)
    }

    pub fn oppositions(&self, format: Option<MatchFormat>) -> Vec<String> {
        self.distinct(format, |r| &r.opposition)
    }

    pub fn pitch_types(&self, format: Option<MatchFormat>) -> Vec<String> {
        self.distinct(format, |r| &r.pitch_type)
    }

    pub fn weather_conditions(&self, format: Option<MatchFormat>) -> Vec<String> {
        self.distinct(format, |r| &r.weather)
    }

    /// Most frequent weather value; ties go to the alphabetically first.
    pub fn default_weather(&self, format: MatchFormat) -> String {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for r in self.records_for(format) {
            let w = r.weather.trim();
            if !w.is_empty() {
                *counts.entry(w).or_default() += 1;
            }
        }
        counts
            .into_iter()
            .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))
            .map(|(w, _)| w.to_string())
            .unwrap_or_else(|| FALLBACK_WEATHER.to_string())
    }

    fn distinct<F>(&self, format: Option<MatchFormat>, field: F) -> Vec<String>
    where
        F: Fn(&PerformanceRecord) -> &String,
    {
        self.records
            .iter()
            .filter(|r| format.map_or(true, |f| r.format == f))
            .map(|r| field(r).trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Holds the current snapshot and swaps in a fresh one on reload.
pub struct SnapshotStore {
    source: Arc<dyn RecordSource>,
    current: RwLock<Arc<DataSnapshot>>,
    /// Held from load to swap so an older load never replaces a newer one.
    reload_lock: Mutex<()>,
}

impl SnapshotStore {
    /// Store starting from an empty snapshot; call [`SnapshotStore::reload`] to fill it.
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(DataSnapshot::empty())),
            reload_lock: Mutex::new(()),
        }
    }

    /// Store with the first snapshot already loaded.
    pub async fn load(source: Arc<dyn RecordSource>) -> Result<Self> {
        let store = Self::new(source);
        store.reload().await?;
        Ok(store)
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub async fn current(&self) -> Arc<DataSnapshot> {
        self.current.read().await.clone()
    }

    /// Build a new snapshot from the source and make it current. On failure
    /// the previous snapshot stays in place. Concurrent reloads run one at a
    /// time, in the order they asked.
    pub async fn reload(&self) -> Result<Arc<DataSnapshot>> {
        let _guard = self.reload_lock.lock().await;
        let records = self.source.load_records().await?;
        let snapshot = Arc::new(DataSnapshot::new(self.source.name(), records));
        info!(
            source = snapshot.source(),
            records = snapshot.records().len(),
            formats = ?snapshot.formats(),
            "Dataset snapshot loaded"
        );
        *self.current.write().await = snapshot.clone();
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XiError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(format: MatchFormat, name: &str, opposition: &str, weather: &str) -> PerformanceRecord {
        let mut r = PerformanceRecord::new(format, name);
        r.opposition = opposition.into();
        r.weather = weather.into();
        r.pitch_type = "Flat".into();
        r
    }

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecordSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        async fn load_records(&self) -> Result<Vec<PerformanceRecord>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n == 2 {
                return Err(XiError::Internal("source down".into()));
            }
            Ok((0..=n)
                .map(|i| record(MatchFormat::Odi, &format!("P{i}"), "India", "Sunny"))
                .collect())
        }
    }

    #[test]
    fn vocabularies_are_sorted_and_filtered() {
        let snap = DataSnapshot::new(
            "test",
            vec![
                record(MatchFormat::Odi, "A", "India", "Sunny"),
                record(MatchFormat::Odi, "B", "Australia", "Cloudy"),
                record(MatchFormat::Odi, "C", "India", "Sunny"),
                record(MatchFormat::T20, "D", "England", ""),
            ],
        );
        assert_eq!(snap.oppositions(Some(MatchFormat::Odi)), vec!["Australia", "India"]);
        assert_eq!(snap.oppositions(None), vec!["Australia", "England", "India"]);
        assert_eq!(snap.weather_conditions(Some(MatchFormat::T20)), Vec::<String>::new());
        assert_eq!(snap.formats(), vec![MatchFormat::Odi, MatchFormat::T20]);
        assert_eq!(snap.default_weather(MatchFormat::Odi), "Sunny");
        assert_eq!(snap.default_weather(MatchFormat::T20), FALLBACK_WEATHER);
        assert!(snap.get_aggregates(MatchFormat::Test, &RosterOverrides::default()).is_empty());
    }

    #[test]
    fn weather_ties_resolve_alphabetically() {
        let snap = DataSnapshot::new(
            "test",
            vec![
                record(MatchFormat::Odi, "A", "India", "Sunny"),
                record(MatchFormat::Odi, "B", "India", "Cloudy"),
            ],
        );
        assert_eq!(snap.default_weather(MatchFormat::Odi), "Cloudy");
    }

    #[tokio::test]
    async fn reload_swaps_and_keeps_previous_on_failure() {
        let store = SnapshotStore::new(Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        }));
        assert!(store.current().await.records().is_empty());

        let first = store.reload().await.unwrap();
        assert_eq!(first.records().len(), 1);

        let held = store.current().await;
        let second = store.reload().await.unwrap();
        assert_eq!(second.records().len(), 2);
        assert_eq!(held.records().len(), 1);

        assert!(store.reload().await.is_err());
        assert_eq!(store.current().await.records().len(), 2);
    }

    /// First load is slow and sees one row; later loads are fast and see two.
    struct SlowFirstSource {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl RecordSource for SlowFirstSource {
        fn name(&self) -> &str {
            "slow-first"
        }

        async fn load_records(&self) -> Result<Vec<PerformanceRecord>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            let rows = if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                1
            } else {
                2
            };
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok((0..rows)
                .map(|i| record(MatchFormat::Odi, &format!("P{i}"), "India", "Sunny"))
                .collect())
        }
    }

    #[tokio::test]
    async fn overlapping_reloads_install_the_latest_load() {
        let source = Arc::new(SlowFirstSource {
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });
        let store = SnapshotStore::new(source.clone());

        let (slow, fast) = tokio::join!(store.reload(), store.reload());
        assert_eq!(slow.unwrap().records().len(), 1);
        assert_eq!(fast.unwrap().records().len(), 2);

        assert_eq!(store.current().await.records().len(), 2);
        assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
    }
}
