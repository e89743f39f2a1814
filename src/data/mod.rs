//! Performance record sources and the in-memory dataset snapshot.

pub mod columns;
pub mod csv_source;
pub mod snapshot;

pub use columns::{ColumnMap, Field};
pub use csv_source::CsvRecordSource;
pub use snapshot::{DataSnapshot, RecordSource, SnapshotStore, FALLBACK_WEATHER};
