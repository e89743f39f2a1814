use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::{ByteRecord, ReaderBuilder};
use tracing::{debug, info, warn};

use super::columns::{decode_cell, ColumnMap, Field, ResolvedColumns};
use super::snapshot::RecordSource;
use crate::config::DataConfig;
use crate::domain::{MatchFormat, PerformanceRecord};
use crate::error::{Result, XiError};

/// Reads one CSV export per match format.
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
    files: Vec<(MatchFormat, PathBuf)>,
    columns: HashMap<MatchFormat, ColumnMap>,
}

impl CsvRecordSource {
    pub fn new(files: Vec<(MatchFormat, PathBuf)>) -> Self {
        let columns = MatchFormat::ALL
            .into_iter()
            .map(|f| (f, ColumnMap::for_format(f)))
            .collect();
        Self { files, columns }
    }

    pub fn from_config(config: &DataConfig) -> Result<Self> {
        let files = MatchFormat::ALL
            .into_iter()
            .filter_map(|f| config.csv_path(f).map(|p| (f, p)))
            .collect();
        let mut source = Self::new(files);
        for map in source.columns.values_mut() {
            *map = map.clone().with_extra(&config.column_aliases)?;
        }
        Ok(source)
    }

    pub fn files(&self) -> &[(MatchFormat, PathBuf)] {
        &self.files
    }

    /// Parse every configured file. A missing file yields no records for its
    /// format; a malformed one is an error.
    pub fn read_all(&self) -> Result<Vec<PerformanceRecord>> {
        let mut records = Vec::new();
        for (format, path) in &self.files {
            if !path.exists() {
                warn!(format = %format, path = %path.display(), "CSV file not found; format has no data");
                continue;
            }
            let columns = self
                .columns
                .get(format)
                .cloned()
                .unwrap_or_else(|| ColumnMap::for_format(*format));
            let parsed = read_file(path, *format, &columns)?;
            info!(format = %format, path = %path.display(), rows = parsed.len(), "Loaded CSV");
            records.extend(parsed);
        }
        Ok(records)
    }
}

/// Parse one export into records of the given format.
pub fn read_file(path: &Path, format: MatchFormat, columns: &ColumnMap) -> Result<Vec<PerformanceRecord>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader.byte_headers()?.iter().map(decode_cell).collect();
    let resolved = columns.resolve(&headers);

    if !resolved.has(Field::PlayerName) {
        return Err(XiError::Validation(format!(
            "{}: no player name column among {:?}",
            path.display(),
            headers
        )));
    }
    let missing = resolved.missing();
    if !missing.is_empty() {
        debug!(path = %path.display(), missing = ?missing, "Columns absent; treated as blank");
    }

    let mut records = Vec::new();
    let mut row = ByteRecord::new();
    while reader.read_byte_record(&mut row)? {
        if let Some(record) = parse_row(&row, format, &resolved) {
            records.push(record);
        }
    }
    Ok(records)
}

fn parse_row(row: &ByteRecord, format: MatchFormat, cols: &ResolvedColumns) -> Option<PerformanceRecord> {
    let name = cols.text(row, Field::PlayerName)?;
    let mut record = PerformanceRecord::new(format, name);
    record.role_text = cols.text(row, Field::Role);
    record.bowling_style = cols.text(row, Field::BowlingStyle);
    record.batting_style = cols.text(row, Field::BattingStyle);
    record.date = cols.date(row, Field::Date);
    record.opposition = cols.text(row, Field::Opposition).unwrap_or_default();
    record.ground = cols.text(row, Field::Ground).unwrap_or_default();
    record.pitch_type = cols.text(row, Field::PitchType).unwrap_or_default();
    record.weather = cols.text(row, Field::Weather).unwrap_or_default();
    record.runs = cols.number(row, Field::Runs);
    record.balls_faced = cols.number(row, Field::BallsFaced);
    record.strike_rate = cols.number(row, Field::StrikeRate);
    record.fours = cols.number(row, Field::Fours);
    record.sixes = cols.number(row, Field::Sixes);
    record.bat_position = match cols.number(row, Field::BatPosition) {
        p if (1.0..=11.0).contains(&p) => Some(p as u8),
        _ => None,
    };
    record.dismissal = cols.text(row, Field::Dismissal);
    record.overs = cols.number(row, Field::Overs);
    record.maidens = cols.number(row, Field::Maidens);
    record.runs_conceded = cols.number(row, Field::RunsConceded);
    record.wickets = cols.number(row, Field::Wickets);
    record.economy = cols.number(row, Field::Economy);
    Some(record)
}

#[async_trait]
impl RecordSource for CsvRecordSource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn load_records(&self) -> Result<Vec<PerformanceRecord>> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.read_all())
            .await
            .map_err(|e| XiError::Internal(format!("CSV loader task failed: {e}")))?
    }
}
