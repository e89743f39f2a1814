use serde::Serialize;

use super::{best_of, distinct_sorted, mean, round2, totals_by_opposition};
use crate::data::DataSnapshot;
use crate::domain::{MatchFormat, PerformanceRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlingReport {
    pub player: String,
    pub ground: String,
    pub matches: usize,
    pub wickets: f64,
    pub runs_conceded: f64,
    pub economy: f64,
    /// Runs conceded per wicket.
    pub average: Option<f64>,
    pub best_opposition: Option<String>,
}

fn spells<'a>(snapshot: &'a DataSnapshot, format: MatchFormat) -> impl Iterator<Item = &'a PerformanceRecord> {
    snapshot.records_for(format).filter(|r| r.wickets > 0.0)
}

/// Conceded runs, estimated from economy and overs when the column is empty.
fn conceded(r: &PerformanceRecord) -> f64 {
    if r.runs_conceded > 0.0 {
        r.runs_conceded
    } else {
        (r.economy * r.overs).round()
    }
}

/// Players with at least one wicket.
pub fn bowling_players(snapshot: &DataSnapshot, format: MatchFormat) -> Vec<String> {
    distinct_sorted(spells(snapshot, format).map(|r| r.player_name.as_str()))
}

pub fn bowling_grounds(snapshot: &DataSnapshot, format: MatchFormat, player: &str) -> Vec<String> {
    distinct_sorted(
        spells(snapshot, format)
            .filter(|r| r.player_name == player)
            .map(|r| r.ground.as_str()),
    )
}

pub fn bowling_report(
    snapshot: &DataSnapshot,
    format: MatchFormat,
    player: &str,
    ground: &str,
) -> Option<BowlingReport> {
    let rows: Vec<&PerformanceRecord> = spells(snapshot, format)
        .filter(|r| r.player_name == player && r.ground == ground)
        .collect();
    if rows.is_empty() {
        return None;
    }

    let wickets: f64 = rows.iter().map(|r| r.wickets).sum();
    let runs_conceded: f64 = rows.iter().map(|r| conceded(r)).sum();

    Some(BowlingReport {
        player: player.to_string(),
        ground: ground.to_string(),
        matches: rows.len(),
        wickets,
        runs_conceded,
        economy: round2(mean(rows.iter().map(|r| r.economy))),
        average: (wickets > 0.0).then(|| round2(runs_conceded / wickets)),
        best_opposition: best_of(&totals_by_opposition(&rows, |r| r.wickets)).map(str::to_string),
    })
}
