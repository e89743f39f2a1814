use serde::Serialize;

use super::{best_of, distinct_sorted, mean, mode, round2, totals_by_opposition};
use crate::data::DataSnapshot;
use crate::domain::{MatchFormat, PerformanceRecord};

/// A player's batting at one ground.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattingReport {
    pub player: String,
    pub ground: String,
    pub matches: usize,
    pub total_runs: f64,
    pub total_fours: f64,
    pub total_sixes: f64,
    pub strike_rate: f64,
    /// Runs per dismissal; `None` when never dismissed.
    pub average: Option<f64>,
    pub best_opposition: Option<String>,
    pub most_frequent_dismissal: Option<String>,
    pub recommended_position: Option<u8>,
}

/// Runs per opposition, highest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OppositionChart {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

fn innings<'a>(snapshot: &'a DataSnapshot, format: MatchFormat) -> impl Iterator<Item = &'a PerformanceRecord> {
    snapshot.records_for(format).filter(|r| r.runs > 0.0)
}

fn innings_at<'a>(
    snapshot: &'a DataSnapshot,
    format: MatchFormat,
    player: &str,
    ground: &str,
) -> Vec<&'a PerformanceRecord> {
    innings(snapshot, format)
        .filter(|r| r.player_name == player && r.ground == ground)
        .collect()
}

/// Players with at least one scoring innings.
pub fn batting_players(snapshot: &DataSnapshot, format: MatchFormat) -> Vec<String> {
    distinct_sorted(innings(snapshot, format).map(|r| r.player_name.as_str()))
}

pub fn batting_grounds(snapshot: &DataSnapshot, format: MatchFormat, player: &str) -> Vec<String> {
    distinct_sorted(
        innings(snapshot, format)
            .filter(|r| r.player_name == player)
            .map(|r| r.ground.as_str()),
    )
}

pub fn batting_report(
    snapshot: &DataSnapshot,
    format: MatchFormat,
    player: &str,
    ground: &str,
) -> Option<BattingReport> {
    let rows = innings_at(snapshot, format, player, ground);
    if rows.is_empty() {
        return None;
    }

    let total_runs: f64 = rows.iter().map(|r| r.runs).sum();
    let dismissals = rows.iter().filter(|r| r.was_dismissed()).count();
    let average = (dismissals > 0).then(|| round2(total_runs / dismissals as f64));

    Some(BattingReport {
        player: player.to_string(),
        ground: ground.to_string(),
        matches: rows.len(),
        total_runs,
        total_fours: rows.iter().map(|r| r.fours).sum(),
        total_sixes: rows.iter().map(|r| r.sixes).sum(),
        strike_rate: round2(mean(rows.iter().map(|r| r.strike_rate))),
        average,
        best_opposition: best_of(&totals_by_opposition(&rows, |r| r.runs)).map(str::to_string),
        most_frequent_dismissal: mode(
            rows.iter()
                .filter(|r| r.was_dismissed())
                .filter_map(|r| r.dismissal.as_deref().map(str::trim)),
        )
        .map(str::to_string),
        recommended_position: mode(rows.iter().filter_map(|r| r.bat_position)),
    })
}

pub fn batting_chart(snapshot: &DataSnapshot, format: MatchFormat, player: &str, ground: &str) -> OppositionChart {
    let rows = innings_at(snapshot, format, player, ground);
    let mut totals = totals_by_opposition(&rows, |r| r.runs);
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    OppositionChart {
        labels: totals.iter().map(|(k, _)| k.to_string()).collect(),
        data: totals.iter().map(|(_, v)| *v).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, ground: &str, opp: &str, runs: f64, dismissal: &str, pos: u8) -> PerformanceRecord {
        let mut r = PerformanceRecord::new(MatchFormat::Odi, name);
        r.ground = ground.into();
        r.opposition = opp.into();
        r.runs = runs;
        r.strike_rate = runs * 1.5;
        r.fours = 2.0;
        r.sixes = 1.0;
        r.dismissal = Some(dismissal.into());
        r.bat_position = Some(pos);
        r
    }

    fn snapshot() -> DataSnapshot {
        let mut duck = row("Kusal Mendis", "Colombo", "India", 0.0, "Bowled", 3);
        duck.strike_rate = 0.0;
        DataSnapshot::new(
            "test",
            vec![
                row("Kusal Mendis", "Colombo", "India", 40.0, "Caught", 3),
                row("Kusal Mendis", "Colombo", "Australia", 60.0, "Not Out", 4),
                row("Kusal Mendis", "Colombo", "India", 30.0, "Caught", 3),
                row("Kusal Mendis", "Kandy", "India", 12.0, "LBW", 3),
                duck,
                row("Pathum Nissanka", "Colombo", "India", 5.0, "Not Out", 1),
            ],
        )
    }

    #[test]
    fn players_and_grounds_need_runs() {
        let snap = snapshot();
        assert_eq!(batting_players(&snap, MatchFormat::Odi), vec!["Kusal Mendis", "Pathum Nissanka"]);
        assert_eq!(batting_grounds(&snap, MatchFormat::Odi, "Kusal Mendis"), vec!["Colombo", "Kandy"]);
        assert!(batting_players(&snap, MatchFormat::T20).is_empty());
    }

    #[test]
    fn report_aggregates_one_ground() {
        let report = batting_report(&snapshot(), MatchFormat::Odi, "Kusal Mendis", "Colombo").unwrap();
        assert_eq!(report.matches, 3);
        assert_eq!(report.total_runs, 130.0);
        assert_eq!(report.total_fours, 6.0);
        assert_eq!(report.average, Some(65.0));
        assert_eq!(report.best_opposition.as_deref(), Some("India"));
        assert_eq!(report.most_frequent_dismissal.as_deref(), Some("Caught"));
        assert_eq!(report.recommended_position, Some(3));
        assert_eq!(report.strike_rate, 65.0);
    }

    #[test]
    fn never_dismissed_has_no_average() {
        let report = batting_report(&snapshot(), MatchFormat::Odi, "Pathum Nissanka", "Colombo").unwrap();
        assert_eq!(report.average, None);
        assert_eq!(report.most_frequent_dismissal, None);
        assert!(batting_report(&snapshot(), MatchFormat::Odi, "Nobody", "Colombo").is_none());
    }

    #[test]
    fn chart_orders_by_runs() {
        let chart = batting_chart(&snapshot(), MatchFormat::Odi, "Kusal Mendis", "Colombo");
        assert_eq!(chart.labels, vec!["India", "Australia"]);
        assert_eq!(chart.data, vec![70.0, 60.0]);
    }
}
