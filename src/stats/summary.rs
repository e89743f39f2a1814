use std::collections::HashMap;

use serde::Serialize;

use crate::data::DataSnapshot;
use crate::domain::PerformanceRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leader {
    pub name: String,
    pub total: f64,
}

/// Headline numbers across every loaded format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomepageSummary {
    pub total_runs: f64,
    pub total_wickets: f64,
    pub top_scorer: Option<Leader>,
    pub top_wicket_taker: Option<Leader>,
}

fn leader<F>(records: &[PerformanceRecord], value: F) -> Option<Leader>
where
    F: Fn(&PerformanceRecord) -> f64,
{
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for r in records {
        let name = r.player_name.trim();
        if name.is_empty() {
            continue;
        }
        let total = totals.entry(name).or_insert_with(|| {
            order.push(name);
            0.0
        });
        *total += value(r);
    }
    order
        .into_iter()
        .map(|name| (name, totals[name]))
        .filter(|(_, total)| *total > 0.0)
        .fold(None::<(&str, f64)>, |best, (name, total)| match best {
            Some((_, b)) if b >= total => best,
            _ => Some((name, total)),
        })
        .map(|(name, total)| Leader {
            name: name.to_string(),
            total,
        })
}

pub fn homepage_summary(snapshot: &DataSnapshot) -> HomepageSummary {
    let records = snapshot.records();
    HomepageSummary {
        total_runs: records.iter().map(|r| r.runs).sum(),
        total_wickets: records.iter().map(|r| r.wickets).sum(),
        top_scorer: leader(records, |r| r.runs),
        top_wicket_taker: leader(records, |r| r.wickets),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MatchFormat;

    fn record(format: MatchFormat, name: &str, runs: f64, wickets: f64) -> PerformanceRecord {
        let mut r = PerformanceRecord::new(format, name);
        r.runs = runs;
        r.wickets = wickets;
        r
    }

    #[test]
    fn totals_and_leaders_span_formats() {
        let snap = DataSnapshot::new(
            "test",
            vec![
                record(MatchFormat::Odi, "Pathum Nissanka", 80.0, 0.0),
                record(MatchFormat::T20, "Kusal Mendis", 50.0, 0.0),
                record(MatchFormat::Test, "Kusal Mendis", 45.0, 0.0),
                record(MatchFormat::Odi, "Maheesh Theekshana", 2.0, 3.0),
            ],
        );
        let summary = homepage_summary(&snap);
        assert_eq!(summary.total_runs, 177.0);
        assert_eq!(summary.total_wickets, 3.0);
        assert_eq!(
            summary.top_scorer,
            Some(Leader {
                name: "Kusal Mendis".into(),
                total: 95.0
            })
        );
        assert_eq!(summary.top_wicket_taker.map(|l| l.name), Some("Maheesh Theekshana".to_string()));
    }

    #[test]
    fn empty_snapshot_has_no_leaders() {
        let summary = homepage_summary(&DataSnapshot::empty());
        assert_eq!(summary.total_runs, 0.0);
        assert!(summary.top_scorer.is_none());
        assert!(summary.top_wicket_taker.is_none());
    }
}
