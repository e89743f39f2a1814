//! Descriptive batting / bowling statistics over a dataset snapshot.

pub mod batting;
pub mod bowling;
pub mod summary;

use std::collections::{BTreeSet, HashMap};

pub use batting::{batting_chart, batting_grounds, batting_players, batting_report, BattingReport, OppositionChart};
pub use bowling::{bowling_grounds, bowling_players, bowling_report, BowlingReport};
pub use summary::{homepage_summary, HomepageSummary, Leader};

use crate::domain::PerformanceRecord;

fn distinct_sorted<'a, I>(values: I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sum `value` per opposition, keeping first-seen order.
fn totals_by_opposition<'a, F>(records: &[&'a PerformanceRecord], value: F) -> Vec<(&'a str, f64)>
where
    F: Fn(&PerformanceRecord) -> f64,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, f64)> = Vec::new();
    for r in records {
        let key = r.opposition.trim();
        let slot = *index.entry(key).or_insert_with(|| {
            totals.push((key, 0.0));
            totals.len() - 1
        });
        totals[slot].1 += value(r);
    }
    totals
}

/// Highest total; the first seen wins a tie.
fn best_of<'a>(totals: &[(&'a str, f64)]) -> Option<&'a str> {
    totals
        .iter()
        .fold(None::<(&str, f64)>, |best, &(k, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((k, v)),
        })
        .map(|(k, _)| k)
}

/// Most frequent value; the first seen wins a tie.
fn mode<T, I>(values: I) -> Option<T>
where
    T: Eq + std::hash::Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (i, v) in values.into_iter().enumerate() {
        counts.entry(v).or_insert((0, i)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, fa)), (_, (cb, fb))| ca.cmp(cb).then(fb.cmp(fa)))
        .map(|(v, _)| v)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_prefers_first_seen_on_tie() {
        assert_eq!(mode(vec!["b", "a", "a", "b"]), Some("b"));
        assert_eq!(mode(vec![3, 4, 4]), Some(4));
        assert_eq!(mode(Vec::<u8>::new()), None);
    }

    #[test]
    fn best_of_keeps_first_on_tie() {
        assert_eq!(best_of(&[("India", 50.0), ("England", 50.0)]), Some("India"));
        assert_eq!(best_of(&[("India", 10.0), ("England", 50.0)]), Some("England"));
        assert_eq!(best_of(&[]), None);
    }
}
