//! Per-player aggregation of raw performance records.
//!
//! Records are grouped by player name in first-appearance order, numeric
//! columns are averaged, and role / bowling style come from the first
//! non-blank text seen for the player.

use std::collections::HashMap;

use crate::domain::{
    BowlingStyle, MatchFormat, PerformanceRecord, PlayerAggregate, RosterOverrides,
};

#[derive(Debug, Default)]
struct Accumulator {
    name: String,
    role_text: Option<String>,
    bowling_style_text: Option<String>,
    count: usize,
    runs: f64,
    strike_rate: f64,
    wickets: f64,
    economy: f64,
    fours: f64,
    sixes: f64,
    runs_conceded: f64,
}

impl Accumulator {
    fn push(&mut self, record: &PerformanceRecord) {
        if self.role_text.is_none() {
            self.role_text = non_blank(record.role_text.as_deref());
        }
        if self.bowling_style_text.is_none() {
            self.bowling_style_text = non_blank(record.bowling_style.as_deref());
        }
        self.count += 1;
        self.runs += finite_or_zero(record.runs);
        self.strike_rate += finite_or_zero(record.strike_rate);
        self.wickets += finite_or_zero(record.wickets);
        self.economy += finite_or_zero(record.economy);
        self.fours += finite_or_zero(record.fours);
        self.sixes += finite_or_zero(record.sixes);
        self.runs_conceded += finite_or_zero(record.runs_conceded);
    }

    fn finish(self, format: MatchFormat, roster: &RosterOverrides) -> PlayerAggregate {
        let n = self.count.max(1) as f64;
        let role = roster.resolve(&self.name, self.role_text.as_deref());
        let bowling_style = self
            .bowling_style_text
            .as_deref()
            .map(BowlingStyle::classify)
            .unwrap_or_default();
        PlayerAggregate {
            name: self.name,
            format,
            role,
            role_text: self.role_text,
            bowling_style,
            bowling_style_text: self.bowling_style_text,
            matches: self.count,
            avg_runs: self.runs / n,
            avg_strike_rate: self.strike_rate / n,
            avg_wickets: self.wickets / n,
            avg_economy: self.economy / n,
            avg_fours: self.fours / n,
            avg_sixes: self.sixes / n,
            avg_runs_conceded: self.runs_conceded / n,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("nan"))
        .map(str::to_string)
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Collapse `records` into one aggregate per player for `format`.
///
/// Records of other formats and records with a blank player name are ignored.
pub fn aggregate_players(
    records: &[PerformanceRecord],
    format: MatchFormat,
    roster: &RosterOverrides,
) -> Vec<PlayerAggregate> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Accumulator> = Vec::new();

    for record in records.iter().filter(|r| r.format == format) {
        let name = record.player_name.trim();
        if name.is_empty() {
            continue;
        }
        let slot = *index.entry(name).or_insert_with(|| {
            groups.push(Accumulator {
                name: name.to_string(),
                ..Default::default()
            });
            groups.len() - 1
        });
        groups[slot].push(record);
    }

    groups
        .into_iter()
        .map(|acc| acc.finish(format, roster))
        .collect()
}
