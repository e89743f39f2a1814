use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BowlingStyle, MatchFormat, PlayerRole};

/// One player's performance in one match, with format-specific column names
/// already collapsed. Missing numeric cells are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(alias = "match_type")]
    pub format: MatchFormat,
    pub player_name: String,
    #[serde(default, alias = "main_role")]
    pub role_text: Option<String>,
    #[serde(default)]
    pub bowling_style: Option<String>,
    #[serde(default)]
    pub batting_style: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub opposition: String,
    #[serde(default)]
    pub ground: String,
    #[serde(default)]
    pub pitch_type: String,
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub runs: f64,
    #[serde(default)]
    pub balls_faced: f64,
    #[serde(default)]
    pub strike_rate: f64,
    #[serde(default)]
    pub fours: f64,
    #[serde(default)]
    pub sixes: f64,
    #[serde(default)]
    pub bat_position: Option<u8>,
    #[serde(default)]
    pub dismissal: Option<String>,
    #[serde(default)]
    pub overs: f64,
    #[serde(default)]
    pub maidens: f64,
    #[serde(default)]
    pub runs_conceded: f64,
    #[serde(default)]
    pub wickets: f64,
    #[serde(default)]
    pub economy: f64,
}

impl PerformanceRecord {
    pub fn new(format: MatchFormat, player_name: impl Into<String>) -> Self {
        Self {
            id: None,
            format,
            player_name: player_name.into(),
            role_text: None,
            bowling_style: None,
            batting_style: None,
            date: None,
            opposition: String::new(),
            ground: String::new(),
            pitch_type: String::new(),
            weather: String::new(),
            runs: 0.0,
            balls_faced: 0.0,
            strike_rate: 0.0,
            fours: 0.0,
            sixes: 0.0,
            bat_position: None,
            dismissal: None,
            overs: 0.0,
            maidens: 0.0,
            runs_conceded: 0.0,
            wickets: 0.0,
            economy: 0.0,
        }
    }

    /// Dismissed in this innings (anything other than blank / not out / dnb).
    pub fn was_dismissed(&self) -> bool {
        match self.dismissal.as_deref().map(|d| d.trim().to_lowercase()) {
            None => false,
            Some(d) => !(d.is_empty() || d == "not out" || d == "dnb" || d == "-"),
        }
    }
}

/// One row per player for a format scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAggregate {
    pub name: String,
    pub format: MatchFormat,
    pub role: PlayerRole,
    pub role_text: Option<String>,
    pub bowling_style: BowlingStyle,
    pub bowling_style_text: Option<String>,
    pub matches: usize,
    pub avg_runs: f64,
    pub avg_strike_rate: f64,
    pub avg_wickets: f64,
    pub avg_economy: f64,
    pub avg_fours: f64,
    pub avg_sixes: f64,
    pub avg_runs_conceded: f64,
}

/// Conditions a team is picked for. Built per request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchContext {
    pub opposition: String,
    pub pitch_type: String,
    pub weather: String,
    pub match_format: MatchFormat,
}

impl MatchContext {
    pub fn new(
        match_format: MatchFormat,
        pitch_type: impl Into<String>,
        weather: impl Into<String>,
        opposition: impl Into<String>,
    ) -> Self {
        Self {
            opposition: opposition.into(),
            pitch_type: pitch_type.into(),
            weather: weather.into(),
            match_format,
        }
    }

    pub fn pitch_category(&self) -> super::PitchCategory {
        super::PitchCategory::classify(&self.pitch_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPlayer {
    pub player: PlayerAggregate,
    pub predicted_score: f64,
}

impl ScoredPlayer {
    pub fn name(&self) -> &str {
        &self.player.name
    }

    pub fn role(&self) -> PlayerRole {
        self.player.role
    }
}
