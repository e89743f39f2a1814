//! Header aliasing for the per-format CSV exports.
//!
//! Each export names the same quantities differently (`Batting_Runs` in ODI,
//! `Runs_Scored` in T20, `Wicket_taken` vs `Wickets`). A [`ColumnMap`] lists
//! the accepted headers per canonical [`Field`] in priority order and resolves
//! them against a file's header row once.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::ByteRecord;

use crate::domain::MatchFormat;
use crate::error::{Result, XiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PlayerName,
    Role,
    BowlingStyle,
    BattingStyle,
    Date,
    Opposition,
    Ground,
    PitchType,
    Weather,
    Runs,
    BallsFaced,
    StrikeRate,
    Fours,
    Sixes,
    BatPosition,
    Dismissal,
    Overs,
    Maidens,
    RunsConceded,
    Wickets,
    Economy,
}

impl Field {
    pub const ALL: [Field; 21] = [
        Field::PlayerName,
        Field::Role,
        Field::BowlingStyle,
        Field::BattingStyle,
        Field::Date,
        Field::Opposition,
        Field::Ground,
        Field::PitchType,
        Field::Weather,
        Field::Runs,
        Field::BallsFaced,
        Field::StrikeRate,
        Field::Fours,
        Field::Sixes,
        Field::BatPosition,
        Field::Dismissal,
        Field::Overs,
        Field::Maidens,
        Field::RunsConceded,
        Field::Wickets,
        Field::Economy,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Field::PlayerName => "player_name",
            Field::Role => "role",
            Field::BowlingStyle => "bowling_style",
            Field::BattingStyle => "batting_style",
            Field::Date => "date",
            Field::Opposition => "opposition",
            Field::Ground => "ground",
            Field::PitchType => "pitch_type",
            Field::Weather => "weather",
            Field::Runs => "runs",
            Field::BallsFaced => "balls_faced",
            Field::StrikeRate => "strike_rate",
            Field::Fours => "fours",
            Field::Sixes => "sixes",
            Field::BatPosition => "bat_position",
            Field::Dismissal => "dismissal",
            Field::Overs => "overs",
            Field::Maidens => "maidens",
            Field::RunsConceded => "runs_conceded",
            Field::Wickets => "wickets",
            Field::Economy => "economy",
        }
    }

    fn base_aliases(&self) -> &'static [&'static str] {
        match self {
            Field::PlayerName => &["player_name", "name"],
            Field::Role => &["main_role", "role", "player_type"],
            Field::BowlingStyle => &["bowling_style", "bowling_action"],
            Field::BattingStyle => &["batting_style"],
            Field::Date => &["date", "match_date"],
            Field::Opposition => &["opposition", "opponent_team", "opponent"],
            Field::Ground => &["ground", "venue"],
            Field::PitchType => &["pitch_type", "pitch"],
            Field::Weather => &["weather"],
            Field::Runs => &["runs"],
            Field::BallsFaced => &["balls_faced", "bf", "balls"],
            Field::StrikeRate => &["strike_rate", "sr"],
            Field::Fours => &["fours", "4s"],
            Field::Sixes => &["sixes", "6s"],
            Field::BatPosition => &["bat_position", "pos_bat", "pos"],
            Field::Dismissal => &["dismissal"],
            Field::Overs => &["overs"],
            Field::Maidens => &["maidens", "mdns"],
            Field::RunsConceded => &["runs_conceded"],
            Field::Wickets => &["wickets", "wkts", "wicket_taken"],
            Field::Economy => &["economy", "econ"],
        }
    }
}

impl FromStr for Field {
    type Err = &'static str;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = normalize_header(s);
        Field::ALL
            .into_iter()
            .find(|f| normalize_header(f.key()) == wanted)
            .ok_or("unknown column field")
    }
}

/// Lowercase and drop everything that is not alphanumeric, so `"Player Name"`,
/// `"Player_Name"` and `"\"player name\""` compare equal.
pub fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Accepted header aliases per field for one format.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    aliases: HashMap<Field, Vec<String>>,
}

impl ColumnMap {
    pub fn for_format(format: MatchFormat) -> Self {
        let mut aliases: HashMap<Field, Vec<String>> = Field::ALL
            .into_iter()
            .map(|f| (f, f.base_aliases().iter().map(|a| normalize_header(a)).collect()))
            .collect();

        // Format-specific exports take precedence over the generic names.
        let specific: Vec<(Field, &[&str])> = match format {
            MatchFormat::Odi => vec![
                (Field::Runs, &["batting_runs"][..]),
                (Field::Wickets, &["wicket_taken"][..]),
            ],
            MatchFormat::T20 | MatchFormat::Test => vec![(Field::Runs, &["runs_scored"][..])],
        };
        for (field, extra) in &specific {
            if let Some(list) = aliases.get_mut(field) {
                for (i, alias) in extra.iter().enumerate() {
                    list.insert(i, normalize_header(alias));
                }
            }
        }
        aliases
            .values_mut()
            .for_each(|list| dedup_preserving_order(list));

        Self { aliases }
    }

    /// Add configured aliases ahead of the built-in ones.
    pub fn with_extra(mut self, extra: &HashMap<String, Vec<String>>) -> Result<Self> {
        for (key, names) in extra {
            let field = Field::from_str(key)
                .map_err(|_| XiError::Validation(format!("unknown column field '{key}'")))?;
            let list = self.aliases.entry(field).or_default();
            for (i, name) in names.iter().enumerate() {
                list.insert(i, normalize_header(name));
            }
            dedup_preserving_order(list);
        }
        Ok(self)
    }

    pub fn aliases(&self, field: Field) -> &[String] {
        self.aliases.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Match this map against a header row.
    pub fn resolve(&self, headers: &[String]) -> ResolvedColumns {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let mut index = HashMap::new();
        for field in Field::ALL {
            let hit = self
                .aliases(field)
                .iter()
                .find_map(|alias| normalized.iter().position(|h| h == alias));
            if let Some(i) = hit {
                index.insert(field, i);
            }
        }
        ResolvedColumns { index }
    }
}

fn dedup_preserving_order(list: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    list.retain(|a| seen.insert(a.clone()));
}

/// Field positions for one file.
#[derive(Debug, Clone, Default)]
pub struct ResolvedColumns {
    index: HashMap<Field, usize>,
}

impl ResolvedColumns {
    pub fn has(&self, field: Field) -> bool {
        self.index.contains_key(&field)
    }

    pub fn missing(&self) -> Vec<Field> {
        Field::ALL.into_iter().filter(|f| !self.has(*f)).collect()
    }

    /// Trimmed cell text; blank and `nan` cells are absent.
    pub fn text(&self, row: &ByteRecord, field: Field) -> Option<String> {
        let raw = self.index.get(&field).and_then(|&i| row.get(i))?;
        let text = decode_cell(raw);
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Numeric cell; anything unparseable or non-finite reads as zero.
    pub fn number(&self, row: &ByteRecord, field: Field) -> f64 {
        self.text(row, field)
            .and_then(|t| t.replace(',', "").trim_end_matches('*').parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    pub fn date(&self, row: &ByteRecord, field: Field) -> Option<NaiveDate> {
        let text = self.text(row, field)?;
        ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d %b %Y"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(&text, fmt).ok())
    }
}

/// UTF-8 when valid, otherwise Latin-1 (one byte per char).
pub fn decode_cell(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(s) => s.to_string(),
        Err(_) => raw.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalizes_separators_and_case() {
        assert_eq!(normalize_header("Player Name"), "playername");
        assert_eq!(normalize_header("\"Player_Name\" "), "playername");
        assert_eq!(normalize_header("4s"), "4s");
    }

    #[test]
    fn odi_prefers_batting_runs_over_conceded() {
        let map = ColumnMap::for_format(MatchFormat::Odi);
        let cols = map.resolve(&headers(&["Player_Name", "Runs_Conceded", "Batting_Runs", "Wicket_taken"]));
        let row = ByteRecord::from(vec!["Kusal", "41", "77", "2"]);
        assert_eq!(cols.number(&row, Field::Runs), 77.0);
        assert_eq!(cols.number(&row, Field::RunsConceded), 41.0);
        assert_eq!(cols.number(&row, Field::Wickets), 2.0);
    }

    #[test]
    fn test_export_reads_bowling_action() {
        let map = ColumnMap::for_format(MatchFormat::Test);
        let cols = map.resolve(&headers(&["Player_Name", "Player_Type", "Bowling_Action", "Wickets"]));
        let row = ByteRecord::from(vec!["Prabath", "Bowler", "Slow left-arm orthodox spin", "5"]);
        assert!(cols.has(Field::BowlingStyle));
        assert_eq!(
            cols.text(&row, Field::BowlingStyle).as_deref(),
            Some("Slow left-arm orthodox spin")
        );
        assert_eq!(cols.text(&row, Field::Role).as_deref(), Some("Bowler"));
    }

    #[test]
    fn t20_reads_runs_scored() {
        let map = ColumnMap::for_format(MatchFormat::T20);
        let cols = map.resolve(&headers(&["Player Name", "Runs_Scored", "SR", "4s", "Econ"]));
        let row = ByteRecord::from(vec!["Pathum", "55", "137.5", "6", "nan"]);
        assert_eq!(cols.number(&row, Field::Runs), 55.0);
        assert_eq!(cols.number(&row, Field::StrikeRate), 137.5);
        assert_eq!(cols.number(&row, Field::Fours), 6.0);
        assert_eq!(cols.number(&row, Field::Economy), 0.0);
        assert!(cols.missing().contains(&Field::Ground));
    }

    #[test]
    fn garbage_numbers_read_as_zero_and_latin1_decodes() {
        let cols = ColumnMap::for_format(MatchFormat::Test).resolve(&headers(&["Name", "Runs", "Ground"]));
        let row = ByteRecord::from(vec![&b"Player"[..], &b"DNB"[..], &b"Kandy \xe9"[..]]);
        assert_eq!(cols.number(&row, Field::Runs), 0.0);
        assert_eq!(cols.text(&row, Field::Ground).as_deref(), Some("Kandy é"));
    }

    #[test]
    fn configured_aliases_win_and_unknown_fields_fail() {
        let extra = HashMap::from([("runs".to_string(), vec!["Total Runs".to_string()])]);
        let map = ColumnMap::for_format(MatchFormat::Odi).with_extra(&extra).unwrap();
        let cols = map.resolve(&headers(&["Name", "Batting_Runs", "Total_Runs"]));
        let row = ByteRecord::from(vec!["X", "10", "99"]);
        assert_eq!(cols.number(&row, Field::Runs), 99.0);

        let bad = HashMap::from([("nonsense".to_string(), vec!["x".to_string()])]);
        assert!(ColumnMap::for_format(MatchFormat::Odi).with_extra(&bad).is_err());
    }

    #[test]
    fn parses_common_date_layouts() {
        let cols = ColumnMap::for_format(MatchFormat::Odi).resolve(&headers(&["Date"]));
        let iso = ByteRecord::from(vec!["2023-07-02"]);
        let dmy = ByteRecord::from(vec!["02/07/2023"]);
        let expected = NaiveDate::from_ymd_opt(2023, 7, 2);
        assert_eq!(cols.date(&iso, Field::Date), expected);
        assert_eq!(cols.date(&dmy, Field::Date), expected);
    }
}
