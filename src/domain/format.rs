use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, XiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchFormat {
    #[serde(rename = "ODI", alias = "odi")]
    Odi,
    #[serde(rename = "T20", alias = "t20")]
    T20,
    #[serde(rename = "Test", alias = "TEST", alias = "test")]
    Test,
}

impl MatchFormat {
    pub const ALL: [MatchFormat; 3] = [MatchFormat::Odi, MatchFormat::T20, MatchFormat::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Odi => "ODI",
            Self::T20 => "T20",
            Self::Test => "Test",
        }
    }
}

impl std::fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchFormat {
    type Err = &'static str;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "odi" => Ok(Self::Odi),
            "t20" | "t20i" => Ok(Self::T20),
            "test" => Ok(Self::Test),
            _ => Err("invalid match format; expected ODI|T20|Test"),
        }
    }
}

pub fn parse_match_format(raw: &str) -> Result<MatchFormat> {
    MatchFormat::from_str(raw).map_err(|e| XiError::Validation(format!("{e} (got '{raw}')")))
}

/// Normalized bucket of a free-text pitch description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchCategory {
    BattingFriendly,
    SpinFriendly,
    BowlingFriendly,
    Balanced,
}

impl PitchCategory {
    pub const ALL: [PitchCategory; 4] = [
        PitchCategory::BattingFriendly,
        PitchCategory::SpinFriendly,
        PitchCategory::BowlingFriendly,
        PitchCategory::Balanced,
    ];

    /// Keyword classification. Batting is checked before spin, spin before seam.
    pub fn classify(pitch_type: &str) -> Self {
        let pitch = pitch_type.to_lowercase();
        if ["batting", "flat"].iter().any(|k| pitch.contains(k)) {
            Self::BattingFriendly
        } else if ["spin", "dusty", "turn"].iter().any(|k| pitch.contains(k)) {
            Self::SpinFriendly
        } else if ["bowling", "pace", "green", "seam", "bounc"]
            .iter()
            .any(|k| pitch.contains(k))
        {
            Self::BowlingFriendly
        } else {
            Self::Balanced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BattingFriendly => "batting_friendly",
            Self::SpinFriendly => "spin_friendly",
            Self::BowlingFriendly => "bowling_friendly",
            Self::Balanced => "balanced",
        }
    }
}

impl std::fmt::Display for PitchCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PitchCategory {
    type Err = &'static str;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "batting" | "batting_friendly" => Ok(Self::BattingFriendly),
            "spin" | "spin_friendly" => Ok(Self::SpinFriendly),
            "bowling" | "bowling_friendly" | "green" => Ok(Self::BowlingFriendly),
            "balanced" | "default" => Ok(Self::Balanced),
            _ => Err("invalid pitch category; expected batting|spin|bowling|balanced"),
        }
    }
}
