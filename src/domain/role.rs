use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    #[serde(rename = "Wicket-Keeper")]
    WicketKeeper,
    #[serde(rename = "Batsman")]
    Batsman,
    #[serde(rename = "All-Rounder")]
    AllRounder,
    #[serde(rename = "Bowler")]
    Bowler,
}

impl PlayerRole {
    /// Fill priority used by the selector.
    pub const FILL_ORDER: [PlayerRole; 4] = [
        PlayerRole::WicketKeeper,
        PlayerRole::Batsman,
        PlayerRole::AllRounder,
        PlayerRole::Bowler,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WicketKeeper => "Wicket-Keeper",
            Self::Batsman => "Batsman",
            Self::AllRounder => "All-Rounder",
            Self::Bowler => "Bowler",
        }
    }

    /// Keyword inference from a free-text role field.
    pub fn infer(role_text: &str) -> Self {
        let role = role_text.to_lowercase();
        if role.contains("keeper") || role.contains("wicket") {
            Self::WicketKeeper
        } else if role.contains("allrounder")
            || role.contains("alrounder")
            || role.contains("all-rounder")
            || role.contains("all rounder")
            || (role.contains("batting") && role.contains("bowling"))
        {
            Self::AllRounder
        } else if role.contains("bowler") || role.contains("bowling") {
            Self::Bowler
        } else {
            Self::Batsman
        }
    }
}

impl std::fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BowlingStyle {
    Spinner,
    Pacer,
    #[default]
    Unknown,
}

impl BowlingStyle {
    /// Substring classification; spin keywords win over pace keywords.
    pub fn classify(style_text: &str) -> Self {
        let style = style_text.to_lowercase();
        if ["spin", "off", "leg"].iter().any(|k| style.contains(k)) {
            Self::Spinner
        } else if ["fast", "medium", "pace"].iter().any(|k| style.contains(k)) {
            Self::Pacer
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spinner => "spinner",
            Self::Pacer => "pacer",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for BowlingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named players whose role is fixed regardless of the role text.
#[derive(Debug, Clone, Default)]
pub struct RosterOverrides {
    wicket_keepers: HashSet<String>,
    all_rounders: HashSet<String>,
}

impl RosterOverrides {
    pub fn new<K, A>(wicket_keepers: K, all_rounders: A) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            wicket_keepers: wicket_keepers.into_iter().map(Into::into).collect(),
            all_rounders: all_rounders.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_named_keeper(&self, name: &str) -> bool {
        self.wicket_keepers.contains(name)
    }

    pub fn has_named_keepers(&self) -> bool {
        !self.wicket_keepers.is_empty()
    }

    /// Name override first, then role text, then Batsman.
    pub fn resolve(&self, name: &str, role_text: Option<&str>) -> PlayerRole {
        if self.wicket_keepers.contains(name) {
            return PlayerRole::WicketKeeper;
        }
        if self.all_rounders.contains(name) {
            return PlayerRole::AllRounder;
        }
        role_text.map(PlayerRole::infer).unwrap_or(PlayerRole::Batsman)
    }
}
