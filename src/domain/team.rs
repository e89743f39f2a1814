use serde::{Deserialize, Serialize};

use super::{BowlingStyle, MatchContext, PlayerRole, ScoredPlayer};

pub const TEAM_SIZE: usize = 11;

/// Reserve part of the bowler slots for one bowling style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingBias {
    pub style: BowlingStyle,
    pub min: usize,
}

/// Required player count per role for one (format, pitch category) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamComposition {
    pub keepers: usize,
    pub batsmen: usize,
    pub all_rounders: usize,
    pub bowlers: usize,
    #[serde(default)]
    pub bowling_bias: Option<BowlingBias>,
}

impl TeamComposition {
    pub const fn new(keepers: usize, batsmen: usize, all_rounders: usize, bowlers: usize) -> Self {
        Self {
            keepers,
            batsmen,
            all_rounders,
            bowlers,
            bowling_bias: None,
        }
    }

    pub const fn with_bias(mut self, style: BowlingStyle, min: usize) -> Self {
        self.bowling_bias = Some(BowlingBias { style, min });
        self
    }

    pub fn count_for(&self, role: PlayerRole) -> usize {
        match role {
            PlayerRole::WicketKeeper => self.keepers,
            PlayerRole::Batsman => self.batsmen,
            PlayerRole::AllRounder => self.all_rounders,
            PlayerRole::Bowler => self.bowlers,
        }
    }

    pub fn total(&self) -> usize {
        self.keepers + self.batsmen + self.all_rounders + self.bowlers
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.total() != TEAM_SIZE {
            return Err(format!(
                "composition sums to {} (keepers {}, batsmen {}, all-rounders {}, bowlers {}), expected {TEAM_SIZE}",
                self.total(),
                self.keepers,
                self.batsmen,
                self.all_rounders,
                self.bowlers
            ));
        }
        if self.keepers == 0 {
            return Err("composition must include at least one wicket-keeper slot".to_string());
        }
        if let Some(bias) = self.bowling_bias {
            if bias.style == BowlingStyle::Unknown {
                return Err("bowling bias style must be spinner or pacer".to_string());
            }
            if bias.min > self.bowlers {
                return Err(format!(
                    "bowling bias reserves {} slots but only {} bowlers are picked",
                    bias.min, self.bowlers
                ));
            }
        }
        Ok(())
    }
}

/// One position in the selected eleven.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSlot {
    pub player: ScoredPlayer,
    pub assigned_role: PlayerRole,
    /// Filled by the backfill pass rather than the player's own role bucket.
    pub backfilled: bool,
}

/// Fewer than eleven unique players could be assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialTeamWarning {
    pub achieved: usize,
    pub required: usize,
}

impl std::fmt::Display for PartialTeamWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "only {} of {} players could be selected",
            self.achieved, self.required
        )
    }
}

/// A player the predictor rejected during scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSkip {
    pub name: String,
    pub reason: String,
}

/// A role bucket that could not supply its required count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleShortfall {
    pub role: PlayerRole,
    pub required: usize,
    pub filled: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedTeam {
    pub context: MatchContext,
    pub composition: TeamComposition,
    pub slots: Vec<TeamSlot>,
    pub shortfalls: Vec<RoleShortfall>,
    pub skipped: Vec<ScoringSkip>,
    pub warning: Option<PartialTeamWarning>,
}

impl SelectedTeam {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_partial(&self) -> bool {
        self.warning.is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.player.name()).collect()
    }

    pub fn count_assigned(&self, role: PlayerRole) -> usize {
        self.slots.iter().filter(|s| s.assigned_role == role).count()
    }

    pub fn keeper(&self) -> Option<&TeamSlot> {
        self.slots
            .iter()
            .find(|s| s.assigned_role == PlayerRole::WicketKeeper)
    }
}
