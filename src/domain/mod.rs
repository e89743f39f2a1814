pub mod format;
pub mod record;
pub mod role;
pub mod team;

pub use format::{parse_match_format, MatchFormat, PitchCategory};
pub use record::{MatchContext, PerformanceRecord, PlayerAggregate, ScoredPlayer};
pub use role::{BowlingStyle, PlayerRole, RosterOverrides};
pub use team::{
    BowlingBias, PartialTeamWarning, RoleShortfall, ScoringSkip, SelectedTeam, TeamComposition,
    TeamSlot, TEAM_SIZE,
};
