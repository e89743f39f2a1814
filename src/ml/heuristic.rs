//! Closed-form performance score, usable when no trained artifact is shipped.
//!
//! Batting: `1.5 * runs + 0.5 * strike_rate`. Bowling: `25 * wickets -
//! 0.5 * runs_conceded`. The pitch category scales the matching component.

use super::ScorePredictor;
use crate::domain::{BowlingStyle, MatchContext, PitchCategory, PlayerAggregate, PlayerRole};
use crate::error::PredictError;

#[derive(Debug, Clone, Copy)]
pub struct HeuristicPredictor {
    pub batting_pitch_boost: f64,
    pub spin_pitch_boost: f64,
    pub seam_pitch_boost: f64,
}

impl Default for HeuristicPredictor {
    fn default() -> Self {
        Self {
            batting_pitch_boost: 1.10,
            spin_pitch_boost: 1.15,
            seam_pitch_boost: 1.15,
        }
    }
}

impl HeuristicPredictor {
    fn batting(&self, p: &PlayerAggregate, pitch: PitchCategory) -> f64 {
        let base = 1.5 * p.avg_runs + 0.5 * p.avg_strike_rate;
        match pitch {
            PitchCategory::BattingFriendly => base * self.batting_pitch_boost,
            _ => base,
        }
    }

    fn bowling(&self, p: &PlayerAggregate, pitch: PitchCategory) -> f64 {
        let base = 25.0 * p.avg_wickets - 0.5 * p.avg_runs_conceded;
        match (pitch, p.bowling_style) {
            (PitchCategory::SpinFriendly, BowlingStyle::Spinner) => base * self.spin_pitch_boost,
            (PitchCategory::BowlingFriendly, BowlingStyle::Pacer) => base * self.seam_pitch_boost,
            _ => base,
        }
    }
}

impl ScorePredictor for HeuristicPredictor {
    fn predict(&self, player: &PlayerAggregate, context: &MatchContext) -> Result<f64, PredictError> {
        let pitch = context.pitch_category();
        let score = match player.role {
            PlayerRole::Batsman | PlayerRole::WicketKeeper => self.batting(player, pitch),
            PlayerRole::Bowler => self.bowling(player, pitch),
            PlayerRole::AllRounder => self.batting(player, pitch) + self.bowling(player, pitch),
        };
        if score.is_finite() {
            Ok(score)
        } else {
            Err(PredictError::InvalidFeature(format!(
                "non-finite statistics for {}",
                player.name
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MatchFormat;

    fn aggregate(role: PlayerRole, style: BowlingStyle) -> PlayerAggregate {
        PlayerAggregate {
            name: "P".into(),
            format: MatchFormat::T20,
            role,
            role_text: None,
            bowling_style: style,
            bowling_style_text: None,
            matches: 4,
            avg_runs: 20.0,
            avg_strike_rate: 140.0,
            avg_wickets: 2.0,
            avg_economy: 7.5,
            avg_fours: 2.0,
            avg_sixes: 1.0,
            avg_runs_conceded: 30.0,
        }
    }

    #[test]
    fn role_selects_components() {
        let h = HeuristicPredictor::default();
        let ctx = MatchContext::new(MatchFormat::T20, "Balanced", "Sunny", "India");
        let bat = h.predict(&aggregate(PlayerRole::Batsman, BowlingStyle::Unknown), &ctx).unwrap();
        let bowl = h.predict(&aggregate(PlayerRole::Bowler, BowlingStyle::Pacer), &ctx).unwrap();
        let ar = h.predict(&aggregate(PlayerRole::AllRounder, BowlingStyle::Pacer), &ctx).unwrap();
        assert!((bat - 100.0).abs() < 1e-9);
        assert!((bowl - 35.0).abs() < 1e-9);
        assert!((ar - 135.0).abs() < 1e-9);
    }

    #[test]
    fn spin_pitch_boosts_spinners_only() {
        let h = HeuristicPredictor::default();
        let ctx = MatchContext::new(MatchFormat::T20, "Spin Friendly", "Sunny", "India");
        let spin = h.predict(&aggregate(PlayerRole::Bowler, BowlingStyle::Spinner), &ctx).unwrap();
        let pace = h.predict(&aggregate(PlayerRole::Bowler, BowlingStyle::Pacer), &ctx).unwrap();
        assert!(spin > pace);
    }
}
