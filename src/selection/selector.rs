//! Best XI selection: score, bucket by role, greedy fill, backfill.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{
    MatchContext, PartialTeamWarning, PlayerAggregate, PlayerRole, RoleShortfall, RosterOverrides,
    ScoredPlayer, ScoringSkip, SelectedTeam, TeamComposition, TeamSlot, TEAM_SIZE,
};
use crate::error::{PredictError, SelectionError};
use crate::ml::ScorePredictor;

use super::composition::CompositionTable;

/// Stateless team selector. Every call re-scores every candidate.
#[derive(Debug, Clone, Default)]
pub struct TeamSelector {
    compositions: CompositionTable,
    roster: RosterOverrides,
}

struct Scored {
    players: Vec<ScoredPlayer>,
    skipped: Vec<ScoringSkip>,
}

struct Fill<'a> {
    scored: &'a [ScoredPlayer],
    taken: Vec<bool>,
    slots: Vec<TeamSlot>,
}

impl<'a> Fill<'a> {
    fn new(scored: &'a [ScoredPlayer]) -> Self {
        Self {
            scored,
            taken: vec![false; scored.len()],
            slots: Vec::with_capacity(TEAM_SIZE),
        }
    }

    /// Untaken candidates matching `keep`, best score first, input order on ties.
    fn ranked<F>(&self, keep: F) -> Vec<usize>
    where
        F: Fn(&ScoredPlayer) -> bool,
    {
        let mut idx: Vec<usize> = (0..self.scored.len())
            .filter(|&i| !self.taken[i] && keep(&self.scored[i]))
            .collect();
        idx.sort_by(|&a, &b| {
            self.scored[b]
                .predicted_score
                .total_cmp(&self.scored[a].predicted_score)
        });
        idx
    }

    fn take(&mut self, i: usize, assigned_role: PlayerRole, backfilled: bool) {
        self.taken[i] = true;
        self.slots.push(TeamSlot {
            player: self.scored[i].clone(),
            assigned_role,
            backfilled,
        });
    }

    fn take_top<F>(&mut self, count: usize, assigned_role: PlayerRole, keep: F) -> usize
    where
        F: Fn(&ScoredPlayer) -> bool,
    {
        let picks: Vec<usize> = self.ranked(keep).into_iter().take(count).collect();
        for &i in &picks {
            self.take(i, assigned_role, false);
        }
        picks.len()
    }
}

impl TeamSelector {
    pub fn new(compositions: CompositionTable, roster: RosterOverrides) -> Self {
        Self {
            compositions,
            roster,
        }
    }

    pub fn compositions(&self) -> &CompositionTable {
        &self.compositions
    }

    pub fn roster(&self) -> &RosterOverrides {
        &self.roster
    }

    /// Pick the best eleven for `context` from `aggregates`.
    ///
    /// Errors only when there is nothing to pick from or no usable predictor.
    /// A short pool yields a shorter team carrying a [`PartialTeamWarning`].
    pub fn select_best_xi(
        &self,
        aggregates: &[PlayerAggregate],
        context: &MatchContext,
        predictor: Option<&dyn ScorePredictor>,
    ) -> Result<SelectedTeam, SelectionError> {
        let no_candidates = SelectionError::NoCandidates {
            format: context.match_format,
        };
        if aggregates.is_empty() {
            return Err(no_candidates);
        }
        let predictor = predictor.ok_or_else(|| {
            SelectionError::PredictorUnavailable("no score model loaded".to_string())
        })?;

        let Scored { players, skipped } = score_candidates(aggregates, context, predictor)?;
        if players.is_empty() {
            return Err(no_candidates);
        }

        let composition = self.compositions.lookup(context.match_format, &context.pitch_type);
        let mut fill = Fill::new(&players);
        let mut shortfalls = Vec::new();

        for role in PlayerRole::FILL_ORDER {
            let required = composition.count_for(role);
            let filled = match role {
                PlayerRole::WicketKeeper => self.fill_keepers(&mut fill, required),
                PlayerRole::Bowler => fill_bowlers(&mut fill, &composition),
                _ => fill.take_top(required, role, |p| p.role() == role),
            };
            if filled < required {
                shortfalls.push(RoleShortfall {
                    role,
                    required,
                    filled,
                });
            }
        }

        // Backfill from the overall ranking, regardless of role.
        let open = TEAM_SIZE.saturating_sub(fill.slots.len());
        for i in fill.ranked(|_| true).into_iter().take(open) {
            let role = match players[i].role() {
                PlayerRole::WicketKeeper => PlayerRole::Batsman,
                other => other,
            };
            fill.take(i, role, true);
        }

        let slots = fill.slots;
        let warning = (slots.len() < TEAM_SIZE).then_some(PartialTeamWarning {
            achieved: slots.len(),
            required: TEAM_SIZE,
        });

        Ok(SelectedTeam {
            context: context.clone(),
            composition,
            slots,
            shortfalls,
            skipped,
            warning,
        })
    }

    /// First keeper slot goes to the best named keeper when any is in the pool,
    /// otherwise to the best keeper-role candidate. Extra keeper slots are
    /// labelled Batsman so only one Wicket-Keeper appears.
    fn fill_keepers(&self, fill: &mut Fill<'_>, required: usize) -> usize {
        if required == 0 {
            return 0;
        }
        let named = if self.roster.has_named_keepers() {
            fill.ranked(|p| self.roster.is_named_keeper(p.name()))
                .first()
                .copied()
        } else {
            None
        };

        let mut filled = 0;
        if let Some(i) = named {
            fill.take(i, PlayerRole::WicketKeeper, false);
            filled += 1;
        }
        for i in fill
            .ranked(|p| p.role() == PlayerRole::WicketKeeper)
            .into_iter()
            .take(required - filled)
        {
            let label = if filled == 0 {
                PlayerRole::WicketKeeper
            } else {
                PlayerRole::Batsman
            };
            fill.take(i, label, false);
            filled += 1;
        }
        filled
    }
}

/// Bowler slots: reserved style first when the composition asks for it,
/// then the rest of the bowler bucket by score.
fn fill_bowlers(fill: &mut Fill<'_>, composition: &TeamComposition) -> usize {
    let required = composition.bowlers;
    let mut filled = 0;
    if let Some(bias) = composition.bowling_bias {
        filled += fill.take_top(bias.min.min(required), PlayerRole::Bowler, |p| {
            p.role() == PlayerRole::Bowler && p.player.bowling_style == bias.style
        });
    }
    filled += fill.take_top(required - filled, PlayerRole::Bowler, |p| {
        p.role() == PlayerRole::Bowler
    });
    filled
}

fn score_candidates(
    aggregates: &[PlayerAggregate],
    context: &MatchContext,
    predictor: &dyn ScorePredictor,
) -> Result<Scored, SelectionError> {
    let mut seen = HashSet::with_capacity(aggregates.len());
    let mut players = Vec::with_capacity(aggregates.len());
    let mut skipped = Vec::new();

    for aggregate in aggregates {
        if !seen.insert(aggregate.name.as_str()) {
            continue;
        }
        match predictor.predict(aggregate, context) {
            Ok(score) if score.is_finite() => players.push(ScoredPlayer {
                player: aggregate.clone(),
                predicted_score: score,
            }),
            Ok(score) => {
                debug!(player = %aggregate.name, score, "non-finite score, skipping player");
                skipped.push(ScoringSkip {
                    name: aggregate.name.clone(),
                    reason: format!("non-finite score {score}"),
                });
            }
            Err(PredictError::InvalidFeature(reason)) => {
                debug!(player = %aggregate.name, %reason, "predictor rejected player");
                skipped.push(ScoringSkip {
                    name: aggregate.name.clone(),
                    reason,
                });
            }
            Err(PredictError::Unavailable(reason)) => {
                return Err(SelectionError::PredictorUnavailable(reason));
            }
        }
    }

    Ok(Scored { players, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BowlingStyle, MatchFormat};
    use crate::ml::MockScorePredictor;

    fn player(name: &str, role: PlayerRole, style: BowlingStyle, runs: f64) -> PlayerAggregate {
        PlayerAggregate {
            name: name.to_string(),
            format: MatchFormat::Odi,
            role,
            role_text: None,
            bowling_style: style,
            bowling_style_text: None,
            matches: 1,
            avg_runs: runs,
            avg_strike_rate: 0.0,
            avg_wickets: 0.0,
            avg_economy: 0.0,
            avg_fours: 0.0,
            avg_sixes: 0.0,
            avg_runs_conceded: 0.0,
        }
    }

    /// Scores equal the player's avg_runs so tests can read intent off the data.
    fn runs_predictor() -> MockScorePredictor {
        let mut mock = MockScorePredictor::new();
        mock.expect_predict().returning(|p, _| Ok(p.avg_runs));
        mock
    }

    fn context(pitch: &str) -> MatchContext {
        MatchContext::new(MatchFormat::Odi, pitch, "Sunny", "India")
    }

    fn selector() -> TeamSelector {
        TeamSelector::default()
    }

    #[test]
    fn empty_pool_is_no_candidates() {
        let mock = runs_predictor();
        let err = selector()
            .select_best_xi(&[], &context("Balanced"), Some(&mock))
            .unwrap_err();
        assert_eq!(
            err,
            SelectionError::NoCandidates {
                format: MatchFormat::Odi
            }
        );
    }

    #[test]
    fn missing_predictor_is_unavailable() {
        let pool = vec![player("A", PlayerRole::Batsman, BowlingStyle::Unknown, 10.0)];
        let err = selector()
            .select_best_xi(&pool, &context("Balanced"), None)
            .unwrap_err();
        assert!(matches!(err, SelectionError::PredictorUnavailable(_)));
    }

    #[test]
    fn predictor_outage_aborts_selection() {
        let pool = vec![
            player("A", PlayerRole::Batsman, BowlingStyle::Unknown, 10.0),
            player("B", PlayerRole::Batsman, BowlingStyle::Unknown, 20.0),
        ];
        let mut mock = MockScorePredictor::new();
        mock.expect_predict()
            .returning(|_, _| Err(PredictError::Unavailable("model crashed".into())));
        let err = selector()
            .select_best_xi(&pool, &context("Balanced"), Some(&mock))
            .unwrap_err();
        assert_eq!(
            err,
            SelectionError::PredictorUnavailable("model crashed".into())
        );
    }

    #[test]
    fn rejected_players_are_skipped() {
        let pool = vec![
            player("Keep", PlayerRole::WicketKeeper, BowlingStyle::Unknown, 50.0),
            player("Bad", PlayerRole::Batsman, BowlingStyle::Unknown, 99.0),
            player("Good", PlayerRole::Batsman, BowlingStyle::Unknown, 40.0),
        ];
        let mut mock = MockScorePredictor::new();
        mock.expect_predict().returning(|p, _| {
            if p.name == "Bad" {
                Err(PredictError::InvalidFeature("unseen player".into()))
            } else {
                Ok(p.avg_runs)
            }
        });
        let team = selector()
            .select_best_xi(&pool, &context("Balanced"), Some(&mock))
            .unwrap();
        assert_eq!(team.names(), vec!["Keep", "Good"]);
        assert_eq!(team.skipped.len(), 1);
        assert_eq!(team.skipped[0].name, "Bad");
        assert_eq!(
            team.warning,
            Some(PartialTeamWarning {
                achieved: 2,
                required: TEAM_SIZE
            })
        );
    }

    #[test]
    fn everyone_rejected_escalates_to_no_candidates() {
        let pool = vec![player("Bad", PlayerRole::Batsman, BowlingStyle::Unknown, 1.0)];
        let mut mock = MockScorePredictor::new();
        mock.expect_predict()
            .returning(|_, _| Err(PredictError::InvalidFeature("nope".into())));
        let err = selector()
            .select_best_xi(&pool, &context("Balanced"), Some(&mock))
            .unwrap_err();
        assert!(matches!(err, SelectionError::NoCandidates { .. }));
    }

    #[test]
    fn named_keeper_overrides_generic_keeper_bucket() {
        let pool = vec![
            player("Generic Keeper", PlayerRole::WicketKeeper, BowlingStyle::Unknown, 90.0),
            player("Named Keeper", PlayerRole::Batsman, BowlingStyle::Unknown, 60.0),
        ];
        let roster = RosterOverrides::new(["Named Keeper"], Vec::<String>::new());
        let selector = TeamSelector::new(CompositionTable::default(), roster);
        let mock = runs_predictor();
        let team = selector
            .select_best_xi(&pool, &context("Balanced"), Some(&mock))
            .unwrap();

        let keeper = team.keeper().expect("keeper selected");
        assert_eq!(keeper.player.name(), "Named Keeper");
        assert_eq!(team.count_assigned(PlayerRole::WicketKeeper), 1);
        // The generic keeper still makes the side through backfill, as a batsman.
        let generic = team
            .slots
            .iter()
            .find(|s| s.player.name() == "Generic Keeper")
            .unwrap();
        assert_eq!(generic.assigned_role, PlayerRole::Batsman);
        assert!(generic.backfilled);
    }

    #[test]
    fn spin_bias_reserves_bowler_slots() {
        let mut pool = vec![player("K", PlayerRole::WicketKeeper, BowlingStyle::Unknown, 50.0)];
        for i in 0..4 {
            pool.push(player(&format!("Bat{i}"), PlayerRole::Batsman, BowlingStyle::Unknown, 60.0 - i as f64));
        }
        for i in 0..2 {
            pool.push(player(&format!("AR{i}"), PlayerRole::AllRounder, BowlingStyle::Unknown, 55.0 - i as f64));
        }
        // Pacers outscore spinners, but the ODI spin pitch reserves three spin slots.
        for i in 0..4 {
            pool.push(player(&format!("Pace{i}"), PlayerRole::Bowler, BowlingStyle::Pacer, 90.0 - i as f64));
        }
        for i in 0..3 {
            pool.push(player(&format!("Spin{i}"), PlayerRole::Bowler, BowlingStyle::Spinner, 30.0 - i as f64));
        }

        let mock = runs_predictor();
        let team = selector()
            .select_best_xi(&pool, &context("Spin Friendly"), Some(&mock))
            .unwrap();
        assert_eq!(team.len(), TEAM_SIZE);
        let bowlers: Vec<&str> = team
            .slots
            .iter()
            .filter(|s| s.assigned_role == PlayerRole::Bowler)
            .map(|s| s.player.name())
            .collect();
        assert_eq!(bowlers, vec!["Spin0", "Spin1", "Spin2", "Pace0"]);
        assert!(team.shortfalls.is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let pool: Vec<_> = ["First", "Second", "Third"]
            .iter()
            .map(|n| player(n, PlayerRole::Batsman, BowlingStyle::Unknown, 10.0))
            .collect();
        let mock = runs_predictor();
        let team = selector()
            .select_best_xi(&pool, &context("Balanced"), Some(&mock))
            .unwrap();
        assert_eq!(team.names(), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn duplicate_names_are_scored_once() {
        let pool = vec![
            player("Same", PlayerRole::Batsman, BowlingStyle::Unknown, 10.0),
            player("Same", PlayerRole::Batsman, BowlingStyle::Unknown, 90.0),
        ];
        let mock = runs_predictor();
        let team = selector()
            .select_best_xi(&pool, &context("Balanced"), Some(&mock))
            .unwrap();
        assert_eq!(team.len(), 1);
        assert_eq!(team.slots[0].player.predicted_score, 10.0);
    }
}
