//! Full-game driver.
//!
//! [`GameEngine`] owns the one [`GameRng`] for the game, the [`GameState`] and
//! the output streams (plays, pitching changes, stat deltas). It plays
//! half-innings until a termination rule fires:
//!
//! - walk-off: home side ahead after any bottom-half plate appearance from the
//!   last regulation inning on
//! - home side ahead after the top of a deciding inning (bottom skipped)
//! - away side ahead after a complete deciding inning
//! - mercy rule, when configured
//! - tie after the bottom of the extra-innings cap

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::engine::at_bat::{resolve, AtBatContext};
use crate::engine::inning::{GameState, Half};
use crate::engine::pitching::{Checkpoint, PitchingChange, PitchingStaffManager};
use crate::engine::probability::should_bunt;
use crate::engine::rng::GameRng;
use crate::engine::stats::{deltas_for_play, StatDelta, StatKind, StatLedger};
use crate::error::{GameError, Result};
use crate::models::player::{PlayerId, RATING_AVERAGE};
use crate::models::{
    AtBatRecord, GameEndReason, GameResult, LineScore, ParkGeometry, PlayRecord, Player, Side,
    TeamSheet, Weather,
};

/// Outs a starter must record to qualify for the win.
pub const STARTER_WIN_MIN_OUTS: u32 = 15;

/// Everything needed to start a game. Immutable once the engine is built.
#[derive(Debug, Clone)]
pub struct GamePlan {
    pub seed: u64,
    pub home: TeamSheet,
    pub away: TeamSheet,
    pub weather: Weather,
    pub park: ParkGeometry,
    pub config: EngineConfig,
}

impl GamePlan {
    pub fn new(seed: u64, home: TeamSheet, away: TeamSheet) -> Self {
        Self {
            seed,
            home,
            away,
            weather: Weather::default(),
            park: ParkGeometry::default(),
            config: EngineConfig::default(),
        }
    }
}

/// Renders the display string for a play.
///
/// The engine only knows outcome tags and numbers; text belongs to whoever
/// implements this.
pub trait CommentaryHook {
    fn describe(&mut self, batter: &Player, pitcher: &Player, record: &AtBatRecord) -> String;
}

/// Leaves a template key such as `"{batter} home_run"` for a renderer downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionKeys;

impl CommentaryHook for DescriptionKeys {
    fn describe(&mut self, _batter: &Player, _pitcher: &Player, record: &AtBatRecord) -> String {
        format!("{{batter}} {}", record.outcome.description_key())
    }
}

pub struct GameEngine {
    rng: GameRng,
    seed: u64,
    /// Indexed with [`Side::index`].
    teams: [TeamSheet; 2],
    weather: Weather,
    park: ParkGeometry,
    config: EngineConfig,
    staff: PitchingStaffManager,
    state: GameState,
    plays: Vec<PlayRecord>,
    pitching_changes: Vec<PitchingChange>,
    deltas: Vec<StatDelta>,
    ledger: StatLedger,
    commentary: Box<dyn CommentaryHook>,
    end: Option<GameEndReason>,
}

impl GameEngine {
    /// Validate the plan and set up the opening state.
    ///
    /// Fails fast on any lineup, roster or config problem; nothing is
    /// simulated with partial data.
    pub fn new(plan: GamePlan) -> Result<Self> {
        plan.config.validate()?;
        plan.away.validate(Side::Away)?;
        plan.home.validate(Side::Home)?;

        let mut ids = HashSet::new();
        for player in plan.away.players.iter().chain(plan.home.players.iter()) {
            if !ids.insert(player.id) {
                return Err(GameError::DuplicatePlayerId { id: player.id });
            }
        }

        let mut teams = [plan.away, plan.home];
        for team in teams.iter_mut() {
            for player in team.players.iter_mut() {
                player.ratings = player.ratings.sanitized();
            }
        }

        let state = GameState::new(teams[0].starting_pitcher, teams[1].starting_pitcher);
        tracing::debug!(
            seed = plan.seed,
            away = %teams[0].name,
            home = %teams[1].name,
            park = %plan.park.name,
            "game engine ready"
        );

        Ok(Self {
            rng: GameRng::from_seed(plan.seed),
            seed: plan.seed,
            teams,
            weather: plan.weather.sanitized(),
            park: plan.park.sanitized(),
            staff: PitchingStaffManager::new(plan.config.bullpen),
            config: plan.config,
            state,
            plays: Vec::new(),
            pitching_changes: Vec::new(),
            deltas: Vec::new(),
            ledger: StatLedger::new(),
            commentary: Box::new(DescriptionKeys),
            end: None,
        })
    }

    pub fn with_commentary(mut self, hook: impl CommentaryHook + 'static) -> Self {
        self.commentary = Box::new(hook);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn team(&self, side: Side) -> &TeamSheet {
        &self.teams[side.index()]
    }

    pub fn plays(&self) -> &[PlayRecord] {
        &self.plays
    }

    pub fn is_over(&self) -> bool {
        self.end.is_some()
    }

    /// Play the current half-inning to completion (or to a walk-off) and
    /// advance to the next one unless the game is over.
    ///
    /// Returns the end reason once the game is decided.
    pub fn play_half_inning(&mut self) -> Option<GameEndReason> {
        if self.end.is_some() {
            return self.end;
        }
        let fielding = self.state.fielding_side().index();

        self.check_pitcher(Checkpoint::HalfStart);
        while !self.state.half_complete {
            let pitches_before = self.state.pitch_count[fielding];
            self.play_at_bat();
            if self.is_walk_off() {
                self.end = Some(GameEndReason::WalkOff);
                break;
            }
            if !self.state.half_complete
                && self.staff.crossed_threshold(pitches_before, self.state.pitch_count[fielding])
            {
                self.check_pitcher(Checkpoint::PitchCountCrossed);
            }
        }

        if self.end.is_none() {
            self.end = self.end_after_half();
        }
        if self.end.is_none() {
            self.state.next_half_inning();
        }
        self.end
    }

    /// Play to the end and build the result.
    pub fn run(mut self) -> GameResult {
        while self.play_half_inning().is_none() {}
        self.finish()
    }

    fn play_at_bat(&mut self) {
        let batting = self.state.batting_side();
        let fielding = batting.opponent();
        let bat_team = &self.teams[batting.index()];
        let field_team = &self.teams[fielding.index()];
        let batter = bat_team.batter(self.state.batter_slot[batting.index()]);
        let pitcher = &field_team.players[self.state.pitcher[fielding.index()]];

        let mut runner_speed = [RATING_AVERAGE; 3];
        for (slot, runner) in self.state.runners.iter().enumerate() {
            if let Some(runner) = runner {
                runner_speed[slot] = run_rating(bat_team, runner.player);
            }
        }

        let mut ctx = AtBatContext::new(&self.state, &self.weather, &self.park, &self.config);
        ctx.outfielders = field_team.outfielders();
        ctx.runner_speed = runner_speed;
        ctx.bunt = should_bunt(
            self.state.outs,
            self.state.occupied(),
            self.state.inning,
            self.state.score_differential(),
            &batter.ratings,
        );

        let mut record = resolve(&mut self.rng, &batter.ratings, &pitcher.ratings, &ctx);
        record.description = self.commentary.describe(batter, pitcher, &record);

        let (batter_id, pitcher_id) = (batter.id, pitcher.id);
        let inning = self.state.inning;
        let half = self.state.half;
        let outs_before = self.state.outs;
        let runners_before = self.state.occupied();

        self.state.pitch_count[fielding.index()] += u32::from(record.pitch_count);
        let transition = self.state.apply(&record, batter_id, pitcher_id);

        let deltas = deltas_for_play(&record, batter_id, pitcher_id, &transition.scored);
        for delta in &deltas {
            self.ledger.record(delta);
        }
        self.deltas.extend(deltas);

        tracing::debug!(
            inning,
            half = %half,
            batter = batter_id,
            pitcher = pitcher_id,
            outcome = ?record.outcome,
            runs = transition.scored.len(),
            outs = self.state.outs,
            "plate appearance"
        );

        self.plays.push(PlayRecord {
            inning,
            half,
            batter: batter_id,
            pitcher: pitcher_id,
            outs_before,
            runners_before,
            record,
        });
    }

    fn check_pitcher(&mut self, checkpoint: Checkpoint) {
        let side = self.state.fielding_side();
        let i = side.index();
        let team = &self.teams[i];
        let current = self.state.pitcher[i];
        let role = team.players[current].role();

        let Some(reason) =
            self.staff.evaluate(&mut self.rng, checkpoint, self.state.inning, self.state.pitch_count[i], role)
        else {
            return;
        };
        let Some(incoming) = self.staff.pick_replacement(team, &self.state.pitchers_used[i], self.state.inning)
        else {
            tracing::debug!(%side, ?reason, "bullpen exhausted, pitcher stays in");
            return;
        };

        let outgoing_id = team.players[current].id;
        let incoming_id = team.players[incoming].id;
        let line = self.ledger.pitching_line(outgoing_id).cloned().unwrap_or_default();
        let change = PitchingChange {
            side,
            inning: self.state.inning,
            half: self.state.half,
            outs_in_half: self.state.outs,
            outgoing: outgoing_id,
            incoming: incoming_id,
            reason,
            outgoing_outs: line.outs_recorded,
            outgoing_runs: line.runs_allowed,
            outgoing_pitches: self.state.pitch_count[i],
        };
        tracing::info!(
            %side,
            inning = change.inning,
            outgoing = outgoing_id,
            incoming = incoming_id,
            ?reason,
            pitches = change.outgoing_pitches,
            "pitching change"
        );

        self.state.change_pitcher(side, incoming);
        self.pitching_changes.push(change);
    }

    fn is_walk_off(&self) -> bool {
        self.state.half == Half::Bottom
            && self.state.inning >= self.config.regulation_innings
            && self.state.home_lead() > 0
    }

    /// Termination check at a completed half-inning.
    fn end_after_half(&self) -> Option<GameEndReason> {
        let state = &self.state;
        let lead = state.home_lead();
        let deciding = state.inning >= self.config.regulation_innings;
        let mercy = self
            .config
            .mercy_rule
            .filter(|rule| state.inning >= rule.from_inning)
            .map(|rule| i32::from(rule.run_lead));

        match state.half {
            Half::Top if deciding && lead > 0 => Some(GameEndReason::HomeTeamNotBatting),
            Half::Top => match mercy {
                Some(run_lead) if lead >= run_lead => Some(GameEndReason::Mercy),
                _ => None,
            },
            Half::Bottom if deciding && lead < 0 => Some(if state.inning == self.config.regulation_innings {
                GameEndReason::Regulation
            } else {
                GameEndReason::ExtraInnings
            }),
            Half::Bottom if deciding && lead == 0 && state.inning >= self.config.max_innings => {
                Some(GameEndReason::TieAtCap)
            }
            Half::Bottom => match mercy {
                Some(run_lead) if lead.abs() >= run_lead => Some(GameEndReason::Mercy),
                _ => None,
            },
        }
    }

    fn winner(&self) -> Option<Side> {
        match self.state.home_lead() {
            0 => None,
            lead if lead > 0 => Some(Side::Home),
            _ => Some(Side::Away),
        }
    }

    /// Winning pitcher: the starter with enough outs, else the side's last
    /// pitcher. Losing pitcher: the losing side's pitcher charged with the most
    /// runs, earliest on a tie.
    fn decisions(&self, winner: Side) -> (Option<PlayerId>, Option<PlayerId>) {
        let id = |side: Side, roster_index: usize| self.teams[side.index()].players[roster_index].id;
        let outs = |player: PlayerId| self.ledger.pitching_line(player).map_or(0, |l| l.outs_recorded);
        let runs = |player: PlayerId| self.ledger.pitching_line(player).map_or(0, |l| l.runs_allowed);

        let used = &self.state.pitchers_used[winner.index()];
        let win = used.first().map(|&starter| id(winner, starter)).and_then(|starter| {
            if outs(starter) >= STARTER_WIN_MIN_OUTS {
                Some(starter)
            } else {
                used.last().map(|&last| id(winner, last))
            }
        });

        let loser = winner.opponent();
        let mut loss: Option<(PlayerId, u32)> = None;
        for &roster_index in &self.state.pitchers_used[loser.index()] {
            let player = id(loser, roster_index);
            let charged = runs(player);
            if loss.map_or(true, |(_, most)| charged > most) {
                loss = Some((player, charged));
            }
        }
        (win, loss.map(|(player, _)| player))
    }

    fn finish(mut self) -> GameResult {
        let end_reason = self.end.unwrap_or(GameEndReason::Regulation);
        let winner = self.winner();
        let (winning_pitcher, losing_pitcher) = match winner {
            Some(side) => self.decisions(side),
            None => (None, None),
        };
        for (player, kind) in [(winning_pitcher, StatKind::Win), (losing_pitcher, StatKind::Loss)] {
            if let Some(player) = player {
                let delta = StatDelta::new(player, kind, 1);
                self.ledger.record(&delta);
                self.deltas.push(delta);
            }
        }

        let [away_line, home_line] = self.state.line_score.clone();
        let result = GameResult {
            seed: self.seed,
            home_team: self.teams[Side::Home.index()].name.clone(),
            away_team: self.teams[Side::Away.index()].name.clone(),
            home_score: self.state.runs(Side::Home),
            away_score: self.state.runs(Side::Away),
            innings: self.state.inning,
            line_score: LineScore { away: away_line, home: home_line },
            winner,
            end_reason,
            winning_pitcher,
            losing_pitcher,
            plays: self.plays,
            pitching_changes: self.pitching_changes,
            stat_deltas: self.deltas,
            box_score: self.ledger,
            rng_draws: self.rng.draws(),
        };
        tracing::info!(summary = %result.summary(), plays = result.plays.len(), "game over");
        result
    }
}

fn run_rating(team: &TeamSheet, player: PlayerId) -> f32 {
    team.players.iter().find(|p| p.id == player).map_or(RATING_AVERAGE, |p| p.ratings.run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MercyRule;
    use crate::engine::pitching::ChangeReason;
    use crate::models::team::fixtures::average_team;
    use crate::models::AtBatOutcome;

    fn plan(seed: u64) -> GamePlan {
        GamePlan::new(seed, average_team("Home", 100), average_team("Away", 200))
    }

    fn engine(seed: u64) -> GameEngine {
        GameEngine::new(plan(seed)).unwrap()
    }

    #[test]
    fn short_lineup_is_rejected() {
        let mut p = plan(1);
        p.away.lineup.pop();
        let err = GameEngine::new(p).err().unwrap();
        assert!(matches!(err, GameError::InvalidLineupSize { side: Side::Away, found: 8, .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn position_player_cannot_start_on_the_mound() {
        let mut p = plan(1);
        p.home.starting_pitcher = 0;
        let err = GameEngine::new(p).err().unwrap();
        assert!(matches!(err, GameError::NoEligiblePitcher { side: Side::Home, .. }));
    }

    #[test]
    fn shared_player_ids_are_rejected() {
        let p = GamePlan::new(1, average_team("Home", 100), average_team("Away", 100));
        assert!(matches!(GameEngine::new(p).err(), Some(GameError::DuplicatePlayerId { id: 100 })));
    }

    #[test]
    fn out_of_range_ratings_are_clamped_not_rejected() {
        let mut p = plan(1);
        p.home.players[0].ratings.power = 99.0;
        let engine = GameEngine::new(p).unwrap();
        assert_eq!(engine.team(Side::Home).players[0].ratings.power, 20.0);
    }

    #[test]
    fn unusable_park_and_weather_are_repaired() {
        let mut p = plan(5);
        p.park.fence_center_m = 0.0;
        p.weather.wind_y = f32::NAN;
        let engine = GameEngine::new(p).unwrap();
        assert!(engine.park.fence_center_m > 0.0);
        assert_eq!(engine.weather.wind_y, 0.0);

        let result = engine.run();
        assert!(result.plays.iter().filter_map(|play| play.record.flight.as_ref()).all(|f| f.hang_time_s < 15.0));
    }

    #[test]
    fn same_seed_same_game() {
        let a = serde_json::to_string(&engine(42).run()).unwrap();
        let b = serde_json::to_string(&engine(42).run()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn line_score_adds_up_to_final_score() {
        for seed in 0..20 {
            let result = engine(seed).run();
            assert_eq!(result.line_score.total(Side::Away), result.away_score, "seed {seed}");
            assert_eq!(result.line_score.total(Side::Home), result.home_score, "seed {seed}");

            let runs: u32 = result.box_score.batting.values().map(|l| l.runs).sum();
            assert_eq!(runs, u32::from(result.away_score + result.home_score));
            let appearances: u32 = result.box_score.batting.values().map(|l| l.plate_appearances).sum();
            assert_eq!(appearances as usize, result.plays.len());
        }
    }

    #[test]
    fn finished_games_respect_termination_rules() {
        for seed in 0..30 {
            let result = engine(seed).run();
            let last = result.plays.last().unwrap();
            assert!(result.innings >= 9);
            match result.end_reason {
                GameEndReason::WalkOff => {
                    assert_eq!(last.half, Half::Bottom);
                    assert!(last.record.runs_scored > 0);
                    assert_eq!(result.winner, Some(Side::Home));
                }
                GameEndReason::HomeTeamNotBatting => {
                    assert_eq!(last.half, Half::Top);
                    assert_eq!(result.winner, Some(Side::Home));
                    assert_eq!(result.line_score.home.len() + 1, result.line_score.away.len());
                }
                GameEndReason::Regulation => {
                    assert_eq!(result.innings, 9);
                    assert_eq!(result.winner, Some(Side::Away));
                }
                GameEndReason::ExtraInnings => assert_eq!(result.winner, Some(Side::Away)),
                GameEndReason::TieAtCap => {
                    assert_eq!(result.innings, 12);
                    assert_eq!(result.winner, None);
                }
                GameEndReason::Mercy => unreachable!("mercy rule is off by default"),
            }
            if result.winner.is_some() {
                assert!(result.winning_pitcher.is_some() && result.losing_pitcher.is_some());
            }
        }
    }

    #[test]
    fn home_lead_after_top_of_ninth_skips_bottom() {
        let mut engine = engine(7);
        engine.state.inning = 9;
        engine.state.half = Half::Top;
        engine.state.score = [0, 30];
        engine.state.line_score = [vec![0; 9], {
            let mut home = vec![0; 8];
            home[0] = 30;
            home
        }];

        assert_eq!(engine.play_half_inning(), Some(GameEndReason::HomeTeamNotBatting));
        assert_eq!(engine.state().half, Half::Top);
        assert!(engine.plays().iter().all(|p| p.half == Half::Top));
        let result = engine.run();
        assert_eq!(result.line_score.home.len(), 8);
        assert_eq!(result.end_reason, GameEndReason::HomeTeamNotBatting);
    }

    #[test]
    fn walk_off_detected_mid_half() {
        let mut engine = engine(3);
        engine.state.inning = 9;
        engine.state.half = Half::Bottom;
        engine.state.outs = 1;
        engine.state.score = [4, 5];
        assert!(engine.is_walk_off());
        engine.state.inning = 8;
        assert!(!engine.is_walk_off());
    }

    #[test]
    fn tie_after_bottom_of_cap_ends_game() {
        let mut engine = engine(3);
        engine.state.inning = 12;
        engine.state.half = Half::Bottom;
        engine.state.score = [6, 6];
        assert_eq!(engine.end_after_half(), Some(GameEndReason::TieAtCap));
        engine.state.inning = 11;
        assert_eq!(engine.end_after_half(), None);
    }

    #[test]
    fn mercy_rule_calls_the_game() {
        let mut p = plan(3);
        p.config.mercy_rule = Some(MercyRule { from_inning: 5, run_lead: 10 });
        let mut engine = GameEngine::new(p).unwrap();
        engine.state.inning = 5;
        engine.state.half = Half::Bottom;
        engine.state.score = [12, 1];
        assert_eq!(engine.end_after_half(), Some(GameEndReason::Mercy));

        // away lead after the top is not enough: home still bats
        engine.state.half = Half::Top;
        assert_eq!(engine.end_after_half(), None);
        engine.state.score = [1, 12];
        assert_eq!(engine.end_after_half(), Some(GameEndReason::Mercy));
    }

    #[test]
    fn pitchers_never_reenter() {
        for seed in 0..20 {
            let result = engine(seed).run();
            let mut seen = HashSet::new();
            for change in &result.pitching_changes {
                assert_ne!(change.outgoing, change.incoming);
                assert!(seen.insert(change.incoming), "seed {seed}: pitcher {} re-entered", change.incoming);
            }
        }
    }

    #[test]
    fn crossing_pitch_count_mid_inning_brings_in_a_fresh_reliever() {
        let mut p = plan(3);
        p.config.bullpen.pitch_count_pull_probability = 1.0;
        let mut engine = GameEngine::new(p).unwrap();
        let home = Side::Home.index();
        engine.state.pitch_count[home] = 99;

        // one plate appearance can record at most two outs, so the half is still open
        engine.play_half_inning();

        assert_eq!(engine.pitching_changes.len(), 1);
        let change = &engine.pitching_changes[0];
        let first = &engine.plays[0];
        assert_eq!(change.side, Side::Home);
        assert_eq!(change.reason, ChangeReason::PitchCount);
        assert_eq!((change.inning, change.half), (1, Half::Top));
        assert_eq!(change.outs_in_half, first.outs_before + first.record.outs_recorded);
        assert_eq!(change.outgoing, 109);
        assert_eq!(change.incoming, 110);
        assert!(change.outgoing_pitches >= 100);

        assert_eq!(engine.state.pitchers_used[home], vec![9, 10]);
        assert_eq!(engine.state.pitcher[home], 10);
        let relief_pitches: u32 = engine.plays[1..]
            .iter()
            .inspect(|play| assert_eq!(play.pitcher, 110))
            .map(|play| u32::from(play.record.pitch_count))
            .sum();
        assert_eq!(engine.state.pitch_count[home], relief_pitches);
    }

    struct Loud;

    impl CommentaryHook for Loud {
        fn describe(&mut self, batter: &Player, _pitcher: &Player, record: &AtBatRecord) -> String {
            if record.outcome == AtBatOutcome::HomeRun {
                format!("{} GONE!", batter.name)
            } else {
                batter.name.clone()
            }
        }
    }

    #[test]
    fn commentary_hook_fills_descriptions() {
        let default = engine(11).run();
        assert!(default.plays.iter().all(|p| p.record.description.starts_with("{batter} ")));

        let custom = engine(11).with_commentary(Loud).run();
        assert_eq!(default.plays.len(), custom.plays.len());
        assert!(custom.plays.iter().all(|p| p.record.description.starts_with("Away") || p.record.description.starts_with("Home")));
    }
}
