//! Plate-appearance resolution.
//!
//! Two sequential stages: one uniform draw against the walk/strikeout
//! partition, then an independent hit-by-pitch check. Only a ball that gets
//! past both is put in play through the batted-ball, flight and defense
//! models. The resolver never touches [`GameState`]; it returns an
//! [`AtBatRecord`] for the inning state machine to apply.

use crate::config::EngineConfig;
use crate::engine::advancement::{movements, AdvanceRolls};
use crate::engine::batted_ball::{BattedBallModel, SituationalContext};
use crate::engine::defense::defend;
use crate::engine::inning::GameState;
use crate::engine::probability::{
    bunt_odds, double_play_probability, error_probability, score_from_first_on_double,
    score_from_second_on_single, strikeout_probability, walk_probability, SWINGING_STRIKEOUT_SHARE,
};
use crate::engine::rng::RandomSource;
use crate::engine::trajectory::fly;
use crate::models::player::{PlayerRatings, RATING_AVERAGE};
use crate::models::{
    AtBatOutcome, AtBatRecord, BattedBallDescriptor, DefenseOutcome, FlightSummary, HitResult,
    HitType, ParkGeometry, Weather,
};

/// Everything about the game the resolver reads.
#[derive(Debug, Clone, Copy)]
pub struct AtBatContext<'a> {
    pub state: &'a GameState,
    pub weather: &'a Weather,
    pub park: &'a ParkGeometry,
    pub config: &'a EngineConfig,
    /// Fielding team's `[LF, CF, RF]`.
    pub outfielders: [Option<&'a PlayerRatings>; 3],
    /// Run rating of the runner on first, second, third; ignored where empty.
    pub runner_speed: [f32; 3],
    /// The manager has called for a bunt.
    pub bunt: bool,
}

impl<'a> AtBatContext<'a> {
    pub fn new(
        state: &'a GameState,
        weather: &'a Weather,
        park: &'a ParkGeometry,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            state,
            weather,
            park,
            config,
            outfielders: [None; 3],
            runner_speed: [RATING_AVERAGE; 3],
            bunt: false,
        }
    }

    fn situation(&self) -> SituationalContext {
        SituationalContext {
            runners: self.state.occupied(),
            score_differential: self.state.score_differential(),
        }
    }
}

/// Physical detail of a ball put in play.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactResult {
    pub outcome: AtBatOutcome,
    pub flight: FlightSummary,
    pub defense: Option<DefenseOutcome>,
}

/// Resolve one plate appearance.
pub fn resolve(
    rng: &mut dyn RandomSource,
    batter: &PlayerRatings,
    pitcher: &PlayerRatings,
    ctx: &AtBatContext,
) -> AtBatRecord {
    let batter = batter.sanitized();
    let pitcher = pitcher.sanitized();
    let state = ctx.state;
    let runners = state.occupied();

    let p_walk = walk_probability(&batter, &pitcher);
    let p_strikeout = strikeout_probability(&batter, &pitcher);
    let r = rng.uniform();

    if r < p_walk {
        let pitches = rng.int_range(4, 8) as u8;
        return finish(AtBatOutcome::Walk, state, AdvanceRolls::default(), pitches);
    }
    if r < p_walk + p_strikeout {
        let outcome = if rng.chance(SWINGING_STRIKEOUT_SHARE) {
            AtBatOutcome::StrikeoutSwinging
        } else {
            AtBatOutcome::StrikeoutLooking
        };
        let pitches = rng.int_range(3, 8) as u8;
        return finish(outcome, state, AdvanceRolls::default(), pitches);
    }
    if rng.chance(ctx.config.hit_by_pitch_probability) {
        let pitches = rng.int_range(1, 6) as u8;
        return finish(AtBatOutcome::HitByPitch, state, AdvanceRolls::default(), pitches);
    }

    if ctx.bunt {
        let outcome = resolve_bunt(rng, &batter, runners);
        let pitches = rng.int_range(1, 4) as u8;
        return finish(outcome, state, AdvanceRolls::default(), pitches);
    }

    let model = BattedBallModel::new(ctx.config.contact_quality, ctx.park, ctx.weather.kind);
    let ball = model.generate_sanitized(rng, &batter, &pitcher, &ctx.situation());
    let contact = resolve_contact(rng, &ball, ctx);
    let rolls = advance_rolls(rng, contact.outcome, runners, ctx.runner_speed);
    let pitches = rng.int_range(1, 7) as u8;

    let mut record = finish(contact.outcome, state, rolls, pitches);
    record.batted_ball = Some(ball);
    record.flight = Some(contact.flight);
    record.defense = contact.defense;
    record
}

fn finish(outcome: AtBatOutcome, state: &GameState, rolls: AdvanceRolls, pitches: u8) -> AtBatRecord {
    AtBatRecord::new(outcome, movements(outcome, state.occupied(), state.outs, rolls), pitches)
}

/// Drive a batted ball through flight and defense and apply the post-contact
/// special cases: double play, error, fielder's choice, sacrifice fly.
pub fn resolve_contact(
    rng: &mut dyn RandomSource,
    ball: &BattedBallDescriptor,
    ctx: &AtBatContext,
) -> ContactResult {
    let state = ctx.state;
    let runners = state.occupied();
    let config = ctx.config;
    let flight = fly(ball, ctx.weather, ctx.park);

    let airborne = matches!(ball.hit_type, HitType::Fly | HitType::Line);
    let mut hit_result = flight.hit_result;
    let mut defense = None;
    if airborne && flight.distance_m > config.defense_min_distance_m && hit_result != HitResult::HomeRun {
        let outcome = defend(rng, ball, &flight, ctx.outfielders);
        if outcome.caught {
            hit_result = if ball.hit_type == HitType::Line { HitResult::Lineout } else { HitResult::Flyout };
        } else if outcome.extra_base {
            hit_result = hit_result.extra_base();
        }
        defense = Some(outcome);
    }

    let error_rate = error_probability(config.base_error_rate, ctx.weather.kind);
    let outcome = match hit_result {
        HitResult::Groundout => {
            let dp = double_play_probability(
                config.double_play_base,
                ball.exit_velocity_kmh,
                ctx.runner_speed[0],
            );
            if runners[0] && state.outs < 2 && rng.chance(dp) {
                AtBatOutcome::DoublePlay
            } else if rng.chance(error_rate) {
                AtBatOutcome::ReachedOnError
            } else if runners[0] && rng.chance(config.fielders_choice_probability) {
                AtBatOutcome::FieldersChoice
            } else {
                AtBatOutcome::Groundout
            }
        }
        HitResult::Flyout if ball.hit_type == HitType::Popup => AtBatOutcome::Popout,
        HitResult::Flyout => {
            if runners[2]
                && state.outs < 2
                && flight.hang_time_s > config.sac_fly_min_hang_time_s
                && rng.chance(config.sac_fly_probability)
            {
                AtBatOutcome::SacrificeFly
            } else if rng.chance(error_rate) {
                defense = defense.map(DefenseOutcome::dropped);
                AtBatOutcome::ReachedOnError
            } else {
                AtBatOutcome::Flyout
            }
        }
        other => AtBatOutcome::from(other),
    };

    ContactResult { outcome, flight, defense }
}

fn resolve_bunt(rng: &mut dyn RandomSource, batter: &PlayerRatings, runners: [bool; 3]) -> AtBatOutcome {
    let odds = bunt_odds(batter, runners[0]);
    let r = rng.uniform();
    if r < odds.popout {
        AtBatOutcome::Popout
    } else if r < odds.popout + odds.hit {
        AtBatOutcome::BuntHit
    } else if r < odds.popout + odds.hit + odds.fielders_choice {
        AtBatOutcome::FieldersChoice
    } else if runners.iter().any(|&on| on) {
        AtBatOutcome::SacrificeBunt
    } else {
        AtBatOutcome::Groundout
    }
}

/// Roll the speed-dependent extra bases, only where a runner could take one.
fn advance_rolls(
    rng: &mut dyn RandomSource,
    outcome: AtBatOutcome,
    runners: [bool; 3],
    runner_speed: [f32; 3],
) -> AdvanceRolls {
    let mut rolls = AdvanceRolls::default();
    match outcome {
        AtBatOutcome::Single if runners[1] => {
            rolls.second_scores_on_single = rng.chance(score_from_second_on_single(runner_speed[1]));
        }
        AtBatOutcome::Double if runners[0] => {
            rolls.first_scores_on_double = rng.chance(score_from_first_on_double(runner_speed[0]));
        }
        _ => {}
    }
    rolls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::inning::Runner;
    use crate::engine::rng::ScriptedRng;
    use crate::models::player::SituationalAbility;

    struct Fixture {
        state: GameState,
        weather: Weather,
        park: ParkGeometry,
        config: EngineConfig,
    }

    impl Fixture {
        fn new(occupied: [bool; 3], outs: u8) -> Self {
            let mut state = GameState::new(9, 9);
            for (slot, on) in occupied.into_iter().enumerate() {
                if on {
                    state.runners[slot] = Some(Runner { player: 50 + slot as u32, charged_to: 1, earned: true });
                }
            }
            state.outs = outs;
            Self {
                state,
                weather: Weather::default(),
                park: ParkGeometry::default(),
                config: EngineConfig::default(),
            }
        }

        fn ctx(&self) -> AtBatContext<'_> {
            AtBatContext::new(&self.state, &self.weather, &self.park, &self.config)
        }
    }

    fn avg() -> PlayerRatings {
        PlayerRatings::league_average()
    }

    #[test]
    fn first_draw_below_walk_rate_walks() {
        let f = Fixture::new([true, true, true], 0);
        let record = resolve(&mut ScriptedRng::new(vec![0.01]), &avg(), &avg(), &f.ctx());
        assert_eq!(record.outcome, AtBatOutcome::Walk);
        assert_eq!(record.runs_scored, 1);
        assert_eq!(record.pitch_count, 4);
        assert!(record.batted_ball.is_none());
    }

    #[test]
    fn strikeout_band_follows_walk_band() {
        let f = Fixture::new([false; 3], 0);
        // 0.09 walk + 0.175 strikeout; 0.2 lands in the strikeout band, 0.7 => looking
        let record = resolve(&mut ScriptedRng::new(vec![0.2, 0.7]), &avg(), &avg(), &f.ctx());
        assert_eq!(record.outcome, AtBatOutcome::StrikeoutLooking);
        assert_eq!(record.outs_recorded, 1);
    }

    #[test]
    fn hit_by_pitch_is_a_separate_draw() {
        let f = Fixture::new([true, false, false], 0);
        let record = resolve(&mut ScriptedRng::new(vec![0.5, 0.001]), &avg(), &avg(), &f.ctx());
        assert_eq!(record.outcome, AtBatOutcome::HitByPitch);
        assert_eq!(record.movements.len(), 2);
    }

    #[test]
    fn contact_produces_ball_and_flight() {
        let f = Fixture::new([false; 3], 0);
        let mut rng = ScriptedRng::new(vec![0.5, 0.5]);
        let record = resolve(&mut rng, &avg(), &avg(), &f.ctx());
        assert!(record.batted_ball.is_some());
        assert!(record.flight.is_some());
    }

    #[test]
    fn scenario_zero_exit_velocity_grounds_out() {
        let f = Fixture::new([false; 3], 0);
        let ball = BattedBallDescriptor::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.05);
        let contact = resolve_contact(&mut ScriptedRng::new(vec![]), &ball, &f.ctx());
        assert_eq!(contact.outcome, AtBatOutcome::Groundout);
        assert_eq!(contact.flight.distance_m, 0.0);
        assert!(contact.flight.hang_time_s >= 0.0);
        assert!(contact.defense.is_none());
    }

    #[test]
    fn scenario_double_play_on_grounder() {
        let f = Fixture::new([true, false, false], 0);
        let grounder = BattedBallDescriptor::new(110.0, -3.0, 12.0, 900.0, 6.0, 0.4);
        let contact = resolve_contact(&mut ScriptedRng::new(vec![0.0]), &grounder, &f.ctx());
        assert_eq!(contact.outcome, AtBatOutcome::DoublePlay);

        let two_outs = Fixture::new([true, false, false], 2);
        let contact = resolve_contact(&mut ScriptedRng::new(vec![0.0]), &grounder, &two_outs.ctx());
        assert_eq!(contact.outcome, AtBatOutcome::ReachedOnError);
    }

    #[test]
    fn failed_double_play_can_be_fielders_choice() {
        let f = Fixture::new([true, false, false], 1);
        let grounder = BattedBallDescriptor::new(110.0, -3.0, 12.0, 900.0, 6.0, 0.4);
        // dp fails, no error, fielder's choice
        let contact = resolve_contact(&mut ScriptedRng::new(vec![0.99, 0.99, 0.1]), &grounder, &f.ctx());
        assert_eq!(contact.outcome, AtBatOutcome::FieldersChoice);
    }

    #[test]
    fn scenario_sacrifice_fly_on_deep_fly() {
        let f = Fixture::new([false, false, true], 1);
        let deep_fly = BattedBallDescriptor::new(140.0, 32.0, 0.0, 3000.0, 180.0, 0.6);
        // catch roll succeeds, sac-fly roll succeeds
        let contact = resolve_contact(&mut ScriptedRng::new(vec![0.1, 0.1]), &deep_fly, &f.ctx());
        assert!(contact.defense.as_ref().is_some_and(|d| d.caught));
        assert!(contact.flight.hang_time_s > 3.5);
        assert_eq!(contact.outcome, AtBatOutcome::SacrificeFly);
    }

    #[test]
    fn error_on_caught_fly_is_recorded_as_a_drop() {
        let f = Fixture::new([false; 3], 0);
        let deep_fly = BattedBallDescriptor::new(140.0, 32.0, 0.0, 3000.0, 180.0, 0.6);
        // every roll hits: catch, any dive/wall flavor, then the error
        let contact = resolve_contact(&mut ScriptedRng::new(vec![0.0; 4]), &deep_fly, &f.ctx());
        assert_eq!(contact.outcome, AtBatOutcome::ReachedOnError);
        let defense = contact.defense.expect("fielder reached the ball");
        assert!(!defense.caught);
        assert!(!defense.diving_catch);
        assert!(!defense.wall_catch);
        assert!(defense.description.contains("drops"));
    }

    #[test]
    fn popup_is_popout() {
        let f = Fixture::new([false; 3], 0);
        let popup = BattedBallDescriptor::new(110.0, 60.0, 0.0, 3500.0, 180.0, 0.2);
        let contact = resolve_contact(&mut ScriptedRng::new(vec![]), &popup, &f.ctx());
        assert_eq!(contact.outcome, AtBatOutcome::Popout);
    }

    #[test]
    fn bunt_with_runner_on_is_sacrifice_by_default() {
        let f = Fixture::new([true, false, false], 0);
        let mut ctx = f.ctx();
        ctx.bunt = true;
        // clear the partition, miss HBP, then a bunt roll in the sacrifice band
        let record = resolve(&mut ScriptedRng::new(vec![0.5, 0.9, 0.9]), &avg(), &avg(), &ctx);
        assert_eq!(record.outcome, AtBatOutcome::SacrificeBunt);
        assert_eq!(record.outs_recorded, 1);
        assert_eq!(record.runs_scored, 0);
    }

    #[test]
    fn wild_pitcher_walks_more_batters() {
        let f = Fixture::new([false; 3], 0);
        let wild = avg().with_ability(SituationalAbility::WildPitch, 0.05);
        // 0.12 is above the average walk rate but inside the wild one
        let record = resolve(&mut ScriptedRng::new(vec![0.12]), &avg(), &wild, &f.ctx());
        assert_eq!(record.outcome, AtBatOutcome::Walk);
    }
}
