//! Outfield defense: can the responsible outfielder run the ball down?

use crate::engine::physics_constants::outfield;
use crate::engine::rng::RandomSource;
use crate::models::player::{normalize, PlayerRatings, RATING_MAX};
use crate::models::{BattedBallDescriptor, DefenseOutcome, Fielder, FlightSummary, HitResult, HitType};

/// Exit velocity (km/h) above which the ball is "scorched" and harder to glove.
const HARD_CONTACT_KMH: f32 = 160.0;
const HARD_CONTACT_FACTOR: f32 = 0.85;
const LINE_DRIVE_FACTOR: f32 = 0.9;
const MAX_CATCH_PROBABILITY: f32 = 0.99;

/// Difficulty at which a successful catch may be a diving one.
const DIVE_DIFFICULTY: f32 = 0.8;
const DIVE_PROBABILITY: f32 = 0.6;
const WALL_CATCH_PROBABILITY: f32 = 0.75;

/// Responsible outfielder for a spray angle.
pub fn responsible_fielder(spray_angle_deg: f32) -> Fielder {
    if spray_angle_deg < -outfield::CORNER_ZONE_DEG {
        Fielder::LeftField
    } else if spray_angle_deg > outfield::CORNER_ZONE_DEG {
        Fielder::RightField
    } else {
        Fielder::CenterField
    }
}

fn polar(distance_m: f32, angle_deg: f32) -> (f32, f32) {
    let rad = angle_deg.to_radians();
    (distance_m * rad.sin(), distance_m * rad.cos())
}

/// Nominal starting spot in field coordinates.
pub fn starting_position(fielder: Fielder) -> (f32, f32) {
    match fielder {
        Fielder::LeftField => polar(outfield::CORNER_DEPTH_M, -outfield::CORNER_ANGLE_DEG),
        Fielder::CenterField => polar(outfield::CENTER_DEPTH_M, 0.0),
        Fielder::RightField => polar(outfield::CORNER_DEPTH_M, outfield::CORNER_ANGLE_DEG),
    }
}

/// Catch probability from the time to spare (s) once the fielder has covered
/// the ground at full sprint. Negative means the fielder arrives late.
pub fn catch_probability_from_margin(time_margin_s: f32) -> f32 {
    if time_margin_s > 0.5 {
        MAX_CATCH_PROBABILITY
    } else if time_margin_s > 0.0 {
        (0.5 + time_margin_s).min(MAX_CATCH_PROBABILITY)
    } else if time_margin_s > -0.3 {
        (0.5 + time_margin_s / 0.6).max(0.0)
    } else {
        0.0
    }
}

/// Decide whether an outfielder catches a ball in play.
///
/// `outfielders` is `[LF, CF, RF]`; a missing entry plays as league average.
pub fn defend(
    rng: &mut dyn RandomSource,
    ball: &BattedBallDescriptor,
    flight: &FlightSummary,
    outfielders: [Option<&PlayerRatings>; 3],
) -> DefenseOutcome {
    let fielder = responsible_fielder(ball.spray_angle_deg);
    let ratings = match outfielders[fielder.slot()] {
        Some(ratings) => ratings.sanitized(),
        None => {
            tracing::warn!(?fielder, "no outfielder rated for slot, using league-average defaults");
            PlayerRatings::league_average()
        }
    };

    let (start_x, start_y) = starting_position(fielder);
    let (land_x, land_y) = polar(flight.distance_m, ball.spray_angle_deg);
    let coverage_m = ((land_x - start_x).powi(2) + (land_y - start_y).powi(2)).sqrt();

    let sprint = outfield::SPRINT_BASE_MPS + ratings.run / RATING_MAX * outfield::SPRINT_RANGE_MPS;
    let reaction = outfield::REACTION_BASE_S - ratings.fielding / RATING_MAX * outfield::REACTION_RANGE_S;
    let available_s = flight.hang_time_s - reaction;

    let catch_difficulty = if available_s > 0.0 {
        (coverage_m / available_s) / sprint
    } else {
        f32::INFINITY
    };
    let time_margin = available_s - coverage_m / sprint;

    let mut p_catch = catch_probability_from_margin(time_margin);
    if ball.hit_type == HitType::Line {
        p_catch *= LINE_DRIVE_FACTOR;
    }
    if ball.exit_velocity_kmh > HARD_CONTACT_KMH {
        p_catch *= HARD_CONTACT_FACTOR;
    }
    if p_catch > 0.0 {
        p_catch += (normalize(ratings.fielding) - 0.5) * 0.1;
    }
    let p_catch = p_catch.clamp(0.0, MAX_CATCH_PROBABILITY);

    let catch_difficulty = if catch_difficulty.is_finite() { catch_difficulty } else { 9.99 };

    if rng.chance(p_catch) {
        let diving_catch = catch_difficulty >= DIVE_DIFFICULTY && rng.chance(DIVE_PROBABILITY);
        let wall_catch = flight.distance_m >= flight.fence_distance_m * outfield::WALL_ZONE_FRACTION
            && rng.chance(WALL_CATCH_PROBABILITY);
        let description = if wall_catch {
            format!("The {fielder} goes back to the wall and makes the catch")
        } else if diving_catch {
            format!("Diving catch by the {fielder}")
        } else {
            format!("The {fielder} settles under it")
        };
        return DefenseOutcome {
            caught: true,
            fielder,
            diving_catch,
            wall_catch,
            description,
            catch_difficulty,
            extra_base: false,
        };
    }

    let can_stretch = matches!(flight.hit_result, HitResult::Single | HitResult::Double);
    let extra_base = can_stretch
        && ratings.arm < outfield::WEAK_ARM
        && rng.chance((outfield::WEAK_ARM - ratings.arm) / outfield::WEAK_ARM * 0.5);
    let description = if extra_base {
        format!("Falls in front of the {fielder}, weak throw lets the batter take an extra base")
    } else {
        format!("Falls in for a hit in front of the {fielder}")
    };

    DefenseOutcome {
        caught: false,
        fielder,
        diving_catch: false,
        wall_catch: false,
        description,
        catch_difficulty,
        extra_base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedRng;

    fn fly_ball(spray: f32, ev: f32) -> BattedBallDescriptor {
        BattedBallDescriptor::new(ev, 32.0, spray, 2900.0, 180.0, 0.6)
    }

    fn flight(distance_m: f32, hang_time_s: f32, hit_result: HitResult) -> FlightSummary {
        FlightSummary { hit_result, distance_m, hang_time_s, fence_distance_m: 120.0 }
    }

    #[test]
    fn spray_picks_fielder() {
        assert_eq!(responsible_fielder(-30.0), Fielder::LeftField);
        assert_eq!(responsible_fielder(0.0), Fielder::CenterField);
        assert_eq!(responsible_fielder(15.0), Fielder::CenterField);
        assert_eq!(responsible_fielder(22.0), Fielder::RightField);
    }

    #[test]
    fn margin_curve() {
        assert_eq!(catch_probability_from_margin(1.0), 0.99);
        assert!((catch_probability_from_margin(0.2) - 0.7).abs() < 1e-6);
        assert!((catch_probability_from_margin(-0.15) - 0.25).abs() < 1e-6);
        assert_eq!(catch_probability_from_margin(-1.0), 0.0);
    }

    #[test]
    fn ball_hit_at_fielder_is_caught() {
        let ball = fly_ball(0.0, 130.0);
        let outcome = defend(
            &mut ScriptedRng::new(vec![0.5]),
            &ball,
            &flight(95.0, 5.0, HitResult::Double),
            [None, None, None],
        );
        assert!(outcome.caught);
        assert_eq!(outcome.fielder, Fielder::CenterField);
        assert!(!outcome.diving_catch);
        assert!(outcome.catch_difficulty < 0.1);
    }

    #[test]
    fn unreachable_ball_falls_in() {
        // Bloop in shallow left-center with almost no hang time.
        let ball = fly_ball(-10.0, 120.0);
        let outcome = defend(
            &mut ScriptedRng::new(vec![]),
            &ball,
            &flight(45.0, 1.5, HitResult::Single),
            [None, None, None],
        );
        assert!(!outcome.caught);
        assert!(outcome.catch_difficulty > 1.0);
        assert!(!outcome.extra_base);
    }

    #[test]
    fn weak_arm_can_give_up_extra_base() {
        let noodle = PlayerRatings { arm: 2.0, ..PlayerRatings::league_average() };
        let ball = fly_ball(0.0, 120.0);
        // first draw: catch roll fails; second: extra-base roll succeeds
        let outcome = defend(
            &mut ScriptedRng::new(vec![0.999, 0.01]),
            &ball,
            &flight(45.0, 1.5, HitResult::Single),
            [None, Some(&noodle), None],
        );
        assert!(!outcome.caught);
        assert!(outcome.extra_base);
    }

    #[test]
    fn warning_track_catch_is_wall_catch() {
        let ball = fly_ball(0.0, 150.0);
        let outcome = defend(
            &mut ScriptedRng::new(vec![0.1, 0.1]),
            &ball,
            &flight(117.0, 5.6, HitResult::Double),
            [None, None, None],
        );
        assert!(outcome.caught);
        assert!(outcome.wall_catch);
    }
}
