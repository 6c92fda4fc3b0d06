//! Probability calculation utilities for at-bat resolution.
//!
//! All functions are pure: ratings in, clamped probability out. They expect
//! sanitized ratings (see [`PlayerRatings::sanitized`]).

use crate::models::player::{normalize, PlayerRatings, SituationalAbility, RATING_MAX};
use crate::models::WeatherKind;

// ============================================================================
// Pre-contact
// ============================================================================

pub const WALK_MIN: f32 = 0.03;
pub const WALK_MAX: f32 = 0.15;
pub const STRIKEOUT_MIN: f32 = 0.05;
pub const STRIKEOUT_MAX: f32 = 0.35;

/// Share of strikeouts that are swinging.
pub const SWINGING_STRIKEOUT_SHARE: f32 = 0.6;

/// Walk probability from pitcher control, plus the batter's patience and the
/// pitcher's wildness.
pub fn walk_probability(batter: &PlayerRatings, pitcher: &PlayerRatings) -> f32 {
    let base = 0.12 - pitcher.control / RATING_MAX * 0.06;
    let p = base
        + batter.ability(SituationalAbility::Patient)
        + pitcher.ability(SituationalAbility::WildPitch);
    p.clamp(WALK_MIN, WALK_MAX)
}

/// Strikeout probability from pitcher velocity and breaking stuff against
/// batter contact.
pub fn strikeout_probability(batter: &PlayerRatings, pitcher: &PlayerRatings) -> f32 {
    let p = 0.15
        + (pitcher.speed - batter.contact) * 0.01
        + pitcher.breaking / RATING_MAX * 0.05
        + pitcher.ability(SituationalAbility::Strikeout)
        - batter.ability(SituationalAbility::ContactHitter) * 0.5;
    p.clamp(STRIKEOUT_MIN, STRIKEOUT_MAX)
}

/// Runner on second or third in a game within three runs.
#[inline]
pub fn is_clutch(runners: [bool; 3], score_differential: i32) -> bool {
    (runners[1] || runners[2]) && score_differential.abs() <= 3
}

// ============================================================================
// Post-contact
// ============================================================================

/// Reference exit velocity (km/h) at which `double_play_base` applies as-is.
const DOUBLE_PLAY_REFERENCE_KMH: f32 = 130.0;
const DOUBLE_PLAY_MAX: f32 = 0.6;

/// Double-play chance on a ground ball. Harder grounders turn two more often,
/// a fast runner from first breaks it up more often.
pub fn double_play_probability(base: f32, exit_velocity_kmh: f32, runner_speed: f32) -> f32 {
    let velocity_scale = exit_velocity_kmh / DOUBLE_PLAY_REFERENCE_KMH;
    let speed_penalty = (normalize(runner_speed) - 0.5) * 0.2;
    (base * velocity_scale - speed_penalty).clamp(0.0, DOUBLE_PLAY_MAX)
}

/// Fielding error chance on a routine out.
pub fn error_probability(base_error_rate: f32, weather: WeatherKind) -> f32 {
    (base_error_rate + weather.error_modifier()).clamp(0.0, 0.2)
}

/// Runner from second scores on a single.
pub fn score_from_second_on_single(runner_speed: f32) -> f32 {
    (0.45 + normalize(runner_speed) * 0.3).clamp(0.0, 0.95)
}

/// Runner from first scores on a double.
pub fn score_from_first_on_double(runner_speed: f32) -> f32 {
    (0.25 + normalize(runner_speed) * 0.3).clamp(0.0, 0.9)
}

// ============================================================================
// Bunts
// ============================================================================

/// Bunt outcome weights; whatever is left over is a successful sacrifice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuntOdds {
    pub popout: f32,
    pub hit: f32,
    pub fielders_choice: f32,
}

pub fn bunt_odds(batter: &PlayerRatings, runner_on_first: bool) -> BuntOdds {
    BuntOdds {
        popout: (0.10 - normalize(batter.contact) * 0.06).clamp(0.02, 0.10),
        hit: (0.04 + normalize(batter.run) * 0.12).clamp(0.02, 0.2),
        fielders_choice: if runner_on_first { 0.12 } else { 0.0 },
    }
}

/// Manager bunt call: no outs, a runner to move up and third base open, either
/// late in a close game or with a weak bat at the plate.
pub fn should_bunt(
    outs: u8,
    runners: [bool; 3],
    inning: u8,
    score_differential: i32,
    batter: &PlayerRatings,
) -> bool {
    if outs != 0 || runners[2] || !(runners[0] || runners[1]) {
        return false;
    }
    let close_and_late = runners[0] && inning >= 7 && score_differential.abs() <= 2;
    let weak_bat = batter.contact + batter.power < 12.0;
    close_and_late || weak_bat
}
