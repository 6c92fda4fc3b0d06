//! Batted-ball generation: ratings and situation in, exit conditions out.

use crate::config::ContactQualityShape;
use crate::engine::physics_constants::launch;
use crate::engine::probability::is_clutch;
use crate::engine::rng::RandomSource;
use crate::models::player::{normalize, PlayerRatings, SituationalAbility};
use crate::models::{BattedBallDescriptor, ParkGeometry, WeatherKind};

/// Contact-quality regime thresholds.
pub const BARREL_QUALITY: f32 = 0.75;
pub const SOLID_QUALITY: f32 = 0.45;

/// Launch-angle convergence thresholds.
const HIGH_QUALITY_LAUNCH: f32 = 0.7;
const MID_QUALITY_LAUNCH: f32 = 0.4;

/// Weak contact is beaten into the ground this often, otherwise popped up.
const WEAK_GROUND_BALL_SHARE: f32 = 0.55;

/// Game situation the batted ball is generated in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SituationalContext {
    pub runners: [bool; 3],
    /// Batting team's runs minus fielding team's runs.
    pub score_differential: i32,
}

impl SituationalContext {
    pub fn is_clutch(&self) -> bool {
        is_clutch(self.runners, self.score_differential)
    }
}

/// Generates [`BattedBallDescriptor`]s for one game environment.
#[derive(Debug, Clone, Copy)]
pub struct BattedBallModel {
    shape: ContactQualityShape,
    exit_velocity_factor: f32,
    hit_modifier: f32,
}

impl BattedBallModel {
    pub fn new(shape: ContactQualityShape, park: &ParkGeometry, weather: WeatherKind) -> Self {
        Self {
            shape,
            exit_velocity_factor: park.exit_velocity_factor,
            hit_modifier: weather.hit_modifier(),
        }
    }

    /// Never fails: inputs are sanitized and every output is clamped.
    pub fn generate(
        &self,
        rng: &mut dyn RandomSource,
        batter: &PlayerRatings,
        pitcher: &PlayerRatings,
        context: &SituationalContext,
    ) -> BattedBallDescriptor {
        self.generate_sanitized(rng, &batter.sanitized(), &pitcher.sanitized(), context)
    }

    /// [`generate`](Self::generate) for ratings already passed through
    /// [`PlayerRatings::sanitized`].
    pub(crate) fn generate_sanitized(
        &self,
        rng: &mut dyn RandomSource,
        batter: &PlayerRatings,
        pitcher: &PlayerRatings,
        context: &SituationalContext,
    ) -> BattedBallDescriptor {
        let contact_quality = self.contact_quality(rng, batter, pitcher, context);
        let exit_velocity = self.exit_velocity(rng, batter, contact_quality);
        let launch_angle = launch_angle(rng, batter, contact_quality);
        let spray_angle = rng
            .normal(-batter.pull * 2.0, 22.0)
            .clamp(-launch::SPRAY_ANGLE_LIMIT_DEG, launch::SPRAY_ANGLE_LIMIT_DEG);
        let spin_rate = spin_rate(rng, launch_angle);

        // Backspin (axis near 180) on anything hit in the air, topspin on grounders.
        let spin_axis = if launch_angle > 0.0 {
            180.0 - spray_angle * 0.5
        } else {
            spray_angle * 0.5
        };

        BattedBallDescriptor::new(
            exit_velocity,
            launch_angle,
            spray_angle,
            spin_rate,
            spin_axis,
            contact_quality,
        )
    }

    fn contact_quality(
        &self,
        rng: &mut dyn RandomSource,
        batter: &PlayerRatings,
        pitcher: &PlayerRatings,
        context: &SituationalContext,
    ) -> f32 {
        let contact_difficulty = normalize(pitcher.speed) * 0.6 + normalize(pitcher.breaking) * 0.4;
        let condition_ratio = batter.condition / pitcher.condition.max(0.7);

        let mut base_quality =
            (0.85 + normalize(batter.contact) * 0.3 - contact_difficulty * 0.25) * condition_ratio;
        base_quality *= self.hit_modifier;
        if context.is_clutch() {
            base_quality += batter.ability(SituationalAbility::Clutch)
                - pitcher.ability(SituationalAbility::Pinch);
        }
        let base_quality = base_quality.clamp(0.3, 1.3);

        let (alpha, beta) = self.shape.params(batter.contact);
        (rng.beta(alpha, beta) * base_quality).clamp(0.05, 1.0)
    }

    fn exit_velocity(&self, rng: &mut dyn RandomSource, batter: &PlayerRatings, quality: f32) -> f32 {
        let power = batter.power;
        let regime = if quality > BARREL_QUALITY {
            (145.0 + power * 2.2) * (0.9 + quality * 0.15)
        } else if quality > SOLID_QUALITY {
            (120.0 + power * 1.8) * (0.8 + quality * 0.25)
        } else {
            (80.0 + power * 1.2) * (0.6 + quality * 0.5)
        };
        let noisy = regime + rng.normal(0.0, 4.0);
        let power_hitter = 1.0 + batter.ability(SituationalAbility::PowerHitter);
        (noisy * self.exit_velocity_factor * power_hitter)
            .clamp(launch::EXIT_VELOCITY_MIN_KMH, launch::EXIT_VELOCITY_MAX_KMH)
    }
}

/// Trajectory profile base angle (deg).
fn trajectory_base_angle(trajectory: u8) -> f32 {
    match trajectory {
        1 => 2.0,
        2 => 10.0,
        3 => 16.0,
        4 => 22.0,
        _ => 12.0,
    }
}

fn launch_angle(rng: &mut dyn RandomSource, batter: &PlayerRatings, quality: f32) -> f32 {
    let trajectory = batter.trajectory;
    let base = trajectory_base_angle(trajectory);

    let angle = if quality > HIGH_QUALITY_LAUNCH {
        let target = if batter.power >= 14.0 || trajectory >= 3 {
            28.0 - f32::from(4 - trajectory.min(4)) * 3.0
        } else {
            base + rng.normal(5.0, 3.0)
        };
        target + rng.normal(0.0, 6.0)
    } else if quality > MID_QUALITY_LAUNCH {
        base + rng.normal(0.0, 10.0)
    } else if rng.chance(WEAK_GROUND_BALL_SHARE) {
        rng.normal(-5.0, 8.0)
    } else {
        rng.normal(50.0, 10.0)
    };

    angle.clamp(launch::LAUNCH_ANGLE_MIN_DEG, launch::LAUNCH_ANGLE_MAX_DEG)
}

fn spin_rate(rng: &mut dyn RandomSource, launch_angle: f32) -> f32 {
    let base = if launch_angle > 20.0 {
        2200.0 + launch_angle * 25.0
    } else if launch_angle > 0.0 {
        1800.0 + launch_angle * 20.0
    } else {
        800.0 + launch_angle.abs() * 30.0
    };
    let noise = rng.int_range(-200, 200) as f32;
    (base + noise).round().clamp(launch::SPIN_MIN_RPM, launch::SPIN_MAX_RPM)
}
