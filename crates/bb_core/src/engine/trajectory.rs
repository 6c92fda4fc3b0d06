//! Batted-ball flight integration and hit classification.
//!
//! Field frame: origin at home plate, +y toward straightaway center, +x toward
//! the right-field line, +z up. Spray angle is measured from the +y axis,
//! negative toward left field.
//!
//! Deterministic: no randomness is drawn here.

use crate::engine::physics_constants::{atmosphere, ball, field, integration, launch};
use crate::models::{BattedBallDescriptor, FlightSummary, HitResult, HitType, ParkGeometry, Weather};

/// Exit velocity (km/h) above which a grounder gets through regardless of where it is hit.
const GROUNDER_THROUGH_KMH: f32 = 155.0;
/// Exit velocity (km/h) a grounder needs to get through a hole.
const GROUNDER_HOLE_KMH: f32 = 120.0;
/// Slow rollers below this exit velocity (km/h) and quality beat the throw.
const SLOW_ROLLER_KMH: f32 = 75.0;
const SLOW_ROLLER_QUALITY: f32 = 0.25;
/// Short line drive (km/h) hard enough to clear the infield.
const SHORT_LINER_HIT_KMH: f32 = 135.0;
/// Line drive in the shallow outfield hard enough to reach the gap.
const GAP_LINER_KMH: f32 = 140.0;

/// Carry (m) below which an outfield ball in play is a single, and below which it is a double.
const SINGLE_MAX_M: f32 = 65.0;
const DOUBLE_MAX_M: f32 = 95.0;
/// A triple needs this much carry and a ball into the corners.
const TRIPLE_MIN_M: f32 = 105.0;
const TRIPLE_MIN_SPRAY_DEG: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Vec3 {
    x: f32,
    y: f32,
    z: f32,
}

impl Vec3 {
    fn horizontal(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Raw integration result before classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flight {
    pub distance_m: f32,
    pub hang_time_s: f32,
    /// Height at which the ball crossed the fence line, if it got there.
    pub fence_crossing_height_m: Option<f32>,
}

/// Integrate one batted ball and classify it.
pub fn fly(ball: &BattedBallDescriptor, weather: &Weather, park: &ParkGeometry) -> FlightSummary {
    let fence = park.fence_distance(ball.spray_angle_deg);
    let flight = integrate(ball, weather, fence, park.fence_height_m);
    FlightSummary {
        hit_result: classify(ball, &flight, park.fence_height_m),
        distance_m: flight.distance_m,
        hang_time_s: flight.hang_time_s,
        fence_distance_m: fence,
    }
}

/// Euler-integrate gravity, drag and Magnus lift until the ball lands, hits
/// the fence, or the flight cap runs out.
pub fn integrate(ball: &BattedBallDescriptor, weather: &Weather, fence_m: f32, fence_height_m: f32) -> Flight {
    let speed = ball.exit_velocity_kmh.max(0.0) * launch::KMH_TO_MPS;
    if !speed.is_finite() || speed < integration::MIN_FLIGHT_SPEED_MPS {
        return Flight { distance_m: 0.0, hang_time_s: 0.0, fence_crossing_height_m: None };
    }

    let launch_rad = ball.launch_angle_deg.to_radians();
    let spray_rad = ball.spray_angle_deg.to_radians();
    let mut pos = Vec3 { x: 0.0, y: 0.0, z: ball::CONTACT_HEIGHT_M };
    let mut vel = Vec3 {
        x: speed * launch_rad.cos() * spray_rad.sin(),
        y: speed * launch_rad.cos() * spray_rad.cos(),
        z: speed * launch_rad.sin(),
    };

    let rho = weather.air_density();
    let k = 0.5 * rho * ball::AREA_M2 / ball::MASS_KG;
    let omega = ball.spin_rate_rpm.max(0.0) * std::f32::consts::TAU / 60.0;
    // +1 backspin (lift), -1 topspin (dive)
    let spin_sign = -ball.spin_axis_deg.to_radians().cos();
    let dt = integration::DT_S;

    let mut t = 0.0f32;
    let mut fence_crossing = None;

    while t < integration::MAX_FLIGHT_S {
        let rel = Vec3 { x: vel.x - weather.wind_x, y: vel.y - weather.wind_y, z: vel.z };
        let rel_h = rel.horizontal();
        let rel_speed = (rel_h * rel_h + rel.z * rel.z).sqrt().max(1e-3);

        let drag = k * ball::DRAG_COEFF * rel_speed;
        let mut acc = Vec3 { x: -drag * rel.x, y: -drag * rel.y, z: -atmosphere::GRAVITY - drag * rel.z };

        if rel_h > 1e-3 {
            let spin_factor = ball::RADIUS_M * omega / rel_speed;
            let lift_coeff = lift_coefficient(spin_factor);
            let lift = spin_sign * k * lift_coeff * rel_speed * rel_speed;
            // unit normal to the relative velocity in its vertical plane
            let nx = -(rel.x / rel_h) * rel.z / rel_speed;
            let ny = -(rel.y / rel_h) * rel.z / rel_speed;
            let nz = rel_h / rel_speed;
            acc.x += lift * nx;
            acc.y += lift * ny;
            acc.z += lift * nz;
        }

        vel.x += acc.x * dt;
        vel.y += acc.y * dt;
        vel.z += acc.z * dt;
        let prev = pos;
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;

        let prev_h = prev.horizontal();
        let next_h = pos.horizontal();
        if fence_crossing.is_none() && prev_h < fence_m && next_h >= fence_m {
            let frac = (fence_m - prev_h) / (next_h - prev_h).max(1e-6);
            let height = prev.z + (pos.z - prev.z) * frac;
            fence_crossing = Some(height);
            if height < fence_height_m {
                // off the wall
                return Flight {
                    distance_m: fence_m,
                    hang_time_s: t + dt * frac,
                    fence_crossing_height_m: Some(height.max(0.0)),
                };
            }
        }

        if pos.z <= 0.0 {
            let frac = prev.z / (prev.z - pos.z).max(1e-6);
            let landing = Vec3 {
                x: prev.x + (pos.x - prev.x) * frac,
                y: prev.y + (pos.y - prev.y) * frac,
                z: 0.0,
            };
            return Flight {
                distance_m: landing.horizontal().max(0.0),
                hang_time_s: (t + dt * frac).max(0.0),
                fence_crossing_height_m: fence_crossing,
            };
        }
        t += dt;
    }

    Flight {
        distance_m: pos.horizontal().max(0.0),
        hang_time_s: t,
        fence_crossing_height_m: fence_crossing,
    }
}

fn lift_coefficient(spin_factor: f32) -> f32 {
    let cl = if spin_factor <= ball::LIFT_KNEE_SPIN_FACTOR {
        ball::LIFT_LOW_SLOPE * spin_factor
    } else {
        ball::LIFT_HIGH_INTERCEPT + ball::LIFT_HIGH_SLOPE * spin_factor
    };
    cl.min(ball::LIFT_COEFF_MAX)
}

fn in_hole(spray_deg: f32) -> bool {
    (-30.0..=-20.0).contains(&spray_deg) || (-5.0..=5.0).contains(&spray_deg) || (20.0..=30.0).contains(&spray_deg)
}

/// Classify a flight. Outfield balls in play carry the hit they would be if
/// nobody catches them; the defense resolver may take them away.
pub fn classify(ball: &BattedBallDescriptor, flight: &Flight, fence_height_m: f32) -> HitResult {
    let ev = ball.exit_velocity_kmh;
    if ev * launch::KMH_TO_MPS < integration::MIN_FLIGHT_SPEED_MPS {
        return HitResult::Groundout;
    }

    if let Some(height) = flight.fence_crossing_height_m {
        if ball.hit_type != HitType::Ground {
            return if height >= fence_height_m { HitResult::HomeRun } else { HitResult::Double };
        }
    }

    match ball.hit_type {
        HitType::Ground => {
            if ev >= GROUNDER_THROUGH_KMH || (ev >= GROUNDER_HOLE_KMH && in_hole(ball.spray_angle_deg)) {
                HitResult::Single
            } else if ev < SLOW_ROLLER_KMH && ball.contact_quality < SLOW_ROLLER_QUALITY {
                HitResult::InfieldHit
            } else {
                HitResult::Groundout
            }
        }
        HitType::Popup => HitResult::Flyout,
        HitType::Line | HitType::Fly => {
            let line = ball.hit_type == HitType::Line;
            let distance = flight.distance_m;
            if distance < field::INFIELD_DEPTH_M {
                if line && ev >= SHORT_LINER_HIT_KMH {
                    HitResult::Single
                } else if line {
                    HitResult::Lineout
                } else {
                    HitResult::Flyout
                }
            } else if distance < 40.0 {
                if line {
                    HitResult::Single
                } else {
                    HitResult::Flyout
                }
            } else if distance < SINGLE_MAX_M {
                if line && ev > GAP_LINER_KMH {
                    HitResult::Double
                } else {
                    HitResult::Single
                }
            } else if distance < DOUBLE_MAX_M {
                HitResult::Double
            } else if distance >= TRIPLE_MIN_M && ball.spray_angle_deg.abs() >= TRIPLE_MIN_SPRAY_DEG {
                HitResult::Triple
            } else {
                HitResult::Double
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(ev: f32, la: f32, spray: f32) -> BattedBallDescriptor {
        let spin = if la > 20.0 { 2200.0 + la * 25.0 } else if la > 0.0 { 1800.0 + la * 20.0 } else { 900.0 };
        let axis = if la > 0.0 { 180.0 - spray * 0.5 } else { spray * 0.5 };
        BattedBallDescriptor::new(ev, la, spray, spin, axis, 0.6)
    }

    #[test]
    fn zero_exit_velocity_is_harmless_groundout() {
        let summary = fly(&ball(0.0, 0.0, 0.0), &Weather::default(), &ParkGeometry::default());
        assert_eq!(summary.hit_result, HitResult::Groundout);
        assert_eq!(summary.distance_m, 0.0);
        assert_eq!(summary.hang_time_s, 0.0);
    }

    #[test]
    fn nan_exit_velocity_does_not_panic() {
        let summary = fly(&ball(f32::NAN, 20.0, 0.0), &Weather::default(), &ParkGeometry::default());
        assert!(summary.distance_m >= 0.0);
        assert!(summary.hang_time_s >= 0.0);
    }

    #[test]
    fn barrel_leaves_the_park() {
        let summary = fly(&ball(180.0, 28.0, 0.0), &Weather::default(), &ParkGeometry::default());
        assert_eq!(summary.hit_result, HitResult::HomeRun);
        assert!(summary.distance_m > summary.fence_distance_m);
        assert!(summary.hang_time_s > 4.0);
    }

    #[test]
    fn routine_fly_stays_in_park() {
        let summary = fly(&ball(135.0, 32.0, 10.0), &Weather::default(), &ParkGeometry::default());
        assert!(summary.distance_m > 40.0 && summary.distance_m < summary.fence_distance_m);
        assert!(!matches!(summary.hit_result, HitResult::HomeRun));
    }

    #[test]
    fn tailwind_carries_farther() {
        let calm = fly(&ball(150.0, 30.0, 0.0), &Weather::default(), &ParkGeometry::default());
        let blowing_out = Weather { wind_y: 8.0, ..Weather::default() };
        let windy = fly(&ball(150.0, 30.0, 0.0), &blowing_out, &ParkGeometry::default());
        assert!(windy.distance_m > calm.distance_m);
    }

    #[test]
    fn thin_air_carries_farther() {
        let sea = fly(&ball(150.0, 30.0, 0.0), &Weather::default(), &ParkGeometry::default());
        let high = Weather { altitude_m: 1600.0, ..Weather::default() };
        let mile_high = fly(&ball(150.0, 30.0, 0.0), &high, &ParkGeometry::default());
        assert!(mile_high.distance_m > sea.distance_m);
    }

    #[test]
    fn backspin_beats_no_spin() {
        let with_spin = ball(150.0, 28.0, 0.0);
        let no_spin = BattedBallDescriptor { spin_rate_rpm: 0.0, ..with_spin.clone() };
        let weather = Weather::default();
        let lifted = integrate(&with_spin, &weather, 500.0, 3.0);
        let flat = integrate(&no_spin, &weather, 500.0, 3.0);
        assert!(lifted.distance_m > flat.distance_m);
        assert!(lifted.hang_time_s > flat.hang_time_s);
    }

    #[test]
    fn low_liner_off_the_wall_is_double() {
        let park = ParkGeometry { fence_height_m: 12.0, ..ParkGeometry::default() };
        let summary = fly(&ball(185.0, 18.0, 0.0), &Weather::default(), &park);
        assert_eq!(summary.hit_result, HitResult::Double);
        assert_eq!(summary.distance_m, summary.fence_distance_m);
    }

    #[test]
    fn grounder_classification() {
        let flight = Flight { distance_m: 5.0, hang_time_s: 0.3, fence_crossing_height_m: None };
        assert_eq!(classify(&ball(160.0, -2.0, 12.0), &flight, 3.0), HitResult::Single);
        assert_eq!(classify(&ball(125.0, -2.0, 0.0), &flight, 3.0), HitResult::Single);
        assert_eq!(classify(&ball(125.0, -2.0, 12.0), &flight, 3.0), HitResult::Groundout);
        let roller = BattedBallDescriptor { contact_quality: 0.1, ..ball(65.0, -2.0, 12.0) };
        assert_eq!(classify(&roller, &flight, 3.0), HitResult::InfieldHit);
    }

    #[test]
    fn outfield_carry_bands() {
        let at = |d: f32| Flight { distance_m: d, hang_time_s: 4.0, fence_crossing_height_m: None };
        let fly_ball = ball(140.0, 30.0, 5.0);
        assert_eq!(classify(&fly_ball, &at(25.0), 3.0), HitResult::Flyout);
        assert_eq!(classify(&fly_ball, &at(50.0), 3.0), HitResult::Single);
        assert_eq!(classify(&fly_ball, &at(80.0), 3.0), HitResult::Double);
        assert_eq!(classify(&fly_ball, &at(110.0), 3.0), HitResult::Double);
        let corner = ball(140.0, 30.0, -30.0);
        assert_eq!(classify(&corner, &at(110.0), 3.0), HitResult::Triple);
        assert_eq!(classify(&ball(110.0, 15.0, 0.0), &at(20.0), 3.0), HitResult::Lineout);
        assert_eq!(classify(&ball(150.0, 15.0, 0.0), &at(20.0), 3.0), HitResult::Single);
    }

    #[test]
    fn popups_are_outs() {
        let flight = Flight { distance_m: 35.0, hang_time_s: 6.0, fence_crossing_height_m: None };
        assert_eq!(classify(&ball(120.0, 60.0, 0.0), &flight, 3.0), HitResult::Flyout);
    }

    #[test]
    fn integration_never_goes_negative() {
        for ev in [60.0, 100.0, 140.0, 193.0] {
            for la in [-15.0, 0.0, 10.0, 30.0, 65.0] {
                let f = integrate(&ball(ev, la, 0.0), &Weather::default(), 122.0, 3.0);
                assert!(f.distance_m >= 0.0 && f.hang_time_s >= 0.0, "ev {ev} la {la}");
            }
        }
    }
}
