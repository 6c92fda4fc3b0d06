//! Weather and park inputs. Both are fixed at game start.

use serde::{Deserialize, Serialize};

use crate::engine::physics_constants::{atmosphere, field};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    #[default]
    Sunny,
    Cloudy,
    Rain,
    Dome,
    Windy,
    Hot,
    Cold,
}

impl WeatherKind {
    /// Added to the base fielding error rate.
    pub fn error_modifier(self) -> f32 {
        match self {
            WeatherKind::Sunny | WeatherKind::Dome => 0.0,
            WeatherKind::Cloudy | WeatherKind::Cold => 0.005,
            WeatherKind::Hot => 0.008,
            WeatherKind::Windy => 0.01,
            WeatherKind::Rain => 0.015,
        }
    }

    /// Multiplier on contact quality.
    pub fn hit_modifier(self) -> f32 {
        match self {
            WeatherKind::Sunny | WeatherKind::Dome => 1.0,
            WeatherKind::Cloudy => 0.98,
            WeatherKind::Rain => 0.92,
            WeatherKind::Windy => 1.02,
            WeatherKind::Hot => 0.97,
            WeatherKind::Cold => 0.95,
        }
    }
}

/// Wind is in m/s in field coordinates: +x toward the right-field line,
/// +y from home plate toward center field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Weather {
    pub kind: WeatherKind,
    pub wind_x: f32,
    pub wind_y: f32,
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub altitude_m: f32,
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            kind: WeatherKind::Sunny,
            wind_x: 0.0,
            wind_y: 0.0,
            temperature_c: atmosphere::REFERENCE_TEMPERATURE_C,
            humidity_pct: atmosphere::REFERENCE_HUMIDITY_PCT,
            altitude_m: 0.0,
        }
    }
}

/// `value` clamped to `low..=high`, or `fallback` when it is NaN or infinite.
fn bounded(value: f32, low: f32, high: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(low, high)
    } else {
        fallback
    }
}

impl Weather {
    /// Copy with every reading finite and physically plausible.
    pub fn sanitized(&self) -> Self {
        let reference = Weather::default();
        Self {
            kind: self.kind,
            wind_x: bounded(self.wind_x, -30.0, 30.0, 0.0),
            wind_y: bounded(self.wind_y, -30.0, 30.0, 0.0),
            temperature_c: bounded(self.temperature_c, -30.0, 50.0, reference.temperature_c),
            humidity_pct: bounded(self.humidity_pct, 0.0, 100.0, reference.humidity_pct),
            altitude_m: bounded(self.altitude_m, 0.0, 4000.0, 0.0),
        }
    }

    /// Air density (kg/m³) for the current temperature, altitude and humidity.
    pub fn air_density(&self) -> f32 {
        let temp_factor = (atmosphere::ZERO_C_KELVIN + atmosphere::REFERENCE_TEMPERATURE_C)
            / (atmosphere::ZERO_C_KELVIN + self.temperature_c.max(-40.0));
        let altitude_factor = (-self.altitude_m.max(0.0) / atmosphere::SCALE_HEIGHT_M).exp();
        let humidity_factor = 1.0
            - atmosphere::HUMIDITY_COEFF
                * (self.humidity_pct.clamp(0.0, 100.0) - atmosphere::REFERENCE_HUMIDITY_PCT)
                / atmosphere::REFERENCE_HUMIDITY_PCT;
        atmosphere::SEA_LEVEL_DENSITY * temp_factor * altitude_factor * humidity_factor
    }
}

/// Fence profile and park factors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParkGeometry {
    pub name: String,
    pub fence_center_m: f32,
    pub fence_corner_m: f32,
    pub fence_height_m: f32,
    /// Home-run factor; >1.0 plays shallower.
    pub hr_factor: f32,
    /// Multiplier on generated exit velocity.
    pub exit_velocity_factor: f32,
}

impl Default for ParkGeometry {
    fn default() -> Self {
        Self {
            name: "Neutral Park".to_string(),
            fence_center_m: field::FENCE_CENTER_M,
            fence_corner_m: field::FENCE_CORNER_M,
            fence_height_m: field::FENCE_HEIGHT_M,
            hr_factor: 1.0,
            exit_velocity_factor: 1.0,
        }
    }
}

impl ParkGeometry {
    /// Copy with a usable fence profile: corners no deeper than center, and
    /// park factors inside a plausible band.
    pub fn sanitized(&self) -> Self {
        let fence_center_m = bounded(self.fence_center_m, 60.0, 200.0, field::FENCE_CENTER_M);
        Self {
            name: self.name.clone(),
            fence_center_m,
            fence_corner_m: bounded(
                self.fence_corner_m,
                50.0,
                fence_center_m,
                field::FENCE_CORNER_M.min(fence_center_m),
            ),
            fence_height_m: bounded(self.fence_height_m, 0.5, 20.0, field::FENCE_HEIGHT_M),
            hr_factor: bounded(self.hr_factor, 0.5, 2.0, 1.0),
            exit_velocity_factor: bounded(self.exit_velocity_factor, 0.8, 1.2, 1.0),
        }
    }

    /// Fence distance along a spray angle. Deepest at center, linear to the
    /// foul lines, scaled by `1/sqrt(hr_factor)`.
    pub fn fence_distance(&self, spray_angle_deg: f32) -> f32 {
        let t = (spray_angle_deg.abs() / field::FOUL_LINE_DEG).min(1.0);
        let base = self.fence_center_m - (self.fence_center_m - self.fence_corner_m) * t;
        base / self.hr_factor.max(0.5).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_air_density() {
        let rho = Weather::default().air_density();
        assert!((rho - atmosphere::SEA_LEVEL_DENSITY).abs() < 1e-4);
    }

    #[test]
    fn thin_air_at_altitude() {
        let mile_high = Weather { altitude_m: 1600.0, ..Weather::default() };
        let hot = Weather { temperature_c: 35.0, ..Weather::default() };
        let base = Weather::default().air_density();
        assert!(mile_high.air_density() < base * 0.85);
        assert!(hot.air_density() < base);
    }

    #[test]
    fn center_field_is_deepest() {
        let park = ParkGeometry::default();
        assert_eq!(park.fence_distance(0.0), field::FENCE_CENTER_M);
        assert_eq!(park.fence_distance(-45.0), field::FENCE_CORNER_M);
        assert_eq!(park.fence_distance(60.0), field::FENCE_CORNER_M);
        assert!(park.fence_distance(20.0) < park.fence_distance(10.0));
    }

    #[test]
    fn hitter_park_plays_shallower() {
        let bandbox = ParkGeometry { hr_factor: 1.21, ..ParkGeometry::default() };
        assert!((bandbox.fence_distance(0.0) - field::FENCE_CENTER_M / 1.1).abs() < 1e-3);
    }

    #[test]
    fn broken_park_is_repaired() {
        let broken = ParkGeometry {
            fence_center_m: -5.0,
            fence_corner_m: f32::NAN,
            fence_height_m: 0.0,
            hr_factor: f32::INFINITY,
            exit_velocity_factor: 3.0,
            ..ParkGeometry::default()
        };
        let park = broken.sanitized();
        assert_eq!(park.fence_center_m, 60.0);
        assert_eq!(park.fence_corner_m, 60.0);
        assert_eq!(park.fence_height_m, 0.5);
        assert_eq!(park.hr_factor, 1.0);
        assert_eq!(park.exit_velocity_factor, 1.2);
        assert!(park.fence_distance(0.0) > 0.0);
        assert_eq!(ParkGeometry::default().sanitized(), ParkGeometry::default());
    }

    #[test]
    fn non_finite_weather_falls_back_to_calm_reference() {
        let storm = Weather { wind_x: f32::NAN, wind_y: 80.0, altitude_m: -100.0, ..Weather::default() };
        let weather = storm.sanitized();
        assert_eq!(weather.wind_x, 0.0);
        assert_eq!(weather.wind_y, 30.0);
        assert_eq!(weather.altitude_m, 0.0);
        assert!(weather.air_density().is_finite());
        assert_eq!(Weather::default().sanitized(), Weather::default());
    }

    #[test]
    fn rain_raises_error_rate() {
        assert!(WeatherKind::Rain.error_modifier() > WeatherKind::Sunny.error_modifier());
    }
}
