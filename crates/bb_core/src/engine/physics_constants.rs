//! Physics constants for batted-ball flight and fielding.
//!
//! SI units throughout except exit velocity, which is carried in km/h to match
//! broadcast conventions. Conversions live next to the values that need them.

// ============================================================
// Ball
// ============================================================
pub mod ball {
    /// Regulation ball mass (kg)
    pub const MASS_KG: f32 = 0.145;

    /// Regulation ball radius (m)
    pub const RADIUS_M: f32 = 0.0365;

    /// Cross-sectional area (m²), π r²
    pub const AREA_M2: f32 = std::f32::consts::PI * RADIUS_M * RADIUS_M;

    /// Drag coefficient for a spinning baseball at typical game speeds
    pub const DRAG_COEFF: f32 = 0.40;

    /// Lift coefficient vs spin factor S = rω/v:
    /// `1.5 S` up to the knee, `0.09 + 0.6 S` above it, capped.
    pub const LIFT_KNEE_SPIN_FACTOR: f32 = 0.1;
    pub const LIFT_LOW_SLOPE: f32 = 1.5;
    pub const LIFT_HIGH_INTERCEPT: f32 = 0.09;
    pub const LIFT_HIGH_SLOPE: f32 = 0.6;
    pub const LIFT_COEFF_MAX: f32 = 0.35;

    /// Contact height above the ground (m)
    pub const CONTACT_HEIGHT_M: f32 = 1.0;
}

// ============================================================
// Atmosphere
// ============================================================
pub mod atmosphere {
    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f32 = 9.8;

    /// Air density at sea level, 15 °C, 50 % humidity (kg/m³)
    pub const SEA_LEVEL_DENSITY: f32 = 1.225;

    pub const REFERENCE_TEMPERATURE_C: f32 = 15.0;
    pub const REFERENCE_HUMIDITY_PCT: f32 = 50.0;
    pub const ZERO_C_KELVIN: f32 = 273.15;

    /// Density scale height for the barometric approximation (m)
    pub const SCALE_HEIGHT_M: f32 = 8500.0;

    /// Relative density change per 50 % humidity away from reference
    pub const HUMIDITY_COEFF: f32 = 0.0012;
}

// ============================================================
// Integration
// ============================================================
pub mod integration {
    /// Euler step (s)
    pub const DT_S: f32 = 0.01;

    /// Flights longer than this are cut off (s)
    pub const MAX_FLIGHT_S: f32 = 15.0;

    /// Below this exit speed (m/s) the ball is treated as dribbled in front of the plate
    pub const MIN_FLIGHT_SPEED_MPS: f32 = 0.5;
}

// ============================================================
// Field geometry
// ============================================================
pub mod field {
    /// Default fence distance straightaway center (m)
    pub const FENCE_CENTER_M: f32 = 122.0;

    /// Default fence distance down the lines (m)
    pub const FENCE_CORNER_M: f32 = 100.0;

    /// Default fence height (m)
    pub const FENCE_HEIGHT_M: f32 = 3.0;

    /// Spray angle of the foul lines (deg)
    pub const FOUL_LINE_DEG: f32 = 45.0;

    /// Anything landing short of this is played by the infield (m)
    pub const INFIELD_DEPTH_M: f32 = 30.0;
}

// ============================================================
// Exit velocity and launch
// ============================================================
pub mod launch {
    /// Global exit velocity clamp (km/h)
    pub const EXIT_VELOCITY_MIN_KMH: f32 = 60.0;
    pub const EXIT_VELOCITY_MAX_KMH: f32 = 193.0;

    /// Launch angle clamp (deg)
    pub const LAUNCH_ANGLE_MIN_DEG: f32 = -15.0;
    pub const LAUNCH_ANGLE_MAX_DEG: f32 = 65.0;

    /// Spray angle clamp (deg), negative = pull side
    pub const SPRAY_ANGLE_LIMIT_DEG: f32 = 45.0;

    /// Spin rate clamp (rpm)
    pub const SPIN_MIN_RPM: f32 = 500.0;
    pub const SPIN_MAX_RPM: f32 = 3500.0;

    /// Hit-type band upper bounds (deg): ground < 10 <= line < 25 <= fly < 50 <= popup
    pub const GROUND_MAX_DEG: f32 = 10.0;
    pub const LINE_MAX_DEG: f32 = 25.0;
    pub const FLY_MAX_DEG: f32 = 50.0;

    pub const KMH_TO_MPS: f32 = 1.0 / 3.6;
}

// ============================================================
// Outfield
// ============================================================
pub mod outfield {
    /// Nominal depth of the corner outfielders (m) and their spray angle (deg)
    pub const CORNER_DEPTH_M: f32 = 88.0;
    pub const CORNER_ANGLE_DEG: f32 = 28.0;

    /// Nominal depth of the center fielder (m)
    pub const CENTER_DEPTH_M: f32 = 95.0;

    /// Spray angle beyond which the corner outfielder takes the ball (deg)
    pub const CORNER_ZONE_DEG: f32 = 15.0;

    /// Sprint speed (m/s) = BASE + run/20 × RANGE
    pub const SPRINT_BASE_MPS: f32 = 5.0;
    pub const SPRINT_RANGE_MPS: f32 = 4.5;

    /// First-step delay (s) = BASE - fielding/20 × RANGE
    pub const REACTION_BASE_S: f32 = 0.5;
    pub const REACTION_RANGE_S: f32 = 0.25;

    /// Fraction of the fence distance at which a catch counts as at the wall
    pub const WALL_ZONE_FRACTION: f32 = 0.95;

    /// Arm rating below which runners take an extra base on a ball not caught
    pub const WEAK_ARM: f32 = 8.0;
}
