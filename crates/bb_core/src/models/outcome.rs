//! Shared outcome vocabulary for the physics, defense, at-bat and inning layers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::physics_constants::launch;

// ============================================================================
// Batted ball
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HitType {
    Ground,
    Line,
    Fly,
    Popup,
}

impl HitType {
    /// Band classification; depends on nothing but the launch angle.
    pub fn from_launch_angle(launch_angle_deg: f32) -> Self {
        if launch_angle_deg < launch::GROUND_MAX_DEG {
            HitType::Ground
        } else if launch_angle_deg < launch::LINE_MAX_DEG {
            HitType::Line
        } else if launch_angle_deg < launch::FLY_MAX_DEG {
            HitType::Fly
        } else {
            HitType::Popup
        }
    }
}

/// One batted ball, as it leaves the bat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BattedBallDescriptor {
    pub exit_velocity_kmh: f32,
    pub launch_angle_deg: f32,
    /// Negative = pull side.
    pub spray_angle_deg: f32,
    pub spin_rate_rpm: f32,
    pub spin_axis_deg: f32,
    pub contact_quality: f32,
    pub hit_type: HitType,
}

impl BattedBallDescriptor {
    /// Build with the hit type derived from the launch angle.
    pub fn new(
        exit_velocity_kmh: f32,
        launch_angle_deg: f32,
        spray_angle_deg: f32,
        spin_rate_rpm: f32,
        spin_axis_deg: f32,
        contact_quality: f32,
    ) -> Self {
        Self {
            exit_velocity_kmh,
            launch_angle_deg,
            spray_angle_deg,
            spin_rate_rpm,
            spin_axis_deg,
            contact_quality,
            hit_type: HitType::from_launch_angle(launch_angle_deg),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HitResult {
    Groundout,
    Flyout,
    Lineout,
    InfieldHit,
    Single,
    Double,
    Triple,
    HomeRun,
}

impl HitResult {
    pub fn is_out(self) -> bool {
        matches!(self, HitResult::Groundout | HitResult::Flyout | HitResult::Lineout)
    }

    /// One base further, capped at a triple. Home runs are left alone.
    pub fn extra_base(self) -> Self {
        match self {
            HitResult::InfieldHit | HitResult::Single => HitResult::Double,
            HitResult::Double | HitResult::Triple => HitResult::Triple,
            other => other,
        }
    }
}

/// Result of integrating one flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FlightSummary {
    pub hit_result: HitResult,
    pub distance_m: f32,
    pub hang_time_s: f32,
    /// Fence distance on this spray line.
    pub fence_distance_m: f32,
}

// ============================================================================
// Defense
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Fielder {
    LeftField,
    CenterField,
    RightField,
}

impl Fielder {
    /// Index into an `[LF, CF, RF]` ratings array.
    pub fn slot(self) -> usize {
        match self {
            Fielder::LeftField => 0,
            Fielder::CenterField => 1,
            Fielder::RightField => 2,
        }
    }
}

impl fmt::Display for Fielder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Fielder::LeftField => write!(f, "left fielder"),
            Fielder::CenterField => write!(f, "center fielder"),
            Fielder::RightField => write!(f, "right fielder"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefenseOutcome {
    pub caught: bool,
    pub fielder: Fielder,
    pub diving_catch: bool,
    pub wall_catch: bool,
    pub description: String,
    /// Required speed over available speed; above 1.0 the ball is out of reach.
    pub catch_difficulty: f32,
    /// A weak arm let the batter take one more base.
    pub extra_base: bool,
}

impl DefenseOutcome {
    /// The fielder got to the ball but an error put the batter on base.
    pub fn dropped(mut self) -> Self {
        self.caught = false;
        self.diving_catch = false;
        self.wall_catch = false;
        self.extra_base = false;
        self.description = format!("The {} drops it, batter safe on the error", self.fielder);
        self
    }
}

// ============================================================================
// At-bat
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AtBatOutcome {
    HomeRun,
    Triple,
    Double,
    Single,
    InfieldSingle,
    BuntHit,
    Walk,
    HitByPitch,
    StrikeoutSwinging,
    StrikeoutLooking,
    Groundout,
    Flyout,
    Lineout,
    Popout,
    DoublePlay,
    SacrificeFly,
    SacrificeBunt,
    ReachedOnError,
    FieldersChoice,
}

impl AtBatOutcome {
    pub fn is_hit(self) -> bool {
        matches!(
            self,
            AtBatOutcome::HomeRun
                | AtBatOutcome::Triple
                | AtBatOutcome::Double
                | AtBatOutcome::Single
                | AtBatOutcome::InfieldSingle
                | AtBatOutcome::BuntHit
        )
    }

    pub fn is_strikeout(self) -> bool {
        matches!(self, AtBatOutcome::StrikeoutSwinging | AtBatOutcome::StrikeoutLooking)
    }

    /// Walks, hit-by-pitches and sacrifices are plate appearances but not at-bats.
    pub fn counts_as_at_bat(self) -> bool {
        !matches!(
            self,
            AtBatOutcome::Walk
                | AtBatOutcome::HitByPitch
                | AtBatOutcome::SacrificeFly
                | AtBatOutcome::SacrificeBunt
        )
    }

    pub fn total_bases(self) -> u8 {
        match self {
            AtBatOutcome::HomeRun => 4,
            AtBatOutcome::Triple => 3,
            AtBatOutcome::Double => 2,
            AtBatOutcome::Single | AtBatOutcome::InfieldSingle | AtBatOutcome::BuntHit => 1,
            _ => 0,
        }
    }

    /// Template key handed to the commentary collaborator.
    pub fn description_key(self) -> &'static str {
        match self {
            AtBatOutcome::HomeRun => "home_run",
            AtBatOutcome::Triple => "triple",
            AtBatOutcome::Double => "double",
            AtBatOutcome::Single => "single",
            AtBatOutcome::InfieldSingle => "infield_single",
            AtBatOutcome::BuntHit => "bunt_hit",
            AtBatOutcome::Walk => "walk",
            AtBatOutcome::HitByPitch => "hit_by_pitch",
            AtBatOutcome::StrikeoutSwinging => "strikeout_swinging",
            AtBatOutcome::StrikeoutLooking => "strikeout_looking",
            AtBatOutcome::Groundout => "groundout",
            AtBatOutcome::Flyout => "flyout",
            AtBatOutcome::Lineout => "lineout",
            AtBatOutcome::Popout => "popout",
            AtBatOutcome::DoublePlay => "double_play",
            AtBatOutcome::SacrificeFly => "sacrifice_fly",
            AtBatOutcome::SacrificeBunt => "sacrifice_bunt",
            AtBatOutcome::ReachedOnError => "reached_on_error",
            AtBatOutcome::FieldersChoice => "fielders_choice",
        }
    }
}

impl From<HitResult> for AtBatOutcome {
    fn from(result: HitResult) -> Self {
        match result {
            HitResult::Groundout => AtBatOutcome::Groundout,
            HitResult::Flyout => AtBatOutcome::Flyout,
            HitResult::Lineout => AtBatOutcome::Lineout,
            HitResult::InfieldHit => AtBatOutcome::InfieldSingle,
            HitResult::Single => AtBatOutcome::Single,
            HitResult::Double => AtBatOutcome::Double,
            HitResult::Triple => AtBatOutcome::Triple,
            HitResult::HomeRun => AtBatOutcome::HomeRun,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Base {
    Batter,
    First,
    Second,
    Third,
    Home,
}

impl Base {
    /// Runner-slot index for First/Second/Third.
    pub fn slot(self) -> Option<usize> {
        match self {
            Base::First => Some(0),
            Base::Second => Some(1),
            Base::Third => Some(2),
            Base::Batter | Base::Home => None,
        }
    }

    pub fn from_slot(slot: usize) -> Self {
        match slot {
            0 => Base::First,
            1 => Base::Second,
            _ => Base::Third,
        }
    }
}

/// One runner's fate on a play. Movements are listed lead runner first, so
/// applying them in order never lands two runners on one base.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BaseMovement {
    Advance { from: Base, to: Base },
    PutOut { from: Base },
}

impl BaseMovement {
    pub fn scores(&self) -> bool {
        matches!(self, BaseMovement::Advance { to: Base::Home, .. })
    }

    pub fn is_out(&self) -> bool {
        matches!(self, BaseMovement::PutOut { .. })
    }
}

/// Everything one plate appearance produced, computed from the pre-play state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AtBatRecord {
    pub outcome: AtBatOutcome,
    pub runs_scored: u8,
    pub outs_recorded: u8,
    pub movements: Vec<BaseMovement>,
    pub pitch_count: u8,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batted_ball: Option<BattedBallDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<FlightSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense: Option<DefenseOutcome>,
}

impl AtBatRecord {
    /// Build a record; runs and outs are derived from `movements`.
    pub fn new(outcome: AtBatOutcome, movements: Vec<BaseMovement>, pitch_count: u8) -> Self {
        let runs_scored = movements.iter().filter(|m| m.scores()).count() as u8;
        let outs_recorded = movements.iter().filter(|m| m.is_out()).count() as u8;
        Self {
            outcome,
            runs_scored,
            outs_recorded,
            movements,
            pitch_count,
            description: outcome.description_key().to_string(),
            batted_ball: None,
            flight: None,
            defense: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_type_bands() {
        assert_eq!(HitType::from_launch_angle(-15.0), HitType::Ground);
        assert_eq!(HitType::from_launch_angle(9.9), HitType::Ground);
        assert_eq!(HitType::from_launch_angle(10.0), HitType::Line);
        assert_eq!(HitType::from_launch_angle(24.9), HitType::Line);
        assert_eq!(HitType::from_launch_angle(25.0), HitType::Fly);
        assert_eq!(HitType::from_launch_angle(50.0), HitType::Popup);
    }

    #[test]
    fn sacrifices_are_not_at_bats() {
        assert!(!AtBatOutcome::SacrificeFly.counts_as_at_bat());
        assert!(!AtBatOutcome::Walk.counts_as_at_bat());
        assert!(AtBatOutcome::FieldersChoice.counts_as_at_bat());
        assert!(AtBatOutcome::ReachedOnError.counts_as_at_bat());
        assert!(!AtBatOutcome::ReachedOnError.is_hit());
    }

    #[test]
    fn record_counts_runs_and_outs_from_movements() {
        let record = AtBatRecord::new(
            AtBatOutcome::SacrificeFly,
            vec![
                BaseMovement::Advance { from: Base::Third, to: Base::Home },
                BaseMovement::PutOut { from: Base::Batter },
            ],
            4,
        );
        assert_eq!(record.runs_scored, 1);
        assert_eq!(record.outs_recorded, 1);
        assert_eq!(record.description, "sacrifice_fly");
    }

    #[test]
    fn extra_base_caps_at_triple() {
        assert_eq!(HitResult::Single.extra_base(), HitResult::Double);
        assert_eq!(HitResult::Triple.extra_base(), HitResult::Triple);
        assert_eq!(HitResult::HomeRun.extra_base(), HitResult::HomeRun);
    }

    #[test]
    fn movement_serde_is_tagged() {
        let json = serde_json::to_string(&BaseMovement::PutOut { from: Base::First }).unwrap();
        assert_eq!(json, r#"{"kind":"put_out","from":"first"}"#);
    }
}
