use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable player identity used to key stat deltas.
pub type PlayerId = u32;

/// Lowest and highest value of the 1-20 rating scale.
pub const RATING_MIN: f32 = 1.0;
pub const RATING_MAX: f32 = 20.0;
/// League-average rating.
pub const RATING_AVERAGE: f32 = 10.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    P,
    C,
    #[serde(rename = "1B")]
    FirstBase,
    #[serde(rename = "2B")]
    SecondBase,
    #[serde(rename = "3B")]
    ThirdBase,
    SS,
    LF,
    CF,
    RF,
    DH,
}

impl Position {
    pub fn is_outfield(self) -> bool {
        matches!(self, Position::LF | Position::CF | Position::RF)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Position::P => "P",
            Position::C => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::SS => "SS",
            Position::LF => "LF",
            Position::CF => "CF",
            Position::RF => "RF",
            Position::DH => "DH",
        };
        write!(f, "{}", label)
    }
}

/// Bullpen role; drives which pitcher the staff manager brings in late.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PitcherRole {
    #[default]
    Starter,
    Reliever,
    Closer,
}

/// Situational abilities carried as signed probability deltas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SituationalAbility {
    /// Batter: contact-quality bonus in clutch situations.
    Clutch,
    /// Batter: exit-velocity multiplier delta.
    PowerHitter,
    /// Batter: strikeout avoidance.
    ContactHitter,
    /// Batter: walk-rate delta.
    Patient,
    /// Pitcher: contact-quality suppression in clutch situations.
    Pinch,
    /// Pitcher: strikeout-rate delta.
    Strikeout,
    /// Pitcher: walk-rate delta.
    WildPitch,
}

/// Read-only rating snapshot supplied by the roster provider.
///
/// All core ratings use the 1-20 scale. Nothing in the engine writes to a
/// snapshot; use [`PlayerRatings::sanitized`] to get a clamped copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerRatings {
    pub contact: f32,
    pub power: f32,
    /// Pitch velocity.
    pub speed: f32,
    pub control: f32,
    pub breaking: f32,
    pub stamina: f32,
    /// Running speed.
    pub run: f32,
    pub fielding: f32,
    pub arm: f32,
    /// Trajectory profile 1 (low liners) ..= 4 (high fly balls).
    pub trajectory: u8,
    /// Pull tendency -10 (opposite field) ..= 10 (dead pull).
    pub pull: f32,
    /// Day-to-day condition multiplier, 1.0 = normal.
    pub condition: f32,
    pub abilities: BTreeMap<SituationalAbility, f32>,
}

impl Default for PlayerRatings {
    fn default() -> Self {
        Self::league_average()
    }
}

impl PlayerRatings {
    pub fn league_average() -> Self {
        Self {
            contact: RATING_AVERAGE,
            power: RATING_AVERAGE,
            speed: RATING_AVERAGE,
            control: RATING_AVERAGE,
            breaking: RATING_AVERAGE,
            stamina: RATING_AVERAGE,
            run: RATING_AVERAGE,
            fielding: RATING_AVERAGE,
            arm: RATING_AVERAGE,
            trajectory: 2,
            pull: 0.0,
            condition: 1.0,
            abilities: BTreeMap::new(),
        }
    }

    /// Copy with every value pulled back into its valid range.
    ///
    /// Non-finite values fall back to league average rather than failing, so a
    /// bad upstream generator cannot stop a game in progress.
    pub fn sanitized(&self) -> Self {
        fn rating(value: f32) -> f32 {
            if value.is_finite() {
                value.clamp(RATING_MIN, RATING_MAX)
            } else {
                RATING_AVERAGE
            }
        }

        let abilities = self
            .abilities
            .iter()
            .map(|(ability, delta)| {
                let delta = if delta.is_finite() { delta.clamp(-0.5, 0.5) } else { 0.0 };
                (*ability, delta)
            })
            .collect();

        Self {
            contact: rating(self.contact),
            power: rating(self.power),
            speed: rating(self.speed),
            control: rating(self.control),
            breaking: rating(self.breaking),
            stamina: rating(self.stamina),
            run: rating(self.run),
            fielding: rating(self.fielding),
            arm: rating(self.arm),
            trajectory: self.trajectory.clamp(1, 4),
            pull: if self.pull.is_finite() { self.pull.clamp(-10.0, 10.0) } else { 0.0 },
            condition: if self.condition.is_finite() {
                self.condition.clamp(0.7, 1.3)
            } else {
                1.0
            },
            abilities,
        }
    }

    /// Signed delta for an ability, 0.0 when the player does not have it.
    #[inline]
    pub fn ability(&self, ability: SituationalAbility) -> f32 {
        self.abilities.get(&ability).copied().unwrap_or(0.0)
    }

    pub fn with_ability(mut self, ability: SituationalAbility, delta: f32) -> Self {
        self.abilities.insert(ability, delta);
        self
    }
}

/// Normalize a 1-20 rating to 0.0..=1.0.
#[inline]
pub fn normalize(rating: f32) -> f32 {
    ((rating - RATING_MIN) / (RATING_MAX - RATING_MIN)).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitcher_role: Option<PitcherRole>,
    #[serde(default)]
    pub ratings: PlayerRatings,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            pitcher_role: if position == Position::P { Some(PitcherRole::Starter) } else { None },
            ratings: PlayerRatings::league_average(),
        }
    }

    pub fn with_ratings(mut self, ratings: PlayerRatings) -> Self {
        self.ratings = ratings;
        self
    }

    pub fn with_role(mut self, role: PitcherRole) -> Self {
        self.pitcher_role = Some(role);
        self
    }

    pub fn is_pitcher(&self) -> bool {
        self.position == Position::P
    }

    /// Role used by the bullpen policy; pitchers default to starter.
    pub fn role(&self) -> PitcherRole {
        self.pitcher_role.unwrap_or_default()
    }
}
