use thiserror::Error;

use crate::models::Side;

/// Errors surfaced by the engine.
///
/// Everything here is a fail-fast precondition failure raised before the first
/// pitch. Once a game is running nothing in the engine returns an error:
/// out-of-range ratings are clamped and missing defensive data falls back to
/// league-average values.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid lineup for {side}: expected {expected} batters, found {found}")]
    InvalidLineupSize { side: Side, expected: usize, found: usize },

    #[error("Lineup slot {slot} for {side} points at roster index {index}, roster has {roster} players")]
    LineupIndexOutOfRange { side: Side, slot: usize, index: usize, roster: usize },

    #[error("Roster index {index} appears more than once in the {side} lineup")]
    DuplicateLineupEntry { side: Side, index: usize },

    #[error("No eligible pitcher for {side}: {reason}")]
    NoEligiblePitcher { side: Side, reason: String },

    #[error("Duplicate player id {id} across rosters")]
    DuplicatePlayerId { id: u32 },

    #[error("Invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("Unsupported schema version: found {found}, expected {expected}")]
    UnsupportedSchema { found: u8, expected: u8 },

    #[error("Config file error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GameError {
    /// True for roster/lineup/config problems the caller must fix before a
    /// game can start.
    pub fn is_configuration(&self) -> bool {
        match self {
            GameError::InvalidLineupSize { .. }
            | GameError::LineupIndexOutOfRange { .. }
            | GameError::DuplicateLineupEntry { .. }
            | GameError::NoEligiblePitcher { .. }
            | GameError::DuplicatePlayerId { .. }
            | GameError::InvalidConfig(_) => true,
            GameError::UnsupportedSchema { .. }
            | GameError::ConfigIo(_)
            | GameError::Yaml(_)
            | GameError::Serialization(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
