//! # bb_core - Deterministic Baseball Game Simulation Engine
//!
//! Simulates batted-ball flight, resolves plate appearances from player
//! ratings, and drives a full game through the half-inning state machine,
//! with a JSON API for front ends.
//!
//! ## Features
//! - Deterministic: same seed and inputs give the same game, play for play
//! - Drag/Magnus flight model against park fences, wind and air density
//! - Outfield defense, double plays, sacrifice flies, bunts, fielding errors
//! - Bullpen management and walk-off / mercy / extra-innings termination
//! - Per-player stat deltas and box-score lines instead of season writes

// Game engine APIs often take many physics/state parameters
#![allow(clippy::too_many_arguments)]
// Loop style - can fix incrementally
#![allow(clippy::needless_range_loop)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;

pub use api::{simulate_game, simulate_game_json, GameRequest, SCHEMA_VERSION};
pub use config::{BullpenPolicy, ContactQualityShape, EngineConfig, MercyRule};
pub use engine::{GameEngine, GamePlan, GameRng, RandomSource};
pub use error::{GameError, Result};
pub use models::{
    AtBatOutcome, AtBatRecord, GameEndReason, GameResult, ParkGeometry, Player, PlayerRatings,
    Side, TeamSheet, Weather, WeatherKind,
};
