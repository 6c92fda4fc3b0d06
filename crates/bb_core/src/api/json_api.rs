//! JSON entry point: request in, serialized [`GameResult`] out.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::game_loop::{GameEngine, GamePlan};
use crate::error::{GameError, Result};
use crate::models::{GameResult, ParkGeometry, TeamSheet, Weather};

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub home: TeamSheet,
    pub away: TeamSheet,
    #[serde(default)]
    pub weather: Weather,
    #[serde(default)]
    pub park: ParkGeometry,
    /// Falls back to the `BB_ENGINE_CONFIG` file, then to defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EngineConfig>,
}

impl GameRequest {
    pub fn into_plan(self) -> Result<GamePlan> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(GameError::UnsupportedSchema { found: self.schema_version, expected: SCHEMA_VERSION });
        }
        let config = match self.config {
            Some(config) => config,
            None => EngineConfig::from_env()?.unwrap_or_default(),
        };
        Ok(GamePlan {
            seed: self.seed,
            home: self.home,
            away: self.away,
            weather: self.weather,
            park: self.park,
            config,
        })
    }
}

pub fn simulate_game(request: GameRequest) -> Result<GameResult> {
    let engine = GameEngine::new(request.into_plan()?)?;
    Ok(engine.run())
}

pub fn simulate_game_json(request_json: &str) -> Result<String> {
    let request: GameRequest = serde_json::from_str(request_json)?;
    let result = simulate_game(request)?;
    Ok(serde_json::to_string(&result)?)
}
