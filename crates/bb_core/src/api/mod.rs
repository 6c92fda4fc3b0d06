pub mod json_api;

pub use json_api::{simulate_game, simulate_game_json, GameRequest, SCHEMA_VERSION};
