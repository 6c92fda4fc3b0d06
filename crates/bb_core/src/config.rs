//! Engine tuning constants.
//!
//! Tuned against league rate targets (ground-ball/fly-ball/line-drive mix,
//! walk and strikeout rates). Override from JSON/YAML or `BB_ENGINE_CONFIG`.

use serde::{Deserialize, Serialize};
use std::{env, fs};

use crate::error::{GameError, Result};

pub const ENGINE_CONFIG_PATH_ENV: &str = "BB_ENGINE_CONFIG";

/// Beta distribution shape for contact quality, as a linear function of the
/// batter's contact rating.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContactQualityShape {
    pub alpha_base: f32,
    pub alpha_per_contact: f32,
    pub beta_base: f32,
    pub beta_per_contact: f32,
    pub beta_floor: f32,
}

impl Default for ContactQualityShape {
    fn default() -> Self {
        Self {
            alpha_base: 2.0,
            alpha_per_contact: 0.15,
            beta_base: 3.5,
            beta_per_contact: 0.05,
            beta_floor: 1.5,
        }
    }
}

impl ContactQualityShape {
    /// (alpha, beta) for a contact rating on the 1-20 scale.
    pub fn params(&self, contact: f32) -> (f32, f32) {
        let alpha = self.alpha_base + contact * self.alpha_per_contact;
        let beta = (self.beta_base - contact * self.beta_per_contact).max(self.beta_floor);
        (alpha, beta)
    }
}

/// Called-game rule: the game ends once a side leads by `run_lead` after
/// `from_inning` complete innings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MercyRule {
    pub from_inning: u8,
    pub run_lead: u16,
}

/// Pitcher substitution thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BullpenPolicy {
    pub pitch_count_threshold: u32,
    pub pitch_count_pull_probability: f32,
    pub reliever_from_inning: u8,
    pub reliever_probability: f32,
    pub closer_inning: u8,
    pub closer_probability: f32,
}

impl Default for BullpenPolicy {
    fn default() -> Self {
        Self {
            pitch_count_threshold: 100,
            pitch_count_pull_probability: 0.7,
            reliever_from_inning: 7,
            reliever_probability: 0.5,
            closer_inning: 9,
            closer_probability: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Airborne balls must carry past this distance (m) before an outfielder
    /// is asked to make a play.
    pub defense_min_distance_m: f32,
    pub contact_quality: ContactQualityShape,
    pub hit_by_pitch_probability: f32,
    pub base_error_rate: f32,
    /// Double-play probability at the reference exit velocity.
    pub double_play_base: f32,
    pub fielders_choice_probability: f32,
    pub sac_fly_probability: f32,
    pub sac_fly_min_hang_time_s: f32,
    pub regulation_innings: u8,
    pub max_innings: u8,
    pub mercy_rule: Option<MercyRule>,
    pub bullpen: BullpenPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            defense_min_distance_m: 40.0,
            contact_quality: ContactQualityShape::default(),
            hit_by_pitch_probability: 0.008,
            base_error_rate: 0.015,
            double_play_base: 0.45,
            fielders_choice_probability: 0.35,
            sac_fly_probability: 0.65,
            sac_fly_min_hang_time_s: 3.5,
            regulation_innings: 9,
            max_innings: 12,
            mercy_rule: None,
            bullpen: BullpenPolicy::default(),
        }
    }
}

fn check_probability(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GameError::InvalidConfig(format!("{name} must be within 0..=1, got {value}")))
    }
}

impl EngineConfig {
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by `BB_ENGINE_CONFIG`, if set.
    ///
    /// Returns `Ok(None)` when the variable is unset or blank. `.yaml`/`.yml`
    /// files are parsed as YAML, anything else as JSON.
    pub fn from_env() -> Result<Option<Self>> {
        let Ok(path) = env::var(ENGINE_CONFIG_PATH_ENV) else {
            return Ok(None);
        };
        let path = path.trim();
        if path.is_empty() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let config = if path.ends_with(".yaml") || path.ends_with(".yml") {
            Self::from_yaml(&content)?
        } else {
            Self::from_json(&content)?
        };
        log::info!("Engine config loaded from {}", path);
        Ok(Some(config))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.defense_min_distance_m.is_finite() && self.defense_min_distance_m >= 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "defense_min_distance_m must be a non-negative number, got {}",
                self.defense_min_distance_m
            )));
        }
        let shape = &self.contact_quality;
        if shape.alpha_base <= 0.0 || shape.beta_floor <= 0.0 {
            return Err(GameError::InvalidConfig(
                "contact_quality alpha_base and beta_floor must be positive".to_string(),
            ));
        }

        check_probability("hit_by_pitch_probability", self.hit_by_pitch_probability)?;
        check_probability("base_error_rate", self.base_error_rate)?;
        check_probability("double_play_base", self.double_play_base)?;
        check_probability("fielders_choice_probability", self.fielders_choice_probability)?;
        check_probability("sac_fly_probability", self.sac_fly_probability)?;
        check_probability("bullpen.pitch_count_pull_probability", self.bullpen.pitch_count_pull_probability)?;
        check_probability("bullpen.reliever_probability", self.bullpen.reliever_probability)?;
        check_probability("bullpen.closer_probability", self.bullpen.closer_probability)?;

        if self.regulation_innings == 0 {
            return Err(GameError::InvalidConfig("regulation_innings must be at least 1".to_string()));
        }
        if self.max_innings < self.regulation_innings {
            return Err(GameError::InvalidConfig(format!(
                "max_innings ({}) must be >= regulation_innings ({})",
                self.max_innings, self.regulation_innings
            )));
        }
        if let Some(mercy) = self.mercy_rule {
            if mercy.run_lead == 0 || mercy.from_inning == 0 {
                return Err(GameError::InvalidConfig(
                    "mercy_rule needs a positive from_inning and run_lead".to_string(),
                ));
            }
        }
        Ok(())
    }
}
