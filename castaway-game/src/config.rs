//! Run-wide tuning passed into the turn engine at construction.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ALERT_THRESHOLD, DAILY_EVENT_CHANCE, DECAY_ENERGY, DECAY_HUNGER, DECAY_THIRST, DEFAULT_NAME,
    GAUGE_MAX, START_ENERGY, START_HUNGER, START_THIRST, TARGET_DAYS,
};

/// Errors raised when configuration or table invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a probability between 0 and 1 (got {value:.2})")]
    Probability { field: &'static str, value: f32 },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: i32,
        max: i32,
        value: i32,
    },
    #[error("target days must be at least 1")]
    ZeroTargetDays,
    #[error("payout range for {id} is inverted (min {min} > max {max})")]
    PayoutBounds { id: String, min: i32, max: i32 },
    #[error("event {id} has invalid weight {weight}")]
    EventWeight { id: String, weight: f32 },
    #[error("choice event {id} needs at least two options including \"{default_key}\"")]
    ChoiceOptions {
        id: String,
        default_key: &'static str,
    },
    #[error("event table is empty but quiet chance is {quiet_chance:.2}")]
    EmptyTable { quiet_chance: f32 },
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

pub(crate) fn check_probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field, value })
    }
}

fn check_range(field: &'static str, value: i32, min: i32, max: i32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RangeViolation {
            field,
            min,
            max,
            value,
        })
    }
}

/// Per-day natural drain, expressed as positive amounts removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayCfg {
    #[serde(default = "DecayCfg::default_hunger")]
    pub hunger: i32,
    #[serde(default = "DecayCfg::default_thirst")]
    pub thirst: i32,
    #[serde(default = "DecayCfg::default_energy")]
    pub energy: i32,
}

impl DecayCfg {
    const fn default_hunger() -> i32 {
        DECAY_HUNGER
    }

    const fn default_thirst() -> i32 {
        DECAY_THIRST
    }

    const fn default_energy() -> i32 {
        DECAY_ENERGY
    }
}

impl Default for DecayCfg {
    fn default() -> Self {
        Self {
            hunger: Self::default_hunger(),
            thirst: Self::default_thirst(),
            energy: Self::default_energy(),
        }
    }
}

/// New-game values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCfg {
    #[serde(default = "StartCfg::default_name")]
    pub name: String,
    #[serde(default = "StartCfg::default_hunger")]
    pub hunger: i32,
    #[serde(default = "StartCfg::default_thirst")]
    pub thirst: i32,
    #[serde(default = "StartCfg::default_energy")]
    pub energy: i32,
}

impl StartCfg {
    fn default_name() -> String {
        DEFAULT_NAME.to_string()
    }

    const fn default_hunger() -> i32 {
        START_HUNGER
    }

    const fn default_thirst() -> i32 {
        START_THIRST
    }

    const fn default_energy() -> i32 {
        START_ENERGY
    }
}

impl Default for StartCfg {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            hunger: Self::default_hunger(),
            thirst: Self::default_thirst(),
            energy: Self::default_energy(),
        }
    }
}

/// Global knobs for one run. Catalog and event data live in their own tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalConfig {
    #[serde(default = "SurvivalConfig::default_target_days")]
    pub target_days: u32,
    #[serde(default = "SurvivalConfig::default_daily_event_chance")]
    pub daily_event_chance: f32,
    #[serde(default = "SurvivalConfig::default_alert_threshold")]
    pub alert_threshold: i32,
    #[serde(default)]
    pub decay: DecayCfg,
    #[serde(default)]
    pub start: StartCfg,
}

impl SurvivalConfig {
    const fn default_target_days() -> u32 {
        TARGET_DAYS
    }

    const fn default_daily_event_chance() -> f32 {
        DAILY_EVENT_CHANCE
    }

    const fn default_alert_threshold() -> i32 {
        ALERT_THRESHOLD
    }

    /// Parse a (possibly partial) JSON override; missing fields keep defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every field against its legal range.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_days == 0 {
            return Err(ConfigError::ZeroTargetDays);
        }
        check_probability("daily_event_chance", self.daily_event_chance)?;
        check_range("alert_threshold", self.alert_threshold, 0, GAUGE_MAX)?;
        check_range("decay.hunger", self.decay.hunger, 0, GAUGE_MAX)?;
        check_range("decay.thirst", self.decay.thirst, 0, GAUGE_MAX)?;
        check_range("decay.energy", self.decay.energy, 0, GAUGE_MAX)?;
        check_range("start.hunger", self.start.hunger, 1, GAUGE_MAX)?;
        check_range("start.thirst", self.start.thirst, 1, GAUGE_MAX)?;
        check_range("start.energy", self.start.energy, 1, GAUGE_MAX)?;
        Ok(())
    }
}

impl Default for SurvivalConfig {
    fn default() -> Self {
        Self {
            target_days: Self::default_target_days(),
            daily_event_chance: Self::default_daily_event_chance(),
            alert_threshold: Self::default_alert_threshold(),
            decay: DecayCfg::default(),
            start: StartCfg::default(),
        }
    }
}
