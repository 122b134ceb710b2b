//! Reward configuration
//!
//! The seven reward constants as one value. `Default` is the contract
//! configuration; anything else breaks parity with other implementations and
//! should only be used for offline experiments.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    ACCURACY_THRESHOLD, AFK_THRESHOLD, FLOOR_FRACTION, MAX_REWARD_PER_SESSION,
    MIN_FLOOR_RATE, MIN_SESSION_SECONDS, NEW_PLAYER_DEFAULT,
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("floor_fraction must be in (0, 1], got {0}")]
    FloorFractionOutOfRange(f64),
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewardConfig {
    pub new_player_default: f64,
    pub min_session_seconds: f64,
    pub floor_fraction: f64,
    pub min_floor_rate: f64,
    pub afk_threshold: f64,
    pub max_reward_per_session: f64,
    pub accuracy_threshold: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            new_player_default: NEW_PLAYER_DEFAULT,
            min_session_seconds: MIN_SESSION_SECONDS,
            floor_fraction: FLOOR_FRACTION,
            min_floor_rate: MIN_FLOOR_RATE,
            afk_threshold: AFK_THRESHOLD,
            max_reward_per_session: MAX_REWARD_PER_SESSION,
            accuracy_threshold: ACCURACY_THRESHOLD,
        }
    }
}

impl RewardConfig {
    /// Contract defaults with `XP_*` environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &'static str, fallback: f64| -> Result<f64, ConfigError> {
            match lookup(var) {
                None => Ok(fallback),
                Some(raw) => raw.trim().parse::<f64>().map_err(|_| ConfigError::InvalidValue {
                    var,
                    value: raw,
                }),
            }
        };

        let defaults = Self::default();
        let config = Self {
            new_player_default: read("XP_NEW_PLAYER_DEFAULT", defaults.new_player_default)?,
            min_session_seconds: read("XP_MIN_SESSION_SECONDS", defaults.min_session_seconds)?,
            floor_fraction: read("XP_FLOOR_FRACTION", defaults.floor_fraction)?,
            min_floor_rate: read("XP_MIN_FLOOR_RATE", defaults.min_floor_rate)?,
            afk_threshold: read("XP_AFK_THRESHOLD", defaults.afk_threshold)?,
            max_reward_per_session: read(
                "XP_MAX_REWARD_PER_SESSION",
                defaults.max_reward_per_session,
            )?,
            accuracy_threshold: read("XP_ACCURACY_THRESHOLD", defaults.accuracy_threshold)?,
        };
        config.validate()?;

        if !config.is_contract_default() {
            tracing::warn!(?config, "reward config overrides contract constants");
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("new_player_default", self.new_player_default),
            ("min_session_seconds", self.min_session_seconds),
            ("floor_fraction", self.floor_fraction),
            ("min_floor_rate", self.min_floor_rate),
            ("afk_threshold", self.afk_threshold),
            ("max_reward_per_session", self.max_reward_per_session),
            ("accuracy_threshold", self.accuracy_threshold),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }

        // A zero floor would divide by zero in the engagement ratio
        if self.min_floor_rate <= 0.0 {
            return Err(ConfigError::NotPositive {
                name: "min_floor_rate",
                value: self.min_floor_rate,
            });
        }
        if self.floor_fraction <= 0.0 || self.floor_fraction > 1.0 {
            return Err(ConfigError::FloorFractionOutOfRange(self.floor_fraction));
        }
        for (name, value) in [
            ("new_player_default", self.new_player_default),
            ("min_session_seconds", self.min_session_seconds),
            ("afk_threshold", self.afk_threshold),
            ("max_reward_per_session", self.max_reward_per_session),
            ("accuracy_threshold", self.accuracy_threshold),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        Ok(())
    }

    pub fn is_contract_default(&self) -> bool {
        *self == Self::default()
    }
}
