//! Reward Function
//!
//! Maps one session's performance to a capped XP contribution.
//!
//! Evaluation order:
//! 1. floor = floor_baseline * floor_fraction, raised to min_floor_rate
//!    (NaN stays NaN)
//! 2. raw engagement = observed rate / floor
//! 3. raw engagement below the AFK threshold -> engagement 0
//! 4. otherwise engagement = min(1, raw engagement)
//! 5. accuracy below the accuracy threshold -> reward 0, independent of step 3
//! 6. otherwise reward = min(minutes, max_reward_per_session) * engagement
//!
//! The duration cap is applied before scaling by engagement. No rounding.

use serde::{Deserialize, Serialize};

use crate::config::RewardConfig;
use crate::types::{Session, SECONDS_PER_MINUTE};

/// Inputs of one reward evaluation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RewardInput {
    /// Correct per minute in this session
    pub observed_rate: f64,
    /// Percent correct in this session
    pub accuracy: f64,
    /// Baseline read from the tracker before this session
    pub floor_baseline: f64,
    pub duration_seconds: f64,
}

impl RewardInput {
    pub fn from_session(session: &Session, floor_baseline: f64) -> Self {
        Self {
            observed_rate: session.observed_rate(),
            accuracy: session.accuracy(),
            floor_baseline,
            duration_seconds: session.duration_seconds,
        }
    }
}

/// Every intermediate value of a reward evaluation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardBreakdown {
    pub floor: f64,
    pub raw_engagement: f64,
    pub engagement: f64,
    pub afk: bool,
    pub accuracy_passed: bool,
    pub reward: f64,
}

/// Upper bound that keeps NaN instead of discarding it like `f64::min`
#[inline]
fn cap(value: f64, limit: f64) -> f64 {
    if value > limit {
        limit
    } else {
        value
    }
}

/// Lower bound that keeps NaN instead of discarding it like `f64::max`
#[inline]
fn at_least(value: f64, limit: f64) -> f64 {
    if value < limit {
        limit
    } else {
        value
    }
}

pub fn evaluate(input: &RewardInput, config: &RewardConfig) -> RewardBreakdown {
    let floor = at_least(
        input.floor_baseline * config.floor_fraction,
        config.min_floor_rate,
    );
    let raw_engagement = input.observed_rate / floor;

    let afk = raw_engagement < config.afk_threshold;
    let engagement = if afk { 0.0 } else { cap(raw_engagement, 1.0) };

    let accuracy_passed = !(input.accuracy < config.accuracy_threshold);
    let reward = if accuracy_passed {
        let minutes = input.duration_seconds / SECONDS_PER_MINUTE;
        cap(minutes, config.max_reward_per_session) * engagement
    } else {
        0.0
    };

    RewardBreakdown {
        floor,
        raw_engagement,
        engagement,
        afk,
        accuracy_passed,
        reward,
    }
}

/// Reward only
pub fn session_reward(input: &RewardInput, config: &RewardConfig) -> f64 {
    evaluate(input, config).reward
}
