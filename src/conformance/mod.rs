//! Conformance Suite
//!
//! Scenario cases every implementation of the reward contract must reproduce.
//! Other implementations (real-time accrual, analytics jobs) load the same
//! JSON file and check their own totals against `expected`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RewardConfig;
use crate::replay::replay_with_config;
use crate::types::{RewardResult, Session};

const BUILTIN_SUITE: &str = include_str!("../../conformance/scenarios.json");

/// Default absolute tolerance; covers decimal round-tripping of expected values
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum ConformanceError {
    #[error("invalid conformance suite: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedTotals {
    pub total_reward: f64,
    pub total_minutes: f64,
    pub efficiency: f64,
    pub session_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConformanceCase {
    pub name: String,
    pub sessions: Vec<Session>,
    pub expected: ExpectedTotals,
    #[serde(default)]
    pub tolerance: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConformanceSuite {
    pub cases: Vec<ConformanceCase>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaseFailure {
    pub case: String,
    pub field: &'static str,
    pub expected: f64,
    pub actual: f64,
}

impl ConformanceCase {
    /// Compare an implementation's totals against this case
    pub fn check(&self, actual: &RewardResult) -> Vec<CaseFailure> {
        let tolerance = self.tolerance.unwrap_or(DEFAULT_TOLERANCE);
        let fields = [
            ("totalReward", self.expected.total_reward, actual.total_reward),
            ("totalMinutes", self.expected.total_minutes, actual.total_minutes),
            ("efficiency", self.expected.efficiency, actual.efficiency),
            (
                "sessionCount",
                self.expected.session_count as f64,
                actual.session_count as f64,
            ),
        ];

        fields
            .into_iter()
            .filter(|(_, expected, actual)| !((expected - actual).abs() <= tolerance))
            .map(|(field, expected, actual)| CaseFailure {
                case: self.name.clone(),
                field,
                expected,
                actual,
            })
            .collect()
    }
}

impl ConformanceSuite {
    pub fn builtin() -> Result<Self, ConformanceError> {
        Self::from_json(BUILTIN_SUITE)
    }

    pub fn from_json(json: &str) -> Result<Self, ConformanceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replay every case with `config`; empty when all cases pass
    ///
    /// `config` is not validated here; see [`RewardConfig::validate`].
    pub fn run(&self, config: &RewardConfig) -> Vec<CaseFailure> {
        self.run_with(|sessions| replay_with_config(sessions, config))
    }

    /// Check an arbitrary implementation against the suite
    pub fn run_with<F>(&self, mut implementation: F) -> Vec<CaseFailure>
    where
        F: FnMut(&[Session]) -> RewardResult,
    {
        let failures: Vec<CaseFailure> = self
            .cases
            .iter()
            .flat_map(|case| case.check(&implementation(case.sessions.as_slice())))
            .collect();

        for failure in &failures {
            tracing::warn!(
                case = %failure.case,
                field = failure.field,
                expected = failure.expected,
                actual = failure.actual,
                "conformance mismatch"
            );
        }
        failures
    }
}
