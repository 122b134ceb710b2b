//! Common Types and Constants
//!
//! Shared data structures used across the replay modules. The constants are
//! part of the external contract: every conforming implementation (real-time
//! accrual, batch analytics) must use identical values.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Floor baseline assumed for a category without meaningful history
pub const NEW_PLAYER_DEFAULT: f64 = 10.0;

/// Minimum session duration (seconds) allowed to update a baseline
pub const MIN_SESSION_SECONDS: f64 = 30.0;

/// Share of the personal best rate used as the engagement floor
pub const FLOOR_FRACTION: f64 = 0.25;

/// Absolute minimum floor rate (correct per minute)
pub const MIN_FLOOR_RATE: f64 = 2.0;

/// Raw engagement below this is treated as away-from-keyboard
pub const AFK_THRESHOLD: f64 = 0.3;

/// Maximum reward a single session can earn
pub const MAX_REWARD_PER_SESSION: f64 = 2.5;

/// Minimum accuracy (percent) for a session to earn any reward
pub const ACCURACY_THRESHOLD: f64 = 80.0;

/// Stored best rates below this count as "no meaningful history"
pub const MEANINGFUL_BASELINE: f64 = 1.0;

/// Seconds per minute; also the rate unit (correct per 60 seconds)
pub const SECONDS_PER_MINUTE: f64 = 60.0;

// ==================== Input ====================

/// One timed practice interval from the session log
///
/// Numeric fields are expected to be non-negative but this is not enforced;
/// malformed values flow through the replay arithmetic instead of aborting it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub participant_id: String,
    /// Skill grouping; `None` is its own independent key
    pub category_id: Option<String>,
    pub duration_seconds: f64,
    pub correct: f64,
    pub attempted: f64,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl Session {
    pub fn new(
        participant_id: impl Into<String>,
        category_id: Option<&str>,
        duration_seconds: f64,
        correct: f64,
        attempted: f64,
        timestamp: i64,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            category_id: category_id.map(str::to_owned),
            duration_seconds,
            correct,
            attempted,
            timestamp,
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category_id.as_deref()
    }

    /// Minutes contributed to the total, regardless of validity
    pub fn minutes(&self) -> f64 {
        self.duration_seconds / SECONDS_PER_MINUTE
    }

    /// Correct per minute
    pub fn observed_rate(&self) -> f64 {
        self.correct / self.duration_seconds * SECONDS_PER_MINUTE
    }

    /// Accuracy in percent
    pub fn accuracy(&self) -> f64 {
        self.correct / self.attempted * 100.0
    }

    /// Sessions that can never earn a reward
    pub fn is_degenerate(&self) -> bool {
        self.duration_seconds <= 0.0 || self.attempted <= 0.0
    }
}

// ==================== Output ====================

/// Totals of one replay call
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardResult {
    /// Total XP
    pub total_reward: f64,
    /// Sum of all session durations in minutes, invalid sessions included
    pub total_minutes: f64,
    /// XP per minute, 0 when no minutes were logged
    pub efficiency: f64,
    pub session_count: usize,
}

/// What a single session contributed during replay
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub timestamp: i64,
    pub category_id: Option<String>,
    pub minutes: f64,
    pub reward: f64,
    /// True when the session was degenerate and reward evaluation was skipped
    pub skipped: bool,
    /// Floor baseline read before this session (0 when skipped)
    pub floor_baseline: f64,
    pub floor: f64,
    pub observed_rate: f64,
    pub accuracy: f64,
    pub engagement: f64,
}

/// Per-category running totals
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySubtotal {
    pub category_id: Option<String>,
    pub total_reward: f64,
    pub total_minutes: f64,
    pub session_count: usize,
}

/// Full replay output: totals, per-session outcomes in replay order, and
/// per-category subtotals ordered by category key
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub result: RewardResult,
    pub outcomes: Vec<SessionOutcome>,
    pub categories: Vec<CategorySubtotal>,
}

// ==================== Tests ====================
