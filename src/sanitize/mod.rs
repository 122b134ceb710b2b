//! Log Diagnostics
//!
//! Read-only health checks over a session log. Nothing here alters the
//! sessions: malformed records are replayed as-is, these counts only tell the
//! caller how much of a log is suspect.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::RewardConfig;
use crate::types::Session;

/// NaN or infinite anywhere in the slice
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// Any numeric field of the session is NaN or infinite
pub fn has_non_finite_fields(session: &Session) -> bool {
    has_invalid_values(&[
        session.duration_seconds,
        session.correct,
        session.attempted,
    ])
}

/// Counters over one log
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogDiagnostics {
    pub session_count: usize,
    /// duration <= 0 or attempted <= 0
    pub degenerate: usize,
    /// Too short to update a baseline
    pub below_baseline_threshold: usize,
    pub non_finite: usize,
    /// Negative counts, or more correct than attempted
    pub inconsistent_counts: usize,
    /// Sessions sharing a timestamp with another session of the same participant
    pub timestamp_collisions: usize,
    pub is_healthy: bool,
    pub message: String,
}

pub fn diagnose_log(sessions: &[Session], config: &RewardConfig) -> LogDiagnostics {
    let mut diag = LogDiagnostics {
        session_count: sessions.len(),
        ..LogDiagnostics::default()
    };

    let mut seen: HashMap<(&str, i64), usize> = HashMap::new();
    for session in sessions {
        if session.is_degenerate() {
            diag.degenerate += 1;
        }
        if session.duration_seconds < config.min_session_seconds {
            diag.below_baseline_threshold += 1;
        }
        if has_non_finite_fields(session) {
            diag.non_finite += 1;
        }
        if session.correct < 0.0 || session.attempted < 0.0 || session.correct > session.attempted
        {
            diag.inconsistent_counts += 1;
        }
        *seen
            .entry((session.participant_id.as_str(), session.timestamp))
            .or_insert(0) += 1;
    }
    diag.timestamp_collisions = seen.values().filter(|&&n| n > 1).sum();

    // Degenerate and short sessions are normal; only these make totals suspect
    diag.is_healthy =
        diag.non_finite == 0 && diag.inconsistent_counts == 0 && diag.timestamp_collisions == 0;

    diag.message = if diag.is_healthy {
        "Log is healthy".to_string()
    } else if diag.non_finite > 0 {
        format!("Log contains {} sessions with NaN or infinite values", diag.non_finite)
    } else if diag.inconsistent_counts > 0 {
        format!(
            "Log contains {} sessions with inconsistent counts",
            diag.inconsistent_counts
        )
    } else {
        format!(
            "Log contains {} sessions with colliding timestamps",
            diag.timestamp_collisions
        )
    };

    diag
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(participant: &str, duration: f64, correct: f64, attempted: f64, ts: i64) -> Session {
        Session::new(participant, Some("A"), duration, correct, attempted, ts)
    }

    // ==================== has_invalid_values ====================

    #[test]
    fn test_has_invalid_values() {
        assert!(!has_invalid_values(&[1.0, 2.0, 3.0]));
        assert!(!has_invalid_values(&[]));
        assert!(has_invalid_values(&[1.0, f64::NAN]));
        assert!(has_invalid_values(&[f64::NEG_INFINITY]));
    }

    #[test]
    fn test_has_non_finite_fields() {
        assert!(!has_non_finite_fields(&s("p", 60.0, 1.0, 1.0, 0)));
        assert!(has_non_finite_fields(&s("p", f64::INFINITY, 1.0, 1.0, 0)));
        assert!(has_non_finite_fields(&s("p", 60.0, 1.0, f64::NAN, 0)));
    }

    // ==================== diagnose_log ====================

    #[test]
    fn test_diagnose_empty_log() {
        let diag = diagnose_log(&[], &RewardConfig::default());
        assert_eq!(diag.session_count, 0);
        assert!(diag.is_healthy);
        assert_eq!(diag.message, "Log is healthy");
    }

    #[test]
    fn test_diagnose_healthy_log_with_degenerate_sessions() {
        let sessions = vec![
            s("p", 60.0, 10.0, 12.0, 1),
            s("p", 0.0, 0.0, 0.0, 2),
            s("p", 20.0, 2.0, 2.0, 3),
        ];
        let diag = diagnose_log(&sessions, &RewardConfig::default());
        assert_eq!(diag.degenerate, 1);
        assert_eq!(diag.below_baseline_threshold, 2);
        assert!(diag.is_healthy);
    }

    #[test]
    fn test_diagnose_non_finite() {
        let sessions = vec![s("p", f64::NAN, 1.0, 1.0, 1)];
        let diag = diagnose_log(&sessions, &RewardConfig::default());
        assert_eq!(diag.non_finite, 1);
        assert!(!diag.is_healthy);
        assert!(diag.message.contains("NaN"));
    }

    #[test]
    fn test_diagnose_inconsistent_counts() {
        let sessions = vec![s("p", 60.0, 12.0, 10.0, 1), s("p", 60.0, -1.0, 10.0, 2)];
        let diag = diagnose_log(&sessions, &RewardConfig::default());
        assert_eq!(diag.inconsistent_counts, 2);
        assert!(!diag.is_healthy);
    }

    #[test]
    fn test_diagnose_timestamp_collisions_per_participant() {
        let sessions = vec![
            s("p1", 60.0, 1.0, 1.0, 7),
            s("p1", 60.0, 1.0, 1.0, 7),
            s("p2", 60.0, 1.0, 1.0, 7),
        ];
        let diag = diagnose_log(&sessions, &RewardConfig::default());
        assert_eq!(diag.timestamp_collisions, 2);
        assert!(diag.message.contains("colliding"));
    }
}
