//! Batch Analytics
//!
//! Recomputes totals for a mixed log holding many participants. Each
//! participant is replayed independently, so groups are fanned out across the
//! rayon pool; every individual replay stays single-threaded.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, RewardConfig};
use crate::replay::replay_iter;
use crate::sanitize::diagnose_log;
use crate::types::{RewardResult, Session};

/// Ranking key for [`leaderboard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    TotalReward,
    TotalMinutes,
    Efficiency,
    SessionCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStanding {
    /// 1-based
    pub rank: usize,
    pub participant_id: String,
    pub result: RewardResult,
}

/// Split a mixed log by participant, preserving each group's input order
pub fn group_by_participant(sessions: &[Session]) -> BTreeMap<&str, Vec<&Session>> {
    let mut groups: BTreeMap<&str, Vec<&Session>> = BTreeMap::new();
    for session in sessions {
        groups
            .entry(session.participant_id.as_str())
            .or_default()
            .push(session);
    }
    groups
}

/// Replay every participant in the log.
///
/// Rejects an invalid `config` before any session is touched.
pub fn replay_by_participant(
    sessions: &[Session],
    config: &RewardConfig,
) -> Result<BTreeMap<String, RewardResult>, ConfigError> {
    config.validate()?;

    let diagnostics = diagnose_log(sessions, config);
    if !diagnostics.is_healthy {
        tracing::warn!(
            non_finite = diagnostics.non_finite,
            inconsistent_counts = diagnostics.inconsistent_counts,
            timestamp_collisions = diagnostics.timestamp_collisions,
            "{}",
            diagnostics.message
        );
    }

    let groups: Vec<(&str, Vec<&Session>)> = group_by_participant(sessions).into_iter().collect();
    tracing::info!(
        sessions = sessions.len(),
        participants = groups.len(),
        "batch replay started"
    );

    Ok(groups
        .par_iter()
        .map(|(participant, log)| {
            let result = replay_iter(log.iter().copied(), config);
            (participant.to_string(), result)
        })
        .collect())
}

fn sort_value(result: &RewardResult, key: SortKey) -> f64 {
    match key {
        SortKey::TotalReward => result.total_reward,
        SortKey::TotalMinutes => result.total_minutes,
        SortKey::Efficiency => result.efficiency,
        SortKey::SessionCount => result.session_count as f64,
    }
}

/// Rank results descending by `key`; ties and NaN values fall back to
/// participant id ascending, NaN sorting last.
pub fn leaderboard(
    results: &BTreeMap<String, RewardResult>,
    key: SortKey,
) -> Vec<ParticipantStanding> {
    let mut rows: Vec<(&String, &RewardResult)> = results.iter().collect();
    rows.sort_by(|(a_id, a), (b_id, b)| {
        let (a_val, b_val) = (sort_value(a, key), sort_value(b, key));
        let by_value = match (a_val.is_nan(), b_val.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => b_val.partial_cmp(&a_val).unwrap_or(Ordering::Equal),
        };
        by_value.then_with(|| a_id.cmp(b_id))
    });

    rows.into_iter()
        .enumerate()
        .map(|(i, (participant_id, result))| ParticipantStanding {
            rank: i + 1,
            participant_id: participant_id.clone(),
            result: result.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::replay;

    fn s(participant: &str, duration: f64, correct: f64, ts: i64) -> Session {
        Session::new(participant, Some("A"), duration, correct, correct, ts)
    }

    fn mixed_log() -> Vec<Session> {
        vec![
            s("bob", 600.0, 100.0, 3),
            s("alice", 90.0, 15.0, 2),
            s("bob", 60.0, 1.0, 4),
            s("alice", 150.0, 50.0, 1),
            s("carol", 0.0, 0.0, 1),
        ]
    }

    #[test]
    fn test_group_by_participant() {
        let log = mixed_log();
        let groups = group_by_participant(&log);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups["alice"].len(), 2);
        // Input order kept inside the group
        assert_eq!(groups["bob"][0].timestamp, 3);
        assert_eq!(groups["bob"][1].timestamp, 4);
        // Groups borrow from the log instead of copying it
        assert!(std::ptr::eq(groups["bob"][0], &log[0]));
        assert!(std::ptr::eq(groups["alice"][1], &log[3]));
    }

    #[test]
    fn test_batch_matches_per_participant_replay() {
        let log = mixed_log();
        let results = replay_by_participant(&log, &RewardConfig::default()).unwrap();
        assert_eq!(results.len(), 3);
        for (participant, result) in &results {
            let own: Vec<Session> = log
                .iter()
                .filter(|s| &s.participant_id == participant)
                .cloned()
                .collect();
            assert_eq!(*result, replay(&own));
        }
        assert_eq!(results["carol"].total_reward, 0.0);
        assert_eq!(results["carol"].session_count, 1);
    }

    #[test]
    fn test_empty_log() {
        let results = replay_by_participant(&[], &RewardConfig::default()).unwrap();
        assert!(results.is_empty());
        assert!(leaderboard(&results, SortKey::TotalReward).is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = RewardConfig {
            min_floor_rate: 0.0,
            ..RewardConfig::default()
        };
        let err = replay_by_participant(&mixed_log(), &config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotPositive {
                name: "min_floor_rate",
                ..
            }
        ));

        let config = RewardConfig {
            afk_threshold: f64::NAN,
            ..RewardConfig::default()
        };
        assert!(replay_by_participant(&[], &config).is_err());
    }

    #[test]
    fn test_leaderboard_by_reward() {
        let results = replay_by_participant(&mixed_log(), &RewardConfig::default()).unwrap();
        let board = leaderboard(&results, SortKey::TotalReward);
        let order: Vec<&str> = board.iter().map(|r| r.participant_id.as_str()).collect();
        // alice 2.5 + 1.5 = 4.0, bob 2.5 + 0.4, carol 0
        assert_eq!(order, vec!["alice", "bob", "carol"]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[2].rank, 3);
    }

    #[test]
    fn test_leaderboard_ties_break_by_id() {
        let mut results = BTreeMap::new();
        let same = RewardResult {
            total_reward: 1.0,
            total_minutes: 1.0,
            efficiency: 1.0,
            session_count: 1,
        };
        results.insert("zed".to_string(), same.clone());
        results.insert("amy".to_string(), same);
        let board = leaderboard(&results, SortKey::Efficiency);
        assert_eq!(board[0].participant_id, "amy");
        assert_eq!(board[1].participant_id, "zed");
    }

    #[test]
    fn test_leaderboard_nan_sorts_last() {
        let mut results = BTreeMap::new();
        results.insert(
            "aaa".to_string(),
            RewardResult {
                total_reward: f64::NAN,
                ..RewardResult::default()
            },
        );
        results.insert(
            "bbb".to_string(),
            RewardResult {
                total_reward: 0.5,
                ..RewardResult::default()
            },
        );
        let board = leaderboard(&results, SortKey::TotalReward);
        assert_eq!(board[0].participant_id, "bbb");
        assert_eq!(board[1].participant_id, "aaa");
    }

    #[test]
    fn test_leaderboard_by_minutes_and_count() {
        let results = replay_by_participant(&mixed_log(), &RewardConfig::default()).unwrap();
        let by_minutes = leaderboard(&results, SortKey::TotalMinutes);
        assert_eq!(by_minutes[0].participant_id, "bob");
        let by_count = leaderboard(&results, SortKey::SessionCount);
        assert_eq!(by_count[0].participant_id, "alice");
        assert_eq!(by_count[1].participant_id, "bob");
    }
}
