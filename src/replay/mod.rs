//! Replay Engine
//!
//! Folds one participant's session log, in chronological order, through the
//! baseline tracker and the reward function.
//!
//! Per session:
//! 1. add minutes to the total, even for degenerate sessions
//! 2. degenerate sessions (duration <= 0 or attempted <= 0) earn nothing
//! 3. otherwise evaluate the reward against the baseline built from
//!    strictly earlier sessions
//! 4. update the baseline from this session, always after step 3
//!
//! Batch replay is "stable sort by timestamp, then stream". [`Replay::record`]
//! is the streaming half and matches what a real-time accrual computes as
//! each session arrives. No input aborts a replay.

use crate::aggregate::Aggregator;
use crate::baseline::BaselineTracker;
use crate::config::RewardConfig;
use crate::reward::{evaluate, RewardInput};
use crate::types::{ReplayReport, RewardResult, Session, SessionOutcome};

/// Call-scoped replay state for one participant
#[derive(Clone, Debug)]
pub struct Replay<'a> {
    config: &'a RewardConfig,
    baseline: BaselineTracker,
    aggregator: Aggregator,
}

impl<'a> Replay<'a> {
    pub fn new(config: &'a RewardConfig) -> Self {
        Self {
            config,
            baseline: BaselineTracker::new(),
            aggregator: Aggregator::new(),
        }
    }

    /// Apply one session in arrival order
    pub fn record(&mut self, session: &Session) -> SessionOutcome {
        let minutes = session.minutes();
        let mut outcome = SessionOutcome {
            timestamp: session.timestamp,
            category_id: session.category_id.clone(),
            minutes,
            reward: 0.0,
            skipped: session.is_degenerate(),
            floor_baseline: 0.0,
            floor: 0.0,
            observed_rate: 0.0,
            accuracy: 0.0,
            engagement: 0.0,
        };

        if !outcome.skipped {
            let floor_baseline = self.baseline.floor_baseline(session.category(), self.config);
            let input = RewardInput::from_session(session, floor_baseline);
            let breakdown = evaluate(&input, self.config);

            outcome.reward = breakdown.reward;
            outcome.floor_baseline = floor_baseline;
            outcome.floor = breakdown.floor;
            outcome.observed_rate = input.observed_rate;
            outcome.accuracy = input.accuracy;
            outcome.engagement = breakdown.engagement;
        }

        // Must follow the reward evaluation: a session is judged against the
        // floor that existed before it. A no-op for degenerate sessions.
        self.baseline.update(session, self.config);
        self.aggregator
            .add(session.category(), outcome.minutes, outcome.reward);

        tracing::trace!(
            timestamp = session.timestamp,
            category = ?session.category_id,
            minutes = outcome.minutes,
            reward = outcome.reward,
            skipped = outcome.skipped,
            "session replayed"
        );
        outcome
    }

    /// Totals so far
    pub fn result(&self) -> RewardResult {
        self.aggregator.result()
    }

    pub fn baseline(&self) -> &BaselineTracker {
        &self.baseline
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }
}

/// Sessions in replay order. Stable: equal timestamps keep input order.
pub fn chronological<'s, I>(sessions: I) -> Vec<&'s Session>
where
    I: IntoIterator<Item = &'s Session>,
{
    let mut ordered: Vec<&Session> = sessions.into_iter().collect();
    ordered.sort_by_key(|s| s.timestamp);
    ordered
}

/// Replay one participant's log with the contract configuration
pub fn replay(sessions: &[Session]) -> RewardResult {
    replay_with_config(sessions, &RewardConfig::default())
}

/// Replay one participant's log with `config`.
///
/// `config` is used as given; run [`RewardConfig::validate`] on hand-built
/// configs first, since a zero `min_floor_rate` divides by zero.
pub fn replay_with_config(sessions: &[Session], config: &RewardConfig) -> RewardResult {
    replay_iter(sessions, config)
}

/// Replay borrowed sessions, e.g. one participant's slice of a larger log
pub fn replay_iter<'s, I>(sessions: I, config: &RewardConfig) -> RewardResult
where
    I: IntoIterator<Item = &'s Session>,
{
    let mut state = Replay::new(config);
    for session in chronological(sessions) {
        state.record(session);
    }
    let result = state.result();
    tracing::debug!(
        sessions = result.session_count,
        total_reward = result.total_reward,
        total_minutes = result.total_minutes,
        "replay finished"
    );
    result
}

/// Replay keeping per-session outcomes and per-category subtotals
pub fn replay_detailed(sessions: &[Session], config: &RewardConfig) -> ReplayReport {
    let mut state = Replay::new(config);
    let outcomes: Vec<SessionOutcome> = chronological(sessions)
        .into_iter()
        .map(|session| state.record(session))
        .collect();

    ReplayReport {
        result: state.result(),
        outcomes,
        categories: state.aggregator().categories(),
    }
}
