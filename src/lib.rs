//! # xp-replay - practice session XP replay
//!
//! Deterministic replay of a participant's timed practice sessions into an
//! XP total. Each session is judged against the per-category best rate built
//! from strictly earlier sessions, then gated on accuracy and engagement and
//! capped per session.
//!
//! ## Design goals
//!
//! - **Pure** - no I/O, no shared state, no threads inside a replay
//! - **Order-independent input** - sessions are sorted internally, so any
//!   permutation of a log replays to the same totals
//! - **Parity** - batch replay and streaming accrual compute the identical
//!   function; the contract constants live in [`types`]
//! - **Permissive** - no input aborts a replay; malformed numbers propagate
//!
//! ## Modules
//!
//! - [`baseline`] - per-category running-best rates with the new-player default
//! - [`reward`] - floor, AFK gate, accuracy gate, per-session cap
//! - [`replay`] - chronological fold, batch and streaming
//! - [`aggregate`] - totals, efficiency, per-category subtotals
//! - [`analytics`] - multi-participant batch replay and ranking
//! - [`sanitize`] - read-only log diagnostics
//! - [`conformance`] - shared scenario suite
//! - [`config`] - the reward constants as a value
//! - [`logging`] - tracing subscriber bootstrap
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use xp_replay::{replay, Session};
//!
//! let log = vec![
//!     Session::new("p1", Some("A"), 150.0, 50.0, 55.0, 2_000),
//!     Session::new("p1", Some("A"), 90.0, 15.0, 18.0, 1_000),
//! ];
//! let result = replay(&log);
//! assert_eq!(result.session_count, 2);
//! assert_eq!(result.total_reward, 4.0);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod types;
pub mod config;
pub mod baseline;
pub mod reward;
pub mod aggregate;
pub mod replay;
pub mod analytics;
pub mod sanitize;
pub mod conformance;
pub mod logging;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use config::{ConfigError, RewardConfig};

pub use baseline::BaselineTracker;

pub use reward::{evaluate, session_reward, RewardBreakdown, RewardInput};

pub use aggregate::{efficiency, Aggregator};

pub use replay::{chronological, replay, replay_detailed, replay_iter, replay_with_config, Replay};

pub use analytics::{leaderboard, replay_by_participant, ParticipantStanding, SortKey};

pub use sanitize::{diagnose_log, LogDiagnostics};

pub use conformance::{CaseFailure, ConformanceCase, ConformanceError, ConformanceSuite};
