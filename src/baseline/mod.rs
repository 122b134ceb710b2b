//! Baseline Tracker
//!
//! Per-category running-best rate store, owned by one replay call.
//!
//! Core rules:
//! - Only sessions of at least `min_session_seconds` may update a baseline
//! - Degenerate sessions (duration <= 0 or attempted <= 0) never update one
//! - A stored best only ever rises (running maximum)
//! - Reads below the meaningful-history boundary return the optimistic
//!   new-player default instead of a near-zero rate
//! - The absent category is tracked as its own key, never merged with named ones

use std::collections::HashMap;

use crate::config::RewardConfig;
use crate::types::{Session, MEANINGFUL_BASELINE};

#[derive(Clone, Debug, Default)]
pub struct BaselineTracker {
    /// Best rate for sessions without a category
    uncategorized: Option<f64>,
    /// Best rate per named category
    by_category: HashMap<String, f64>,
}

impl BaselineTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the category's best rate from this session if it qualifies.
    /// Returns true when the stored value changed.
    pub fn update(&mut self, session: &Session, config: &RewardConfig) -> bool {
        if session.is_degenerate() || session.duration_seconds < config.min_session_seconds {
            return false;
        }

        let rate = session.observed_rate();
        // Absent entry compares as 0; NaN never beats it
        let current = self.best_rate(session.category()).unwrap_or(0.0);
        if !(rate > current) {
            return false;
        }

        match session.category() {
            None => self.uncategorized = Some(rate),
            Some(category) => {
                self.by_category.insert(category.to_owned(), rate);
            }
        }
        true
    }

    /// Baseline used to derive the engagement floor for `category`
    pub fn floor_baseline(&self, category: Option<&str>, config: &RewardConfig) -> f64 {
        match self.best_rate(category) {
            Some(best) if best >= MEANINGFUL_BASELINE => best,
            _ => config.new_player_default,
        }
    }

    /// Raw stored best rate, without the new-player default
    pub fn best_rate(&self, category: Option<&str>) -> Option<f64> {
        match category {
            None => self.uncategorized,
            Some(category) => self.by_category.get(category).copied(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_category.len() + usize::from(self.uncategorized.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
