//! Aggregator
//!
//! Running totals of minutes and reward, plus per-category subtotals.
//! Kept separate from the replay loop so alternate aggregations never touch
//! the replay ordering.

use std::collections::BTreeMap;

use crate::types::{CategorySubtotal, RewardResult};

/// Reward per minute, 0 when nothing was logged
pub fn efficiency(total_reward: f64, total_minutes: f64) -> f64 {
    if total_minutes > 0.0 {
        total_reward / total_minutes
    } else {
        0.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct Aggregator {
    total_reward: f64,
    total_minutes: f64,
    session_count: usize,
    categories: BTreeMap<Option<String>, CategorySubtotal>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, category: Option<&str>, minutes: f64, reward: f64) {
        self.total_minutes += minutes;
        self.total_reward += reward;
        self.session_count += 1;

        let key = category.map(str::to_owned);
        let subtotal = self
            .categories
            .entry(key.clone())
            .or_insert_with(|| CategorySubtotal {
                category_id: key,
                ..CategorySubtotal::default()
            });
        subtotal.total_minutes += minutes;
        subtotal.total_reward += reward;
        subtotal.session_count += 1;
    }

    /// Totals so far
    pub fn result(&self) -> RewardResult {
        RewardResult {
            total_reward: self.total_reward,
            total_minutes: self.total_minutes,
            efficiency: efficiency(self.total_reward, self.total_minutes),
            session_count: self.session_count,
        }
    }

    /// Subtotals ordered by category, uncategorized first
    pub fn categories(&self) -> Vec<CategorySubtotal> {
        self.categories.values().cloned().collect()
    }
}
