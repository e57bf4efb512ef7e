//! StatAccumulator - Flat / More% / Less% buckets for a single statistic

use super::stat::ModifierOp;
use serde::{Deserialize, Serialize};

/// Reversible modifier buckets for one ledger entry
///
/// Final value against a base is:
/// `(base + flat) × (1 + more/100) × (1 - less/100)`
///
/// All three buckets are plain sums of integers, so any sequence of additions
/// is undone exactly by subtracting the same amounts in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatAccumulator {
    /// Sum of flat deltas
    pub flat: i32,
    /// Sum of "more" percentage points
    pub more: i32,
    /// Sum of "less" percentage points
    pub less: i32,
}

impl StatAccumulator {
    /// Add `amount` to the bucket selected by `op`
    pub fn add(&mut self, op: ModifierOp, amount: i32) {
        let bucket = match op {
            ModifierOp::Flat => &mut self.flat,
            ModifierOp::MorePercent => &mut self.more,
            ModifierOp::LessPercent => &mut self.less,
        };
        *bucket = bucket.wrapping_add(amount);
    }

    /// Combined percentage multiplier, never negative
    pub fn multiplier(&self) -> f64 {
        let more = 1.0 + f64::from(self.more) / 100.0;
        let less = 1.0 - f64::from(self.less) / 100.0;
        (more * less).max(0.0)
    }

    /// Apply the buckets to a base value
    pub fn compute(&self, base: f64) -> f64 {
        (base + f64::from(self.flat)) * self.multiplier()
    }

    /// Check if all buckets are zero
    pub fn is_neutral(&self) -> bool {
        self.flat == 0 && self.more == 0 && self.less == 0
    }
}
