//! Stat Modifier Ledger - Reversible per-statistic modifier totals
//!
//! The ledger holds one [`StatAccumulator`] per scalar [`Stat`] and one per
//! `(TypedStat, DamageType)` pair. Effects never write to accumulators
//! directly: every mutation goes through [`StatLedger::shift`], which both
//! [`StatLedger::apply`] and [`StatLedger::undo`] call with opposite
//! directions.

mod accumulator;
mod stat;

pub use accumulator::StatAccumulator;
pub use stat::{ModifierOp, Stat, StatTarget, TypedStat};

use crate::types::DamageType;
use serde::{Deserialize, Serialize};
use std::ops::Neg;
use strum::EnumCount;

/// Which statistic a stat-modifier effect touches and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifier {
    pub stat: StatTarget,
    #[serde(default)]
    pub op: ModifierOp,
    /// Damage types a type-scoped stat applies to (ignored for scalar stats)
    #[serde(default)]
    pub damage_types: Vec<DamageType>,
}

impl StatModifier {
    /// Modifier on a scalar stat
    pub fn scalar(stat: Stat, op: ModifierOp) -> Self {
        StatModifier {
            stat: StatTarget::Scalar(stat),
            op,
            damage_types: Vec::new(),
        }
    }

    /// Modifier on a type-scoped stat for the listed damage types
    pub fn typed(stat: TypedStat, op: ModifierOp, damage_types: &[DamageType]) -> Self {
        StatModifier {
            stat: StatTarget::Typed(stat),
            op,
            damage_types: damage_types.to_vec(),
        }
    }
}

/// The exact signed change one contributor made to the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDelta {
    pub flat: i32,
    /// Percentage points
    pub percent: i32,
}

impl StatDelta {
    pub fn new(flat: i32, percent: i32) -> Self {
        StatDelta { flat, percent }
    }

    pub fn is_zero(&self) -> bool {
        self.flat == 0 && self.percent == 0
    }

    /// Size of the delta regardless of sign
    pub fn magnitude(&self) -> i32 {
        self.flat.saturating_abs().saturating_add(self.percent.saturating_abs())
    }

    /// Amount routed to the bucket selected by `op`
    fn amount_for(&self, op: ModifierOp) -> i32 {
        match op {
            ModifierOp::Flat => self.flat,
            ModifierOp::MorePercent | ModifierOp::LessPercent => self.percent,
        }
    }
}

impl Neg for StatDelta {
    type Output = StatDelta;

    fn neg(self) -> StatDelta {
        StatDelta {
            flat: self.flat.wrapping_neg(),
            percent: self.percent.wrapping_neg(),
        }
    }
}

/// Direction of a ledger mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Apply,
    Undo,
}

impl Direction {
    fn sign(self) -> i32 {
        match self {
            Direction::Apply => 1,
            Direction::Undo => -1,
        }
    }
}

/// Per-combatant aggregate of all active stat modifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLedger {
    scalar: [StatAccumulator; Stat::COUNT],
    typed: [[StatAccumulator; DamageType::COUNT]; TypedStat::COUNT],
}

impl StatLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator for a scalar stat
    pub fn get(&self, stat: Stat) -> &StatAccumulator {
        &self.scalar[stat.index()]
    }

    /// Mutable accumulator for a scalar stat, for seeding baseline values
    pub fn get_mut(&mut self, stat: Stat) -> &mut StatAccumulator {
        &mut self.scalar[stat.index()]
    }

    /// Accumulator for a type-scoped stat
    pub fn get_typed(&self, stat: TypedStat, damage_type: DamageType) -> &StatAccumulator {
        &self.typed[stat.index()][damage_type.index()]
    }

    pub fn get_typed_mut(&mut self, stat: TypedStat, damage_type: DamageType) -> &mut StatAccumulator {
        &mut self.typed[stat.index()][damage_type.index()]
    }

    /// Apply a contributor's delta
    pub fn apply(&mut self, modifier: &StatModifier, delta: StatDelta) {
        self.shift(modifier, delta, Direction::Apply);
    }

    /// Reverse a previously applied delta
    pub fn undo(&mut self, modifier: &StatModifier, delta: StatDelta) {
        self.shift(modifier, delta, Direction::Undo);
    }

    /// Route a delta to every accumulator the modifier addresses
    pub fn shift(&mut self, modifier: &StatModifier, delta: StatDelta, direction: Direction) {
        let amount = delta.amount_for(modifier.op).wrapping_mul(direction.sign());
        if amount == 0 {
            return;
        }

        match modifier.stat {
            StatTarget::Scalar(stat) => self.scalar[stat.index()].add(modifier.op, amount),
            StatTarget::Typed(stat) => {
                for damage_type in &modifier.damage_types {
                    self.typed[stat.index()][damage_type.index()].add(modifier.op, amount);
                }
            }
        }
    }

    /// Final value of a scalar stat given its unmodified base
    pub fn compute(&self, stat: Stat, base: f64) -> f64 {
        self.get(stat).compute(base)
    }

    /// Final value of a type-scoped stat given its unmodified base
    pub fn compute_typed(&self, stat: TypedStat, damage_type: DamageType, base: f64) -> f64 {
        self.get_typed(stat, damage_type).compute(base)
    }

    /// Check if every accumulator is zero
    pub fn is_neutral(&self) -> bool {
        self.scalar.iter().all(StatAccumulator::is_neutral)
            && self.typed.iter().flatten().all(StatAccumulator::is_neutral)
    }
}
