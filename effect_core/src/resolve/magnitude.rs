//! Magnitude computation - Turning scaled instance data into a delta or tick value

use crate::effect::{EffectDefinition, MagnitudeBasis, ScaledInstance};
use crate::ledger::StatDelta;
use crate::types::EffectKind;

/// What a single new contributor carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Magnitude {
    /// Signed ledger delta (stat modifiers only)
    pub delta: StatDelta,
    /// Per-turn value (DOT/HOT only)
    pub tick_value: i32,
}

impl Magnitude {
    /// Value compared by magnitude-based overwrites
    pub fn strength(&self, kind: EffectKind) -> i32 {
        if kind.is_periodic() {
            self.tick_value
        } else {
            self.delta.magnitude()
        }
    }
}

/// Value the percent component is measured against
fn basis_value(basis: MagnitudeBasis, last_damage_dealt: i32, final_power: i32) -> Option<i32> {
    match basis {
        MagnitudeBasis::None => None,
        MagnitudeBasis::PercentOfPower => Some(final_power.max(0)),
        MagnitudeBasis::PercentOfDamageDealt => Some(last_damage_dealt.max(0)),
    }
}

/// `percent`% of `value`, truncated toward zero
fn percent_of(percent: i32, value: i32) -> i32 {
    let product = i64::from(percent) * i64::from(value) / 100;
    product.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Compute the magnitude of a new contributor
///
/// Stat modifiers with a basis fold their percent into flat, then take the
/// polarity's sign. Periodic effects produce an unsigned tick value of
/// `flat + percent × basis / 100`.
pub fn compute_magnitude(
    definition: &EffectDefinition,
    basis: MagnitudeBasis,
    scaled: &ScaledInstance,
    last_damage_dealt: i32,
    final_power: i32,
) -> Magnitude {
    let basis_value = basis_value(basis, last_damage_dealt, final_power);

    if definition.kind.is_periodic() {
        let from_percent = basis_value.map_or(0, |value| percent_of(scaled.percent, value));
        return Magnitude {
            delta: StatDelta::default(),
            tick_value: scaled.flat.saturating_add(from_percent).max(0),
        };
    }

    let (flat, percent) = match basis_value {
        Some(value) => (scaled.flat.saturating_add(percent_of(scaled.percent, value)), 0),
        None => (scaled.flat, scaled.percent),
    };

    let sign = definition.polarity.sign();
    Magnitude {
        delta: StatDelta::new(flat.saturating_mul(sign), percent.saturating_mul(sign)),
        tick_value: 0,
    }
}
