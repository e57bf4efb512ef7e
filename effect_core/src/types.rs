//! Core vocabulary shared by the effect engine

use serde::{Deserialize, Serialize};

/// Damage type used to key type-scoped statistics
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    Physical,
    Fire,
    Cold,
    Lightning,
    Chaos,
}

impl DamageType {
    /// Position of this damage type inside per-type tables
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Whether an effect helps or hinders the combatant carrying it
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Polarity {
    /// Lands on the caster
    Buff,
    /// Lands on the defender, and negates stat deltas
    Debuff,
}

impl Polarity {
    /// Sign applied to stat deltas of this polarity
    pub fn sign(self) -> i32 {
        match self {
            Polarity::Buff => 1,
            Polarity::Debuff => -1,
        }
    }
}

/// What an effect does while active
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EffectKind {
    /// Persistent, reversible change to the stat ledger
    StatModifier,
    /// Periodic damage
    DamageOverTime,
    /// Periodic healing
    HealOverTime,
}

impl EffectKind {
    /// Check if this kind produces tick values instead of stat deltas
    pub fn is_periodic(self) -> bool {
        matches!(self, EffectKind::DamageOverTime | EffectKind::HealOverTime)
    }

    /// Tick kind emitted by this effect kind, if any
    pub fn tick_kind(self) -> Option<TickKind> {
        match self {
            EffectKind::StatModifier => None,
            EffectKind::DamageOverTime => Some(TickKind::Damage),
            EffectKind::HealOverTime => Some(TickKind::Heal),
        }
    }
}

/// Side of the fight a combatant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    #[default]
    Player,
    Enemy,
}

/// Kind of periodic value emitted by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickKind {
    Damage,
    Heal,
}
