//! Stat catalog - Every statistic an effect can modify

use serde::{Deserialize, Serialize};

/// Scalar combat statistics tracked on the ledger
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Stat {
    // Offense
    AttackPower,
    MagicPower,
    Damage,
    AttackSpeed,
    CastSpeed,
    HitChance,
    Accuracy,
    CriticalChance,
    CriticalDamage,
    ArmourPenetration,
    MagicPenetration,
    // Defense
    PhysicalDefence,
    MagicalDefence,
    Evasion,
    BlockChance,
    DamageTaken,
    // Resources
    MaxHealth,
    MaxMana,
    HealthRegen,
    ManaRegen,
    HealingDone,
    HealingReceived,
    // Turn order / aggro
    Initiative,
    Threat,
}

impl Stat {
    /// Position of this stat inside the ledger's scalar table
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Statistics that are kept separately for every damage type
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TypedStat {
    /// Outgoing damage bonus when attacking with the type
    AttackerBonus,
    /// Outgoing damage penalty when attacking with the type
    AttackerWeaken,
    /// Incoming damage reduction against the type
    DefenderResist,
    /// Incoming damage increase against the type
    DefenderVulnerability,
}

impl TypedStat {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The statistic a stat-modifier effect touches
///
/// Serialized untagged, so content can write `stat = "attack_power"` or
/// `stat = "defender_resist"` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatTarget {
    Scalar(Stat),
    Typed(TypedStat),
}

impl StatTarget {
    pub fn is_type_scoped(&self) -> bool {
        matches!(self, StatTarget::Typed(_))
    }
}

impl From<Stat> for StatTarget {
    fn from(stat: Stat) -> Self {
        StatTarget::Scalar(stat)
    }
}

impl From<TypedStat> for StatTarget {
    fn from(stat: TypedStat) -> Self {
        StatTarget::Typed(stat)
    }
}

impl std::fmt::Display for StatTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatTarget::Scalar(stat) => write!(f, "{stat}"),
            StatTarget::Typed(stat) => write!(f, "{stat}"),
        }
    }
}

/// Arithmetic a stat modifier performs on its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierOp {
    /// Integer added to the flat accumulator
    #[default]
    Flat,
    /// Percentage points added to the "more" bucket
    MorePercent,
    /// Percentage points added to the "less" bucket
    LessPercent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn test_stat_indices_are_dense() {
        for (i, stat) in Stat::iter().enumerate() {
            assert_eq!(stat.index(), i);
        }
        for (i, stat) in TypedStat::iter().enumerate() {
            assert_eq!(stat.index(), i);
        }
        assert_eq!(Stat::COUNT, 24);
        assert_eq!(TypedStat::COUNT, 4);
    }

    #[test]
    fn test_stat_target_untagged() {
        #[derive(Deserialize)]
        struct Holder {
            stat: StatTarget,
        }

        let scalar: Holder = toml::from_str(r#"stat = "attack_power""#).unwrap();
        assert_eq!(scalar.stat, StatTarget::Scalar(Stat::AttackPower));

        let typed: Holder = toml::from_str(r#"stat = "defender_resist""#).unwrap();
        assert_eq!(typed.stat, StatTarget::Typed(TypedStat::DefenderResist));
        assert!(typed.stat.is_type_scoped());
    }

    #[test]
    fn test_stat_display() {
        assert_eq!(Stat::PhysicalDefence.to_string(), "physical_defence");
        assert_eq!(StatTarget::from(TypedStat::AttackerBonus).to_string(), "attacker_bonus");
    }
}
