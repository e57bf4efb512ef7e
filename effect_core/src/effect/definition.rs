//! Static effect content - Definitions and per-ability instances

use crate::ledger::StatModifier;
use crate::scaling::Scaling;
use crate::types::{EffectKind, Polarity};
use serde::{Deserialize, Serialize};

use super::active::RemovedWhen;

/// Identity and behavior of a named status effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDefinition {
    /// Unique identifier (e.g., "sundered", "regeneration")
    pub id: String,
    /// Display name
    pub name: String,
    pub polarity: Polarity,
    pub kind: EffectKind,
    /// Ledger target, required for stat modifiers
    #[serde(default)]
    pub modifier: Option<StatModifier>,
}

impl EffectDefinition {
    /// Create a stat-modifier definition
    pub fn stat_modifier(id: &str, name: &str, polarity: Polarity, modifier: StatModifier) -> Self {
        EffectDefinition {
            id: id.to_string(),
            name: name.to_string(),
            polarity,
            kind: EffectKind::StatModifier,
            modifier: Some(modifier),
        }
    }

    /// Create a damage-over-time definition (always a debuff)
    pub fn damage_over_time(id: &str, name: &str) -> Self {
        EffectDefinition {
            id: id.to_string(),
            name: name.to_string(),
            polarity: Polarity::Debuff,
            kind: EffectKind::DamageOverTime,
            modifier: None,
        }
    }

    /// Create a heal-over-time definition (always a buff)
    pub fn heal_over_time(id: &str, name: &str) -> Self {
        EffectDefinition {
            id: id.to_string(),
            name: name.to_string(),
            polarity: Polarity::Buff,
            kind: EffectKind::HealOverTime,
            modifier: None,
        }
    }
}

/// Value a percentage magnitude is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudeBasis {
    /// Percent stays a percentage
    #[default]
    None,
    /// Percent of the caster's final power
    PercentOfPower,
    /// Percent of the damage dealt by the landing action
    PercentOfDamageDealt,
}

/// How existing and incoming strength are compared for overwrites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareMode {
    /// Σ max(1, contributor strength) vs. base strength × level
    #[default]
    ByStrengthRating,
    /// Existing total magnitude vs. freshly computed incoming magnitude
    ByComputedMagnitude,
}

/// What happens when an effect is applied to a target that already has it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReapplyRule {
    /// Stack or merge a new contributor
    #[default]
    AddOnTop,
    /// Replace every contributor if the incoming application is strictly stronger
    OverwriteIfStronger {
        #[serde(default)]
        compare: CompareMode,
    },
    /// Ignore the application while the effect is present
    DoNothingIfPresent,
}

/// How a newly added contributor's duration interacts with the others
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DurationStacking {
    /// Leave all durations alone
    #[default]
    None,
    /// Bring every contributor up to the incoming duration
    /// (or exactly to it when `overrides_remaining` is set)
    Refresh {
        #[serde(default)]
        overrides_remaining: bool,
    },
    /// Extend the other contributors by the incoming duration
    Prolong,
}

/// Independent per-level scaling for every scalable instance field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstanceScaling {
    #[serde(default)]
    pub chance: Scaling,
    #[serde(default)]
    pub duration: Scaling,
    #[serde(default)]
    pub flat: Scaling,
    #[serde(default)]
    pub percent: Scaling,
    #[serde(default)]
    pub max_stacks: Scaling,
}

/// An effect as authored on a particular spell or ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectInstance {
    /// Id of the [`EffectDefinition`] this instance applies
    pub effect: String,
    /// Trigger chance in percent
    #[serde(default = "default_chance")]
    pub chance: i32,
    /// Base duration in turns
    #[serde(default = "default_duration")]
    pub duration: i32,
    /// Base flat magnitude
    #[serde(default)]
    pub flat: i32,
    /// Base percent magnitude
    #[serde(default)]
    pub percent: i32,
    #[serde(default)]
    pub basis: MagnitudeBasis,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default = "default_max_stacks")]
    pub max_stacks: i32,
    #[serde(default)]
    pub mergeable: bool,
    #[serde(default)]
    pub reapply: ReapplyRule,
    #[serde(default)]
    pub duration_stacking: DurationStacking,
    /// Per-level strength used for overwrite comparisons
    #[serde(default = "default_base_strength")]
    pub base_strength: i32,
    #[serde(default)]
    pub removed_when: RemovedWhen,
    #[serde(default)]
    pub scaling: InstanceScaling,
}

fn default_chance() -> i32 {
    100
}

fn default_duration() -> i32 {
    1
}

fn default_max_stacks() -> i32 {
    1
}

fn default_base_strength() -> i32 {
    1
}

/// Instance fields after level scaling and clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledInstance {
    /// 0..=100
    pub chance: i32,
    /// >= 1
    pub duration: i32,
    /// >= 0
    pub flat: i32,
    /// 0..=100
    pub percent: i32,
    /// >= 1, and exactly 1 when not stackable
    pub max_stacks: i32,
}

impl EffectInstance {
    /// Create an instance with default settings for the given effect id
    pub fn new(effect: &str) -> Self {
        EffectInstance {
            effect: effect.to_string(),
            chance: default_chance(),
            duration: default_duration(),
            flat: 0,
            percent: 0,
            basis: MagnitudeBasis::None,
            stackable: false,
            max_stacks: default_max_stacks(),
            mergeable: false,
            reapply: ReapplyRule::AddOnTop,
            duration_stacking: DurationStacking::None,
            base_strength: default_base_strength(),
            removed_when: RemovedWhen::Duration,
            scaling: InstanceScaling::default(),
        }
    }

    pub fn with_chance(mut self, chance: i32) -> Self {
        self.chance = chance;
        self
    }

    pub fn with_duration(mut self, duration: i32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_magnitude(mut self, flat: i32, percent: i32) -> Self {
        self.flat = flat;
        self.percent = percent;
        self
    }

    pub fn with_basis(mut self, basis: MagnitudeBasis) -> Self {
        self.basis = basis;
        self
    }

    /// Allow up to `max_stacks` contributors from the same ability
    pub fn stackable(mut self, max_stacks: i32) -> Self {
        self.stackable = true;
        self.max_stacks = max_stacks;
        self
    }

    pub fn mergeable(mut self) -> Self {
        self.mergeable = true;
        self
    }

    pub fn with_reapply(mut self, reapply: ReapplyRule) -> Self {
        self.reapply = reapply;
        self
    }

    pub fn with_duration_stacking(mut self, stacking: DurationStacking) -> Self {
        self.duration_stacking = stacking;
        self
    }

    pub fn with_base_strength(mut self, strength: i32) -> Self {
        self.base_strength = strength;
        self
    }

    pub fn with_removed_when(mut self, removed_when: RemovedWhen) -> Self {
        self.removed_when = removed_when;
        self
    }

    pub fn with_scaling(mut self, scaling: InstanceScaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Evaluate all scaling rules at `level` and clamp the results
    pub fn scaled(&self, level: u32) -> ScaledInstance {
        let s = &self.scaling;
        let max_stacks = if self.stackable {
            s.max_stacks.evaluate(level, self.max_stacks).max(1)
        } else {
            1
        };

        ScaledInstance {
            chance: s.chance.evaluate(level, self.chance).clamp(0, 100),
            duration: s.duration.evaluate(level, self.duration).max(1),
            flat: s.flat.evaluate(level, self.flat).max(0),
            percent: s.percent.evaluate(level, self.percent).clamp(0, 100),
            max_stacks,
        }
    }

    /// Strength rating of an application at `level`
    pub fn strength_at(&self, level: u32) -> i32 {
        let level = i32::try_from(level).unwrap_or(i32::MAX);
        self.base_strength.saturating_mul(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{ModifierOp, Stat};

    #[test]
    fn test_scaled_identity_at_level_one() {
        let instance = EffectInstance::new("weaken").with_duration(3).with_magnitude(10, 5);
        let scaled = instance.scaled(1);
        assert_eq!(scaled.chance, 100);
        assert_eq!(scaled.duration, 3);
        assert_eq!(scaled.flat, 10);
        assert_eq!(scaled.percent, 5);
        assert_eq!(scaled.max_stacks, 1);
    }

    #[test]
    fn test_scaled_clamps() {
        let instance = EffectInstance::new("x")
            .with_chance(150)
            .with_duration(0)
            .with_magnitude(-5, 250);
        let scaled = instance.scaled(1);
        assert_eq!(scaled.chance, 100);
        assert_eq!(scaled.duration, 1);
        assert_eq!(scaled.flat, 0);
        assert_eq!(scaled.percent, 100);
    }

    #[test]
    fn test_max_stacks_forced_to_one_when_not_stackable() {
        let mut instance = EffectInstance::new("x");
        instance.max_stacks = 5;
        assert_eq!(instance.scaled(1).max_stacks, 1);

        let instance = EffectInstance::new("x").stackable(0);
        assert_eq!(instance.scaled(1).max_stacks, 1);

        let instance = EffectInstance::new("x").stackable(3).with_scaling(InstanceScaling {
            max_stacks: Scaling::step(5, 1),
            ..InstanceScaling::default()
        });
        assert_eq!(instance.scaled(1).max_stacks, 3);
        assert_eq!(instance.scaled(11).max_stacks, 5);
    }

    #[test]
    fn test_scaled_uses_per_field_rules() {
        let instance = EffectInstance::new("x")
            .with_duration(2)
            .with_magnitude(10, 0)
            .with_scaling(InstanceScaling {
                duration: Scaling::milestones(&[(10, 4)]),
                flat: Scaling::step(1, 2),
                ..InstanceScaling::default()
            });
        let scaled = instance.scaled(10);
        assert_eq!(scaled.duration, 4);
        assert_eq!(scaled.flat, 28);
    }

    #[test]
    fn test_strength_at() {
        let instance = EffectInstance::new("x").with_base_strength(3);
        assert_eq!(instance.strength_at(4), 12);
    }

    #[test]
    fn test_policy_serialization() {
        let rule = ReapplyRule::OverwriteIfStronger {
            compare: CompareMode::ByComputedMagnitude,
        };
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("overwrite_if_stronger"));
        assert!(json.contains("by_computed_magnitude"));

        let stacking: DurationStacking =
            serde_json::from_str(r#"{"type":"refresh","overrides_remaining":true}"#).unwrap();
        assert_eq!(stacking, DurationStacking::Refresh { overrides_remaining: true });
    }

    #[test]
    fn test_definition_constructors() {
        let def = EffectDefinition::stat_modifier(
            "weaken",
            "Weaken",
            Polarity::Debuff,
            StatModifier::scalar(Stat::AttackPower, ModifierOp::Flat),
        );
        assert_eq!(def.kind, EffectKind::StatModifier);
        assert!(def.modifier.is_some());
        assert_eq!(EffectDefinition::damage_over_time("burn", "Burn").polarity, Polarity::Debuff);
        assert_eq!(EffectDefinition::heal_over_time("regen", "Regen").polarity, Polarity::Buff);
    }
}
