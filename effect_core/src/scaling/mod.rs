//! Magnitude scaling - Level-adjusted values for effect instance fields
//!
//! Each scalable field of an effect instance carries its own [`Scaling`]:
//! a rule that maps `(level, base)` to a value, followed by an optional clamp.
//!
//! - **Step**: every `every` levels past `start_level` adds `amount`
//!   (or compounds by `amount` percent when the mode is [`StepMode::Compound`])
//! - **Milestone**: the value of the highest milestone whose level is at or
//!   below the current level, or the unscaled base if none qualifies

use serde::{Deserialize, Serialize};

/// How a step rule combines its per-step amount with the running value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMode {
    /// value + steps × amount
    #[default]
    Add,
    /// value × (1 + amount/100)^steps
    Compound,
}

/// A level threshold and the value it unlocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub level: u32,
    pub value: i32,
}

/// Per-level scaling rule for one numeric field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScalingRule {
    /// Identity: the base value at every level
    #[default]
    None,
    Step {
        #[serde(default = "default_start_level")]
        start_level: u32,
        every: u32,
        amount: i32,
        #[serde(default)]
        mode: StepMode,
    },
    Milestone { milestones: Vec<Milestone> },
}

fn default_start_level() -> u32 {
    1
}

impl ScalingRule {
    /// Evaluate the rule at `level` for the given base value
    pub fn evaluate(&self, level: u32, base: i32) -> i32 {
        match self {
            ScalingRule::None => base,
            ScalingRule::Step {
                start_level,
                every,
                amount,
                mode,
            } => {
                let steps = step_count(level, *start_level, *every);
                if steps == 0 {
                    return base;
                }
                match mode {
                    StepMode::Add => {
                        let bonus = (*amount).saturating_mul(steps.min(i32::MAX as u32) as i32);
                        base.saturating_add(bonus)
                    }
                    StepMode::Compound => {
                        let factor = (1.0 + f64::from(*amount) / 100.0).powi(steps as i32);
                        let value = (f64::from(base) * factor).round();
                        value.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
                    }
                }
            }
            ScalingRule::Milestone { milestones } => milestones
                .iter()
                .filter(|m| m.level <= level)
                .max_by_key(|m| m.level)
                .map(|m| m.value)
                .unwrap_or(base),
        }
    }
}

/// Number of whole steps completed past `start_level`
fn step_count(level: u32, start_level: u32, every: u32) -> u32 {
    if every == 0 || level <= start_level {
        return 0;
    }
    (level - start_level) / every
}

/// Optional bounds applied after a rule is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Clamp {
    #[serde(default)]
    pub min: Option<i32>,
    #[serde(default)]
    pub max: Option<i32>,
}

impl Clamp {
    pub fn new(min: Option<i32>, max: Option<i32>) -> Self {
        Clamp { min, max }
    }

    pub fn apply(&self, value: i32) -> i32 {
        let value = match self.min {
            Some(min) => value.max(min),
            None => value,
        };
        match self.max {
            Some(max) => value.min(max),
            None => value,
        }
    }

    /// Check that the bounds are ordered
    pub fn is_valid(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }
}

/// A scaling rule together with its clamp
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scaling {
    #[serde(default)]
    pub rule: ScalingRule,
    #[serde(default)]
    pub clamp: Option<Clamp>,
}

impl Scaling {
    /// Scaling that returns the base value unchanged
    pub fn identity() -> Self {
        Self::default()
    }

    /// Additive step scaling starting at level 1
    pub fn step(every: u32, amount: i32) -> Self {
        Scaling {
            rule: ScalingRule::Step {
                start_level: 1,
                every,
                amount,
                mode: StepMode::Add,
            },
            clamp: None,
        }
    }

    /// Compounding step scaling starting at level 1 (`percent` per step)
    pub fn compound(every: u32, percent: i32) -> Self {
        Scaling {
            rule: ScalingRule::Step {
                start_level: 1,
                every,
                amount: percent,
                mode: StepMode::Compound,
            },
            clamp: None,
        }
    }

    /// Milestone scaling from `(level, value)` pairs
    pub fn milestones(pairs: &[(u32, i32)]) -> Self {
        Scaling {
            rule: ScalingRule::Milestone {
                milestones: pairs
                    .iter()
                    .map(|&(level, value)| Milestone { level, value })
                    .collect(),
            },
            clamp: None,
        }
    }

    /// Set the clamp
    pub fn with_clamp(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.clamp = Some(Clamp::new(min, max));
        self
    }

    /// Evaluate at `level` and clamp
    pub fn evaluate(&self, level: u32, base: i32) -> i32 {
        let value = self.rule.evaluate(level, base);
        match &self.clamp {
            Some(clamp) => clamp.apply(value),
            None => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let scaling = Scaling::identity();
        assert_eq!(scaling.evaluate(1, 10), 10);
        assert_eq!(scaling.evaluate(50, 10), 10);
    }

    #[test]
    fn test_step_add() {
        // +2 every 3 levels past level 1
        let scaling = Scaling::step(3, 2);
        assert_eq!(scaling.evaluate(1, 10), 10);
        assert_eq!(scaling.evaluate(3, 10), 10);
        assert_eq!(scaling.evaluate(4, 10), 12);
        assert_eq!(scaling.evaluate(10, 10), 16);
    }

    #[test]
    fn test_step_start_level() {
        let scaling = Scaling {
            rule: ScalingRule::Step {
                start_level: 5,
                every: 1,
                amount: 1,
                mode: StepMode::Add,
            },
            clamp: None,
        };
        assert_eq!(scaling.evaluate(4, 0), 0);
        assert_eq!(scaling.evaluate(5, 0), 0);
        assert_eq!(scaling.evaluate(8, 0), 3);
    }

    #[test]
    fn test_step_compound() {
        // 10% more per level
        let scaling = Scaling::compound(1, 10);
        assert_eq!(scaling.evaluate(1, 100), 100);
        assert_eq!(scaling.evaluate(2, 100), 110);
        assert_eq!(scaling.evaluate(3, 100), 121);
    }

    #[test]
    fn test_step_every_zero_is_identity() {
        let scaling = Scaling::step(0, 5);
        assert_eq!(scaling.evaluate(20, 7), 7);
    }

    #[test]
    fn test_milestone() {
        let scaling = Scaling::milestones(&[(10, 30), (5, 20)]);
        assert_eq!(scaling.evaluate(1, 7), 7);
        assert_eq!(scaling.evaluate(5, 7), 20);
        assert_eq!(scaling.evaluate(9, 7), 20);
        assert_eq!(scaling.evaluate(12, 7), 30);
    }

    #[test]
    fn test_clamp_after_evaluation() {
        let scaling = Scaling::step(1, 5).with_clamp(Some(0), Some(20));
        assert_eq!(scaling.evaluate(1, 10), 10);
        assert_eq!(scaling.evaluate(10, 10), 20);

        let scaling = Scaling::step(1, -5).with_clamp(Some(0), None);
        assert_eq!(scaling.evaluate(10, 10), 0);
    }

    #[test]
    fn test_clamp_validity() {
        assert!(Clamp::new(Some(1), Some(2)).is_valid());
        assert!(!Clamp::new(Some(3), Some(2)).is_valid());
        assert!(Clamp::new(None, Some(-2)).is_valid());
    }

    #[test]
    fn test_scaling_rule_from_toml() {
        let scaling: Scaling = toml::from_str(
            r#"
[rule]
type = "step"
every = 2
amount = 3
mode = "add"

[clamp]
max = 10
"#,
        )
        .unwrap();
        assert_eq!(scaling.evaluate(5, 1), 7);
        assert_eq!(scaling.evaluate(20, 1), 10);
    }
}
