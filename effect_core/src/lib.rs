//! effect_core - Buff/debuff and stat-modifier resolution for turn-based combat
//!
//! This library provides:
//! - StatLedger: Reversible flat / more% / less% totals per combat statistic
//! - Scaling: Level-adjusted magnitudes for effect instance fields
//! - Effect resolution: Stacking, merging and overwriting of incoming effects
//! - Tick processing: Per-turn DOT/HOT totals, expiry and exact stat reversal

pub mod combatant;
pub mod config;
pub mod effect;
pub mod ledger;
pub mod prelude;
pub mod resolve;
pub mod scaling;
pub mod tick;
pub mod types;

// Re-export core types for convenience
pub use combatant::CombatantState;
pub use config::{default_effects, ConfigError};
pub use effect::{
    AbilityEffects, ActiveEffect, CompareMode, DurationStacking, EffectContributor,
    EffectDefinition, EffectInstance, EffectRegistry, InstanceScaling, MagnitudeBasis,
    ReapplyRule, RemovedWhen, ScaledInstance,
};
pub use ledger::{ModifierOp, Stat, StatAccumulator, StatDelta, StatLedger, StatModifier, StatTarget, TypedStat};
pub use resolve::{apply_ability, apply_effect, apply_effect_with_rng, EffectApplication};
pub use scaling::{Clamp, Milestone, Scaling, ScalingRule, StepMode};
pub use tick::{tick_effects, TickResult};
pub use types::{ActorKind, DamageType, EffectKind, Polarity, TickKind};
