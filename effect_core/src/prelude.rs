//! Prelude module for convenient imports
//!
//! ```rust
//! use effect_core::prelude::*;
//! ```

// Core types
pub use crate::combatant::CombatantState;
pub use crate::types::{ActorKind, DamageType, EffectKind, Polarity, TickKind};

// Ledger
pub use crate::ledger::{ModifierOp, Stat, StatDelta, StatLedger, StatModifier, TypedStat};

// Content
pub use crate::effect::{
    CompareMode, DurationStacking, EffectDefinition, EffectInstance, EffectRegistry,
    MagnitudeBasis, ReapplyRule, RemovedWhen,
};
pub use crate::scaling::Scaling;

// Resolution and ticking
pub use crate::resolve::{apply_ability, apply_effect, apply_effect_with_rng, EffectApplication};
pub use crate::tick::{tick_effects, TickResult};

// Config
pub use crate::config::default_effects;
