//! Effect content and runtime records

mod active;
mod definition;
mod registry;

pub use active::{ActiveEffect, EffectContributor, RemovedWhen};
pub use definition::{
    CompareMode, DurationStacking, EffectDefinition, EffectInstance, InstanceScaling,
    MagnitudeBasis, ReapplyRule, ScaledInstance,
};
pub use registry::{AbilityEffects, EffectRegistry};
