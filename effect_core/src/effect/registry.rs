//! EffectRegistry - Lookup of effect definitions and ability effect lists

use super::definition::{EffectDefinition, EffectInstance};
use crate::config::ConfigError;
use crate::ledger::StatTarget;
use crate::scaling::{Scaling, ScalingRule};
use crate::types::EffectKind;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// The effect instances a single ability applies when it lands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityEffects {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub effects: Vec<EffectInstance>,
}

/// Registry of loaded effect content
#[derive(Debug, Clone, Default)]
pub struct EffectRegistry {
    definitions: HashMap<String, Arc<EffectDefinition>>,
    abilities: HashMap<String, AbilityEffects>,
}

impl EffectRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        EffectRegistry {
            definitions: HashMap::new(),
            abilities: HashMap::new(),
        }
    }

    /// Register an effect definition, replacing any with the same id
    pub fn register(&mut self, definition: EffectDefinition) {
        self.definitions
            .insert(definition.id.clone(), Arc::new(definition));
    }

    /// Register an ability's effect list
    pub fn register_ability(&mut self, ability: AbilityEffects) {
        self.abilities.insert(ability.id.clone(), ability);
    }

    /// Get a definition by id
    pub fn get(&self, id: &str) -> Option<&Arc<EffectDefinition>> {
        self.definitions.get(id)
    }

    /// Get an ability's effect list by id
    pub fn ability(&self, id: &str) -> Option<&AbilityEffects> {
        self.abilities.get(id)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &Arc<EffectDefinition>> {
        self.definitions.values()
    }

    pub fn abilities(&self) -> impl Iterator<Item = &AbilityEffects> {
        self.abilities.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Check the loaded content for inconsistencies
    pub fn validate(&self) -> Result<(), ConfigError> {
        for definition in self.definitions.values() {
            validate_definition(definition)?;
        }

        for ability in self.abilities.values() {
            for instance in &ability.effects {
                if !self.definitions.contains_key(&instance.effect) {
                    return Err(ConfigError::ValidationError(format!(
                        "ability '{}' references unknown effect '{}'",
                        ability.id, instance.effect
                    )));
                }
                validate_instance(&ability.id, instance)?;
            }
        }

        Ok(())
    }
}

fn validate_definition(definition: &EffectDefinition) -> Result<(), ConfigError> {
    let fail = |reason: &str| -> Result<(), ConfigError> {
        Err(ConfigError::ValidationError(format!(
            "effect '{}': {}",
            definition.id, reason
        )))
    };

    match (definition.kind, &definition.modifier) {
        (EffectKind::StatModifier, None) => fail("stat modifier has no modifier"),
        (EffectKind::DamageOverTime | EffectKind::HealOverTime, Some(_)) => {
            fail("periodic effect cannot carry a stat modifier")
        }
        (EffectKind::StatModifier, Some(modifier)) => match modifier.stat {
            StatTarget::Typed(_) if modifier.damage_types.is_empty() => {
                fail("type-scoped stat lists no damage types")
            }
            StatTarget::Typed(_) => {
                let unique: HashSet<_> = modifier.damage_types.iter().collect();
                if unique.len() != modifier.damage_types.len() {
                    fail("damage types listed more than once")
                } else {
                    Ok(())
                }
            }
            StatTarget::Scalar(_) if !modifier.damage_types.is_empty() => {
                fail("scalar stat cannot list damage types")
            }
            StatTarget::Scalar(_) => Ok(()),
        },
        _ => Ok(()),
    }
}

fn validate_instance(ability: &str, instance: &EffectInstance) -> Result<(), ConfigError> {
    let s = &instance.scaling;
    let fields = [
        ("chance", &s.chance),
        ("duration", &s.duration),
        ("flat", &s.flat),
        ("percent", &s.percent),
        ("max_stacks", &s.max_stacks),
    ];

    for (field, scaling) in fields {
        if let Some(reason) = scaling_problem(scaling) {
            return Err(ConfigError::ValidationError(format!(
                "ability '{}', effect '{}', {} scaling: {}",
                ability, instance.effect, field, reason
            )));
        }
    }
    Ok(())
}

fn scaling_problem(scaling: &Scaling) -> Option<&'static str> {
    if let ScalingRule::Step { every: 0, .. } = scaling.rule {
        return Some("step rule with every = 0");
    }
    match &scaling.clamp {
        Some(clamp) if !clamp.is_valid() => Some("clamp min exceeds max"),
        _ => None,
    }
}
