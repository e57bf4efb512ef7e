//! Effect catalog loading

use super::ConfigError;
use crate::effect::{AbilityEffects, EffectDefinition, EffectRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Container for effect definitions and ability effect lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectsConfig {
    #[serde(default)]
    pub effects: Vec<EffectDefinition>,
    #[serde(default)]
    pub abilities: Vec<AbilityEffects>,
}

impl EffectsConfig {
    /// Build and validate a registry from this config
    pub fn into_registry(self) -> Result<EffectRegistry, ConfigError> {
        let mut registry = EffectRegistry::new();
        for definition in self.effects {
            registry.register(definition);
        }
        for ability in self.abilities {
            registry.register_ability(ability);
        }
        registry.validate()?;
        Ok(registry)
    }
}

/// Load an effect catalog from a TOML file
pub fn load_effect_catalog(path: &Path) -> Result<EffectRegistry, ConfigError> {
    let config: EffectsConfig = super::load_toml(path)?;
    config.into_registry()
}

/// Load an effect catalog from a TOML string
pub fn parse_effect_catalog(content: &str) -> Result<EffectRegistry, ConfigError> {
    let config: EffectsConfig = super::parse_toml(content)?;
    config.into_registry()
}

/// Get the bundled effect catalog
pub fn default_effects() -> EffectRegistry {
    let toml = include_str!("../../config/effects.toml");
    parse_effect_catalog(toml).unwrap_or_else(|err| {
        warn!(error = %err, "bundled effect catalog failed to load");
        EffectRegistry::new()
    })
}
