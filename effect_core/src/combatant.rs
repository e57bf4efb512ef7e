//! CombatantState - The effect list and stat ledger owned by one combatant

use crate::effect::ActiveEffect;
use crate::ledger::{Stat, StatLedger, TypedStat};
use crate::types::{ActorKind, DamageType, Polarity};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Mutable effect state of a single combatant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatantState {
    /// Unique identifier for this combatant
    pub id: String,
    pub kind: ActorKind,
    pub ledger: StatLedger,
    /// Active effects in application order
    #[serde(default)]
    pub effects: Vec<ActiveEffect>,
}

impl CombatantState {
    pub fn new(id: impl Into<String>, kind: ActorKind) -> Self {
        CombatantState {
            id: id.into(),
            kind,
            ledger: StatLedger::new(),
            effects: Vec::new(),
        }
    }

    /// Replace the ledger (e.g., to seed baseline values)
    pub fn with_ledger(mut self, ledger: StatLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn ledger(&self) -> &StatLedger {
        &self.ledger
    }

    pub fn effects(&self) -> &[ActiveEffect] {
        &self.effects
    }

    /// Get an active effect by id
    pub fn effect(&self, effect_id: &str) -> Option<&ActiveEffect> {
        self.effects.iter().find(|e| e.id == effect_id)
    }

    pub fn has_effect(&self, effect_id: &str) -> bool {
        self.effect(effect_id).is_some()
    }

    /// Final value of a scalar stat given its unmodified base
    pub fn effective_stat(&self, stat: Stat, base: f64) -> f64 {
        self.ledger.compute(stat, base)
    }

    /// Final value of a type-scoped stat given its unmodified base
    pub fn effective_typed_stat(&self, stat: TypedStat, damage_type: DamageType, base: f64) -> f64 {
        self.ledger.compute_typed(stat, damage_type, base)
    }

    /// Remove an effect entirely, reversing every contributor
    ///
    /// Returns true if the effect was present.
    pub fn remove_effect(&mut self, effect_id: &str) -> bool {
        let Some(index) = self.effects.iter().position(|e| e.id == effect_id) else {
            return false;
        };
        let mut effect = self.effects.remove(index);
        effect.clear_contributors(&mut self.ledger);
        debug!(combatant = %self.id, effect = %effect_id, "effect removed");
        true
    }

    /// Dispel up to `max_effects` effects of the given polarity
    ///
    /// Only effects whose contributors are all dispellable qualify; the most
    /// recently applied go first. Returns the ids of the dispelled effects.
    pub fn dispel(&mut self, polarity: Polarity, max_effects: usize) -> Vec<String> {
        let mut dispelled = Vec::new();
        let mut i = self.effects.len();
        while i > 0 && dispelled.len() < max_effects {
            i -= 1;
            let effect = &self.effects[i];
            let eligible = effect.polarity == polarity
                && effect
                    .contributors
                    .iter()
                    .all(|c| c.removed_when.is_dispellable());
            if !eligible {
                continue;
            }
            let mut effect = self.effects.remove(i);
            effect.clear_contributors(&mut self.ledger);
            debug!(combatant = %self.id, effect = %effect.id, "effect dispelled");
            dispelled.push(effect.id);
        }
        dispelled
    }

    /// Drop every contributor that does not outlive combat
    pub fn end_combat(&mut self) {
        let ledger = &mut self.ledger;
        for effect in self.effects.iter_mut() {
            effect.remove_contributors_where(ledger, |c| !c.removed_when.survives_combat_end());
        }
        self.prune_empty_effects();
    }

    /// Remove every effect, reversing all contributors
    pub fn clear_effects(&mut self) {
        for mut effect in std::mem::take(&mut self.effects) {
            effect.clear_contributors(&mut self.ledger);
        }
    }

    /// Drop effects left without contributors
    pub(crate) fn prune_empty_effects(&mut self) {
        let before = self.effects.len();
        self.effects.retain(|e| !e.is_empty());
        if self.effects.len() != before {
            debug!(combatant = %self.id, pruned = before - self.effects.len(), "empty effects pruned");
        }
    }

    /// Drop effects that should never exist (no contributors)
    ///
    /// Called before resolution so malformed state never takes part in it.
    pub(crate) fn prune_malformed(&mut self) {
        let id = &self.id;
        self.effects.retain(|e| {
            if e.is_empty() {
                warn!(combatant = %id, effect = %e.id, "pruning effect with no contributors");
                false
            } else {
                true
            }
        });
    }

    /// Serialize the active effects for presentation layers
    pub fn effects_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.effects)
    }
}
