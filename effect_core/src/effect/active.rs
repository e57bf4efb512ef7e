//! ActiveEffect - Runtime status effects and their contributors

use super::definition::EffectDefinition;
use crate::ledger::{StatDelta, StatLedger};
use crate::types::{EffectKind, Polarity};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// When a contributor is taken off its effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovedWhen {
    /// Expires by ticking down, or at combat end
    #[default]
    Duration,
    /// Like `Duration`, and can also be dispelled
    DurationOrDispel,
    /// Does not tick down; removed at combat end
    CombatEnd,
    /// Does not tick down; removed only explicitly
    Persistent,
}

impl RemovedWhen {
    /// Check if turn ticks decrement this contributor
    pub fn ticks_down(self) -> bool {
        matches!(self, RemovedWhen::Duration | RemovedWhen::DurationOrDispel)
    }

    pub fn is_dispellable(self) -> bool {
        self == RemovedWhen::DurationOrDispel
    }

    pub fn survives_combat_end(self) -> bool {
        self == RemovedWhen::Persistent
    }
}

/// One application ("stack") of an effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectContributor {
    /// Ability that applied this contributor
    pub source_ability: String,
    /// Actor that applied this contributor
    pub source_actor: String,
    pub remaining_turns: i32,
    /// Per-turn value for DOT/HOT effects
    pub tick_value: i32,
    /// Level × base strength at application time
    pub strength_rating: i32,
    pub removed_when: RemovedWhen,
    /// Exact signed delta written to the ledger, reversed on removal
    pub delta: StatDelta,
}

/// A named status effect present on a combatant
///
/// Always holds at least one contributor; an effect whose last contributor is
/// removed is dropped from the combatant immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub id: String,
    pub definition: Arc<EffectDefinition>,
    pub polarity: Polarity,
    pub kind: EffectKind,
    /// Actor that first applied the effect
    pub caster: String,
    pub contributors: Vec<EffectContributor>,
}

impl ActiveEffect {
    /// Create an effect with its first contributor
    pub fn new(definition: Arc<EffectDefinition>, caster: &str, first: EffectContributor) -> Self {
        ActiveEffect {
            id: definition.id.clone(),
            polarity: definition.polarity,
            kind: definition.kind,
            definition,
            caster: caster.to_string(),
            contributors: vec![first],
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Number of contributors (stacks)
    pub fn stack_count(&self) -> usize {
        self.contributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }

    /// Longest remaining duration across contributors
    pub fn remaining_turns(&self) -> i32 {
        self.contributors
            .iter()
            .map(|c| c.remaining_turns)
            .max()
            .unwrap_or(0)
    }

    /// Number of contributors applied by `ability`
    pub fn contributors_from(&self, ability: &str) -> usize {
        self.contributors
            .iter()
            .filter(|c| c.source_ability == ability)
            .count()
    }

    /// Sum of all contributors' tick values
    pub fn total_tick_value(&self) -> i32 {
        self.contributors
            .iter()
            .fold(0i32, |acc, c| acc.saturating_add(c.tick_value))
    }

    /// Σ max(1, strength rating)
    pub fn total_strength(&self) -> i32 {
        self.contributors
            .iter()
            .fold(0i32, |acc, c| acc.saturating_add(c.strength_rating.max(1)))
    }

    /// Aggregate magnitude used by magnitude-based overwrite comparisons
    pub fn total_magnitude(&self) -> i32 {
        if self.kind.is_periodic() {
            return self.total_tick_value();
        }
        self.contributors
            .iter()
            .fold(0i32, |acc, c| acc.saturating_add(c.delta.magnitude()))
    }

    /// Write a contributor's delta to the ledger
    pub fn apply_contributor(&self, contributor: &EffectContributor, ledger: &mut StatLedger) {
        if self.kind != EffectKind::StatModifier {
            return;
        }
        if let Some(modifier) = &self.definition.modifier {
            ledger.apply(modifier, contributor.delta);
        }
    }

    /// Reverse exactly the delta a contributor wrote
    pub fn undo_contributor(&self, contributor: &EffectContributor, ledger: &mut StatLedger) {
        if self.kind != EffectKind::StatModifier {
            return;
        }
        if let Some(modifier) = &self.definition.modifier {
            ledger.undo(modifier, contributor.delta);
        }
    }

    /// Reverse every contributor's delta and drop them all
    pub fn clear_contributors(&mut self, ledger: &mut StatLedger) {
        for contributor in std::mem::take(&mut self.contributors) {
            self.undo_contributor(&contributor, ledger);
        }
    }

    /// Remove the contributors matching `predicate`, reversing their deltas
    ///
    /// Returns the number of contributors removed.
    pub fn remove_contributors_where(
        &mut self,
        ledger: &mut StatLedger,
        mut predicate: impl FnMut(&EffectContributor) -> bool,
    ) -> usize {
        let mut removed = 0;
        let mut i = self.contributors.len();
        while i > 0 {
            i -= 1;
            if predicate(&self.contributors[i]) {
                let contributor = self.contributors.remove(i);
                self.undo_contributor(&contributor, ledger);
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{ModifierOp, Stat, StatModifier};

    fn contributor(ability: &str, turns: i32, strength: i32, delta: StatDelta) -> EffectContributor {
        EffectContributor {
            source_ability: ability.to_string(),
            source_actor: "player".to_string(),
            remaining_turns: turns,
            tick_value: 0,
            strength_rating: strength,
            removed_when: RemovedWhen::Duration,
            delta,
        }
    }

    fn weaken() -> Arc<EffectDefinition> {
        Arc::new(EffectDefinition::stat_modifier(
            "weaken",
            "Weaken",
            Polarity::Debuff,
            StatModifier::scalar(Stat::AttackPower, ModifierOp::Flat),
        ))
    }

    #[test]
    fn test_queries() {
        let mut effect = ActiveEffect::new(weaken(), "player", contributor("a", 3, 0, StatDelta::new(-5, 0)));
        effect.contributors.push(contributor("b", 5, 4, StatDelta::new(-7, 0)));
        effect.contributors.push(contributor("a", 2, 2, StatDelta::new(-1, 0)));

        assert_eq!(effect.name(), "Weaken");
        assert_eq!(effect.stack_count(), 3);
        assert_eq!(effect.remaining_turns(), 5);
        assert_eq!(effect.contributors_from("a"), 2);
        // max(1, 0) + 4 + 2
        assert_eq!(effect.total_strength(), 7);
        assert_eq!(effect.total_magnitude(), 13);
    }

    #[test]
    fn test_clear_contributors_restores_ledger() {
        let mut ledger = StatLedger::new();
        let first = contributor("a", 3, 1, StatDelta::new(-5, 0));
        let mut effect = ActiveEffect::new(weaken(), "player", first.clone());
        effect.apply_contributor(&first, &mut ledger);

        let second = contributor("b", 3, 1, StatDelta::new(-3, 0));
        effect.apply_contributor(&second, &mut ledger);
        effect.contributors.push(second);
        assert_eq!(ledger.get(Stat::AttackPower).flat, -8);

        effect.clear_contributors(&mut ledger);
        assert!(effect.is_empty());
        assert!(ledger.is_neutral());
    }

    #[test]
    fn test_remove_contributors_where() {
        let mut ledger = StatLedger::new();
        let first = contributor("a", 3, 1, StatDelta::new(-5, 0));
        let mut effect = ActiveEffect::new(weaken(), "player", first.clone());
        effect.apply_contributor(&first, &mut ledger);
        let second = contributor("b", 3, 1, StatDelta::new(-3, 0));
        effect.apply_contributor(&second, &mut ledger);
        effect.contributors.push(second);

        let removed = effect.remove_contributors_where(&mut ledger, |c| c.source_ability == "a");
        assert_eq!(removed, 1);
        assert_eq!(effect.stack_count(), 1);
        assert_eq!(ledger.get(Stat::AttackPower).flat, -3);
    }

    #[test]
    fn test_removed_when_flags() {
        assert!(RemovedWhen::Duration.ticks_down());
        assert!(RemovedWhen::DurationOrDispel.is_dispellable());
        assert!(!RemovedWhen::CombatEnd.ticks_down());
        assert!(RemovedWhen::Persistent.survives_combat_end());
        assert!(!RemovedWhen::CombatEnd.survives_combat_end());
    }
}
