//! Periodic tick processing - Advancing a combatant's effects by one turn

use crate::combatant::CombatantState;
use crate::types::{ActorKind, TickKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Aggregated periodic value emitted by one effect during a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickResult {
    /// Actor that applied the effect
    pub source: String,
    /// Combatant the effect is on
    pub target: String,
    pub target_kind: ActorKind,
    pub kind: TickKind,
    pub amount: i32,
    pub effect_id: String,
    pub effect_name: String,
}

/// Advance every effect on the combatant by one turn
///
/// For each contributor, periodic value is collected before the duration is
/// decremented, so the final turn still ticks. Contributors reaching zero are
/// removed and their stat deltas reversed; emptied effects are dropped.
/// Effects and contributors are walked back to front so removal is in place.
pub fn tick_effects(state: &mut CombatantState) -> Vec<TickResult> {
    let CombatantState {
        id,
        kind,
        ledger,
        effects,
    } = state;
    let mut results = Vec::new();

    let mut e = effects.len();
    while e > 0 {
        e -= 1;
        let effect = &mut effects[e];

        if effect.is_empty() {
            warn!(combatant = %id, effect = %effect.id, "pruning effect with no contributors");
            effects.remove(e);
            continue;
        }

        let periodic = effect.kind.is_periodic();
        let mut total: i32 = 0;

        let mut c = effect.contributors.len();
        while c > 0 {
            c -= 1;
            let contributor = &mut effect.contributors[c];
            let ticks_down = contributor.removed_when.ticks_down();

            if periodic && (contributor.remaining_turns > 0 || !ticks_down) {
                total = total.saturating_add(contributor.tick_value.max(0));
                trace!(
                    combatant = %id,
                    effect = %effect.id,
                    value = contributor.tick_value,
                    "contributor ticked"
                );
            }

            if !ticks_down {
                continue;
            }

            contributor.remaining_turns -= 1;
            if contributor.remaining_turns <= 0 {
                let expired = effect.contributors.remove(c);
                effect.undo_contributor(&expired, ledger);
                debug!(
                    combatant = %id,
                    effect = %effect.id,
                    ability = %expired.source_ability,
                    "contributor expired"
                );
            }
        }

        if total > 0 {
            if let Some(tick_kind) = effect.kind.tick_kind() {
                trace!(combatant = %id, effect = %effect.id, amount = total, "tick emitted");
                results.push(TickResult {
                    source: effect.caster.clone(),
                    target: id.clone(),
                    target_kind: *kind,
                    kind: tick_kind,
                    amount: total,
                    effect_id: effect.id.clone(),
                    effect_name: effect.name().to_string(),
                });
            }
        }

        if effect.is_empty() {
            debug!(combatant = %id, effect = %effect.id, "effect expired");
            effects.remove(e);
        }
    }

    results
}

/// Sum of all tick amounts of the given kind
pub fn total_of(results: &[TickResult], kind: TickKind) -> i32 {
    results
        .iter()
        .filter(|r| r.kind == kind)
        .fold(0i32, |acc, r| acc.saturating_add(r.amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{ActiveEffect, EffectContributor, EffectDefinition, RemovedWhen};
    use crate::ledger::{ModifierOp, Stat, StatDelta, StatModifier};
    use crate::types::Polarity;
    use std::sync::Arc;

    fn contributor(turns: i32, tick_value: i32, delta: StatDelta) -> EffectContributor {
        EffectContributor {
            source_ability: "ability".to_string(),
            source_actor: "caster".to_string(),
            remaining_turns: turns,
            tick_value,
            strength_rating: 1,
            removed_when: RemovedWhen::Duration,
            delta,
        }
    }

    fn with_effect(definition: EffectDefinition, contributors: Vec<EffectContributor>) -> CombatantState {
        let mut state = CombatantState::new("goblin", ActorKind::Enemy);
        let mut iter = contributors.into_iter();
        let first = iter.next().unwrap();
        let mut effect = ActiveEffect::new(Arc::new(definition), "hero", first.clone());
        effect.apply_contributor(&first, &mut state.ledger);
        for c in iter {
            effect.apply_contributor(&c, &mut state.ledger);
            effect.contributors.push(c);
        }
        state.effects.push(effect);
        state
    }

    #[test]
    fn test_last_turn_still_ticks() {
        let mut state = with_effect(
            EffectDefinition::damage_over_time("burn", "Burn"),
            vec![contributor(1, 12, StatDelta::default())],
        );

        let results = tick_effects(&mut state);
        assert_eq!(results.len(), 1);
        let tick = &results[0];
        assert_eq!(tick.amount, 12);
        assert_eq!(tick.kind, TickKind::Damage);
        assert_eq!(tick.source, "hero");
        assert_eq!(tick.target, "goblin");
        assert_eq!(tick.target_kind, ActorKind::Enemy);
        assert_eq!(tick.effect_name, "Burn");
        assert!(state.effects().is_empty());
    }

    #[test]
    fn test_contributors_aggregate_into_one_result() {
        let mut state = with_effect(
            EffectDefinition::heal_over_time("regen", "Regeneration"),
            vec![
                contributor(3, 4, StatDelta::default()),
                contributor(1, 6, StatDelta::default()),
                contributor(2, -5, StatDelta::default()),
            ],
        );

        let results = tick_effects(&mut state);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, TickKind::Heal);
        // Negative tick values count as zero
        assert_eq!(results[0].amount, 10);
        assert_eq!(state.effect("regen").unwrap().stack_count(), 2);

        let results = tick_effects(&mut state);
        assert_eq!(results[0].amount, 4);
        assert_eq!(state.effect("regen").unwrap().stack_count(), 1);
    }

    #[test]
    fn test_stat_modifier_expiry_restores_ledger() {
        let definition = EffectDefinition::stat_modifier(
            "weaken",
            "Weaken",
            Polarity::Debuff,
            StatModifier::scalar(Stat::AttackPower, ModifierOp::Flat),
        );
        let mut state = with_effect(
            definition,
            vec![
                contributor(1, 0, StatDelta::new(-10, 0)),
                contributor(2, 0, StatDelta::new(-4, 0)),
            ],
        );
        assert_eq!(state.ledger.get(Stat::AttackPower).flat, -14);

        let results = tick_effects(&mut state);
        assert!(results.is_empty());
        assert_eq!(state.ledger.get(Stat::AttackPower).flat, -4);

        tick_effects(&mut state);
        assert!(state.effects().is_empty());
        assert!(state.ledger.is_neutral());
    }

    #[test]
    fn test_persistent_contributors_do_not_expire() {
        let mut persistent = contributor(1, 3, StatDelta::default());
        persistent.removed_when = RemovedWhen::Persistent;
        let mut state = with_effect(EffectDefinition::heal_over_time("aura", "Aura"), vec![persistent]);

        for _ in 0..5 {
            let results = tick_effects(&mut state);
            assert_eq!(total_of(&results, TickKind::Heal), 3);
        }
        assert_eq!(state.effect("aura").unwrap().contributors[0].remaining_turns, 1);
    }

    #[test]
    fn test_empty_effect_pruned() {
        let mut state = with_effect(
            EffectDefinition::damage_over_time("burn", "Burn"),
            vec![contributor(3, 2, StatDelta::default())],
        );
        state.effects[0].contributors.clear();
        let results = tick_effects(&mut state);
        assert!(results.is_empty());
        assert!(state.effects().is_empty());
    }

    #[test]
    fn test_total_of() {
        let make = |kind, amount| TickResult {
            source: "a".to_string(),
            target: "b".to_string(),
            target_kind: ActorKind::Player,
            kind,
            amount,
            effect_id: "e".to_string(),
            effect_name: "E".to_string(),
        };
        let results = vec![
            make(TickKind::Damage, 5),
            make(TickKind::Heal, 2),
            make(TickKind::Damage, 7),
        ];
        assert_eq!(total_of(&results, TickKind::Damage), 12);
        assert_eq!(total_of(&results, TickKind::Heal), 2);
    }
}
