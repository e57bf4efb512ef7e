//! Effect application - Deciding how an incoming effect lands on a target
//!
//! Resolution order for one landed effect instance:
//! 1. Look up the definition; pick the target by polarity
//! 2. Scale the instance to the ability level and roll its chance
//! 3. Build the contributor (signed delta or tick value, strength rating)
//! 4. Dispatch on the reapplication rule: stack/merge, overwrite, or ignore
//!
//! Policy no-ops (stack cap, merge disallowed, not stronger, already present)
//! are silent: they leave the target untouched and are only logged.

mod duration;
mod magnitude;

pub use duration::stack_durations;
pub use magnitude::{compute_magnitude, Magnitude};

use crate::combatant::CombatantState;
use crate::effect::{
    ActiveEffect, CompareMode, EffectContributor, EffectDefinition, EffectInstance,
    EffectRegistry, ReapplyRule, ScaledInstance,
};
use crate::types::Polarity;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything the resolver needs to know about one landed effect
#[derive(Debug, Clone, Copy)]
pub struct EffectApplication<'a> {
    pub source_ability: &'a str,
    pub ability_level: u32,
    pub instance: &'a EffectInstance,
    /// Damage dealt by the action that carried this effect
    pub last_damage_dealt: i32,
    /// Caster's final computed power
    pub final_power: i32,
}

/// How a single application was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Created,
    Stacked,
    Merged,
    Overwritten,
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IgnoreReason {
    ChanceFailed,
    StackCap,
    NotMergeable,
    NotStronger,
    AlreadyPresent,
}

/// Apply an effect instance using the thread-local RNG for the chance roll
///
/// Buffs land on the attacker, debuffs on the defender.
pub fn apply_effect(
    attacker: &mut CombatantState,
    defender: &mut CombatantState,
    registry: &EffectRegistry,
    application: &EffectApplication,
) {
    let mut rng = rand::thread_rng();
    apply_effect_with_rng(attacker, defender, registry, application, &mut rng);
}

/// Apply an effect instance with a provided RNG (for deterministic testing)
pub fn apply_effect_with_rng(
    attacker: &mut CombatantState,
    defender: &mut CombatantState,
    registry: &EffectRegistry,
    application: &EffectApplication,
    rng: &mut impl Rng,
) {
    let Some(definition) = registry.get(&application.instance.effect) else {
        warn!(effect = %application.instance.effect, "unknown effect definition, skipping");
        return;
    };

    let caster = attacker.id.clone();
    let target = match definition.polarity {
        Polarity::Buff => attacker,
        Polarity::Debuff => defender,
    };
    apply_effect_on(target, &caster, definition, application, rng);
}

/// Apply an effect instance to an explicit target
///
/// Used when caster and target are the same combatant, or when the caller
/// has already selected the target.
pub fn apply_effect_on(
    target: &mut CombatantState,
    caster: &str,
    definition: &Arc<EffectDefinition>,
    application: &EffectApplication,
    rng: &mut impl Rng,
) {
    target.prune_malformed();

    let instance = application.instance;
    let scaled = instance.scaled(application.ability_level);

    let outcome = if roll_chance(scaled.chance, rng) {
        let magnitude = compute_magnitude(
            definition,
            instance.basis,
            &scaled,
            application.last_damage_dealt,
            application.final_power,
        );
        let contributor = EffectContributor {
            source_ability: application.source_ability.to_string(),
            source_actor: caster.to_string(),
            remaining_turns: scaled.duration,
            tick_value: magnitude.tick_value,
            strength_rating: instance.strength_at(application.ability_level),
            removed_when: instance.removed_when,
            delta: magnitude.delta,
        };
        let incoming = Incoming {
            definition,
            caster,
            instance,
            scaled: &scaled,
            strength: magnitude.strength(definition.kind),
        };
        resolve(target, incoming, contributor)
    } else {
        Outcome::Ignored(IgnoreReason::ChanceFailed)
    };

    debug!(
        combatant = %target.id,
        effect = %definition.id,
        ability = %application.source_ability,
        level = application.ability_level,
        ?outcome,
        "effect application resolved"
    );
}

/// Apply every effect instance authored on an ability
pub fn apply_ability(
    attacker: &mut CombatantState,
    defender: &mut CombatantState,
    registry: &EffectRegistry,
    ability_id: &str,
    level: u32,
    last_damage_dealt: i32,
    final_power: i32,
) {
    let mut rng = rand::thread_rng();
    apply_ability_with_rng(
        attacker,
        defender,
        registry,
        ability_id,
        level,
        last_damage_dealt,
        final_power,
        &mut rng,
    );
}

/// Apply every effect instance authored on an ability with a provided RNG
#[allow(clippy::too_many_arguments)]
pub fn apply_ability_with_rng(
    attacker: &mut CombatantState,
    defender: &mut CombatantState,
    registry: &EffectRegistry,
    ability_id: &str,
    level: u32,
    last_damage_dealt: i32,
    final_power: i32,
    rng: &mut impl Rng,
) {
    let Some(ability) = registry.ability(ability_id) else {
        debug!(ability = %ability_id, "ability has no effects");
        return;
    };

    for instance in &ability.effects {
        let application = EffectApplication {
            source_ability: ability_id,
            ability_level: level,
            instance,
            last_damage_dealt,
            final_power,
        };
        apply_effect_with_rng(attacker, defender, registry, &application, rng);
    }
}

fn roll_chance(chance: i32, rng: &mut impl Rng) -> bool {
    if chance >= 100 {
        return true;
    }
    if chance <= 0 {
        return false;
    }
    rng.gen_range(0..100) < chance
}

/// Scaled data of the incoming application shared by every policy branch
struct Incoming<'a> {
    definition: &'a Arc<EffectDefinition>,
    caster: &'a str,
    instance: &'a EffectInstance,
    scaled: &'a ScaledInstance,
    /// Magnitude-based strength of the new contributor
    strength: i32,
}

fn resolve(target: &mut CombatantState, incoming: Incoming, contributor: EffectContributor) -> Outcome {
    let existing = target
        .effects
        .iter()
        .position(|e| e.id == incoming.definition.id);

    match (incoming.instance.reapply, existing) {
        (ReapplyRule::AddOnTop, _) | (_, None) => add_on_top(target, &incoming, contributor),
        (ReapplyRule::OverwriteIfStronger { compare }, Some(index)) => {
            overwrite_if_stronger(target, index, compare, &incoming, contributor)
        }
        (ReapplyRule::DoNothingIfPresent, Some(_)) => Outcome::Ignored(IgnoreReason::AlreadyPresent),
    }
}

/// Stack-or-merge: create the effect, or add a contributor if policy allows
fn add_on_top(target: &mut CombatantState, incoming: &Incoming, contributor: EffectContributor) -> Outcome {
    let CombatantState { effects, ledger, .. } = target;

    let Some(index) = effects.iter().position(|e| e.id == incoming.definition.id) else {
        let effect = ActiveEffect::new(Arc::clone(incoming.definition), incoming.caster, contributor);
        effect.apply_contributor(&effect.contributors[0], ledger);
        effects.push(effect);
        return Outcome::Created;
    };

    let effect = &mut effects[index];
    let from_same_ability = effect.contributors_from(&contributor.source_ability);
    let outcome = if from_same_ability > 0 {
        let cap = usize::try_from(incoming.scaled.max_stacks).unwrap_or(1);
        if !incoming.instance.stackable || from_same_ability >= cap {
            return Outcome::Ignored(IgnoreReason::StackCap);
        }
        Outcome::Stacked
    } else {
        if !incoming.instance.mergeable {
            return Outcome::Ignored(IgnoreReason::NotMergeable);
        }
        Outcome::Merged
    };

    effect.apply_contributor(&contributor, ledger);
    effect.contributors.push(contributor);

    let added = effect.contributors.len() - 1;
    if added > 0 {
        stack_durations(
            &mut effect.contributors,
            added,
            incoming.scaled.duration,
            incoming.instance.duration_stacking,
        );
    }
    outcome
}

/// Replace all contributors if the incoming application is strictly stronger
fn overwrite_if_stronger(
    target: &mut CombatantState,
    index: usize,
    compare: CompareMode,
    incoming: &Incoming,
    contributor: EffectContributor,
) -> Outcome {
    let CombatantState { effects, ledger, .. } = target;
    let effect = &mut effects[index];

    let stronger = match compare {
        CompareMode::ByStrengthRating => contributor.strength_rating > effect.total_strength(),
        CompareMode::ByComputedMagnitude => incoming.strength > effect.total_magnitude(),
    };
    if !stronger {
        return Outcome::Ignored(IgnoreReason::NotStronger);
    }

    effect.clear_contributors(ledger);
    effect.apply_contributor(&contributor, ledger);
    effect.contributors.push(contributor);
    effect.caster = incoming.caster.to_string();
    Outcome::Overwritten
}
