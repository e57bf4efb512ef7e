//! Duration stacking between contributors of the same effect

use crate::effect::{DurationStacking, EffectContributor};

/// Adjust durations after the contributor at `added` joined the effect
///
/// Only meaningful when the effect already had other contributors.
pub fn stack_durations(
    contributors: &mut [EffectContributor],
    added: usize,
    incoming: i32,
    stacking: DurationStacking,
) {
    match stacking {
        DurationStacking::None => {}
        DurationStacking::Refresh { overrides_remaining } => {
            for contributor in contributors.iter_mut() {
                contributor.remaining_turns = if overrides_remaining {
                    incoming
                } else {
                    contributor.remaining_turns.max(incoming)
                };
            }
        }
        DurationStacking::Prolong => {
            let mut longest = None;
            for (i, contributor) in contributors.iter_mut().enumerate() {
                if i == added {
                    continue;
                }
                contributor.remaining_turns = contributor.remaining_turns.saturating_add(incoming);
                longest = longest.max(Some(contributor.remaining_turns));
            }
            if let (Some(longest), Some(new)) = (longest, contributors.get_mut(added)) {
                new.remaining_turns = longest;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::RemovedWhen;
    use crate::ledger::StatDelta;

    fn with_durations(durations: &[i32]) -> Vec<EffectContributor> {
        durations
            .iter()
            .map(|&turns| EffectContributor {
                source_ability: "a".to_string(),
                source_actor: "p".to_string(),
                remaining_turns: turns,
                tick_value: 0,
                strength_rating: 1,
                removed_when: RemovedWhen::Duration,
                delta: StatDelta::default(),
            })
            .collect()
    }

    fn durations(contributors: &[EffectContributor]) -> Vec<i32> {
        contributors.iter().map(|c| c.remaining_turns).collect()
    }

    #[test]
    fn test_prolong() {
        // Existing [3, 5], new contributor with 4 turns
        let mut contributors = with_durations(&[3, 5, 4]);
        stack_durations(&mut contributors, 2, 4, DurationStacking::Prolong);
        assert_eq!(durations(&contributors), vec![7, 9, 9]);
    }

    #[test]
    fn test_refresh_keeps_longer() {
        let mut contributors = with_durations(&[3, 5, 2]);
        stack_durations(
            &mut contributors,
            2,
            2,
            DurationStacking::Refresh { overrides_remaining: false },
        );
        assert_eq!(durations(&contributors), vec![3, 5, 2]);
    }

    #[test]
    fn test_refresh_raises_shorter() {
        let mut contributors = with_durations(&[3, 5, 6]);
        stack_durations(
            &mut contributors,
            2,
            6,
            DurationStacking::Refresh { overrides_remaining: false },
        );
        assert_eq!(durations(&contributors), vec![6, 6, 6]);
    }

    #[test]
    fn test_refresh_overrides() {
        let mut contributors = with_durations(&[3, 5, 2]);
        stack_durations(
            &mut contributors,
            2,
            2,
            DurationStacking::Refresh { overrides_remaining: true },
        );
        assert_eq!(durations(&contributors), vec![2, 2, 2]);
    }

    #[test]
    fn test_none() {
        let mut contributors = with_durations(&[3, 5, 1]);
        stack_durations(&mut contributors, 2, 1, DurationStacking::None);
        assert_eq!(durations(&contributors), vec![3, 5, 1]);
    }
}
