//! Property-based tests for form-state list actions.
//!
//! Uses proptest to verify the identity-key invariants: keys never
//! repeat, they travel with their entries through every mutation, and
//! failed actions leave the state untouched.

use std::collections::HashSet;

use proptest::prelude::*;

use taskform_schema::schema::{EntryKey, TaskRecord};
use taskform_state::controller::FormState;

/// Builds a form with `count` tasks whose contents encode their original
/// position, so reorderings are observable.
fn state_with(count: usize) -> FormState {
    let mut state = FormState::new();
    state.set_title("Groceries");
    for position in 0..count {
        let key = state.insert_task();
        state
            .set_content(key, format!("task-{position}"))
            .unwrap_or_else(|e| panic!("set_content failed: {e}"));
    }
    state
}

fn keys(state: &FormState) -> Vec<EntryKey> {
    state.entries().map(|(key, _)| key).collect()
}

fn contents(state: &FormState) -> Vec<String> {
    state
        .entries()
        .map(|(_, entry)| entry.draft.content.clone())
        .collect()
}

proptest! {
    #[test]
    fn inserts_always_yield_distinct_keys(count in 1usize..20) {
        let state = state_with(count);
        let keys = keys(&state);
        let distinct: HashSet<_> = keys.iter().copied().collect();
        prop_assert_eq!(distinct.len(), count);
    }

    #[test]
    fn reorder_is_a_permutation_with_keys_attached(
        count in 2usize..10,
        from_seed in 0usize..10,
        to_seed in 0usize..10,
    ) {
        let from = from_seed % count;
        let to = to_seed % count;
        let mut state = state_with(count);
        let before_keys = keys(&state);
        let before_contents = contents(&state);

        state.reorder_task(from, to).unwrap_or_else(|e| panic!("reorder failed: {e}"));

        let after_keys = keys(&state);
        let after_contents = contents(&state);

        // Same key set, moved key at its destination.
        let before_set: HashSet<_> = before_keys.iter().copied().collect();
        let after_set: HashSet<_> = after_keys.iter().copied().collect();
        prop_assert_eq!(&before_set, &after_set);
        prop_assert_eq!(after_keys[to], before_keys[from]);

        // Content travels with its key everywhere.
        for (index, key) in after_keys.iter().enumerate() {
            let original = before_keys.iter().position(|k| k == key).unwrap();
            prop_assert_eq!(&after_contents[index], &before_contents[original]);
        }

        // Untouched entries keep their relative order.
        let moved = before_keys[from];
        let before_rest: Vec<_> = before_keys.iter().filter(|k| **k != moved).collect();
        let after_rest: Vec<_> = after_keys.iter().filter(|k| **k != moved).collect();
        prop_assert_eq!(before_rest, after_rest);
    }

    #[test]
    fn remove_preserves_remaining_order_and_keys(
        count in 1usize..10,
        index_seed in 0usize..10,
    ) {
        let index = index_seed % count;
        let mut state = state_with(count);
        let mut expected = keys(&state);

        state.remove_task(index).unwrap_or_else(|e| panic!("remove failed: {e}"));

        expected.remove(index);
        prop_assert_eq!(keys(&state), expected);
        prop_assert_eq!(state.task_count(), count - 1);
    }

    #[test]
    fn out_of_range_actions_leave_state_unchanged(
        count in 0usize..5,
        index in 5usize..20,
    ) {
        let mut state = state_with(count);
        let before_keys = keys(&state);
        let before_contents = contents(&state);

        prop_assert!(state.remove_task(index).is_err());
        prop_assert!(state.reorder_task(index, 0).is_err());
        prop_assert!(state.reorder_task(0, index).is_err());

        prop_assert_eq!(keys(&state), before_keys);
        prop_assert_eq!(contents(&state), before_contents);
    }

    #[test]
    fn replace_keeps_key_and_position(
        count in 1usize..8,
        index_seed in 0usize..8,
        completed in any::<bool>(),
    ) {
        let index = index_seed % count;
        let mut state = state_with(count);
        let before_keys = keys(&state);
        let key = before_keys[index];

        state
            .replace_task(key, TaskRecord { content: "replaced".to_string(), completed })
            .unwrap_or_else(|e| panic!("replace failed: {e}"));

        prop_assert_eq!(keys(&state), before_keys);
        let entry = state.entry(key).unwrap();
        prop_assert_eq!(entry.draft.content.as_str(), "replaced");
        prop_assert_eq!(entry.draft.completed, completed);
    }

    #[test]
    fn form_data_round_trip_is_lossless(count in 0usize..8, flags in prop::collection::vec(any::<bool>(), 8)) {
        let mut state = state_with(count);
        for (position, key) in keys(&state).into_iter().enumerate() {
            state
                .set_completed(key, flags[position])
                .unwrap_or_else(|e| panic!("set_completed failed: {e}"));
        }

        let restored = FormState::from_form_data(&state.to_form_data());

        prop_assert_eq!(restored.title(), state.title());
        prop_assert_eq!(keys(&restored), keys(&state));
        prop_assert_eq!(contents(&restored), contents(&state));
        for (key, entry) in state.entries() {
            prop_assert_eq!(
                restored.entry(key).unwrap().draft.completed,
                entry.draft.completed
            );
        }
    }
}
