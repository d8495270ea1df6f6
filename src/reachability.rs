use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::{automaton::Automaton, Set, Show, StateId};

/// Computes the set of states reachable from the initial state via zero or more
/// transitions. The initial state is always a member of the result.
///
/// This is an iterative depth-first traversal over an explicit worklist. A state is marked
/// as seen when it is pushed, so each state enters the worklist at most once and the
/// traversal terminates after O(states + transitions) steps even in the presence of cycles.
/// The traversal order influences nothing but the trace output.
pub fn reachable_states(automaton: &Automaton) -> BTreeSet<StateId> {
    let mut seen = Set::from_iter([automaton.initial()]);
    let mut stack = vec![automaton.initial()];

    while let Some(q) = stack.pop() {
        let transitions = automaton.transitions_from(q);
        if transitions.is_empty() {
            debug!("state {} has 0 transitions", q.show());
            continue;
        }
        for &(_, p) in transitions {
            if seen.insert(p) {
                stack.push(p);
            }
        }
        trace!(
            "expanded {}, pending worklist {}",
            q.show(),
            StateId::show_collection(stack.iter())
        );
    }

    seen.into_iter().collect()
}

/// Computes the complement of [`reachable_states`] within the declared state set, in
/// ascending order.
pub fn unreachable_states(automaton: &Automaton) -> BTreeSet<StateId> {
    let reachable = reachable_states(automaton);
    automaton
        .states()
        .iter()
        .copied()
        .filter(|q| !reachable.contains(q))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use std::collections::BTreeSet;

    fn automaton(
        states: impl IntoIterator<Item = StateId>,
        initial: StateId,
        finals: impl IntoIterator<Item = StateId>,
        transitions: impl IntoIterator<Item = (StateId, char, StateId)>,
    ) -> Automaton {
        let mut builder = AutomatonBuilder::default();
        builder.add_states(states);
        builder.add_symbols(['a', 'b']);
        builder.set_initial(initial).unwrap();
        for q in finals {
            assert!(builder.add_final_state(q).is_none());
        }
        for (q, sym, p) in transitions {
            assert!(builder.add_transition(q, sym, p).is_none());
        }
        builder.build().unwrap()
    }

    #[test]
    fn initial_state_is_always_reachable() {
        let automaton = automaton([4], 4, [], []);
        assert!(reachable_states(&automaton).contains(&4));
        assert!(unreachable_states(&automaton).is_empty());
    }

    #[test_log::test]
    fn single_transition_chain() {
        // Example A: 2 is final but unreachable
        let automaton = automaton([0, 1, 2], 0, [2], [(0, 'a', 1)]);
        assert_eq!(reachable_states(&automaton), BTreeSet::from([0, 1]));
        assert_eq!(unreachable_states(&automaton), BTreeSet::from([2]));
    }

    #[test]
    fn cycles_terminate() {
        let automaton = automaton(
            [0, 1, 2],
            0,
            [],
            [(0, 'a', 1), (1, 'b', 0), (1, 'a', 2), (2, 'a', 2)],
        );
        assert_eq!(reachable_states(&automaton), BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn isolated_state_is_unreachable() {
        let automaton = automaton([0, 1, 5], 0, [1], [(0, 'a', 1)]);
        assert_eq!(unreachable_states(&automaton), BTreeSet::from([5]));
    }

    #[test]
    fn noncontiguous_identifiers() {
        let automaton = automaton([10, 20, 300], 300, [], [(300, 'a', 10), (10, 'b', 300)]);
        assert_eq!(reachable_states(&automaton), BTreeSet::from([10, 300]));
        assert_eq!(unreachable_states(&automaton), BTreeSet::from([20]));
    }

    #[test]
    fn analysis_is_idempotent() {
        let automaton = automaton([0, 1, 2], 0, [2], [(0, 'a', 1), (1, 'a', 0)]);
        assert_eq!(reachable_states(&automaton), reachable_states(&automaton));
        assert_eq!(unreachable_states(&automaton), unreachable_states(&automaton));
    }
}
