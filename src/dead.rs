use std::collections::BTreeSet;

use tracing::trace;

use crate::{automaton::Automaton, Set, Show, StateId};

/// Decides whether any final state is reachable from `from` via zero or more transitions.
/// A state that is itself final counts as reachable.
///
/// The search carries its own visited set, a state encountered twice within the same query
/// is a dead end and is not expanded again. This is the cycle guard, without it a self-loop
/// would never terminate. The explicit stack replaces call-stack recursion and preserves the
/// same backtracking behaviour.
fn can_reach_final(automaton: &Automaton, from: StateId) -> bool {
    let mut visited = Set::from_iter([from]);
    let mut stack = vec![from];

    while let Some(q) = stack.pop() {
        if automaton.is_final(q) {
            return true;
        }
        for &(_, p) in automaton.transitions_from(q) {
            if visited.insert(p) {
                stack.push(p);
            }
        }
    }
    false
}

/// Computes the set of dead states, i.e. the non-final states from which no final state is
/// reachable. Words entering a dead state can never be accepted, which is what makes these
/// states removable during cleanup.
///
/// Per declared state: final states are never dead, states without outgoing transitions are
/// dead unless final, everything else is decided by a fresh search via `can_reach_final`.
/// Quadratic in the worst case, which is fine at the scale of interactively entered
/// automata.
pub fn dead_states(automaton: &Automaton) -> BTreeSet<StateId> {
    automaton
        .states()
        .iter()
        .copied()
        .filter(|&q| {
            if automaton.is_final(q) {
                return false;
            }
            if automaton.transitions_from(q).is_empty() {
                trace!("state {} has no outgoing transitions, dead", q.show());
                return true;
            }
            !can_reach_final(automaton, q)
        })
        .collect()
}
