use std::collections::BTreeSet;

use thiserror::Error;
use tracing::warn;

use crate::{Map, Show, StateId};

/// An immutable finite automaton. Instances can only be obtained through an
/// [`AutomatonBuilder`], which guarantees that the initial state is a member of the state
/// set, that all final states are declared states and that every stored transition has a
/// declared source, a declared target and a symbol from the alphabet. Nothing mutates an
/// automaton after construction, so the analyses may freely share references to it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Automaton {
    states: BTreeSet<StateId>,
    alphabet: BTreeSet<char>,
    initial: StateId,
    final_states: BTreeSet<StateId>,
    transitions: Map<StateId, Vec<(char, StateId)>>,
}

impl Automaton {
    /// The set of declared states, in ascending order.
    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }

    /// The set of alphabet symbols.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// The designated initial state. Guaranteed to be a member of [`Self::states`].
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// The set of final (accepting) states. Guaranteed to be a subset of [`Self::states`].
    pub fn final_states(&self) -> &BTreeSet<StateId> {
        &self.final_states
    }

    /// Returns whether `q` is a final state.
    pub fn is_final(&self, q: StateId) -> bool {
        self.final_states.contains(&q)
    }

    /// Returns the outgoing transitions of `q` in insertion order, or an empty slice if `q`
    /// has none. States without outgoing transitions are simply absent from the underlying
    /// map.
    pub fn transitions_from(&self, q: StateId) -> &[(char, StateId)] {
        self.transitions.get(&q).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The total number of stored transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(Vec::len).sum()
    }
}

/// The fatal construction failures. In contrast to a [`ValidationWarning`], encountering one
/// of these aborts construction, no [`Automaton`] value comes into existence and nothing can
/// be analyzed. Keeping this separate from the warning type is deliberate, the two must not
/// be merged into a single "invalid input" kind.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum BuildError {
    /// The designated initial state is not a member of the declared state set.
    #[error("Initial state is not in the set of states")]
    InitialStateNotDeclared(StateId),
    /// [`AutomatonBuilder::build`] was called without a successfully set initial state.
    #[error("No initial state was given")]
    MissingInitialState,
}

/// A recoverable validation failure. The offending entry is reported and skipped,
/// construction continues with the remaining entries.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum ValidationWarning {
    /// A final-state entry references a state that was never declared.
    #[error("State {0} is not in the set of states")]
    UndeclaredFinalState(StateId),
    /// The source of a transition was never declared as a state.
    #[error("State {0} is not in the set of states")]
    UndeclaredTransitionSource(StateId),
    /// The target of a transition was never declared as a state.
    #[error("State {0} is not in the set of states")]
    UndeclaredTransitionTarget(StateId),
    /// A transition is labelled with a symbol outside the alphabet.
    #[error("Symbol {0} is not in the alphabet")]
    UndeclaredSymbol(char),
}

/// Accumulates the pieces of an automaton and validates each one as it arrives. States and
/// symbols must be declared before anything referencing them, which is exactly the order the
/// interactive session supplies them in.
///
/// Entries that fail validation are returned as [`ValidationWarning`]s and additionally
/// collected in [`Self::warnings`], the builder itself keeps going. Only
/// [`Self::set_initial`] can fail for real.
///
/// # Example
/// ```
/// use statesweep::prelude::*;
///
/// let mut builder = AutomatonBuilder::default();
/// builder.add_states([0, 1, 2]);
/// builder.add_symbols(['a', 'b']);
/// builder.set_initial(0).unwrap();
/// assert!(builder.add_final_state(2).is_none());
/// assert!(builder.add_transition(0, 'a', 1).is_none());
/// // state 7 was never declared, the entry is dropped
/// assert!(builder.add_transition(1, 'b', 7).is_some());
/// let automaton = builder.build().unwrap();
/// assert_eq!(automaton.transition_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    states: BTreeSet<StateId>,
    alphabet: BTreeSet<char>,
    initial: Option<StateId>,
    final_states: BTreeSet<StateId>,
    transitions: Map<StateId, Vec<(char, StateId)>>,
    warnings: Vec<ValidationWarning>,
}

impl AutomatonBuilder {
    /// Declares a state. Duplicates collapse under set semantics.
    pub fn add_state(&mut self, q: StateId) {
        self.states.insert(q);
    }

    /// Declares all states yielded by the given iterator.
    pub fn add_states<I: IntoIterator<Item = StateId>>(&mut self, iter: I) {
        self.states.extend(iter);
    }

    /// Declares an alphabet symbol. Duplicates collapse under set semantics.
    pub fn add_symbol(&mut self, sym: char) {
        self.alphabet.insert(sym);
    }

    /// Declares all symbols yielded by the given iterator.
    pub fn add_symbols<I: IntoIterator<Item = char>>(&mut self, iter: I) {
        self.alphabet.extend(iter);
    }

    /// Designates `q` as the initial state. Fails if `q` has not been declared, this is the
    /// one fatal condition during construction and the caller must not proceed past it.
    pub fn set_initial(&mut self, q: StateId) -> Result<(), BuildError> {
        if !self.states.contains(&q) {
            return Err(BuildError::InitialStateNotDeclared(q));
        }
        self.initial = Some(q);
        Ok(())
    }

    /// Marks `q` as a final state. If `q` was never declared the entry is skipped and the
    /// corresponding warning is returned (and recorded).
    pub fn add_final_state(&mut self, q: StateId) -> Option<ValidationWarning> {
        if !self.states.contains(&q) {
            return Some(self.skip(ValidationWarning::UndeclaredFinalState(q)));
        }
        self.final_states.insert(q);
        None
    }

    /// Adds a transition from `q` to `p` labelled with `sym`. Each field is checked
    /// independently, the first failing check determines the returned warning and the whole
    /// triple is dropped. Valid duplicates are kept, the relation may be non-deterministic.
    pub fn add_transition(&mut self, q: StateId, sym: char, p: StateId) -> Option<ValidationWarning> {
        if !self.states.contains(&q) {
            return Some(self.skip(ValidationWarning::UndeclaredTransitionSource(q)));
        }
        if !self.states.contains(&p) {
            return Some(self.skip(ValidationWarning::UndeclaredTransitionTarget(p)));
        }
        if !self.alphabet.contains(&sym) {
            return Some(self.skip(ValidationWarning::UndeclaredSymbol(sym)));
        }
        self.transitions.entry(q).or_default().push((sym, p));
        None
    }

    /// All warnings accumulated so far, in the order they occurred.
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Finalizes construction. The membership of the initial state is checked once more so
    /// that an automaton with an undeclared initial state cannot exist even if the caller
    /// ignored the error from [`Self::set_initial`].
    pub fn build(self) -> Result<Automaton, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        if !self.states.contains(&initial) {
            return Err(BuildError::InitialStateNotDeclared(initial));
        }
        Ok(Automaton {
            states: self.states,
            alphabet: self.alphabet,
            initial,
            final_states: self.final_states,
            transitions: self.transitions,
        })
    }

    fn skip(&mut self, warning: ValidationWarning) -> ValidationWarning {
        warn!("skipping invalid entry: {warning}");
        self.warnings.push(warning);
        warning
    }
}

impl Show for Automaton {
    fn show(&self) -> String {
        format!(
            "automaton with states {} over {}, initial {} and final states {}",
            StateId::show_collection(self.states.iter()),
            char::show_collection(self.alphabet.iter()),
            self.initial.show(),
            StateId::show_collection(self.final_states.iter())
        )
    }
}
