//! Library for classifying the states of a finite automaton.
//!
//! An automaton here is the classical tuple of a finite state set, an alphabet of symbols, a
//! designated initial state, a set of final (accepting) states and a transition relation.
//! The relation may be non-deterministic, multiple transitions from the same state on the
//! same symbol are perfectly fine. The crate answers two questions about such a structure,
//! both of which come up when cleaning up automata in lexer or parser pipelines: which
//! states can never be visited because no path from the initial state leads to them
//! (unreachable states), and which states can never contribute to acceptance because no path
//! from them leads into a final state (dead states).
//!
//! The entry point is [`automaton::AutomatonBuilder`], which accumulates the individual
//! pieces of the tuple and validates each one as it arrives. References to undeclared states
//! or symbols in final-state entries and transitions are reported as
//! [`automaton::ValidationWarning`]s and skipped, while an initial state outside the
//! declared state set is a [`automaton::BuildError`] and aborts construction altogether. A
//! successful build yields an immutable [`automaton::Automaton`] on which the analyses in
//! [`reachability`] and [`dead`] operate as pure functions.
//!
//! The [`session`] module wires everything to a line-oriented interactive prompt loop, which
//! is what the `statesweep` binary runs over stdin/stdout.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude re-exports the types and functions needed for typical use of the crate,
/// i.e. `use statesweep::prelude::*;` should be enough to get going.
pub mod prelude {
    pub use super::{
        automaton::{Automaton, AutomatonBuilder, BuildError, ValidationWarning},
        dead::dead_states,
        reachability::{reachable_states, unreachable_states},
        Map, Set, Show, StateId,
    };
}

/// Defines the automaton data model and its validating builder.
pub mod automaton;

/// Forward reachability from the initial state.
pub mod reachability;

/// Classification of dead states, i.e. states from which no final state is reachable.
pub mod dead;

/// The interactive prompt loop that reads an automaton and renders the analysis results.
pub mod session;

/// The type of state identifiers. Identifiers are arbitrary, they need not be contiguous
/// and need not start at zero.
pub type StateId = u32;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Helper trait which can be used to display states, symbols and collections thereof.
pub trait Show {
    /// Returns a human readable representation of `self`. This is mainly used for rendering
    /// results and for debug output.
    fn show(&self) -> String;
    /// Show a collection of the thing, for a collection of states this should be
    /// {0, 1, 2, ...}. By default this is unimplemented.
    fn show_collection<'a, I>(_iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
        I::IntoIter: DoubleEndedIterator,
    {
        unimplemented!("This operation makes no sense.")
    }
}

impl Show for StateId {
    fn show(&self) -> String {
        self.to_string()
    }
    fn show_collection<'a, I: IntoIterator<Item = &'a Self>>(iter: I) -> String
    where
        Self: 'a,
        I::IntoIter: DoubleEndedIterator,
    {
        format!(
            "{{{}}}",
            itertools::Itertools::join(&mut iter.into_iter().map(|x| x.show()), ", ")
        )
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
    fn show_collection<'a, I: IntoIterator<Item = &'a Self>>(iter: I) -> String
    where
        Self: 'a,
        I::IntoIter: DoubleEndedIterator,
    {
        format!(
            "{{{}}}",
            itertools::Itertools::join(&mut iter.into_iter().map(|x| x.show()), ", ")
        )
    }
}

impl<S: Show> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}
