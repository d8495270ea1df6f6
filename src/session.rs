use std::collections::VecDeque;
use std::io::{BufRead, Write};

use itertools::Itertools;
use thiserror::Error;
use tracing::debug;

use crate::automaton::{AutomatonBuilder, BuildError};
use crate::{dead::dead_states, reachability::unreachable_states, Show, StateId};

/// The ways an interactive session can end prematurely. Everything here is fatal for the
/// session, the recoverable validation failures never surface as errors but are rendered
/// inline as `Error:` lines.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Construction of the automaton failed, see [`BuildError`].
    #[error("automaton construction failed: {0}")]
    Build(#[from] BuildError),
    /// A token could not be parsed as the kind of value that was expected at its position.
    #[error("expected {expected}, got `{token}`")]
    MalformedToken {
        /// What the session was trying to read.
        expected: &'static str,
        /// The offending token.
        token: String,
    },
    /// The input stream ended while a value was still expected.
    #[error("input ended while reading {0}")]
    UnexpectedEnd(&'static str),
    /// Reading from the input or writing to the output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Splits an input stream into whitespace-separated tokens, refilling line by line. The
/// original prompt loop accepts values separated by any whitespace, including several per
/// line, and so do we.
struct Tokens<R> {
    read: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(read: R) -> Self {
        Self {
            read,
            pending: VecDeque::new(),
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<String, SessionError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let mut line = String::new();
            if self.read.read_line(&mut line)? == 0 {
                return Err(SessionError::UnexpectedEnd(expected));
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }

    fn count(&mut self, expected: &'static str) -> Result<usize, SessionError> {
        let token = self.next(expected)?;
        token.parse().map_err(|_| SessionError::MalformedToken {
            expected,
            token,
        })
    }

    fn state(&mut self, expected: &'static str) -> Result<StateId, SessionError> {
        let token = self.next(expected)?;
        token.parse().map_err(|_| SessionError::MalformedToken {
            expected,
            token,
        })
    }

    fn symbol(&mut self, expected: &'static str) -> Result<char, SessionError> {
        let token = self.next(expected)?;
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(sym), None) => Ok(sym),
            _ => Err(SessionError::MalformedToken { expected, token }),
        }
    }
}

/// Runs one interactive session: prompts for the pieces of an automaton in the order
/// states, alphabet, initial state, final states, transitions, then reports the unreachable
/// and the dead states. Invalid final states and transitions are rendered as `Error:` lines
/// and skipped, an undeclared initial state ends the session immediately and produces no
/// analysis output at all.
///
/// Generic over the streams so tests can drive the loop with in-memory buffers.
pub fn run_session<R: BufRead, W: Write>(read: R, mut out: W) -> Result<(), SessionError> {
    let mut tokens = Tokens::new(read);
    let mut builder = AutomatonBuilder::default();

    write!(out, "Enter number of states: ")?;
    out.flush()?;
    let num_states = tokens.count("number of states")?;
    write!(out, "Enter states (as integers): ")?;
    out.flush()?;
    for _ in 0..num_states {
        builder.add_state(tokens.state("a state")?);
    }

    write!(out, "Enter number of symbols in the alphabet: ")?;
    out.flush()?;
    let num_symbols = tokens.count("number of symbols")?;
    write!(out, "Enter symbols (as characters): ")?;
    out.flush()?;
    for _ in 0..num_symbols {
        builder.add_symbol(tokens.symbol("a symbol")?);
    }

    write!(out, "Enter the initial state: ")?;
    out.flush()?;
    if let Err(e) = builder.set_initial(tokens.state("the initial state")?) {
        writeln!(out, "Error: {e}!")?;
        return Err(e.into());
    }

    write!(out, "Enter number of final states: ")?;
    out.flush()?;
    let num_final = tokens.count("number of final states")?;
    write!(out, "Enter final states: ")?;
    out.flush()?;
    for _ in 0..num_final {
        if let Some(warning) = builder.add_final_state(tokens.state("a final state")?) {
            writeln!(out, "Error: {warning}!")?;
        }
    }

    write!(out, "Enter number of transitions: ")?;
    out.flush()?;
    let num_transitions = tokens.count("number of transitions")?;
    writeln!(out, "Enter transitions (format: current_state symbol next_state):")?;
    for _ in 0..num_transitions {
        let q = tokens.state("a transition source")?;
        let sym = tokens.symbol("a transition symbol")?;
        let p = tokens.state("a transition target")?;
        if let Some(warning) = builder.add_transition(q, sym, p) {
            writeln!(out, "Error: {warning}!")?;
        }
    }

    let automaton = builder.build()?;
    debug!("built {}", automaton.show());

    let unreachable = unreachable_states(&automaton);
    let dead = dead_states(&automaton);

    writeln!(
        out,
        "Unreachable states: {}",
        unreachable.iter().map(|q| q.show()).join(" ")
    )?;
    writeln!(out, "Dead states: {}", dead.iter().map(|q| q.show()).join(" "))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> (Result<(), SessionError>, String) {
        let mut out = Vec::new();
        let result = run_session(Cursor::new(input), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn full_session() {
        // Example A: states {0, 1, 2}, alphabet {a}, initial 0, final {2}, one transition
        let (result, out) = run("3\n0 1 2\n1\na\n0\n1\n2\n1\n0 a 1\n");
        result.unwrap();
        assert!(out.contains("Unreachable states: 2\n"));
        assert!(out.contains("Dead states: 0 1\n"));
    }

    #[test]
    fn tokens_may_share_lines() {
        let (result, out) = run("2 0 1 1 a 0 1 1 1 0 a 1");
        result.unwrap();
        assert!(out.contains("Unreachable states: \n"));
        assert!(out.contains("Dead states: \n"));
    }

    #[test]
    fn undeclared_initial_state_aborts_without_analysis() {
        let (result, out) = run("2\n0 1\n1\na\n7\n");
        assert!(matches!(
            result,
            Err(SessionError::Build(BuildError::InitialStateNotDeclared(7)))
        ));
        assert!(out.contains("Error: Initial state is not in the set of states!\n"));
        assert!(!out.contains("Unreachable states:"));
        assert!(!out.contains("Dead states:"));
    }

    #[test]
    fn invalid_entries_are_reported_and_skipped() {
        // final state 5 and the transition into 9 are undeclared, both get dropped
        let (result, out) = run("3\n0 1 2\n1\na\n0\n2\n2 5\n2\n0 a 1\n1 a 9\n");
        result.unwrap();
        assert!(out.contains("Error: State 5 is not in the set of states!\n"));
        assert!(out.contains("Error: State 9 is not in the set of states!\n"));
        // analysis proceeds on the reduced model
        assert!(out.contains("Unreachable states: 2\n"));
        assert!(out.contains("Dead states: 0 1\n"));
    }

    #[test]
    fn prompts_appear_in_order() {
        let (result, out) = run("1\n0\n1\na\n0\n0\n0\n");
        result.unwrap();
        let positions: Vec<_> = [
            "Enter number of states: ",
            "Enter states (as integers): ",
            "Enter number of symbols in the alphabet: ",
            "Enter symbols (as characters): ",
            "Enter the initial state: ",
            "Enter number of final states: ",
            "Enter final states: ",
            "Enter number of transitions: ",
            "Enter transitions (format: current_state symbol next_state):",
        ]
        .iter()
        .map(|prompt| out.find(prompt).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn malformed_count_is_an_error() {
        let (result, _) = run("many\n");
        assert!(matches!(
            result,
            Err(SessionError::MalformedToken { expected: "number of states", .. })
        ));
    }

    #[test]
    fn multi_character_symbol_is_an_error() {
        let (result, _) = run("1\n0\n1\nab\n");
        assert!(matches!(result, Err(SessionError::MalformedToken { .. })));
    }

    #[test]
    fn truncated_input_is_an_error() {
        let (result, _) = run("2\n0\n");
        assert!(matches!(result, Err(SessionError::UnexpectedEnd(_))));
    }
}
