// src/lexer/tables/mod.rs
pub mod build;
pub mod dfa;
pub mod io;
pub mod minimize;
pub mod nfa;
pub mod pattern;
pub mod tokens;

use std::collections::BTreeMap;

use thiserror::Error;

pub use build::{BuildError, build_tables, build_tables_many};
pub use io::{
    LoadError, emit, load, load_tables_json_bytes, save_tables_json, save_tables_text,
};
pub use pattern::Pattern;
pub use tokens::{INVALID_TOKEN, Rule, RuleSet, TokenKind};

/// Input alphabet. Tables are keyed by Unicode scalar values.
pub type Symbol = char;

/// Dense state index; 0 is always the initial state.
pub type StateId = usize;

/// Invariant violation in an automaton handed to the emitter or the loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("malformed model: automaton has no states")]
    NoStates,
    #[error("malformed model: {states} states but {accepts} accept flags")]
    LengthMismatch { states: usize, accepts: usize },
    #[error("malformed model: state {state} on {symbol:?} targets {target} (only {states} states)")]
    TargetOutOfRange {
        state: StateId,
        symbol: Symbol,
        target: StateId,
        states: usize,
    },
    #[error("malformed model: token map has {got} entries for {states} states")]
    TokenMapMismatch { states: usize, got: usize },
    #[error("malformed binding: name {0:?} is not an identifier")]
    BadName(String),
    #[error("malformed binding: type reference {0:?} is not a dotted identifier")]
    BadTypeRef(String),
}

/// The runtime-facing table: one transition map per state plus a parallel
/// acceptance vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    pub states: Vec<BTreeMap<Symbol, StateId>>,
    pub accepts: Vec<bool>,
}

impl Automaton {
    /// The single-state automaton that rejects everything.
    pub fn empty() -> Self {
        Self {
            states: vec![BTreeMap::new()],
            accepts: vec![false],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn next(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        self.states[state].get(&symbol).copied()
    }

    #[inline]
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepts[state]
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.states.is_empty() {
            return Err(TableError::NoStates);
        }
        if self.accepts.len() != self.states.len() {
            return Err(TableError::LengthMismatch {
                states: self.states.len(),
                accepts: self.accepts.len(),
            });
        }
        let n = self.states.len();
        for (state, row) in self.states.iter().enumerate() {
            for (&symbol, &target) in row {
                if target >= n {
                    return Err(TableError::TargetOutOfRange {
                        state,
                        symbol,
                        target,
                        states: n,
                    });
                }
            }
        }
        Ok(())
    }

    /// Greedy single match starting at `pos`: returns the end offset of the
    /// token the scanner would emit there, or `None` if it would fail.
    pub fn recognize(&self, input: &[Symbol], pos: usize) -> Option<usize> {
        let mut state = 0;
        for (i, &sym) in input.iter().enumerate().skip(pos) {
            match self.next(state, sym) {
                Some(to) => state = to,
                None if self.accepts[state] && i > pos => return Some(i),
                None => return None,
            }
        }
        (self.accepts[state] && input.len() > pos).then_some(input.len())
    }

    /// Non-greedy single match: the first non-empty prefix at `pos` that ends
    /// in an accepting state.
    pub fn recognize_shortest(&self, input: &[Symbol], pos: usize) -> Option<usize> {
        let mut state = 0;
        for (i, &sym) in input.iter().enumerate().skip(pos) {
            state = self.next(state, sym)?;
            if self.accepts[state] {
                return Some(i + 1);
            }
        }
        None
    }

    /// Whole-input membership test.
    pub fn accepts_all(&self, input: &[Symbol]) -> bool {
        let mut state = 0;
        for &sym in input {
            match self.next(state, sym) {
                Some(to) => state = to,
                None => return false,
            }
        }
        self.accepts[state]
    }
}

/// Compiled lexer tables: the automaton plus the rule each state accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    pub automaton: Automaton,
    pub token_of: Vec<u32>, // state -> rule index or INVALID_TOKEN
    pub names: Vec<String>, // rule index -> token kind name
}

impl Tables {
    pub fn kind_of(&self, state: StateId) -> Option<u32> {
        match self.token_of.get(state) {
            Some(&k) if k != INVALID_TOKEN => Some(k),
            _ => None,
        }
    }

    pub fn name_of(&self, kind: u32) -> Option<&str> {
        self.names.get(kind as usize).map(String::as_str)
    }

    pub fn validate(&self) -> Result<(), TableError> {
        self.automaton.validate()?;
        if self.token_of.len() != self.automaton.len() {
            return Err(TableError::TokenMapMismatch {
                states: self.automaton.len(),
                got: self.token_of.len(),
            });
        }
        Ok(())
    }
}
