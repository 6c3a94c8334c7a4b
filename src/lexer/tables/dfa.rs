// src/lexer/tables/dfa.rs
// Subset construction. DFA state 0 is the closure of the NFA start; states are
// numbered in breadth-first discovery order with symbols visited ascending.

use std::collections::{BTreeMap, VecDeque};

use hashbrown::HashMap;

use super::{Automaton, StateId, Symbol, Tables, nfa::Nfa, tokens::INVALID_TOKEN};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DfaState {
    pub next: BTreeMap<Symbol, StateId>,
    pub token: u32, // rule index or INVALID_TOKEN
}

impl DfaState {
    pub fn is_accepting(&self) -> bool {
        self.token != INVALID_TOKEN
    }
}

/// Deterministic automaton that still remembers which rule each state accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub states: Vec<DfaState>,
}

impl Dfa {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Drop the rule tags, keeping only transitions and acceptance.
    pub fn automaton(&self) -> Automaton {
        Automaton {
            states: self.states.iter().map(|s| s.next.clone()).collect(),
            accepts: self.states.iter().map(DfaState::is_accepting).collect(),
        }
    }

    pub fn into_tables(self, names: Vec<String>) -> Tables {
        let automaton = self.automaton();
        let token_of = self.states.into_iter().map(|s| s.token).collect();
        Tables {
            automaton,
            token_of,
            names,
        }
    }
}

impl From<&Tables> for Dfa {
    fn from(t: &Tables) -> Self {
        let states = t
            .automaton
            .states
            .iter()
            .zip(&t.token_of)
            .map(|(next, &token)| DfaState {
                next: next.clone(),
                token,
            })
            .collect();
        Dfa { states }
    }
}

pub fn determinize(nfa: &Nfa) -> Dfa {
    let mut states: Vec<DfaState> = Vec::new();
    let mut ids: HashMap<Vec<StateId>, StateId> = HashMap::new();
    let mut sets: Vec<Vec<StateId>> = Vec::new();
    let mut work: VecDeque<StateId> = VecDeque::new();

    let start = nfa.epsilon_closure(&[nfa.start]);
    states.push(DfaState {
        next: BTreeMap::new(),
        token: nfa.accept_of(&start).unwrap_or(INVALID_TOKEN),
    });
    ids.insert(start.clone(), 0);
    sets.push(start);
    work.push_back(0);

    while let Some(d) = work.pop_front() {
        // one pass over the members' edges; keys come out ascending
        let mut moves: BTreeMap<Symbol, Vec<StateId>> = BTreeMap::new();
        for &s in &sets[d] {
            for &(c, t) in &nfa.states[s].edges {
                moves.entry(c).or_default().push(t);
            }
        }

        for (sym, moved) in moves {
            let target = nfa.epsilon_closure(&moved);
            let to = match ids.get(&target) {
                Some(&id) => id,
                None => {
                    let id = states.len();
                    states.push(DfaState {
                        next: BTreeMap::new(),
                        token: nfa.accept_of(&target).unwrap_or(INVALID_TOKEN),
                    });
                    ids.insert(target.clone(), id);
                    sets.push(target);
                    work.push_back(id);
                    id
                }
            };
            states[d].next.insert(sym, to);
        }
    }

    Dfa { states }
}
