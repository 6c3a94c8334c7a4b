// src/lexer/tables/nfa.rs
// Thompson construction: one fragment per rule, all hung off a shared start.

use super::{StateId, Symbol, build::BuildError, pattern::Pattern, tokens::RuleSet};

#[derive(Debug, Clone, Default)]
pub struct NfaState {
    pub edges: Vec<(Symbol, StateId)>,
    pub epsilon: Vec<StateId>,
    pub accept: Option<u32>, // rule index
}

#[derive(Debug, Clone)]
pub struct Nfa {
    pub states: Vec<NfaState>,
    pub start: StateId,
}

#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: StateId,
    accept: StateId,
}

impl Nfa {
    fn new() -> Self {
        Self {
            states: vec![NfaState::default()],
            start: 0,
        }
    }

    fn add_state(&mut self) -> StateId {
        self.states.push(NfaState::default());
        self.states.len() - 1
    }

    fn add_edge(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        self.states[from].edges.push((symbol, to));
    }

    fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.states[from].epsilon.push(to);
    }

    /// Build the combined NFA for a rule set. Rule `i` tags its accept state
    /// with `i`; any malformed pattern rejects the whole set.
    pub fn build(rules: &RuleSet) -> Result<Self, BuildError> {
        let mut nfa = Nfa::new();
        for (idx, rule) in rules.rules.iter().enumerate() {
            let frag = nfa
                .fragment(&rule.pattern)
                .map_err(|e| e.in_rule(idx, &rule.name))?;
            nfa.add_epsilon(nfa.start, frag.start);
            nfa.states[frag.accept].accept = Some(idx as u32);
        }
        Ok(nfa)
    }

    fn fragment(&mut self, p: &Pattern) -> Result<Fragment, BuildError> {
        match p {
            Pattern::Literal(c) => {
                let start = self.add_state();
                let accept = self.add_state();
                self.add_edge(start, *c, accept);
                Ok(Fragment { start, accept })
            }
            Pattern::Range(lo, hi) => {
                if hi < lo {
                    return Err(BuildError::InvalidRange {
                        lo: *lo,
                        hi: *hi,
                        rule: None,
                    });
                }
                let start = self.add_state();
                let accept = self.add_state();
                for c in *lo..=*hi {
                    self.add_edge(start, c, accept);
                }
                Ok(Fragment { start, accept })
            }
            Pattern::Concat(a, b) => {
                let fa = self.fragment(a)?;
                let fb = self.fragment(b)?;
                self.add_epsilon(fa.accept, fb.start);
                Ok(Fragment {
                    start: fa.start,
                    accept: fb.accept,
                })
            }
            Pattern::Alternate(a, b) => {
                let fa = self.fragment(a)?;
                let fb = self.fragment(b)?;
                let start = self.add_state();
                let accept = self.add_state();
                self.add_epsilon(start, fa.start);
                self.add_epsilon(start, fb.start);
                self.add_epsilon(fa.accept, accept);
                self.add_epsilon(fb.accept, accept);
                Ok(Fragment { start, accept })
            }
            Pattern::Repeat(body, min, max) => self.repeat(body, *min, *max),
        }
    }

    fn repeat(
        &mut self,
        body: &Pattern,
        min: usize,
        max: Option<usize>,
    ) -> Result<Fragment, BuildError> {
        if let Some(max) = max {
            if max < min {
                return Err(BuildError::InvalidRepeat {
                    min,
                    max,
                    rule: None,
                });
            }
        }

        let start = self.add_state();
        let mut cur = start;
        for _ in 0..min {
            let f = self.fragment(body)?;
            self.add_epsilon(cur, f.start);
            cur = f.accept;
        }

        let accept = self.add_state();
        match max {
            None => {
                let f = self.fragment(body)?;
                self.add_epsilon(cur, f.start);
                self.add_epsilon(cur, accept);
                self.add_epsilon(f.accept, f.start);
                self.add_epsilon(f.accept, accept);
            }
            Some(max) => {
                for _ in min..max {
                    let f = self.fragment(body)?;
                    self.add_epsilon(cur, f.start);
                    self.add_epsilon(cur, accept);
                    cur = f.accept;
                }
                self.add_epsilon(cur, accept);
            }
        }
        Ok(Fragment { start, accept })
    }

    /// Sorted, deduplicated epsilon-closure of `seeds`.
    pub fn epsilon_closure(&self, seeds: &[StateId]) -> Vec<StateId> {
        let mut visited = vec![false; self.states.len()];
        let mut stack: Vec<StateId> = Vec::with_capacity(seeds.len());
        for &s in seeds {
            if !visited[s] {
                visited[s] = true;
                stack.push(s);
            }
        }
        let mut closure = stack.clone();
        while let Some(s) = stack.pop() {
            for &t in &self.states[s].epsilon {
                if !visited[t] {
                    visited[t] = true;
                    closure.push(t);
                    stack.push(t);
                }
            }
        }
        closure.sort_unstable();
        closure
    }

    /// Lowest rule index accepted by any member of `set`.
    pub fn accept_of(&self, set: &[StateId]) -> Option<u32> {
        set.iter().filter_map(|&s| self.states[s].accept).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tables::tokens::RuleSet;

    fn single(p: Pattern) -> Nfa {
        Nfa::build(&RuleSet::new().rule("T", p)).unwrap()
    }

    #[test]
    fn literal_is_two_states_plus_start() {
        let nfa = single(Pattern::lit('x'));
        assert_eq!(nfa.states.len(), 3);
        assert_eq!(nfa.states[1].edges, vec![('x', 2)]);
        assert_eq!(nfa.states[2].accept, Some(0));
    }

    #[test]
    fn range_has_one_edge_per_symbol() {
        let nfa = single(Pattern::range('a', 'e'));
        assert_eq!(nfa.states[1].edges.len(), 5);
        let labels: Vec<Symbol> = nfa.states[1].edges.iter().map(|&(c, _)| c).collect();
        assert_eq!(labels, vec!['a', 'b', 'c', 'd', 'e']);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = Nfa::build(&RuleSet::new().rule("Bad", Pattern::range('z', 'a'))).unwrap_err();
        assert!(matches!(
            err,
            BuildError::InvalidRange {
                lo: 'z',
                hi: 'a',
                rule: Some((0, _))
            }
        ));
    }

    #[test]
    fn bad_repeat_bounds_are_rejected() {
        let rules = RuleSet::new()
            .rule("Ok", Pattern::lit('a'))
            .rule("Bad", Pattern::repeat(Pattern::lit('b'), 3, Some(2)));
        let err = Nfa::build(&rules).unwrap_err();
        assert!(matches!(err, BuildError::InvalidRepeat { min: 3, max: 2, .. }));
    }

    #[test]
    fn closure_of_optional_reaches_accept() {
        let nfa = single(Pattern::maybe(Pattern::lit('a')));
        let closure = nfa.epsilon_closure(&[nfa.start]);
        assert_eq!(nfa.accept_of(&closure), Some(0));
    }

    #[test]
    fn state_count_is_linear_in_copies() {
        let small = single(Pattern::repeat(Pattern::lit('a'), 2, Some(4)));
        let large = single(Pattern::repeat(Pattern::lit('a'), 4, Some(8)));
        // 2 states per literal copy, 2 for the repeat frame, 1 global start
        assert_eq!(small.states.len(), 1 + 2 + 4 * 2);
        assert_eq!(large.states.len(), 1 + 2 + 8 * 2);
    }
}
