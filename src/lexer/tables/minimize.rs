// src/lexer/tables/minimize.rs
// Moore-style partition refinement over a `Dfa`.
//
// Partition ids are handed out in order of first appearance while walking the
// states by index, so the start state's block is always 0 and every other
// block is numbered by its smallest member. That numbering doubles as the
// output state order.

use hashbrown::HashMap;
use rayon::prelude::*;

use super::{
    StateId, Symbol,
    dfa::{Dfa, DfaState},
};

type Signature = (usize, Vec<(Symbol, usize)>);

/// Assign dense ids to keys in first-seen order.
fn number_by_first_seen<K: std::hash::Hash + Eq>(keys: Vec<K>) -> (Vec<usize>, usize) {
    let mut ids: HashMap<K, usize> = HashMap::new();
    let mut out = Vec::with_capacity(keys.len());
    for k in keys {
        let next = ids.len();
        out.push(*ids.entry(k).or_insert(next));
    }
    let n = ids.len();
    (out, n)
}

pub fn minimize(dfa: &Dfa) -> Dfa {
    let n = dfa.states.len();
    if n == 0 {
        return dfa.clone();
    }

    // Accepting states only merge with states accepting the same rule.
    let tokens: Vec<u32> = dfa.states.iter().map(|s| s.token).collect();
    let (mut block, mut blocks) = number_by_first_seen(tokens);

    let mut rounds = 0usize;
    loop {
        let sigs: Vec<Signature> = (0..n)
            .into_par_iter()
            .map(|s| {
                let succ: Vec<(Symbol, usize)> = dfa.states[s]
                    .next
                    .iter()
                    .map(|(&c, &t)| (c, block[t]))
                    .collect();
                (block[s], succ)
            })
            .collect();
        let (refined, count) = number_by_first_seen(sigs);
        rounds += 1;
        // blocks only ever split, so an unchanged count means a fixpoint
        let stable = count == blocks;
        block = refined;
        blocks = count;
        if stable {
            break;
        }
    }
    log::debug!("[tables] minimize: {n} -> {blocks} states in {rounds} rounds");

    let mut rep: Vec<Option<StateId>> = vec![None; blocks];
    for s in 0..n {
        rep[block[s]].get_or_insert(s);
    }

    let states = rep
        .into_iter()
        .flatten()
        .map(|s| DfaState {
            next: dfa.states[s]
                .next
                .iter()
                .map(|(&c, &t)| (c, block[t]))
                .collect(),
            token: dfa.states[s].token,
        })
        .collect();
    Dfa { states }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tables::{
        dfa::determinize, nfa::Nfa, pattern::Pattern, tokens::INVALID_TOKEN, tokens::RuleSet,
    };
    use std::collections::BTreeMap;

    fn state(next: &[(char, usize)], token: u32) -> DfaState {
        DfaState {
            next: next.iter().copied().collect::<BTreeMap<_, _>>(),
            token,
        }
    }

    #[test]
    fn merges_equivalent_tails() {
        // 0 -a-> 1, 0 -b-> 2, 1 -c-> 3, 2 -c-> 4; 3 and 4 accept the same rule
        let dfa = Dfa {
            states: vec![
                state(&[('a', 1), ('b', 2)], INVALID_TOKEN),
                state(&[('c', 3)], INVALID_TOKEN),
                state(&[('c', 4)], INVALID_TOKEN),
                state(&[], 0),
                state(&[], 0),
            ],
        };
        let min = minimize(&dfa);
        assert_eq!(min.len(), 3);
        assert_eq!(min.states[0].next[&'a'], 1);
        assert_eq!(min.states[0].next[&'b'], 1);
        assert_eq!(min.states[1].next[&'c'], 2);
        assert_eq!(min.states[2].token, 0);
    }

    #[test]
    fn distinct_rules_never_merge() {
        let dfa = Dfa {
            states: vec![
                state(&[('a', 1), ('b', 2)], INVALID_TOKEN),
                state(&[], 0),
                state(&[], 1),
            ],
        };
        assert_eq!(minimize(&dfa).len(), 3);
    }

    #[test]
    fn missing_transition_distinguishes_states() {
        // 1 and 2 accept the same rule but only 1 continues on x
        let dfa = Dfa {
            states: vec![
                state(&[('a', 1), ('b', 2)], INVALID_TOKEN),
                state(&[('x', 3)], 0),
                state(&[], 0),
                state(&[], 0),
            ],
        };
        let min = minimize(&dfa);
        assert_eq!(min.len(), 3);
        assert_eq!(min.states[0].next[&'b'], 2);
        assert_eq!(min.states[1].next[&'x'], 2);
    }

    #[test]
    fn is_idempotent() {
        let rules = RuleSet::new()
            .rule("A", Pattern::plus(Pattern::any_of("ab")))
            .rule("B", Pattern::concat(Pattern::literal_str("ba"), Pattern::star(Pattern::lit('c'))));
        let dfa = determinize(&Nfa::build(&rules).unwrap());
        let once = minimize(&dfa);
        assert_eq!(minimize(&once), once);
    }
}
