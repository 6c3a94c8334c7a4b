// src/dev/reference.rs
// Direct backtracking-free matcher over `Pattern`, used as an oracle for the
// compiled tables. Tracks the set of offsets each sub-pattern can end at.

use std::collections::BTreeSet;

use crate::lexer::tables::{Pattern, Symbol};

fn ends(p: &Pattern, input: &[Symbol], starts: &BTreeSet<usize>) -> BTreeSet<usize> {
    match p {
        Pattern::Literal(c) => starts
            .iter()
            .filter(|&&i| input.get(i) == Some(c))
            .map(|&i| i + 1)
            .collect(),
        Pattern::Range(lo, hi) => starts
            .iter()
            .filter(|&&i| input.get(i).is_some_and(|c| lo <= c && c <= hi))
            .map(|&i| i + 1)
            .collect(),
        Pattern::Concat(a, b) => ends(b, input, &ends(a, input, starts)),
        Pattern::Alternate(a, b) => {
            let mut out = ends(a, input, starts);
            out.extend(ends(b, input, starts));
            out
        }
        Pattern::Repeat(body, min, max) => {
            let mut cur = starts.clone();
            for _ in 0..*min {
                if cur.is_empty() {
                    return cur;
                }
                cur = ends(body, input, &cur);
            }
            let mut all = cur.clone();
            let mut frontier = cur;
            let mut extra = 0usize;
            while !frontier.is_empty() && max.is_none_or(|m| *min + extra < m) {
                let next: BTreeSet<usize> = ends(body, input, &frontier)
                    .into_iter()
                    .filter(|e| !all.contains(e))
                    .collect();
                all.extend(next.iter().copied());
                frontier = next;
                extra += 1;
            }
            all
        }
    }
}

/// Whether `p` matches all of `input`.
pub fn matches(p: &Pattern, input: &[Symbol]) -> bool {
    ends(p, input, &BTreeSet::from([0])).contains(&input.len())
}

