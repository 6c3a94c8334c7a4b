// src/dev/generator.rs
// Random patterns and random members of a pattern's language.

use rand::Rng;

use crate::lexer::tables::{Pattern, Symbol};

/// A member of `p`'s language. Unbounded repeats add at most `max_extra`
/// copies beyond their minimum.
pub fn gen_member<R: Rng + ?Sized>(p: &Pattern, rng: &mut R, max_extra: usize) -> Vec<Symbol> {
    let mut out = Vec::new();
    push_member(p, rng, max_extra, &mut out);
    out
}

fn push_member<R: Rng + ?Sized>(p: &Pattern, rng: &mut R, max_extra: usize, out: &mut Vec<Symbol>) {
    match p {
        Pattern::Literal(c) => out.push(*c),
        Pattern::Range(lo, hi) => {
            let cp = rng.random_range(*lo as u32..=*hi as u32);
            out.push(char::from_u32(cp).unwrap_or(*lo));
        }
        Pattern::Concat(a, b) => {
            push_member(a, rng, max_extra, out);
            push_member(b, rng, max_extra, out);
        }
        Pattern::Alternate(a, b) => {
            if rng.random_bool(0.5) {
                push_member(a, rng, max_extra, out);
            } else {
                push_member(b, rng, max_extra, out);
            }
        }
        Pattern::Repeat(body, min, max) => {
            let hi = max.unwrap_or(min + max_extra);
            for _ in 0..rng.random_range(*min..=hi) {
                push_member(body, rng, max_extra, out);
            }
        }
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, alphabet: &[Symbol]) -> Symbol {
    alphabet[rng.random_range(0..alphabet.len())]
}

/// Any string over `alphabet` of length `0..=max_len`.
pub fn gen_string<R: Rng + ?Sized>(rng: &mut R, alphabet: &[Symbol], max_len: usize) -> Vec<Symbol> {
    let len = rng.random_range(0..=max_len);
    (0..len)
        .map(|_| pick(rng, alphabet))
        .collect()
}

/// A well-formed random pattern over `alphabet` with nesting at most `depth`.
pub fn gen_pattern<R: Rng + ?Sized>(rng: &mut R, alphabet: &[Symbol], depth: usize) -> Pattern {
    let choice = if depth == 0 {
        rng.random_range(0..2)
    } else {
        rng.random_range(0..5)
    };
    match choice {
        0 => Pattern::lit(pick(rng, alphabet)),
        1 => {
            let (a, b) = (pick(rng, alphabet), pick(rng, alphabet));
            Pattern::range(a.min(b), a.max(b))
        }
        2 => Pattern::concat(
            gen_pattern(rng, alphabet, depth - 1),
            gen_pattern(rng, alphabet, depth - 1),
        ),
        3 => Pattern::alt(
            gen_pattern(rng, alphabet, depth - 1),
            gen_pattern(rng, alphabet, depth - 1),
        ),
        _ => {
            let min = rng.random_range(0..=2);
            let max = if rng.random_bool(0.5) {
                None
            } else {
                Some(min + rng.random_range(0..=2))
            };
            Pattern::repeat(gen_pattern(rng, alphabet, depth - 1), min, max)
        }
    }
}
