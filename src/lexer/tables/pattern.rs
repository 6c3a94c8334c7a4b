// src/lexer/tables/pattern.rs
use super::Symbol;

/// Highest symbol covered by `any_except`; complements are taken over ASCII.
pub const ASCII_MAX: Symbol = '\x7f';

/// Regular-expression-like description of one token rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Literal(Symbol),
    Concat(Box<Pattern>, Box<Pattern>),
    Alternate(Box<Pattern>, Box<Pattern>),
    /// `max == None` means unbounded.
    Repeat(Box<Pattern>, usize, Option<usize>),
    /// Inclusive on both ends.
    Range(Symbol, Symbol),
}

impl Pattern {
    pub fn lit(c: Symbol) -> Self {
        Pattern::Literal(c)
    }

    pub fn range(lo: Symbol, hi: Symbol) -> Self {
        Pattern::Range(lo, hi)
    }

    pub fn concat(a: Pattern, b: Pattern) -> Self {
        Pattern::Concat(Box::new(a), Box::new(b))
    }

    pub fn alt(a: Pattern, b: Pattern) -> Self {
        Pattern::Alternate(Box::new(a), Box::new(b))
    }

    pub fn repeat(p: Pattern, min: usize, max: Option<usize>) -> Self {
        Pattern::Repeat(Box::new(p), min, max)
    }

    /// Matches only the empty string.
    pub fn empty() -> Self {
        Pattern::Repeat(Box::new(Pattern::Literal('\0')), 0, Some(0))
    }

    pub fn maybe(p: Pattern) -> Self {
        Self::repeat(p, 0, Some(1))
    }

    pub fn star(p: Pattern) -> Self {
        Self::repeat(p, 0, None)
    }

    pub fn plus(p: Pattern) -> Self {
        Self::repeat(p, 1, None)
    }

    /// Chain of literals. An empty string yields `empty()`.
    pub fn literal_str(s: &str) -> Self {
        Self::seq_all(s.chars().map(Pattern::Literal))
    }

    /// Left-nested concatenation of all parts.
    pub fn seq_all<I: IntoIterator<Item = Pattern>>(parts: I) -> Self {
        parts
            .into_iter()
            .reduce(Pattern::concat)
            .unwrap_or_else(Pattern::empty)
    }

    /// Left-nested alternation of all parts. Panics on an empty iterator,
    /// since a rule that matches nothing cannot be spelled with these variants.
    pub fn alt_all<I: IntoIterator<Item = Pattern>>(parts: I) -> Self {
        parts
            .into_iter()
            .reduce(Pattern::alt)
            .expect("alt_all needs at least one alternative")
    }

    /// Any one of the given symbols.
    pub fn any_of(symbols: &str) -> Self {
        Self::alt_all(symbols.chars().map(Pattern::Literal))
    }

    /// Any ASCII symbol not in `excluded`, as an alternation of ranges.
    pub fn any_except(excluded: &str) -> Self {
        let mut ranges = Vec::new();
        let mut lo: Option<Symbol> = None;
        for c in '\0'..=ASCII_MAX {
            if excluded.contains(c) {
                if let Some(start) = lo.take() {
                    ranges.push(Pattern::Range(start, prev(c)));
                }
            } else if lo.is_none() {
                lo = Some(c);
            }
        }
        if let Some(start) = lo {
            ranges.push(Pattern::Range(start, ASCII_MAX));
        }
        Self::alt_all(ranges)
    }
}

fn prev(c: Symbol) -> Symbol {
    char::from_u32(c as u32 - 1).unwrap_or(c)
}
