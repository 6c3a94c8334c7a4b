// src/lexer/cpu.rs
// Table-driven maximal-munch scanner over an `Automaton`.

use std::fmt;

use thiserror::Error;

use crate::lexer::tables::{Automaton, StateId, Symbol, Tables, tokens::TokenKind};

/// A matched span `[start, end)` and the accepting state it ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub state: StateId,
}

/// Why the current span could not be closed off as a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// No transition on this symbol and the span so far does not accept.
    Symbol(Symbol),
    /// Input ended inside an incomplete token.
    EndOfInput,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Symbol(c) => write!(f, "unexpected {c:?}"),
            Cause::EndOfInput => f.write_str("incomplete token at end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unrecognized input at position {position} (token started at {start}): {cause}")]
    UnrecognizedInput {
        start: usize,
        position: usize,
        cause: Cause,
    },
}

impl ScanError {
    /// Offset the caller should report (or skip past).
    pub fn position(&self) -> usize {
        match *self {
            ScanError::UnrecognizedInput { position, .. } => position,
        }
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            ScanError::UnrecognizedInput {
                cause: Cause::EndOfInput,
                ..
            }
        )
    }
}

/// Lazy token stream. Holds only a cursor; the automaton is shared read-only.
/// After the first error the stream ends.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    dfa: &'a Automaton,
    input: &'a [Symbol],
    pos: usize,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(dfa: &'a Automaton, input: &'a [Symbol]) -> Self {
        Self::starting_at(dfa, input, 0)
    }

    /// Start a fresh scan at any symbol boundary.
    pub fn starting_at(dfa: &'a Automaton, input: &'a [Symbol], pos: usize) -> Self {
        Self {
            dfa,
            input,
            pos: pos.min(input.len()),
            failed: false,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn next_token(&mut self) -> Result<Token, ScanError> {
        let start = self.pos;
        let mut state = 0;
        while self.pos < self.input.len() {
            let sym = self.input[self.pos];
            match self.dfa.next(state, sym) {
                Some(to) => {
                    state = to;
                    self.pos += 1;
                }
                // an empty span would never advance, so it is not a token
                None if self.dfa.is_accepting(state) && self.pos > start => {
                    return Ok(Token {
                        start,
                        end: self.pos,
                        state,
                    });
                }
                None => {
                    return Err(ScanError::UnrecognizedInput {
                        start,
                        position: self.pos,
                        cause: Cause::Symbol(sym),
                    });
                }
            }
        }
        if self.dfa.is_accepting(state) {
            Ok(Token {
                start,
                end: self.pos,
                state,
            })
        } else {
            Err(ScanError::UnrecognizedInput {
                start,
                position: self.pos,
                cause: Cause::EndOfInput,
            })
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.input.len() {
            return None;
        }
        let r = self.next_token();
        self.failed = r.is_err();
        Some(r)
    }
}

impl std::iter::FusedIterator for Scanner<'_> {}

/// Eagerly scan the whole input.
pub fn scan(dfa: &Automaton, input: &[Symbol]) -> Result<Vec<Token>, ScanError> {
    Scanner::new(dfa, input).collect()
}

// ---------------------------------------------------------------------------
// MVP grammar lexer

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuToken {
    pub kind: TokenKind,
    pub start: usize,
    pub len: usize,
}

fn slice_dbg(src: &[Symbol], i: usize) -> (usize, String) {
    let lo = i.saturating_sub(16);
    let hi = (i + 16).min(src.len());
    let s = src[lo..hi]
        .iter()
        .map(|&c| if c.is_control() && !c.is_whitespace() { '·' } else { c })
        .collect();
    (lo, s)
}

/// Lex with tables built from `mvp_rules()`. Returns kept tokens (whitespace
/// and comments filtered out); offsets count symbols, not bytes.
pub fn lex_on_cpu(tables: &Tables, input: &str) -> Result<Vec<CpuToken>, ScanError> {
    let chars: Vec<Symbol> = input.chars().collect();
    let mut out = Vec::new();
    for tok in Scanner::new(&tables.automaton, &chars) {
        let tok = match tok {
            Ok(t) => t,
            Err(e) => {
                let (lo, ctx) = slice_dbg(&chars, e.position());
                log::warn!("lex failed: {e}; context from {lo}:\n{ctx}");
                return Err(e);
            }
        };
        let Some(kind) = tables
            .kind_of(tok.state)
            .and_then(|k| TokenKind::try_from(k).ok())
        else {
            // accepting states always carry a rule, so this is a table from another grammar
            return Err(ScanError::UnrecognizedInput {
                start: tok.start,
                position: tok.start,
                cause: Cause::Symbol(chars[tok.start]),
            });
        };
        if !kind.is_trivia() {
            out.push(CpuToken {
                kind,
                start: tok.start,
                len: tok.end - tok.start,
            });
        }
    }
    Ok(out)
}
