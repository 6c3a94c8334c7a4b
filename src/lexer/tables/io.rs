// src/lexer/tables/io.rs
use std::{
    collections::BTreeMap,
    fmt::{self, Write as _},
    io::{BufWriter, Write},
    time::Instant,
};

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use thiserror::Error;

use super::{Automaton, StateId, Symbol, TableError, Tables};

// -------------------- text tables --------------------
//
//   accepts = [False, True]
//   states = [
//       # 0
//       {'\x00': 1},
//       # 1
//       {'\x01': 0},
//       ]
//   <name> = <type_ref>(states, accepts)

const INDENT: &str = "    ";

fn push_bool<W: fmt::Write>(out: &mut W, b: bool) -> fmt::Result {
    out.write_str(if b { "True" } else { "False" })
}

/// Quote one symbol. `'` is the only symbol wrapped in double quotes.
fn push_symbol<W: fmt::Write>(out: &mut W, c: Symbol) -> fmt::Result {
    let quote = if c == '\'' { '"' } else { '\'' };
    out.write_char(quote)?;
    let cp = c as u32;
    match c {
        '\t' => out.write_str("\\t")?,
        '\n' => out.write_str("\\n")?,
        '\r' => out.write_str("\\r")?,
        '\\' => out.write_str("\\\\")?,
        _ if cp < 0x20 || (0x7f..=0xa0).contains(&cp) || cp == 0xad => {
            write!(out, "\\x{cp:02x}")?
        }
        _ if c.is_control() || (c.is_whitespace() && c != ' ') => {
            if cp <= 0xffff {
                write!(out, "\\u{cp:04x}")?
            } else {
                write!(out, "\\U{cp:08x}")?
            }
        }
        _ => out.write_char(c)?,
    }
    out.write_char(quote)
}

fn push_row<W: fmt::Write>(out: &mut W, row: &BTreeMap<Symbol, StateId>) -> fmt::Result {
    out.write_char('{')?;
    for (i, (&c, &to)) in row.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        push_symbol(out, c)?;
        write!(out, ": {to}")?;
    }
    out.write_char('}')
}

fn is_ident(s: &str) -> bool {
    let mut cs = s.chars();
    matches!(cs.next(), Some(c) if c == '_' || c.is_alphabetic())
        && cs.all(|c| c == '_' || c.is_alphanumeric())
}

fn is_dotted_ident(s: &str) -> bool {
    s.split('.').all(is_ident)
}

/// A validated model plus its binding, rendered through `Display`.
struct TableText<'a> {
    name: &'a str,
    type_ref: &'a str,
    model: &'a Automaton,
}

impl fmt::Display for TableText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("accepts = [")?;
        for (i, &a) in self.model.accepts.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            push_bool(f, a)?;
        }
        f.write_str("]\n")?;

        f.write_str("states = [\n")?;
        for (i, row) in self.model.states.iter().enumerate() {
            writeln!(f, "{INDENT}# {i}")?;
            f.write_str(INDENT)?;
            push_row(f, row)?;
            f.write_str(",\n")?;
        }
        writeln!(f, "{INDENT}]")?;
        writeln!(f, "{} = {}(states, accepts)", self.name, self.type_ref)
    }
}

/// Render `model` as table text bound to `name`. Nothing is emitted for a
/// model that breaks its invariants, or for a binding that would not load
/// back as the same name and type reference.
pub fn emit(name: &str, type_ref: &str, model: &Automaton) -> Result<String, TableError> {
    if !is_ident(name) {
        return Err(TableError::BadName(name.to_string()));
    }
    if !is_dotted_ident(type_ref) {
        return Err(TableError::BadTypeRef(type_ref.to_string()));
    }
    model.validate()?;
    Ok(TableText {
        name,
        type_ref,
        model,
    }
    .to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("line {line}: {msg}")]
    Syntax { line: usize, msg: String },
    #[error("table text ends after line {0}")]
    Truncated(usize),
    #[error(transparent)]
    Malformed(#[from] TableError),
}

/// A parsed text table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
    pub name: String,
    pub type_ref: String,
    pub automaton: Automaton,
}

struct Cursor<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn err<T>(&self, msg: impl Into<String>) -> Result<T, LoadError> {
        Err(LoadError::Syntax {
            line: self.line,
            msg: msg.into(),
        })
    }

    fn eat(&mut self, s: &str) -> Result<(), LoadError> {
        match self.rest.strip_prefix(s) {
            Some(r) => {
                self.rest = r;
                Ok(())
            }
            None => self.err(format!("expected {s:?} at {:?}", self.rest)),
        }
    }

    fn try_eat(&mut self, s: &str) -> bool {
        match self.rest.strip_prefix(s) {
            Some(r) => {
                self.rest = r;
                true
            }
            None => false,
        }
    }

    fn next_char(&mut self) -> Result<char, LoadError> {
        let mut it = self.rest.chars();
        match it.next() {
            Some(c) => {
                self.rest = it.as_str();
                Ok(c)
            }
            None => self.err("unexpected end of line"),
        }
    }

    fn number(&mut self) -> Result<usize, LoadError> {
        let end = self
            .rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest.len());
        if end == 0 {
            return self.err(format!("expected a state index at {:?}", self.rest));
        }
        let (digits, rest) = self.rest.split_at(end);
        self.rest = rest;
        digits
            .parse()
            .map_err(|e| LoadError::Syntax {
                line: self.line,
                msg: format!("bad state index {digits:?}: {e}"),
            })
    }

    fn hex(&mut self, digits: usize) -> Result<Symbol, LoadError> {
        if self.rest.len() < digits || !self.rest.is_char_boundary(digits) {
            return self.err("truncated escape");
        }
        let (h, rest) = self.rest.split_at(digits);
        if !h.chars().all(|c| c.is_ascii_hexdigit()) {
            return self.err(format!("bad hex escape {h:?}"));
        }
        let cp = u32::from_str_radix(h, 16).map_err(|_| LoadError::Syntax {
            line: self.line,
            msg: format!("bad hex escape {h:?}"),
        })?;
        self.rest = rest;
        match char::from_u32(cp) {
            Some(c) => Ok(c),
            None => self.err(format!("escape {h:?} is not a scalar value")),
        }
    }

    fn symbol(&mut self) -> Result<Symbol, LoadError> {
        let quote = self.next_char()?;
        if quote != '\'' && quote != '"' {
            return self.err(format!("expected a quoted symbol, found {quote:?}"));
        }
        let c = match self.next_char()? {
            '\\' => match self.next_char()? {
                't' => '\t',
                'n' => '\n',
                'r' => '\r',
                '\\' => '\\',
                '\'' => '\'',
                '"' => '"',
                'x' => self.hex(2)?,
                'u' => self.hex(4)?,
                'U' => self.hex(8)?,
                other => return self.err(format!("unknown escape \\{other}")),
            },
            c if c == quote => return self.err("empty symbol literal"),
            c => c,
        };
        if self.next_char()? != quote {
            return self.err("symbol literal must hold exactly one symbol");
        }
        Ok(c)
    }

    fn row(&mut self) -> Result<BTreeMap<Symbol, StateId>, LoadError> {
        let mut row = BTreeMap::new();
        self.eat("{")?;
        if self.try_eat("}") {
            return Ok(row);
        }
        loop {
            let c = self.symbol()?;
            self.eat(": ")?;
            let to = self.number()?;
            if row.insert(c, to).is_some() {
                return self.err(format!("duplicate symbol {c:?}"));
            }
            if self.try_eat("}") {
                return Ok(row);
            }
            self.eat(", ")?;
        }
    }

    fn done(&self) -> Result<(), LoadError> {
        if self.rest.is_empty() {
            Ok(())
        } else {
            self.err(format!("trailing text {:?}", self.rest))
        }
    }
}

struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn next_line(&mut self) -> Result<Cursor<'a>, LoadError> {
        let (i, l) = self.inner.next().ok_or(LoadError::Truncated(self.last))?;
        self.last = i + 1;
        Ok(Cursor {
            rest: l.trim_end(),
            line: i + 1,
        })
    }
}

/// Parse table text produced by [`emit`] without rebuilding anything.
pub fn load(text: &str) -> Result<LoadedTable, LoadError> {
    let mut lines = Lines {
        inner: text.lines().enumerate(),
        last: 0,
    };

    let mut cur = lines.next_line()?;
    cur.eat("accepts = [")?;
    let mut accepts = Vec::new();
    if !cur.try_eat("]") {
        loop {
            if cur.try_eat("True") {
                accepts.push(true);
            } else if cur.try_eat("False") {
                accepts.push(false);
            } else {
                return cur.err("expected True or False");
            }
            if cur.try_eat("]") {
                break;
            }
            cur.eat(", ")?;
        }
    }
    cur.done()?;

    let mut cur = lines.next_line()?;
    cur.eat("states = [")?;
    cur.done()?;

    let mut states = Vec::new();
    loop {
        let mut cur = lines.next_line()?;
        cur.rest = cur.rest.trim_start();
        if cur.try_eat("]") {
            cur.done()?;
            break;
        }
        cur.eat("# ")?;
        let idx = cur.number()?;
        cur.done()?;
        if idx != states.len() {
            return cur.err(format!("state comment {idx} out of order, expected {}", states.len()));
        }

        let mut cur = lines.next_line()?;
        cur.rest = cur.rest.trim_start();
        let row = cur.row()?;
        cur.eat(",")?;
        cur.done()?;
        states.push(row);
    }

    let cur = lines.next_line()?;
    let Some((name, rhs)) = cur.rest.split_once(" = ") else {
        return cur.err("expected `<name> = <type>(states, accepts)`");
    };
    let Some(type_ref) = rhs.strip_suffix("(states, accepts)") else {
        return cur.err("binding must end with `(states, accepts)`");
    };
    if !is_ident(name) || !is_dotted_ident(type_ref) {
        return cur.err(format!("bad binding {name:?} = {type_ref:?}"));
    }

    let automaton = Automaton { states, accepts };
    automaton.validate()?;
    Ok(LoadedTable {
        name: name.to_string(),
        type_ref: type_ref.to_string(),
        automaton,
    })
}

pub fn save_tables_text(
    path: &std::path::Path,
    name: &str,
    type_ref: &str,
    t: &Tables,
) -> std::io::Result<()> {
    let text = emit(name, type_ref, &t.automaton)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, text)?;
    log::info!("[tables] wrote {} ({} states)", path.display(), t.automaton.len());
    Ok(())
}

// -------------------- JSON (de)serialization --------------------

#[serde_as]
#[derive(Serialize, Deserialize)]
struct TablesDisk {
    #[serde_as(as = "Vec<BTreeMap<DisplayFromStr, _>>")]
    states: Vec<BTreeMap<Symbol, StateId>>,
    accepts: Vec<bool>,
    token_of: Vec<u32>,
    names: Vec<String>,
}
impl From<&Tables> for TablesDisk {
    fn from(t: &Tables) -> Self {
        Self {
            states: t.automaton.states.clone(),
            accepts: t.automaton.accepts.clone(),
            token_of: t.token_of.clone(),
            names: t.names.clone(),
        }
    }
}
impl TablesDisk {
    fn into_tables(self) -> Tables {
        Tables {
            automaton: Automaton {
                states: self.states,
                accepts: self.accepts,
            },
            token_of: self.token_of,
            names: self.names,
        }
    }
}

pub fn save_tables_json(path: &std::path::Path, t: &Tables) -> std::io::Result<()> {
    let instant = Instant::now();
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, &TablesDisk::from(t))?;
    let flush = w.flush();
    log::info!(
        "[tables] saved {} in {} ms",
        path.display(),
        instant.elapsed().as_millis()
    );
    flush
}

pub fn load_tables_json_bytes(data: &[u8]) -> Result<Tables, String> {
    let t = serde_json::from_slice::<TablesDisk>(data)
        .map(|d| d.into_tables())
        .map_err(|e| format!("Failed to parse tables JSON: {e}"))?;
    t.validate().map_err(|e| e.to_string())?;
    Ok(t)
}
