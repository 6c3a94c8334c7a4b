// src/lexer/tables/tokens.rs
use super::pattern::Pattern;

// state accepts no rule
pub const INVALID_TOKEN: u32 = u32::MAX;

/// One token rule. Its position in the rule set is its priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub pattern: Pattern,
}

impl Rule {
    pub fn new(name: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            name: name.into(),
            pattern,
        }
    }
}

/// Rules in declaration order; earlier rules win ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, name: impl Into<String>, pattern: Pattern) -> Self {
        self.rules.push(Rule::new(name, pattern));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.name.clone()).collect()
    }
}

/// Token kinds for the MVP grammar, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TokenKind {
    Ident = 0,
    Int,
    White,

    LineComment,
    BlockComment,

    // comparisons / logic
    Le,
    Ge,
    EqEq,
    AndAnd,
    OrOr,
    AngleGeneric,

    LParen,
    RParen,
    Plus,
    Minus,
    Star,
    Slash,
    Assign,
    Lt,
    Gt,
    Not,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // lone '&' or '|' are not errors
    Ampersand,
    Pipe,
}

pub const ALL_KINDS: &[TokenKind] = &[
    TokenKind::Ident,
    TokenKind::Int,
    TokenKind::White,
    TokenKind::LineComment,
    TokenKind::BlockComment,
    TokenKind::Le,
    TokenKind::Ge,
    TokenKind::EqEq,
    TokenKind::AndAnd,
    TokenKind::OrOr,
    TokenKind::AngleGeneric,
    TokenKind::LParen,
    TokenKind::RParen,
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Star,
    TokenKind::Slash,
    TokenKind::Assign,
    TokenKind::Lt,
    TokenKind::Gt,
    TokenKind::Not,
    TokenKind::LBracket,
    TokenKind::RBracket,
    TokenKind::LBrace,
    TokenKind::RBrace,
    TokenKind::Ampersand,
    TokenKind::Pipe,
];

impl TryFrom<u32> for TokenKind {
    type Error = ();
    fn try_from(v: u32) -> Result<Self, ()> {
        ALL_KINDS.get(v as usize).copied().ok_or(())
    }
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Ident => "Ident",
            Int => "Int",
            White => "White",
            LineComment => "LineComment",
            BlockComment => "BlockComment",
            Le => "Le",
            Ge => "Ge",
            EqEq => "EqEq",
            AndAnd => "AndAnd",
            OrOr => "OrOr",
            AngleGeneric => "AngleGeneric",
            LParen => "LParen",
            RParen => "RParen",
            Plus => "Plus",
            Minus => "Minus",
            Star => "Star",
            Slash => "Slash",
            Assign => "Assign",
            Lt => "Lt",
            Gt => "Gt",
            Not => "Not",
            LBracket => "LBracket",
            RBracket => "RBracket",
            LBrace => "LBrace",
            RBrace => "RBrace",
            Ampersand => "Ampersand",
            Pipe => "Pipe",
        }
    }

    /// Whitespace and comments.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::White | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    pub fn pattern(self) -> Pattern {
        use TokenKind::*;
        let ident_start = Pattern::alt_all([
            Pattern::range('a', 'z'),
            Pattern::range('A', 'Z'),
            Pattern::lit('_'),
        ]);
        let ident_rest = Pattern::alt(ident_start.clone(), Pattern::range('0', '9'));
        match self {
            Ident => Pattern::concat(ident_start, Pattern::star(ident_rest)),
            Int => Pattern::plus(Pattern::range('0', '9')),
            White => Pattern::plus(Pattern::any_of(" \t\r\n")),
            LineComment => Pattern::concat(
                Pattern::literal_str("//"),
                Pattern::star(Pattern::any_except("\n")),
            ),
            // "/*" ([^*] | "*"+ [^*/])* "*"+ "/"
            BlockComment => Pattern::seq_all([
                Pattern::literal_str("/*"),
                Pattern::star(Pattern::alt(
                    Pattern::any_except("*"),
                    Pattern::concat(Pattern::plus(Pattern::lit('*')), Pattern::any_except("*/")),
                )),
                Pattern::plus(Pattern::lit('*')),
                Pattern::lit('/'),
            ]),
            Le => Pattern::literal_str("<="),
            Ge => Pattern::literal_str(">="),
            EqEq => Pattern::literal_str("=="),
            AndAnd => Pattern::literal_str("&&"),
            OrOr => Pattern::literal_str("||"),
            AngleGeneric => Pattern::literal_str("<>"),
            LParen => Pattern::lit('('),
            RParen => Pattern::lit(')'),
            Plus => Pattern::lit('+'),
            Minus => Pattern::lit('-'),
            Star => Pattern::lit('*'),
            Slash => Pattern::lit('/'),
            Assign => Pattern::lit('='),
            Lt => Pattern::lit('<'),
            Gt => Pattern::lit('>'),
            Not => Pattern::lit('!'),
            LBracket => Pattern::lit('['),
            RBracket => Pattern::lit(']'),
            LBrace => Pattern::lit('{'),
            RBrace => Pattern::lit('}'),
            Ampersand => Pattern::lit('&'),
            Pipe => Pattern::lit('|'),
        }
    }
}

/// The MVP grammar as a rule set; rule index == `TokenKind as u32`.
pub fn mvp_rules() -> RuleSet {
    ALL_KINDS
        .iter()
        .fold(RuleSet::new(), |set, &k| set.rule(k.name(), k.pattern()))
}
