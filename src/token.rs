use lazy_static::lazy_static;
use std::collections::HashMap;
use strum_macros::{Display, EnumIter};

#[derive(Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    #[strum(to_string = "number")]
    Number,
    #[strum(to_string = "string")]
    String,
    #[strum(to_string = "boolean")]
    Boolean,
    #[strum(to_string = "identifier")]
    Identifier,

    // Delimiters
    #[strum(to_string = "`.`")]
    Dot,
    #[strum(to_string = "`,`")]
    Comma,
    #[strum(to_string = "`(`")]
    LParen,
    #[strum(to_string = "`)`")]
    RParen,
    #[strum(to_string = "`[`")]
    LBracket,
    #[strum(to_string = "`]`")]
    RBracket,

    // Arithmetic
    #[strum(to_string = "`+`")]
    Plus,
    #[strum(to_string = "`-`")]
    Minus,
    #[strum(to_string = "`*`")]
    Asterisk,
    #[strum(to_string = "`/`")]
    Slash,
    #[strum(to_string = "`%`")]
    Percent,

    // Comparison
    #[strum(to_string = "`!`")]
    Bang,
    #[strum(to_string = "`==`")]
    Eq,
    #[strum(to_string = "`!=`")]
    NotEq,
    #[strum(to_string = "`===`")]
    StrictEq,
    #[strum(to_string = "`!==`")]
    StrictNotEq,
    #[strum(to_string = "`>`")]
    GT,
    #[strum(to_string = "`>=`")]
    GTE,
    #[strum(to_string = "`<`")]
    LT,
    #[strum(to_string = "`<=`")]
    LTE,

    // Keyword operators
    #[strum(to_string = "`and`")]
    And,
    #[strum(to_string = "`or`")]
    Or,
    #[strum(to_string = "`??`")]
    Nullish,
    #[strum(to_string = "`not`")]
    Not,
    #[strum(to_string = "`in`")]
    In,
    #[strum(to_string = "`contains`")]
    Contains,
}

lazy_static! {
    /// Words that are never identifiers.
    pub static ref KEYWORDS: HashMap<&'static str, TokenKind> = vec![
        ("true", TokenKind::Boolean),
        ("false", TokenKind::Boolean),
        ("and", TokenKind::And),
        ("or", TokenKind::Or),
        ("not", TokenKind::Not),
        ("in", TokenKind::In),
        ("contains", TokenKind::Contains),
    ]
    .into_iter()
    .collect();
}

/// A lexeme with its semantic text and the exact source it was read from.
///
/// `literal` is what the parser consumes (unescaped string contents, digits,
/// names); `raw` keeps the original spelling, quotes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub raw: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
            raw: raw.into(),
        }
    }

    /// A token whose literal and raw text are the same lexeme.
    pub fn verbatim(kind: TokenKind, text: &str) -> Self {
        Self::new(kind, text, text)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl From<&str> for Token {
    fn from(word: &str) -> Self {
        let kind = KEYWORDS
            .get(word)
            .copied()
            .unwrap_or(TokenKind::Identifier);
        Self::verbatim(kind, word)
    }
}
