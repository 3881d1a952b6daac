use crate::token::{Token, TokenKind};
use custom_error::custom_error;
use tracing::trace;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub LexError

    UnexpectedCharacter{offset: usize, line: usize, column: usize, character: char} = "unexpected character '{character}' at line {line}, column {column}",
    UnterminatedString{offset: usize, line: usize, column: usize} = "unterminated string starting at line {line}, column {column}",
    InvalidEscape{offset: usize, line: usize, column: usize, escape: String} = "invalid escape sequence `{escape}` in string starting at line {line}, column {column}",
}

impl LexError {
    /// Byte offset of the offending input.
    pub fn offset(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { offset, .. }
            | Self::UnterminatedString { offset, .. }
            | Self::InvalidEscape { offset, .. } => *offset,
        }
    }
}

// Longest spellings first so that `===` is never read as `==` followed by `=`.
const OPERATORS: &[(&str, TokenKind)] = &[
    ("===", TokenKind::StrictEq),
    ("!==", TokenKind::StrictNotEq),
    ("==", TokenKind::Eq),
    ("!=", TokenKind::NotEq),
    (">=", TokenKind::GTE),
    ("<=", TokenKind::LTE),
    ("&&", TokenKind::And),
    ("||", TokenKind::Or),
    ("??", TokenKind::Nullish),
    (">", TokenKind::GT),
    ("<", TokenKind::LT),
    ("!", TokenKind::Bang),
    (".", TokenKind::Dot),
    (",", TokenKind::Comma),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Asterisk),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
];

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn hex_value(text: &str, len: usize) -> Option<u32> {
    let digits = text.get(..len)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Decodes the escape sequence that follows a backslash at the start of
/// `text`, returning the character and the bytes it spans. Unknown letters
/// stand for themselves; malformed numeric escapes are `None`.
fn unescape(text: &str) -> Option<(char, usize)> {
    let c = text.chars().next()?;
    let decoded = match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'v' => '\u{b}',
        '0' if !text[1..].starts_with(|d: char| d.is_ascii_digit()) => '\0',
        'x' => return hex_value(&text[1..], 2).and_then(char::from_u32).map(|c| (c, 3)),
        'u' => return unescape_unicode(&text[1..]).map(|(c, len)| (c, len + 1)),
        // legacy octal
        c if c.is_ascii_digit() => return None,
        c => c,
    };
    Some((decoded, c.len_utf8()))
}

// `{hex}` or four hex digits; a surrogate pair spelled as two consecutive
// escapes decodes to one character.
fn unescape_unicode(text: &str) -> Option<(char, usize)> {
    if let Some(braced) = text.strip_prefix('{') {
        let close = braced.find('}')?;
        if close == 0 || close > 6 {
            return None;
        }
        let code = hex_value(braced, close)?;
        return char::from_u32(code).map(|c| (c, close + 2));
    }

    let high = hex_value(text, 4)?;
    if (0xD800..0xDC00).contains(&high) {
        let low = text
            .get(4..)?
            .strip_prefix("\\u")
            .and_then(|rest| hex_value(rest, 4))?;
        if !(0xDC00..0xE000).contains(&low) {
            return None;
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        return char::from_u32(code).map(|c| (c, 10));
    }

    char::from_u32(high).map(|c| (c, 4))
}

/// Splits source text into tokens, one rule at a time, anchored at the
/// current offset.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        if self.position >= self.input.len() {
            return None;
        }
        Some(self.next_token())
    }
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Consumes `len` bytes and returns them, keeping line and column current.
    fn advance(&mut self, len: usize) -> &'a str {
        let consumed = &self.input[self.position..self.position + len];
        for c in consumed.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position += len;
        consumed
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let token = match self.rest().chars().next() {
            Some(c) if c.is_ascii_digit() => Ok(self.read_number()),
            Some(quote @ ('"' | '\'')) => self.read_string(quote),
            Some(c) if is_letter(c) => Ok(self.read_word()),
            _ => self.read_operator(),
        }?;
        trace!(kind = %token.kind, raw = %token.raw, "token");
        Ok(token)
    }

    fn read_number(&mut self) -> Token {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();

        if bytes.get(len) == Some(&b'.') && bytes.get(len + 1).map_or(false, u8::is_ascii_digit) {
            len += 1;
            len += bytes[len..].iter().take_while(|b| b.is_ascii_digit()).count();
        }

        Token::verbatim(TokenKind::Number, self.advance(len))
    }

    fn read_string(&mut self, quote: char) -> Result<Token, LexError> {
        let (offset, line, column) = (self.position, self.line, self.column);
        let rest = self.rest();
        let mut value = String::new();
        let mut i = quote.len_utf8();

        while let Some(c) = rest[i..].chars().next() {
            if c == quote {
                let raw = self.advance(i + c.len_utf8());
                return Ok(Token::new(TokenKind::String, value, raw));
            }
            if c != '\\' {
                value.push(c);
                i += c.len_utf8();
                continue;
            }

            let escaped = match rest[i + 1..].chars().next() {
                Some(escaped) => escaped,
                None => break,
            };
            match unescape(&rest[i + 1..]) {
                Some((decoded, len)) => {
                    value.push(decoded);
                    i += 1 + len;
                }
                None => {
                    return Err(LexError::InvalidEscape {
                        offset,
                        line,
                        column,
                        escape: rest[i..i + 1 + escaped.len_utf8()].to_owned(),
                    })
                }
            }
        }

        Err(LexError::UnterminatedString {
            offset,
            line,
            column,
        })
    }

    fn read_word(&mut self) -> Token {
        let len = self
            .rest()
            .find(|c: char| !is_word_char(c))
            .unwrap_or_else(|| self.rest().len());
        self.advance(len).into()
    }

    fn read_operator(&mut self) -> Result<Token, LexError> {
        let rest = self.rest();
        match OPERATORS.iter().find(|(text, _)| rest.starts_with(text)) {
            Some((text, kind)) => {
                let raw = self.advance(text.len());
                Ok(Token::verbatim(*kind, raw))
            }
            None => Err(LexError::UnexpectedCharacter {
                offset: self.position,
                line: self.line,
                column: self.column,
                character: rest.chars().next().unwrap_or_default(),
            }),
        }
    }

    fn skip_whitespace(&mut self) {
        let len = self
            .rest()
            .find(|c: char| !c.is_whitespace())
            .unwrap_or_else(|| self.rest().len());
        self.advance(len);
    }
}

/// Tokenizes the whole input, failing on the first unrecognized character.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}
