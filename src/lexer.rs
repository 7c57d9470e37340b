//! Regex-driven tokenizer for Goose source.
//!
//! All token patterns are joined into one alternation of named groups, tried in
//! table order at every position. The last pattern matches any single
//! character, so the matches tile the whole input and anything no earlier
//! pattern accepts becomes a [`LexError`].

use std::{fmt, sync::OnceLock};

use regex::{CaptureMatches, Captures, Regex};

use crate::error::LexError;

/// Token kinds, carrying the literal payload where there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Number(i32),
    Identifier(String),
    StringLiteral(String),
    Assign,    // =
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /
    LParen,    // (
    RParen,    // )
    Semicolon, // ;
    EndOfInput,
}

impl TokenKind {
    /// Human-readable name of the kind, without the payload.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Number(_) => "number",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::StringLiteral(_) => "string literal",
            TokenKind::Assign => "assignment",
            TokenKind::Plus => "plus",
            TokenKind::Minus => "minus",
            TokenKind::Star => "star",
            TokenKind::Slash => "slash",
            TokenKind::LParen => "left parenthesis",
            TokenKind::RParen => "right parenthesis",
            TokenKind::Semicolon => "semicolon",
            TokenKind::EndOfInput => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "`{n}`"),
            TokenKind::Identifier(name) => write!(f, "`{name}`"),
            TokenKind::StringLiteral(s) => write!(f, "`\"{s}\"`"),
            TokenKind::Assign => write!(f, "`=`"),
            TokenKind::Plus => write!(f, "`+`"),
            TokenKind::Minus => write!(f, "`-`"),
            TokenKind::Star => write!(f, "`*`"),
            TokenKind::Slash => write!(f, "`/`"),
            TokenKind::LParen => write!(f, "`(`"),
            TokenKind::RParen => write!(f, "`)`"),
            TokenKind::Semicolon => write!(f, "`;`"),
            TokenKind::EndOfInput => write!(f, "<eof>"),
        }
    }
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

impl Token {
    pub fn new(kind: TokenKind, pos: usize) -> Self {
        Self { kind, pos }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Number,
    Ident,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Semi,
    Skip,
    Newline,
    Str,
    Mismatch,
}

// Order matters: the first group that matches at a position wins.
const RULES: [(Rule, &str, &str); 14] = [
    (Rule::Number, "NUMBER", r"[0-9]+"),
    (Rule::Ident, "ID", r"[A-Za-z_][A-Za-z0-9_]*"),
    (Rule::Assign, "ASSIGN", r"="),
    (Rule::Plus, "PLUS", r"\+"),
    (Rule::Minus, "MINUS", r"-"),
    (Rule::Star, "MUL", r"\*"),
    (Rule::Slash, "DIV", r"/"),
    (Rule::LParen, "LPAREN", r"\("),
    (Rule::RParen, "RPAREN", r"\)"),
    (Rule::Semi, "SEMI", r";"),
    (Rule::Skip, "SKIP", r"[ \t\r]+"),
    (Rule::Newline, "NEWLINE", r"\n"),
    (Rule::Str, "STRING", r#""[^"\n]*""#),
    (Rule::Mismatch, "MISMATCH", r"(?s:.)"),
];

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        let pattern = RULES
            .iter()
            .map(|(_, name, pat)| format!("(?P<{name}>{pat})"))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&pattern).expect("token table is a valid regex")
    })
}

/// Lazy token stream over a source string.
///
/// Yields `Ok` tokens in source order followed by exactly one
/// [`TokenKind::EndOfInput`]. After an `Err` or the end marker the iterator is
/// exhausted.
pub struct Lexer<'src> {
    src: &'src str,
    matches: CaptureMatches<'static, 'src>,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            matches: token_regex().captures_iter(src),
            finished: false,
        }
    }

    fn classify(caps: &Captures<'_>) -> Rule {
        RULES
            .iter()
            .find(|(_, name, _)| caps.name(name).is_some())
            .map_or(Rule::Mismatch, |(rule, _, _)| *rule)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let Some(caps) = self.matches.next() else {
                self.finished = true;
                return Some(Ok(Token::new(TokenKind::EndOfInput, self.src.len())));
            };
            // group 0 is the whole match and always present
            let text = &caps[0];
            let pos = caps.get(0).map_or(0, |m| m.start());

            let kind = match Self::classify(&caps) {
                Rule::Skip | Rule::Newline => continue,
                Rule::Number => match text.parse::<i32>() {
                    Ok(n) => TokenKind::Number(n),
                    Err(_) => {
                        self.finished = true;
                        return Some(Err(LexError::NumberOutOfRange {
                            text: text.to_string(),
                            pos,
                        }));
                    }
                },
                Rule::Ident => TokenKind::Identifier(text.to_string()),
                Rule::Str => TokenKind::StringLiteral(text[1..text.len() - 1].to_string()),
                Rule::Assign => TokenKind::Assign,
                Rule::Plus => TokenKind::Plus,
                Rule::Minus => TokenKind::Minus,
                Rule::Star => TokenKind::Star,
                Rule::Slash => TokenKind::Slash,
                Rule::LParen => TokenKind::LParen,
                Rule::RParen => TokenKind::RParen,
                Rule::Semi => TokenKind::Semicolon,
                Rule::Mismatch => {
                    self.finished = true;
                    let ch = text.chars().next().unwrap_or('\0');
                    return Some(Err(LexError::UnexpectedChar { ch, pos }));
                }
            };
            return Some(Ok(Token::new(kind, pos)));
        }
    }
}

/// Tokenize a whole source string, stopping at the first error.
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(src).collect()
}
