use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Raw lexeme: quoted spelling for strings, `:word` for keywords,
    /// the message for errors
    pub text: String,
    /// Line number where token appears (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Returns true for the distinguished error token
    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }
}

/// All possible token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Numeric literal (lexed, never evaluated)
    Number,
    /// Identifier
    Identifier,
    /// String literal, quotes included in the text
    String,
    /// `:true` or `:false`
    Boolean,
    /// `:define`
    Define,
    /// `:if`
    If,
    /// Lexing failed; text carries the message
    Error,
    /// End of input marker
    EndOfInput,
}

lazy_static::lazy_static! {
    /// Reserved colon-prefixed words
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = {
        let mut table = HashMap::new();
        table.insert(":true", TokenKind::Boolean);
        table.insert(":false", TokenKind::Boolean);
        table.insert(":define", TokenKind::Define);
        table.insert(":if", TokenKind::If);
        table
    };
}

impl TokenKind {
    /// Look up a keyword by its full spelling, colon included
    pub fn keyword(word: &str) -> Option<TokenKind> {
        KEYWORDS.get(word).copied()
    }
}

/// Decode the text of a `String` token into its payload.
///
/// Recognizes `\"`, `\n` and `\\`; any other `\X` is kept as the two
/// characters `\` and `X`. Surrounding quotes are stripped when present.
pub fn decode_string(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => value.push('"'),
            Some('n') => value.push('\n'),
            Some('\\') => value.push('\\'),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}

/// Render a payload back into its double-quoted, escaped spelling
pub fn encode_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
