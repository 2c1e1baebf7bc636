//! Lexical analysis for Cacophony
//!
//! Converts source text into a stream of tokens with a small state machine.

mod scanner;
mod token;

pub use scanner::{tokenize, Scanner};
pub use token::{decode_string, encode_string, Token, TokenKind};
