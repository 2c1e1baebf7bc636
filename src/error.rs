//! Error types for the Cacophony interpreter

use thiserror::Error;

/// Cacophony interpreter errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Lex errors
    /// Malformed input rejected by the lexer
    ///
    /// **Triggered by:** unterminated strings, unbalanced parens, illegal numbers,
    /// unknown keywords, unexpected characters
    /// **Example:** `"hello` (missing closing quote)
    #[error("invalid syntax on line {line}, column {col}: {message}")]
    Lex {
        /// Line number where the error occurred
        line: usize,
        /// Column number where the error occurred
        col: usize,
        /// Error description
        message: String,
    },

    // Parse errors
    /// Token sequence does not match the grammar
    ///
    /// **Triggered by:** missing or unexpected tokens, function calls
    /// **Example:** `(:if :true "a")` (missing else branch)
    #[error("parse error on line {line}, column {col}: {message}")]
    Parse {
        /// Line number of the offending token
        line: usize,
        /// Column number of the offending token
        col: usize,
        /// Error description
        message: String,
    },

    // Runtime errors
    /// Reference to an unbound variable
    ///
    /// **Triggered by:** using a name before `(:define name ...)`
    /// **Example:** `x` (when x was never defined)
    #[error("no such variable: {name}")]
    UndefinedVariable {
        /// Variable name
        name: String,
    },

    /// Type mismatch error
    ///
    /// **Triggered by:** an `:if` condition that is not a boolean
    /// **Example:** `(:if "text" "a" "b")`
    #[error("expected {expected} expression")]
    TypeError {
        /// Expected type
        expected: String,
        /// Actual type, kept out of the message
        got: String,
    },

    /// The output sink rejected a write
    #[error("could not write output: {0}")]
    Output(String),
}

/// Pipeline stage an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised while tokenizing
    Lex,
    /// Raised while building the AST
    Parse,
    /// Raised while evaluating
    Eval,
    /// Raised by the output sink
    Output,
}

impl Error {
    /// Create a lex error at the given position
    pub fn lex(line: usize, col: usize, message: impl Into<String>) -> Self {
        Error::Lex {
            line,
            col,
            message: message.into(),
        }
    }

    /// Create a parse error at the given position
    pub fn parse(line: usize, col: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            col,
            message: message.into(),
        }
    }

    /// Classify the error by pipeline stage
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lex { .. } => ErrorKind::Lex,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::UndefinedVariable { .. } | Error::TypeError { .. } => ErrorKind::Eval,
            Error::Output(_) => ErrorKind::Output,
        }
    }

    /// The bare diagnostic, without position or prefix
    pub fn message(&self) -> String {
        match self {
            Error::Lex { message, .. } | Error::Parse { message, .. } => message.clone(),
            _ => self.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Output(err.to_string())
    }
}

/// Result type for Cacophony operations
pub type Result<T> = std::result::Result<T, Error>;
