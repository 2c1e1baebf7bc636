//! # Cacophony - a minimal Lisp-like expression language
//!
//! A small interpreter for parenthesized expressions with string and boolean
//! literals, variable binding (`:define`), conditionals (`:if`) and variable
//! references.
//!
//! ## Quick Start
//!
//! ```rust
//! # fn main() -> cacophony::Result<()> {
//! let mut out = Vec::new();
//! cacophony::evaluate(r#"(:define greeting "hi") greeting"#, &mut out)?;
//!
//! assert_eq!(String::from_utf8(out).unwrap(), "(define greeting \"hi\")\n\"hi\"\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source Code → Scanner → Tokens → Parser → AST → Evaluator → Results
//! ```
//!
//! - [`Scanner`] / [`tokenize`] - state-machine lexer
//! - [`Parser`] - recursive-descent parser producing a [`Node::Program`]
//! - [`Evaluator`] - tree-walking interpreter implementing [`Visitor`]
//! - [`Environment`] - scoped variable storage
//!
//! Running the stages by hand:
//!
//! ```rust
//! use cacophony::{Evaluator, Node, Parser, Scanner};
//!
//! # fn main() -> cacophony::Result<()> {
//! let scanner = Scanner::new("(:define x :true) (:if x \"yes\" \"no\")");
//! let tokens = scanner.scan_tokens()?;
//!
//! let mut parser = Parser::new(tokens);
//! let program = parser.parse()?;
//!
//! let mut evaluator = Evaluator::new(std::io::sink());
//! let results = evaluator.run(&program)?;
//!
//! assert_eq!(results[1], Node::StringLiteral("yes".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every stage stops at its first error and returns it:
//!
//! ```rust
//! use cacophony::ErrorKind;
//!
//! let err = cacophony::evaluate("(:if \"text\" :true :false)", std::io::sink()).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Eval);
//! assert!(err.to_string().contains("expected boolean expression"));
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;

use std::io::Write;

// Re-export main types
pub use error::{Error, ErrorKind, Result};
pub use lexer::{tokenize, Scanner, Token, TokenKind};
pub use parser::{Node, Parser, Visitor};
pub use runtime::{Environment, Evaluator};

/// Tokenize, parse and evaluate `source`, echoing results to `writer`.
///
/// Returns the evaluated program: one result node per top-level expression.
pub fn evaluate<W: Write>(source: &str, writer: W) -> Result<Node> {
    let tokens = Scanner::new(source).scan_tokens()?;
    tracing::debug!(count = tokens.len(), ?tokens, "tokens");

    let program = Parser::new(tokens).parse()?;
    tracing::debug!(ast = ?program, "nodes");

    let mut evaluator = Evaluator::new(writer);
    let results = evaluator.run(&program)?;
    Ok(Node::Program(results))
}
