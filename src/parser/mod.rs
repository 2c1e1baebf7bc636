//! Cacophony Parser Module
//!
//! Parses the token stream into an Abstract Syntax Tree (AST).

mod ast;
mod expr_parser;

pub use ast::{Node, Visitor};
pub use expr_parser::Parser;
