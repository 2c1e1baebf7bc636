use super::ast::Node;
use crate::error::{Error, Result};
use crate::lexer::{decode_string, Token, TokenKind};

/// Recursive-descent parser over a token sequence
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    /// Returned by `peek` once the tokens run out
    eof: Token,
}

impl Parser {
    /// Creates a new parser
    pub fn new(tokens: Vec<Token>) -> Self {
        let eof = match tokens.last() {
            Some(last) => Token::new(
                TokenKind::EndOfInput,
                "",
                last.line,
                last.column + last.text.chars().count(),
            ),
            None => Token::new(TokenKind::EndOfInput, "", 1, 1),
        };
        Parser {
            tokens,
            current: 0,
            eof,
        }
    }

    /// Parses the tokens into a `Program` node
    pub fn parse(&mut self) -> Result<Node> {
        let mut nodes = Vec::new();

        while !self.is_at_end() {
            nodes.push(self.parse_expression()?);
        }

        Ok(Node::Program(nodes))
    }

    fn parse_expression(&mut self) -> Result<Node> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::LeftParen => self.parse_form(),
            TokenKind::String => Ok(Node::StringLiteral(decode_string(&token.text))),
            TokenKind::Identifier => Ok(Node::Ref(token.text)),
            TokenKind::Boolean => match token.text.as_str() {
                ":true" => Ok(Node::BooleanLiteral(true)),
                ":false" => Ok(Node::BooleanLiteral(false)),
                other => Err(Self::error_at(
                    &token,
                    format!("unknown keyword '{}'", other.trim_start_matches(':')),
                )),
            },
            TokenKind::EndOfInput => Err(Self::error_at(&token, "expected expression")),
            _ => Err(Self::error_at(&token, "unsupported expression")),
        }
    }

    /// Parse what follows a `(`
    fn parse_form(&mut self) -> Result<Node> {
        let head = self.advance()?;
        match head.kind {
            TokenKind::Define => self.parse_definition(),
            TokenKind::If => self.parse_if(),
            TokenKind::Boolean => Err(Self::error_at(
                &head,
                format!("'{}' cannot be called", head.text),
            )),
            // reserved for function application
            TokenKind::Identifier => Err(Self::error_at(
                &head,
                "function call are not yet supported",
            )),
            TokenKind::EndOfInput => Err(Self::error_at(
                &head,
                "expected definition or function call",
            )),
            _ => Err(Self::error_at(&head, "expected keyword or function name")),
        }
    }

    /// (:define name expression)
    fn parse_definition(&mut self) -> Result<Node> {
        let name = self.advance()?;
        match name.kind {
            TokenKind::Identifier => {}
            TokenKind::EndOfInput => {
                return Err(Self::error_at(&name, "expected definition name"))
            }
            _ => {
                return Err(Self::error_at(
                    &name,
                    "expected identifier for definition name",
                ))
            }
        }

        let expression = self.parse_expression()?;
        self.consume_right_paren()?;

        Ok(Node::Definition {
            name: name.text,
            expression: Box::new(expression),
        })
    }

    /// (:if condition then else)
    fn parse_if(&mut self) -> Result<Node> {
        let condition = Box::new(self.parse_expression()?);
        let then_branch = Box::new(self.parse_expression()?);
        let else_branch = Box::new(self.parse_expression()?);
        self.consume_right_paren()?;

        Ok(Node::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn consume_right_paren(&mut self) -> Result<()> {
        let token = self.advance()?;
        if token.kind == TokenKind::RightParen {
            Ok(())
        } else {
            Err(Self::error_at(&token, "expected right paren"))
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::EndOfInput
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&self.eof)
    }

    /// Take the next token. An error token from the lexer ends parsing
    /// with that lex error.
    fn advance(&mut self) -> Result<Token> {
        let token = self.peek().clone();
        if token.is_error() {
            return Err(Error::lex(token.line, token.column, token.text));
        }
        if !self.is_at_end() {
            self.current += 1;
        }
        Ok(token)
    }

    fn error_at(token: &Token, message: impl Into<String>) -> Error {
        Error::parse(token.line, token.column, message)
    }
}
