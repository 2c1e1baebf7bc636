use super::token::{Token, TokenKind};
use crate::error::{Error, Result};

/// Tokenize a complete source buffer.
///
/// Never fails: malformed input ends the sequence with a single
/// `TokenKind::Error` token whose text is the diagnostic.
pub fn tokenize(source: &str) -> Vec<Token> {
    Scanner::new(source).run()
}

/// Lexer states. `Done` is terminal; errors move straight to `Done`
/// after pushing the error token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Body,
    InString,
    InIdentifier,
    InKeyword,
    InNumber,
    Done,
}

/// Read position over the source, with one character of lookahead
struct Cursor {
    /// Source code as character vector
    source: Vec<char>,
    /// Start position of current token
    start: usize,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
    /// Position of the first character of the current token
    start_line: usize,
    start_column: usize,
}

impl Cursor {
    fn new(source: &str) -> Self {
        Cursor {
            source: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Mark the current position as the start of a new token
    fn begin(&mut self) {
        self.start = self.current;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source.get(self.current + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume characters while `pred` holds, returning how many were taken
    fn accept_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(&pred) {
            self.advance();
            count += 1;
        }
        count
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }
}

/// State-machine scanner for Cacophony source
pub struct Scanner {
    cursor: Cursor,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Open parens not yet closed
    depth: usize,
}

impl Scanner {
    /// Creates a new scanner from source code
    pub fn new(source: &str) -> Self {
        Scanner {
            cursor: Cursor::new(source),
            tokens: Vec::new(),
            depth: 0,
        }
    }

    /// Scans all tokens, turning a trailing error token into `Error::Lex`.
    /// Consumes the scanner; the source is read exactly once.
    pub fn scan_tokens(mut self) -> Result<Vec<Token>> {
        let tokens = self.run();
        match tokens.last() {
            Some(token) if token.is_error() => {
                Err(Error::lex(token.line, token.column, token.text.clone()))
            }
            _ => Ok(tokens),
        }
    }

    /// Drive the state machine to completion
    fn run(&mut self) -> Vec<Token> {
        let mut state = State::Body;
        while state != State::Done {
            state = match state {
                State::Body => self.lex_body(),
                State::InString => self.lex_string(),
                State::InIdentifier => self.lex_identifier(),
                State::InKeyword => self.lex_keyword(),
                State::InNumber => self.lex_number(),
                State::Done => State::Done,
            };
        }
        std::mem::take(&mut self.tokens)
    }

    fn lex_body(&mut self) -> State {
        self.cursor.accept_while(char::is_whitespace);
        self.cursor.begin();

        let Some(c) = self.cursor.peek() else {
            if self.depth > 0 {
                return self.error("unterminated left paren");
            }
            return State::Done;
        };

        match c {
            '(' => {
                self.cursor.advance();
                self.depth += 1;
                self.emit(TokenKind::LeftParen);
                State::Body
            }
            ')' => {
                self.cursor.advance();
                if self.depth == 0 {
                    return self.error("unexpected right paren");
                }
                self.depth -= 1;
                self.emit(TokenKind::RightParen);
                State::Body
            }
            '"' => {
                self.cursor.advance();
                State::InString
            }
            ':' => {
                self.cursor.advance();
                State::InKeyword
            }
            c if c.is_ascii_digit() => State::InNumber,
            '+' | '-' | '.' if self.starts_number() => State::InNumber,
            c if c.is_ascii_lowercase() || c == '+' || c == '-' => State::InIdentifier,
            c => {
                self.cursor.advance();
                self.error(format!("unexpected character: {}", c))
            }
        }
    }

    /// Whether a sign or dot at the cursor opens a number
    fn starts_number(&self) -> bool {
        let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
        match self.cursor.peek() {
            Some('.') => is_digit(self.cursor.peek_at(1)),
            Some('+') | Some('-') => {
                is_digit(self.cursor.peek_at(1))
                    || (self.cursor.peek_at(1) == Some('.') && is_digit(self.cursor.peek_at(2)))
            }
            _ => false,
        }
    }

    fn lex_string(&mut self) -> State {
        loop {
            match self.cursor.advance() {
                None | Some('\n') => return self.error("unterminated string"),
                Some('\\') => {
                    if matches!(self.cursor.advance(), None | Some('\n')) {
                        return self.error("unterminated string");
                    }
                }
                Some('"') => {
                    self.emit(TokenKind::String);
                    return State::Body;
                }
                Some(_) => {}
            }
        }
    }

    fn lex_identifier(&mut self) -> State {
        self.cursor.advance();
        self.cursor.accept_while(is_word_char);
        self.emit(TokenKind::Identifier);
        State::Body
    }

    fn lex_keyword(&mut self) -> State {
        self.cursor.accept_while(is_word_char);
        let word = self.cursor.lexeme();
        match TokenKind::keyword(&word) {
            Some(kind) => {
                self.emit(kind);
                State::Body
            }
            None => self.error(format!("unexpected keyword: {}", &word[1..])),
        }
    }

    fn lex_number(&mut self) -> State {
        let cursor = &mut self.cursor;
        if matches!(cursor.peek(), Some('+') | Some('-')) {
            cursor.advance();
        }

        let is_hex = cursor.peek() == Some('0') && matches!(cursor.peek_at(1), Some('x' | 'X'));
        let digits = if is_hex {
            cursor.advance();
            cursor.advance();
            cursor.accept_while(|c| c.is_ascii_hexdigit())
        } else {
            let mut digits = cursor.accept_while(|c| c.is_ascii_digit());
            if cursor.peek() == Some('.') {
                cursor.advance();
                digits += cursor.accept_while(|c| c.is_ascii_digit());
            }
            if digits > 0 && matches!(cursor.peek(), Some('e') | Some('E')) {
                cursor.advance();
                if matches!(cursor.peek(), Some('+') | Some('-')) {
                    cursor.advance();
                }
                cursor.accept_while(|c| c.is_ascii_digit());
                if cursor.peek() == Some('.') {
                    cursor.advance();
                    cursor.accept_while(|c| c.is_ascii_digit());
                }
            }
            digits
        };

        if digits == 0 {
            return self.error("illegal number");
        }
        if self
            .cursor
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.')
        {
            return self.error("illegal number");
        }

        self.emit(TokenKind::Number);
        State::Body
    }

    fn emit(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(
            kind,
            self.cursor.lexeme(),
            self.cursor.start_line,
            self.cursor.start_column,
        ));
    }

    fn error(&mut self, message: impl Into<String>) -> State {
        self.tokens.push(Token::new(
            TokenKind::Error,
            message,
            self.cursor.start_line,
            self.cursor.start_column,
        ));
        State::Done
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    fn error_text(source: &str) -> String {
        let tokens = tokenize(source);
        let last = tokens.last().expect("expected an error token");
        assert_eq!(last.kind, TokenKind::Error, "tokens: {:?}", tokens);
        last.text.clone()
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("     ").is_empty());
        assert!(tokenize("   \n  \n").is_empty());
    }

    #[test]
    fn test_parens() {
        use TokenKind::*;
        assert_eq!(kinds("()"), vec![LeftParen, RightParen]);
        assert_eq!(kinds("(   )"), vec![LeftParen, RightParen]);
        assert_eq!(kinds("   (   )     "), vec![LeftParen, RightParen]);
        assert_eq!(
            kinds("(() ())"),
            vec![LeftParen, LeftParen, RightParen, LeftParen, RightParen, RightParen]
        );
    }

    #[test]
    fn test_unbalanced_parens() {
        let tokens = tokenize("(");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::LeftParen);
        assert_eq!(tokens[1].text, "unterminated left paren");

        let tokens = tokenize(")");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "unexpected right paren");

        // lexing stops at the first error
        let tokens = tokenize("()) (");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, "unexpected right paren");
    }

    #[test]
    fn test_strings() {
        let tokens = tokenize(r#""hello \"world\"""#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, r#""hello \"world\"""#);

        assert_eq!(tokenize(r#""""#)[0].text, r#""""#);
        assert_eq!(tokenize(r#""\t""#)[0].text, r#""\t""#);
    }

    #[test]
    fn test_unterminated_strings() {
        assert_eq!(error_text("\""), "unterminated string");
        assert_eq!(error_text("\"\n\""), "unterminated string");
        assert_eq!(error_text("\"abc\\"), "unterminated string");
        assert_eq!(error_text("\"abc\\\n\""), "unterminated string");
    }

    #[test]
    fn test_identifiers() {
        for source in ["i", "    i   ", "identifier", "identifier651", "kebab-case_name"] {
            let tokens = tokenize(source);
            assert_eq!(tokens.len(), 1, "{}", source);
            assert_eq!(tokens[0].kind, TokenKind::Identifier);
            assert_eq!(tokens[0].text, source.trim());
        }
        assert_eq!(tokenize("+")[0].kind, TokenKind::Identifier);
        assert_eq!(tokenize("-x")[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_nested_identifiers() {
        use TokenKind::*;
        assert_eq!(
            kinds("( identifier (x y z) )"),
            vec![
                LeftParen, Identifier, LeftParen, Identifier, Identifier, Identifier, RightParen,
                RightParen,
            ]
        );
        assert_eq!(
            kinds(r#"( identifier "hello" "world" )"#),
            vec![LeftParen, Identifier, String, String, RightParen]
        );
    }

    #[test]
    fn test_keywords() {
        let tokens = tokenize("(:define x :true) :false :if");
        assert_eq!(tokens[1].kind, TokenKind::Define);
        assert_eq!(tokens[1].text, ":define");
        assert_eq!(tokens[3].kind, TokenKind::Boolean);
        assert_eq!(tokens[3].text, ":true");
        assert_eq!(tokens[5].kind, TokenKind::Boolean);
        assert_eq!(tokens[6].kind, TokenKind::If);

        assert_eq!(error_text(":lambda"), "unexpected keyword: lambda");
        assert_eq!(error_text(":"), "unexpected keyword: ");
    }

    #[test]
    fn test_numbers() {
        let sources = [
            "0", "42", "-7", "+3", "3.14", ".5", "-.5", "0x1F", "0XaB", "1e10", "2.5E-3", "1e2.5",
            "1e",
        ];
        for source in sources {
            let tokens = tokenize(source);
            assert_eq!(tokens.len(), 1, "{}: {:?}", source, tokens);
            assert_eq!(tokens[0].kind, TokenKind::Number, "{}", source);
            assert_eq!(tokens[0].text, source);
        }
    }

    #[test]
    fn test_illegal_numbers() {
        assert_eq!(error_text("0x"), "illegal number");
        assert_eq!(error_text("0xg"), "illegal number");
        assert_eq!(error_text("12abc"), "illegal number");
        assert_eq!(error_text("1.2.3"), "illegal number");
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(error_text("A"), "unexpected character: A");
        assert_eq!(error_text("(x #)"), "unexpected character: #");
        assert_eq!(error_text("."), "unexpected character: .");
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("(:define\n  greeting \"hi\")");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 2));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
        assert_eq!((tokens[3].line, tokens[3].column), (2, 12));
        assert_eq!((tokens[4].line, tokens[4].column), (2, 16));
    }

    #[test]
    fn test_unicode_whitespace_and_columns() {
        use TokenKind::*;
        let tokens = tokenize("\u{3000}(\u{00A0}x\u{2003})");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![LeftParen, Identifier, RightParen]);
        let columns: Vec<usize> = tokens.iter().map(|t| t.column).collect();
        assert_eq!(columns, vec![2, 4, 6]);

        // columns count characters, not bytes
        let tokens = tokenize("\"\u{e9}\" x");
        assert_eq!(tokens[1].column, 5);
        assert_eq!(tokens[0].text, "\"\u{e9}\"");

        assert_eq!(error_text("\u{e9}"), "unexpected character: \u{e9}");
        assert_eq!(error_text("x \u{3bb}"), "unexpected character: \u{3bb}");
    }

    #[test]
    fn test_scan_tokens_lifts_error() {
        let err = Scanner::new("(:define\n\"").scan_tokens().unwrap_err();
        assert_eq!(err, Error::lex(2, 1, "unterminated string"));

        let tokens = Scanner::new("(x)").scan_tokens().unwrap();
        assert_eq!(tokens.len(), 3);
    }
}
