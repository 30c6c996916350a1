use cursor::{Col, Cursor, Line};
use errors::Errors;

pub mod token;
pub use token::{Token, TokenData, TokenType};
use TokenData::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error: {error}")]
pub struct ScanError {
    pub error: ScanErrorType,
    pub line: Line,
    pub col: Col,
}

pub type ScanErrors = Errors<ScanError>;

#[derive(Debug)]
pub struct Scanner<'a> {
    start: Cursor<'a>,
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
    errors: ScanErrors,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        let cursor = Cursor::new(source);
        Self { start: cursor.clone(), cursor, tokens: Vec::new(), errors: Errors::default() }
    }

    /// Scans the whole source. The returned tokens always end with a single [`TokenData::Eof`].
    ///
    /// Scanning doesn't stop at the first error, every lexical error in the source ends up in
    /// the returned batch.
    pub fn scan_tokens(mut self) -> Result<Vec<Token>, ScanErrors> {
        while let Some(c) = self.begin_token() {
            match c {
                '(' => self.add_token(LeftParen),
                ')' => self.add_token(RightParen),
                '{' => self.add_token(LeftBrace),
                '}' => self.add_token(RightBrace),
                ',' => self.add_token(Comma),
                '.' => self.add_token(Dot),
                '-' => self.add_token(Minus),
                '+' => self.add_token(Plus),
                ';' => self.add_token(Semicolon),
                '*' => self.add_token(Star),

                '!' => self.add_token_if_followed_by('=', BangEqual, Bang),
                '=' => self.add_token_if_followed_by('=', EqualEqual, Equal),
                '<' => self.add_token_if_followed_by('=', LessEqual, Less),
                '>' => self.add_token_if_followed_by('=', GreaterEqual, Greater),

                '/' => {
                    if self.cursor.next_if_eq('/') {
                        // Comment
                        self.cursor.advance_while(|c| c != '\n');
                    } else {
                        self.add_token(Slash)
                    }
                }

                '"' => self.string(),

                d if d.is_ascii_digit() => self.number(),

                c if is_identifier_start(c) => self.identifier(),

                ' ' | '\r' | '\t' | '\n' => (),

                c => self.error(ScanErrorType::UnexpectedCharacter(c)),
            }
        }

        self.start = self.cursor.clone();
        self.add_token(Eof);

        log::debug!("Scanned {} tokens, {} errors", self.tokens.len(), self.errors.len());
        self.errors.into_result(self.tokens)
    }

    fn begin_token(&mut self) -> Option<char> {
        self.start = self.cursor.clone();
        self.cursor.next()
    }

    fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.cursor)
    }

    fn add_token(&mut self, data: TokenData) {
        let token = Token::new(data, self.lexeme(), self.start.line(), self.start.col());
        log::trace!("{:?}", token);
        self.tokens.push(token);
    }

    fn add_token_if_followed_by(&mut self, expected: char, matched: TokenData, otherwise: TokenData) {
        if self.cursor.next_if_eq(expected) {
            self.add_token(matched)
        } else {
            self.add_token(otherwise)
        }
    }

    fn error(&mut self, error: ScanErrorType) {
        log::trace!("Scan error at {:?}: {}", self.start, error);
        self.errors.push(ScanError { error, line: self.start.line(), col: self.start.col() });
    }

    fn string(&mut self) {
        // Strings end at the line they started on
        self.cursor.advance_while(|c| c != '"' && c != '\n');
        if !self.cursor.next_if_eq('"') {
            self.error(ScanErrorType::UnterminatedString);
            return;
        }

        let lexeme = self.lexeme();
        let value = lexeme[1..lexeme.len() - 1].to_string();
        self.add_token(Str(value));
    }

    fn number(&mut self) {
        self.cursor.advance_while(|c| c.is_ascii_digit());

        if self.cursor.peek() == Some('.') && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.next();
            self.cursor.advance_while(|c| c.is_ascii_digit());
        }

        // Digits with an optional fraction are always valid f64 syntax
        let n = self.lexeme().parse().expect("number lexeme should parse as f64");
        self.add_token(Number(n));
    }

    fn identifier(&mut self) {
        self.cursor.advance_while(is_identifier_char);
        let data = TokenData::keyword(self.lexeme()).unwrap_or(Identifier);
        self.add_token(data)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}
