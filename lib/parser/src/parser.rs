mod expr;

use cursor::{Col, Line};
use errors::Errors;
pub use expr::{Expr, LiteralValue};
use scanner::{Token, TokenData, TokenType};

use TokenType::*;

pub type Result<T> = std::result::Result<T, ParseError>;

pub type ParseErrors = Errors<ParseError>;

/// Maximum height of an expression tree. Evaluation recurses once per level, so this also bounds
/// the interpreter's stack use.
pub const MAX_DEPTH: usize = 128;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error at {at}: {error}")]
pub struct ParseError {
    pub error: ParseErrorType,
    pub line: Line,
    pub at: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect ')' after expression.")]
    ExpectedRightParen,
    #[error("Expect end of expression.")]
    ExpectedEof,
    #[error("Expression nested too deeply.")]
    TooDeeplyNested,
}

impl ParseErrorType {
    fn at(self, token: &Token) -> ParseError {
        ParseError {
            error: self,
            line: token.line(),
            at: match token.ty() {
                Eof => "end".to_string(),
                _ => format!("'{}'", token.lexeme()),
            },
        }
    }
}

/// Recursive descent parser for a single expression.
///
/// Owns the token vector handed over by the scanner and only ever moves a read index over it.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    /// Unary operators and groupings currently being parsed.
    nesting: usize,
    /// Height of the most recently parsed subexpression.
    depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        // peek() relies on the trailing Eof
        if tokens.last().map(Token::ty) != Some(Eof) {
            let line = tokens.last().map_or(Line(1), Token::line);
            tokens.push(Token::new(TokenData::Eof, "", line, Col(1)));
        }
        Self { tokens, current: 0, nesting: 0, depth: 0 }
    }

    /// Parses the token stream into exactly one expression.
    ///
    /// After a syntax error the parser skips ahead to the next `;` and tries again, so that
    /// independent errors are reported together.
    pub fn parse(mut self) -> std::result::Result<Expr, ParseErrors> {
        let mut errors = ParseErrors::default();
        let mut root = None;

        loop {
            match self.expression() {
                Ok(expr) if self.is_at_end() => root = Some(expr),
                Ok(_) => errors.push(ParseErrorType::ExpectedEof.at(self.peek())),
                Err(e) => {
                    log::trace!("Hit error: {:?}, syncing...", e);
                    errors.push(e)
                }
            }

            if self.is_at_end() {
                break;
            }
            self.synchronize();
            if self.is_at_end() {
                break;
            }
        }

        log::debug!("Parsed {} tokens, {} errors", self.current + 1, errors.len());
        match root {
            Some(root) if errors.is_empty() => {
                log::trace!("AST: {}", root);
                Ok(root)
            }
            _ => Err(errors),
        }
    }

    fn expression(&mut self) -> Result<Expr> {
        self.or()
    }

    fn or(&mut self) -> Result<Expr> {
        let mut expr = self.and()?;

        while let Some(operator) = self.consume(Or) {
            let left_depth = self.depth;
            let right = Box::new(self.and()?);
            self.join(left_depth, &operator)?;
            expr = Expr::Logical { left: Box::new(expr), operator, right };
        }

        Ok(expr)
    }

    fn and(&mut self) -> Result<Expr> {
        let mut expr = self.equality()?;

        while let Some(operator) = self.consume(And) {
            let left_depth = self.depth;
            let right = Box::new(self.equality()?);
            self.join(left_depth, &operator)?;
            expr = Expr::Logical { left: Box::new(expr), operator, right };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr> {
        let mut expr = self.comparison()?;

        while let BangEqual | EqualEqual = self.peek().ty() {
            let left_depth = self.depth;
            let operator = self.advance();
            let right = Box::new(self.comparison()?);
            self.join(left_depth, &operator)?;
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr> {
        let mut expr = self.term()?;

        while let Greater | GreaterEqual | Less | LessEqual = self.peek().ty() {
            let left_depth = self.depth;
            let operator = self.advance();
            let right = Box::new(self.term()?);
            self.join(left_depth, &operator)?;
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut expr = self.factor()?;

        while let Plus | Minus = self.peek().ty() {
            let left_depth = self.depth;
            let operator = self.advance();
            let right = Box::new(self.factor()?);
            self.join(left_depth, &operator)?;
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr> {
        let mut expr = self.unary()?;

        while let Star | Slash = self.peek().ty() {
            let left_depth = self.depth;
            let operator = self.advance();
            let right = Box::new(self.unary()?);
            self.join(left_depth, &operator)?;
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr> {
        if let Minus | Bang = self.peek().ty() {
            let operator = self.advance();
            let right = Box::new(self.nested(&operator, Self::unary)?);
            return Ok(Expr::Unary { operator, right });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        let literal = match self.peek().data.clone() {
            TokenData::False => LiteralValue::Boolean(false),
            TokenData::True => LiteralValue::Boolean(true),
            TokenData::Nil => LiteralValue::Nil,
            TokenData::Number(n) => LiteralValue::Number(n),
            TokenData::Str(s) => LiteralValue::Str(s),
            TokenData::LeftParen => {
                let paren = self.advance();
                let expr = self.nested(&paren, Self::expression)?;
                self.consume_or_error(RightParen, ParseErrorType::ExpectedRightParen)?;
                return Ok(Expr::Grouping(Box::new(expr)));
            }
            // The offending token is left in place so synchronize() can decide what to skip.
            _ => return Err(ParseErrorType::ExpectedExpression.at(self.peek())),
        };

        self.advance();
        self.depth = 1;
        Ok(Expr::Literal(literal))
    }

    /// Parses the operand of `token` with `rule`, refusing to recurse past [`MAX_DEPTH`].
    fn nested(&mut self, token: &Token, rule: fn(&mut Self) -> Result<Expr>) -> Result<Expr> {
        if self.nesting >= MAX_DEPTH {
            return Err(ParseErrorType::TooDeeplyNested.at(token));
        }
        self.nesting += 1;
        let expr = rule(self);
        self.nesting -= 1;

        let expr = expr?;
        self.grow(self.depth + 1, token)?;
        Ok(expr)
    }

    /// Records the height of a binary node whose right operand was just parsed.
    fn join(&mut self, left_depth: usize, operator: &Token) -> Result<()> {
        self.grow(left_depth.max(self.depth) + 1, operator)
    }

    fn grow(&mut self, depth: usize, token: &Token) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(ParseErrorType::TooDeeplyNested.at(token));
        }
        self.depth = depth;
        Ok(())
    }

    fn synchronize(&mut self) {
        while !self.is_at_end() {
            let token = self.advance();
            log::trace!("Syncing... skipped {:?}", token.lexeme());
            if token.ty() == Semicolon {
                return;
            }
        }
    }
}

// Helpers
impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn consume(&mut self, ty: TokenType) -> Option<Token> {
        (self.peek().ty() == ty).then(|| self.advance())
    }

    fn consume_or_error(&mut self, ty: TokenType, error: ParseErrorType) -> Result<Token> {
        match self.consume(ty) {
            Some(token) => Ok(token),
            None => Err(error.at(self.peek())),
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().ty() == Eof
    }
}
