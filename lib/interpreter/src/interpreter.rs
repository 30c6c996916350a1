use cursor::Line;
use parser::{Expr, ParseErrors, Parser};
use scanner::{ScanErrors, Scanner, TokenType};

mod value;
pub use value::Value;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeErrorType {
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or two strings.")]
    OperandsMustBeNumbersOrStrings,
    #[error("Division by zero.")]
    DivisionByZero,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}\n[line {line}]")]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub line: Line,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum InterpretError {
    #[error(transparent)]
    ScanError(#[from] ScanErrors),
    #[error(transparent)]
    ParseError(#[from] ParseErrors),
    #[error(transparent)]
    RuntimeError(#[from] RuntimeError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Scans, parses and evaluates `source`, stopping after the first stage that reports errors.
pub fn run_source(source: &str) -> std::result::Result<Value, InterpretError> {
    let tokens = Scanner::new(source).scan_tokens()?;
    let ast = Parser::new(tokens).parse()?;
    Ok(Interpreter::default().evaluate(&ast)?)
}

#[derive(Debug, Default)]
pub struct Interpreter;

impl Interpreter {
    /// Evaluates `expr` bottom-up. The first runtime error aborts the whole evaluation.
    pub fn evaluate(&self, expr: &Expr) -> Result<Value> {
        use Expr::*;
        log::trace!("Evaluating {}", expr);
        match expr {
            Literal(literal) => Ok(literal.into()),

            Grouping(expr) => self.evaluate(expr),

            Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match (operator.ty(), right) {
                    (TokenType::Minus, Value::Number(n)) => Ok((-n).into()),
                    (TokenType::Minus, _) => Err(RuntimeError {
                        error: RuntimeErrorType::OperandMustBeNumber,
                        line: operator.line(),
                    }),
                    (TokenType::Bang, v) => Ok((!v.is_truthy()).into()),
                    (ty, _) => unreachable!("{:?} is not a unary operator", ty),
                }
            }

            Logical { left, operator, right } => {
                let left = self.evaluate(left)?;
                match (operator.ty(), left.is_truthy()) {
                    (TokenType::Or, true) | (TokenType::And, false) => Ok(left),
                    _ => self.evaluate(right),
                }
            }

            Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                let error = |error| Err(RuntimeError { error, line: operator.line() });

                use TokenType::*;
                use Value::Number;
                match (operator.ty(), left, right) {
                    (Plus, Number(l), Number(r)) => Ok((l + r).into()),
                    (Plus, Value::Str(l), Value::Str(r)) => Ok((l + &r).into()),
                    (Plus, _, _) => error(RuntimeErrorType::OperandsMustBeNumbersOrStrings),

                    (Minus, Number(l), Number(r)) => Ok((l - r).into()),
                    (Star, Number(l), Number(r)) => Ok((l * r).into()),
                    (Slash, Number(_), Number(r)) if r == 0.0 => {
                        error(RuntimeErrorType::DivisionByZero)
                    }
                    (Slash, Number(l), Number(r)) => Ok((l / r).into()),

                    (Greater, Number(l), Number(r)) => Ok((l > r).into()),
                    (GreaterEqual, Number(l), Number(r)) => Ok((l >= r).into()),
                    (Less, Number(l), Number(r)) => Ok((l < r).into()),
                    (LessEqual, Number(l), Number(r)) => Ok((l <= r).into()),

                    (EqualEqual, l, r) => Ok((l == r).into()),
                    (BangEqual, l, r) => Ok((l != r).into()),

                    (Minus | Star | Slash | Greater | GreaterEqual | Less | LessEqual, _, _) => {
                        error(RuntimeErrorType::OperandsMustBeNumbers)
                    }

                    (ty, _, _) => unreachable!("{:?} is not a binary operator", ty),
                }
            }
        }
    }
}
