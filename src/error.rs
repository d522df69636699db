// error.rs

use thiserror::Error;

/// Errors produced while resolving an expression chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("cannot divide by 0")]
    DivisionByZero,
    /// The result does not fit in a finite `f64`.
    #[error("result out of range")]
    Overflow,
    /// The token sequence does not alternate operand/operator.
    #[error("malformed expression chain at position {position}")]
    MalformedChain { position: usize },
}

/// Errors produced while splitting a REPL line into inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{0}: unknown command")]
    UnknownCommand(String),
    #[error("{0}: expected a history position")]
    BadHistoryIndex(String),
}
