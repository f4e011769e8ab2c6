//! Error types for expression evaluation

use crate::operator::Operator;
use thiserror::Error;

/// Result type alias for calc-core
pub type Result<T> = std::result::Result<T, CalcError>;

/// Classified evaluation failure
///
/// Every variant is an ordinary value returned to the caller. None of them
/// indicate a broken process; the message handler turns each one into a reply.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Input is longer than the accepted number of characters
    #[error("expression is too long (maximum {max} characters)")]
    TooLong { max: usize },

    /// Input is empty or whitespace only
    #[error("empty expression")]
    Empty,

    /// Input contains characters outside the accepted set
    #[error("expression contains invalid characters")]
    InvalidCharacters,

    /// No operator produced a valid two-operand split
    #[error("no operation found or malformed expression")]
    NoOperatorFound,

    /// Operator symbol is not in the operation table
    #[error("unsupported operation: {0}")]
    UnsupportedOperator(String),

    /// Right operand of a division or remainder is zero
    #[error("{}", division_by_zero_message(.0))]
    DivisionByZero(Operator),

    /// Result overflowed to infinity
    #[error("result is too large")]
    ResultTooLarge,

    /// Result is not a number
    #[error("result is not a number")]
    ResultNotANumber,
}

fn division_by_zero_message(op: &Operator) -> &'static str {
    match op {
        Operator::Modulo => "division by zero in remainder",
        _ => "division by zero",
    }
}

impl CalcError {
    /// Stable snake_case identifier of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::TooLong { .. } => "too_long",
            CalcError::Empty => "empty",
            CalcError::InvalidCharacters => "invalid_characters",
            CalcError::NoOperatorFound => "no_operator_found",
            CalcError::UnsupportedOperator(_) => "unsupported_operator",
            CalcError::DivisionByZero(_) => "division_by_zero",
            CalcError::ResultTooLarge => "result_too_large",
            CalcError::ResultNotANumber => "result_not_a_number",
        }
    }
}
