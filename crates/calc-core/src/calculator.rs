//! Calculator entry point

use crate::error::{CalcError, Result};
use crate::format::format_result;
use crate::operator::Operator;
use crate::parser::{self, MAX_EXPRESSION_LENGTH};
use tracing::debug;

/// Two-operand expression calculator
///
/// Holds no mutable state, so one instance can be shared freely across
/// threads and tasks.
///
/// # Examples
///
/// ```
/// use calc_core::Calculator;
///
/// let calculator = Calculator::new();
/// assert_eq!(calculator.calculate("10.5 * 2").unwrap(), "21");
/// assert!(calculator.calculate("1/0").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calculator {
    max_length: usize,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            max_length: MAX_EXPRESSION_LENGTH,
        }
    }
}

impl Calculator {
    /// Create a calculator with the default 100 character limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the input length limit
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Accepted input length in characters
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Validate, tokenize, evaluate and format `expr`
    ///
    /// The first failing stage decides the error.
    pub fn calculate(&self, expr: &str) -> Result<String> {
        parser::validate_with_limit(expr, self.max_length)?;
        let token = parser::tokenize(expr)?;
        let value = evaluate(token.left, token.symbol, token.right)?;
        Ok(format_result(value))
    }
}

/// Apply the operator spelled by `symbol` and reject non-finite results
pub fn evaluate(left: f64, symbol: &str, right: f64) -> Result<f64> {
    let operator = Operator::from_symbol(symbol)
        .ok_or_else(|| CalcError::UnsupportedOperator(symbol.to_string()))?;

    let value = operator.apply(left, right)?;
    debug!(left, %operator, right, value, "Evaluated expression");

    if value.is_infinite() {
        return Err(CalcError::ResultTooLarge);
    }
    if value.is_nan() {
        return Err(CalcError::ResultNotANumber);
    }

    Ok(value)
}

/// Calculate with a default [`Calculator`]
pub fn calculate(expr: &str) -> Result<String> {
    Calculator::default().calculate(expr)
}
