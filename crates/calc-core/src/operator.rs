//! Operator table
//!
//! The closed set of binary operations and the symbols that spell them.

use crate::error::{CalcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator symbols in the order the tokenizer tries them.
///
/// `**` precedes `*` so the two-character form wins, and the multiplicative
/// symbols precede the additive ones, which double as operand signs.
pub const PRIORITY_ORDER: [&str; 9] = ["**", "÷", "×", "^", "%", "/", "*", "+", "-"];

/// A binary arithmetic operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulo,
}

impl Operator {
    /// Look up the operator spelled by `symbol`
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Subtract),
            "*" | "×" => Some(Operator::Multiply),
            "/" | "÷" => Some(Operator::Divide),
            "^" | "**" => Some(Operator::Power),
            "%" => Some(Operator::Modulo),
            _ => None,
        }
    }

    /// Canonical ASCII symbol
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Power => "^",
            Operator::Modulo => "%",
        }
    }

    /// Whether the symbol can also be read as the sign of an operand
    pub fn is_sign(symbol: &str) -> bool {
        symbol == "+" || symbol == "-"
    }

    /// Apply the operation to two operands
    ///
    /// Division and remainder reject a zero divisor. `%` follows `fmod`
    /// semantics: the result takes the sign of the dividend.
    pub fn apply(self, left: f64, right: f64) -> Result<f64> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Subtract => Ok(left - right),
            Operator::Multiply => Ok(left * right),
            Operator::Divide => {
                if right == 0.0 {
                    return Err(CalcError::DivisionByZero(self));
                }
                Ok(left / right)
            }
            Operator::Power => Ok(left.powf(right)),
            Operator::Modulo => {
                if right == 0.0 {
                    return Err(CalcError::DivisionByZero(self));
                }
                Ok(left % right)
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
