//! Input validation and tokenization
//!
//! Turns raw message text into a `(left, operator, right)` triple. Only one
//! operator is ever detected; there is no precedence and no grouping.

use crate::error::{CalcError, Result};
use crate::operator::{Operator, PRIORITY_ORDER};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Maximum accepted expression length, in characters
pub const MAX_EXPRESSION_LENGTH: usize = 100;

// Parentheses pass this filter even though the tokenizer cannot use them.
static ACCEPTED_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9+\-*/×÷^%().\s]+$").expect("accepted character pattern is valid")
});

/// A tokenized two-operand expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    /// Left operand
    pub left: f64,
    /// Operator symbol exactly as it matched
    pub symbol: &'static str,
    /// Right operand
    pub right: f64,
}

impl Token {
    /// Operator the matched symbol spells
    pub fn operator(&self) -> Option<Operator> {
        Operator::from_symbol(self.symbol)
    }
}

/// Validate raw input with the default length limit
pub fn validate(expr: &str) -> Result<()> {
    validate_with_limit(expr, MAX_EXPRESSION_LENGTH)
}

/// Validate raw input
///
/// Checks run in order: length, emptiness, accepted characters.
pub fn validate_with_limit(expr: &str, max_length: usize) -> Result<()> {
    if expr.chars().count() > max_length {
        return Err(CalcError::TooLong { max: max_length });
    }

    if expr.trim().is_empty() {
        return Err(CalcError::Empty);
    }

    if !ACCEPTED_CHARS.is_match(expr) {
        return Err(CalcError::InvalidCharacters);
    }

    Ok(())
}

/// Split an expression into two operands and one operator
///
/// Whitespace is removed first. Symbols are tried in [`PRIORITY_ORDER`] and
/// the first structural match wins.
pub fn tokenize(expr: &str) -> Result<Token> {
    let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();

    for symbol in PRIORITY_ORDER {
        let split = if Operator::is_sign(symbol) {
            split_at_binary_sign(&compact, symbol)
        } else {
            split_at_first(&compact, symbol)
        };

        if let Some((left, right)) = split {
            debug!(expression = %compact, symbol, "Operator detected");
            return Ok(Token {
                left,
                symbol,
                right,
            });
        }
    }

    Err(CalcError::NoOperatorFound)
}

/// Only the first occurrence counts, and never at index 0.
fn split_at_first(expr: &str, symbol: &str) -> Option<(f64, f64)> {
    let idx = expr.find(symbol)?;
    if idx == 0 {
        return None;
    }
    parse_operands(&expr[..idx], &expr[idx + symbol.len()..])
}

/// `+` and `-` are binary only right after a digit or `)`.
fn split_at_binary_sign(expr: &str, symbol: &str) -> Option<(f64, f64)> {
    let mut prev: Option<char> = None;

    for (idx, ch) in expr.char_indices() {
        let follows_operand = matches!(prev, Some(p) if p == ')' || p.is_ascii_digit());
        prev = Some(ch);

        if !follows_operand || !expr[idx..].starts_with(symbol) {
            continue;
        }

        if let Some(operands) = parse_operands(&expr[..idx], &expr[idx + symbol.len()..]) {
            return Some(operands);
        }
    }

    None
}

fn parse_operands(left: &str, right: &str) -> Option<(f64, f64)> {
    Some((parse_operand(left)?, parse_operand(right)?))
}

/// Parse a signed decimal literal such as `-12.5`, `+3` or `.5`
///
/// Anything else, including literals that would overflow, is a non-match.
fn parse_operand(literal: &str) -> Option<f64> {
    let digits = literal.strip_prefix(['+', '-']).unwrap_or(literal);

    let mut seen_digit = false;
    let mut seen_dot = false;
    for ch in digits.chars() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return None,
        }
    }
    if !seen_digit {
        return None;
    }

    literal.parse::<f64>().ok().filter(|v| v.is_finite())
}
