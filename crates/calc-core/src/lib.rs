//! Two-operand arithmetic evaluator for calc-bot
//!
//! This crate holds the only non-trivial logic of the bot: it validates the
//! raw text of a chat message, finds exactly one operator and two operands,
//! applies the operation and formats the number for a reply.
//!
//! Supported operators: `+`, `-`, `*` / `×`, `/` / `÷`, `^` / `**`, `%`.
//!
//! # Example
//!
//! ```
//! use calc_core::{calculate, CalcError};
//!
//! assert_eq!(calculate("2 + 3").unwrap(), "5");
//! assert_eq!(calculate("2*-3").unwrap(), "-6");
//! assert!(matches!(calculate("1/0"), Err(CalcError::DivisionByZero(_))));
//! ```

pub mod calculator;
pub mod error;
pub mod format;
pub mod operator;
pub mod parser;

pub use calculator::{Calculator, calculate, evaluate};
pub use error::{CalcError, Result};
pub use format::format_result;
pub use operator::Operator;
pub use parser::{MAX_EXPRESSION_LENGTH, Token, tokenize, validate};
