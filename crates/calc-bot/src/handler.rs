//! Message handling
//!
//! Turns the text of one incoming message into the text of its reply.

use crate::commands::Command;
use crate::error::Result;
use crate::replies::{Language, Replies};
use calc_core::Calculator;
use tracing::{debug, error};

/// Routes messages to the calculator and renders replies
#[derive(Debug)]
pub struct MessageHandler {
    calculator: Calculator,
    replies: Replies,
}

impl MessageHandler {
    /// Create a handler replying in `language`
    pub fn new(language: Language, max_expression_length: usize) -> Result<Self> {
        Ok(Self {
            calculator: Calculator::new().with_max_length(max_expression_length),
            replies: Replies::new(language, max_expression_length)?,
        })
    }

    /// Reply for one message, or `None` when the message deserves no reply
    ///
    /// Calculation errors become error replies; they never escape.
    pub fn handle(&self, text: &str) -> Option<String> {
        let command = Command::parse(text)?;
        debug!(command = command.description(), "Handling message");

        let rendered = match &command {
            Command::Start => self.replies.start(),
            Command::Help => self.replies.help(),
            Command::Calculate { expression } => match self.calculator.calculate(expression) {
                Ok(result) => self.replies.success(&result),
                Err(err) => {
                    debug!(kind = err.kind(), "Calculation failed: {}", err);
                    self.replies.error(&err)
                }
            },
        };

        Some(rendered.unwrap_or_else(|e| {
            error!("Failed to render reply: {}", e);
            self.fallback(&command)
        }))
    }

    fn fallback(&self, command: &Command) -> String {
        match command {
            Command::Calculate { expression } => match self.calculator.calculate(expression) {
                Ok(result) => format!("✅ {result}"),
                Err(err) => format!("❌ {}", self.replies.describe(&err)),
            },
            Command::Start | Command::Help => "2 + 3, 10.5 * 2, 2 ^ 3, 10 % 3".to_string(),
        }
    }
}
