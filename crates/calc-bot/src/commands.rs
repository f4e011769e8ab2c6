//! Command routing for incoming messages
//!
//! Only `/start` and `/help` are bot commands. Any other text, including
//! unknown slash commands, is handed to the calculator as an expression.

/// Parsed incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Greeting with the list of operations
    Start,
    /// Usage and limits
    Help,
    /// Expression to evaluate
    Calculate { expression: String },
}

impl Command {
    /// Parse a command from message text
    ///
    /// Returns `None` for empty or whitespace-only text; such messages get no
    /// reply. Group chats address commands as `/help@SomeBot`, so a mention
    /// suffix is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let command = text
            .strip_prefix('/')
            .map(|rest| rest.split_once('@').map_or(rest, |(name, _)| name));

        match command {
            Some("start") => Some(Command::Start),
            Some("help") => Some(Command::Help),
            _ => Some(Command::Calculate {
                expression: text.to_string(),
            }),
        }
    }

    /// Short description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Command::Start => "Show greeting",
            Command::Help => "Show help",
            Command::Calculate { .. } => "Evaluate expression",
        }
    }
}
