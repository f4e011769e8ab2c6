//! Local REPL
//!
//! Runs the message handler against standard input, one line per message.
//! Useful for trying expressions without a bot token.

use crate::error::Result;
use crate::handler::MessageHandler;
use std::io::{BufRead, Write};

/// Prompt printed before each line
pub const PROMPT: &str = ">>> ";

/// Read lines from `input` until EOF or `/exit`, writing replies to `output`
pub fn run_repl<R, W>(handler: &MessageHandler, mut input: R, mut output: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    if let Some(greeting) = handler.handle("/start") {
        writeln!(output, "{greeting}\n")?;
    }

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        let text = line.trim();
        if matches!(text, "/exit" | "/quit") {
            break;
        }

        if let Some(reply) = handler.handle(text) {
            writeln!(output, "{reply}\n")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replies::Language;
    use std::io::Cursor;

    fn repl(input: &str) -> String {
        let handler = MessageHandler::new(Language::English, 100).unwrap();
        let mut output = Vec::new();
        run_repl(&handler, Cursor::new(input), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_repl_evaluates_lines() {
        let output = repl("2 + 3\n\n7 ÷ 2\n");
        assert!(output.contains("calculator bot"));
        assert!(output.contains("✅ Result: 5"));
        assert!(output.contains("✅ Result: 3.5"));
    }

    #[test]
    fn test_repl_stops_at_exit() {
        let output = repl("1+1\n/exit\n2+2\n");
        assert!(output.contains("✅ Result: 2"));
        assert!(!output.contains("✅ Result: 4"));
    }

    #[test]
    fn test_repl_reports_errors() {
        let output = repl("5$3");
        assert!(output.contains("❌ Error: expression contains invalid characters"));
    }
}
