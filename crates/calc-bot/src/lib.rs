//! Telegram calculator bot
//!
//! The messaging side of calc-bot: it receives chat messages over the
//! Telegram Bot API long poll, hands expressions to [`calc_core::Calculator`]
//! and replies with the result or a descriptive error.
//!
//! # Architecture
//!
//! - [`Transport`]: the seam to the messaging service, implemented by
//!   [`TelegramClient`]
//! - [`BotRunner`]: poll loop, one task per message, graceful shutdown
//! - [`MessageHandler`]: routes `/start`, `/help` and expressions
//! - [`Replies`]: MiniJinja reply templates in English and Russian
//!
//! # Example
//!
//! ```rust,ignore
//! use calc_bot::{BotConfig, BotRunner, MessageHandler, TelegramClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::from_env()?;
//!     let transport = Arc::new(TelegramClient::new(&config)?);
//!     let handler = Arc::new(MessageHandler::new(config.language, config.max_expression_length)?);
//!
//!     BotRunner::new(transport, handler, &config)
//!         .run(async { tokio::signal::ctrl_c().await.ok(); })
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod handler;
pub mod replies;
pub mod repl;
pub mod retry;
pub mod runner;
pub mod telegram;
pub mod transport;

pub use commands::Command;
pub use config::BotConfig;
pub use error::{BotError, Result};
pub use handler::MessageHandler;
pub use replies::{Language, Replies};
pub use repl::run_repl;
pub use retry::RetryPolicy;
pub use runner::BotRunner;
pub use telegram::TelegramClient;
pub use transport::Transport;
