//! Telegram Bot API transport
//!
//! A thin long-poll client: `getMe` to authenticate, `getUpdates` to receive
//! messages and `sendMessage` to reply.

pub mod client;
pub mod types;

pub use client::TelegramClient;
pub use types::{ApiResponse, Chat, Message, OutgoingMessage, ReplyParameters, Update, User};
