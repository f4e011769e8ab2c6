//! Transport abstraction
//!
//! The runner talks to the messaging service only through [`Transport`], so
//! it can be driven by a mock in tests.

use crate::error::Result;
use crate::telegram::{OutgoingMessage, Update, User};
use async_trait::async_trait;
use std::time::Duration;

/// Long-poll messaging transport
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Identity of the bot; fails when the credentials are rejected
    async fn get_me(&self) -> Result<User>;

    /// Wait up to `timeout` for updates with `update_id >= offset`
    ///
    /// Passing an offset acknowledges every earlier update.
    async fn get_updates(&self, offset: i64, timeout: Duration) -> Result<Vec<Update>>;

    /// Send one message
    async fn send_message(&self, message: OutgoingMessage) -> Result<()>;
}
