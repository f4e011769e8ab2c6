//! Telegram Bot API client
//!
//! Requests go to `{api_base}/bot{token}/{method}` as JSON POSTs. The Bot API
//! wraps every answer, including failures, in an [`ApiResponse`] envelope.
//!
//! Rate Limit: about 30 messages per second per bot; outgoing messages share
//! one limiter.

use super::types::{ApiResponse, OutgoingMessage, Update, User};
use crate::config::BotConfig;
use crate::error::{BotError, Result};
use crate::transport::Transport;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Timeout for calls other than `getUpdates`
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct GetUpdatesParams<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Serialize)]
struct NoParams {}

/// Telegram Bot API client
pub struct TelegramClient {
    client: Client,
    bot_url: String,
    request_margin: Duration,
    rate_limiter: SharedRateLimiter,
}

impl TelegramClient {
    /// Create a client from bot configuration
    pub fn new(config: &BotConfig) -> Result<Self> {
        let rate = NonZeroU32::new(config.send_rate_per_second).ok_or_else(|| {
            BotError::ConfigError("send_rate_per_second must be greater than 0".to_string())
        })?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(rate)));

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            bot_url: format!("{}/bot{}", config.api_base, config.token),
            request_margin: config.request_margin,
            rate_limiter,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.bot_url, method)
    }

    async fn call<P, T>(&self, method: &str, params: &P, timeout: Duration) -> Result<T>
    where
        P: Serialize + Sync,
        T: DeserializeOwned,
    {
        debug!(method, "Calling Bot API");

        let response = self
            .client
            .post(self.method_url(method))
            .json(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let body: ApiResponse<T> = response.json().await.map_err(reqwest::Error::without_url)?;
        body.into_result()
    }
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("request_margin", &self.request_margin)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for TelegramClient {
    async fn get_me(&self) -> Result<User> {
        self.call("getMe", &NoParams {}, REQUEST_TIMEOUT).await
    }

    async fn get_updates(&self, offset: i64, timeout: Duration) -> Result<Vec<Update>> {
        let params = GetUpdatesParams {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &params, timeout + self.request_margin)
            .await
    }

    async fn send_message(&self, message: OutgoingMessage) -> Result<()> {
        self.rate_limiter.until_ready().await;
        let _sent: serde_json::Value = self
            .call("sendMessage", &message, REQUEST_TIMEOUT)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TelegramClient {
        let config = BotConfig::builder()
            .token("123:secret")
            .api_base("http://localhost:8081")
            .build()
            .unwrap();
        TelegramClient::new(&config).unwrap()
    }

    #[test]
    fn test_method_url() {
        assert_eq!(
            client().method_url("getUpdates"),
            "http://localhost:8081/bot123:secret/getUpdates"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let debug = format!("{:?}", client());
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_get_updates_params() {
        let params = GetUpdatesParams {
            offset: 11,
            timeout: 60,
            allowed_updates: &["message"],
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"offset": 11, "timeout": 60, "allowed_updates": ["message"]})
        );
    }

    #[test]
    fn test_zero_rate_rejected() {
        let mut config = BotConfig::builder().token("t").build_unchecked();
        config.send_rate_per_second = 0;
        assert!(TelegramClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let config = BotConfig::builder()
            .token("t")
            .api_base("http://127.0.0.1:9")
            .build()
            .unwrap();
        let client = TelegramClient::new(&config).unwrap();

        let err = client.get_me().await.unwrap_err();
        assert!(matches!(err, BotError::NetworkError(_)));
        assert!(err.is_transient());
        assert!(!err.to_string().contains("/bott/"));
    }
}
