//! Configuration for the calculator bot

use crate::error::{BotError, Result};
use crate::replies::Language;
use calc_core::MAX_EXPRESSION_LENGTH;
use calc_utils::{ConfigError, env_var, parse_flag, parse_value};
use std::time::Duration;

/// Default Bot API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Configuration for the bot process
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot token from BotFather
    pub token: String,

    /// Bot API base URL, without trailing slash
    pub api_base: String,

    /// Long-poll timeout passed to `getUpdates`
    pub poll_timeout: Duration,

    /// Extra time the HTTP request may take beyond the poll timeout
    pub request_margin: Duration,

    /// How long in-flight messages may finish after a shutdown signal
    pub shutdown_grace: Duration,

    /// Outgoing messages per second
    pub send_rate_per_second: u32,

    /// Reply language
    pub language: Language,

    /// Accepted expression length in characters
    pub max_expression_length: usize,

    /// Verbose logging
    pub debug: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            poll_timeout: Duration::from_secs(60),
            request_margin: Duration::from_secs(10),
            shutdown_grace: Duration::from_secs(2),
            send_rate_per_second: 30,
            language: Language::default(),
            max_expression_length: MAX_EXPRESSION_LENGTH,
            debug: false,
        }
    }
}

impl BotConfig {
    /// Create a new configuration builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Load and validate configuration from environment variables
    ///
    /// See [`BotConfigBuilder::from_env`] for the variables read.
    pub fn from_env() -> Result<Self> {
        BotConfigBuilder::from_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(ConfigError::Missing("TELEGRAM_BOT_TOKEN".to_string()).into());
        }

        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(BotError::ConfigError(format!(
                "api_base must be an http(s) URL, got {}",
                self.api_base
            )));
        }

        if self.send_rate_per_second == 0 {
            return Err(BotError::ConfigError(
                "send_rate_per_second must be greater than 0".to_string(),
            ));
        }

        if self.max_expression_length == 0 {
            return Err(BotError::ConfigError(
                "max_expression_length must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for BotConfig
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    token: Option<String>,
    api_base: Option<String>,
    poll_timeout: Option<Duration>,
    shutdown_grace: Option<Duration>,
    send_rate_per_second: Option<u32>,
    language: Option<Language>,
    max_expression_length: Option<usize>,
    debug: Option<bool>,
}

impl BotConfigBuilder {
    /// Start from the process environment
    ///
    /// `TELEGRAM_BOT_TOKEN`, `TELEGRAM_API_BASE`, `TELEGRAM_POLL_TIMEOUT`
    /// (seconds), `BOT_LANGUAGE` and `DEBUG` are read; unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    /// Start from variables resolved by `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::default();

        if let Some(token) = lookup("TELEGRAM_BOT_TOKEN") {
            builder = builder.token(token);
        }
        if let Some(api_base) = lookup("TELEGRAM_API_BASE") {
            builder = builder.api_base(api_base);
        }
        let poll_timeout: Option<u64> =
            parse_value("TELEGRAM_POLL_TIMEOUT", lookup("TELEGRAM_POLL_TIMEOUT"))?;
        if let Some(secs) = poll_timeout {
            builder = builder.poll_timeout(Duration::from_secs(secs));
        }
        if let Some(language) = lookup("BOT_LANGUAGE") {
            builder = builder.language(Language::from_code(&language));
        }
        if let Some(debug) = lookup("DEBUG") {
            builder = builder.debug(parse_flag(&debug));
        }

        Ok(builder)
    }

    /// Set the bot token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the Bot API base URL
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the long-poll timeout
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = Some(timeout);
        self
    }

    /// Set the shutdown grace period
    pub fn shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = Some(grace);
        self
    }

    /// Set the outgoing message rate
    pub fn send_rate_per_second(mut self, rate: u32) -> Self {
        self.send_rate_per_second = Some(rate);
        self
    }

    /// Set the reply language
    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Set the accepted expression length
    pub fn max_expression_length(mut self, max: usize) -> Self {
        self.max_expression_length = Some(max);
        self
    }

    /// Enable verbose logging
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<BotConfig> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation; the REPL mode needs no token
    pub fn build_unchecked(self) -> BotConfig {
        let default = BotConfig::default();
        BotConfig {
            token: self.token.unwrap_or(default.token),
            api_base: self
                .api_base
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(default.api_base),
            poll_timeout: self.poll_timeout.unwrap_or(default.poll_timeout),
            request_margin: default.request_margin,
            shutdown_grace: self.shutdown_grace.unwrap_or(default.shutdown_grace),
            send_rate_per_second: self
                .send_rate_per_second
                .unwrap_or(default.send_rate_per_second),
            language: self.language.unwrap_or(default.language),
            max_expression_length: self
                .max_expression_length
                .unwrap_or(default.max_expression_length),
            debug: self.debug.unwrap_or(default.debug),
        }
    }
}
