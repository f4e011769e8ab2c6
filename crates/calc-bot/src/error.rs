//! Error types for the bot collaborator

use calc_utils::ConfigError;
use thiserror::Error;

/// Bot specific errors
#[derive(Debug, Error)]
pub enum BotError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Bot API answered with `ok: false`
    #[error("Telegram API error {code}: {description}")]
    ApiError { code: i64, description: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Reply template failed to render
    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BotError {
    /// Whether retrying the same request may succeed
    ///
    /// Network failures, rate limiting (429) and server errors are transient;
    /// anything else, such as an invalid token, is not.
    pub fn is_transient(&self) -> bool {
        match self {
            BotError::NetworkError(_) => true,
            BotError::ApiError { code, .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

impl From<ConfigError> for BotError {
    fn from(err: ConfigError) -> Self {
        BotError::ConfigError(err.to_string())
    }
}

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;
