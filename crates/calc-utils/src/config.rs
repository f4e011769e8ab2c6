//! Environment configuration helpers
//!
//! Values are looked up by name through a plain function, so callers can read
//! the process environment with [`env_var`] or pass any other source.

use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Required variable is missing or empty
    #[error("{0} not set")]
    Missing(String),

    /// Variable is set but cannot be parsed
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: String, value: String },
}

/// Read a variable, treating empty or whitespace-only values as unset
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse the looked-up `value` of variable `name` into `T` if present
pub fn parse_value<T: FromStr>(
    name: &str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    match value {
        None => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|_| ConfigError::Invalid {
            name: name.to_string(),
            value,
        }),
    }
}

/// Whether `value` spells an enabled flag
///
/// `true`, `1`, `yes` and `on` (any case) enable it; anything else disables.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
