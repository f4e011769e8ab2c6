//! Shared utilities for calc-bot
//!
//! Logging setup and environment-variable configuration helpers used by the
//! bot crate and its binary.

pub mod config;
pub mod logging;

pub use config::{ConfigError, env_var, parse_flag, parse_value};
pub use logging::{init_tracing, init_tracing_with_default};
