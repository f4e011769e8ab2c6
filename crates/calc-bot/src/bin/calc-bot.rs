//! Calculator bot
//!
//! # Usage
//!
//! ```bash
//! # Telegram mode
//! export TELEGRAM_BOT_TOKEN="123456:ABC..."
//! cargo run --bin calc-bot -p calc-bot
//!
//! # Local REPL, no token needed
//! cargo run --bin calc-bot -p calc-bot -- --repl
//! ```

use anyhow::Context;
use calc_bot::config::BotConfigBuilder;
use calc_bot::{BotRunner, Language, MessageHandler, TelegramClient, run_repl};
use clap::Parser;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Command-line flags override the matching environment variables
#[derive(Parser, Debug)]
#[command(name = "calc-bot")]
#[command(about = "Telegram bot that evaluates simple two-operand expressions", long_about = None)]
struct Args {
    /// Bot token from BotFather [env: TELEGRAM_BOT_TOKEN]
    #[arg(long)]
    token: Option<String>,

    /// Bot API base URL [env: TELEGRAM_API_BASE]
    #[arg(long)]
    api_base: Option<String>,

    /// Long-poll timeout in seconds [env: TELEGRAM_POLL_TIMEOUT]
    #[arg(long)]
    poll_timeout: Option<u64>,

    /// Reply language, en or ru [env: BOT_LANGUAGE]
    #[arg(short, long)]
    language: Option<String>,

    /// Verbose logging [env: DEBUG]
    #[arg(short, long)]
    debug: bool,

    /// Read expressions from stdin instead of Telegram
    #[arg(long)]
    repl: bool,
}

impl Args {
    fn apply(self, mut builder: BotConfigBuilder) -> BotConfigBuilder {
        if let Some(token) = self.token {
            builder = builder.token(token);
        }
        if let Some(api_base) = self.api_base {
            builder = builder.api_base(api_base);
        }
        if let Some(secs) = self.poll_timeout {
            builder = builder.poll_timeout(Duration::from_secs(secs));
        }
        if let Some(language) = self.language {
            builder = builder.language(Language::from_code(&language));
        }
        if self.debug {
            builder = builder.debug(true);
        }
        builder
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let repl = args.repl;
    let config = args
        .apply(BotConfigBuilder::from_env()?)
        .build_unchecked();

    if config.debug {
        calc_utils::init_tracing_with_default("debug");
    } else {
        calc_utils::init_tracing();
    }

    let handler = MessageHandler::new(config.language, config.max_expression_length)
        .context("Failed to compile reply templates")?;

    if repl {
        let stdin = io::stdin();
        run_repl(&handler, stdin.lock(), io::stdout())?;
        return Ok(());
    }

    config.validate()?;
    let transport = Arc::new(TelegramClient::new(&config)?);

    info!(
        api_base = %config.api_base,
        language = %config.language,
        "Starting calc-bot"
    );

    BotRunner::new(transport, Arc::new(handler), &config)
        .run(shutdown_signal())
        .await
        .context("Bot stopped with an error")?;

    info!("Goodbye");
    Ok(())
}

/// Completes on SIGINT or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
