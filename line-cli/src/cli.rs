//! CLI parser and config loading.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use line_bot::{verify_signature, BotConfig, ConfigOverrides};
use llm_client::EnvLlmConfig;

#[derive(Parser)]
#[command(name = "linebot")]
#[command(about = "LINE webhook bot: serve the webhook, check signatures offline", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the webhook server (config from env; flags override BIND_ADDR and MAX_CONCURRENCY).
    Serve {
        #[arg(short, long)]
        bind: Option<String>,
        #[arg(short, long)]
        max_concurrency: Option<usize>,
    },
    /// Check a saved webhook body against its X-Line-Signature value.
    VerifySignature {
        /// File holding the raw request body
        #[arg(long)]
        body: PathBuf,
        #[arg(long)]
        signature: String,
        /// Channel secret; defaults to LINE_CHANNEL_SECRET
        #[arg(long)]
        secret: Option<String>,
    },
}

/// Load BotConfig from environment with command-line overrides applied.
pub fn load_config(bind: Option<String>, max_concurrency: Option<usize>) -> Result<BotConfig> {
    BotConfig::load(ConfigOverrides {
        bind_addr: bind,
        max_concurrency,
    })
}

/// Loads the language model config from env, only when the bot will actually run chat.
pub fn load_llm_config(config: &BotConfig) -> Result<Option<EnvLlmConfig>> {
    if !config.chat_enabled() {
        return Ok(None);
    }
    EnvLlmConfig::from_env().map(Some)
}

/// Returns whether `signature` matches the body stored at `body_path`.
pub fn check_signature(body_path: &PathBuf, signature: &str, secret: Option<String>) -> Result<bool> {
    let secret = match secret {
        Some(secret) => secret,
        None => std::env::var("LINE_CHANNEL_SECRET")
            .context("LINE_CHANNEL_SECRET not set and --secret not given")?,
    };
    let body = std::fs::read(body_path)
        .with_context(|| format!("Failed to read {}", body_path.display()))?;
    Ok(verify_signature(&secret, &body, signature))
}
