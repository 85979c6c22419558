//! BotConfig: loaded from env with `load()`, checked with `validate()` before the server starts.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::{Context, Result};
use chat_strategies::DEFAULT_MEMORY_WINDOW;
use dispatch_core::MessageKind;
use dispatch_engine::DEFAULT_MAX_CONCURRENCY;

pub const DEFAULT_API_BASE_URL: &str = "https://api.line.me";
pub const DEFAULT_DATA_API_BASE_URL: &str = "https://api-data.line.me";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_WEBHOOK_PATH: &str = "/callback";
pub const DEFAULT_LOG_FILE: &str = "logs/line-bot.log";

/// Values given on the command line; each one wins over its env var.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_addr: Option<String>,
    pub max_concurrency: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// LINE_CHANNEL_SECRET; key for webhook signature verification
    pub channel_secret: String,
    /// LINE_CHANNEL_ACCESS_TOKEN; bearer token for the Messaging API
    pub channel_access_token: String,
    /// LINE_API_BASE_URL
    pub api_base_url: String,
    /// LINE_DATA_API_BASE_URL; host serving message content
    pub data_api_base_url: String,
    /// BIND_ADDR
    pub bind_addr: String,
    /// WEBHOOK_PATH
    pub webhook_path: String,
    /// LOG_FILE
    pub log_file: String,
    /// MAX_CONCURRENCY; events processed at once across all deliveries
    pub max_concurrency: usize,
    /// EVENT_TIMEOUT_SECS; unset means no per-event limit
    pub event_timeout_secs: Option<u64>,
    /// MEMORY_WINDOW; turns kept per user by the chat strategy
    pub memory_window: usize,
    /// SYSTEM_PROMPT; None keeps the strategy default
    pub system_prompt: Option<String>,
    /// ENABLE_CHAT; when false every kind is echoed
    pub enable_chat: bool,
    /// CHAT_KINDS; comma separated kinds routed to the chat strategy
    pub chat_kinds: Vec<MessageKind>,
}

impl BotConfig {
    /// Loads from env. LINE_CHANNEL_SECRET and LINE_CHANNEL_ACCESS_TOKEN are required;
    /// malformed numbers, booleans or kinds are errors rather than silently defaulted.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let channel_secret =
            env::var("LINE_CHANNEL_SECRET").context("LINE_CHANNEL_SECRET not set")?;
        let channel_access_token = env::var("LINE_CHANNEL_ACCESS_TOKEN")
            .context("LINE_CHANNEL_ACCESS_TOKEN not set")?;

        let api_base_url =
            env::var("LINE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let data_api_base_url = env::var("LINE_DATA_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATA_API_BASE_URL.to_string());
        let bind_addr = match overrides.bind_addr {
            Some(addr) => addr,
            None => env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        };
        let webhook_path =
            env::var("WEBHOOK_PATH").unwrap_or_else(|_| DEFAULT_WEBHOOK_PATH.to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

        let max_concurrency = match overrides.max_concurrency {
            Some(n) => n,
            None => parse_var("MAX_CONCURRENCY")?.unwrap_or(DEFAULT_MAX_CONCURRENCY),
        };
        let event_timeout_secs = parse_var("EVENT_TIMEOUT_SECS")?;
        let memory_window = parse_var("MEMORY_WINDOW")?.unwrap_or(DEFAULT_MEMORY_WINDOW);
        let system_prompt = env::var("SYSTEM_PROMPT").ok();
        let enable_chat = parse_var("ENABLE_CHAT")?.unwrap_or(true);
        let chat_kinds = match env::var("CHAT_KINDS") {
            Ok(raw) => parse_kinds(&raw)?,
            Err(_) => vec![MessageKind::Text, MessageKind::Audio],
        };

        Ok(Self {
            channel_secret,
            channel_access_token,
            api_base_url,
            data_api_base_url,
            bind_addr,
            webhook_path,
            log_file,
            max_concurrency,
            event_timeout_secs,
            memory_window,
            system_prompt,
            enable_chat,
            chat_kinds,
        })
    }

    /// Validate config. Call after load() to fail fast before binding.
    pub fn validate(&self) -> Result<()> {
        if self.channel_secret.trim().is_empty() {
            anyhow::bail!("LINE_CHANNEL_SECRET is empty");
        }
        if self.channel_access_token.trim().is_empty() {
            anyhow::bail!("LINE_CHANNEL_ACCESS_TOKEN is empty");
        }
        for (name, url) in [
            ("LINE_API_BASE_URL", &self.api_base_url),
            ("LINE_DATA_API_BASE_URL", &self.data_api_base_url),
        ] {
            if reqwest::Url::parse(url).is_err() {
                anyhow::bail!("{} is set but not a valid URL: {}", name, url);
            }
        }
        self.socket_addr()?;
        if !self.webhook_path.starts_with('/') || self.webhook_path == "/health" {
            anyhow::bail!(
                "WEBHOOK_PATH must start with '/' and not be /health: {}",
                self.webhook_path
            );
        }
        if self.max_concurrency == 0 {
            anyhow::bail!("MAX_CONCURRENCY must be at least 1");
        }
        if self.memory_window == 0 {
            anyhow::bail!("MEMORY_WINDOW must be at least 1");
        }
        if self.event_timeout_secs == Some(0) {
            anyhow::bail!("EVENT_TIMEOUT_SECS must be at least 1 when set");
        }
        Ok(())
    }

    /// Chat runs only when ENABLE_CHAT is on and at least one kind is routed to it.
    pub fn chat_enabled(&self) -> bool {
        self.enable_chat && !self.chat_kinds.is_empty()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {}", self.bind_addr))
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        Err(_) => Ok(None),
    }
}

fn parse_kinds(raw: &str) -> Result<Vec<MessageKind>> {
    let mut kinds = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let kind: MessageKind = part
            .parse()
            .with_context(|| format!("CHAT_KINDS has an invalid entry: {}", part))?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}
