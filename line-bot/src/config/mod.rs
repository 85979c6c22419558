//! Bot configuration: LINE channel credentials, HTTP listener, logging, and dispatch settings.
//! Language-model settings live in llm-client (`EnvLlmConfig`).

mod bot_config;

#[cfg(test)]
mod tests;

pub use bot_config::{
    BotConfig, ConfigOverrides, DEFAULT_API_BASE_URL, DEFAULT_BIND_ADDR, DEFAULT_DATA_API_BASE_URL,
    DEFAULT_LOG_FILE, DEFAULT_WEBHOOK_PATH,
};
