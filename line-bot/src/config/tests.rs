//! Config tests.

use crate::config::{BotConfig, ConfigOverrides};
use dispatch_core::MessageKind;
use serial_test::serial;
use std::env;

const VARS: &[&str] = &[
    "LINE_CHANNEL_SECRET",
    "LINE_CHANNEL_ACCESS_TOKEN",
    "LINE_API_BASE_URL",
    "LINE_DATA_API_BASE_URL",
    "BIND_ADDR",
    "WEBHOOK_PATH",
    "LOG_FILE",
    "MAX_CONCURRENCY",
    "EVENT_TIMEOUT_SECS",
    "MEMORY_WINDOW",
    "SYSTEM_PROMPT",
    "ENABLE_CHAT",
    "CHAT_KINDS",
];

fn reset_env() {
    for var in VARS {
        env::remove_var(var);
    }
    env::set_var("LINE_CHANNEL_SECRET", "test_secret");
    env::set_var("LINE_CHANNEL_ACCESS_TOKEN", "test_access_token");
}

#[test]
#[serial]
fn test_load_config_with_defaults() {
    reset_env();

    let config = BotConfig::load(ConfigOverrides::default()).unwrap();

    assert_eq!(config.channel_secret, "test_secret");
    assert_eq!(config.channel_access_token, "test_access_token");
    assert_eq!(config.api_base_url, "https://api.line.me");
    assert_eq!(config.data_api_base_url, "https://api-data.line.me");
    assert_eq!(config.bind_addr, "0.0.0.0:8080");
    assert_eq!(config.webhook_path, "/callback");
    assert_eq!(config.log_file, "logs/line-bot.log");
    assert_eq!(config.max_concurrency, 10);
    assert_eq!(config.event_timeout_secs, None);
    assert_eq!(config.memory_window, 10);
    assert!(config.system_prompt.is_none());
    assert!(config.enable_chat);
    assert_eq!(config.chat_kinds, vec![MessageKind::Text, MessageKind::Audio]);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_load_config_with_custom_values() {
    reset_env();
    env::set_var("WEBHOOK_PATH", "/line/webhook");
    env::set_var("MAX_CONCURRENCY", "4");
    env::set_var("EVENT_TIMEOUT_SECS", "30");
    env::set_var("MEMORY_WINDOW", "6");
    env::set_var("SYSTEM_PROMPT", "Answer in Japanese.");
    env::set_var("ENABLE_CHAT", "false");
    env::set_var("CHAT_KINDS", "audio, text,audio");

    let config = BotConfig::load(ConfigOverrides::default()).unwrap();

    assert_eq!(config.webhook_path, "/line/webhook");
    assert_eq!(config.max_concurrency, 4);
    assert_eq!(config.event_timeout_secs, Some(30));
    assert_eq!(config.memory_window, 6);
    assert_eq!(config.system_prompt.as_deref(), Some("Answer in Japanese."));
    assert!(!config.enable_chat);
    assert_eq!(config.chat_kinds, vec![MessageKind::Audio, MessageKind::Text]);

    reset_env();
}

/// **Test: CLI overrides win over env vars.**
#[test]
#[serial]
fn test_load_config_with_overrides() {
    reset_env();
    env::set_var("BIND_ADDR", "127.0.0.1:9000");
    env::set_var("MAX_CONCURRENCY", "4");

    let config = BotConfig::load(ConfigOverrides {
        bind_addr: Some("127.0.0.1:7000".to_string()),
        max_concurrency: Some(2),
    })
    .unwrap();

    assert_eq!(config.bind_addr, "127.0.0.1:7000");
    assert_eq!(config.max_concurrency, 2);
    assert_eq!(config.socket_addr().unwrap().port(), 7000);

    reset_env();
}

#[test]
#[serial]
fn test_load_requires_channel_credentials() {
    reset_env();
    env::remove_var("LINE_CHANNEL_ACCESS_TOKEN");
    assert!(BotConfig::load(ConfigOverrides::default()).is_err());

    reset_env();
    env::remove_var("LINE_CHANNEL_SECRET");
    assert!(BotConfig::load(ConfigOverrides::default()).is_err());

    reset_env();
}

#[test]
#[serial]
fn test_load_rejects_malformed_values() {
    reset_env();
    env::set_var("MAX_CONCURRENCY", "ten");
    assert!(BotConfig::load(ConfigOverrides::default()).is_err());

    reset_env();
    env::set_var("ENABLE_CHAT", "maybe");
    assert!(BotConfig::load(ConfigOverrides::default()).is_err());

    reset_env();
    env::set_var("CHAT_KINDS", "text,carousel");
    assert!(BotConfig::load(ConfigOverrides::default()).is_err());

    reset_env();
}

#[test]
#[serial]
fn test_validate_rejects_bad_config() {
    reset_env();
    let base = BotConfig::load(ConfigOverrides::default()).unwrap();

    let mut config = base.clone();
    config.max_concurrency = 0;
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.memory_window = 0;
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.channel_secret = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.api_base_url = "not-a-valid-url".to_string();
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.bind_addr = "localhost".to_string();
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.webhook_path = "callback".to_string();
    assert!(config.validate().is_err());

    let mut config = base;
    config.event_timeout_secs = Some(0);
    assert!(config.validate().is_err());
}

/// **Test: An empty CHAT_KINDS turns chat off even when ENABLE_CHAT is true.**
#[test]
#[serial]
fn test_chat_enabled_needs_kinds() {
    reset_env();
    let config = BotConfig::load(ConfigOverrides::default()).unwrap();
    assert!(config.chat_enabled());

    env::set_var("CHAT_KINDS", " , ");
    let config = BotConfig::load(ConfigOverrides::default()).unwrap();
    assert!(config.enable_chat);
    assert!(config.chat_kinds.is_empty());
    assert!(!config.chat_enabled());

    env::set_var("CHAT_KINDS", "text");
    env::set_var("ENABLE_CHAT", "false");
    let config = BotConfig::load(ConfigOverrides::default()).unwrap();
    assert!(!config.chat_enabled());

    reset_env();
}
