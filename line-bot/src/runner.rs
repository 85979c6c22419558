use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chat_strategies::{ChatCompletionStrategy, EchoStrategy};
use dispatch_core::{init_tracing, PlatformClient};
use dispatch_engine::{DispatchEngine, EngineConfig};
use llm_client::{LlmConfig, OpenAILlmClient};
use memory_inmemory::InMemoryStore;
use openai_client::mask_token;
use strategy_registry::StrategyRegistry;
use tracing::{info, instrument};

use crate::config::BotConfig;
use crate::line::LineClient;
use crate::server::router;

/// Builds the engine with the given platform client: echo for every kind, plus the chat strategy
/// for `chat_kinds` when chat is enabled. `llm_config` is only read when chat is enabled.
pub fn build_engine_with_platform(
    config: &BotConfig,
    llm_config: Option<&dyn LlmConfig>,
    platform: Arc<dyn PlatformClient>,
) -> Result<DispatchEngine> {
    let registry = StrategyRegistry::new().with_default(Arc::new(EchoStrategy::new()));

    if config.chat_enabled() {
        let llm_config =
            llm_config.context("ENABLE_CHAT is true but no language model config was given")?;
        let llm = Arc::new(OpenAILlmClient::from_config(llm_config));
        let mut chat = ChatCompletionStrategy::new(llm.clone(), llm, platform.clone())
            .with_memory(Arc::new(InMemoryStore::new()))
            .with_memory_window(config.memory_window)
            .with_completion_params(llm_config.completion_params())
            .with_transcription_model(llm_config.transcription_model());
        if let Some(prompt) = &config.system_prompt {
            chat = chat.with_system_message(prompt.as_str());
        }
        let chat = Arc::new(chat);
        for kind in &config.chat_kinds {
            registry.set_override(*kind, chat.clone());
        }
    }

    Ok(DispatchEngine::with_config(
        Arc::new(registry),
        platform,
        EngineConfig {
            max_concurrency: config.max_concurrency,
            event_timeout: config.event_timeout_secs.map(Duration::from_secs),
        },
    ))
}

/// Builds the engine against the LINE Messaging API.
pub fn build_engine(
    config: &BotConfig,
    llm_config: Option<&dyn LlmConfig>,
) -> Result<DispatchEngine> {
    let platform = Arc::new(LineClient::from_config(config));
    build_engine_with_platform(config, llm_config, platform)
}

/// Main entry: validate config, init logging, build the engine, then serve the webhook until
/// the process is stopped.
#[instrument(skip(config, llm_config))]
pub async fn run_server(config: BotConfig, llm_config: Option<&dyn LlmConfig>) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    let addr = config.socket_addr()?;
    info!(
        bind_addr = %addr,
        webhook_path = %config.webhook_path,
        max_concurrency = config.max_concurrency,
        chat_enabled = config.chat_enabled(),
        chat_kinds = ?config.chat_kinds,
        channel_access_token = %mask_token(&config.channel_access_token),
        openai_api_key = %llm_config.map(|c| mask_token(c.api_key())).unwrap_or_default(),
        "Initializing bot"
    );

    let engine = Arc::new(build_engine(&config, llm_config)?);
    let app = router(engine, &config.webhook_path);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Bot started successfully");
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
