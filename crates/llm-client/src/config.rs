//! LLM configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;

use crate::CompletionParams;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo-0613";
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TEMPERATURE: f32 = 0.9;
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// LLM configuration interface for OpenAI-compatible APIs.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn completion_model(&self) -> &str;
    fn max_tokens(&self) -> u32;
    fn temperature(&self) -> f32;
    fn transcription_model(&self) -> &str;

    fn completion_params(&self) -> CompletionParams {
        CompletionParams {
            model: self.completion_model().to_string(),
            max_tokens: self.max_tokens(),
            temperature: self.temperature(),
        }
    }
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub completion_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub transcription_model: String,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.openai_api_key
    }
    fn base_url(&self) -> &str {
        &self.openai_base_url
    }
    fn completion_model(&self) -> &str {
        &self.completion_model
    }
    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
    fn temperature(&self) -> f32 {
        self.temperature
    }
    fn transcription_model(&self) -> &str {
        &self.transcription_model
    }
}

impl EnvLlmConfig {
    /// Load from environment variables. Only `OPENAI_API_KEY` is required.
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?;
        let openai_base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let completion_model = env::var("COMPLETION_MODEL")
            .unwrap_or_else(|_| DEFAULT_COMPLETION_MODEL.to_string());
        let max_tokens = match env::var("MAX_TOKENS") {
            Ok(s) => s
                .parse()
                .with_context(|| format!("MAX_TOKENS is not a positive integer: {}", s))?,
            Err(_) => DEFAULT_MAX_TOKENS,
        };
        let temperature = match env::var("TEMPERATURE") {
            Ok(s) => s
                .parse()
                .with_context(|| format!("TEMPERATURE is not a number: {}", s))?,
            Err(_) => DEFAULT_TEMPERATURE,
        };
        let transcription_model = env::var("TRANSCRIPTION_MODEL")
            .unwrap_or_else(|_| DEFAULT_TRANSCRIPTION_MODEL.to_string());
        Ok(Self {
            openai_api_key,
            openai_base_url,
            completion_model,
            max_tokens,
            temperature,
            transcription_model,
        })
    }
}
