//! # LLM client abstraction
//!
//! Defines the [`CompletionProvider`] and [`TranscriptionProvider`] traits and an OpenAI
//! implementation of both. Transport-agnostic; used by chat-strategies and line-bot.

use anyhow::Result;
use async_trait::async_trait;
use memory_core::{Role, Turn};
use openai_client::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};

mod config;
mod openai_llm;

pub use config::{EnvLlmConfig, LlmConfig};
pub use openai_llm::OpenAILlmClient;

/// Per-call completion settings; configuration constants, never computed per request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Chat completion: ordered turns in, one assistant turn out.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[Turn], params: &CompletionParams) -> Result<Turn>;
}

/// Speech-to-text over an in-memory audio file.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// `file_name` carries the audio format (e.g. `123.m4a`).
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str, model: &str) -> Result<String>;
}

/// Converts a single [`Turn`] into OpenAI API message format.
fn turn_to_openai(turn: &Turn) -> Result<ChatCompletionRequestMessage> {
    let content = turn.content.clone();
    let message: ChatCompletionRequestMessage = match turn.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(message)
}
