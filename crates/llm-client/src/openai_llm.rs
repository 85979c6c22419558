//! OpenAI implementation of [`CompletionProvider`] and [`TranscriptionProvider`] on top of openai-client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use memory_core::Turn;
use openai_client::ChatOptions;
use tracing::instrument;

use super::{turn_to_openai, CompletionParams, CompletionProvider, LlmConfig, TranscriptionProvider};

/// openai-client backed completion and transcription provider.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
}

impl OpenAILlmClient {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
        }
    }

    /// Builds the client from any [`LlmConfig`] (key + base URL).
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::with_base_url(config.api_key().to_string(), config.base_url().to_string())
    }
}

#[async_trait]
impl CompletionProvider for OpenAILlmClient {
    #[instrument(skip(self, messages, params), fields(message_count = messages.len(), model = %params.model))]
    async fn complete(&self, messages: &[Turn], params: &CompletionParams) -> Result<Turn> {
        let openai_messages = messages
            .iter()
            .map(turn_to_openai)
            .collect::<Result<Vec<_>>>()?;
        let options = ChatOptions {
            model: params.model.clone(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };
        let content = self
            .client
            .chat_completion(&options, openai_messages)
            .await
            .context("chat completion")?;
        Ok(Turn::assistant(content))
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAILlmClient {
    #[instrument(skip(self, audio), fields(bytes = audio.len()))]
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str, model: &str) -> Result<String> {
        self.client
            .transcription(model, file_name, audio)
            .await
            .context("audio transcription")
    }
}
