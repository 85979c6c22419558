//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for chat completion and audio transcription.
//! Provides token masking for safe logging and a simple request/response API.

use async_openai::{
    config::OpenAIConfig,
    types::{AudioInput, CreateChatCompletionRequestArgs, CreateTranscriptionRequestArgs},
    Client,
};
use std::sync::Arc;

pub use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_ascii() {
        return "***".to_string();
    }
    format!("{}***{}", &token[..7], &token[len - 4..])
}

/// Sampling settings for one chat completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Chat and transcription client over async-openai. Keeps the key only to log it masked.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Arc<Client<OpenAIConfig>>,
    api_key_for_logging: String,
}

impl OpenAIClient {
    /// Builds a client against `base_url` (the public API, a proxy or a compatible endpoint).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.as_str())
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            api_key_for_logging: api_key,
        }
    }

    fn masked_key(&self) -> String {
        mask_token(&self.api_key_for_logging)
    }

    /// Sends a chat completion request and returns the first choice's content.
    ///
    /// Logs masked API key, request JSON (debug), and token usage. Errors if the response has no choices.
    #[allow(deprecated)]
    pub async fn chat_completion(
        &self,
        options: &ChatOptions,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> anyhow::Result<String> {
        tracing::info!(
            model = %options.model,
            message_count = messages.len(),
            max_tokens = options.max_tokens,
            temperature = options.temperature,
            api_key = %self.masked_key(),
            "OpenAI chat_completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(options.model.as_str())
            .messages(messages)
            .max_tokens(options.max_tokens)
            .temperature(options.temperature)
            .build()?;

        if let Ok(json) = serde_json::to_string_pretty(&request) {
            tracing::debug!(request_json = %json, "OpenAI chat_completion request JSON");
        }

        let response = self.client.chat().create(request).await?;

        if let Some(ref u) = response.usage {
            tracing::info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "OpenAI chat_completion usage"
            );
        }

        match response.choices.first() {
            Some(choice) => Ok(choice.message.content.clone().unwrap_or_default()),
            None => anyhow::bail!("No response from OpenAI"),
        }
    }

    /// Transcribes an audio file held in memory. `file_name` carries the format (e.g. `123.m4a`).
    pub async fn transcription(
        &self,
        model: &str,
        file_name: &str,
        audio: Vec<u8>,
    ) -> anyhow::Result<String> {
        tracing::info!(
            model = %model,
            file_name = %file_name,
            bytes = audio.len(),
            api_key = %self.masked_key(),
            "OpenAI transcription request"
        );

        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(file_name.to_string(), audio))
            .model(model)
            .build()?;

        let response = self.client.audio().transcribe(request).await?;

        tracing::info!(text_len = response.text.len(), "OpenAI transcription done");
        Ok(response.text)
    }
}
