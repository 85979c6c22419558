//! Chat-completion strategy: answers text (and transcribed audio) with a language model, keeping a
//! bounded per-user conversation window in a [`MemoryStore`].

use std::sync::Arc;

use async_trait::async_trait;
use dispatch_core::{
    DispatchError, Event, MessageContent, MessageKind, PlatformClient, ProcessingStrategy, Reply,
    Result,
};
use llm_client::{CompletionParams, CompletionProvider, TranscriptionProvider};
use memory_core::{MemoryStore, Turn};
use memory_inmemory::InMemoryStore;
use tracing::{info, instrument};

pub const DEFAULT_MEMORY_WINDOW: usize = 10;
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo-0613";
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TEMPERATURE: f32 = 0.9;
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful assistant.";

/// Prefix of the transcript line shown above the answer to a voice message.
pub const TRANSCRIPTION_MARKER: &str = "🎤: ";

/// Language-model backed strategy for text and audio messages.
///
/// Per event: extract the user's text (transcribing audio), remember it, send the system message
/// plus the last `memory_window` turns to the model, remember the answer, then trim the history
/// back to the window in one locked step, so rapid messages from one user cannot over-trim. A failed completion leaves the user's turn in memory; callers that want it
/// gone can [`MemoryStore::revoke`] it.
pub struct ChatCompletionStrategy {
    completion: Arc<dyn CompletionProvider>,
    transcription: Arc<dyn TranscriptionProvider>,
    platform: Arc<dyn PlatformClient>,
    memory: Arc<dyn MemoryStore>,
    memory_window: usize,
    params: CompletionParams,
    transcription_model: String,
    system_message: String,
}

impl ChatCompletionStrategy {
    /// Creates a strategy with an in-memory store and default model settings.
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        transcription: Arc<dyn TranscriptionProvider>,
        platform: Arc<dyn PlatformClient>,
    ) -> Self {
        Self {
            completion,
            transcription,
            platform,
            memory: Arc::new(InMemoryStore::new()),
            memory_window: DEFAULT_MEMORY_WINDOW,
            params: CompletionParams {
                model: DEFAULT_CHAT_MODEL.to_string(),
                max_tokens: DEFAULT_MAX_TOKENS,
                temperature: DEFAULT_TEMPERATURE,
            },
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
        }
    }

    pub fn with_memory(mut self, memory: Arc<dyn MemoryStore>) -> Self {
        self.memory = memory;
        self
    }

    /// Number of turns kept per user. Values below 1 are treated as 1.
    pub fn with_memory_window(mut self, memory_window: usize) -> Self {
        self.memory_window = memory_window.max(1);
        self
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.params.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.params.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.params.temperature = temperature;
        self
    }

    pub fn with_completion_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_transcription_model(mut self, model: impl Into<String>) -> Self {
        self.transcription_model = model.into();
        self
    }

    /// System instruction prepended to every request; empty disables it.
    pub fn with_system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = message.into();
        self
    }

    pub fn memory(&self) -> &Arc<dyn MemoryStore> {
        &self.memory
    }

    pub fn memory_window(&self) -> usize {
        self.memory_window
    }

    pub fn completion_params(&self) -> &CompletionParams {
        &self.params
    }

    #[instrument(skip(self))]
    async fn transcribe_audio(&self, message_id: &str) -> Result<String> {
        let audio = self.platform.fetch_media_content(message_id).await?;
        info!(bytes = audio.len(), "step: audio content fetched");
        self.transcription
            .transcribe(audio, &format!("{}.m4a", message_id), &self.transcription_model)
            .await
            .map_err(DispatchError::collaborator)
    }

    #[instrument(skip(self, message), fields(message_len = message.len()))]
    async fn chat(&self, user_id: &str, message: String) -> Result<String> {
        self.memory
            .remember(user_id, Turn::user(message))
            .await
            .map_err(DispatchError::storage)?;

        let history = self
            .memory
            .recall(user_id, self.memory_window)
            .await
            .map_err(DispatchError::storage)?;

        let mut messages = Vec::with_capacity(history.len() + 1);
        if !self.system_message.is_empty() {
            messages.push(Turn::system(self.system_message.as_str()));
        }
        messages.extend(history);

        let answer = self
            .completion
            .complete(&messages, &self.params)
            .await
            .map_err(DispatchError::collaborator)?;
        let answer = Turn::assistant(answer.content);

        self.memory
            .remember(user_id, answer.clone())
            .await
            .map_err(DispatchError::storage)?;

        self.memory
            .trim_to(user_id, self.memory_window)
            .await
            .map_err(DispatchError::storage)?;

        info!(
            history_sent = messages.len(),
            answer_len = answer.content.len(),
            "step: chat completion done"
        );
        Ok(answer.content)
    }
}

#[async_trait]
impl ProcessingStrategy for ChatCompletionStrategy {
    async fn process(&self, event: &Event) -> Result<Option<Reply>> {
        let Some(message) = &event.message else {
            return Err(DispatchError::UnsupportedKind(MessageKind::Unknown));
        };

        let (user_message, mut reply_text) = match &message.content {
            MessageContent::Text { text } => (text.clone(), String::new()),
            MessageContent::Audio { .. } => {
                let transcript = self.transcribe_audio(&message.id).await?;
                let marker = format!("{}{}\n", TRANSCRIPTION_MARKER, transcript);
                (transcript, marker)
            }
            other => return Err(DispatchError::UnsupportedKind(other.kind())),
        };

        if user_message.is_empty() {
            info!("Empty user message, nothing to send");
            return Ok(None);
        }

        let Some(user_id) = event.user_id() else {
            return Err(DispatchError::ParseFailure(
                "message event without source user id".to_string(),
            ));
        };

        let answer = self.chat(user_id, user_message).await?;
        reply_text.push_str(&answer);
        Ok(Some(Reply::text(reply_text)))
    }

    fn name(&self) -> &str {
        "chat-completion"
    }
}
