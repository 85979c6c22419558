//! Mock collaborators shared by the chat-strategies integration tests. No network.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use dispatch_core::{DispatchError, Event, MessageContent, PlatformClient, Reply, Result};
use llm_client::{CompletionParams, CompletionProvider, TranscriptionProvider};
use memory_core::{MemoryStore, Turn};
use memory_inmemory::InMemoryStore;
use tokio::sync::Barrier;

/// Completion mock: records every request and answers with `answer`, or fails when `fail` is set.
pub struct MockCompletion {
    pub answer: String,
    pub fail: bool,
    pub requests: Mutex<Vec<(Vec<Turn>, CompletionParams)>>,
}

impl MockCompletion {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::answering("")
        }
    }

    pub fn requests(&self) -> Vec<(Vec<Turn>, CompletionParams)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletion {
    async fn complete(&self, messages: &[Turn], params: &CompletionParams) -> anyhow::Result<Turn> {
        self.requests
            .lock()
            .unwrap()
            .push((messages.to_vec(), params.clone()));
        if self.fail {
            anyhow::bail!("upstream returned 503");
        }
        Ok(Turn::assistant(self.answer.clone()))
    }
}

/// Transcription mock: returns `transcript` and records (bytes, file name, model).
pub struct MockTranscription {
    pub transcript: String,
    pub fail: bool,
    pub calls: Mutex<Vec<(usize, String, String)>>,
}

impl MockTranscription {
    pub fn returning(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning("")
        }
    }

    pub fn calls(&self) -> Vec<(usize, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptionProvider for MockTranscription {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str, model: &str) -> anyhow::Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((audio.len(), file_name.to_string(), model.to_string()));
        if self.fail {
            anyhow::bail!("unsupported audio format");
        }
        Ok(self.transcript.clone())
    }
}

/// Platform mock: serves 4 bytes of fake audio, records delivered replies, parses nothing.
#[derive(Default)]
pub struct MockPlatform {
    pub events: Vec<Event>,
    pub delivered: Mutex<Vec<(String, Reply)>>,
}

impl MockPlatform {
    pub fn delivered(&self) -> Vec<(String, Reply)> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformClient for MockPlatform {
    fn parse_delivery(&self, signature: &str, _body: &[u8]) -> Result<Vec<Event>> {
        if signature != "valid" {
            return Err(DispatchError::InvalidSignature);
        }
        Ok(self.events.clone())
    }

    async fn deliver_reply(&self, reply_token: &str, reply: &Reply) -> Result<()> {
        self.delivered
            .lock()
            .unwrap()
            .push((reply_token.to_string(), reply.clone()));
        Ok(())
    }

    async fn fetch_media_content(&self, _message_id: &str) -> Result<Vec<u8>> {
        Ok(vec![0x00, 0x01, 0x02, 0x03])
    }
}

pub fn text_event(user_id: &str, text: &str) -> Event {
    Event::message(
        user_id,
        format!("reply-{}", text),
        "m-text",
        MessageContent::Text {
            text: text.to_string(),
        },
    )
}

pub fn audio_event(user_id: &str, message_id: &str) -> Event {
    Event::message(
        user_id,
        "reply-audio",
        message_id,
        MessageContent::Audio {
            original_content_url: None,
            duration_ms: Some(3000),
        },
    )
}

/// Store wrapper: every `trim_to` waits at `barrier`, so concurrent turns of one user all reach the
/// trimming step before any of them trims.
pub struct GatedTrimStore {
    pub inner: InMemoryStore,
    pub barrier: Barrier,
}

impl GatedTrimStore {
    pub fn new(parties: usize) -> Self {
        Self {
            inner: InMemoryStore::new(),
            barrier: Barrier::new(parties),
        }
    }
}

#[async_trait]
impl MemoryStore for GatedTrimStore {
    async fn remember(&self, user_id: &str, turn: Turn) -> anyhow::Result<()> {
        self.inner.remember(user_id, turn).await
    }

    async fn recall(&self, user_id: &str, n: usize) -> anyhow::Result<Vec<Turn>> {
        self.inner.recall(user_id, n).await
    }

    async fn revoke(&self, user_id: &str, n: usize) -> anyhow::Result<Vec<Turn>> {
        self.inner.revoke(user_id, n).await
    }

    async fn forget(&self, user_id: &str, n: usize) -> anyhow::Result<()> {
        self.inner.forget(user_id, n).await
    }

    async fn size(&self, user_id: &str) -> anyhow::Result<usize> {
        self.inner.size(user_id).await
    }

    async fn trim_to(&self, user_id: &str, window: usize) -> anyhow::Result<usize> {
        self.barrier.wait().await;
        self.inner.trim_to(user_id, window).await
    }
}

/// Store whose every operation fails for `broken_user`; other users get a working in-memory store.
pub struct FailingStore {
    pub inner: InMemoryStore,
    pub broken_user: String,
}

impl FailingStore {
    pub fn for_user(broken_user: &str) -> Self {
        Self {
            inner: InMemoryStore::new(),
            broken_user: broken_user.to_string(),
        }
    }

    fn check(&self, user_id: &str) -> anyhow::Result<()> {
        if user_id == self.broken_user {
            anyhow::bail!("history shard unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl MemoryStore for FailingStore {
    async fn remember(&self, user_id: &str, turn: Turn) -> anyhow::Result<()> {
        self.check(user_id)?;
        self.inner.remember(user_id, turn).await
    }

    async fn recall(&self, user_id: &str, n: usize) -> anyhow::Result<Vec<Turn>> {
        self.check(user_id)?;
        self.inner.recall(user_id, n).await
    }

    async fn revoke(&self, user_id: &str, n: usize) -> anyhow::Result<Vec<Turn>> {
        self.check(user_id)?;
        self.inner.revoke(user_id, n).await
    }

    async fn forget(&self, user_id: &str, n: usize) -> anyhow::Result<()> {
        self.check(user_id)?;
        self.inner.forget(user_id, n).await
    }

    async fn size(&self, user_id: &str) -> anyhow::Result<usize> {
        self.check(user_id)?;
        self.inner.size(user_id).await
    }

    async fn trim_to(&self, user_id: &str, window: usize) -> anyhow::Result<usize> {
        self.check(user_id)?;
        self.inner.trim_to(user_id, window).await
    }
}
