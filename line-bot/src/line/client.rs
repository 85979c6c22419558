//! LINE Messaging API client: implements [`PlatformClient`] over reqwest.

use async_trait::async_trait;
use dispatch_core::{DispatchError, Event, PlatformClient, Reply, Result};
use openai_client::mask_token;
use tracing::{debug, info, instrument, warn};

use super::messages::{OutboundMessage, ReplyRequest};
use super::signature::verify_signature;
use super::webhook::parse_events;
use crate::config::{BotConfig, DEFAULT_API_BASE_URL, DEFAULT_DATA_API_BASE_URL};

pub struct LineClient {
    http: reqwest::Client,
    channel_secret: String,
    channel_access_token: String,
    api_base_url: String,
    data_api_base_url: String,
}

impl LineClient {
    /// Creates a client against the public LINE endpoints.
    pub fn new(channel_secret: impl Into<String>, channel_access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            channel_secret: channel_secret.into(),
            channel_access_token: channel_access_token.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_api_base_url: DEFAULT_DATA_API_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(
            config.channel_secret.as_str(),
            config.channel_access_token.as_str(),
        )
        .with_base_urls(
            config.api_base_url.as_str(),
            config.data_api_base_url.as_str(),
        )
    }

    /// Points the client at other hosts (e.g. a local mock server).
    pub fn with_base_urls(
        mut self,
        api_base_url: impl Into<String>,
        data_api_base_url: impl Into<String>,
    ) -> Self {
        self.api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        self.data_api_base_url = data_api_base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn masked_access_token(&self) -> String {
        mask_token(&self.channel_access_token)
    }

    fn reply_url(&self) -> String {
        format!("{}/v2/bot/message/reply", self.api_base_url)
    }

    fn content_url(&self, message_id: &str) -> String {
        format!(
            "{}/v2/bot/message/{}/content",
            self.data_api_base_url, message_id
        )
    }
}

#[async_trait]
impl PlatformClient for LineClient {
    fn parse_delivery(&self, signature: &str, body: &[u8]) -> Result<Vec<Event>> {
        if !verify_signature(&self.channel_secret, body, signature) {
            warn!(body_len = body.len(), "webhook signature mismatch");
            return Err(DispatchError::InvalidSignature);
        }
        let events = parse_events(body)?;
        debug!(count = events.len(), "step: webhook parsed");
        Ok(events)
    }

    #[instrument(skip(self, reply), fields(kind = %reply.kind()))]
    async fn deliver_reply(&self, reply_token: &str, reply: &Reply) -> Result<()> {
        let request = ReplyRequest {
            reply_token,
            messages: vec![OutboundMessage::from(reply)],
        };
        let response = self
            .http
            .post(self.reply_url())
            .bearer_auth(&self.channel_access_token)
            .json(&request)
            .send()
            .await
            .map_err(DispatchError::collaborator)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Collaborator(format!(
                "reply failed with {}: {}",
                status, body
            )));
        }
        info!("step: reply delivered");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_media_content(&self, message_id: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(self.content_url(message_id))
            .bearer_auth(&self.channel_access_token)
            .send()
            .await
            .map_err(DispatchError::collaborator)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Collaborator(format!(
                "content fetch for {} failed with {}",
                message_id, status
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(DispatchError::collaborator)?;
        debug!(bytes = bytes.len(), "step: content downloaded");
        Ok(bytes.to_vec())
    }
}
