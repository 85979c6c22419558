//! Webhook request body: serde wire types and conversion into core [`Event`]s.
//!
//! Event and message types this crate does not model still parse; they become
//! [`EventType::Other`] and [`MessageContent::Unknown`] so one new LINE feature cannot fail a
//! whole delivery.

use chrono::{DateTime, Utc};
use dispatch_core::{
    DispatchError, Event, EventType, InboundMessage, MessageContent, Result, Source,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub events: Vec<WireEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: WireSource,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub message: Option<WireMessage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSource {
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    pub room_id: Option<String>,
}

/// Flat view over every message type; which fields are set depends on `kind`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
    pub content_provider: Option<ContentProvider>,
    pub duration: Option<u64>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub title: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub package_id: Option<String>,
    pub sticker_id: Option<String>,
    pub base_url: Option<String>,
    pub alt_text: Option<String>,
    pub base_size: Option<BaseSize>,
    pub actions: Option<Value>,
    pub template: Option<Value>,
    pub contents: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentProvider {
    /// "line" for content hosted by LINE, "external" when URLs are given.
    #[serde(rename = "type")]
    pub provider: String,
    pub original_content_url: Option<String>,
    pub preview_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BaseSize {
    pub width: u32,
    pub height: u32,
}

/// Parses a raw webhook body into core events, preserving delivery order.
pub fn parse_events(body: &[u8]) -> Result<Vec<Event>> {
    let body: WebhookBody = serde_json::from_slice(body)
        .map_err(|e| DispatchError::ParseFailure(format!("invalid webhook body: {}", e)))?;
    body.events.into_iter().map(WireEvent::into_core).collect()
}

impl WireEvent {
    pub fn into_core(self) -> Result<Event> {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(self.timestamp).ok_or_else(|| {
            DispatchError::ParseFailure(format!("timestamp out of range: {}", self.timestamp))
        })?;
        let event_type = event_type(&self.event_type);
        let message = match (&event_type, self.message) {
            (EventType::Message, Some(message)) => Some(message.into_core()),
            (EventType::Message, None) => {
                return Err(DispatchError::ParseFailure(
                    "message event without message".to_string(),
                ))
            }
            _ => None,
        };

        Ok(Event {
            event_type,
            reply_token: self.reply_token,
            source: Source {
                user_id: self.source.user_id,
                group_id: self.source.group_id,
                room_id: self.source.room_id,
            },
            timestamp,
            message,
        })
    }
}

fn event_type(raw: &str) -> EventType {
    match raw {
        "message" => EventType::Message,
        "follow" => EventType::Follow,
        "unfollow" => EventType::Unfollow,
        "join" => EventType::Join,
        "leave" => EventType::Leave,
        "postback" => EventType::Postback,
        "beacon" => EventType::Beacon,
        "unsend" => EventType::Unsend,
        other => EventType::Other(other.to_string()),
    }
}

impl WireMessage {
    /// A message missing a field its type requires is kept as [`MessageContent::Unknown`], so the
    /// other events of the delivery are still processed.
    pub fn into_core(self) -> InboundMessage {
        let content = self.content().unwrap_or_else(|| {
            warn!(message_id = %self.id, kind = %self.kind, "message is missing a required field");
            MessageContent::Unknown {
                kind: self.kind.clone(),
            }
        });
        InboundMessage {
            id: self.id,
            content,
        }
    }

    fn content(&self) -> Option<MessageContent> {
        let (original_content_url, preview_image_url) = match &self.content_provider {
            Some(provider) => (
                provider.original_content_url.clone(),
                provider.preview_image_url.clone(),
            ),
            None => (None, None),
        };

        let content = match self.kind.as_str() {
            "text" => MessageContent::Text {
                text: self.text.clone()?,
            },
            "image" => MessageContent::Image {
                original_content_url,
                preview_image_url,
            },
            "video" => MessageContent::Video {
                original_content_url,
                preview_image_url,
                duration_ms: self.duration,
            },
            "audio" => MessageContent::Audio {
                original_content_url,
                duration_ms: self.duration,
            },
            "file" => MessageContent::File {
                file_name: self.file_name.clone()?,
                file_size: self.file_size.unwrap_or(0),
            },
            "location" => MessageContent::Location {
                title: self.title.clone(),
                address: self.address.clone(),
                latitude: self.latitude?,
                longitude: self.longitude?,
            },
            "sticker" => MessageContent::Sticker {
                package_id: self.package_id.clone()?,
                sticker_id: self.sticker_id.clone()?,
            },
            "imagemap" => {
                let size = self.base_size.as_ref()?;
                MessageContent::Imagemap {
                    base_url: self.base_url.clone()?,
                    alt_text: self.alt_text.clone().unwrap_or_default(),
                    base_width: size.width,
                    base_height: size.height,
                    actions: self.actions.clone().unwrap_or(Value::Array(Vec::new())),
                }
            }
            "template" => MessageContent::Template {
                alt_text: self.alt_text.clone().unwrap_or_default(),
                template: self.template.clone()?,
            },
            "flex" => MessageContent::Flex {
                alt_text: self.alt_text.clone().unwrap_or_default(),
                contents: self.contents.clone()?,
            },
            other => MessageContent::Unknown {
                kind: other.to_string(),
            },
        };
        Some(content)
    }
}
