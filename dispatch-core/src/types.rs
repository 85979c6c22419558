//! Core types: inbound event, message kind taxonomy, and outbound reply.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

/// Message category; the key the strategy registry resolves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Video,
    Audio,
    File,
    Location,
    Sticker,
    Imagemap,
    Template,
    /// Rich content (LINE "flex" messages).
    Flex,
    Unknown,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Video => "video",
            MessageKind::Audio => "audio",
            MessageKind::File => "file",
            MessageKind::Location => "location",
            MessageKind::Sticker => "sticker",
            MessageKind::Imagemap => "imagemap",
            MessageKind::Template => "template",
            MessageKind::Flex => "flex",
            MessageKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "text" => MessageKind::Text,
            "image" => MessageKind::Image,
            "video" => MessageKind::Video,
            "audio" => MessageKind::Audio,
            "file" => MessageKind::File,
            "location" => MessageKind::Location,
            "sticker" => MessageKind::Sticker,
            "imagemap" => MessageKind::Imagemap,
            "template" => MessageKind::Template,
            "flex" => MessageKind::Flex,
            other => {
                return Err(DispatchError::Config(format!(
                    "Unknown message kind: {}",
                    other
                )))
            }
        };
        Ok(kind)
    }
}

/// Webhook event type. Only `Message` events are dispatched to strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    Message,
    Follow,
    Unfollow,
    Join,
    Leave,
    Postback,
    Beacon,
    Unsend,
    Other(String),
}

/// Where the event came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    pub room_id: Option<String>,
}

/// Kind-specific message payload.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text {
        text: String,
    },
    Image {
        original_content_url: Option<String>,
        preview_image_url: Option<String>,
    },
    Video {
        original_content_url: Option<String>,
        preview_image_url: Option<String>,
        duration_ms: Option<u64>,
    },
    Audio {
        original_content_url: Option<String>,
        duration_ms: Option<u64>,
    },
    File {
        file_name: String,
        file_size: u64,
    },
    Location {
        title: Option<String>,
        address: Option<String>,
        latitude: f64,
        longitude: f64,
    },
    Sticker {
        package_id: String,
        sticker_id: String,
    },
    Imagemap {
        base_url: String,
        alt_text: String,
        base_width: u32,
        base_height: u32,
        actions: serde_json::Value,
    },
    Template {
        alt_text: String,
        template: serde_json::Value,
    },
    Flex {
        alt_text: String,
        contents: serde_json::Value,
    },
    /// A message type this crate does not model; `kind` is the raw platform type string.
    Unknown {
        kind: String,
    },
}

impl MessageContent {
    pub fn kind(&self) -> MessageKind {
        match self {
            MessageContent::Text { .. } => MessageKind::Text,
            MessageContent::Image { .. } => MessageKind::Image,
            MessageContent::Video { .. } => MessageKind::Video,
            MessageContent::Audio { .. } => MessageKind::Audio,
            MessageContent::File { .. } => MessageKind::File,
            MessageContent::Location { .. } => MessageKind::Location,
            MessageContent::Sticker { .. } => MessageKind::Sticker,
            MessageContent::Imagemap { .. } => MessageKind::Imagemap,
            MessageContent::Template { .. } => MessageKind::Template,
            MessageContent::Flex { .. } => MessageKind::Flex,
            MessageContent::Unknown { .. } => MessageKind::Unknown,
        }
    }
}

/// The message carried by a `Message` event. `id` is used to fetch media content.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub id: String,
    pub content: MessageContent,
}

/// One inbound unit of a webhook delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub reply_token: Option<String>,
    pub source: Source,
    pub timestamp: DateTime<Utc>,
    pub message: Option<InboundMessage>,
}

impl Event {
    /// Builds a message event; used by platform adapters and tests.
    pub fn message(
        user_id: impl Into<String>,
        reply_token: impl Into<String>,
        message_id: impl Into<String>,
        content: MessageContent,
    ) -> Self {
        Self {
            event_type: EventType::Message,
            reply_token: Some(reply_token.into()),
            source: Source {
                user_id: Some(user_id.into()),
                ..Source::default()
            },
            timestamp: Utc::now(),
            message: Some(InboundMessage {
                id: message_id.into(),
                content,
            }),
        }
    }

    pub fn is_message(&self) -> bool {
        self.event_type == EventType::Message
    }

    /// Kind of the carried message; `None` for non-message events.
    pub fn message_kind(&self) -> Option<MessageKind> {
        self.message.as_ref().map(|m| m.content.kind())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.source.user_id.as_deref()
    }
}

/// Outbound payload produced by a strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text {
        text: String,
    },
    Image {
        original_content_url: String,
        preview_image_url: String,
    },
    Video {
        original_content_url: String,
        preview_image_url: String,
    },
    Audio {
        original_content_url: String,
        duration_ms: u64,
    },
    Location {
        title: String,
        address: String,
        latitude: f64,
        longitude: f64,
    },
    Sticker {
        package_id: String,
        sticker_id: String,
    },
    Imagemap {
        base_url: String,
        alt_text: String,
        base_width: u32,
        base_height: u32,
        actions: serde_json::Value,
    },
    Template {
        alt_text: String,
        template: serde_json::Value,
    },
    Flex {
        alt_text: String,
        contents: serde_json::Value,
    },
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text { text: text.into() }
    }

    /// An empty text reply is a no-op and is never delivered.
    pub fn is_empty(&self) -> bool {
        matches!(self, Reply::Text { text } if text.is_empty())
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Reply::Text { .. } => MessageKind::Text,
            Reply::Image { .. } => MessageKind::Image,
            Reply::Video { .. } => MessageKind::Video,
            Reply::Audio { .. } => MessageKind::Audio,
            Reply::Location { .. } => MessageKind::Location,
            Reply::Sticker { .. } => MessageKind::Sticker,
            Reply::Imagemap { .. } => MessageKind::Imagemap,
            Reply::Template { .. } => MessageKind::Template,
            Reply::Flex { .. } => MessageKind::Flex,
        }
    }
}
