//! Pass-through strategy: replies with the same content it received.

use async_trait::async_trait;
use dispatch_core::{DispatchError, Event, MessageContent, MessageKind, ProcessingStrategy, Reply, Result};

/// Echoes the inbound message back. Files are described in text since they cannot be re-sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoStrategy;

impl EchoStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessingStrategy for EchoStrategy {
    async fn process(&self, event: &Event) -> Result<Option<Reply>> {
        let Some(message) = &event.message else {
            return Err(DispatchError::UnsupportedKind(MessageKind::Unknown));
        };
        echo(&message.content).map(Some)
    }

    fn name(&self) -> &str {
        "echo"
    }
}

fn echo(content: &MessageContent) -> Result<Reply> {
    let unsupported = || DispatchError::UnsupportedKind(content.kind());
    let reply = match content {
        MessageContent::Text { text } => Reply::text(text.clone()),
        MessageContent::File {
            file_name,
            file_size,
        } => Reply::text(format!("FileMessage: {} ({} byte)", file_name, file_size)),
        // Platform-hosted media has no public URL to send back.
        MessageContent::Image {
            original_content_url,
            preview_image_url,
        } => Reply::Image {
            original_content_url: original_content_url.clone().ok_or_else(unsupported)?,
            preview_image_url: preview_image_url.clone().ok_or_else(unsupported)?,
        },
        MessageContent::Video {
            original_content_url,
            preview_image_url,
            ..
        } => Reply::Video {
            original_content_url: original_content_url.clone().ok_or_else(unsupported)?,
            preview_image_url: preview_image_url.clone().ok_or_else(unsupported)?,
        },
        MessageContent::Audio {
            original_content_url,
            duration_ms,
        } => Reply::Audio {
            original_content_url: original_content_url.clone().ok_or_else(unsupported)?,
            duration_ms: duration_ms.unwrap_or(0),
        },
        MessageContent::Location {
            title,
            address,
            latitude,
            longitude,
        } => Reply::Location {
            title: title.clone().unwrap_or_default(),
            address: address.clone().unwrap_or_default(),
            latitude: *latitude,
            longitude: *longitude,
        },
        MessageContent::Sticker {
            package_id,
            sticker_id,
        } => Reply::Sticker {
            package_id: package_id.clone(),
            sticker_id: sticker_id.clone(),
        },
        MessageContent::Imagemap {
            base_url,
            alt_text,
            base_width,
            base_height,
            actions,
        } => Reply::Imagemap {
            base_url: base_url.clone(),
            alt_text: alt_text.clone(),
            base_width: *base_width,
            base_height: *base_height,
            actions: actions.clone(),
        },
        MessageContent::Template { alt_text, template } => Reply::Template {
            alt_text: alt_text.clone(),
            template: template.clone(),
        },
        MessageContent::Flex { alt_text, contents } => Reply::Flex {
            alt_text: alt_text.clone(),
            contents: contents.clone(),
        },
        MessageContent::Unknown { .. } => return Err(unsupported()),
    };
    Ok(reply)
}
