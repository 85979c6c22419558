//! Outbound message objects for the reply endpoint.

use dispatch_core::Reply;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest<'a> {
    pub reply_token: &'a str,
    pub messages: Vec<OutboundMessage<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        original_content_url: &'a str,
        preview_image_url: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    Video {
        original_content_url: &'a str,
        preview_image_url: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    Audio {
        original_content_url: &'a str,
        duration: u64,
    },
    Location {
        title: &'a str,
        address: &'a str,
        latitude: f64,
        longitude: f64,
    },
    #[serde(rename_all = "camelCase")]
    Sticker {
        package_id: &'a str,
        sticker_id: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    Imagemap {
        base_url: &'a str,
        alt_text: &'a str,
        base_size: BaseSize,
        actions: &'a Value,
    },
    #[serde(rename_all = "camelCase")]
    Template {
        alt_text: &'a str,
        template: &'a Value,
    },
    #[serde(rename_all = "camelCase")]
    Flex {
        alt_text: &'a str,
        contents: &'a Value,
    },
}

#[derive(Debug, Serialize)]
pub struct BaseSize {
    pub width: u32,
    pub height: u32,
}

impl<'a> From<&'a Reply> for OutboundMessage<'a> {
    fn from(reply: &'a Reply) -> Self {
        match reply {
            Reply::Text { text } => OutboundMessage::Text { text },
            Reply::Image {
                original_content_url,
                preview_image_url,
            } => OutboundMessage::Image {
                original_content_url,
                preview_image_url,
            },
            Reply::Video {
                original_content_url,
                preview_image_url,
            } => OutboundMessage::Video {
                original_content_url,
                preview_image_url,
            },
            Reply::Audio {
                original_content_url,
                duration_ms,
            } => OutboundMessage::Audio {
                original_content_url,
                duration: *duration_ms,
            },
            Reply::Location {
                title,
                address,
                latitude,
                longitude,
            } => OutboundMessage::Location {
                title,
                address,
                latitude: *latitude,
                longitude: *longitude,
            },
            Reply::Sticker {
                package_id,
                sticker_id,
            } => OutboundMessage::Sticker {
                package_id,
                sticker_id,
            },
            Reply::Imagemap {
                base_url,
                alt_text,
                base_width,
                base_height,
                actions,
            } => OutboundMessage::Imagemap {
                base_url,
                alt_text,
                base_size: BaseSize {
                    width: *base_width,
                    height: *base_height,
                },
                actions,
            },
            Reply::Template { alt_text, template } => {
                OutboundMessage::Template { alt_text, template }
            }
            Reply::Flex { alt_text, contents } => OutboundMessage::Flex { alt_text, contents },
        }
    }
}
