//! LINE Messaging API adapter: signature check, webhook parsing, reply and content endpoints.

mod client;
mod messages;
mod signature;
mod webhook;

pub use client::LineClient;
pub use messages::{OutboundMessage, ReplyRequest};
pub use signature::{sign, verify_signature, SIGNATURE_HEADER};
pub use webhook::{parse_events, WebhookBody, WireEvent, WireMessage};
