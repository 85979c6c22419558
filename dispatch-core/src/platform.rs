//! Platform abstraction for parsing deliveries, replying, and fetching media.
//!
//! [`PlatformClient`] is transport-agnostic; line-bot implements it for the LINE Messaging API.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Event, Reply};

/// Chat platform client. The dispatch engine uses it as the reply sink; strategies use it to fetch media.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Verifies `signature` over the raw `body` and parses it into events, in delivery order.
    /// Returns `InvalidSignature` or `ParseFailure`.
    fn parse_delivery(&self, signature: &str, body: &[u8]) -> Result<Vec<Event>>;

    /// Sends `reply` using the event's one-shot reply token.
    async fn deliver_reply(&self, reply_token: &str, reply: &Reply) -> Result<()>;

    /// Downloads the binary content (audio, image, ...) of an inbound message.
    async fn fetch_media_content(&self, message_id: &str) -> Result<Vec<u8>>;
}
