use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Event, Reply};

/// Pluggable unit turning one inbound event into zero or one reply.
///
/// `Ok(None)` means "nothing to send". Errors are logged by the dispatcher and the event is dropped.
#[async_trait]
pub trait ProcessingStrategy: Send + Sync {
    async fn process(&self, event: &Event) -> Result<Option<Reply>>;

    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
