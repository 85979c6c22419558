//! Bounded fan-out of one webhook batch.
//!
//! Each event takes one slot of the admission gate before it is spawned; the submitting path is
//! the only place that waits for capacity. The slot is an owned semaphore permit moved into the
//! task, so it is released on every exit (reply, error, panic, or abort).

use std::sync::Arc;
use std::time::Duration;

use dispatch_core::{DispatchError, Event, PlatformClient};
use http::StatusCode;
use strategy_registry::StrategyRegistry;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Dispatcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of events processed at the same time. Values below 1 are treated as 1.
    pub max_concurrency: usize,
    /// Upper bound for one event's `process` call; expiry counts as a failure.
    pub event_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            event_timeout: None,
        }
    }
}

/// Final state of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Strategy produced a reply and the platform accepted it.
    Replied,
    /// Strategy succeeded with nothing to send.
    NoReply,
    /// Not a message event.
    Ignored,
    /// No strategy registered for the kind.
    Dropped,
    /// Strategy, timeout, or delivery failure.
    Failed,
}

/// Per-batch tally, mostly for logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub replied: usize,
    pub no_reply: usize,
    pub ignored: usize,
    pub dropped: usize,
    pub failed: usize,
}

impl BatchOutcome {
    fn record(&mut self, outcome: EventOutcome) {
        match outcome {
            EventOutcome::Replied => self.replied += 1,
            EventOutcome::NoReply => self.no_reply += 1,
            EventOutcome::Ignored => self.ignored += 1,
            EventOutcome::Dropped => self.dropped += 1,
            EventOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.replied + self.no_reply + self.ignored + self.dropped + self.failed
    }
}

/// Routes each event of a batch to its registry-resolved strategy under a concurrency ceiling.
pub struct DispatchEngine {
    registry: Arc<StrategyRegistry>,
    platform: Arc<dyn PlatformClient>,
    gate: Arc<Semaphore>,
    config: EngineConfig,
}

impl DispatchEngine {
    /// Creates an engine with the default config (10 slots, no timeout).
    pub fn new(registry: Arc<StrategyRegistry>, platform: Arc<dyn PlatformClient>) -> Self {
        Self::with_config(registry, platform, EngineConfig::default())
    }

    pub fn with_config(
        registry: Arc<StrategyRegistry>,
        platform: Arc<dyn PlatformClient>,
        mut config: EngineConfig,
    ) -> Self {
        config.max_concurrency = config.max_concurrency.max(1);
        Self {
            registry,
            platform,
            gate: Arc::new(Semaphore::new(config.max_concurrency)),
            config,
        }
    }

    /// The registry consulted for every event; callers may change it at runtime.
    pub fn registry(&self) -> &Arc<StrategyRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Free admission slots right now.
    pub fn available_slots(&self) -> usize {
        self.gate.available_permits()
    }

    /// Processes every event of the batch and returns once all of them have finished.
    ///
    /// Events run concurrently (no ordering between them); one event's failure never affects its
    /// siblings. Nothing is retried here: the platform redelivers the whole webhook instead.
    #[instrument(skip(self, events), fields(batch_size = events.len()))]
    pub async fn submit(&self, events: Vec<Event>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let mut tasks = JoinSet::new();
        let total = events.len();

        for (index, event) in events.into_iter().enumerate() {
            let permit = match self.gate.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!(error = %e, remaining = total - index, "Admission gate closed, dropping rest of batch");
                    outcome.failed += total - index;
                    break;
                }
            };

            let registry = self.registry.clone();
            let platform = self.platform.clone();
            let timeout = self.config.event_timeout;
            let span = info_span!(
                "event",
                index,
                user_id = event.user_id().unwrap_or("-"),
                kind = event.message_kind().map(|k| k.as_str()).unwrap_or("-"),
            );
            tasks.spawn(
                async move {
                    let _permit = permit;
                    handle_event(&registry, platform.as_ref(), event, timeout).await
                }
                .instrument(span),
            );
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(event_outcome) => outcome.record(event_outcome),
                Err(e) => {
                    error!(error = %e, "Event task panicked or was cancelled");
                    outcome.record(EventOutcome::Failed);
                }
            }
        }

        info!(
            replied = outcome.replied,
            no_reply = outcome.no_reply,
            ignored = outcome.ignored,
            dropped = outcome.dropped,
            failed = outcome.failed,
            "step: batch finished"
        );
        outcome
    }

    /// Webhook entry point: 400 on bad signature, 500 on unparsable body, otherwise processes the
    /// batch and returns 200 whatever the per-event results were.
    #[instrument(skip(self, signature, body), fields(body_len = body.len()))]
    pub async fn handle_delivery(&self, signature: &str, body: &[u8]) -> StatusCode {
        let events = match self.platform.parse_delivery(signature, body) {
            Ok(events) => events,
            Err(DispatchError::InvalidSignature) => {
                warn!("Rejected delivery: invalid signature");
                return StatusCode::BAD_REQUEST;
            }
            Err(e) => {
                error!(error = %e, "Failed to parse delivery");
                return StatusCode::INTERNAL_SERVER_ERROR;
            }
        };
        info!(event_count = events.len(), "Received delivery");
        self.submit(events).await;
        StatusCode::OK
    }
}

async fn handle_event(
    registry: &StrategyRegistry,
    platform: &dyn PlatformClient,
    event: Event,
    timeout: Option<Duration>,
) -> EventOutcome {
    if !event.is_message() {
        debug!(event_type = ?event.event_type, "Ignoring non-message event");
        return EventOutcome::Ignored;
    }
    let Some(kind) = event.message_kind() else {
        warn!("Message event without message body, ignoring");
        return EventOutcome::Ignored;
    };
    let Some(strategy) = registry.resolve(kind) else {
        warn!(kind = %kind, "No strategy for kind, dropping event");
        return EventOutcome::Dropped;
    };

    info!(strategy = %strategy.name(), "step: strategy processing");
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, strategy.process(&event))
            .await
            .unwrap_or(Err(DispatchError::Timeout(limit))),
        None => strategy.process(&event).await,
    };

    let reply = match result {
        Ok(Some(reply)) if !reply.is_empty() => reply,
        Ok(_) => {
            info!(strategy = %strategy.name(), "step: strategy done, nothing to send");
            return EventOutcome::NoReply;
        }
        Err(e @ DispatchError::UnsupportedKind(_)) => {
            warn!(strategy = %strategy.name(), error = %e, "Strategy does not handle this kind, dropping event");
            return EventOutcome::Failed;
        }
        Err(e) => {
            error!(strategy = %strategy.name(), error = %e, "Strategy failed, dropping event");
            return EventOutcome::Failed;
        }
    };

    let Some(reply_token) = event.reply_token.as_deref() else {
        warn!("Event has no reply token, dropping reply");
        return EventOutcome::Failed;
    };
    match platform.deliver_reply(reply_token, &reply).await {
        Ok(()) => {
            info!(reply_kind = %reply.kind(), "step: reply delivered");
            EventOutcome::Replied
        }
        Err(e) => {
            error!(error = %e, "Reply delivery failed");
            EventOutcome::Failed
        }
    }
}
