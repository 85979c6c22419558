//! # dispatch-core
//!
//! Core types and traits for the webhook dispatcher: [`Event`], [`Reply`], [`MessageKind`],
//! the [`PlatformClient`] and [`ProcessingStrategy`] seams, the error taxonomy, and tracing
//! initialization. Transport-agnostic; used by strategy-registry, dispatch-engine, chat-strategies
//! and line-bot.

pub mod error;
pub mod logger;
pub mod platform;
pub mod strategy;
pub mod types;

pub use error::{DispatchError, Result};
pub use logger::init_tracing;
pub use platform::PlatformClient;
pub use strategy::ProcessingStrategy;
pub use types::{
    Event, EventType, InboundMessage, MessageContent, MessageKind, Reply, Source,
};
