//! # Dispatch engine
//!
//! Takes the events of one webhook delivery, resolves a strategy for each through the
//! [`strategy_registry::StrategyRegistry`], runs them under a concurrency ceiling, and hands
//! non-empty replies to the platform client.

mod engine;

pub use engine::{
    BatchOutcome, DispatchEngine, EngineConfig, EventOutcome, DEFAULT_MAX_CONCURRENCY,
};
pub use http::StatusCode;
