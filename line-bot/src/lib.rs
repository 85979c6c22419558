//! # LINE bot application
//!
//! Wires the LINE Messaging API client, strategy registry, chat strategies and dispatch engine
//! behind an axum webhook server. Loads config from env.

pub mod config;
pub mod line;
pub mod runner;
pub mod server;

pub use config::{BotConfig, ConfigOverrides};
pub use line::{sign, verify_signature, LineClient, SIGNATURE_HEADER};
pub use runner::{build_engine, build_engine_with_platform, run_server};
pub use server::router;
