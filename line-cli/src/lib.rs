//! # line-cli
//!
//! Argument parsing and config loading for the `linebot` binary.

pub mod cli;

pub use cli::{check_signature, load_config, load_llm_config, Cli, Commands};
pub use line_bot::BotConfig;
