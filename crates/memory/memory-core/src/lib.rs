//! # memory-core
//!
//! Types ([`Turn`], [`Role`]) and the [`MemoryStore`] trait shared by memory backends and the
//! chat-completion strategy.

pub mod store;
pub mod types;

pub use store::MemoryStore;
pub use types::{Role, Turn};
