//! # Memory Storage
//!
//! The [`MemoryStore`] trait: bounded, per-user ordered storage of [`Turn`]s.
//!
//! All counts are clamped: asking for more turns than a user has returns (or removes) what
//! exists, and an unknown user behaves like an empty history.
//!
//! ### Example Usage
//!
//! ```rust
//! use memory_core::{MemoryStore, Turn};
//!
//! async fn example(store: &impl MemoryStore) -> Result<(), anyhow::Error> {
//!     store.remember("U123", Turn::user("Hello")).await?;
//!     store.remember("U123", Turn::assistant("Hi there")).await?;
//!
//!     // Last 10 turns, oldest first.
//!     let history = store.recall("U123", 10).await?;
//!     assert_eq!(history.len(), 2);
//!
//!     // Keep the window at 1 turn.
//!     assert_eq!(store.trim_to("U123", 1).await?, 1);
//!     assert_eq!(store.size("U123").await?, 1);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;

use crate::types::Turn;

/// Per-user conversation history.
///
/// Implementations must serialize mutations for the same user while letting different users
/// proceed independently.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Appends `turn` to the user's history.
    async fn remember(&self, user_id: &str, turn: Turn) -> Result<(), anyhow::Error>;

    /// Returns the most recent `min(n, size)` turns, oldest first. Does not mutate.
    async fn recall(&self, user_id: &str, n: usize) -> Result<Vec<Turn>, anyhow::Error>;

    /// Removes and returns the most recent `min(n, size)` turns, oldest first.
    async fn revoke(&self, user_id: &str, n: usize) -> Result<Vec<Turn>, anyhow::Error>;

    /// Discards the oldest `min(n, size)` turns.
    async fn forget(&self, user_id: &str, n: usize) -> Result<(), anyhow::Error>;

    /// Number of turns currently stored for the user.
    async fn size(&self, user_id: &str) -> Result<usize, anyhow::Error>;

    /// Discards the oldest turns until at most `window` remain and returns how many were dropped.
    ///
    /// Must read the size and drop the excess under the same per-user lock; a separate
    /// `size` + `forget` pair lets two concurrent turns of one user both drop the full excess.
    async fn trim_to(&self, user_id: &str, window: usize) -> Result<usize, anyhow::Error>;
}
