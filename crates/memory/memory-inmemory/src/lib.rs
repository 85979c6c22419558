//! # In-Memory Conversation Store
//!
//! In-process implementation of [`MemoryStore`]. Data is lost on restart.
//!
//! ## Thread Safety
//!
//! The user map sits behind a `RwLock` that is only held long enough to look up (or, on a
//! user's first turn, insert) that user's history handle. Each history has its own `Mutex`, so
//! turns for the same user are serialized while different users never wait on each other.
//!
//! ## Example
//!
//! ```rust
//! use memory_core::{MemoryStore, Turn};
//! use memory_inmemory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), anyhow::Error> {
//!     let store = InMemoryStore::new();
//!     store.remember("U123", Turn::user("Hello")).await?;
//!     assert_eq!(store.size("U123").await?, 1);
//!     Ok(())
//! }
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use memory_core::{MemoryStore, Turn};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

type History = Arc<Mutex<VecDeque<Turn>>>;

/// In-memory, per-user locked conversation store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    histories: Arc<RwLock<HashMap<String, History>>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a history (possibly empty).
    pub async fn user_count(&self) -> usize {
        self.histories.read().await.len()
    }

    /// Drops every user's history.
    pub async fn clear(&self) {
        self.histories.write().await.clear();
    }

    async fn existing(&self, user_id: &str) -> Option<History> {
        self.histories.read().await.get(user_id).cloned()
    }

    async fn history(&self, user_id: &str) -> History {
        if let Some(history) = self.existing(user_id).await {
            return history;
        }
        let mut histories = self.histories.write().await;
        histories.entry(user_id.to_string()).or_default().clone()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn remember(&self, user_id: &str, turn: Turn) -> Result<(), anyhow::Error> {
        let history = self.history(user_id).await;
        let mut turns = history.lock().await;
        turns.push_back(turn);
        debug!(user_id = %user_id, size = turns.len(), "step: memory remember");
        Ok(())
    }

    async fn recall(&self, user_id: &str, n: usize) -> Result<Vec<Turn>, anyhow::Error> {
        let Some(history) = self.existing(user_id).await else {
            return Ok(Vec::new());
        };
        let turns = history.lock().await;
        let skip = turns.len().saturating_sub(n);
        Ok(turns.iter().skip(skip).cloned().collect())
    }

    async fn revoke(&self, user_id: &str, n: usize) -> Result<Vec<Turn>, anyhow::Error> {
        let Some(history) = self.existing(user_id).await else {
            return Ok(Vec::new());
        };
        let mut turns = history.lock().await;
        let keep = turns.len().saturating_sub(n);
        let revoked: Vec<Turn> = turns.drain(keep..).collect();
        debug!(user_id = %user_id, revoked = revoked.len(), size = turns.len(), "step: memory revoke");
        Ok(revoked)
    }

    async fn forget(&self, user_id: &str, n: usize) -> Result<(), anyhow::Error> {
        let Some(history) = self.existing(user_id).await else {
            return Ok(());
        };
        let mut turns = history.lock().await;
        let n = n.min(turns.len());
        turns.drain(..n);
        debug!(user_id = %user_id, forgotten = n, size = turns.len(), "step: memory forget");
        Ok(())
    }

    async fn size(&self, user_id: &str) -> Result<usize, anyhow::Error> {
        match self.existing(user_id).await {
            Some(history) => Ok(history.lock().await.len()),
            None => Ok(0),
        }
    }

    async fn trim_to(&self, user_id: &str, window: usize) -> Result<usize, anyhow::Error> {
        let Some(history) = self.existing(user_id).await else {
            return Ok(0);
        };
        let mut turns = history.lock().await;
        let excess = turns.len().saturating_sub(window);
        turns.drain(..excess);
        if excess > 0 {
            debug!(user_id = %user_id, trimmed = excess, size = turns.len(), "step: memory trim");
        }
        Ok(excess)
    }
}
