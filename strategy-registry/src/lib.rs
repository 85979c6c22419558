//! # Strategy registry
//!
//! Maps a [`MessageKind`] to the [`ProcessingStrategy`] that handles it. A kind-specific override
//! always wins over the default; with neither configured, resolution yields `None` and the
//! dispatcher drops the event.
//!
//! The registry is read on every dispatched event and written rarely (startup, admin changes), so
//! state lives behind a read-write lock: a resolve sees either the old or the new entry for a
//! kind, never a half-updated map.

use dispatch_core::{MessageKind, ProcessingStrategy};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

#[derive(Default)]
struct RegistryState {
    default: Option<Arc<dyn ProcessingStrategy>>,
    overrides: HashMap<MessageKind, Arc<dyn ProcessingStrategy>>,
}

/// Default strategy plus per-kind overrides. Registration is last-write-wins.
#[derive(Default)]
pub struct StrategyRegistry {
    state: RwLock<RegistryState>,
}

impl StrategyRegistry {
    /// Creates an empty registry (no default, no overrides).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default strategy (builder form).
    pub fn with_default(self, strategy: Arc<dyn ProcessingStrategy>) -> Self {
        self.set_default(strategy);
        self
    }

    /// Adds an override for `kind` (builder form).
    pub fn with_override(self, kind: MessageKind, strategy: Arc<dyn ProcessingStrategy>) -> Self {
        self.set_override(kind, strategy);
        self
    }

    // Every write is a single insert/remove/assign, so a poisoned lock still guards a consistent map.
    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_default(&self, strategy: Arc<dyn ProcessingStrategy>) {
        info!(strategy = %strategy.name(), "step: registry default set");
        self.write().default = Some(strategy);
    }

    pub fn default_strategy(&self) -> Option<Arc<dyn ProcessingStrategy>> {
        self.read().default.clone()
    }

    /// Removes the default; kinds without an override then resolve to `None`.
    pub fn clear_default(&self) {
        info!("step: registry default cleared");
        self.write().default = None;
    }

    pub fn set_override(&self, kind: MessageKind, strategy: Arc<dyn ProcessingStrategy>) {
        info!(kind = %kind, strategy = %strategy.name(), "step: registry override set");
        self.write().overrides.insert(kind, strategy);
    }

    /// Returns the override for `kind` if present, else the default, else `None`.
    pub fn get_override(&self, kind: MessageKind) -> Option<Arc<dyn ProcessingStrategy>> {
        let state = self.read();
        state
            .overrides
            .get(&kind)
            .or(state.default.as_ref())
            .cloned()
    }

    pub fn clear_override(&self, kind: MessageKind) {
        info!(kind = %kind, "step: registry override cleared");
        self.write().overrides.remove(&kind);
    }

    pub fn clear_all_overrides(&self) {
        info!("step: registry overrides cleared");
        self.write().overrides.clear();
    }

    /// Kinds that currently have an override.
    pub fn override_kinds(&self) -> Vec<MessageKind> {
        self.read().overrides.keys().copied().collect()
    }

    /// Dispatch entry point; same as [`get_override`](Self::get_override).
    pub fn resolve(&self, kind: MessageKind) -> Option<Arc<dyn ProcessingStrategy>> {
        let strategy = self.get_override(kind);
        debug!(
            kind = %kind,
            strategy = strategy.as_ref().map(|s| s.name()).unwrap_or("<none>"),
            "step: registry resolve"
        );
        strategy
    }
}

// Integration tests live in tests/strategy_registry_test.rs
