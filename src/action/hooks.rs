//! Lifecycle hooks around action dispatch.
//!
//! Hooks observe dispatch and cancellation, they never mutate core state.

use async_trait::async_trait;
use std::sync::Arc;

/// Observer of action lifecycle events.
///
/// All methods default to no-ops so implementations only override what they
/// care about.
#[async_trait]
pub trait ActionHook: Send + Sync {
    /// Called when an action's work is about to start. `kind` names the
    /// action case.
    async fn on_dispatch(&self, _kind: &str) {}

    /// Called when in-flight work is cancelled, with its cancellation key.
    async fn on_cancel(&self, _key: &str) {}

    /// Called when the owning scope is torn down.
    async fn on_teardown(&self) {}
}

/// Composite hook that chains multiple hooks in registration order.
pub struct CompositeHook {
    hooks: Vec<Arc<dyn ActionHook>>,
}

impl CompositeHook {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    pub fn add_hook(&mut self, hook: Arc<dyn ActionHook>) {
        self.hooks.push(hook);
    }
}

impl Default for CompositeHook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionHook for CompositeHook {
    async fn on_dispatch(&self, kind: &str) {
        for hook in &self.hooks {
            hook.on_dispatch(kind).await;
        }
    }

    async fn on_cancel(&self, key: &str) {
        for hook in &self.hooks {
            hook.on_cancel(key).await;
        }
    }

    async fn on_teardown(&self) {
        for hook in &self.hooks {
            hook.on_teardown().await;
        }
    }
}

/// Hook that logs lifecycle events through `tracing`.
pub struct LoggingHook;

#[async_trait]
impl ActionHook for LoggingHook {
    async fn on_dispatch(&self, kind: &str) {
        tracing::info!(kind, "action dispatched");
    }

    async fn on_cancel(&self, key: &str) {
        tracing::info!(key, "action cancelled");
    }

    async fn on_teardown(&self) {
        tracing::info!("action scope torn down");
    }
}
