//! Keyed registry of outstanding cancel handles.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cancel::handle::{Cancellable, TaskCancel};

/// Tracks in-flight asynchronous work by key and guarantees idempotent,
/// race-free cancellation.
///
/// At most one live entry exists per key: adding under an in-use key evicts
/// and cancels the prior entry (supersession). Cancelling a missing key is a
/// silent no-op. The bag is cheap to clone; clones share the same entries.
///
/// Map mutations are atomic per key; the evicted handle's `cancel` runs after
/// the internal lock is released, so cancel callbacks may touch the bag again
/// without deadlocking.
#[derive(Clone)]
pub struct CancelBag {
    entries: Arc<DashMap<String, Arc<dyn Cancellable>>>,
}

impl CancelBag {
    /// Create a new empty bag.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Track `handle` under `key`, cancelling any prior entry for that key.
    pub fn add(&self, key: impl Into<String>, handle: Arc<dyn Cancellable>) {
        let key = key.into();
        let prior = self.entries.insert(key.clone(), handle);
        if let Some(prior) = prior {
            debug!(%key, "superseding in-flight work");
            prior.cancel();
        }
    }

    /// Track a spawned tokio task under `key`; cancellation aborts it.
    pub fn add_task<T>(&self, key: impl Into<String>, task: &JoinHandle<T>) {
        self.add(key, Arc::new(TaskCancel::for_task(task)));
    }

    /// Remove and cancel the entry for `key`, returning its handle.
    ///
    /// Returns `None` when nothing is tracked under `key`; calling this twice
    /// for the same key, or concurrently with `add` for other keys, is safe.
    pub fn cancel(&self, key: &str) -> Option<Arc<dyn Cancellable>> {
        let (_, handle) = self.entries.remove(key)?;
        debug!(key, "cancelling in-flight work");
        handle.cancel();
        Some(handle)
    }

    /// Cancel every entry present when the call starts.
    ///
    /// Best-effort drain, not a barrier: entries added concurrently may or
    /// may not be included. Intended for owner teardown, when no new entries
    /// are expected.
    pub fn cancel_all(&self) {
        let keys: Vec<String> = self.entries.iter().map(|entry| entry.key().clone()).collect();
        debug!(count = keys.len(), "draining cancel bag");
        for key in keys {
            self.cancel(&key);
        }
    }

    /// Check whether work is tracked under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag tracks no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CancelBag {
    fn default() -> Self {
        Self::new()
    }
}
