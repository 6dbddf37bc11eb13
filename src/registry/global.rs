//! Process-wide handle for the active [`DependencyContainer`].
//!
//! A single swap-in-place slot, not a service locator: its only job is to let
//! one ambient container be discovered by independently-constructed leaf
//! objects (see [`Dependency`]).

use std::sync::OnceLock;

use parking_lot::RwLock;
use tracing::debug;

use crate::registry::container::{DependencyContainer, Scope};

static CURRENT: RwLock<Option<DependencyContainer>> = RwLock::new(None);

/// Publish `container` as the active one. Last writer wins.
pub fn publish(container: DependencyContainer) {
    debug!("publishing dependency container");
    *CURRENT.write() = Some(container);
}

/// The currently published container, if any.
pub fn current() -> Option<DependencyContainer> {
    CURRENT.read().clone()
}

/// Clear the slot, returning the previously published container.
pub fn take() -> Option<DependencyContainer> {
    CURRENT.write().take()
}

/// A lazily resolved dependency backed by the published container.
///
/// The first access resolves the value through [`current`] and caches it;
/// every later access returns the cached value. Concurrent first accesses are
/// safe; exactly one resolution wins.
///
/// ```no_run
/// use keel::registry::{Dependency, Scope};
///
/// struct Analytics {
///     tracker: Dependency<std::sync::Arc<String>>,
/// }
///
/// let analytics = Analytics {
///     tracker: Dependency::new(Scope::Both),
/// };
/// let tracker = analytics.tracker.get();
/// ```
pub struct Dependency<T> {
    scope: Scope,
    cell: OnceLock<T>,
}

impl<T> Dependency<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A cell that resolves under `scope` on first access.
    pub const fn new(scope: Scope) -> Self {
        Self {
            scope,
            cell: OnceLock::new(),
        }
    }

    /// The resolved value, resolving and caching it on first access.
    ///
    /// # Panics
    ///
    /// Panics when no container has been published or the type is not
    /// registered; like [`DependencyContainer::resolve`] this is a loud
    /// wiring-error signal.
    pub fn get(&self) -> &T {
        self.cell.get_or_init(|| {
            let container = match current() {
                Some(container) => container,
                None => panic!(
                    "no dependency container published while resolving {}",
                    std::any::type_name::<T>()
                ),
            };
            container.resolve::<T>(self.scope)
        })
    }

    /// Non-panicking variant of [`get`](Self::get).
    ///
    /// Returns `None` while no container is published or the type is missing;
    /// a later call may still succeed, after which the value stays cached.
    pub fn try_get(&self) -> Option<&T> {
        if let Some(value) = self.cell.get() {
            return Some(value);
        }
        let resolved: T = current()?.resolve_opt(self.scope)?;
        // Another thread may have initialized the cell in the meantime; its
        // value wins and ours is dropped.
        Some(self.cell.get_or_init(|| resolved))
    }
}

impl<T> Default for Dependency<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(Scope::Both)
    }
}
