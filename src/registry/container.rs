//! Thread-safe dependency container keyed by type identity.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::any::{downcast, DynAny, TypeInfo};
use crate::errors::{KeelError, Result};

/// Registration and resolution scope for a dependency.
///
/// Singleton and factory slots for the same type are independent: ejecting one
/// leaves the other in place, even when both were filled by a single
/// [`Scope::Both`] registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One pre-built instance shared by every resolution.
    Singleton,
    /// A builder re-invoked on every resolution, yielding a fresh value.
    Factory,
    /// Both slots; resolution tries the singleton first, then the factory.
    Both,
}

type Builder = Arc<dyn Fn() -> DynAny + Send + Sync>;

/// A thread-safe container of dependencies keyed by their static type.
///
/// The container is cheap to clone; clones share the same underlying maps.
/// Registering an already-registered type silently overwrites the previous
/// entry for that scope.
///
/// # Example
///
/// ```
/// use keel::registry::{DependencyContainer, Scope};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Greeting(String);
///
/// let container = DependencyContainer::new();
/// container.register(Scope::Singleton, || Greeting("hello".into()));
///
/// let greeting: Greeting = container.resolve(Scope::Singleton);
/// assert_eq!(greeting, Greeting("hello".into()));
/// ```
///
/// # Reentrancy
///
/// Builders run outside the container's locks, so a factory may resolve
/// *other* types from the same container. Resolving the type currently being
/// constructed from inside its own builder recurses forever; that is a wiring
/// bug at the call site, not something the container detects.
#[derive(Clone, Default)]
pub struct DependencyContainer {
    inner: Arc<ContainerInner>,
}

#[derive(Default)]
struct ContainerInner {
    singletons: RwLock<HashMap<TypeInfo, DynAny>>,
    factories: RwLock<HashMap<TypeInfo, Builder>>,
}

impl DependencyContainer {
    /// Create a new empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `builder` for `T` under `scope`.
    ///
    /// With [`Scope::Singleton`] the builder is evaluated once, immediately,
    /// and the value is stored; with [`Scope::Factory`] the builder itself is
    /// stored and re-invoked per resolution; [`Scope::Both`] does both with
    /// the same builder.
    pub fn register<T, F>(&self, scope: Scope, builder: F)
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let info = TypeInfo::of::<T>();
        let builder: Builder = Arc::new(move || Box::new(builder()) as DynAny);
        match scope {
            Scope::Singleton => {
                // Evaluated before taking the lock so the builder may resolve
                // other dependencies from this same container.
                let value = builder();
                self.inner.singletons.write().insert(info, value);
            }
            Scope::Factory => {
                self.inner.factories.write().insert(info, builder);
            }
            Scope::Both => {
                let value = builder();
                self.inner.singletons.write().insert(info, value);
                self.inner.factories.write().insert(info, builder);
            }
        }
        debug!(type_name = info.name(), ?scope, "registered dependency");
    }

    /// Register a pre-built value; resolutions return clones of it.
    pub fn register_value<T>(&self, scope: Scope, value: T)
    where
        T: Clone + Send + Sync + 'static,
    {
        self.register(scope, move || value.clone());
    }

    /// Remove the entry/entries for `T` under `scope`. No-op when absent.
    pub fn eject<T: 'static>(&self, scope: Scope) {
        let info = TypeInfo::of::<T>();
        match scope {
            Scope::Singleton => {
                self.inner.singletons.write().remove(&info);
            }
            Scope::Factory => {
                self.inner.factories.write().remove(&info);
            }
            Scope::Both => {
                self.inner.singletons.write().remove(&info);
                self.inner.factories.write().remove(&info);
            }
        }
        debug!(type_name = info.name(), ?scope, "ejected dependency");
    }

    /// Check whether `T` is registered under `scope`.
    pub fn is_registered<T: 'static>(&self, scope: Scope) -> bool {
        let info = TypeInfo::of::<T>();
        match scope {
            Scope::Singleton => self.inner.singletons.read().contains_key(&info),
            Scope::Factory => self.inner.factories.read().contains_key(&info),
            Scope::Both => {
                self.inner.singletons.read().contains_key(&info)
                    || self.inner.factories.read().contains_key(&info)
            }
        }
    }

    /// Resolve `T` under `scope`, or `None` when it is not registered.
    ///
    /// A stored value that does not actually contain `T` (impossible through
    /// this API, but the storage is type-erased) is treated as absent rather
    /// than returned as a wrong type.
    pub fn resolve_opt<T>(&self, scope: Scope) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        match scope {
            Scope::Singleton => self.resolve_singleton(),
            Scope::Factory => self.resolve_factory(),
            Scope::Both => self.resolve_singleton().or_else(|| self.resolve_factory()),
        }
    }

    /// Resolve `T` under `scope`, or [`KeelError::DependencyNotFound`].
    pub fn try_resolve<T>(&self, scope: Scope) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.resolve_opt(scope).ok_or_else(|| {
            debug!(
                type_name = std::any::type_name::<T>(),
                ?scope,
                "dependency not found"
            );
            KeelError::dependency_not_found::<T>(scope)
        })
    }

    /// Resolve `T` under `scope`.
    ///
    /// # Panics
    ///
    /// Panics when `T` is not registered. Missing wiring is a programmer
    /// error and should fail loudly at first use; call sites that can degrade
    /// gracefully use [`try_resolve`](Self::try_resolve) or
    /// [`resolve_opt`](Self::resolve_opt) instead.
    pub fn resolve<T>(&self, scope: Scope) -> T
    where
        T: Clone + Send + Sync + 'static,
    {
        match self.try_resolve(scope) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    fn resolve_singleton<T>(&self) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let boxed = {
            let singletons = self.inner.singletons.read();
            singletons.get(&TypeInfo::of::<T>())?.clone()
        };
        downcast::<T>(boxed).ok()
    }

    fn resolve_factory<T>(&self) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        // Clone the Arc'd builder under the read lock, invoke it after the
        // lock is released so it can resolve other types reentrantly.
        let builder = {
            let factories = self.inner.factories.read();
            factories.get(&TypeInfo::of::<T>()).cloned()
        }?;
        downcast::<T>(builder()).ok()
    }
}
