use thiserror::Error;

use crate::registry::Scope;

/// Unified error type for the keel core.
///
/// The core has exactly one recoverable failure: asking for a dependency that
/// nobody registered. Everything else either cannot fail (cancel-bag
/// operations) or fails fast by design (the panicking resolve path).
#[derive(Debug, Error)]
pub enum KeelError {
    /// No dependency registered for the requested type under the given scope.
    #[error("dependency not found: {type_name} (scope: {scope:?})")]
    DependencyNotFound {
        type_name: &'static str,
        scope: Scope,
    },
}

impl KeelError {
    /// Create a dependency-not-found error for `T`.
    pub fn dependency_not_found<T>(scope: Scope) -> Self {
        Self::DependencyNotFound {
            type_name: std::any::type_name::<T>(),
            scope,
        }
    }

    /// Error category for metrics/logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::DependencyNotFound { .. } => "dependency",
        }
    }
}

/// Result type alias for convenience.
pub type Result<T> = std::result::Result<T, KeelError>;
