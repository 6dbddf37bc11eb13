//! Type-keyed dependency registry.
//!
//! [`DependencyContainer`] stores one singleton value and/or one factory per
//! concrete type; [`global`] publishes "the" active container for ambient
//! resolution by code that cannot receive it as a parameter.

pub mod container;
pub mod global;

pub use container::{DependencyContainer, Scope};
pub use global::Dependency;
