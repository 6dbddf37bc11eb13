use dyn_clone::DynClone;
use std::{
    any::{type_name, Any, TypeId},
    fmt::{self, Debug},
    hash::Hash,
};

/// Conversion to [`Any`] to workaround [#65991](https://github.com/rust-lang/rust/issues/65991).
/// Implemented for anything that's `'static`, [`Clone`] and thread-safe, which is
/// exactly what the dependency container is allowed to store.
pub trait IntoAny: DynClone + Any + Send + Sync {
    /// The conversion.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
    fn as_any(&self) -> &dyn Any;
}

dyn_clone::clone_trait_object!(IntoAny);

impl<T: 'static + Clone + Send + Sync> IntoAny for T {
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        Box::new(*self)
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Debug for dyn IntoAny + Send + Sync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoAny").finish_non_exhaustive()
    }
}

/// A [`Box`]ed [`IntoAny`], the erased storage unit of the container.
pub type DynAny = Box<dyn IntoAny + Send + Sync>;

/// Downcast an erased value back to `T`, returning the box on mismatch so the
/// caller can fail closed instead of silently returning a wrong type.
pub fn downcast<T: 'static>(value: DynAny) -> Result<T, DynAny> {
    if (*value).type_id() != TypeId::of::<T>() {
        return Err(value);
    }
    let value = value.into_any();
    // We've checked the type id.
    Ok(*Box::<dyn Any + 'static>::downcast::<T>(value).unwrap())
}

/// A [`TypeId`] and the type's name.
///
/// Map key for dependency registration: identity is the `TypeId` alone, the
/// name only exists for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
}

impl TypeInfo {
    /// Gets the [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Gets the type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the [`TypeInfo`] of the type this generic function has been
    /// instantiated with.
    pub fn of<T: 'static>() -> Self {
        TypeInfo {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

impl Hash for TypeInfo {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &TypeInfo) -> bool {
        self.id.eq(&other.id)
    }
}

impl Eq for TypeInfo {}
