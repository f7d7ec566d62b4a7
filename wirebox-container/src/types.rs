//! Runtime type descriptors.
//!
//! [`TypeInfo`] stands in for reflection: every stored value, annotated
//! field and factory parameter is described by one, and assignability is
//! decided by comparing them.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use wirebox_support::rendering::shorten_type_name;

/// Identifies a Rust type at runtime.
///
/// Two descriptors are equal when they describe the same [`TypeId`].
/// Descriptors built with [`TypeInfo::error`] additionally remember that
/// the type represents a failure, which is what factory signatures check
/// for their second return value.
///
/// # Examples
/// ```
/// use wirebox_container::TypeInfo;
///
/// let info = TypeInfo::of::<String>();
/// assert_eq!(info.type_name(), "alloc::string::String");
/// assert!(!info.is_error());
///
/// let err = TypeInfo::error::<std::io::Error>();
/// assert!(err.is_error());
/// ```
#[derive(Clone, Copy)]
pub struct TypeInfo {
    type_id: TypeId,
    type_name: &'static str,
    error: bool,
}

impl TypeInfo {
    /// Creates a descriptor for type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            error: false,
        }
    }

    /// Creates a descriptor for an error type `E`.
    #[inline]
    pub fn error<E: std::error::Error + ?Sized + 'static>() -> Self {
        Self {
            error: true,
            ..Self::of::<E>()
        }
    }

    /// Returns the [`TypeId`] of this type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the fully qualified type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the type name without module paths, for log output.
    pub fn short_name(&self) -> String {
        shorten_type_name(self.type_name)
    }

    /// Returns `true` if the type represents a failure.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Returns `true` if this descriptor is for `T`.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeInfo({})", self.type_name)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}
