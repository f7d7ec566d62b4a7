//! Values on their way into the registry.
//!
//! The populator needs a mutable view of a struct's fields, but what it is
//! handed may be a plain value, an owned struct, an `Arc` or an
//! `Arc<Mutex<_>>`. [`Target`] abstracts over how (and whether) the fields
//! can be reached; [`Component`] adds the conversion into a stored [`Entry`].

use std::any::{Any, TypeId};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::binding::Inject;
use crate::entry::Entry;
use crate::error::Result;
use crate::types::TypeInfo;

/// Callback the populator runs against reachable fields.
pub type Visitor<'v> = dyn FnMut(&mut dyn Inject) -> Result<()> + 'v;

/// Something the field populator can run against.
pub trait Target {
    /// Type the target is stored or handed over as.
    fn type_info(&self) -> TypeInfo;

    /// Whether the underlying type declares any annotated fields.
    fn has_bindings(&self) -> bool;

    /// Runs `visit` on the fields, or returns `None` if they cannot be
    /// borrowed mutably.
    fn visit(&mut self, visit: &mut Visitor<'_>) -> Option<Result<()>>;
}

/// A target that can be stored once populated.
pub trait Component: Target + 'static {
    fn into_entry(self: Box<Self>) -> Entry;
}

/// A type whose annotated fields the populator must see even when it is
/// handed over as a plain value.
///
/// `#[derive(Inject)]` submits one of these per non-generic struct with at
/// least one annotated field, so that `Definition::value` and
/// `Factory::new` cannot silently skip injection.
#[doc(hidden)]
pub struct AnnotatedType {
    matches: fn(TypeId) -> bool,
    visit: fn(&mut dyn Any, &mut Visitor<'_>) -> Option<Result<()>>,
}

impl AnnotatedType {
    pub const fn of<T: Inject + 'static>() -> Self {
        Self {
            matches: handles_of::<T>,
            visit: visit_handle::<T>,
        }
    }
}

inventory::collect!(AnnotatedType);

/// `T` itself, `Arc<T>` and `Arc<Mutex<T>>`.
fn handles_of<T: 'static>(type_id: TypeId) -> bool {
    type_id == TypeId::of::<T>()
        || type_id == TypeId::of::<Arc<T>>()
        || type_id == TypeId::of::<Arc<Mutex<T>>>()
}

/// Reaches the fields through a unique `Arc<T>` or an `Arc<Mutex<T>>`.
///
/// A bare `T` is a copy nobody else will see, so it is left unreachable.
fn visit_handle<T: Inject + 'static>(
    value: &mut dyn Any,
    visit: &mut Visitor<'_>,
) -> Option<Result<()>> {
    if let Some(shared) = value.downcast_mut::<Arc<T>>() {
        return Arc::get_mut(shared).map(|fields| visit(fields as &mut dyn Inject));
    }
    let locked = value.downcast_mut::<Arc<Mutex<T>>>()?;
    let mut guard = locked.lock();
    Some(visit(&mut *guard as &mut dyn Inject))
}

fn annotated(type_id: TypeId) -> Option<&'static AnnotatedType> {
    inventory::iter::<AnnotatedType>
        .into_iter()
        .find(|annotated| (annotated.matches)(type_id))
}

/// A value stored as-is.
///
/// Its fields are only reached if its type was submitted as an
/// [`AnnotatedType`] and it is a unique `Arc` or an `Arc<Mutex<_>>`.
pub(crate) struct Plain<T>(pub T);

impl<T: Send + Sync + 'static> Target for Plain<T> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn has_bindings(&self) -> bool {
        annotated(TypeId::of::<T>()).is_some()
    }

    fn visit(&mut self, visit: &mut Visitor<'_>) -> Option<Result<()>> {
        let annotated = annotated(TypeId::of::<T>())?;
        (annotated.visit)(&mut self.0, visit)
    }
}

impl<T: Send + Sync + 'static> Component for Plain<T> {
    fn into_entry(self: Box<Self>) -> Entry {
        Entry::new(self.0)
    }
}

/// A struct owned outright; stored as `Arc<T>` after population.
pub(crate) struct Owned<T>(pub T);

impl<T: Inject + Send + Sync + 'static> Target for Owned<T> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<Arc<T>>()
    }

    fn has_bindings(&self) -> bool {
        !self.0.bindings().is_empty()
    }

    fn visit(&mut self, visit: &mut Visitor<'_>) -> Option<Result<()>> {
        Some(visit(&mut self.0 as &mut dyn Inject))
    }
}

impl<T: Inject + Send + Sync + 'static> Component for Owned<T> {
    fn into_entry(self: Box<Self>) -> Entry {
        Entry::new(Arc::new(self.0))
    }
}

/// A struct behind an `Arc`; reachable only while the `Arc` is unique.
pub(crate) struct Shared<T>(pub Arc<T>);

impl<T: Inject + Send + Sync + 'static> Target for Shared<T> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<Arc<T>>()
    }

    fn has_bindings(&self) -> bool {
        !self.0.bindings().is_empty()
    }

    fn visit(&mut self, visit: &mut Visitor<'_>) -> Option<Result<()>> {
        Arc::get_mut(&mut self.0).map(|fields| visit(fields as &mut dyn Inject))
    }
}

impl<T: Inject + Send + Sync + 'static> Component for Shared<T> {
    fn into_entry(self: Box<Self>) -> Entry {
        Entry::new(self.0)
    }
}

/// A struct behind `Arc<Mutex<_>>`; populated under the lock.
pub(crate) struct Locked<T>(pub Arc<Mutex<T>>);

impl<T: Inject + Send + 'static> Target for Locked<T> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<Arc<Mutex<T>>>()
    }

    fn has_bindings(&self) -> bool {
        !self.0.lock().bindings().is_empty()
    }

    fn visit(&mut self, visit: &mut Visitor<'_>) -> Option<Result<()>> {
        let mut guard = self.0.lock();
        Some(visit(&mut *guard as &mut dyn Inject))
    }
}

impl<T: Inject + Send + 'static> Component for Locked<T> {
    fn into_entry(self: Box<Self>) -> Entry {
        Entry::new(self.0)
    }
}

impl Target for Entry {
    fn type_info(&self) -> TypeInfo {
        Entry::type_info(self)
    }

    fn has_bindings(&self) -> bool {
        false
    }

    fn visit(&mut self, _visit: &mut Visitor<'_>) -> Option<Result<()>> {
        None
    }
}

impl Component for Entry {
    fn into_entry(self: Box<Self>) -> Entry {
        *self
    }
}

/// Borrowed `Arc` handed to `Container::inject_shared`.
pub(crate) struct SharedRef<'a, T>(pub &'a mut Arc<T>);

impl<T: Inject + 'static> Target for SharedRef<'_, T> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<Arc<T>>()
    }

    fn has_bindings(&self) -> bool {
        !self.0.bindings().is_empty()
    }

    fn visit(&mut self, visit: &mut Visitor<'_>) -> Option<Result<()>> {
        Arc::get_mut(self.0).map(|fields| visit(fields as &mut dyn Inject))
    }
}

/// Borrowed struct handed to `Container::inject`.
pub(crate) struct Direct<'a, T>(pub &'a mut T);

impl<T: Inject + 'static> Target for Direct<'_, T> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn has_bindings(&self) -> bool {
        !self.0.bindings().is_empty()
    }

    fn visit(&mut self, visit: &mut Visitor<'_>) -> Option<Result<()>> {
        Some(visit(&mut *self.0 as &mut dyn Inject))
    }
}
