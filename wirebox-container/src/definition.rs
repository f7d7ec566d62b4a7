//! What gets handed to `Container::register`.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::binding::Inject;
use crate::component::{Component, Locked, Owned, Plain, Shared};
use crate::entry::Entry;
use crate::error::{InjectError, NotAssignableError, Result};
use crate::factory::Factory;
use crate::types::TypeInfo;

pub(crate) enum Origin {
    Ready(Box<dyn Component>),
    Factory(Factory),
}

pub(crate) type Exposure = Box<dyn FnOnce(Entry, &str) -> Result<Entry>>;

/// A value or factory to register, plus the extra types it is exposed as.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use wirebox_container::{Container, Definition};
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct Fixed;
/// impl Clock for Fixed {
///     fn now(&self) -> u64 { 42 }
/// }
///
/// let mut container = Container::new();
/// container
///     .register(
///         "clock",
///         Definition::value(Arc::new(Fixed)).expose(|c: &Arc<Fixed>| c.clone() as Arc<dyn Clock>),
///     )
///     .unwrap();
///
/// let clock: Arc<dyn Clock> = container.get_as("clock").unwrap();
/// assert_eq!(clock.now(), 42);
/// ```
pub struct Definition {
    origin: Origin,
    exposures: Vec<Exposure>,
}

impl Definition {
    fn ready(component: impl Component) -> Self {
        Self {
            origin: Origin::Ready(Box::new(component)),
            exposures: Vec::new(),
        }
    }

    /// A value stored as-is.
    ///
    /// If it is an `Arc<T>` or `Arc<Mutex<T>>` of a type deriving `Inject`,
    /// its annotated fields are populated like those of [`Definition::shared`]
    /// and [`Definition::locked`]. A bare `T` with annotated fields fails with
    /// [`InjectError::NotInjectable`]; use [`Definition::component`] instead.
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        Self::ready(Plain(value))
    }

    /// An owned struct: its annotated fields are populated, then it is
    /// stored as `Arc<T>`.
    pub fn component<T: Inject + Send + Sync + 'static>(value: T) -> Self {
        Self::ready(Owned(value))
    }

    /// A struct already behind an `Arc`, stored as that same `Arc<T>`.
    ///
    /// Its fields can only be populated while the `Arc` is unique;
    /// otherwise registration fails with [`InjectError::NotInjectable`]
    /// unless the type has no annotated fields.
    pub fn shared<T: Inject + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self::ready(Shared(value))
    }

    /// A struct behind `Arc<Mutex<_>>`, populated under the lock.
    ///
    /// Every holder of the `Arc` sees the injected fields.
    pub fn locked<T: Inject + Send + 'static>(value: Arc<Mutex<T>>) -> Self {
        Self::ready(Locked(value))
    }

    /// Also exposes the stored value as `V`.
    ///
    /// `convert` receives the stored value as `T`, which must be its exact
    /// stored type (`Arc<S>` for components). A mismatch fails the
    /// registration with [`InjectError::NotAssignable`].
    pub fn expose<T, V, F>(mut self, convert: F) -> Self
    where
        T: 'static,
        V: Send + Sync + 'static,
        F: FnOnce(&T) -> V + 'static,
    {
        self.exposures.push(Box::new(move |entry: Entry, name: &str| {
            let view = match entry.value().downcast_ref::<T>() {
                Some(stored) => convert(stored),
                None => {
                    return Err(InjectError::NotAssignable(NotAssignableError {
                        dependency: name.to_string(),
                        target: format!("exposure as {}", TypeInfo::of::<V>()),
                        expected: TypeInfo::of::<T>(),
                        actual: entry.type_info(),
                    }));
                }
            };
            Ok(entry.with_view(view))
        }));
        self
    }

    /// Returns `true` if registering runs a factory.
    pub fn is_factory(&self) -> bool {
        matches!(self.origin, Origin::Factory(_))
    }

    pub(crate) fn into_parts(self) -> (Origin, Vec<Exposure>) {
        (self.origin, self.exposures)
    }
}

impl From<Factory> for Definition {
    fn from(factory: Factory) -> Self {
        Self {
            origin: Origin::Factory(factory),
            exposures: Vec::new(),
        }
    }
}

impl From<Entry> for Definition {
    fn from(entry: Entry) -> Self {
        Self::ready(entry)
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Definition");
        match &self.origin {
            Origin::Ready(component) => debug.field("ready", &component.type_info()),
            Origin::Factory(factory) => debug.field("factory", factory),
        };
        debug.field("exposures", &self.exposures.len()).finish()
    }
}
